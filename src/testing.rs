//! In-memory repositories for unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    config::JwtConfig,
    db::PersistenceError,
    email::EmailAddress,
    funnel::{
        repo::FunnelRepo,
        repo_types::{Company, JobPosition, JobPositionCompanyLocation, LevelCounts},
    },
    subscriptions::{repo::SubscriberRepo, repo_types::Subscriber},
};

pub fn test_keys() -> JwtKeys {
    JwtKeys::from(&JwtConfig {
        secret: "test".into(),
        issuer: "test-issuer".into(),
        audience: "test-aud".into(),
        ttl_minutes: 5,
    })
}

fn unique_violation(constraint: &str) -> PersistenceError {
    PersistenceError::UniqueViolation {
        constraint: Some(constraint.into()),
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    calls: AtomicUsize,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepo for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email.as_ref()) {
            return Err(unique_violation("users_email_key"));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            surname: user.surname,
            email: user.email.into_inner(),
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(created.clone());
        Ok(created)
    }
}

/// Pre-check always misses, as if another request committed the same email
/// between lookup and insert.
#[derive(Default)]
pub struct RacingUsers(InMemoryUsers);

#[async_trait]
impl UserRepo for RacingUsers {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, PersistenceError> {
        Ok(None)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        self.0.find_by_id(id).await
    }

    async fn create(&self, user: NewUser) -> Result<User, PersistenceError> {
        self.0.create(user).await
    }
}

#[derive(Default)]
pub struct InMemorySubscribers {
    rows: Mutex<Vec<Subscriber>>,
    calls: AtomicUsize,
}

impl InMemorySubscribers {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriberRepo for InMemorySubscribers {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|s| s.email == email).cloned())
    }

    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.email == email.as_ref()) {
            return Err(unique_violation("subscribers_email_key"));
        }
        let created = Subscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        rows.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct RacingSubscribers(InMemorySubscribers);

#[async_trait]
impl SubscriberRepo for RacingSubscribers {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Subscriber>, PersistenceError> {
        Ok(None)
    }

    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, PersistenceError> {
        self.0.create(email).await
    }
}

/// Companies, positions and assignments kept as plain rows; counting follows
/// the LEFT JOIN semantics of the SQL query.
#[derive(Default)]
pub struct InMemoryFunnel {
    companies: Vec<Company>,
    positions: Vec<JobPosition>,
    assignments: Vec<JobPositionCompanyLocation>,
}

impl InMemoryFunnel {
    pub fn with_company(mut self, name: &str, levels: &[&str]) -> Self {
        let company = Company {
            id: Uuid::new_v4(),
            company_name: name.into(),
        };
        for level in levels {
            let position = JobPosition {
                id: Uuid::new_v4(),
                level: (*level).into(),
            };
            self.assignments.push(JobPositionCompanyLocation {
                job_position_id: position.id,
                company_id: company.id,
            });
            self.positions.push(position);
        }
        self.companies.push(company);
        self
    }
}

#[async_trait]
impl FunnelRepo for InMemoryFunnel {
    async fn level_counts(
        &self,
        company_name: &str,
    ) -> Result<Option<LevelCounts>, PersistenceError> {
        let Some(company) = self.companies.iter().find(|c| c.company_name == company_name) else {
            return Ok(None);
        };
        let levels = self
            .assignments
            .iter()
            .filter(|a| a.company_id == company.id)
            .filter_map(|a| self.positions.iter().find(|p| p.id == a.job_position_id))
            .map(|p| p.level.as_str());
        Ok(Some(LevelCounts::tally(levels)))
    }
}
