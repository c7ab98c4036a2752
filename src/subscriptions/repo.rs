use async_trait::async_trait;

use crate::db::{Database, PersistenceError};
use crate::email::EmailAddress;
use crate::subscriptions::repo_types::Subscriber;

#[async_trait]
pub trait SubscriberRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, PersistenceError>;

    /// A duplicate email surfaces as `PersistenceError::UniqueViolation`.
    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, PersistenceError>;
}

pub struct PgSubscriberRepo {
    db: Database,
}

impl PgSubscriberRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriberRepo for PgSubscriberRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, PersistenceError> {
        let mut session = self.db.acquire_session().await?;
        let row = sqlx::query_as::<_, Subscriber>(
            r#"SELECT id, email FROM subscribers WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(session.conn())
        .await?;
        session.commit().await?;
        Ok(row)
    }

    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, PersistenceError> {
        let mut session = self.db.acquire_session().await?;
        let row = sqlx::query_as::<_, Subscriber>(
            r#"INSERT INTO subscribers (email) VALUES ($1) RETURNING id, email"#,
        )
        .bind(email.as_ref())
        .fetch_one(session.conn())
        .await?;
        session.commit().await?;
        Ok(row)
    }
}
