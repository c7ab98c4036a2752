use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};
use crate::db::{Database, PersistenceError};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError>;

    /// Insert a user; a duplicate email surfaces as `PersistenceError::UniqueViolation`.
    async fn create(&self, user: NewUser) -> Result<User, PersistenceError>;
}

pub struct PgUserRepo {
    db: Database,
}

impl PgUserRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let mut session = self.db.acquire_session().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(session.conn())
        .await?;
        session.commit().await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        let mut session = self.db.acquire_session().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, surname, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(session.conn())
        .await?;
        session.commit().await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, PersistenceError> {
        let mut session = self.db.acquire_session().await?;
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, surname, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, surname, email, password_hash, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.surname)
        .bind(user.email.as_ref())
        .bind(&user.password_hash)
        .fetch_one(session.conn())
        .await?;
        session.commit().await?;
        Ok(created)
    }
}
