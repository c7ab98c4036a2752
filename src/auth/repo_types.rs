use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::email::EmailAddress;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,               // normalized, unique
    pub password_hash: String,       // Argon2 PHC string, never leaves the server
    pub created_at: OffsetDateTime,
}

/// Validated fields for a user that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: EmailAddress,
    pub password_hash: String,
}
