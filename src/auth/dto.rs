use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for user registration. Absent fields deserialize as empty
/// strings so they are reported by validation like any other bad value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub surname: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            surname: u.surname,
        }
    }
}

/// Outcome of a successful register or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user: PublicUser,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub access_token: String,
    pub user: PublicUser,
}

impl AuthResponse {
    pub fn new(message: &'static str, session: AuthSession) -> Self {
        Self {
            success: true,
            message,
            access_token: session.access_token,
            user: session.user,
        }
    }
}
