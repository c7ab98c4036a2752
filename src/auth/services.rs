use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthSession, LoginRequest, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::UserRepo,
        repo_types::NewUser,
    },
    db::PersistenceError,
    email::EmailAddress,
    error::{AppError, FieldErrors},
};

const MIN_PASSWORD_CHARS: usize = 8;

/// Registration input that passed every field check.
#[derive(Debug)]
pub struct ValidRegistration {
    pub name: String,
    pub surname: String,
    pub email: EmailAddress,
}

/// Checks every registration field without touching the database.
pub fn validate_registration(req: &RegisterRequest) -> Result<ValidRegistration, AppError> {
    let mut errors = FieldErrors::default();

    let name = req.name.trim();
    if name.is_empty() {
        errors.add("name", "Name is required");
    }
    let surname = req.surname.trim();
    if surname.is_empty() {
        errors.add("surname", "Surname is required");
    }

    let email = match EmailAddress::parse(&req.email) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add("email", "Invalid email");
            None
        }
    };

    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.add("password", "Password must be at least 8 characters");
    }
    if req.password_confirmation != req.password {
        errors.add("password_confirmation", "Passwords do not match");
    }

    errors.into_result()?;
    let email = email.ok_or_else(|| AppError::validation("email", "Invalid email"))?;
    Ok(ValidRegistration {
        name: name.to_owned(),
        surname: surname.to_owned(),
        email,
    })
}

pub async fn register(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthSession, AppError> {
    let ValidRegistration {
        name,
        surname,
        email,
    } = validate_registration(&req)?;

    let existing = users
        .find_by_email(email.as_ref())
        .await
        .map_err(|e| AppError::from_persistence(e, "email"))?;
    if existing.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::email_taken());
    }

    let password_hash = hash_password(&req.password)?;

    let user = users
        .create(NewUser {
            name,
            surname,
            email: email.clone(),
            password_hash,
        })
        .await
        .map_err(|e| {
            if matches!(e, PersistenceError::UniqueViolation { .. }) {
                warn!(email = %email, "concurrent registration lost the unique race");
            }
            AppError::from_persistence(e, "email")
        })?;

    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        e
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthSession {
        access_token,
        user: user.into(),
    })
}

pub async fn login(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthSession, AppError> {
    let email = EmailAddress::parse(&req.email)
        .map_err(|_| AppError::validation("email", "Invalid email"))?;

    let user = match users.find_by_email(email.as_ref()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Authentication);
        }
        Err(e) => return Err(AppError::from_persistence(e, "email")),
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::Authentication);
    }

    let access_token = keys.sign_access(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthSession {
        access_token,
        user: user.into(),
    })
}

/// Loads the public record behind a verified token.
pub async fn current_user(users: &dyn UserRepo, user_id: Uuid) -> Result<PublicUser, AppError> {
    match users.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user.into()),
        Ok(None) => {
            warn!(user_id = %user_id, "token for missing user");
            Err(AppError::Authentication)
        }
        Err(e) => Err(AppError::from_persistence(e, "id")),
    }
}
