use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::PersistenceError;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const ALREADY_REGISTERED: &str = "This email has already been registered.";

/// Validation messages keyed by the offending field, in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error carrying every message.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("{field}: {message}")]
    Conflict {
        field: &'static str,
        message: String,
    },
    #[error("invalid credentials")]
    Authentication,
    #[error("database unavailable")]
    Connectivity(#[source] PersistenceError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        AppError::Validation(errors)
    }

    pub fn email_taken() -> Self {
        AppError::Conflict {
            field: "email",
            message: ALREADY_REGISTERED.into(),
        }
    }

    /// Classifies a persistence failure; unique violations become a conflict on `field`.
    pub fn from_persistence(e: PersistenceError, field: &'static str) -> Self {
        match e {
            PersistenceError::UniqueViolation { .. } => AppError::Conflict {
                field,
                message: ALREADY_REGISTERED.into(),
            },
            PersistenceError::Connectivity(_) => AppError::Connectivity(e),
            PersistenceError::Query(_) => AppError::Internal(e.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => ErrorBody {
                success: false,
                message: "The given data was invalid.",
                errors: Some(errors),
            },
            AppError::Conflict { field, message } => {
                let mut errors = FieldErrors::default();
                errors.add(field, message);
                ErrorBody {
                    success: false,
                    message: "The given data was invalid.",
                    errors: Some(errors),
                }
            }
            AppError::Authentication => {
                let mut errors = FieldErrors::default();
                errors.add("email", INVALID_CREDENTIALS);
                ErrorBody {
                    success: false,
                    message: INVALID_CREDENTIALS,
                    errors: Some(errors),
                }
            }
            AppError::Connectivity(e) => {
                error!(error = ?e, "database unavailable");
                ErrorBody {
                    success: false,
                    message: "Service temporarily unavailable.",
                    errors: None,
                }
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                ErrorBody {
                    success: false,
                    message: "An internal error occurred.",
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let mut errors = FieldErrors::default();
        errors.add("name", "name is required");
        errors.add("password", "Password must be at least 8 characters");
        let (status, body) = body_json(AppError::Validation(errors)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["name"][0], "name is required");
        assert_eq!(
            body["errors"]["password"][0],
            "Password must be at least 8 characters"
        );
    }

    #[tokio::test]
    async fn conflict_is_keyed_by_field() {
        let (status, body) = body_json(AppError::email_taken()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errors"]["email"][0], ALREADY_REGISTERED);
    }

    #[tokio::test]
    async fn authentication_is_generic() {
        let (status, body) = body_json(AppError::Authentication).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errors"]["email"][0], INVALID_CREDENTIALS);
        assert!(body["errors"].get("password").is_none());
    }

    #[tokio::test]
    async fn internal_error_does_not_leak_details() {
        let err = AppError::Internal(anyhow::anyhow!("relation \"users\" does not exist"));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let text = body.to_string();
        assert!(!text.contains("relation"));
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn persistence_errors_are_classified() {
        let conflict = AppError::from_persistence(
            PersistenceError::UniqueViolation { constraint: None },
            "email",
        );
        assert!(matches!(conflict, AppError::Conflict { field: "email", .. }));

        let down = AppError::from_persistence(
            PersistenceError::Connectivity(sqlx::Error::PoolTimedOut),
            "email",
        );
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);

        let broken = AppError::from_persistence(
            PersistenceError::Query(sqlx::Error::RowNotFound),
            "email",
        );
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn empty_field_errors_pass() {
        assert!(FieldErrors::default().into_result().is_ok());
    }
}
