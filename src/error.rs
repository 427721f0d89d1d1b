use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ValidationError, Violation};
use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    /// One or more field-level violations, collected.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Deliberately generic: never distinguishes unknown email from bad password.
    #[error("Invalid login")]
    AuthenticationFailed,

    #[error("Not Found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    /// Caller-supplied parameter violates a precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required association is missing at read time. Unreachable when the
    /// presence invariants hold; surfaced rather than papered over.
    #[error("Missing reference: {0}")]
    MissingReference(&'static str),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Vec<Violation>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::MissingReference(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let violations = match &self {
            AppError::Validation(err) => Some(err.violations.clone()),
            _ => None,
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
                violations,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rule;

    #[test]
    fn validation_maps_to_unprocessable_entity() {
        let err = AppError::Validation(ValidationError {
            violations: vec![Violation::new("title", Rule::Required)],
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn auth_failure_is_generic_and_unauthorized() {
        let err = AppError::AuthenticationFailed;
        assert_eq!(err.to_string(), "Invalid login");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
