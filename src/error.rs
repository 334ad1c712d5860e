use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::store::StoreError,
    state::{match_machine::InvalidTransition, timesheet_machine::WorkflowViolation},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Store backend is unavailable.
    #[error("store unavailable")]
    Unavailable(#[source] StoreError),
    /// No authenticated caller.
    #[error("unauthenticated")]
    Unauthenticated,
    /// Caller is authenticated but lacks the required role or permission.
    ///
    /// Carries no detail: the response never names the role or permission
    /// that would have sufficed. Specifics go to the audit log only.
    #[error("insufficient permissions")]
    Forbidden,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Match status change not reachable from the current status.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// Timesheet action not reachable from the current status.
    #[error(transparent)]
    WorkflowViolation(#[from] WorkflowViolation),
    /// Operation not valid in the current state for other reasons.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The underlying record changed since it was fetched; retryable.
    #[error("conflicting write: {0}")]
    StaleWrite(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Operation exceeded its timeout limit.
    #[error("operation timed out")]
    Timeout,
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { message } => ServiceError::StaleWrite(message),
            unavailable => ServiceError::Unavailable(unavailable),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthenticated caller; body stays generic.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Authenticated caller without sufficient permissions; body stays
    /// generic.
    #[error("forbidden: insufficient permissions")]
    Forbidden,
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state (illegal transitions, stale writes).
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {err}"))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Unauthenticated => {
                AppError::Unauthorized("authentication required".into())
            }
            ServiceError::Forbidden => AppError::Forbidden,
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidTransition(invalid) => AppError::Conflict(invalid.to_string()),
            ServiceError::WorkflowViolation(violation) => {
                AppError::Conflict(violation.to_string())
            }
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::StaleWrite(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Timeout => AppError::ServiceUnavailable("operation timed out".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
