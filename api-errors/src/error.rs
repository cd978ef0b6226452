//! Error types for the API and their conversion into HTTP responses.
//!
//! Every failure a handler can produce is one of the [`ApiError`] variants.
//! [`handle_api_error`] turns it into a status code and an
//! [`ErrorResponse`] body and logs it exactly once:
//!
//! - `Validation` errors return `400 Bad Request` with per-field details
//! - `Domain` errors return their own status, code and message
//! - `Internal` errors return an opaque `500 Internal Server Error`; the
//!   cause only goes to the log

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    domain::DomainError,
    projects::ProjectError,
    response::{ErrorResponse, INTERNAL_ERROR, UNAUTHORIZED, VALIDATION_ERROR},
    validation::ValidationError,
};

const LOG_TARGET: &str = "api.errors";

/// Message logged for failures that carry no message of their own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client input failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Business-rule failure with its own status and code
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Unexpected errors that don't fit other categories
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Converts the payload of a caught panic.
    ///
    /// Panic messages are kept for the log; any other payload is reported
    /// as [`UNKNOWN_ERROR`].
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else {
            UNKNOWN_ERROR.to_string()
        };
        Self::Internal(anyhow::Error::msg(message))
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

/// Status code and body of an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Classifies `error`, logs it and builds the response for it.
pub fn handle_api_error(error: impl Into<ApiError>) -> ErrorReply {
    match error.into() {
        ApiError::Validation(err) => {
            tracing::warn!(target: LOG_TARGET, error = %err, "api.validation_failed");
            ErrorReply {
                status: StatusCode::BAD_REQUEST,
                body: ErrorResponse::new("Validation failed", VALIDATION_ERROR)
                    .with_details(err.details()),
            }
        }
        ApiError::Domain(err) => {
            if err.status().as_u16() >= 500 {
                tracing::error!(target: LOG_TARGET, error = %err, code = err.code(), "api.error");
            } else {
                tracing::warn!(target: LOG_TARGET, error = %err, code = err.code(), "api.error");
            }
            ErrorReply {
                status: err.status(),
                body: ErrorResponse::new(err.message(), err.code()),
            }
        }
        ApiError::Internal(err) => {
            let message = format!("{err:#}");
            let message = if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            };
            tracing::error!(target: LOG_TARGET, error = %message, "api.internal_error");
            ErrorReply {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: ErrorResponse::new("Internal server error", INTERNAL_ERROR),
            }
        }
    }
}

/// Response for requests without valid credentials.
pub fn unauthorized_response() -> ErrorReply {
    ErrorReply {
        status: StatusCode::UNAUTHORIZED,
        body: ErrorResponse::new("Authentication required", UNAUTHORIZED),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        handle_api_error(self).into_response()
    }
}
