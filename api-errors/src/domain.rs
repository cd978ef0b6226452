//! Domain errors that carry their own status and machine-readable code.

use std::borrow::Cow;

use axum::http::StatusCode;
use thiserror::Error;

/// An application error that knows how it should be reported over HTTP.
///
/// Feature error enums implement this and convert into [`DomainError`] at
/// the API boundary.
pub trait HttpError: std::error::Error {
    /// Stable machine-readable code, e.g. `PROJECT_NOT_FOUND`.
    fn code(&self) -> &'static str;

    fn status_code(&self) -> StatusCode;
}

/// A business-rule failure reported to the client with its own message,
/// code and status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
    status: StatusCode,
    code: Cow<'static, str>,
    message: String,
}

impl DomainError {
    pub fn new(
        status: StatusCode,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        let mut code = code.into();
        if code.is_empty() {
            code = Cow::Borrowed("DOMAIN_ERROR");
        }
        let mut message = message.into();
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("Error").to_string();
        }
        Self {
            status,
            code,
            message,
        }
    }

    pub fn bad_request(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn forbidden(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn conflict(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    pub fn unavailable(code: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<E> From<E> for DomainError
where
    E: HttpError,
{
    fn from(error: E) -> Self {
        Self::new(error.status_code(), error.code(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("quota of {0} exceeded")]
    struct QuotaExceeded(u32);

    impl HttpError for QuotaExceeded {
        fn code(&self) -> &'static str {
            "QUOTA_EXCEEDED"
        }

        fn status_code(&self) -> StatusCode {
            StatusCode::TOO_MANY_REQUESTS
        }
    }

    #[test]
    fn http_errors_convert_verbatim() {
        let error = DomainError::from(QuotaExceeded(3));
        assert_eq!(error.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(error.code(), "QUOTA_EXCEEDED");
        assert_eq!(error.message(), "quota of 3 exceeded");
    }

    #[test]
    fn empty_message_and_code_are_filled_in() {
        let error = DomainError::new(StatusCode::FORBIDDEN, "", "");
        assert_eq!(error.code(), "DOMAIN_ERROR");
        assert_eq!(error.message(), "Forbidden");
    }

    #[test]
    fn shorthands_pick_status() {
        assert_eq!(
            DomainError::conflict("TAKEN", "taken").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::unavailable("DOWN", "down").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(DomainError::bad_request("BAD", "bad").to_string(), "bad");
    }
}
