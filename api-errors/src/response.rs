//! Wire format of error responses.
//!
//! Every error leaving the API is serialized as an [`ErrorResponse`]:
//!
//! ```json
//! { "message": "Validation failed", "code": "VALIDATION_ERROR", "details": { "fields": { "name": ["..."] } } }
//! ```
//!
//! `details` is only present for validation failures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Per-field validation messages keyed by dotted path, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub fields: IndexMap<String, Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }
}
