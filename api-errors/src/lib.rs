//! Structured JSON error responses for HTTP APIs.
//!
//! Handlers return [`ApiError`]; [`handle_api_error`] classifies it into a
//! validation, domain or internal failure, logs it once and renders an
//! [`ErrorResponse`] with the matching status code.

pub mod config;
pub mod domain;
pub mod error;
pub mod projects;
pub mod response;
pub mod rest;
pub mod test_helpers;
pub mod validation;

use crate::config::ProjectsConfig;
use crate::projects::ProjectStore;
use secrecy::Secret;

pub use domain::{DomainError, HttpError};
pub use error::{handle_api_error, unauthorized_response, ApiError, ErrorReply};
pub use projects::ProjectError;
pub use response::{ErrorDetails, ErrorResponse};
pub use validation::{Issue, PathSegment, ValidationError};

pub struct AppState {
    auth_token: Option<Secret<String>>,
    projects: ProjectStore,
}

impl AppState {
    pub fn new(auth_token: Option<Secret<String>>, projects_config: ProjectsConfig) -> Self {
        Self {
            auth_token,
            projects: ProjectStore::new(projects_config.max_projects),
        }
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }
}
