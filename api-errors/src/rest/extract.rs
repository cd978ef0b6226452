use axum::{
    async_trait,
    extract::{
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    domain::DomainError,
    error::ApiError,
    validation::{Issue, ValidationError},
};

/// JSON body that has been deserialized and then checked with
/// [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            ValidationError::new()
                .with_issue(Issue::root(rejection.body_text()))
                .into()
        }
        JsonRejection::MissingJsonContentType(_) => DomainError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            rejection.body_text(),
        )
        .into(),
        other => DomainError::new(other.status(), "INVALID_REQUEST", other.body_text()).into(),
    }
}

/// Path parameters whose parse failures are reported as validation issues
/// keyed by parameter name.
///
/// Deserialize into a struct so the parameter name is known, e.g.
/// `ValidatedPath<ProjectPath>` for `/projects/:id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection_to_error)?;
        Ok(Self(value))
    }
}

fn path_rejection_to_error(rejection: PathRejection) -> ApiError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            let issue = match err.kind() {
                ErrorKind::ParseErrorAtKey {
                    key,
                    value,
                    expected_type,
                } => Issue::new(
                    [key.as_str()],
                    format!("Cannot parse `{value}` as `{expected_type}`"),
                ),
                _ => Issue::root(err.body_text()),
            };
            ValidationError::new().with_issue(issue).into()
        }
        // Route and extractor disagree on the parameters.
        PathRejection::MissingPathParams(err) => anyhow::Error::msg(err.body_text()).into(),
        other => DomainError::new(other.status(), "INVALID_REQUEST", other.body_text()).into(),
    }
}

