use std::sync::Arc;

use crate::{
    domain::DomainError,
    error::{handle_api_error, ApiError, ErrorReply},
    projects::{CreateProject, Project, ProjectPath},
    rest::extract::{ValidatedJson, ValidatedPath},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::Json};

#[tracing::instrument(skip_all)]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects().list()?))
}

#[tracing::instrument(skip(state, input), fields(name = %input.name))]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.projects().create(input)?;
    tracing::info!(id = project.id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

#[tracing::instrument(skip(state, path), fields(id = path.id))]
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    ValidatedPath(path): ValidatedPath<ProjectPath>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects().get(path.id)?))
}

#[tracing::instrument(skip(state, path), fields(id = path.id))]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    ValidatedPath(path): ValidatedPath<ProjectPath>,
) -> Result<StatusCode, ApiError> {
    state.projects().delete(path.id)?;
    tracing::info!("project deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn route_not_found() -> ErrorReply {
    handle_api_error(DomainError::not_found("NOT_FOUND", "Route not found"))
}

pub async fn method_not_allowed() -> ErrorReply {
    handle_api_error(DomainError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "Method not allowed",
    ))
}
