pub mod extract;
mod middleware;
pub mod routes;

use std::{any::Any, sync::Arc};

use crate::{error::handle_api_error, ApiError, AppState};
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Routes that require authentication.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/projects",
            get(routes::list_projects)
                .post(routes::create_project)
                .fallback(routes::method_not_allowed),
        )
        .route(
            "/projects/:id",
            get(routes::get_project)
                .delete(routes::delete_project)
                .fallback(routes::method_not_allowed),
        )
}

pub fn app(state: AppState) -> Router {
    app_with(routes(), state)
}

/// Wraps `routes` with auth, panic recovery and request tracing.
///
/// Unknown paths get a JSON 404 without going through auth.
pub fn app_with(routes: Router<Arc<AppState>>, state: AppState) -> Router {
    let state = Arc::new(state);
    let protected = routes.route_layer(axum::middleware::from_fn_with_state(
        Arc::clone(&state),
        middleware::auth_middleware,
    ));

    Router::new()
        .route(
            "/health",
            get(|| async { "Ok" }).fallback(routes::method_not_allowed),
        )
        .merge(protected)
        .fallback(routes::route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(1_000_000 /* 1MB */))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    handle_api_error(ApiError::from_panic(payload)).into_response()
}
