//! API route definitions

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Create all API routes
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/upload", post(handlers::upload))
        .route("/files", get(handlers::list_files))
        .route("/files/:id", get(handlers::get_file))
        .route("/report/:id", get(handlers::get_report))
        .with_state(state)
}
