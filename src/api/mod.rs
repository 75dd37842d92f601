//! REST API module using Axum
//!
//! Endpoints (all require authentication except `/login`):
//! - `POST /login`: exchange credentials for a session token
//! - `POST /upload`: ingest a CSV file, return its summary and row errors
//! - `GET /files`: the most recent uploads, newest first
//! - `GET /files/{id}`: one upload with its chart summary
//! - `GET /report/{id}`: downloadable PDF or text report

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
mod routes;

pub use error::ApiError;
pub use handlers::ApiState;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// `server.cors_origins` (or `CHEMVIZ_CORS_ORIGINS`) lists the origins allowed
/// for development, e.g. `http://localhost:5173` for a Vite dev server.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return base;
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let cors = build_cors_layer(&state.cors_origins);
    let body_limit = state.max_upload_bytes;

    routes::api_routes(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
