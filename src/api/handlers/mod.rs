//! API route handlers
//!
//! - `login`: exchange credentials for a session token
//! - `upload`: ingest a CSV file, summarize it, record it in history
//! - `files`: list history, fetch one record
//! - `report`: render the downloadable document

mod files;
mod login;
mod report;
mod upload;

pub use files::*;
pub use login::*;
pub use report::*;
pub use upload::*;

use std::sync::Arc;

use super::auth::Authenticator;
use crate::config::AppConfig;
use crate::storage::HistoryStore;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Bounded upload history; the only state shared across requests
    pub history: HistoryStore,
    /// Account check and issued session tokens
    pub auth: Arc<Authenticator>,
    /// Decimal places for chart payloads and reports
    pub precision: u32,
    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
    /// Allowed CORS origins; empty means same-origin only
    pub cors_origins: Vec<String>,
}

impl ApiState {
    pub fn new(config: &AppConfig, history: HistoryStore) -> Self {
        Self {
            history,
            auth: Arc::new(Authenticator::new(
                config.auth.username.clone(),
                config.auth.password.clone(),
            )),
            precision: config.report.precision,
            max_upload_bytes: config.server.max_upload_bytes,
            cors_origins: config.server.cors_origins.clone(),
        }
    }
}
