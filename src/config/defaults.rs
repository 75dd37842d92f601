//! Default configuration values.

// ============================================================================
// Server
// ============================================================================

/// HTTP bind address.
pub const SERVER_ADDR: &str = "127.0.0.1:8080";

/// Largest accepted upload body (bytes). 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ============================================================================
// Auth
// ============================================================================

/// Development account. Override with `CHEMVIZ_USERNAME` / `CHEMVIZ_PASSWORD`.
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin";

// ============================================================================
// History & Reports
// ============================================================================

/// Uploads kept in history.
pub const HISTORY_CAPACITY: usize = crate::storage::DEFAULT_CAPACITY;

/// Decimal places in chart payloads and reports.
pub const REPORT_PRECISION: u32 = crate::report::DEFAULT_PRECISION;

/// Upper bound on configurable precision.
pub const MAX_REPORT_PRECISION: u32 = 6;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "chemviz.toml";
