//! `AppConfig` and its loader

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CHEMVIZ_CONFIG";

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub max_upload_bytes: usize,
    /// Allowed CORS origins; empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            cors_origins: Vec::new(),
        }
    }
}

/// The single account every request is checked against.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: defaults::USERNAME.to_string(),
            password: defaults::PASSWORD.to_string(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    /// Sled directory. `None` keeps history in memory only.
    pub db_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::HISTORY_CAPACITY,
            db_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub precision: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: defaults::REPORT_PRECISION,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub history: HistoryConfig,
    pub report: ReportConfig,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load using the standard search order, then apply `CHEMVIZ_*` overrides.
    ///
    /// A broken file named by `CHEMVIZ_CONFIG` is logged and skipped.
    pub fn load() -> Self {
        let mut config = Self::load_file_or_default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    fn load_file_or_default() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {CONFIG_ENV}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV} points to non-existent file, falling back");
            }
        }

        let local = Path::new(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded config from working directory");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load {}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file.
    ///
    /// Unknown keys are logged with a suggested correction but never fail
    /// the load.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text, warning about unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        for warning in super::validation::validate_unknown_keys(contents) {
            warn!("{}", warning);
        }
        toml::from_str(contents)
    }

    /// Apply `CHEMVIZ_*` overrides from `lookup` (normally the environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("CHEMVIZ_SERVER_ADDR") {
            self.server.addr = addr;
        }
        if let Some(username) = lookup("CHEMVIZ_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = lookup("CHEMVIZ_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(origins) = lookup("CHEMVIZ_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(db_path) = lookup("CHEMVIZ_HISTORY_DB") {
            self.history.db_path = Some(PathBuf::from(db_path));
        }
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.auth.username.trim().is_empty() {
            errors.push("auth.username must not be empty".to_string());
        }
        if self.auth.password.is_empty() {
            errors.push("auth.password must not be empty".to_string());
        }
        if self.auth.username.contains(':') {
            errors.push("auth.username must not contain ':'".to_string());
        }
        if self.history.capacity == 0 {
            errors.push("history.capacity must be at least 1".to_string());
        }
        if self.report.precision > defaults::MAX_REPORT_PRECISION {
            errors.push(format!(
                "report.precision must be at most {}",
                defaults::MAX_REPORT_PRECISION
            ));
        }
        if self.server.max_upload_bytes == 0 {
            errors.push("server.max_upload_bytes must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Whether the built-in development credentials are still in use.
    pub fn uses_default_credentials(&self) -> bool {
        self.auth == AuthConfig::default()
    }
}
