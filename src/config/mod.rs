//! Service configuration
//!
//! Loaded from TOML with environment overrides.
//!
//! ## Loading Order
//!
//! 1. `--config <path>` on the command line
//! 2. `CHEMVIZ_CONFIG` environment variable (path to TOML file)
//! 3. `chemviz.toml` in the current working directory
//! 4. Built-in defaults
//!
//! `CHEMVIZ_*` environment variables are applied on top of whichever source
//! won. The resulting [`AppConfig`] is passed to the server explicitly; there
//! is no process-wide config singleton.

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;
