//! chemviz: Chemical Equipment Parameter Visualizer service
//!
//! Ingests CSV files describing chemical equipment (name, type, flowrate,
//! pressure, temperature), computes summary statistics, keeps a short upload
//! history and renders chart payloads and downloadable reports.
//!
//! ## Architecture
//!
//! - **Ingest**: CSV parsing, header matching, per-row validation
//! - **Aggregation**: means, ranges and type distribution
//! - **Report**: chart JSON and PDF/text documents
//! - **Storage**: bounded upload history (in memory or Sled)
//! - **API**: Axum REST surface with authentication
//! - **Client**: HTTP client used by `chemviz-client`

pub mod aggregation;
pub mod api;
pub mod client;
pub mod config;
pub mod ingest;
pub mod report;
pub mod storage;
pub mod types;

// Re-export the core pipeline
pub use aggregation::aggregate;
pub use ingest::{parse_reader, parse_str, IngestError};
pub use report::{ChartSummary, RenderError, ReportDocument, ReportFormat};

// Re-export commonly used types
pub use types::{
    Column, EquipmentRow, RowParseError, SummaryStats, UploadRecord, ValidationResult,
};

// Re-export storage and config
pub use config::AppConfig;
pub use storage::{HistoryStore, StorageError};
