//! Shared data types for chemviz
//!
//! - `equipment`: parsed CSV rows, row-level errors, validation results
//! - `summary`: aggregated statistics for one upload
//! - `upload`: history records

pub mod equipment;
pub mod summary;
pub mod upload;

pub use equipment::{Column, EquipmentRow, RowErrorReason, RowParseError, ValidationResult};
pub use summary::{Measure, ParameterStats, SummaryStats};
pub use upload::{NewUpload, UploadRecord};
