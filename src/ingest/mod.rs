//! CSV ingestion and validation
//!
//! Turns raw upload bytes into a [`ValidationResult`]:
//! - `columns`: header lookup (case-insensitive, order-independent)
//! - `parser`: per-row numeric coercion with row-level error collection
//!
//! Only schema problems fail the whole upload. Bad numeric values exclude
//! their row and are reported alongside the valid rows.

mod columns;
mod parser;

pub use columns::ColumnMap;
pub use parser::{parse_reader, parse_str};

use crate::types::Column;

/// Upload-fatal ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// One or more required columns are absent from the header row.
    #[error("missing required column(s): {}", format_columns(.missing))]
    Schema { missing: Vec<Column> },

    /// The input could not be read as CSV at all.
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Canonical header names, comma separated.
pub(crate) fn format_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(", ")
}
