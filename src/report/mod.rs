//! Report formatting
//!
//! Two representations of one upload's summary:
//! - [`ChartSummary`]: JSON payload for chart widgets, numbers rounded
//! - [`ReportDocument`]: downloadable document, rendered as text or PDF
//!
//! Formatting never mutates the summary. A document that cannot be rendered
//! completely fails with [`RenderError`]; no partial output is produced.

mod chart;
mod document;
mod pdf;
mod text;

pub use chart::{ChartSummary, Range, Ranges, TypeCount, Units};
pub use document::{DocumentLine, ReportDocument};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decimal places used when none is configured.
pub const DEFAULT_PRECISION: u32 = 2;

/// Report generation failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The stored summary disagrees with its record.
    #[error("summary for upload {id} is inconsistent: {reason}")]
    Inconsistent { id: u64, reason: String },

    /// A statistic is NaN or infinite.
    #[error("summary for upload {id} contains a non-finite {field}")]
    NonFinite { id: u64, field: &'static str },

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloadable document encodings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Txt,
}

impl ReportFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Txt => "text/plain; charset=utf-8",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(format!("unknown report format '{other}' (expected pdf or txt)")),
        }
    }
}

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let scaled = (value * factor).round() / factor;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}
