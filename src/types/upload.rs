//! Upload history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::summary::SummaryStats;

/// Everything the history store needs to create a record.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub filename: String,
    pub row_count: usize,
    pub error_count: usize,
    /// md5 hex digest of the raw upload.
    pub checksum: String,
    pub summary: SummaryStats,
}

/// Metadata and summary for one of the most recent uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Assigned in upload order, never reused.
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub row_count: usize,
    pub error_count: usize,
    pub checksum: String,
    pub summary: SummaryStats,
}

impl UploadRecord {
    pub fn from_new(id: u64, uploaded_at: DateTime<Utc>, upload: NewUpload) -> Self {
        Self {
            id,
            filename: upload.filename,
            uploaded_at,
            row_count: upload.row_count,
            error_count: upload.error_count,
            checksum: upload.checksum,
            summary: upload.summary,
        }
    }
}

/// md5 hex digest of raw upload bytes.
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
