//! Request and response bodies
//!
//! Shared by the server handlers and [`crate::client::ChemvizClient`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::ChartSummary;
use crate::types::{RowParseError, UploadRecord};

/// `POST /upload` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub summary: ChartSummary,
    /// Rows excluded by validation; empty when every row was valid.
    pub row_errors: Vec<RowParseError>,
}

/// One entry of `GET /files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&UploadRecord> for FileEntry {
    fn from(record: &UploadRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename.clone(),
            uploaded_at: record.uploaded_at,
        }
    }
}

/// `GET /files/{id}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    pub id: u64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub row_count: usize,
    pub error_count: usize,
    pub checksum: String,
    pub summary: ChartSummary,
}

impl FileDetail {
    pub fn from_record(record: &UploadRecord, precision: u32) -> Self {
        Self {
            id: record.id,
            filename: record.filename.clone(),
            uploaded_at: record.uploaded_at,
            row_count: record.row_count,
            error_count: record.error_count,
            checksum: record.checksum.clone(),
            summary: ChartSummary::from_summary(&record.summary, precision),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}
