//! HTTP error mapping
//!
//! Every failure leaves the API as `{ "error": "<Code>", "message": "..." }`
//! with the matching status. Schema errors also list the missing columns.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use super::models::ErrorBody;
use crate::ingest::{format_columns, IngestError};
use crate::report::RenderError;
use crate::storage::StorageError;
use crate::types::Column;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing required column(s): {}", format_columns(.missing))]
    Schema { missing: Vec<Column> },

    #[error("{0}")]
    InvalidUpload(String),

    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("{0}")]
    BadRequest(String),

    #[error("no upload with id {id}")]
    NotFound { id: u64 },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Stable error code used in response bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SchemaError",
            Self::InvalidUpload(_) => "InvalidUpload",
            Self::PayloadTooLarge { .. } => "PayloadTooLarge",
            Self::BadRequest(_) => "BadRequest",
            Self::NotFound { .. } => "NotFoundError",
            Self::Render(_) => "RenderError",
            Self::Auth(_) => "AuthError",
            Self::Internal(_) => "InternalError",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Schema { .. } | Self::InvalidUpload(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Render(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Schema { missing } => Self::Schema { missing },
            IngestError::Malformed(e) => Self::InvalidUpload(format!("malformed CSV: {e}")),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => Self::NotFound { id },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        } else {
            warn!(code = self.code(), status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
            missing: match &self {
                Self::Schema { missing } => {
                    Some(missing.iter().map(|c| c.header().to_string()).collect())
                }
                _ => None,
            },
        };

        if matches!(self, Self::Auth(_)) {
            (
                status,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="chemviz""#)],
                Json(body),
            )
                .into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_schema_error_lists_missing_columns() {
        let resp = ApiError::Schema {
            missing: vec![Column::Type, Column::Pressure],
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let v = body_json(resp).await;
        assert_eq!(v["error"], "SchemaError");
        assert_eq!(v["missing"], serde_json::json!(["Type", "Pressure"]));
    }

    #[tokio::test]
    async fn test_not_found_shape() {
        let resp = ApiError::from(StorageError::NotFound(9)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let v = body_json(resp).await;
        assert_eq!(v["error"], "NotFoundError");
        assert_eq!(v["message"], "no upload with id 9");
        assert!(v.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_auth_error_challenges_basic() {
        let resp = ApiError::Auth("missing credentials".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_some());
    }

    #[test]
    fn test_render_error_is_server_error() {
        let err = ApiError::from(RenderError::NonFinite {
            id: 1,
            field: "Flowrate",
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "RenderError");
    }
}
