//! Report download

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::debug;

use super::ApiState;
use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::report::{ReportDocument, ReportFormat};

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// `pdf` (default) or `txt`
    pub format: Option<String>,
}

/// GET /report/{id}?format=pdf|txt
///
/// Returns the rendered document as an attachment.
pub async fn get_report(
    State(state): State<ApiState>,
    _auth: Authenticated,
    ApiPath(id): ApiPath<u64>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        None => ReportFormat::default(),
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
    };

    let record = state.history.get(id)?;
    let bytes = ReportDocument::build(&record, state.precision)?.render(format)?;
    debug!(id, format = ?format, bytes = bytes.len(), "Report rendered");

    let disposition = format!(
        "attachment; filename=\"report_{id}.{}\"",
        format.extension()
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::process_upload;
    use crate::api::handlers::test_support::*;

    const CSV: &[u8] = b"Equipment Name,Type,Flowrate,Pressure,Temperature\nP,Pump,1,2,3\n";

    async fn fetch(state: ApiState, id: u64, format: Option<&str>) -> Result<Response, ApiError> {
        get_report(
            State(state),
            authenticated(),
            ApiPath(id),
            ApiQuery(ReportQuery {
                format: format.map(str::to_string),
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_pdf_is_default() {
        let state = create_test_state();
        let id = process_upload(&state, "a.csv", CSV).unwrap().id;

        let resp = fetch(state, id, None).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"report_{id}.pdf\"")
        );

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_text_report() {
        let state = create_test_state();
        let id = process_upload(&state, "a.csv", CSV).unwrap().id;

        let resp = fetch(state, id, Some("txt")).await.unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("File: a.csv"));
        assert!(text.contains("Average Pressure: 2.00 bar"));
    }

    #[tokio::test]
    async fn test_unknown_id_and_format() {
        let state = create_test_state();
        assert!(matches!(
            fetch(state.clone(), 3, None).await,
            Err(ApiError::NotFound { id: 3 })
        ));

        let id = process_upload(&state, "a.csv", CSV).unwrap().id;
        assert!(matches!(
            fetch(state, id, Some("docx")).await,
            Err(ApiError::BadRequest(_))
        ));
    }
}
