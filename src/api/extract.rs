//! Extractors that reject with [`ApiError`]
//!
//! Wrapping axum's `Json`, `Path` and `Query` keeps malformed bodies, ids and
//! query strings on the same `{ "error", "message" }` body as every other
//! failure.

use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ErrorBody;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Page {
        page: u32,
    }

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/items/:id",
                get(|ApiPath(id): ApiPath<u64>| async move { id.to_string() }),
            )
            .route(
                "/pages",
                get(|ApiQuery(q): ApiQuery<Page>| async move { q.page.to_string() }),
            )
            .route(
                "/named",
                post(|ApiJson(n): ApiJson<Named>| async move { n.name }),
            )
    }

    async fn send(req: Request<Body>) -> (StatusCode, Option<ErrorBody>) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).ok())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_bad_path_is_json_bad_request() {
        let (status, body) = send(get_req("/items/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap().error, "BadRequest");

        let (status, body) = send(get_req("/items/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_bad_query_is_json_bad_request() {
        let (status, body) = send(get_req("/pages?page=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = body.unwrap();
        assert_eq!(body.error, "BadRequest");
        assert!(!body.message.is_empty());
    }

    #[tokio::test]
    async fn test_bad_json_is_json_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/named")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap().error, "BadRequest");

        let req = Request::builder()
            .method("POST")
            .uri("/named")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing content type");
        assert!(body.is_some());
    }
}
