//! HTTP client for the chemviz API
//!
//! Used by the `chemviz-client` binary: login, upload, history listing and
//! report download.

pub mod display;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::models::{
    ErrorBody, FileDetail, FileEntry, LoginRequest, LoginResponse, UploadResponse,
};
use crate::report::ReportFormat;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{} ({status}): {}", .body.error, .body.message)]
    Api { status: StatusCode, body: ErrorBody },

    #[error("server returned status {0}")]
    Status(StatusCode),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How requests authenticate.
#[derive(Clone)]
pub enum Credentials {
    Basic { username: String, password: String },
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => write!(f, "Basic({username})"),
            Self::Token(_) => write!(f, "Token(<redacted>)"),
        }
    }
}

/// HTTP client for one chemviz server
#[derive(Clone)]
pub struct ChemvizClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ChemvizClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => {
                request.header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
            }
        }
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(self.url("/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = check(resp).await?.json().await?;
        Ok(body.token)
    }

    /// Upload a CSV file from disk.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map_or_else(|| "upload.csv".to_string(), |n| n.to_string_lossy().into_owned());
        self.upload_bytes(&filename, bytes).await
    }

    /// Upload CSV content as a multipart `file` part.
    pub async fn upload_bytes(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let resp = self
            .authorize(self.http.post(self.url("/upload")))
            .multipart(form)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Retained uploads, newest first.
    pub async fn list_files(&self) -> Result<Vec<FileEntry>, ClientError> {
        let resp = self.authorize(self.http.get(self.url("/files"))).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn get_file(&self, id: u64) -> Result<FileDetail, ClientError> {
        let resp = self
            .authorize(self.http.get(self.url(&format!("/files/{id}"))))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Download the rendered report document.
    pub async fn download_report(
        &self,
        id: u64,
        format: ReportFormat,
    ) -> Result<Vec<u8>, ClientError> {
        let resp = self
            .authorize(self.http.get(self.url(&format!("/report/{id}"))))
            .query(&[("format", format.extension())])
            .send()
            .await?;
        Ok(check(resp).await?.bytes().await?.to_vec())
    }
}

/// Turn non-2xx responses into [`ClientError`], keeping the server's error body.
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match resp.json::<ErrorBody>().await {
        Ok(body) => Err(ClientError::Api { status, body }),
        Err(_) => Err(ClientError::Status(status)),
    }
}
