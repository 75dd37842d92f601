//! Request authentication
//!
//! One configured account. Requests authenticate with either
//! `Authorization: Basic <base64(user:pass)>` or
//! `Authorization: Token <token>` where the token came from `POST /login`.
//! The account has a single session token, created on first login and
//! returned by every later one.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::Rng;
use std::sync::{PoisonError, RwLock};

use super::error::ApiError;
use super::handlers::ApiState;

/// Token length in bytes before hex encoding.
const TOKEN_BYTES: usize = 20;

/// How a request proved its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Basic,
    Token,
}

/// Checks credentials and holds the account's session token.
pub struct Authenticator {
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl Authenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token: RwLock::new(None),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }

    /// Session token for valid credentials, created on first use.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        if !self.verify(username, password) {
            return None;
        }
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        let token = slot.get_or_insert_with(|| {
            let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().gen();
            bytes.iter().map(|b| format!("{b:02x}")).collect()
        });
        Some(token.clone())
    }

    pub fn is_valid_token(&self, token: &str) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            .is_some_and(|t| t == token)
    }

    /// Validate an `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<Authenticated, ApiError> {
        let header = header.ok_or_else(|| ApiError::Auth("missing credentials".to_string()))?;
        let (scheme, value) = header
            .trim()
            .split_once(' ')
            .ok_or_else(|| ApiError::Auth("malformed Authorization header".to_string()))?;
        let value = value.trim();

        match scheme.to_ascii_lowercase().as_str() {
            "basic" => {
                let (username, password) = decode_basic(value)
                    .ok_or_else(|| ApiError::Auth("malformed Basic credentials".to_string()))?;
                if self.verify(&username, &password) {
                    Ok(Authenticated {
                        username,
                        method: AuthMethod::Basic,
                    })
                } else {
                    Err(ApiError::Auth("invalid username or password".to_string()))
                }
            }
            "token" | "bearer" => {
                if self.is_valid_token(value) {
                    Ok(Authenticated {
                        username: self.username.clone(),
                        method: AuthMethod::Token,
                    })
                } else {
                    Err(ApiError::Auth("invalid or expired token".to_string()))
                }
            }
            other => Err(ApiError::Auth(format!(
                "unsupported authorization scheme '{other}'"
            ))),
        }
    }
}

fn decode_basic(value: &str) -> Option<(String, String)> {
    let decoded = STANDARD.decode(value).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// `Basic` header value for a credential pair.
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Extractor for an authenticated caller. Rejects with 401.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub username: String,
    pub method: AuthMethod,
}

#[async_trait]
impl FromRequestParts<ApiState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        state.auth.authorize(header)
    }
}
