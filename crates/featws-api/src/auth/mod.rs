//! Request authentication
//!
//! The chain is a comma-separated list of modes, ORed: a request is
//! accepted as soon as any configured authenticator succeeds.

mod jwks;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, Error, Result};
use crate::server::SharedState;

pub use jwks::JwksCache;

/// One authenticator in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Accept every request
    None,
    /// `X-API-Key` header must equal the configured secret
    ApiKey,
    /// `Authorization: Bearer` token validated against the JWKS set
    OpenAm,
}

impl AuthMode {
    /// Parse a comma-separated chain, e.g. `"api_key,openam"`
    pub fn parse_chain(chain: &str) -> Result<Vec<AuthMode>> {
        chain
            .split(',')
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
            .map(|mode| match mode {
                "none" => Ok(AuthMode::None),
                "api_key" => Ok(AuthMode::ApiKey),
                "openam" => Ok(AuthMode::OpenAm),
                other => Err(Error::config(format!("unknown auth mode: {other}"))),
            })
            .collect()
    }
}

/// Authenticator chain plus its shared resources
pub struct AuthState {
    pub modes: Vec<AuthMode>,
    pub api_key: String,
    pub jwks: Option<Arc<JwksCache>>,
}

impl AuthState {
    /// Chain with no authentication, for tests and SQL-only setups
    pub fn open() -> Self {
        Self {
            modes: vec![AuthMode::None],
            api_key: String::new(),
            jwks: None,
        }
    }

    async fn allows(&self, headers: &HeaderMap) -> bool {
        for mode in &self.modes {
            let accepted = match mode {
                AuthMode::None => true,
                AuthMode::ApiKey => self.check_api_key(headers),
                AuthMode::OpenAm => self.check_bearer(headers).await,
            };
            if accepted {
                return true;
            }
        }
        false
    }

    fn check_api_key(&self, headers: &HeaderMap) -> bool {
        if self.api_key.is_empty() {
            return false;
        }
        headers
            .get("X-API-Key")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == self.api_key)
    }

    async fn check_bearer(&self, headers: &HeaderMap) -> bool {
        let Some(jwks) = &self.jwks else {
            return false;
        };
        let Some(token) = headers
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };
        jwks.verify(token).await
    }
}

/// Middleware applied to every `/api/v1` route
pub async fn authenticate(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    if state.auth.allows(request.headers()).await {
        next.run(request).await
    } else {
        ApiError::Unauthorized.into_response()
    }
}
