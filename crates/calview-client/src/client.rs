//! HTTP client for the remote calendar API.
//!
//! [`GraphClient`] owns the underlying HTTP machinery: TLS, timeouts, the
//! bearer header, and the mapping from transport/status failures into the
//! error taxonomy. The fetch and mutation operations build on it from
//! [`crate::fetch`] and [`crate::mutate`].

use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// Client for the token-authenticated calendar API.
#[derive(Debug)]
pub struct GraphClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
}

impl GraphClient {
    /// Creates a client with the given configuration.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Creates a client with default configuration.
    pub fn with_defaults() -> ApiResult<Self> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Maps a request-level failure (connect, timeout, TLS) to the taxonomy.
    pub(crate) fn request_error(error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::transport("request timeout")
        } else if error.is_connect() {
            ApiError::transport(format!("connection failed: {error}"))
        } else {
            ApiError::transport(format!("request failed: {error}"))
        }
    }

    /// Returns the credential-rejection error for a status, if it is one.
    ///
    /// 401 and 403 both mean the bearer credential is not usable; they are
    /// kept distinct from other failures so callers surface
    /// "re-authenticate" instead of "try again later".
    pub(crate) fn auth_rejection(status: StatusCode) -> Option<ApiError> {
        match status {
            StatusCode::UNAUTHORIZED => Some(ApiError::auth("bearer token expired or invalid")),
            StatusCode::FORBIDDEN => Some(ApiError::auth("access to calendar denied")),
            _ => None,
        }
    }

    /// Reads a response body for error reporting, tolerating read failures.
    pub(crate) async fn error_body(response: reqwest::Response) -> String {
        response.text().await.unwrap_or_default()
    }
}
