//! Client configuration.

use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Default API root for the remote calendar.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Zone every displayed and submitted time is expressed in.
///
/// Deliberately a single configured zone rather than the host locale, so
/// that rendered and submitted times are consistent regardless of where
/// the client runs. The default preserves the upstream product's zone.
pub const DEFAULT_DISPLAY_ZONE: Tz = chrono_tz::Asia::Karachi;

/// Configuration for the remote calendar client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root URL. Must end with a trailing slash so endpoint paths
    /// join underneath it.
    pub base_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Fixed display/submission time zone.
    pub display_zone: Tz,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("calview/", env!("CARGO_PKG_VERSION")).to_string(),
            display_zone: DEFAULT_DISPLAY_ZONE,
        }
    }
}

impl ClientConfig {
    /// Creates a config pointing at a different API root (e.g. a test
    /// server). The URL is normalized to carry a trailing slash.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> ApiResult<Self> {
        let raw = base_url.as_ref();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        self.base_url = Url::parse(&normalized)
            .map_err(|e| ApiError::transport(format!("invalid base url {raw}: {e}")))?;
        Ok(self)
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the display zone.
    pub fn with_display_zone(mut self, zone: Tz) -> Self {
        self.display_zone = zone;
        self
    }

    /// Resolves an endpoint path relative to the API root.
    pub(crate) fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::transport(format!("invalid endpoint {path}: {e}")))
    }
}
