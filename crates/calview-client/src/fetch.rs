//! Paginated calendar-view fetch.
//!
//! Retrieves the complete entry set for a time window, following the
//! server's continuation links until none remains. The fetch is
//! all-or-nothing per window: any page failure discards what was already
//! retrieved, so a partially paged window is never presented as complete.
//! No automatic retry; the caller decides.

use calview_core::TimeWindow;
use chrono::SecondsFormat;
use tracing::{debug, trace};
use url::Url;

use crate::client::GraphClient;
use crate::error::{ApiError, ApiResult};
use crate::raw::{EventPage, RawEvent};

/// Upper bound on continuation links followed per window. A server that
/// keeps producing next links past this is treated as broken.
pub const MAX_PAGES: usize = 100;

/// Requests UTC wall times in responses.
const PREFER_UTC: &str = r#"outlook.timezone="UTC""#;

impl GraphClient {
    /// Fetches every entry in `window`, in server order.
    ///
    /// Builds the initial request from the window's ISO-8601 bounds, then
    /// follows each `@odata.nextLink` until a page arrives without one.
    /// The link fully replaces the request URL, query and all.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] when the credential is rejected,
    /// [`ApiError::Transport`] on network failure, non-success status, an
    /// unparseable page, or runaway pagination. In every failure case the
    /// partial result is discarded.
    pub async fn fetch_window(&self, window: &TimeWindow, token: &str) -> ApiResult<Vec<RawEvent>> {
        let mut url = self.config.endpoint("me/calendarView")?;
        url.query_pairs_mut()
            .append_pair(
                "startDateTime",
                &window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair(
                "endDateTime",
                &window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            );

        let mut events = Vec::new();

        for page_index in 0..=MAX_PAGES {
            if page_index == MAX_PAGES {
                return Err(ApiError::transport(format!(
                    "pagination did not terminate within {MAX_PAGES} pages"
                )));
            }

            let page = self.fetch_page(&url, token).await?;
            trace!(page_index, entries = page.value.len(), "fetched calendar page");
            events.extend(page.value);

            match page.next_link {
                Some(next) => {
                    url = Url::parse(&next).map_err(|e| {
                        ApiError::transport(format!("invalid continuation link {next}: {e}"))
                    })?;
                }
                None => break,
            }
        }

        debug!(
            entries = events.len(),
            window_start = %window.start,
            window_end = %window.end,
            "fetched calendar window"
        );
        Ok(events)
    }

    /// Fetches and parses a single page.
    async fn fetch_page(&self, url: &Url, token: &str) -> ApiResult<EventPage> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .header("Prefer", PREFER_UTC)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        if let Some(auth) = Self::auth_rejection(status) {
            return Err(auth);
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(ApiError::transport_status(
                status.as_u16(),
                format!("calendar view request failed: {body}"),
            ));
        }

        response
            .json::<EventPage>()
            .await
            .map_err(|e| ApiError::transport(format!("failed to parse calendar page: {e}")))
    }
}
