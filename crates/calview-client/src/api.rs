//! The calendar API seam.
//!
//! [`CalendarApi`] is the boundary the sync engine depends on instead of a
//! concrete HTTP client. [`GraphClient`] is the production implementation;
//! tests substitute controllable fakes to exercise ordering and
//! reconciliation without a network.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use calview_core::TimeWindow;

use crate::client::GraphClient;
use crate::error::ApiResult;
use crate::mutate::{CreatedEvent, EventDraft};
use crate::raw::RawEvent;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations the sync engine performs against the remote calendar.
///
/// Methods take owned arguments so implementations can move them into the
/// returned future. Every call carries the bearer token explicitly; no
/// implementation holds ambient credential state.
pub trait CalendarApi: Send + Sync {
    /// Fetches the complete raw entry set for a window. All-or-nothing.
    fn fetch_window(
        &self,
        window: TimeWindow,
        token: String,
    ) -> BoxFuture<'_, ApiResult<Vec<RawEvent>>>;

    /// Creates an event from a draft.
    fn create_event(
        &self,
        draft: EventDraft,
        token: String,
    ) -> BoxFuture<'_, ApiResult<CreatedEvent>>;

    /// Replaces the field set of an existing event. Returns the server's
    /// echoed entry when it parses as one.
    fn update_event(
        &self,
        id: String,
        draft: EventDraft,
        token: String,
    ) -> BoxFuture<'_, ApiResult<Option<RawEvent>>>;

    /// Cancels an event, optionally with a note to attendees.
    fn cancel_event(
        &self,
        id: String,
        note: Option<String>,
        token: String,
    ) -> BoxFuture<'_, ApiResult<()>>;
}

impl<A: CalendarApi + ?Sized> CalendarApi for Arc<A> {
    fn fetch_window(
        &self,
        window: TimeWindow,
        token: String,
    ) -> BoxFuture<'_, ApiResult<Vec<RawEvent>>> {
        (**self).fetch_window(window, token)
    }

    fn create_event(
        &self,
        draft: EventDraft,
        token: String,
    ) -> BoxFuture<'_, ApiResult<CreatedEvent>> {
        (**self).create_event(draft, token)
    }

    fn update_event(
        &self,
        id: String,
        draft: EventDraft,
        token: String,
    ) -> BoxFuture<'_, ApiResult<Option<RawEvent>>> {
        (**self).update_event(id, draft, token)
    }

    fn cancel_event(
        &self,
        id: String,
        note: Option<String>,
        token: String,
    ) -> BoxFuture<'_, ApiResult<()>> {
        (**self).cancel_event(id, note, token)
    }
}

impl CalendarApi for GraphClient {
    fn fetch_window(
        &self,
        window: TimeWindow,
        token: String,
    ) -> BoxFuture<'_, ApiResult<Vec<RawEvent>>> {
        Box::pin(async move { GraphClient::fetch_window(self, &window, &token).await })
    }

    fn create_event(
        &self,
        draft: EventDraft,
        token: String,
    ) -> BoxFuture<'_, ApiResult<CreatedEvent>> {
        Box::pin(async move { GraphClient::create_event(self, &draft, &token).await })
    }

    fn update_event(
        &self,
        id: String,
        draft: EventDraft,
        token: String,
    ) -> BoxFuture<'_, ApiResult<Option<RawEvent>>> {
        Box::pin(async move { GraphClient::update_event(self, &id, &draft, &token).await })
    }

    fn cancel_event(
        &self,
        id: String,
        note: Option<String>,
        token: String,
    ) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move { GraphClient::cancel_event(self, &id, note.as_deref(), &token).await })
    }
}
