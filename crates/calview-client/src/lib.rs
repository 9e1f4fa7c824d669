//! Remote calendar API client.
//!
//! This crate holds everything that crosses the wire: the bearer
//! credential model, the paginated calendar-view fetcher, the raw-entry
//! normalizer, and the create/update/cancel mutation pipeline. The
//! stateful sync engine in `calview-engine` consumes it through the
//! [`CalendarApi`] seam.

pub mod api;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod fetch;
pub mod mutate;
pub mod normalize;
pub mod raw;

pub use api::{BoxFuture, CalendarApi};
pub use client::GraphClient;
pub use config::ClientConfig;
pub use credential::{Credential, StaticTokenProvider, TokenProvider};
pub use error::{ApiError, ApiResult, MutationKind};
pub use fetch::MAX_PAGES;
pub use mutate::{CreatedEvent, DraftAttendee, EventDraft};
pub use normalize::{normalize, normalize_page};
pub use raw::{EventPage, RawEvent};
