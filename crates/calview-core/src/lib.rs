//! Core types: events, attendees, time windows, display helpers

pub mod event;
pub mod summary;
pub mod time;
pub mod tracing;

pub use event::{Attendee, AttendeeRole, EventRecord, Organizer, ResponseStatus};
pub use summary::{display_body, response_summary, BODY_METADATA_DELIMITER};
pub use time::TimeWindow;
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
