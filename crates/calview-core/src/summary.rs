//! Display helpers for event bodies and attendee responses.
//!
//! These are pure functions consumed by the presentation layer; they carry
//! no state and never touch the network.

use crate::event::{Attendee, ResponseStatus};

/// Delimiter the remote system appends to event bodies to separate human
/// content from generated metadata (e.g. a join-link block). Only the text
/// before the first delimiter is meant for display.
pub const BODY_METADATA_DELIMITER: &str = "___";

/// Returns the display portion of a body preview.
///
/// Everything before the first [`BODY_METADATA_DELIMITER`] is display
/// content; if no delimiter is present the whole string is returned.
pub fn display_body(body_preview: &str) -> &str {
    match body_preview.find(BODY_METADATA_DELIMITER) {
        Some(index) => &body_preview[..index],
        None => body_preview,
    }
}

/// Summarizes attendee responses as a human-readable string.
///
/// Counts attendees who accepted against those who have not responded.
/// Declined and tentative attendees are folded into the "didn't respond"
/// count; known semantic looseness, kept as-is.
pub fn response_summary(attendees: &[Attendee]) -> String {
    let accepted = attendees
        .iter()
        .filter(|a| a.response == ResponseStatus::Accepted)
        .count();
    let pending = attendees.len() - accepted;

    format!("{accepted} accepted, {pending} didn't respond")
}
