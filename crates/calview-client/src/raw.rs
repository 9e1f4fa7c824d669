//! Wire types for the remote calendar API.
//!
//! These structs mirror the JSON shapes the server sends and accepts.
//! Everything here is transport-shaped, not domain-shaped: raw entries are
//! converted to [`calview_core::EventRecord`] by [`crate::normalize`], and
//! outbound payloads are built from drafts by [`crate::mutate`].
//!
//! Almost every inbound field is optional at this layer; which ones are
//! actually required is decided during normalization, where a missing
//! structural field becomes a malformed-record error rather than a parse
//! failure that would poison the whole page.

use serde::{Deserialize, Serialize};

/// One page of the calendar-view listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    /// The entries on this page, in server order.
    #[serde(default)]
    pub value: Vec<RawEvent>,
    /// Continuation reference. When present it fully replaces the request
    /// URL for the next page; when absent, pagination is complete.
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// A raw calendar entry as the server sends it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    /// Remote identity; stable across fetches.
    pub id: Option<String>,
    /// Display subject.
    pub subject: Option<String>,
    /// Free-text body preview.
    pub body_preview: Option<String>,
    /// Start of the event.
    pub start: Option<RawDateTime>,
    /// End of the event.
    pub end: Option<RawDateTime>,
    /// Occurrence identity for instances of a recurring series.
    pub occurrence_id: Option<String>,
    /// Identity of the recurring series master.
    pub series_master_id: Option<String>,
    /// Whether the event spans whole days.
    pub is_all_day: bool,
    /// Whether the authenticated user organizes the event.
    pub is_organizer: bool,
    /// The organizer recipient.
    pub organizer: Option<RawRecipient>,
    /// Attendees in server order.
    pub attendees: Option<Vec<RawAttendee>>,
    /// Virtual meeting info; absent for on-premise events.
    pub online_meeting: Option<RawOnlineMeeting>,
}

/// A wall time paired with the zone it is expressed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDateTime {
    /// ISO-8601 wall time without offset, e.g. `2023-11-06T09:00:00.0000000`.
    pub date_time: String,
    /// IANA or Windows zone name the wall time is expressed in. The
    /// fetcher pins this to UTC via a `Prefer` header.
    pub time_zone: Option<String>,
}

impl RawDateTime {
    /// Creates a UTC wall time, the shape the fetcher requests.
    pub fn utc(date_time: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            time_zone: Some("UTC".to_string()),
        }
    }
}

/// A recipient wrapper around an email identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecipient {
    /// The wrapped identity.
    pub email_address: Option<RawEmailAddress>,
}

/// An email identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmailAddress {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub address: Option<String>,
}

/// One raw attendee entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttendee {
    /// Invitation role: `required`, `optional`, or `resource`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The attendee's response state.
    pub status: Option<RawResponseStatus>,
    /// The attendee identity.
    pub email_address: Option<RawEmailAddress>,
}

/// The response portion of a raw attendee.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponseStatus {
    /// Response value: `accepted`, `declined`, `tentativelyAccepted`,
    /// `notResponded`, `none`, or `organizer`.
    pub response: Option<String>,
}

/// Virtual meeting block on a raw entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOnlineMeeting {
    /// The join URL.
    pub join_url: Option<String>,
}
