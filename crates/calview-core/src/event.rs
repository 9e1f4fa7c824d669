//! Event types for the mirrored calendar.
//!
//! This module provides the canonical internal representation of a remote
//! calendar entry:
//! - [`EventRecord`]: one calendar entry, keyed by its remote identity
//! - [`Organizer`] / [`Attendee`]: participant identities and state
//! - [`AttendeeRole`] / [`ResponseStatus`]: attendee classification

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The role an attendee was invited with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeRole {
    /// Attendance is expected.
    #[default]
    Required,
    /// Attendance is optional.
    Optional,
}

impl AttendeeRole {
    /// The wire spelling used by the remote API ("required" / "optional").
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
        }
    }
}

/// An attendee's response to the invitation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The attendee has accepted.
    Accepted,
    /// The attendee has declined.
    Declined,
    /// The attendee has tentatively accepted.
    Tentative,
    /// The attendee has not responded.
    #[default]
    NoResponse,
}

/// A name/address identity, used for organizers and attendees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    /// Display name; may be empty when the server has none.
    pub name: String,
    /// Email address.
    pub address: String,
}

impl Organizer {
    /// Creates an identity from name and address.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// One attendee of a calendar event.
///
/// Insertion order in [`EventRecord::attendees`] is meaningful for display
/// and is preserved from the server payload; addresses are not required to
/// be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Display name.
    pub name: String,
    /// Email address.
    pub address: String,
    /// Whether attendance is required or optional.
    pub role: AttendeeRole,
    /// The attendee's response to the invitation.
    pub response: ResponseStatus,
}

impl Attendee {
    /// Creates a required attendee with no response yet.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            role: AttendeeRole::Required,
            response: ResponseStatus::NoResponse,
        }
    }

    /// Builder method to set the role.
    pub fn with_role(mut self, role: AttendeeRole) -> Self {
        self.role = role;
        self
    }

    /// Builder method to set the response status.
    pub fn with_response(mut self, response: ResponseStatus) -> Self {
        self.response = response;
        self
    }
}

/// The canonical internal representation of one calendar entry.
///
/// Records are produced by normalizing raw server payloads and are keyed in
/// the local store by [`EventRecord::id`], which the remote system keeps
/// stable across fetches. All instants are stored in UTC; conversion to the
/// configured display zone happens at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Opaque identity assigned by the remote system; the store key.
    pub id: String,
    /// Distinguishes a single occurrence of a recurring series, when set.
    pub occurrence_id: Option<String>,
    /// Identity of the recurring series master, when this is an occurrence.
    pub series_master_id: Option<String>,
    /// Display subject; may be empty.
    pub title: String,
    /// When the event starts. Invariant: `start < end`.
    pub start: DateTime<Utc>,
    /// When the event ends.
    pub end: DateTime<Utc>,
    /// Whether the event spans whole days.
    pub is_all_day: bool,
    /// Whether the authenticated user organizes this event.
    pub is_organizer: bool,
    /// The event's organizer.
    pub organizer: Organizer,
    /// Attendees in server order.
    pub attendees: Vec<Attendee>,
    /// Join URL when the event is a virtual meeting; absence is a normal
    /// state, not an error.
    pub online_meeting_url: Option<String>,
    /// Free-text preview of the body. May embed a `___` delimiter that
    /// separates display content from system-appended metadata; see
    /// [`crate::summary::display_body`].
    pub body_preview: String,
}

impl EventRecord {
    /// Creates a record with required fields; everything else starts empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            occurrence_id: None,
            series_master_id: None,
            title: title.into(),
            start,
            end,
            is_all_day: false,
            is_organizer: false,
            organizer: Organizer::default(),
            attendees: Vec::new(),
            online_meeting_url: None,
            body_preview: String::new(),
        }
    }

    /// Returns the duration of the event in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Checks if the event is ongoing at the given instant.
    ///
    /// Uses `[start, end)` semantics, matching window containment.
    pub fn is_ongoing_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }

    /// Returns true if the event carries a join URL.
    pub fn is_online_meeting(&self) -> bool {
        self.online_meeting_url.is_some()
    }

    /// The event start converted to the given display zone.
    pub fn start_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.start.with_timezone(tz)
    }

    /// The event end converted to the given display zone.
    pub fn end_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.end.with_timezone(tz)
    }

    /// Builder method to set the occurrence identity.
    pub fn with_occurrence_id(mut self, occurrence_id: impl Into<String>) -> Self {
        self.occurrence_id = Some(occurrence_id.into());
        self
    }

    /// Builder method to set the series master identity.
    pub fn with_series_master_id(mut self, series_master_id: impl Into<String>) -> Self {
        self.series_master_id = Some(series_master_id.into());
        self
    }

    /// Builder method to mark the event all-day.
    pub fn with_all_day(mut self, is_all_day: bool) -> Self {
        self.is_all_day = is_all_day;
        self
    }

    /// Builder method to set the organizer and ownership flag.
    pub fn with_organizer(mut self, organizer: Organizer, is_organizer: bool) -> Self {
        self.organizer = organizer;
        self.is_organizer = is_organizer;
        self
    }

    /// Builder method to set the attendee list.
    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = attendees;
        self
    }

    /// Builder method to add one attendee.
    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Builder method to set the join URL.
    pub fn with_online_meeting_url(mut self, url: impl Into<String>) -> Self {
        self.online_meeting_url = Some(url.into());
        self
    }

    /// Builder method to set the body preview.
    pub fn with_body_preview(mut self, body_preview: impl Into<String>) -> Self {
        self.body_preview = body_preview.into();
        self
    }
}
