//! Drafts and payloads for event mutations.
//!
//! A [`EventDraft`] carries the full field set the caller wants the event
//! to have. Updates always submit the complete recomputed set even though
//! the API patches partially, so the local reconstruction and the server
//! never drift field-by-field. Validation happens client-side before any
//! request is dispatched (and the server re-validates anyway).

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use calview_core::{Attendee, AttendeeRole, EventRecord, ResponseStatus};

use crate::client::GraphClient;
use crate::error::{ApiError, ApiResult, MutationKind};
use crate::raw::{RawEvent, RawOnlineMeeting};

/// An attendee as entered in a create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAttendee {
    /// Display name.
    pub name: String,
    /// Email address.
    pub address: String,
    /// Invitation role.
    pub role: AttendeeRole,
}

impl DraftAttendee {
    /// Creates a required attendee.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            role: AttendeeRole::Required,
        }
    }

    /// Builder method to set the role.
    pub fn with_role(mut self, role: AttendeeRole) -> Self {
        self.role = role;
        self
    }
}

/// The full field set for a create or update submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Event subject.
    pub subject: String,
    /// Start instant. Invariant (validated): `start < end`.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Whether the server should provision a virtual meeting.
    pub is_online_meeting: bool,
    /// Physical address, appended to the body when the meeting is not
    /// online.
    pub meeting_address: Option<String>,
    /// Body content as entered by the user.
    pub body: String,
    /// Invited attendees.
    pub attendees: Vec<DraftAttendee>,
}

impl EventDraft {
    /// Creates a draft with the given subject and times; defaults to an
    /// online meeting with no attendees.
    pub fn new(subject: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            subject: subject.into(),
            start,
            end,
            is_online_meeting: true,
            meeting_address: None,
            body: String::new(),
            attendees: Vec::new(),
        }
    }

    /// Builder method to make this an on-premise meeting at `address`.
    pub fn at_address(mut self, address: impl Into<String>) -> Self {
        self.is_online_meeting = false;
        self.meeting_address = Some(address.into());
        self
    }

    /// Builder method to set the body content.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: DraftAttendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Validates the draft before dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidDraft`] when `start >= end`.
    pub fn validate(&self) -> ApiResult<()> {
        if self.start >= self.end {
            return Err(ApiError::invalid_draft(format!(
                "start must precede end ({} >= {})",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// The body content as submitted: the entered text, with the physical
    /// address appended for on-premise meetings.
    pub fn body_content(&self) -> String {
        match (self.is_online_meeting, self.meeting_address.as_deref()) {
            (false, Some(address)) if !address.is_empty() => {
                format!("{}<br>Meeting Address: {}", self.body, address)
            }
            _ => self.body.clone(),
        }
    }

    /// Builds the wire payload, expressing times in the display zone.
    pub(crate) fn to_payload(&self, zone: Tz) -> EventPayload {
        EventPayload {
            subject: self.subject.clone(),
            start: ZonedTimePayload::in_zone(self.start, zone),
            end: ZonedTimePayload::in_zone(self.end, zone),
            is_online_meeting: self.is_online_meeting,
            attendees: self
                .attendees
                .iter()
                .map(|a| AttendeePayload {
                    email_address: EmailAddressPayload {
                        address: a.address.clone(),
                        name: a.name.clone(),
                    },
                    kind: a.role.as_wire().to_string(),
                })
                .collect(),
            body: BodyPayload {
                content_type: "HTML".to_string(),
                content: self.body_content(),
            },
        }
    }

    /// Rebuilds the store record for a successful update, trusting the
    /// submitted fields as the new truth.
    ///
    /// Identity and ownership fields that a draft cannot express
    /// (occurrence/series ids, organizer, the existing join URL) are
    /// carried over from the prior record when one exists. Drafted
    /// attendees start with no response: a changed invitation has not
    /// been answered yet.
    pub fn to_record(&self, id: &str, prior: Option<&EventRecord>) -> EventRecord {
        let mut record = EventRecord::new(id, self.subject.clone(), self.start, self.end)
            .with_attendees(
                self.attendees
                    .iter()
                    .map(|a| {
                        Attendee::new(a.name.clone(), a.address.clone())
                            .with_role(a.role)
                            .with_response(ResponseStatus::NoResponse)
                    })
                    .collect(),
            )
            .with_body_preview(self.body_content());

        if let Some(prior) = prior {
            record.occurrence_id = prior.occurrence_id.clone();
            record.series_master_id = prior.series_master_id.clone();
            record.organizer = prior.organizer.clone();
            record.is_organizer = prior.is_organizer;
            if self.is_online_meeting {
                record.online_meeting_url = prior.online_meeting_url.clone();
            }
        }

        record
    }
}

/// Outcome of a successful create.
///
/// The creation response is not assumed to be in the normalized entry
/// shape; only the identity and a resolved join URL are pulled out. The
/// local store is not updated automatically; the caller decides whether
/// to show a confirmation or trigger a window refetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedEvent {
    /// The id the server assigned, when the response carried one.
    pub id: Option<String>,
    /// The resolved join URL for online meetings, when present.
    pub online_meeting_url: Option<String>,
}

/// Wire payload for create and update submissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventPayload {
    pub subject: String,
    pub start: ZonedTimePayload,
    pub end: ZonedTimePayload,
    pub is_online_meeting: bool,
    pub attendees: Vec<AttendeePayload>,
    pub body: BodyPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ZonedTimePayload {
    pub date_time: String,
    pub time_zone: String,
}

impl ZonedTimePayload {
    /// Formats an instant as a wall time in `zone`.
    fn in_zone(instant: DateTime<Utc>, zone: Tz) -> Self {
        Self {
            date_time: instant
                .with_timezone(&zone)
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
            time_zone: zone.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttendeePayload {
    pub email_address: EmailAddressPayload,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmailAddressPayload {
    pub address: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BodyPayload {
    pub content_type: String,
    pub content: String,
}

/// Wire payload for a cancellation note.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CancelPayload {
    pub comment: String,
}

/// The slice of a creation response the pipeline reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CreatedPayload {
    pub id: Option<String>,
    pub online_meeting: Option<RawOnlineMeeting>,
}

impl GraphClient {
    /// Creates a new event from `draft`.
    ///
    /// The store is not touched; the returned [`CreatedEvent`] carries the
    /// assigned id and resolved join URL for the caller to act on.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidDraft`] before dispatch when validation fails,
    /// [`ApiError::Auth`] on credential rejection, [`ApiError::Mutation`]
    /// on any other non-success status, [`ApiError::Transport`] on network
    /// failure. Never retried: a duplicate submission would create a
    /// duplicate event.
    pub async fn create_event(&self, draft: &EventDraft, token: &str) -> ApiResult<CreatedEvent> {
        draft.validate()?;
        let url = self.config.endpoint("me/events")?;
        let payload = draft.to_payload(self.config.display_zone);

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        if let Some(auth) = Self::auth_rejection(status) {
            return Err(auth);
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(ApiError::mutation(MutationKind::Create, Some(status.as_u16()), body));
        }

        // The creation response is not assumed to be in the normalized
        // entry shape; read it leniently.
        let created = match response.json::<CreatedPayload>().await {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "created event but response body was unreadable");
                CreatedPayload::default()
            }
        };

        let created = CreatedEvent {
            id: created.id,
            online_meeting_url: created.online_meeting.and_then(|m| m.join_url),
        };
        info!(event_id = created.id.as_deref().unwrap_or("<unknown>"), "created event");
        Ok(created)
    }

    /// Replaces the full field set of event `id` with `draft`.
    ///
    /// Returns the server's echoed entry when the response body parses as
    /// one, `None` otherwise; reconciliation strategy decides which side
    /// to trust.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::create_event`], with
    /// [`MutationKind::Update`] on rejection.
    pub async fn update_event(
        &self,
        id: &str,
        draft: &EventDraft,
        token: &str,
    ) -> ApiResult<Option<RawEvent>> {
        draft.validate()?;
        let url = self.config.endpoint(&format!("me/events/{id}"))?;
        let payload = draft.to_payload(self.config.display_zone);

        let response = self
            .http
            .patch(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        if let Some(auth) = Self::auth_rejection(status) {
            return Err(auth);
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(ApiError::mutation(MutationKind::Update, Some(status.as_u16()), body));
        }

        info!(event_id = id, "updated event");
        match response.json::<RawEvent>().await {
            Ok(raw) => Ok(Some(raw)),
            Err(error) => {
                debug!(event_id = id, %error, "update response not in entry shape");
                Ok(None)
            }
        }
    }

    /// Cancels event `id`, optionally sending `note` to attendees.
    ///
    /// Cancellation is terminal; there is no undo.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::create_event`], with
    /// [`MutationKind::Cancel`] on rejection.
    pub async fn cancel_event(&self, id: &str, note: Option<&str>, token: &str) -> ApiResult<()> {
        let url = self.config.endpoint(&format!("me/events/{id}/cancel"))?;
        let payload = CancelPayload {
            comment: note.unwrap_or_default().to_string(),
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        if let Some(auth) = Self::auth_rejection(status) {
            return Err(auth);
        }
        if !status.is_success() {
            let body = Self::error_body(response).await;
            return Err(ApiError::mutation(MutationKind::Cancel, Some(status.as_u16()), body));
        }

        info!(event_id = id, "cancelled event");
        Ok(())
    }
}
