//! Raw entry to [`EventRecord`] conversion.
//!
//! Normalization is a pure step between the fetcher and the local store.
//! Optional wire fields (occurrence id, online meeting, attendees) are
//! tolerated; a record missing a structural field (`id`, `subject`,
//! `start`, `end`) or carrying an unparseable/inverted time range fails
//! with a malformed-record error.
//!
//! Page policy: a malformed record is skipped with a warning and the rest
//! of the page is processed, so one bad entry never costs a whole window.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use calview_core::{Attendee, AttendeeRole, EventRecord, Organizer, ResponseStatus};

use crate::error::{ApiError, ApiResult};
use crate::raw::{RawAttendee, RawDateTime, RawEvent};

/// Converts a raw server entry into the canonical [`EventRecord`].
///
/// # Errors
///
/// Returns [`ApiError::MalformedRecord`] when `id`, `subject`, `start`, or
/// `end` is absent, when a timestamp does not parse, or when the range is
/// empty or inverted. Missing optional fields never fail.
pub fn normalize(raw: &RawEvent) -> ApiResult<EventRecord> {
    let id = raw
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::malformed(None, "missing id"))?;

    // Present-but-empty subjects are valid; only absence is malformed.
    let subject = raw
        .subject
        .as_deref()
        .ok_or_else(|| ApiError::malformed(Some(id), "missing subject"))?;

    let start = required_instant(raw.start.as_ref(), id, "start")?;
    let end = required_instant(raw.end.as_ref(), id, "end")?;
    if start >= end {
        return Err(ApiError::malformed(
            Some(id),
            format!("empty or inverted time range ({start} >= {end})"),
        ));
    }

    let organizer = raw
        .organizer
        .as_ref()
        .and_then(|r| r.email_address.as_ref())
        .map(|addr| {
            Organizer::new(
                addr.name.clone().unwrap_or_default(),
                addr.address.clone().unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    let attendees = raw
        .attendees
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(normalize_attendee)
        .collect();

    let mut record = EventRecord::new(id, subject, start, end)
        .with_all_day(raw.is_all_day)
        .with_organizer(organizer, raw.is_organizer)
        .with_attendees(attendees)
        .with_body_preview(raw.body_preview.clone().unwrap_or_default());

    if let Some(ref occurrence_id) = raw.occurrence_id {
        record = record.with_occurrence_id(occurrence_id);
    }
    if let Some(ref series_master_id) = raw.series_master_id {
        record = record.with_series_master_id(series_master_id);
    }
    if let Some(join_url) = raw
        .online_meeting
        .as_ref()
        .and_then(|m| m.join_url.as_deref())
    {
        record = record.with_online_meeting_url(join_url);
    }

    Ok(record)
}

/// Normalizes a fetched page, skipping malformed records.
///
/// Each skipped record is logged with the reason; the remainder of the
/// page is kept. Server ordering is preserved.
pub fn normalize_page(raws: &[RawEvent]) -> Vec<EventRecord> {
    raws.iter()
        .filter_map(|raw| match normalize(raw) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(
                    event_id = raw.id.as_deref().unwrap_or("<none>"),
                    %error,
                    "skipping malformed calendar entry"
                );
                None
            }
        })
        .collect()
}

fn normalize_attendee(raw: &RawAttendee) -> Attendee {
    let (name, address) = raw
        .email_address
        .as_ref()
        .map(|addr| {
            (
                addr.name.clone().unwrap_or_default(),
                addr.address.clone().unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    let role = match raw.kind.as_deref() {
        Some("optional") => AttendeeRole::Optional,
        _ => AttendeeRole::Required,
    };

    let response = match raw
        .status
        .as_ref()
        .and_then(|s| s.response.as_deref())
        .unwrap_or("none")
    {
        "accepted" | "organizer" => ResponseStatus::Accepted,
        "declined" => ResponseStatus::Declined,
        "tentativelyAccepted" | "tentative" => ResponseStatus::Tentative,
        _ => ResponseStatus::NoResponse,
    };

    Attendee::new(name, address)
        .with_role(role)
        .with_response(response)
}

fn required_instant(raw: Option<&RawDateTime>, id: &str, field: &str) -> ApiResult<DateTime<Utc>> {
    let raw = raw.ok_or_else(|| ApiError::malformed(Some(id), format!("missing {field}")))?;
    parse_instant(raw)
        .ok_or_else(|| ApiError::malformed(Some(id), format!("unparseable {field} timestamp")))
}

/// Parses a wall time + zone name pair into a UTC instant.
///
/// The fetcher pins responses to UTC wall times, but offsets and IANA zone
/// names are accepted too so records survive a server that ignores the
/// `Prefer` header.
fn parse_instant(raw: &RawDateTime) -> Option<DateTime<Utc>> {
    let text = raw.date_time.trim();

    // Full RFC 3339 with offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    // Wall time, interpreted in the declared zone (UTC when absent).
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    match raw.time_zone.as_deref() {
        None => Some(naive.and_utc()),
        Some(zone) if zone.eq_ignore_ascii_case("utc") => Some(naive.and_utc()),
        Some(zone) => {
            let tz: Tz = zone.parse().ok()?;
            tz.from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}
