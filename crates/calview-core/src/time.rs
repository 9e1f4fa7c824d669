//! Time window type for calendar view queries.
//!
//! A [`TimeWindow`] is the half-open interval `[start, end)` that the local
//! event set materializes. Windows are normalized to calendar-month or
//! explicit view-range boundaries in the configured display zone before
//! they are used as fetch keys, so that two navigations to the same view
//! produce an identical (comparable) window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A time window for querying calendar events.
///
/// Represents a half-open interval `[start, end)` in UTC. Equality on
/// windows is what the fetch machinery compares when deciding whether a
/// completed fetch still matches the currently requested view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates the window covering the calendar month that contains `date`,
    /// with boundaries taken at local midnight in `tz`.
    ///
    /// This is the normalization applied to month-view navigation: any date
    /// within the same displayed month produces the same window.
    pub fn month_of<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let first = date.with_day(1).expect("day 1 is valid for any month");
        let next_first = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        }
        .expect("first day of month is valid");

        Self {
            start: local_midnight(first, tz),
            end: local_midnight(next_first, tz),
        }
    }

    /// Creates the window for a single day in `tz` (day-view navigation).
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let next = date.succ_opt().expect("valid successor date");
        Self {
            start: local_midnight(date, tz),
            end: local_midnight(next, tz),
        }
    }

    /// Creates the window spanning `[first, last]` days in `tz`, e.g. a
    /// week-view range. `last` is included in the window.
    pub fn for_range<Tz: TimeZone>(first: NaiveDate, last: NaiveDate, tz: &Tz) -> Self {
        let end_day = last.max(first).succ_opt().expect("valid successor date");
        Self {
            start: local_midnight(first, tz),
            end: local_midnight(end_day, tz),
        }
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Checks if an event with the given bounds overlaps this window.
    pub fn overlaps(&self, event_start: DateTime<Utc>, event_end: DateTime<Utc>) -> bool {
        event_start < self.end && event_end > self.start
    }
}

/// Resolves local midnight of `date` in `tz` to a UTC instant.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0).expect("valid time"))
        .earliest()
        .expect("midnight resolves in every zone")
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn creation() {
        let window = TimeWindow::new(utc(2023, 11, 1, 0, 0, 0), utc(2023, 12, 1, 0, 0, 0));
        assert_eq!(window.duration(), Duration::days(30));
    }

    #[test]
    #[should_panic(expected = "start must be <= end")]
    fn inverted_window() {
        TimeWindow::new(utc(2023, 11, 2, 0, 0, 0), utc(2023, 11, 1, 0, 0, 0));
    }

    #[test]
    fn contains_is_half_open() {
        let window = TimeWindow::new(utc(2023, 11, 1, 0, 0, 0), utc(2023, 12, 1, 0, 0, 0));

        assert!(window.contains(utc(2023, 11, 1, 0, 0, 0))); // start inclusive
        assert!(window.contains(utc(2023, 11, 30, 23, 59, 59)));
        assert!(!window.contains(utc(2023, 12, 1, 0, 0, 0))); // end exclusive
        assert!(!window.contains(utc(2023, 10, 31, 23, 59, 59)));
    }

    #[test]
    fn month_normalization_is_stable() {
        let tz: Tz = "Asia/Karachi".parse().unwrap();

        // Any date inside November resolves to the same window.
        let a = TimeWindow::month_of(date(2023, 11, 1), &tz);
        let b = TimeWindow::month_of(date(2023, 11, 17), &tz);
        let c = TimeWindow::month_of(date(2023, 11, 30), &tz);
        assert_eq!(a, b);
        assert_eq!(b, c);

        // Karachi is UTC+5, so local midnight Nov 1 is Oct 31 19:00 UTC.
        assert_eq!(a.start, utc(2023, 10, 31, 19, 0, 0));
        assert_eq!(a.end, utc(2023, 11, 30, 19, 0, 0));
    }

    #[test]
    fn month_of_december_rolls_year() {
        let window = TimeWindow::month_of(date(2023, 12, 15), &Utc);
        assert_eq!(window.start, utc(2023, 12, 1, 0, 0, 0));
        assert_eq!(window.end, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn for_date_covers_one_day() {
        let window = TimeWindow::for_date(date(2023, 11, 6), &Utc);
        assert_eq!(window.duration(), Duration::days(1));
        assert!(window.contains(utc(2023, 11, 6, 12, 0, 0)));
        assert!(!window.contains(utc(2023, 11, 7, 0, 0, 0)));
    }

    #[test]
    fn for_range_includes_last_day() {
        let window = TimeWindow::for_range(date(2023, 11, 6), date(2023, 11, 12), &Utc);
        assert_eq!(window.duration(), Duration::days(7));
        assert!(window.contains(utc(2023, 11, 12, 23, 0, 0)));
    }

    #[test]
    fn overlaps_event() {
        let window = TimeWindow::new(utc(2023, 11, 1, 0, 0, 0), utc(2023, 12, 1, 0, 0, 0));

        // Straddles the window start.
        assert!(window.overlaps(utc(2023, 10, 31, 23, 0, 0), utc(2023, 11, 1, 1, 0, 0)));
        // Ends exactly at window start: no overlap.
        assert!(!window.overlaps(utc(2023, 10, 31, 22, 0, 0), utc(2023, 11, 1, 0, 0, 0)));
        // Starts exactly at window end: no overlap.
        assert!(!window.overlaps(utc(2023, 12, 1, 0, 0, 0), utc(2023, 12, 1, 1, 0, 0)));
    }

    #[test]
    fn serde_roundtrip() {
        let window = TimeWindow::new(utc(2023, 11, 1, 0, 0, 0), utc(2023, 12, 1, 0, 0, 0));
        let json = serde_json::to_string(&window).unwrap();
        let parsed: TimeWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(window, parsed);
    }
}
