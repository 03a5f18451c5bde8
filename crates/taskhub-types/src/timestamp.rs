//! Raw backend timestamps.
//!
//! The backend has emitted timestamps in several shapes over time (RFC 3339
//! with an offset, zone-less `LocalDateTime` strings, bare dates). A
//! [`Timestamp`] keeps the raw string exactly as received and resolves it
//! against a time zone only when a view needs it, so a malformed value is
//! still representable and can simply be skipped.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Zone-less layouts accepted after RFC 3339, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A timestamp string as delivered by the backend.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use taskhub_types::Timestamp;
///
/// let ts = Timestamp::new("2025-03-14T09:30:00");
/// assert!(ts.resolve(&Utc).is_some());
/// assert!(Timestamp::new("tomorrow-ish").resolve(&Utc).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Timestamp(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Resolve into an instant in `tz`.
    ///
    /// Offset-bearing values are converted into `tz`; zone-less values and
    /// bare dates are read as wall-clock time in `tz` (a bare date is local
    /// midnight). A wall-clock time skipped by a DST jump moves forward by
    /// the usual hour. Returns `None` for anything unparseable.
    pub fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(tz));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return local_instant(tz, naive);
            }
        }

        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        local_instant(tz, date.and_hms_opt(0, 0, 0)?)
    }

    /// The calendar date written in the string, ignoring any time part.
    pub fn date_part(&self) -> Option<NaiveDate> {
        let raw = self.0.trim();
        let date = raw.split(['T', ' ']).next()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

fn local_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

impl Deref for Timestamp {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Timestamp(value)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Timestamp(value.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};

    #[test]
    fn test_resolve_naive_in_target_zone() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let resolved = Timestamp::new("2025-06-02T08:15:00").resolve(&tz).unwrap();
        assert_eq!(resolved.hour(), 8);
        assert_eq!(resolved.minute(), 15);
        assert_eq!(resolved.offset(), &tz);
    }

    #[test]
    fn test_resolve_offset_converts() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let resolved = Timestamp::new("2025-06-02T02:00:00Z").resolve(&tz).unwrap();
        // 02:00 UTC is 23:00 the previous day at UTC-3.
        assert_eq!(resolved.hour(), 23);
        assert_eq!(resolved.date_naive().to_string(), "2025-06-01");
    }

    #[test]
    fn test_resolve_fractional_and_short_forms() {
        assert!(Timestamp::new("2025-06-02T08:15:00.250").resolve(&Utc).is_some());
        assert!(Timestamp::new("2025-06-02T08:15").resolve(&Utc).is_some());
        assert!(Timestamp::new("2025-06-02 08:15:00").resolve(&Utc).is_some());
    }

    #[test]
    fn test_bare_date_is_local_midnight() {
        let resolved = Timestamp::new("2025-06-02").resolve(&Utc).unwrap();
        assert_eq!(resolved.hour(), 0);
        assert_eq!(resolved.date_naive().to_string(), "2025-06-02");
    }

    #[test]
    fn test_time_in_dst_gap_moves_forward() {
        use chrono_tz::America::{New_York, Sao_Paulo};

        // 02:30 does not exist in New York on 2025-03-09.
        let resolved = Timestamp::new("2025-03-09T02:30:00").resolve(&New_York).unwrap();
        assert_eq!((resolved.hour(), resolved.minute()), (3, 30));
        assert_eq!(resolved.date_naive().to_string(), "2025-03-09");

        // Sao Paulo skipped midnight on 2018-11-04.
        let resolved = Timestamp::new("2018-11-04").resolve(&Sao_Paulo).unwrap();
        assert_eq!(resolved.hour(), 1);
        assert_eq!(resolved.date_naive().to_string(), "2018-11-04");
    }

    #[test]
    fn test_repeated_time_takes_first_occurrence() {
        use chrono_tz::America::New_York;

        // 01:30 happens twice on 2025-11-02; the first one is still EDT.
        let resolved = Timestamp::new("2025-11-02T01:30:00").resolve(&New_York).unwrap();
        assert_eq!(resolved.offset().to_string(), "EDT");
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(Timestamp::new("").resolve(&Utc).is_none());
        assert!(Timestamp::new("not a date").resolve(&Utc).is_none());
        assert!(Timestamp::new("2025-13-40").resolve(&Utc).is_none());
    }

    #[test]
    fn test_date_part() {
        let date = Timestamp::new("2025-06-02T08:15:00").date_part().unwrap();
        assert_eq!(date.to_string(), "2025-06-02");
        assert!(Timestamp::new("soon").date_part().is_none());
    }

    #[test]
    fn test_serde_is_transparent() {
        let ts = Timestamp::new("2025-06-02T08:15:00");
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, r#""2025-06-02T08:15:00""#);
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ts);
    }
}
