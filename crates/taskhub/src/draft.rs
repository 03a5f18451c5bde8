//! Event form drafts.
//!
//! The calendar form collects dates and times separately. A draft turns them
//! into an [`EventInput`], rejecting incomplete forms before any request is
//! made.

use crate::error::{ApiError, ApiResult};
use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike};
use taskhub_types::{CalendarEvent, EventCategory, EventInput, EventStatus};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub category: EventCategory,
    pub description: Option<String>,
    pub project_id: Option<Uuid>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            start_date: Some(start_date),
            ..Self::default()
        }
    }

    /// Pre-fill a draft from an existing event, reading its times in `tz`.
    ///
    /// All-day events get no times. A start that cannot be resolved keeps
    /// only the date written in it, if any.
    pub fn from_event<Tz: TimeZone>(event: &CalendarEvent, tz: &Tz) -> Self {
        let split = |raw: &taskhub_types::Timestamp| match raw.resolve(tz) {
            Some(at) => (
                Some(at.date_naive()),
                (!event.all_day).then(|| at.time()).and_then(whole_minutes),
            ),
            None => (raw.date_part(), None),
        };

        let (start_date, start_time) = split(&event.start);
        let (end_date, end_time) = match &event.end {
            Some(end) => split(end),
            None => (start_date, None),
        };

        Self {
            title: event.title.clone(),
            start_date,
            start_time,
            end_date,
            end_time,
            category: event.category,
            description: event.description.clone(),
            project_id: event.project_id,
        }
    }

    /// All-day iff no start time was given.
    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }

    /// Build the request body for a new event (`existing = None`) or an edit.
    ///
    /// New events start pending; edits keep the existing status.
    pub fn into_input(self, existing: Option<&CalendarEvent>) -> ApiResult<EventInput> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::invalid("title is required"));
        }
        let start_date = self
            .start_date
            .ok_or_else(|| ApiError::invalid("start date is required"))?;

        let start_time = compose(start_date, self.start_time);

        let end_date = self.end_date.unwrap_or(start_date);
        let end_time = match self.end_time {
            Some(time) => Some(compose(end_date, Some(time))),
            None if end_date == start_date => None,
            None => Some(compose(end_date, None)),
        };

        let input = EventInput {
            title,
            start_time,
            end_time,
            all_day: self.start_time.is_none(),
            category: self.category,
            description: self.description.filter(|d| !d.trim().is_empty()),
            project_id: self.project_id,
            status: existing.map_or(EventStatus::Pending, |event| event.status),
        };
        input.validate()?;
        Ok(input)
    }
}

fn compose(date: NaiveDate, time: Option<NaiveTime>) -> String {
    match time {
        Some(time) => format!("{}T{}", date.format("%Y-%m-%d"), time.format("%H:%M:00")),
        None => date.format("%Y-%m-%d").to_string(),
    }
}

fn whole_minutes(time: NaiveTime) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
}

/// Parse `HH:MM` as typed into the form.
pub fn parse_time(raw: &str) -> ApiResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ApiError::invalid(format!("invalid time {:?}, expected HH:MM", raw)))
}

/// Parse `YYYY-MM-DD` as typed into the form.
pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::invalid(format!("invalid date {:?}, expected YYYY-MM-DD", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskhub_types::Timestamp;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    #[test]
    fn test_timed_event() {
        let mut draft = EventDraft::new("Daily", date("2025-06-04"));
        draft.start_time = Some(time("09:30"));
        draft.end_time = Some(time("10:00"));

        let input = draft.into_input(None).unwrap();
        assert_eq!(input.start_time, "2025-06-04T09:30:00");
        assert_eq!(input.end_time.as_deref(), Some("2025-06-04T10:00:00"));
        assert!(!input.all_day);
        assert_eq!(input.status, EventStatus::Pending);
    }

    #[test]
    fn test_all_day_same_day_drops_end() {
        let mut draft = EventDraft::new("Offsite", date("2025-06-04"));
        draft.end_date = Some(date("2025-06-04"));

        let input = draft.into_input(None).unwrap();
        assert!(input.all_day);
        assert_eq!(input.start_time, "2025-06-04");
        assert_eq!(input.end_time, None);
    }

    #[test]
    fn test_multi_day_all_day_keeps_end_date() {
        let mut draft = EventDraft::new("Conference", date("2025-06-04"));
        draft.end_date = Some(date("2025-06-06"));

        let input = draft.into_input(None).unwrap();
        assert_eq!(input.end_time.as_deref(), Some("2025-06-06"));
    }

    #[test]
    fn test_required_fields() {
        let err = EventDraft::new("   ", date("2025-06-04")).into_input(None).unwrap_err();
        assert!(err.is_validation());

        let draft = EventDraft {
            title: "No date".to_string(),
            ..EventDraft::default()
        };
        assert!(draft.into_input(None).unwrap_err().is_validation());
    }

    #[test]
    fn test_edit_keeps_status() {
        let existing = CalendarEvent {
            id: Uuid::new_v4(),
            title: "Review".to_string(),
            start: Timestamp::new("2025-06-04T14:00:00"),
            end: Some(Timestamp::new("2025-06-04T15:00:00")),
            all_day: false,
            category: EventCategory::Time,
            status: EventStatus::Completed,
            description: Some("quarterly".to_string()),
            team: None,
            team_id: None,
            project_id: None,
            user_id: None,
            created_by: None,
        };

        let mut draft = EventDraft::from_event(&existing, &Utc);
        assert_eq!(draft.start_time, Some(time("14:00")));
        assert_eq!(draft.end_date, Some(date("2025-06-04")));
        draft.title = "Quarterly review".to_string();

        let input = draft.into_input(Some(&existing)).unwrap();
        assert_eq!(input.status, EventStatus::Completed);
        assert_eq!(input.category, EventCategory::Time);
        assert_eq!(input.start_time, "2025-06-04T14:00:00");
        assert_eq!(input.end_time.as_deref(), Some("2025-06-04T15:00:00"));
    }

    #[test]
    fn test_from_event_with_unparseable_start() {
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            title: "Odd".to_string(),
            start: Timestamp::new("2025-06-04Tlater"),
            end: None,
            all_day: false,
            category: EventCategory::Outros,
            status: EventStatus::Pending,
            description: None,
            team: None,
            team_id: None,
            project_id: None,
            user_id: None,
            created_by: None,
        };
        let draft = EventDraft::from_event(&event, &Utc);
        assert_eq!(draft.start_date, Some(date("2025-06-04")));
        assert_eq!(draft.start_time, None);
    }

    #[test]
    fn test_parse_helpers_reject_garbage() {
        assert!(parse_time("9h").is_err());
        assert!(parse_date("04/06/2025").is_err());
    }
}
