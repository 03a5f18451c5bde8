//! Read-only calendar views.
//!
//! Every view is computed against a `now` instant and interprets event
//! timestamps in `now`'s time zone. Events whose start cannot be parsed are
//! left out of the date-based views. All sorts are stable, so events with the
//! same start keep their input order.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Weekday};
use serde::Serialize;
use taskhub_types::{CalendarEvent, EventCategory};
use uuid::Uuid;

/// How many overdue events the dashboard shows.
pub const DEFAULT_OVERDUE_LIMIT: usize = 3;

/// Weekly totals at or above this count fill the load bar.
const FULL_WEEK: f64 = 15.0;

/// Calendar weekdays in display order.
const DISPLAY_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadTier {
    Light,
    Medium,
    Heavy,
}

impl LoadTier {
    pub fn from_total(total: usize) -> Self {
        match total {
            0..=5 => LoadTier::Light,
            6..=10 => LoadTier::Medium,
            _ => LoadTier::Heavy,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LoadTier::Light => "Light",
            LoadTier::Medium => "Medium",
            LoadTier::Heavy => "Heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayLoad {
    pub weekday: Weekday,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyLoad {
    /// Sunday that opens the counted week.
    pub week_start: NaiveDate,
    /// Monday first, Sunday last.
    pub days: [DayLoad; 7],
    pub total: usize,
    pub tier: LoadTier,
    /// `total / 15`, capped at 1.
    pub fraction: f64,
}

/// Projects event collections into the dashboard's calendar views.
pub struct EventProjector;

impl EventProjector {
    /// Events starting on `now`'s calendar day, earliest first.
    pub fn today_events<'a, Tz: TimeZone>(
        events: &'a [CalendarEvent],
        now: &DateTime<Tz>,
    ) -> Vec<&'a CalendarEvent> {
        Self::today_with_starts(events, now)
            .into_iter()
            .map(|(event, _)| event)
            .collect()
    }

    /// Today's events still ahead of `now` and not completed.
    pub fn upcoming_today<'a, Tz: TimeZone>(
        events: &'a [CalendarEvent],
        now: &DateTime<Tz>,
    ) -> Vec<&'a CalendarEvent> {
        Self::today_with_starts(events, now)
            .into_iter()
            .filter(|(event, start)| start > now && !event.is_completed())
            .map(|(event, _)| event)
            .collect()
    }

    /// Pending events that started before `now`, most recent first, at most `limit`.
    pub fn overdue_alerts<'a, Tz: TimeZone>(
        events: &'a [CalendarEvent],
        now: &DateTime<Tz>,
        limit: usize,
    ) -> Vec<&'a CalendarEvent> {
        let mut overdue: Vec<_> = Self::with_starts(events, &now.timezone())
            .into_iter()
            .filter(|(event, start)| start < now && !event.is_completed())
            .collect();

        overdue.sort_by(|a, b| b.1.cmp(&a.1));
        overdue.truncate(limit);
        overdue.into_iter().map(|(event, _)| event).collect()
    }

    /// Event counts for the Sunday-to-Saturday week containing `now`.
    pub fn weekly_load<Tz: TimeZone>(events: &[CalendarEvent], now: &DateTime<Tz>) -> WeeklyLoad {
        let today = now.date_naive();
        let back = u64::from(today.weekday().num_days_from_sunday());
        let week_start = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        let week_end = week_start.checked_add_days(Days::new(7));

        let mut buckets = [0usize; 7];
        for (_, start) in Self::with_starts(events, &now.timezone()) {
            let day = start.date_naive();
            let in_week = day >= week_start && week_end.map_or(true, |end| day < end);
            if in_week {
                buckets[day.weekday().num_days_from_sunday() as usize] += 1;
            }
        }

        let days = DISPLAY_WEEK.map(|weekday| DayLoad {
            weekday,
            count: buckets[weekday.num_days_from_sunday() as usize],
        });
        let total = buckets.iter().sum();

        WeeklyLoad {
            week_start,
            days,
            total,
            tier: LoadTier::from_total(total),
            fraction: (total as f64 / FULL_WEEK).min(1.0),
        }
    }

    pub fn filter_by_category<'a>(
        events: &'a [CalendarEvent],
        enabled: &[EventCategory],
    ) -> Vec<&'a CalendarEvent> {
        events
            .iter()
            .filter(|event| enabled.contains(&event.category))
            .collect()
    }

    /// Percentage of the project's linked events that are completed, 0 when
    /// nothing links to it.
    pub fn project_progress(events: &[CalendarEvent], project_id: Uuid) -> u8 {
        let (total, completed) = events
            .iter()
            .filter(|event| event.project_id == Some(project_id))
            .fold((0usize, 0usize), |(total, completed), event| {
                (total + 1, completed + usize::from(event.is_completed()))
            });

        if total == 0 {
            return 0;
        }
        (100.0 * completed as f64 / total as f64).round() as u8
    }

    pub fn events_by_user(events: &[CalendarEvent], user_id: Uuid) -> Vec<&CalendarEvent> {
        events
            .iter()
            .filter(|event| event.user_id == Some(user_id))
            .collect()
    }

    /// Events starting in `now`'s calendar month.
    pub fn events_in_month<'a, Tz: TimeZone>(
        events: &'a [CalendarEvent],
        now: &DateTime<Tz>,
    ) -> Vec<&'a CalendarEvent> {
        Self::with_starts(events, &now.timezone())
            .into_iter()
            .filter(|(_, start)| start.year() == now.year() && start.month() == now.month())
            .map(|(event, _)| event)
            .collect()
    }

    fn today_with_starts<'a, Tz: TimeZone>(
        events: &'a [CalendarEvent],
        now: &DateTime<Tz>,
    ) -> Vec<(&'a CalendarEvent, DateTime<Tz>)> {
        let today = now.date_naive();
        let mut todays: Vec<_> = Self::with_starts(events, &now.timezone())
            .into_iter()
            .filter(|(_, start)| start.date_naive() == today)
            .collect();
        todays.sort_by(|a, b| a.1.cmp(&b.1));
        todays
    }

    fn with_starts<'a, Tz: TimeZone>(
        events: &'a [CalendarEvent],
        tz: &Tz,
    ) -> Vec<(&'a CalendarEvent, DateTime<Tz>)> {
        events
            .iter()
            .filter_map(|event| match event.start.resolve(tz) {
                Some(start) => Some((event, start)),
                None => {
                    tracing::debug!("Skipping event {} with unparseable start {:?}", event.id, event.start.as_str());
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use taskhub_types::{EventStatus, Timestamp};

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    /// Wednesday 2025-06-04 12:00 at UTC-3; the week runs Sun 06-01 to Sat 06-07.
    fn now() -> DateTime<FixedOffset> {
        brt().with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()
    }

    fn event(title: &str, start: &str, status: EventStatus) -> CalendarEvent {
        CalendarEvent {
            id: Uuid::new_v4(),
            title: title.to_string(),
            start: Timestamp::new(start),
            end: None,
            all_day: false,
            category: EventCategory::Projeto,
            status,
            description: None,
            team: None,
            team_id: None,
            project_id: None,
            user_id: None,
            created_by: None,
        }
    }

    fn pending(title: &str, start: &str) -> CalendarEvent {
        event(title, start, EventStatus::Pending)
    }

    fn titles(events: &[&CalendarEvent]) -> Vec<String> {
        events.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn test_today_events_sorted_by_local_day() {
        let events = vec![
            pending("afternoon", "2025-06-04T15:00:00"),
            pending("yesterday", "2025-06-03T23:30:00"),
            pending("morning", "2025-06-04T08:00:00"),
            // 01:00 UTC on the 5th is 22:00 on the 4th locally.
            pending("late utc", "2025-06-05T01:00:00Z"),
            pending("tomorrow", "2025-06-05T00:00:00"),
            pending("broken", "not a date"),
        ];

        let today = EventProjector::today_events(&events, &now());
        assert_eq!(titles(&today), ["morning", "afternoon", "late utc"]);
    }

    #[test]
    fn test_today_events_stable_for_ties() {
        let events = vec![
            pending("first", "2025-06-04T10:00:00"),
            pending("second", "2025-06-04T10:00:00"),
            pending("third", "2025-06-04T10:00:00"),
        ];
        let today = EventProjector::today_events(&events, &now());
        assert_eq!(titles(&today), ["first", "second", "third"]);
    }

    #[test]
    fn test_upcoming_today_skips_past_and_completed() {
        let events = vec![
            pending("done earlier", "2025-06-04T09:00:00"),
            event("finished", "2025-06-04T16:00:00", EventStatus::Completed),
            pending("exactly now", "2025-06-04T12:00:00"),
            pending("later", "2025-06-04T14:00:00"),
        ];

        let upcoming = EventProjector::upcoming_today(&events, &now());
        assert_eq!(titles(&upcoming), ["later"]);
    }

    #[test]
    fn test_overdue_most_recent_first_and_limited() {
        let events = vec![
            pending("oldest", "2025-05-01T10:00:00"),
            pending("yesterday", "2025-06-03T10:00:00"),
            event("completed", "2025-06-04T09:00:00", EventStatus::Completed),
            pending("this morning", "2025-06-04T09:00:00"),
            pending("last week", "2025-05-28T10:00:00"),
            pending("future", "2025-06-10T10:00:00"),
        ];

        let overdue = EventProjector::overdue_alerts(&events, &now(), DEFAULT_OVERDUE_LIMIT);
        assert_eq!(titles(&overdue), ["this morning", "yesterday", "last week"]);

        let all = EventProjector::overdue_alerts(&events, &now(), 10);
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|e| !e.is_completed()));
    }

    #[test]
    fn test_overdue_excludes_exactly_now_and_honors_zero_limit() {
        let events = vec![
            pending("exactly now", "2025-06-04T12:00:00"),
            // Same instant written with an offset.
            pending("now in utc", "2025-06-04T15:00:00Z"),
            pending("a minute ago", "2025-06-04T11:59:00"),
        ];

        let overdue = EventProjector::overdue_alerts(&events, &now(), 3);
        assert_eq!(titles(&overdue), ["a minute ago"]);
        assert!(EventProjector::overdue_alerts(&events, &now(), 0).is_empty());
    }

    #[test]
    fn test_start_in_dst_gap_still_counts_today() {
        use chrono_tz::America::New_York;

        let now = New_York.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        let events = vec![pending("skipped hour", "2025-03-09T02:30:00")];

        assert_eq!(titles(&EventProjector::today_events(&events, &now)), ["skipped hour"]);
        assert_eq!(titles(&EventProjector::overdue_alerts(&events, &now, 3)), ["skipped hour"]);
        assert_eq!(EventProjector::weekly_load(&events, &now).total, 1);
    }

    #[test]
    fn test_yesterday_pending_is_overdue_not_today() {
        let events = vec![pending("missed", "2025-06-03T10:00:00")];
        assert!(EventProjector::today_events(&events, &now()).is_empty());
        assert_eq!(
            titles(&EventProjector::overdue_alerts(&events, &now(), 3)),
            ["missed"]
        );
    }

    #[test]
    fn test_completing_an_event_clears_alerts() {
        let mut events = vec![
            pending("missed", "2025-06-04T09:00:00"),
            pending("soon", "2025-06-04T13:00:00"),
        ];
        assert_eq!(EventProjector::overdue_alerts(&events, &now(), 3).len(), 1);
        assert_eq!(EventProjector::upcoming_today(&events, &now()).len(), 1);

        for event in &mut events {
            event.status = event.status.toggled();
        }
        assert!(EventProjector::overdue_alerts(&events, &now(), 3).is_empty());
        assert!(EventProjector::upcoming_today(&events, &now()).is_empty());
    }

    #[test]
    fn test_weekly_load_buckets_monday_first() {
        let events = vec![
            pending("sun", "2025-06-01T00:00:00"),
            pending("mon", "2025-06-02T10:00:00"),
            pending("mon 2", "2025-06-02T18:00:00"),
            pending("sat", "2025-06-07T23:59:00"),
            pending("prev sat", "2025-05-31T23:59:00"),
            pending("next sun", "2025-06-08T00:00:00"),
            pending("bad", ""),
        ];

        let load = EventProjector::weekly_load(&events, &now());
        assert_eq!(load.week_start.to_string(), "2025-06-01");
        assert_eq!(load.days[0], DayLoad { weekday: Weekday::Mon, count: 2 });
        assert_eq!(load.days[5], DayLoad { weekday: Weekday::Sat, count: 1 });
        assert_eq!(load.days[6], DayLoad { weekday: Weekday::Sun, count: 1 });
        assert_eq!(load.total, 4);
        assert_eq!(load.days.iter().map(|d| d.count).sum::<usize>(), load.total);
        assert_eq!(load.tier, LoadTier::Light);
        assert!((load.fraction - 4.0 / 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_load_on_sunday_starts_same_day() {
        let sunday = brt().with_ymd_and_hms(2025, 6, 8, 9, 0, 0).unwrap();
        let events = vec![pending("sun", "2025-06-08T10:00:00")];
        let load = EventProjector::weekly_load(&events, &sunday);
        assert_eq!(load.week_start.to_string(), "2025-06-08");
        assert_eq!(load.total, 1);
    }

    #[test]
    fn test_load_tiers_and_fraction_cap() {
        assert_eq!(LoadTier::from_total(0), LoadTier::Light);
        assert_eq!(LoadTier::from_total(5), LoadTier::Light);
        assert_eq!(LoadTier::from_total(6), LoadTier::Medium);
        assert_eq!(LoadTier::from_total(10), LoadTier::Medium);
        assert_eq!(LoadTier::from_total(11), LoadTier::Heavy);

        let events: Vec<_> = (0..20)
            .map(|i| pending(&format!("e{i}"), "2025-06-03T10:00:00"))
            .collect();
        let load = EventProjector::weekly_load(&events, &now());
        assert_eq!(load.tier, LoadTier::Heavy);
        assert_eq!(load.fraction, 1.0);
    }

    #[test]
    fn test_filter_by_category() {
        let mut team = pending("team", "2025-06-04T10:00:00");
        team.category = EventCategory::Time;
        let mut personal = pending("personal", "2025-06-04T11:00:00");
        personal.category = EventCategory::Pessoal;
        let events = vec![team, personal, pending("project", "2025-06-04T12:00:00")];

        let filtered =
            EventProjector::filter_by_category(&events, &[EventCategory::Time, EventCategory::Projeto]);
        assert_eq!(titles(&filtered), ["team", "project"]);
        assert!(EventProjector::filter_by_category(&events, &[]).is_empty());
    }

    #[test]
    fn test_project_progress_rounds() {
        let project = Uuid::new_v4();
        assert_eq!(EventProjector::project_progress(&[], project), 0);

        let mut events: Vec<_> = (0..3)
            .map(|i| {
                let mut e = pending(&format!("task {i}"), "2025-06-04T10:00:00");
                e.project_id = Some(project);
                e
            })
            .collect();
        events.push(pending("unlinked", "2025-06-04T10:00:00"));
        assert_eq!(EventProjector::project_progress(&events, project), 0);

        events[0].status = EventStatus::Completed;
        assert_eq!(EventProjector::project_progress(&events, project), 33);
        events[1].status = EventStatus::Completed;
        assert_eq!(EventProjector::project_progress(&events, project), 67);
        events[2].status = EventStatus::Completed;
        assert_eq!(EventProjector::project_progress(&events, project), 100);
    }

    #[test]
    fn test_events_by_user_and_month() {
        let user = Uuid::new_v4();
        let mut mine = pending("mine", "2025-06-20T10:00:00");
        mine.user_id = Some(user);
        let events = vec![mine, pending("may", "2025-05-31T10:00:00"), pending("bad", "x")];

        assert_eq!(titles(&EventProjector::events_by_user(&events, user)), ["mine"]);
        assert_eq!(titles(&EventProjector::events_in_month(&events, &now())), ["mine"]);
    }
}
