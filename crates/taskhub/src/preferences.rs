//! User interface preferences kept in the local store.

use crate::error::StoreError;
use crate::storage::LocalStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key of the default calendar view. Stored as the bare view name.
pub const CALENDAR_VIEW_KEY: &str = "calendarDefaultView";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalendarView {
    #[default]
    #[serde(rename = "dayGridMonth")]
    Month,
    #[serde(rename = "timeGridWeek")]
    Week,
    #[serde(rename = "timeGridDay")]
    Day,
    #[serde(rename = "listWeek")]
    List,
}

impl CalendarView {
    pub const ALL: [CalendarView; 4] = [
        CalendarView::Month,
        CalendarView::Week,
        CalendarView::Day,
        CalendarView::List,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CalendarView::Month => "dayGridMonth",
            CalendarView::Week => "timeGridWeek",
            CalendarView::Day => "timeGridDay",
            CalendarView::List => "listWeek",
        }
    }

    /// Accepts the stored name or a short alias (`month`, `week`, `day`, `list`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dayGridMonth" | "month" => Some(CalendarView::Month),
            "timeGridWeek" | "week" => Some(CalendarView::Week),
            "timeGridDay" | "day" => Some(CalendarView::Day),
            "listWeek" | "list" => Some(CalendarView::List),
            _ => None,
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Preferences {
    store: LocalStore,
}

impl Preferences {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn calendar_view(&self) -> CalendarView {
        match self.store.get_raw(CALENDAR_VIEW_KEY) {
            Ok(Some(raw)) => CalendarView::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown calendar view {:?}, using default", raw);
                CalendarView::default()
            }),
            Ok(None) => CalendarView::default(),
            Err(e) => {
                tracing::warn!("Failed to read calendar view preference: {}", e);
                CalendarView::default()
            }
        }
    }

    /// Save the view; subscribers of the store are told about the change.
    pub fn set_calendar_view(&self, view: CalendarView) -> Result<(), StoreError> {
        self.store.set_raw(CALENDAR_VIEW_KEY, view.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let prefs = Preferences::new(LocalStore::in_memory());
        assert_eq!(prefs.calendar_view(), CalendarView::Month);
    }

    #[test]
    fn test_set_view_persists_and_publishes() {
        let store = LocalStore::in_memory();
        let prefs = Preferences::new(store.clone());
        let mut changes = store.subscribe();

        prefs.set_calendar_view(CalendarView::Week).unwrap();
        assert_eq!(tokio_test::block_on(changes.recv()).unwrap(), CALENDAR_VIEW_KEY);
        assert_eq!(store.get_raw(CALENDAR_VIEW_KEY).unwrap().as_deref(), Some("timeGridWeek"));
        assert_eq!(Preferences::new(store).calendar_view(), CalendarView::Week);
    }

    #[test]
    fn test_unknown_stored_view_falls_back() {
        let store = LocalStore::in_memory();
        store.set_raw(CALENDAR_VIEW_KEY, "resourceTimeline").unwrap();
        assert_eq!(Preferences::new(store).calendar_view(), CalendarView::Month);
    }

    #[test]
    fn test_view_names() {
        for view in CalendarView::ALL {
            assert_eq!(CalendarView::from_str(view.as_str()), Some(view));
        }
        assert_eq!(CalendarView::from_str("list"), Some(CalendarView::List));
    }
}
