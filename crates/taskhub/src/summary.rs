//! Dashboard summary figures and the project list filter.

use crate::projection::EventProjector;
use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;
use taskhub_types::{CalendarEvent, Project, ProjectStatus, Team};

/// Headline counters on the dashboard home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub events_this_month: usize,
    pub events_today: usize,
    pub active_projects: usize,
    pub total_teams: usize,
}

impl DashboardMetrics {
    pub fn compute<Tz: TimeZone>(
        events: &[CalendarEvent],
        projects: &[Project],
        teams: &[Team],
        now: &DateTime<Tz>,
    ) -> Self {
        Self {
            events_this_month: EventProjector::events_in_month(events, now).len(),
            events_today: EventProjector::today_events(events, now).len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::InProgress)
                .count(),
            total_teams: teams.len(),
        }
    }
}

/// Completed projects per due-date month, January first.
///
/// Months are taken from the date written in the due date, across all years.
/// Projects without a readable due date are skipped.
pub fn monthly_completed(projects: &[Project]) -> [u32; 12] {
    let mut months = [0u32; 12];
    for project in projects {
        if project.status != ProjectStatus::Completed {
            continue;
        }
        if let Some(due) = project.due_date.as_ref().and_then(|d| d.date_part()) {
            months[due.month0() as usize] += 1;
        }
    }
    months
}

/// Project list filter: a status (or all) plus a case-insensitive name search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub search: String,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        let status_ok = self.status.map_or(true, |status| project.status == status);
        status_ok
            && project
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskhub_types::{EventCategory, EventStatus, TeamRef, Timestamp};
    use uuid::Uuid;

    fn project(name: &str, status: ProjectStatus, due: Option<&str>) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            status,
            team: TeamRef {
                id: None,
                name: "Sem Time".to_string(),
            },
            due_date: due.map(Timestamp::from),
            owner_id: None,
        }
    }

    fn event(start: &str) -> CalendarEvent {
        CalendarEvent {
            id: Uuid::new_v4(),
            title: "e".to_string(),
            start: Timestamp::new(start),
            end: None,
            all_day: false,
            category: EventCategory::Projeto,
            status: EventStatus::Pending,
            description: None,
            team: None,
            team_id: None,
            project_id: None,
            user_id: None,
            created_by: None,
        }
    }

    #[test]
    fn test_metrics() {
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
        let events = vec![
            event("2025-06-04T09:00:00"),
            event("2025-06-20T09:00:00"),
            event("2025-05-04T09:00:00"),
            event("garbage"),
        ];
        let projects = vec![
            project("a", ProjectStatus::InProgress, None),
            project("b", ProjectStatus::InProgress, None),
            project("c", ProjectStatus::Paused, None),
        ];
        let teams = vec![Team {
            id: Uuid::new_v4(),
            name: "Time QA".to_string(),
            description: None,
            members: vec![],
        }];

        let metrics = DashboardMetrics::compute(&events, &projects, &teams, &now);
        assert_eq!(
            metrics,
            DashboardMetrics {
                events_this_month: 2,
                events_today: 1,
                active_projects: 2,
                total_teams: 1,
            }
        );
    }

    #[test]
    fn test_monthly_completed() {
        let projects = vec![
            project("jan", ProjectStatus::Completed, Some("2025-01-15")),
            project("jan prev year", ProjectStatus::Completed, Some("2024-01-02")),
            project("dec", ProjectStatus::Completed, Some("2025-12-31")),
            project("open", ProjectStatus::InProgress, Some("2025-03-01")),
            project("no date", ProjectStatus::Completed, None),
            project("bad date", ProjectStatus::Completed, Some("soon")),
        ];

        let months = monthly_completed(&projects);
        assert_eq!(months[0], 2);
        assert_eq!(months[2], 0);
        assert_eq!(months[11], 1);
        assert_eq!(months.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_project_filter() {
        let projects = vec![
            project("Portal Cliente", ProjectStatus::InProgress, None),
            project("App Mobile", ProjectStatus::Completed, None),
            project("Portal Interno", ProjectStatus::Completed, None),
        ];

        let all = ProjectFilter::default();
        assert_eq!(all.apply(&projects).len(), 3);

        let search = ProjectFilter {
            status: None,
            search: "portal".to_string(),
        };
        assert_eq!(search.apply(&projects).len(), 2);

        let both = ProjectFilter {
            status: Some(ProjectStatus::Completed),
            search: "PORTAL".to_string(),
        };
        let found = both.apply(&projects);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Portal Interno");
    }
}
