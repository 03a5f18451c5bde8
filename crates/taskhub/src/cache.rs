//! In-memory dashboard data.
//!
//! [`DataCache`] owns the collections fetched from the backend. A refresh
//! replaces each collection wholesale; a collection whose fetch fails keeps
//! its previous contents. Every write is validated locally first, sent, and
//! followed by a full refresh when the backend accepts it.

use crate::api::DashboardApi;
use crate::error::{ApiError, ApiResult};
use crate::projection::EventProjector;
use chrono::{DateTime, Utc};
use taskhub_types::{
    CalendarEvent, EventInput, EventStatus, MemberRequest, Project, ProjectInput,
    RoleUpdateRequest, Team, TeamInput, User,
};
use uuid::Uuid;
use validator::Validate;

/// Which collections failed during a refresh.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub failures: Vec<(&'static str, ApiError)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct DataCache<A> {
    api: A,
    projects: Vec<Project>,
    events: Vec<CalendarEvent>,
    teams: Vec<Team>,
    users: Vec<User>,
    loading: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<A: DashboardApi> DataCache<A> {
    /// An empty cache. It reports loading until the first refresh finishes.
    pub fn new(api: A) -> Self {
        Self {
            api,
            projects: Vec::new(),
            events: Vec::new(),
            teams: Vec::new(),
            users: Vec::new(),
            loading: true,
            refreshed_at: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn event(&self, id: Uuid) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn team(&self, id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn project_progress(&self, project_id: Uuid) -> u8 {
        EventProjector::project_progress(&self.events, project_id)
    }

    pub fn events_by_user(&self, user_id: Uuid) -> Vec<&CalendarEvent> {
        EventProjector::events_by_user(&self.events, user_id)
    }

    /// Fetch every collection concurrently and replace what came back.
    pub async fn refresh(&mut self) -> RefreshReport {
        self.loading = true;

        let api = &self.api;
        let (projects, events, teams, users) = tokio::join!(
            api.list_projects(),
            api.list_events(),
            api.list_teams(),
            api.list_users(),
        );

        let mut report = RefreshReport::default();
        replace(&mut self.projects, projects, "projects", &mut report);
        replace(&mut self.events, events, "events", &mut report);
        replace(&mut self.teams, teams, "teams", &mut report);
        replace(&mut self.users, users, "users", &mut report);

        self.loading = false;
        if report.is_complete() {
            self.refreshed_at = Some(Utc::now());
            tracing::info!(
                "Loaded {} projects, {} events, {} teams, {} users",
                self.projects.len(),
                self.events.len(),
                self.teams.len(),
                self.users.len()
            );
        }
        report
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub async fn create_project(&mut self, input: &ProjectInput) -> ApiResult<()> {
        input.validate()?;
        let result = self.api.create_project(input).await;
        self.after_write("create project", result).await
    }

    pub async fn update_project(&mut self, id: Uuid, input: &ProjectInput) -> ApiResult<()> {
        input.validate()?;
        let result = self.api.update_project(id, input).await;
        self.after_write("update project", result).await
    }

    pub async fn delete_project(&mut self, id: Uuid) -> ApiResult<()> {
        let result = self.api.delete_project(id).await;
        self.after_write("delete project", result).await
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub async fn create_event(&mut self, input: &EventInput) -> ApiResult<()> {
        input.validate()?;
        let result = self.api.create_event(input).await;
        self.after_write("create event", result).await
    }

    pub async fn update_event(&mut self, id: Uuid, input: &EventInput) -> ApiResult<()> {
        input.validate()?;
        let result = self.api.update_event(id, input).await;
        self.after_write("update event", result).await
    }

    pub async fn delete_event(&mut self, id: Uuid) -> ApiResult<()> {
        let result = self.api.delete_event(id).await;
        self.after_write("delete event", result).await
    }

    /// Flip a cached event between pending and completed by sending the whole
    /// event back with the new status. Returns the status that was sent.
    pub async fn toggle_event_completion(&mut self, id: Uuid) -> ApiResult<EventStatus> {
        let event = self
            .event(id)
            .ok_or_else(|| ApiError::not_found(format!("Event {}", id)))?;

        let mut input = EventInput::from(event);
        input.status = event.status.toggled();
        let status = input.status;

        self.update_event(id, &input).await?;
        Ok(status)
    }

    /// Set an event's status explicitly; a no-op when it already has it.
    pub async fn set_event_status(&mut self, id: Uuid, status: EventStatus) -> ApiResult<()> {
        let current = self
            .event(id)
            .map(|e| e.status)
            .ok_or_else(|| ApiError::not_found(format!("Event {}", id)))?;
        if current != status {
            self.toggle_event_completion(id).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Teams & users
    // ------------------------------------------------------------------

    pub async fn create_team(&mut self, input: &TeamInput) -> ApiResult<()> {
        input.validate()?;
        let result = self.api.create_team(input).await;
        self.after_write("create team", result).await
    }

    pub async fn add_team_member(&mut self, team_id: Uuid, email: &str) -> ApiResult<()> {
        let request = MemberRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;
        let result = self.api.add_team_member(team_id, &request).await;
        self.after_write("add team member", result).await
    }

    pub async fn remove_team_member(&mut self, team_id: Uuid, email: &str) -> ApiResult<()> {
        let request = MemberRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;
        let result = self.api.remove_team_member(team_id, &request).await;
        self.after_write("remove team member", result).await
    }

    /// Reassign a user's role. Independent of the permission matrix.
    pub async fn update_user_role(&mut self, user_id: Uuid, role: &str) -> ApiResult<()> {
        let request = RoleUpdateRequest {
            role: role.trim().to_string(),
        };
        request.validate()?;
        let result = self.api.update_user_role(user_id, &request).await;
        self.after_write("update user role", result).await
    }

    async fn after_write(&mut self, action: &str, result: ApiResult<()>) -> ApiResult<()> {
        match result {
            Ok(()) => {
                tracing::debug!("{} succeeded, refreshing", action);
                let report = self.refresh().await;
                for (collection, e) in &report.failures {
                    tracing::warn!("Refresh after {} left {} stale: {}", action, collection, e);
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to {}: {}", action, e);
                Err(e)
            }
        }
    }
}

fn replace<T>(
    slot: &mut Vec<T>,
    fetched: ApiResult<Vec<T>>,
    name: &'static str,
    report: &mut RefreshReport,
) {
    match fetched {
        Ok(items) => *slot = items,
        Err(e) => {
            tracing::error!("Failed to fetch {}: {}", name, e);
            report.failures.push((name, e));
        }
    }
}
