use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

pub mod timestamp;

pub use timestamp::Timestamp;

/// Role that bypasses the permission matrix entirely.
pub const ADMIN_ROLE: &str = "Admin";

/// Avatar assigned when the backend returns a profile without one.
pub const DEFAULT_AVATAR: &str = "/images/user/perfil.svg";

// ============================================================================
// Calendar Events
// ============================================================================

/// Fixed set of event categories; drives calendar filters and colors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum EventCategory {
    #[default]
    Projeto,
    Time,
    Pessoal,
    Outros,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Projeto,
        EventCategory::Time,
        EventCategory::Pessoal,
        EventCategory::Outros,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventCategory::Projeto => "Projeto",
            EventCategory::Time => "Time",
            EventCategory::Pessoal => "Pessoal",
            EventCategory::Outros => "Outros",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Projeto" => Some(EventCategory::Projeto),
            "Time" => Some(EventCategory::Time),
            "Pessoal" => Some(EventCategory::Pessoal),
            "Outros" => Some(EventCategory::Outros),
            _ => None,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(EventStatus::Pending),
            "completed" => Some(EventStatus::Completed),
            _ => None,
        }
    }

    /// The opposite status, used by completion toggles.
    pub fn toggled(self) -> Self {
        match self {
            EventStatus::Pending => EventStatus::Completed,
            EventStatus::Completed => EventStatus::Pending,
        }
    }
}

/// Calendar event in its canonical in-memory shape.
///
/// `start` and `end` stay as raw [`Timestamp`]s; see the projector for how
/// they are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub all_day: bool,
    pub category: EventCategory,
    pub status: EventStatus,
    pub description: Option<String>,
    pub team: Option<String>,
    pub team_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

impl CalendarEvent {
    pub fn is_completed(&self) -> bool {
        self.status == EventStatus::Completed
    }
}

/// Body for `POST /events` and `PUT /events/{id}`.
///
/// Field names follow the Java backend (`startTime`, `endTime`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    #[validate(length(min = 1))]
    pub start_time: String,

    pub end_time: Option<String>,
    pub all_day: bool,
    pub category: EventCategory,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub project_id: Option<Uuid>,
    pub status: EventStatus,
}

impl From<&CalendarEvent> for EventInput {
    fn from(event: &CalendarEvent) -> Self {
        EventInput {
            title: event.title.clone(),
            start_time: event.start.as_str().to_string(),
            end_time: event.end.as_ref().map(|end| end.as_str().to_string()),
            all_day: event.all_day,
            category: event.category,
            description: event.description.clone(),
            project_id: event.project_id,
            status: event.status,
        }
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[serde(rename = "Concluído")]
    Completed,
    #[serde(rename = "Pausado")]
    Paused,
    #[serde(rename = "Atrasado")]
    Late,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Paused,
        ProjectStatus::Late,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::InProgress => "Em Andamento",
            ProjectStatus::Completed => "Concluído",
            ProjectStatus::Paused => "Pausado",
            ProjectStatus::Late => "Atrasado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Em Andamento" => Some(ProjectStatus::InProgress),
            "Concluído" => Some(ProjectStatus::Completed),
            "Pausado" => Some(ProjectStatus::Paused),
            "Atrasado" => Some(ProjectStatus::Late),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team reference carried by a project. The id is absent when the backend
/// only sent a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub team: TeamRef,
    pub due_date: Option<Timestamp>,
    pub owner_id: Option<Uuid>,
}

/// `{ "id": ... }` reference the backend resolves into a team entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: Uuid,
}

/// Body for `POST /projects` and `PUT /projects/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub status: ProjectStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<IdRef>,

    pub due_date: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl From<&Project> for ProjectInput {
    fn from(project: &Project) -> Self {
        ProjectInput {
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            team: project.team.id.map(|id| IdRef { id }),
            due_date: project.due_date.as_ref().map(|d| d.as_str().to_string()),
            owner_id: project.owner_id,
        }
    }
}

// ============================================================================
// Teams & Users
// ============================================================================

/// A team. Members are user ids only; removing a team never touches users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TeamInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// Body for adding or removing a team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MemberRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub team_id: Option<Uuid>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RoleUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    pub role: String,
}

/// Partial profile update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40))]
    pub phone: Option<String>,
}

// ============================================================================
// Auth API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,
}

/// Profile handed over by a third-party identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub display_name: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SocialLoginRequest {
    pub name: Option<String>,

    #[validate(email)]
    pub email: String,

    pub avatar: Option<String>,
    pub provider: String,
}

// ============================================================================
// Permissions
// ============================================================================

/// UI/domain areas subject to permission gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    #[serde(rename = "Projetos")]
    Projects,
    #[serde(rename = "Times")]
    Teams,
    #[serde(rename = "Calendário")]
    Calendar,
    #[serde(rename = "Configurações")]
    Settings,
    #[serde(rename = "Usuários")]
    Users,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Projects,
        Resource::Teams,
        Resource::Calendar,
        Resource::Settings,
        Resource::Users,
    ];

    /// Label used as the persisted matrix key.
    pub fn as_str(&self) -> &str {
        match self {
            Resource::Projects => "Projetos",
            Resource::Teams => "Times",
            Resource::Calendar => "Calendário",
            Resource::Settings => "Configurações",
            Resource::Users => "Usuários",
        }
    }

    /// Accepts the persisted label or a lowercase English name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Projetos" | "projects" => Some(Resource::Projects),
            "Times" | "teams" => Some(Resource::Teams),
            "Calendário" | "calendar" => Some(Resource::Calendar),
            "Configurações" | "settings" => Some(Resource::Settings),
            "Usuários" | "users" => Some(Resource::Users),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    View,
    Edit,
}

impl PermissionAction {
    pub fn as_str(&self) -> &str {
        match self {
            PermissionAction::View => "view",
            PermissionAction::Edit => "edit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "view" => Some(PermissionAction::View),
            "edit" => Some(PermissionAction::Edit),
            _ => None,
        }
    }
}

pub type RolePermissions = BTreeMap<Resource, bool>;

/// Role name -> resource -> "can edit".
///
/// Serialized as a plain JSON object so the persisted value reads
/// `{"Manager": {"Projetos": true, ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(pub BTreeMap<String, RolePermissions>);

impl PermissionMatrix {
    pub fn empty() -> Self {
        PermissionMatrix(BTreeMap::new())
    }

    pub fn role(&self, role: &str) -> Option<&RolePermissions> {
        self.0.get(role)
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    /// The stored cell, `None` when either the role or the resource is missing.
    pub fn get(&self, role: &str, resource: Resource) -> Option<bool> {
        self.0.get(role)?.get(&resource).copied()
    }

    pub fn set(&mut self, role: impl Into<String>, resource: Resource, allowed: bool) {
        self.0
            .entry(role.into())
            .or_default()
            .insert(resource, allowed);
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Default for PermissionMatrix {
    /// Matrix applied when nothing has been persisted yet.
    fn default() -> Self {
        let mut matrix = PermissionMatrix::empty();
        for resource in Resource::ALL {
            matrix.set(ADMIN_ROLE, resource, true);
        }
        for (resource, allowed) in [
            (Resource::Projects, true),
            (Resource::Teams, true),
            (Resource::Calendar, true),
            (Resource::Settings, false),
            (Resource::Users, false),
        ] {
            matrix.set("Manager", resource, allowed);
        }
        for (resource, allowed) in [
            (Resource::Projects, false),
            (Resource::Teams, false),
            (Resource::Calendar, true),
            (Resource::Settings, false),
            (Resource::Users, false),
        ] {
            matrix.set("Member", resource, allowed);
        }
        matrix
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error body returned by the backend. Either field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}
