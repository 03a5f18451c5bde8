//! Backend record normalization.
//!
//! The backend has shipped the same field under different names (Java
//! camelCase, Node snake_case, FullCalendar's `extendedProps` nesting). Each
//! canonical field has an ordered alias list below; the first alias that is
//! present, non-null, of the right JSON type and (for strings) non-empty wins.

use serde_json::{Map, Value};
use taskhub_types::{
    CalendarEvent, EventCategory, EventStatus, Project, ProjectStatus, Team, TeamRef, Timestamp,
    User,
};
use uuid::Uuid;

/// Alias tables, in precedence order. Dotted entries walk nested objects.
pub mod aliases {
    pub mod event {
        pub const ID: &[&str] = &["id"];
        pub const TITLE: &[&str] = &["title"];
        pub const START: &[&str] = &["startTime", "start_time", "start"];
        pub const END: &[&str] = &["endTime", "end_time", "end"];
        pub const ALL_DAY: &[&str] = &["allDay", "all_day"];
        pub const CATEGORY: &[&str] = &["category", "extendedProps.category"];
        pub const DESCRIPTION: &[&str] = &["description", "extendedProps.description"];
        pub const PROJECT_ID: &[&str] = &["projectId", "project_id", "extendedProps.projectId"];
        pub const TEAM_ID: &[&str] = &["teamId", "team_id", "extendedProps.teamId"];
        pub const TEAM: &[&str] = &["team", "extendedProps.team"];
        pub const USER_ID: &[&str] = &["userId", "user_id", "extendedProps.userId"];
        pub const STATUS: &[&str] = &["status", "extendedProps.status"];
        pub const CREATED_BY: &[&str] = &["createdBy", "created_by", "extendedProps.createdBy"];
    }

    pub mod project {
        pub const ID: &[&str] = &["id"];
        pub const NAME: &[&str] = &["name"];
        pub const DESCRIPTION: &[&str] = &["description"];
        pub const STATUS: &[&str] = &["status"];
        pub const DUE_DATE: &[&str] = &["dueDate", "due_date"];
        pub const OWNER_ID: &[&str] = &["ownerId", "owner_id"];
        pub const TEAM: &[&str] = &["team"];
        pub const TEAM_ID: &[&str] = &["teamId", "team_id", "team.id"];
        pub const TEAM_NAME: &[&str] = &["team.name", "team"];
    }

    pub mod team {
        pub const ID: &[&str] = &["id"];
        pub const NAME: &[&str] = &["name"];
        pub const DESCRIPTION: &[&str] = &["description"];
        pub const MEMBERS: &[&str] = &["members"];
    }

    pub mod user {
        pub const ID: &[&str] = &["id"];
        pub const NAME: &[&str] = &["name"];
        pub const EMAIL: &[&str] = &["email"];
        pub const ROLE: &[&str] = &["role"];
        pub const AVATAR: &[&str] = &["avatar"];
        pub const PHONE: &[&str] = &["phone"];
        pub const TEAM_ID: &[&str] = &["teamId", "team_id"];
    }
}

const NO_TEAM: &str = "Sem Time";
const DEFAULT_ROLE: &str = "Member";

fn lookup<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// First alias holding a non-empty string.
pub fn resolve_str<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| lookup(record, alias)?.as_str())
        .find(|s| !s.is_empty())
}

/// First alias holding a boolean.
pub fn resolve_bool(record: &Map<String, Value>, aliases: &[&str]) -> Option<bool> {
    aliases
        .iter()
        .find_map(|alias| lookup(record, alias)?.as_bool())
}

/// First alias holding a string that parses as a UUID.
pub fn resolve_uuid(record: &Map<String, Value>, aliases: &[&str]) -> Option<Uuid> {
    aliases.iter().find_map(|alias| {
        let raw = lookup(record, alias)?.as_str()?;
        Uuid::parse_str(raw).ok()
    })
}

fn record_id(record: &Map<String, Value>, aliases: &[&str], kind: &str) -> Option<Uuid> {
    let id = resolve_uuid(record, aliases);
    if id.is_none() {
        tracing::warn!("Dropping {} record without a valid id: {:?}", kind, record.get("id"));
    }
    id
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Normalize one raw event record.
pub fn event(value: &Value) -> Option<CalendarEvent> {
    use aliases::event as a;

    let record = value.as_object()?;
    let id = record_id(record, a::ID, "event")?;

    let category = match resolve_str(record, a::CATEGORY) {
        None => EventCategory::default(),
        Some(raw) => EventCategory::from_str(raw).unwrap_or_else(|| {
            tracing::warn!("Unknown category {:?} on event {}, using Outros", raw, id);
            EventCategory::Outros
        }),
    };

    let status = match resolve_str(record, a::STATUS) {
        None => EventStatus::default(),
        Some(raw) => EventStatus::from_str(raw).unwrap_or_else(|| {
            tracing::warn!("Unknown status {:?} on event {}, using pending", raw, id);
            EventStatus::Pending
        }),
    };

    Some(CalendarEvent {
        id,
        title: resolve_str(record, a::TITLE).unwrap_or_default().to_string(),
        start: Timestamp::new(resolve_str(record, a::START).unwrap_or_default()),
        end: resolve_str(record, a::END).map(Timestamp::from),
        all_day: resolve_bool(record, a::ALL_DAY).unwrap_or(false),
        category,
        status,
        description: owned(resolve_str(record, a::DESCRIPTION)),
        team: owned(resolve_str(record, a::TEAM)),
        team_id: resolve_uuid(record, a::TEAM_ID),
        project_id: resolve_uuid(record, a::PROJECT_ID),
        user_id: resolve_uuid(record, a::USER_ID),
        created_by: resolve_uuid(record, a::CREATED_BY),
    })
}

/// Normalize one raw project record.
pub fn project(value: &Value) -> Option<Project> {
    use aliases::project as a;

    let record = value.as_object()?;
    let id = record_id(record, a::ID, "project")?;

    let status = match resolve_str(record, a::STATUS) {
        None => ProjectStatus::default(),
        Some(raw) => ProjectStatus::from_str(raw).unwrap_or_else(|| {
            tracing::warn!("Unknown status {:?} on project {}, using Em Andamento", raw, id);
            ProjectStatus::InProgress
        }),
    };

    let team_name = match lookup(record, a::TEAM[0]) {
        Some(Value::Object(_)) | Some(Value::String(_)) => resolve_str(record, a::TEAM_NAME),
        _ => None,
    };

    let due_date = resolve_str(record, a::DUE_DATE)
        .and_then(|raw| raw.split('T').next())
        .filter(|date| !date.is_empty())
        .map(Timestamp::from);

    Some(Project {
        id,
        name: resolve_str(record, a::NAME).unwrap_or_default().to_string(),
        description: owned(resolve_str(record, a::DESCRIPTION)),
        status,
        team: TeamRef {
            id: resolve_uuid(record, a::TEAM_ID),
            name: team_name.unwrap_or(NO_TEAM).to_string(),
        },
        due_date,
        owner_id: resolve_uuid(record, a::OWNER_ID),
    })
}

/// Normalize one raw team record. Members may arrive as ids or as user objects.
pub fn team(value: &Value) -> Option<Team> {
    use aliases::team as a;

    let record = value.as_object()?;
    let id = record_id(record, a::ID, "team")?;

    let members = a::MEMBERS
        .iter()
        .find_map(|alias| lookup(record, alias)?.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(raw) => Uuid::parse_str(raw).ok(),
                    Value::Object(member) => resolve_uuid(member, &["id"]),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Team {
        id,
        name: resolve_str(record, a::NAME).unwrap_or_default().to_string(),
        description: owned(resolve_str(record, a::DESCRIPTION)),
        members,
    })
}

/// Normalize one raw user record.
pub fn user(value: &Value) -> Option<User> {
    use aliases::user as a;

    let record = value.as_object()?;
    let id = record_id(record, a::ID, "user")?;

    Some(User {
        id,
        name: resolve_str(record, a::NAME).unwrap_or_default().to_string(),
        email: resolve_str(record, a::EMAIL).unwrap_or_default().to_string(),
        role: resolve_str(record, a::ROLE)
            .unwrap_or(DEFAULT_ROLE)
            .to_string(),
        avatar: owned(resolve_str(record, a::AVATAR)),
        phone: owned(resolve_str(record, a::PHONE)),
        team_id: resolve_uuid(record, a::TEAM_ID),
    })
}

fn collect<T>(values: &[Value], normalize: fn(&Value) -> Option<T>) -> Vec<T> {
    values.iter().filter_map(normalize).collect()
}

pub fn events(values: &[Value]) -> Vec<CalendarEvent> {
    collect(values, event)
}

pub fn projects(values: &[Value]) -> Vec<Project> {
    collect(values, project)
}

pub fn teams(values: &[Value]) -> Vec<Team> {
    collect(values, team)
}

pub fn users(values: &[Value]) -> Vec<User> {
    collect(values, user)
}
