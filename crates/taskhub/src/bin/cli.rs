use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskhub::draft::{self, EventDraft};
use taskhub::preferences::{CalendarView, Preferences};
use taskhub::projection::EventProjector;
use taskhub::summary::{monthly_completed, DashboardMetrics, ProjectFilter};
use taskhub::{AppConfig, AuthSession, DataCache, FileStore, HttpApi, LocalStore, MatrixStore, PermissionGate};
use taskhub_types::{
    CalendarEvent, EventCategory, EventStatus, IdRef, PermissionAction, Project, ProjectInput,
    ProjectStatus, Resource, TeamInput, UserUpdate,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskhub")]
#[command(about = "Dashboard for projects, teams and the shared calendar")]
#[command(
    long_about = "Command-line front end for the TaskHub backend.\n\n\
    Shows today's agenda, overdue items and the weekly load, manages events,\n\
    projects and teams, and edits the role permission matrix kept in the\n\
    local state file."
)]
struct Cli {
    /// Backend API base URL.
    #[arg(short, long, env = "TASKHUB_API_URL")]
    api_url: Option<String>,

    /// File holding the signed-in profile, preferences and permission matrix.
    #[arg(short, long, env = "TASKHUB_STATE_FILE", value_name = "FILE")]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's events and what is still ahead
    Agenda,
    /// Event count per day for the current week
    Week,
    /// Pending events whose start has passed, most recent first
    Overdue {
        /// How many to show (defaults to TASKHUB_OVERDUE_LIMIT)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Dashboard counters, completed projects per month and project progress
    Summary,
    /// Manage calendar events
    Events {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Manage teams and their members
    Teams {
        #[command(subcommand)]
        action: TeamAction,
    },
    /// List users and reassign roles
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Inspect and edit the role permission matrix
    Permissions {
        #[command(subcommand)]
        action: PermissionCommand,
    },
    /// Sign in, sign up and sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Local preferences
    Prefs {
        #[command(subcommand)]
        action: PrefAction,
    },
}

#[derive(Subcommand)]
enum EventAction {
    /// List events, optionally limited to some categories
    List {
        /// Categories to include (Projeto, Time, Pessoal, Outros); all when omitted
        #[arg(short, long, value_parser = parse_category)]
        category: Vec<EventCategory>,

        /// Only events assigned to this user
        #[arg(short, long, value_name = "UUID")]
        user: Option<Uuid>,
    },

    /// Create an event. Without --time it is an all-day event.
    Create {
        title: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: chrono::NaiveDate,

        /// Start time (HH:MM)
        #[arg(short, long, value_parser = parse_time)]
        time: Option<chrono::NaiveTime>,

        /// End date (YYYY-MM-DD), defaults to the start date
        #[arg(long, value_parser = parse_date)]
        end_date: Option<chrono::NaiveDate>,

        /// End time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        end_time: Option<chrono::NaiveTime>,

        #[arg(short, long, value_parser = parse_category, default_value = "Projeto")]
        category: EventCategory,

        #[arg(long, value_name = "TEXT")]
        description: Option<String>,

        /// Project this event counts towards
        #[arg(short, long, value_name = "UUID")]
        project: Option<Uuid>,
    },

    /// Change fields of an existing event; its status is kept
    Update {
        id: Uuid,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long, value_parser = parse_date)]
        date: Option<chrono::NaiveDate>,

        #[arg(short, long, value_parser = parse_time)]
        time: Option<chrono::NaiveTime>,

        #[arg(long, value_parser = parse_date)]
        end_date: Option<chrono::NaiveDate>,

        #[arg(long, value_parser = parse_time)]
        end_time: Option<chrono::NaiveTime>,

        #[arg(short, long, value_parser = parse_category)]
        category: Option<EventCategory>,

        #[arg(long, value_name = "TEXT")]
        description: Option<String>,

        #[arg(short, long, value_name = "UUID")]
        project: Option<Uuid>,
    },

    /// Permanently delete an event
    Delete { id: Uuid },

    /// Mark an event as completed
    Done { id: Uuid },

    /// Mark an event as pending again
    Undo { id: Uuid },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects with their progress
    List {
        /// Em Andamento, Concluído, Pausado or Atrasado
        #[arg(long, value_parser = parse_project_status)]
        status: Option<ProjectStatus>,

        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,
    },

    Create {
        name: String,

        #[arg(short, long, value_name = "TEXT")]
        description: Option<String>,

        #[arg(long, value_parser = parse_project_status, default_value = "Em Andamento")]
        status: ProjectStatus,

        /// Owning team
        #[arg(short, long, value_name = "UUID")]
        team: Option<Uuid>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: Option<chrono::NaiveDate>,
    },

    Update {
        id: Uuid,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, value_name = "TEXT")]
        description: Option<String>,

        #[arg(long, value_parser = parse_project_status)]
        status: Option<ProjectStatus>,

        #[arg(short, long, value_name = "UUID")]
        team: Option<Uuid>,

        #[arg(long, value_parser = parse_date)]
        due: Option<chrono::NaiveDate>,
    },

    Delete { id: Uuid },

    /// Share of the project's events that are completed
    Progress { id: Uuid },
}

#[derive(Subcommand)]
enum TeamAction {
    List,
    Create {
        name: String,

        #[arg(short, long, value_name = "TEXT")]
        description: Option<String>,
    },
    /// Add a user to a team by email
    AddMember { team: Uuid, email: String },
    /// Remove a user from a team by email; the user account is untouched
    RemoveMember { team: Uuid, email: String },
}

#[derive(Subcommand)]
enum UserAction {
    List,
    /// Reassign a user's role (Admin, Manager, Member, ...)
    SetRole { id: Uuid, role: String },
}

#[derive(Subcommand)]
enum PermissionCommand {
    /// Print the matrix; a ✓ means the role may edit the resource
    Show,
    /// Check one permission
    Check {
        role: String,
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        #[arg(value_parser = parse_action, default_value = "edit")]
        action: PermissionAction,
    },
    /// Flip one cell of the matrix
    Toggle {
        role: String,
        #[arg(value_parser = parse_resource)]
        resource: Resource,
    },
    /// Restore the default matrix
    Reset,
}

#[derive(Subcommand)]
enum AuthAction {
    Login { email: String, password: String },
    Signup { name: String, email: String, password: String },
    /// Show the signed-in user
    Whoami,
    /// Update your profile
    Profile {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        avatar: Option<String>,
    },
    Logout,
}

#[derive(Subcommand)]
enum PrefAction {
    /// Show or set the default calendar view (month, week, day, list)
    CalendarView {
        #[arg(value_parser = parse_view)]
        view: Option<CalendarView>,
    },
}

fn parse_category(s: &str) -> Result<EventCategory, String> {
    EventCategory::from_str(s).ok_or_else(|| format!("unknown category: {}", s))
}

fn parse_project_status(s: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::from_str(s).ok_or_else(|| format!("unknown project status: {}", s))
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    Resource::from_str(s).ok_or_else(|| format!("unknown resource: {}", s))
}

fn parse_action(s: &str) -> Result<PermissionAction, String> {
    PermissionAction::from_str(s).ok_or_else(|| format!("unknown action: {} (view or edit)", s))
}

fn parse_view(s: &str) -> Result<CalendarView, String> {
    CalendarView::from_str(s).ok_or_else(|| format!("unknown calendar view: {}", s))
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    draft::parse_date(s).map_err(|e| e.to_string())
}

fn parse_time(s: &str) -> Result<chrono::NaiveTime, String> {
    draft::parse_time(s).map_err(|e| e.to_string())
}

fn short(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

struct App {
    config: AppConfig,
    cache: DataCache<HttpApi>,
    session: AuthSession,
    matrices: MatrixStore,
    prefs: Preferences,
}

impl App {
    fn open(config: AppConfig) -> anyhow::Result<Self> {
        let backend = FileStore::open(&config.state_file).with_context(|| {
            format!("Failed to open state file {}", config.state_file.display())
        })?;
        let store = LocalStore::new(backend);

        Ok(Self {
            cache: DataCache::new(HttpApi::new(config.api_url.clone())),
            session: AuthSession::restore(store.clone()),
            matrices: MatrixStore::new(store.clone()),
            prefs: Preferences::new(store),
            config,
        })
    }

    async fn load(&mut self) -> anyhow::Result<()> {
        let report = self.cache.refresh().await;
        if report.failures.len() == 4 {
            bail!("Backend at {} is unreachable", self.config.api_url);
        }
        for (collection, e) in &report.failures {
            eprintln!("warning: could not load {}: {}", collection, e);
        }
        Ok(())
    }

    /// Writes need a signed-in user whose role may edit `resource`.
    fn require_edit(&self, resource: Resource) -> anyhow::Result<()> {
        let user = self
            .session
            .user()
            .context("Not signed in; run `taskhub auth login` first")?;
        let matrix = self.matrices.load();
        if !PermissionGate::for_user(&matrix, Some(user), resource, PermissionAction::Edit) {
            bail!("{} ({}) may not edit {}", user.name, user.role, resource);
        }
        Ok(())
    }

    fn existing_event(&self, id: Uuid) -> anyhow::Result<CalendarEvent> {
        self.cache
            .event(id)
            .cloned()
            .with_context(|| format!("Event {} not found", id))
    }

    fn existing_project(&self, id: Uuid) -> anyhow::Result<Project> {
        self.cache
            .project(id)
            .cloned()
            .with_context(|| format!("Project {} not found", id))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }

    let mut app = App::open(config)?;
    let now = Local::now();

    match cli.command {
        Commands::Agenda => {
            app.load().await?;
            show_agenda(app.cache.events(), &now);
        }
        Commands::Week => {
            app.load().await?;
            show_week(app.cache.events(), &now);
        }
        Commands::Overdue { limit } => {
            app.load().await?;
            let limit = limit.unwrap_or(app.config.overdue_limit);
            let overdue = EventProjector::overdue_alerts(app.cache.events(), &now, limit);
            if overdue.is_empty() {
                println!("Nothing overdue.");
            }
            for event in overdue {
                println!("! [{}] {} {}", short(&event.id), when(event), event.title);
            }
        }
        Commands::Summary => {
            app.load().await?;
            show_summary(&app.cache, &now);
        }
        Commands::Events { action } => handle_events(&mut app, action).await?,
        Commands::Projects { action } => handle_projects(&mut app, action).await?,
        Commands::Teams { action } => handle_teams(&mut app, action).await?,
        Commands::Users { action } => handle_users(&mut app, action).await?,
        Commands::Permissions { action } => handle_permissions(&app, action)?,
        Commands::Auth { action } => handle_auth(&mut app, action).await?,
        Commands::Prefs { action } => match action {
            PrefAction::CalendarView { view: Some(view) } => {
                app.prefs.set_calendar_view(view)?;
                println!("Default calendar view: {}", view);
            }
            PrefAction::CalendarView { view: None } => {
                println!("Default calendar view: {}", app.prefs.calendar_view());
            }
        },
    }

    Ok(())
}

fn when(event: &CalendarEvent) -> String {
    match event.start.resolve(&Local) {
        Some(start) if event.all_day => start.format("%d/%m").to_string(),
        Some(start) => start.format("%d/%m %H:%M").to_string(),
        None => event.start.to_string(),
    }
}

fn clock(event: &CalendarEvent) -> String {
    match event.start.resolve(&Local) {
        Some(_) if event.all_day => "all day".to_string(),
        Some(start) => start.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

fn marker(event: &CalendarEvent) -> &'static str {
    if event.is_completed() {
        "✓"
    } else {
        "○"
    }
}

fn show_agenda(events: &[CalendarEvent], now: &DateTime<Local>) {
    let today = EventProjector::today_events(events, now);
    println!("Today, {}", now.format("%A %d/%m"));
    if today.is_empty() {
        println!("  No events today.");
    }
    for event in &today {
        println!(
            "  {} [{}] {:>7} {} ({})",
            marker(event),
            short(&event.id),
            clock(event),
            event.title,
            event.category
        );
    }

    let upcoming = EventProjector::upcoming_today(events, now);
    if let Some(next) = upcoming.first() {
        println!("Next up: {} at {} ({} more today)", next.title, clock(next), upcoming.len() - 1);
    }
}

fn show_week(events: &[CalendarEvent], now: &DateTime<Local>) {
    let load = EventProjector::weekly_load(events, now);
    println!("Week of {}", load.week_start.format("%d/%m/%Y"));
    for day in &load.days {
        println!("  {:<3} {:>3} {}", day.weekday.to_string(), day.count, "#".repeat(day.count));
    }

    let tier = load.tier.as_str().to_lowercase();
    let filled = (load.fraction * 20.0).round() as usize;
    println!(
        "Total {} ({} load) [{}{}]",
        load.total,
        tier,
        "=".repeat(filled),
        " ".repeat(20 - filled)
    );
}

fn show_summary(cache: &DataCache<HttpApi>, now: &DateTime<Local>) {
    let metrics = DashboardMetrics::compute(cache.events(), cache.projects(), cache.teams(), now);
    println!("Events this month: {}", metrics.events_this_month);
    println!("Events today:      {}", metrics.events_today);
    println!("Active projects:   {}", metrics.active_projects);
    println!("Teams:             {}", metrics.total_teams);

    const MONTHS: [&str; 12] = [
        "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
    ];
    println!("\nCompleted projects by month");
    for (month, count) in MONTHS.iter().zip(monthly_completed(cache.projects())) {
        println!("  {} {:>3} {}", month, count, "#".repeat(count as usize));
    }

    if !cache.projects().is_empty() {
        println!("\nProject progress");
        for project in cache.projects() {
            println!("  {:>3}% {}", cache.project_progress(project.id), project.name);
        }
    }
}

async fn handle_events(app: &mut App, action: EventAction) -> anyhow::Result<()> {
    app.load().await?;

    match action {
        EventAction::List { category, user } => {
            let enabled = if category.is_empty() {
                EventCategory::ALL.to_vec()
            } else {
                category
            };
            let mut events = EventProjector::filter_by_category(app.cache.events(), &enabled);
            if let Some(user) = user {
                events.retain(|e| e.user_id == Some(user));
            }
            if events.is_empty() {
                println!("No events found.");
            }
            for event in events {
                println!(
                    "{} [{}] {} {} ({})",
                    marker(event),
                    short(&event.id),
                    when(event),
                    event.title,
                    event.category
                );
                if let Some(desc) = &event.description {
                    println!("    {}", desc);
                }
            }
        }
        EventAction::Create {
            title,
            date,
            time,
            end_date,
            end_time,
            category,
            description,
            project,
        } => {
            app.require_edit(Resource::Calendar)?;
            let draft = EventDraft {
                title,
                start_date: Some(date),
                start_time: time,
                end_date,
                end_time,
                category,
                description,
                project_id: project,
            };
            let input = draft.into_input(None)?;
            app.cache.create_event(&input).await?;
            println!("Created event: {} ({})", input.title, input.start_time);
        }
        EventAction::Update {
            id,
            title,
            date,
            time,
            end_date,
            end_time,
            category,
            description,
            project,
        } => {
            app.require_edit(Resource::Calendar)?;
            let existing = app.existing_event(id)?;
            let mut draft = EventDraft::from_event(&existing, &Local);
            if let Some(title) = title {
                draft.title = title;
            }
            if date.is_some() {
                draft.start_date = date;
            }
            if time.is_some() {
                draft.start_time = time;
            }
            if end_date.is_some() {
                draft.end_date = end_date;
            }
            if end_time.is_some() {
                draft.end_time = end_time;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if description.is_some() {
                draft.description = description;
            }
            if project.is_some() {
                draft.project_id = project;
            }

            let input = draft.into_input(Some(&existing))?;
            app.cache.update_event(id, &input).await?;
            println!("Updated event: [{}] {}", short(&id), input.title);
        }
        EventAction::Delete { id } => {
            app.require_edit(Resource::Calendar)?;
            app.cache.delete_event(id).await?;
            println!("Deleted event: {}", id);
        }
        EventAction::Done { id } => {
            app.require_edit(Resource::Calendar)?;
            app.cache.set_event_status(id, EventStatus::Completed).await?;
            println!("✓ [{}] completed", short(&id));
        }
        EventAction::Undo { id } => {
            app.require_edit(Resource::Calendar)?;
            app.cache.set_event_status(id, EventStatus::Pending).await?;
            println!("○ [{}] pending", short(&id));
        }
    }

    Ok(())
}

async fn handle_projects(app: &mut App, action: ProjectAction) -> anyhow::Result<()> {
    app.load().await?;

    match action {
        ProjectAction::List { status, search } => {
            let filter = ProjectFilter { status, search };
            let projects = filter.apply(app.cache.projects());
            if projects.is_empty() {
                println!("No projects found.");
            }
            for project in projects {
                let due = project
                    .due_date
                    .as_ref()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "[{}] {} | {} | {} | due {} | {}%",
                    short(&project.id),
                    project.name,
                    project.status,
                    project.team.name,
                    due,
                    app.cache.project_progress(project.id)
                );
            }
        }
        ProjectAction::Create {
            name,
            description,
            status,
            team,
            due,
        } => {
            app.require_edit(Resource::Projects)?;
            let input = ProjectInput {
                name,
                description,
                status,
                team: team.map(|id| IdRef { id }),
                due_date: due.map(|d| d.to_string()),
                owner_id: app.session.user().map(|u| u.id),
            };
            app.cache.create_project(&input).await?;
            println!("Created project: {}", input.name);
        }
        ProjectAction::Update {
            id,
            name,
            description,
            status,
            team,
            due,
        } => {
            app.require_edit(Resource::Projects)?;
            let mut input = ProjectInput::from(&app.existing_project(id)?);
            if let Some(name) = name {
                input.name = name;
            }
            if description.is_some() {
                input.description = description;
            }
            if let Some(status) = status {
                input.status = status;
            }
            if let Some(team) = team {
                input.team = Some(IdRef { id: team });
            }
            if let Some(due) = due {
                input.due_date = Some(due.to_string());
            }
            app.cache.update_project(id, &input).await?;
            println!("Updated project: [{}] {}", short(&id), input.name);
        }
        ProjectAction::Delete { id } => {
            app.require_edit(Resource::Projects)?;
            app.cache.delete_project(id).await?;
            println!("Deleted project: {}", id);
        }
        ProjectAction::Progress { id } => {
            let project = app.existing_project(id)?;
            println!("{}: {}%", project.name, app.cache.project_progress(id));
        }
    }

    Ok(())
}

async fn handle_teams(app: &mut App, action: TeamAction) -> anyhow::Result<()> {
    app.load().await?;

    match action {
        TeamAction::List => {
            if app.cache.teams().is_empty() {
                println!("No teams found.");
            }
            for team in app.cache.teams() {
                println!("[{}] {} ({} members)", short(&team.id), team.name, team.members.len());
                for member in &team.members {
                    match app.cache.user(*member) {
                        Some(user) => println!("    {} <{}>", user.name, user.email),
                        None => println!("    [{}]", short(member)),
                    }
                }
            }
        }
        TeamAction::Create { name, description } => {
            app.require_edit(Resource::Teams)?;
            let input = TeamInput { name, description };
            app.cache.create_team(&input).await?;
            println!("Created team: {}", input.name);
        }
        TeamAction::AddMember { team, email } => {
            app.require_edit(Resource::Teams)?;
            app.cache.add_team_member(team, &email).await?;
            println!("Added {} to [{}]", email, short(&team));
        }
        TeamAction::RemoveMember { team, email } => {
            app.require_edit(Resource::Teams)?;
            app.cache.remove_team_member(team, &email).await?;
            println!("Removed {} from [{}]", email, short(&team));
        }
    }

    Ok(())
}

async fn handle_users(app: &mut App, action: UserAction) -> anyhow::Result<()> {
    app.load().await?;

    match action {
        UserAction::List => {
            if app.cache.users().is_empty() {
                println!("No users found.");
            }
            for user in app.cache.users() {
                println!("[{}] {} <{}> {}", short(&user.id), user.name, user.email, user.role);
            }
        }
        UserAction::SetRole { id, role } => {
            app.require_edit(Resource::Users)?;
            app.cache.update_user_role(id, &role).await?;
            println!("[{}] is now {}", short(&id), role);
        }
    }

    Ok(())
}

fn handle_permissions(app: &App, action: PermissionCommand) -> anyhow::Result<()> {
    match action {
        PermissionCommand::Show => {
            let matrix = app.matrices.load();
            print!("{:<10}", "");
            for resource in Resource::ALL {
                print!(" {:^14}", resource.as_str());
            }
            println!();
            for role in matrix.roles() {
                print!("{:<10}", role);
                for resource in Resource::ALL {
                    let mark = if matrix.get(role, resource).unwrap_or(false) { "✓" } else { "✗" };
                    print!(" {:^14}", mark);
                }
                println!();
            }
        }
        PermissionCommand::Check { role, resource, action } => {
            let allowed = app.matrices.can(&role, resource, action);
            println!(
                "{} {} {}: {}",
                role,
                action.as_str(),
                resource,
                if allowed { "allowed" } else { "denied" }
            );
        }
        PermissionCommand::Toggle { role, resource } => {
            app.require_edit(Resource::Settings)?;
            let matrix = app.matrices.toggle(&role, resource)?;
            let allowed = matrix.get(&role, resource).unwrap_or(false);
            println!("{} may {}edit {}", role, if allowed { "" } else { "no longer " }, resource);
        }
        PermissionCommand::Reset => {
            app.require_edit(Resource::Settings)?;
            app.matrices.reset()?;
            println!("Permission matrix restored to defaults.");
        }
    }

    Ok(())
}

async fn handle_auth(app: &mut App, action: AuthAction) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { email, password } => {
            let user = app.session.login(app.cache.api(), &email, &password).await?;
            println!("Signed in as {} ({})", user.name, user.role);
        }
        AuthAction::Signup { name, email, password } => {
            let user = app
                .session
                .signup(app.cache.api(), &name, &email, &password)
                .await?;
            println!("Welcome, {}!", user.name);
        }
        AuthAction::Whoami => match app.session.user() {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("Role:  {}", user.role);
                if let Some(phone) = &user.phone {
                    println!("Phone: {}", phone);
                }
            }
            None => println!("Not signed in."),
        },
        AuthAction::Profile { name, phone, avatar } => {
            let update = UserUpdate { name, avatar, phone };
            let user = app.session.update_user(app.cache.api(), &update).await?;
            println!("Profile updated for {}", user.name);
        }
        AuthAction::Logout => {
            app.session.logout()?;
            println!("Signed out.");
        }
    }

    Ok(())
}
