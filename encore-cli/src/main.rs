//! Encore CLI - Command-line client for the Encore music school backend
//!
//! Wraps the session manager and the REST clients in a set of subcommands
//! covering accounts, courses, the marketplace and the weekly schedule.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use encore_api::{ApiClient, ApiClientConfig, NewMarketplaceItem, NewScheduleItem};
use encore_core::{init_logging, EncoreConfig, LoggingConfig, NewUser};
use encore_session::{RolePolicy, SessionManager, SessionState, SessionStore};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Client for the Encore music school platform")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        /// Display name
        username: String,

        /// Account email (used to log in)
        email: String,

        /// Account password
        password: String,

        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,
    },

    /// Log in and persist the session
    Login {
        /// Account email
        email: String,

        /// Account password
        password: String,
    },

    /// Clear the persisted session
    Logout,

    /// Show the current user, verifying the stored token
    Whoami,

    /// Manage instrument selection
    Instruments {
        #[command(subcommand)]
        command: InstrumentsCommands,
    },

    /// Browse the course catalog
    Courses {
        /// Only courses matching your instruments
        #[arg(long)]
        mine: bool,
    },

    /// List the lessons of a course
    Lessons {
        /// Course id
        course: i64,
    },

    /// Show one lesson with its study material
    Lesson {
        /// Lesson id
        id: i64,
    },

    /// Enroll in a course
    Enroll {
        /// Course id
        course: i64,
    },

    /// List your enrollments with progress
    Enrollments,

    /// Second-hand instrument marketplace
    Market {
        #[command(subcommand)]
        command: MarketCommands,
    },

    /// Weekly schedule
    Schedule {
        #[command(subcommand)]
        command: Option<ScheduleCommands>,
    },

    /// Student roster with course progress (teachers)
    Students,
}

#[derive(Subcommand)]
enum InstrumentsCommands {
    /// Show the instrument catalog and your current selection
    List,

    /// Replace your instrument selection
    Set {
        /// Instrument ids
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum MarketCommands {
    /// Items currently for sale
    List {
        /// Include items already sold
        #[arg(long)]
        include_sold: bool,
    },

    /// List an item for sale (admin)
    Add {
        /// Item title
        title: String,

        /// Asking price
        price: f64,

        /// Item description
        #[arg(long)]
        description: Option<String>,

        /// Image URL
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Mark an item as sold (admin)
    MarkSold {
        /// Item id
        id: i64,
    },

    /// Remove an item (admin)
    Remove {
        /// Item id
        id: i64,
    },
}

#[derive(Subcommand)]
enum ScheduleCommands {
    /// Events in the current week
    Week,

    /// Upcoming events
    Upcoming,

    /// Add an event
    Add {
        /// Event title
        title: String,

        /// Start time (RFC 3339, e.g. 2026-09-01T14:00:00Z)
        start: String,

        /// End time (RFC 3339)
        end: String,

        /// Event description
        #[arg(long)]
        description: Option<String>,

        /// Related course id
        #[arg(long)]
        course: Option<i64>,

        /// Reminder text
        #[arg(long)]
        reminder: Option<String>,
    },

    /// Remove an event
    Remove {
        /// Event id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging_config = LoggingConfig::default();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }

    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            handle_register(username, email, password, first_name, last_name, &config).await?;
        }
        Commands::Login { email, password } => {
            handle_login(email, password, &config).await?;
        }
        Commands::Logout => {
            handle_logout(&config)?;
        }
        Commands::Whoami => {
            handle_whoami(&config).await?;
        }
        Commands::Instruments { command } => match command {
            InstrumentsCommands::List => handle_instruments_list(&config).await?,
            InstrumentsCommands::Set { ids } => handle_instruments_set(ids, &config).await?,
        },
        Commands::Courses { mine } => {
            handle_courses(mine, &config).await?;
        }
        Commands::Lessons { course } => {
            handle_lessons(course, &config).await?;
        }
        Commands::Lesson { id } => {
            handle_lesson(id, &config).await?;
        }
        Commands::Enroll { course } => {
            handle_enroll(course, &config).await?;
        }
        Commands::Enrollments => {
            handle_enrollments(&config).await?;
        }
        Commands::Market { command } => {
            handle_market(command, &config).await?;
        }
        Commands::Schedule { command } => {
            handle_schedule(command, &config).await?;
        }
        Commands::Students => {
            handle_students(&config).await?;
        }
    }

    Ok(())
}

fn load_config(config_path: Option<&PathBuf>) -> anyhow::Result<EncoreConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from {:?}", path);
        return Ok(EncoreConfig::from_file(path)?);
    }

    let default_paths = [
        dirs::config_dir().map(|d| d.join("encore").join("config.toml")),
        EncoreConfig::default_path(),
        Some(PathBuf::from("encore.toml")),
    ];

    for path in default_paths.iter().flatten() {
        if path.exists() {
            info!("Loading configuration from {:?}", path);
            return Ok(EncoreConfig::from_file(path)?);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(EncoreConfig::default())
}

/// A fresh anonymous session manager over the configured backend
fn fresh_manager(config: &EncoreConfig) -> anyhow::Result<SessionManager> {
    let api = ApiClient::new(ApiClientConfig::from(config))?;
    let store = SessionStore::new(config.resolved_data_dir())?;
    let policy = RolePolicy {
        admin_inherits_teacher: config.access.admin_inherits_teacher,
    };
    Ok(SessionManager::new(api, store, policy))
}

/// Restore the persisted session and verify the token against the backend.
///
/// Errors out when nothing is stored or the token is no longer accepted.
async fn authenticated_manager(config: &EncoreConfig) -> anyhow::Result<SessionManager> {
    let api = ApiClient::new(ApiClientConfig::from(config))?;
    let store = SessionStore::new(config.resolved_data_dir())?;
    let policy = RolePolicy {
        admin_inherits_teacher: config.access.admin_inherits_teacher,
    };

    let mut manager = SessionManager::restore(api, store, policy);
    if manager.state() == SessionState::Anonymous {
        bail!("Not logged in. Run `encore login <email> <password>` first.");
    }

    if manager.refresh_current_user().await?.is_none() {
        bail!("Your session has expired. Run `encore login` again.");
    }

    Ok(manager)
}

async fn handle_register(
    username: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    config: &EncoreConfig,
) -> anyhow::Result<()> {
    let mut manager = fresh_manager(config)?;

    let user = manager
        .register(NewUser {
            username,
            email,
            first_name,
            last_name,
            password,
        })
        .await
        .context("Registration failed")?;

    println!("✅ Account created and logged in as {}", user.display_string());
    println!("🎓 Role: {}", user.role);
    Ok(())
}

async fn handle_login(
    email: String,
    password: String,
    config: &EncoreConfig,
) -> anyhow::Result<()> {
    let mut manager = fresh_manager(config)?;

    let user = manager
        .login(&email, &password)
        .await
        .context("Login failed")?;

    println!("✅ Logged in as {}", user.display_string());
    println!("🎓 Role: {}", user.role);
    Ok(())
}

fn handle_logout(config: &EncoreConfig) -> anyhow::Result<()> {
    let api = ApiClient::new(ApiClientConfig::from(config))?;
    let store = SessionStore::new(config.resolved_data_dir())?;
    let policy = RolePolicy {
        admin_inherits_teacher: config.access.admin_inherits_teacher,
    };

    // Restore first so logout clears whatever is persisted
    let mut manager = SessionManager::restore(api, store, policy);
    manager.logout()?;
    println!("👋 Logged out");
    Ok(())
}

async fn handle_whoami(config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;

    if let Some(user) = manager.current_user() {
        println!("👤 {}", user.display_string());
        println!("🎓 Role: {}", user.role);
        if user.instruments.is_empty() {
            println!("🎵 No instruments selected");
        } else {
            let names: Vec<&str> = user.instruments.iter().map(|i| i.name.as_str()).collect();
            println!("🎵 Instruments: {}", names.join(", "));
        }
    }
    Ok(())
}

async fn handle_instruments_list(config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = fresh_manager(config)?;
    let catalog = manager.api().courses.instruments().await?;

    println!("🎵 Instrument catalog:");
    for instrument in &catalog {
        println!("  [{}] {}", instrument.id, instrument.name);
    }

    // Show the current selection when a session exists
    if let Ok(manager) = authenticated_manager(config).await {
        if let Some(user) = manager.current_user() {
            let mine: Vec<String> = user
                .instruments
                .iter()
                .map(|i| format!("[{}] {}", i.id, i.name))
                .collect();
            if mine.is_empty() {
                println!("\nYour selection: none");
            } else {
                println!("\nYour selection: {}", mine.join(", "));
            }
        }
    }
    Ok(())
}

async fn handle_instruments_set(ids: Vec<i64>, config: &EncoreConfig) -> anyhow::Result<()> {
    let mut manager = authenticated_manager(config).await?;
    let user = manager.update_instruments(&ids).await?;

    let names: Vec<&str> = user.instruments.iter().map(|i| i.name.as_str()).collect();
    println!("✅ Instruments updated: {}", names.join(", "));
    Ok(())
}

async fn handle_courses(mine: bool, config: &EncoreConfig) -> anyhow::Result<()> {
    let courses = if mine {
        let manager = authenticated_manager(config).await?;
        manager.api().courses.my_courses(manager.bearer()?).await?
    } else {
        let manager = fresh_manager(config)?;
        manager.api().courses.list().await?
    };

    if courses.is_empty() {
        println!("No courses found.");
        return Ok(());
    }

    println!("📚 Courses:");
    for course in &courses {
        let level = course.level.as_deref().unwrap_or("-");
        println!(
            "  [{}] {} ({}, {})",
            course.id, course.title, course.instrument.name, level
        );
    }
    Ok(())
}

async fn handle_lessons(course_id: i64, config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;
    let course = manager.api().courses.get(course_id).await?;
    let lessons = manager
        .api()
        .courses
        .lessons(manager.bearer()?, course_id)
        .await?;

    println!("📚 {} — {} lessons", course.title, lessons.len());
    for lesson in &lessons {
        let song = lesson.song_name.as_deref().unwrap_or("-");
        println!("  {}. [{}] {} ({})", lesson.order, lesson.id, lesson.title, song);
    }
    Ok(())
}

async fn handle_lesson(lesson_id: i64, config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;
    let lesson = manager.api().courses.lesson(manager.bearer()?, lesson_id).await?;

    println!("🎼 {}", lesson.title);
    if let Some(description) = &lesson.description {
        println!("{}", description);
    }
    if let Some(song) = &lesson.song_name {
        println!("\n🎵 Song: {}", song);
    }
    if let Some(history) = &lesson.song_history {
        println!("\n📖 History:\n{}", history);
    }
    if let Some(chords) = &lesson.chord_help {
        println!("\n🎸 Chords:\n{}", chords);
    }
    if let Some(url) = &lesson.sheet_music_url {
        println!("\n📄 Sheet music: {}", url);
    }
    if let Some(url) = &lesson.video_url {
        println!("🎬 Video: {}", url);
    }
    Ok(())
}

async fn handle_enroll(course_id: i64, config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;
    let enrollment = manager
        .api()
        .courses
        .enroll(manager.bearer()?, course_id)
        .await
        .context("Enrollment failed")?;

    println!("✅ Enrolled in {}", enrollment.course.title);
    Ok(())
}

async fn handle_enrollments(config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;
    let enrollments = manager
        .api()
        .courses
        .my_enrollments(manager.bearer()?)
        .await?;

    if enrollments.is_empty() {
        println!("No enrollments yet.");
        return Ok(());
    }

    println!("📚 Your enrollments:");
    for enrollment in &enrollments {
        println!(
            "  [{}] {} — {}% complete",
            enrollment.course.id, enrollment.course.title, enrollment.progress
        );
    }
    Ok(())
}

async fn handle_market(command: MarketCommands, config: &EncoreConfig) -> anyhow::Result<()> {
    match command {
        MarketCommands::List { include_sold } => {
            let manager = fresh_manager(config)?;
            let items = manager.api().marketplace.list(include_sold).await?;

            if items.is_empty() {
                println!("Nothing for sale right now.");
                return Ok(());
            }

            println!("🛒 Marketplace:");
            for item in &items {
                let sold = if item.is_sold { " (sold)" } else { "" };
                println!("  [{}] {} — {:.2} €{}", item.id, item.title, item.price, sold);
            }
        }
        MarketCommands::Add {
            title,
            price,
            description,
            image_url,
        } => {
            let manager = authenticated_manager(config).await?;
            let item = manager
                .api()
                .marketplace
                .create(
                    manager.bearer()?,
                    &NewMarketplaceItem {
                        title,
                        description,
                        price,
                        image_url,
                    },
                )
                .await
                .context("Listing the item failed")?;

            println!("✅ Listed [{}] {} for {:.2} €", item.id, item.title, item.price);
        }
        MarketCommands::MarkSold { id } => {
            let manager = authenticated_manager(config).await?;
            let item = manager
                .api()
                .marketplace
                .mark_sold(manager.bearer()?, id)
                .await?;

            println!("✅ [{}] {} marked as sold", item.id, item.title);
        }
        MarketCommands::Remove { id } => {
            let manager = authenticated_manager(config).await?;
            manager.api().marketplace.delete(manager.bearer()?, id).await?;

            println!("🗑️  Item {} removed", id);
        }
    }
    Ok(())
}

async fn handle_schedule(
    command: Option<ScheduleCommands>,
    config: &EncoreConfig,
) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;
    let token = manager.bearer()?;

    match command {
        None => {
            print_events("🗓️  Your schedule:", &manager.api().schedule.list(token).await?);
        }
        Some(ScheduleCommands::Week) => {
            print_events("🗓️  This week:", &manager.api().schedule.week(token).await?);
        }
        Some(ScheduleCommands::Upcoming) => {
            print_events("🗓️  Upcoming:", &manager.api().schedule.upcoming(token).await?);
        }
        Some(ScheduleCommands::Add {
            title,
            start,
            end,
            description,
            course,
            reminder,
        }) => {
            let item = NewScheduleItem {
                title,
                description,
                start_time: parse_rfc3339(&start)?,
                end_time: parse_rfc3339(&end)?,
                course_id: course,
                reminder_text: reminder,
            };
            let created = manager.api().schedule.create(token, &item).await?;
            println!("✅ Event [{}] {} added", created.id, created.title);
        }
        Some(ScheduleCommands::Remove { id }) => {
            manager.api().schedule.delete(token, id).await?;
            println!("🗑️  Event {} removed", id);
        }
    }
    Ok(())
}

async fn handle_students(config: &EncoreConfig) -> anyhow::Result<()> {
    let manager = authenticated_manager(config).await?;
    let students = manager
        .api()
        .schedule
        .students(manager.bearer()?)
        .await
        .context("Listing students failed (teacher role required)")?;

    if students.is_empty() {
        println!("No enrolled students.");
        return Ok(());
    }

    println!("🎓 Students:");
    for student in &students {
        println!(
            "  {} <{}> — {} ({}%)",
            student.username, student.email, student.course, student.progress
        );
    }
    Ok(())
}

fn print_events(header: &str, events: &[encore_api::ScheduleItem]) {
    if events.is_empty() {
        println!("No events.");
        return;
    }

    println!("{}", header);
    for event in events {
        println!(
            "  [{}] {} — {} to {}",
            event.id,
            event.title,
            event.start_time.format("%Y-%m-%d %H:%M"),
            event.end_time.format("%Y-%m-%d %H:%M")
        );
    }
}

fn parse_rfc3339(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", value))?
        .with_timezone(&Utc))
}
