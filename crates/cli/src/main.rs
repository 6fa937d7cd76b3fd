//! Taskdesk CLI - Task management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the session is kept until it expires or you log out)
//! taskdesk login -e admin@taskdesk.dev --password secret
//!
//! # Land on your role's dashboard
//! taskdesk dashboard
//!
//! # Admin: manage tasks and browse the team
//! taskdesk tasks list
//! taskdesk tasks create -t "Quarterly report" -d "Numbers for Q3" --due 2026-11-01
//! taskdesk members
//!
//! # Member: work through assigned tasks
//! taskdesk my-tasks
//! taskdesk check 12 31
//!
//! # Any view by path
//! taskdesk open /member/tasks/12
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `dashboard` / `open` - Route-based navigation
//! - `tasks` / `members` - Admin views
//! - `my-tasks` / `task` / `check` / `uncheck` / `toggle` - Member views
//! - `employees` - Legacy employee directory

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdesk_client::{AppState, ClientConfig, LogFormat};
use taskdesk_core::{ChecklistItemId, EmployeeId, TaskFilter, TaskId};

mod commands;
mod view;

use commands::admin::TaskArgs;
use commands::employees::EmployeeArgs;
use commands::member::ItemAction;

#[derive(Parser)]
#[command(name = "taskdesk")]
#[command(author, version, about = "Taskdesk task management client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a member account
    Register {
        /// Full name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Open your role's dashboard
    Dashboard,
    /// Open any view by path, e.g. `/admin/tasks`
    Open { path: String },
    /// Manage tasks (admin)
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// List team members (admin)
    Members {
        /// Only members whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List tasks assigned to you
    MyTasks {
        /// `all` or a status
        #[arg(short, long, default_value = "all")]
        status: TaskFilter,
    },
    /// Show one of your tasks with its checklist
    Task { id: TaskId },
    /// Mark a checklist item done
    Check { task: TaskId, item: ChecklistItemId },
    /// Mark a checklist item not done
    Uncheck { task: TaskId, item: ChecklistItemId },
    /// Flip a checklist item
    Toggle { task: TaskId, item: ChecklistItemId },
    /// Manage the employee directory
    Employees {
        #[command(subcommand)]
        action: EmployeeAction,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// List all tasks
    List {
        /// `all` or a status
        #[arg(short, long, default_value = "all")]
        status: TaskFilter,
    },
    /// Show one task
    Show { id: TaskId },
    /// Create a task
    Create {
        #[command(flatten)]
        form: TaskArgs,
    },
    /// Edit a task
    Edit {
        id: TaskId,
        #[command(flatten)]
        form: TaskArgs,
    },
    /// Delete a task with no completed checklist items
    Delete { id: TaskId },
}

#[derive(Subcommand)]
enum EmployeeAction {
    /// List employees with status counts
    List,
    /// Add an employee
    Create {
        #[command(flatten)]
        form: EmployeeArgs,
    },
    /// Update an employee
    Update {
        id: EmployeeId,
        #[command(flatten)]
        form: EmployeeArgs,
    },
    /// Remove an employee
    Delete { id: EmployeeId },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            send_default_pii: false,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(config: &ClientConfig) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskdesk_cli=info,taskdesk_client=info".into());

    let is_json = config.log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Configuration error: {e}");
            }
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(&config);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;
    state.auth().initialize();

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&state, email, password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&state, name, email, password).await?,
        Commands::Logout => commands::auth::logout(&state),
        Commands::Whoami => commands::auth::whoami(&state),
        Commands::Dashboard => commands::navigate::dashboard(&state).await?,
        Commands::Open { path } => commands::navigate::open(&state, &path).await?,
        Commands::Tasks { action } => match action {
            TaskAction::List { status } => commands::admin::list_tasks(&state, status).await?,
            TaskAction::Show { id } => commands::admin::show_task(&state, id).await?,
            TaskAction::Create { form } => commands::admin::create_task(&state, form).await?,
            TaskAction::Edit { id, form } => commands::admin::edit_task(&state, id, form).await?,
            TaskAction::Delete { id } => commands::admin::delete_task(&state, id).await?,
        },
        Commands::Members { search } => {
            commands::admin::members(&state, search.as_deref()).await?;
        }
        Commands::MyTasks { status } => commands::member::my_tasks(&state, status).await?,
        Commands::Task { id } => commands::member::show_task(&state, id).await?,
        Commands::Check { task, item } => {
            commands::member::update_item(&state, task, item, ItemAction::Check).await?;
        }
        Commands::Uncheck { task, item } => {
            commands::member::update_item(&state, task, item, ItemAction::Uncheck).await?;
        }
        Commands::Toggle { task, item } => {
            commands::member::update_item(&state, task, item, ItemAction::Toggle).await?;
        }
        Commands::Employees { action } => match action {
            EmployeeAction::List => commands::employees::list(&state).await?,
            EmployeeAction::Create { form } => commands::employees::create(&state, form).await?,
            EmployeeAction::Update { id, form } => {
                commands::employees::update(&state, id, form).await?;
            }
            EmployeeAction::Delete { id } => commands::employees::delete(&state, id).await?,
        },
    }
    Ok(())
}
