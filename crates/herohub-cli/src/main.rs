//! herohub - a command-line client for SuperHero Hub.
//!
//! # Usage
//!
//! ```bash
//! herohub login
//! herohub heroes list --search bat
//! herohub favorites toggle 70
//! herohub teams create "Night Shift" --heroes 70,644 --recommend balanced
//! herohub teams compare 3 4
//! ```
//!
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`). Set
//! `HEROHUB_LOG_FILE` to also write logs to a file.

mod app;
mod commands;
mod output;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use herohub_core::config::Config;
use herohub_core::state::RecommendationKind;
use herohub_core::storage::StorageKind;

use app::App;

/// Optional file sink for logs
const LOG_FILE_ENV: &str = "HEROHUB_LOG_FILE";

#[derive(Parser)]
#[command(name = "herohub")]
#[command(author, version, about = "Browse superheroes, manage favorites and build teams")]
struct Cli {
    /// Backend base URL (overrides HEROHUB_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the session is kept: file, keyring or memory
    #[arg(long, global = true)]
    storage: Option<StorageKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session
    Login {
        /// Account email (defaults to the last one used)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Create an account
    Register,
    /// Request a password reset email
    ForgotPassword {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Set a new password with a reset token
    ResetPassword {
        /// Token from the reset email
        token: String,
    },
    /// Browse the superhero catalog
    Heroes {
        #[command(subcommand)]
        action: HeroAction,
    },
    /// Manage favorite heroes
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Build, compare and manage teams
    Teams {
        #[command(subcommand)]
        action: TeamAction,
    },
}

#[derive(Subcommand)]
enum HeroAction {
    /// List one page of heroes
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = herohub_core::models::DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Match against names
        #[arg(short, long)]
        search: Option<String>,

        /// good, bad or neutral
        #[arg(short, long)]
        alignment: Option<String>,

        /// Toggle the favorite flag of a hero on this page after listing
        #[arg(long)]
        toggle: Option<i64>,
    },
    /// Show one hero
    Show { id: i64 },
    /// Edit a hero (admins only)
    Edit {
        id: i64,

        /// Field assignments such as `combat=90` or `publisher=DC Comics`
        #[arg(required = true, value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// List favorite heroes
    List,
    /// Mark a hero as favorite
    Add { id: i64 },
    /// Remove a hero from favorites
    Remove { id: i64 },
    /// Flip a hero's favorite flag
    Toggle { id: i64 },
}

#[derive(Subcommand)]
enum TeamAction {
    /// List your teams
    List,
    /// Show one team
    Show { id: i64 },
    /// Create a team of 2 to 5 heroes
    Create {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Hero IDs, comma separated
        #[arg(long, value_delimiter = ',')]
        heroes: Vec<i64>,

        /// Fill free slots from a recommendation: balanced, random or power
        #[arg(long)]
        recommend: Option<RecommendationKind>,
    },
    /// Change a team's name, description or members
    Update {
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Replacement member list, comma separated
        #[arg(long, value_delimiter = ',')]
        heroes: Option<Vec<i64>>,
    },
    /// Delete a team
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Compare two teams
    Compare { first: i64, second: i64 },
    /// Suggest heroes for a new team
    Recommend {
        #[arg(default_value = "balanced")]
        kind: RecommendationKind,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=herohub_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(LOG_FILE_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            let path = Path::new(&path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name().map(|n| n.to_owned()).unwrap_or_else(|| "herohub.log".into());
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(storage) = cli.storage {
        config.storage = storage;
    }
    debug!(api_url = %config.api_url, storage = ?config.storage, "Configuration loaded");

    let mut app = App::new(config)?;
    info!("herohub starting");

    match cli.command {
        Commands::Login { email } => commands::auth::login(&mut app, email).await,
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app).await,
        Commands::Register => commands::auth::register(&app).await,
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&app, email).await,
        Commands::ResetPassword { token } => commands::auth::reset_password(&app, &token).await,

        Commands::Heroes { action } => match action {
            HeroAction::List {
                page,
                page_size,
                search,
                alignment,
                toggle,
            } => {
                let query = herohub_core::models::SuperheroQuery {
                    page,
                    page_size,
                    search,
                    alignment,
                };
                commands::heroes::list(&app, &query, toggle).await
            }
            HeroAction::Show { id } => commands::heroes::show(&app, id).await,
            HeroAction::Edit { id, fields } => commands::heroes::edit(&app, id, &fields).await,
        },

        Commands::Favorites { action } => match action {
            FavoriteAction::List => commands::favorites::list(&app).await,
            FavoriteAction::Add { id } => commands::favorites::set(&app, id, true).await,
            FavoriteAction::Remove { id } => commands::favorites::remove(&app, id).await,
            FavoriteAction::Toggle { id } => commands::favorites::toggle(&app, id).await,
        },

        Commands::Teams { action } => match action {
            TeamAction::List => commands::teams::list(&app).await,
            TeamAction::Show { id } => commands::teams::show(&app, id).await,
            TeamAction::Create {
                name,
                description,
                heroes,
                recommend,
            } => commands::teams::create(&app, &name, description.as_deref(), &heroes, recommend).await,
            TeamAction::Update {
                id,
                name,
                description,
                heroes,
            } => {
                let update = herohub_core::models::TeamUpdate {
                    name,
                    description,
                    superhero_ids: heroes,
                };
                commands::teams::update(&app, id, update).await
            }
            TeamAction::Delete { id, yes } => commands::teams::delete(&app, id, yes).await,
            TeamAction::Compare { first, second } => commands::teams::compare(&app, first, second).await,
            TeamAction::Recommend { kind } => commands::teams::recommend(&app, kind).await,
        },
    }
}
