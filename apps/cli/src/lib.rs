//! # Tally CLI Library
//!
//! The `tally` terminal application: one-shot commands and an interactive
//! shell over the same command set.
//!
//! ## Module Organization
//! ```text
//! tally_cli/
//! ├── lib.rs          ◄─── You are here (startup, logging, output)
//! ├── cli.rs          ◄─── clap definitions, shell line splitting
//! ├── dispatch.rs     ◄─── Command → command function → toast + screen
//! ├── shell.rs        ◄─── Interactive loop (owns the billing session)
//! ├── view.rs         ◄─── Screens, rendering, toasts
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Billing session (shop + cart)
//! │   └── config.rs   ◄─── Configuration (file, env, flags)
//! ├── commands/       ◄─── One module per area
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize logging (stderr, RUST_LOG overrides)                     │
//! │  3. Load configuration: defaults → config.toml → TALLY_* env → flags    │
//! │  4. Open the database, run migrations                                   │
//! │  5. No command or `shell`: interactive session                          │
//! │     Otherwise: run one command, print, exit                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod shell;
pub mod state;
pub mod view;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use dispatch::Outcome;
use error::ApiError;
use state::{AppState, ConfigState};
use tally_db::{Database, DbConfig};
use view::{Screen, Toast};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    /// Success toasts and screens go to stdout.
    pub fn print_outcome(self, outcome: &Outcome, config: &ConfigState) {
        match self {
            Output::Text => {
                if let Some(screen) = &outcome.screen {
                    print!("{}", screen.render(config));
                }
                if let Some(toast) = &outcome.toast {
                    println!("{}", toast);
                }
            }
            Output::Json => print_json(outcome),
        }
    }

    pub fn print_screen(self, screen: &Screen, config: &ConfigState) {
        match self {
            Output::Text => print!("{}", screen.render(config)),
            Output::Json => print_json(screen),
        }
    }

    /// Error toasts go to stderr.
    pub fn print_error(self, err: &ApiError) {
        match self {
            Output::Text => eprintln!("{}", Toast::from(err)),
            Output::Json => match serde_json::to_string(err) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", Toast::from(err)),
            },
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => error!(error = %err, "Failed to serialize output"),
    }
}

/// Runs the application and returns the process exit code.
///
/// Exit codes: `0` success, `1` the command failed, `2` bad arguments
/// (clap's own code).
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let output = if cli.json { Output::Json } else { Output::Text };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            output.print_error(&err);
            return ExitCode::FAILURE;
        }
    };

    let db = match open_database(&config).await {
        Ok(db) => db,
        Err(err) => {
            output.print_error(&err);
            return ExitCode::FAILURE;
        }
    };
    let state = AppState::new(db, config);

    let result = match cli.command {
        None | Some(Command::Shell) => shell::run_shell(&state, output).await,
        Some(command) if command.needs_session() => Err(ApiError::validation(
            "This command works on the billing cart; run `tally shell` first",
        )),
        Some(command) => dispatch::execute(&state, command)
            .await
            .map(|outcome| output.print_outcome(&outcome, &state.config)),
    };

    state.db.inner().close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.print_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays clean for screens and `--json`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally=trace` - Show trace for tally crates only
/// - Default: warnings, plus INFO for tally crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tally=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file and environment, then command-line flags on top.
fn load_config(cli: &Cli) -> Result<ConfigState, ApiError> {
    let mut config = ConfigState::load(cli.config.clone())?;

    if let Some(path) = &cli.db {
        config.database_path = Some(path.clone());
    }
    if let Some(name) = &cli.store_name {
        config.store_name = name.clone();
    }
    if let Some(minutes) = cli.utc_offset {
        config.utc_offset_minutes = Some(minutes);
    }
    if let Some(dir) = &cli.invoice_dir {
        config.invoice_dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn open_database(config: &ConfigState) -> Result<Database, ApiError> {
    let path = config.database_path()?;
    info!(?path, "Opening database");

    let db = Database::new(DbConfig::new(path)).await?;
    info!("Database connected and migrations applied");
    Ok(db)
}
