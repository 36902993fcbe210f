//! # Interactive Shell
//!
//! The billing session lives here: the cart survives between lines until
//! the operator leaves.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tally> ▌                                                               │
//! │     │ read line (tokio stdin)                                           │
//! │     ▼                                                                   │
//! │  split_line ──► ShellLine::try_parse_from ──► clap error? print, loop   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  exit/quit ──► leave        otherwise dispatch::execute ──► print       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write as _;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::cli::{split_line, ShellCommand, ShellLine};
use crate::dispatch::execute;
use crate::error::ApiError;
use crate::state::AppState;
use crate::view::View;
use crate::Output;

const PROMPT: &str = "tally> ";

/// Runs the read-eval-print loop until `exit` or end of input.
pub async fn run_shell(state: &AppState, output: Output) -> Result<(), ApiError> {
    info!("Shell started");

    match View::Dashboard.load(state).await {
        Ok(screen) => output.print_screen(&screen, &state.config),
        Err(err) => output.print_error(&err),
    }
    if output == Output::Text {
        println!("Type `help` for commands, `exit` to leave.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                return Err(ApiError::internal(format!("Failed to read input: {}", err)));
            }
        };

        let words = match split_line(&line) {
            Ok(words) => words,
            Err(msg) => {
                output.print_error(&ApiError::validation(msg));
                continue;
            }
        };
        if words.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(err) => {
                // Help and usage errors are clap's own output.
                let _ = err.print();
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Exit => break,
            ShellCommand::App(command) => {
                debug!(?command, "Shell command");
                match execute(state, command).await {
                    Ok(outcome) => output.print_outcome(&outcome, &state.config),
                    Err(err) => output.print_error(&err),
                }
            }
        }
    }

    info!("Shell closed");
    Ok(())
}

fn prompt() {
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "{}", PROMPT);
    let _ = stdout.flush();
}
