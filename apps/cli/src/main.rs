//! # Tally Entry Point
//!
//! ```text
//! tally                      interactive shell (dashboard first)
//! tally shop list            one command, then exit
//! tally --json history       machine-readable output
//! ```
//!
//! The actual setup is in lib.rs so that it can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tally_cli::run().await
}
