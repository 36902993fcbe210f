//! # State Module
//!
//! Application state for the terminal application.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppState                                   │   │
//! │  │  built once in `run()`, borrowed by every command               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │  CartState   │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Database    │  │  Mutex<      │  │  store_name      │              │
//! │  │  (SQLite     │  │   Billing-   │  │  currency        │              │
//! │  │   pool)      │  │   Session>   │  │  utc offset      │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  Each command takes only the pieces it needs.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;

pub use cart::{BillingSession, CartState};
pub use config::{ConfigError, ConfigResult, ConfigState};
pub use db::DbState;

use tally_db::Database;

/// Everything a command may borrow.
#[derive(Debug)]
pub struct AppState {
    pub db: DbState,
    pub cart: CartState,
    pub config: ConfigState,
}

impl AppState {
    /// Creates the state with an empty billing session.
    pub fn new(db: Database, config: ConfigState) -> Self {
        AppState {
            db: DbState::new(db),
            cart: CartState::new(),
            config,
        }
    }
}
