//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! ## Thread Safety
//! The `Database` struct from `tally-db` contains a `SqlitePool` which
//! is inherently thread-safe, so commands borrow it without locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_shops(db: &DbState) -> Result<Vec<Shop>, ApiError> {
//!     Ok(db.inner().shops().list().await?)
//! }
//! ```

use tally_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
