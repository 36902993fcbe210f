//! # Database Migrations
//!
//! The ledger schema, embedded from `migrations/sqlite/` at compile time.
//!
//! ```text
//! 001_initial_schema.sql
//!   shops       id AUTOINCREMENT, name, phone, address
//!   products    id AUTOINCREMENT, name, cost/selling price cents
//!   bills       id AUTOINCREMENT, shop_id → shops, totals, date
//!   bill_items  id AUTOINCREMENT, bill_id → bills, product_id (no FK),
//!               quantity > 0, price/cost snapshots
//! ```
//!
//! Applied migrations are recorded in `_sqlx_migrations`. Files are never
//! edited once released; schema changes go in a new `NNN_description.sql`.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Counts of embedded and applied migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies pending migrations in file-name order.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.is_current() {
        debug!(applied = before.applied, "Schema is current");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;

    info!(
        pending = before.embedded - before.applied,
        "Applied database migrations"
    );
    Ok(())
}

/// Reads the migration status. A fresh database reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if has_table > 0 {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}
