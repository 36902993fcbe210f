//! # Dashboard Command
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Shops: 5            Sales this month: Rs 12500.00   │
//! │                                                      │
//! │  Recent bills                                        │
//! │  #12  Acme            2024-03-10 14:05    Rs 75.00   │
//! │  #11  Bolt Traders    2024-03-10 11:20    Rs 20.00   │
//! └──────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use tally_core::{BillSummary, Money};

/// Number of bills shown on the dashboard.
pub const RECENT_BILLS: u32 = 5;

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub shop_count: i64,
    /// Σ total amount of bills dated since the first of the current local
    /// month.
    pub month_to_date_sales: Money,
    pub recent_bills: Vec<BillSummary>,
}

/// Loads the dashboard as of `now`.
pub async fn get_dashboard(
    db: &DbState,
    config: &ConfigState,
    now: DateTime<Utc>,
) -> Result<DashboardResponse, ApiError> {
    debug!("get_dashboard command");
    let db = db.inner();

    let shop_count = db.shops().count().await?;
    let month_to_date_sales = db
        .bills()
        .month_to_date_sales(now, config.utc_offset())
        .await?;
    let recent_bills = db.bills().recent_bills(RECENT_BILLS).await?;

    Ok(DashboardResponse {
        shop_count,
        month_to_date_sales,
        recent_bills,
    })
}
