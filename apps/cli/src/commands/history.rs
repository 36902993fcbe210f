//! # History Commands

use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use tally_core::history::BillFilter;
use tally_core::BillSummary;

/// Lists bills newest first, narrowed by `filter`.
///
/// Day bounds and the date part of the search text use the configured UTC
/// offset.
pub async fn list_history(
    db: &DbState,
    config: &ConfigState,
    filter: &BillFilter,
) -> Result<Vec<BillSummary>, ApiError> {
    debug!(?filter, "list_history command");

    if let (Some(start), Some(end)) = (filter.date_start, filter.date_end) {
        if start > end {
            return Err(ApiError::validation(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
    }

    Ok(db.inner().bills().list_bills(filter, config.utc_offset()).await?)
}
