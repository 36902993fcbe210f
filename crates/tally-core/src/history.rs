//! # History & Reporting
//!
//! Filters for the bill history view and the month-to-date figure on the
//! dashboard.
//!
//! ## Calendar Days
//! Bills are stored with a UTC timestamp. Every date comparison here happens
//! on the bill's *local* calendar day, i.e. the timestamp shifted by the
//! configured UTC offset and truncated to its date:
//! ```text
//!   bill.date (UTC)  ──+offset──►  local datetime  ──truncate──►  NaiveDate
//!                                                                    │
//!   date_start ≤ day ≤ date_end   (both bounds inclusive, whole days) ◄┘
//! ```

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Bill, BillSummary};

/// Local date format used by the history search box.
pub const SEARCH_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Bill Filter
// =============================================================================

/// Filter for the bill history list. Every criterion is optional and all
/// present criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillFilter {
    pub shop_id: Option<i64>,
    /// First local day included.
    pub date_start: Option<NaiveDate>,
    /// Last local day included.
    pub date_end: Option<NaiveDate>,
    /// Case-insensitive text matched against the shop name or the bill's
    /// local date (`YYYY-MM-DD`).
    pub search: Option<String>,
}

impl BillFilter {
    /// Returns true if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.shop_id.is_none()
            && self.date_start.is_none()
            && self.date_end.is_none()
            && self.search_term().is_none()
    }

    /// Returns true if the summary passes every criterion.
    pub fn matches(&self, summary: &BillSummary, offset: FixedOffset) -> bool {
        if let Some(shop_id) = self.shop_id {
            if summary.bill.shop_id != shop_id {
                return false;
            }
        }

        if !self.matches_day(summary.bill.date, offset) {
            return false;
        }

        match self.search_term() {
            Some(term) => matches_search(&term, summary, offset),
            None => true,
        }
    }

    /// Returns true if the local day of `date` lies within the date bounds.
    pub fn matches_day(&self, date: DateTime<Utc>, offset: FixedOffset) -> bool {
        let day = local_day(date, offset);

        if let Some(start) = self.date_start {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.date_end {
            if day > end {
                return false;
            }
        }

        true
    }

    /// Keeps the summaries that match, preserving their order.
    pub fn apply(&self, summaries: Vec<BillSummary>, offset: FixedOffset) -> Vec<BillSummary> {
        summaries
            .into_iter()
            .filter(|s| self.matches(s, offset))
            .collect()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

fn matches_search(term: &str, summary: &BillSummary, offset: FixedOffset) -> bool {
    let shop_hit = summary
        .shop_name
        .as_deref()
        .map(|name| name.to_lowercase().contains(term))
        .unwrap_or(false);

    shop_hit
        || local_day(summary.bill.date, offset)
            .format(SEARCH_DATE_FORMAT)
            .to_string()
            .contains(term)
}

/// The calendar day of `date` at `offset`.
pub fn local_day(date: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    date.with_timezone(&offset).date_naive()
}

// =============================================================================
// Month To Date
// =============================================================================

/// Start of the current month: day 1 at 00:00:00 local time, as UTC.
///
/// ## Example
/// ```rust
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use tally_core::history::month_start;
///
/// let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
///
/// // 2024-03-01 00:00 +05:30 is 2024-02-29 18:30 UTC
/// assert_eq!(month_start(now, ist), Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap());
/// ```
pub fn month_start(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let today = local_day(now, offset);
    let first = today - Duration::days(i64::from(today.day0()));
    let local_midnight = first.and_time(NaiveTime::MIN);
    let utc_naive = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));

    Utc.from_utc_datetime(&utc_naive)
}

/// Σ total_amount over the bills dated on or after [`month_start`].
pub fn month_to_date_sales<'a, I>(bills: I, now: DateTime<Utc>, offset: FixedOffset) -> Money
where
    I: IntoIterator<Item = &'a Bill>,
{
    let since = month_start(now, offset);

    bills
        .into_iter()
        .filter(|bill| bill.date >= since)
        .map(Bill::total_amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(id: i64, shop_id: i64, shop_name: Option<&str>, date: DateTime<Utc>) -> BillSummary {
        BillSummary {
            bill: Bill {
                id,
                shop_id,
                total_amount_cents: 1000 * id,
                total_cost_cents: Some(0),
                date,
            },
            shop_name: shop_name.map(str::to_string),
        }
    }

    fn plus_0530() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = BillFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&summary(1, 1, None, Utc::now()), plus_0530()));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = BillFilter {
            search: Some("   ".to_string()),
            ..BillFilter::default()
        };
        assert!(filter.is_empty());
    }

    #[test]
    fn test_shop_filter() {
        let filter = BillFilter {
            shop_id: Some(2),
            ..BillFilter::default()
        };
        let offset = FixedOffset::east_opt(0).unwrap();

        assert!(filter.matches(&summary(1, 2, Some("Acme"), Utc::now()), offset));
        assert!(!filter.matches(&summary(2, 3, Some("Acme"), Utc::now()), offset));
    }

    #[test]
    fn test_day_bounds_are_inclusive() {
        let filter = BillFilter {
            date_start: Some(day(2024, 3, 10)),
            date_end: Some(day(2024, 3, 10)),
            ..BillFilter::default()
        };
        let offset = FixedOffset::east_opt(0).unwrap();

        assert!(filter.matches_day(utc(2024, 3, 10, 0, 0), offset));
        assert!(filter.matches_day(
            Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap(),
            offset
        ));
        assert!(!filter.matches_day(utc(2024, 3, 11, 0, 0), offset));
        assert!(!filter.matches_day(
            Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap(),
            offset
        ));
    }

    #[test]
    fn test_day_bounds_follow_utc_offset() {
        let filter = BillFilter {
            date_start: Some(day(2024, 3, 10)),
            date_end: Some(day(2024, 3, 10)),
            ..BillFilter::default()
        };

        // 19:00 UTC on the 9th is 00:30 on the 10th at +05:30.
        assert!(filter.matches_day(utc(2024, 3, 9, 19, 0), plus_0530()));
        // 18:29 UTC on the 10th is 23:59 on the 10th.
        assert!(filter.matches_day(utc(2024, 3, 10, 18, 29), plus_0530()));
        // 18:30 UTC on the 10th is already the 11th.
        assert!(!filter.matches_day(utc(2024, 3, 10, 18, 30), plus_0530()));
    }

    #[test]
    fn test_search_by_shop_name() {
        let filter = BillFilter {
            search: Some("acm".to_string()),
            ..BillFilter::default()
        };
        let offset = FixedOffset::east_opt(0).unwrap();

        assert!(filter.matches(&summary(1, 1, Some("ACME Traders"), Utc::now()), offset));
        assert!(!filter.matches(&summary(2, 1, Some("Globex"), Utc::now()), offset));
        assert!(!filter.matches(&summary(3, 1, None, Utc::now()), offset));
    }

    #[test]
    fn test_search_by_local_date() {
        let filter = BillFilter {
            search: Some("2024-03-10".to_string()),
            ..BillFilter::default()
        };

        assert!(filter.matches(&summary(1, 1, Some("Globex"), utc(2024, 3, 9, 20, 0)), plus_0530()));
        assert!(!filter.matches(&summary(2, 1, Some("Globex"), utc(2024, 3, 9, 12, 0)), plus_0530()));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = BillFilter {
            shop_id: Some(1),
            ..BillFilter::default()
        };
        let offset = FixedOffset::east_opt(0).unwrap();
        let now = Utc::now();
        let list = vec![
            summary(3, 1, None, now),
            summary(2, 2, None, now),
            summary(1, 1, None, now),
        ];

        let ids: Vec<i64> = filter.apply(list, offset).iter().map(|s| s.bill.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_month_start() {
        let utc0 = FixedOffset::east_opt(0).unwrap();
        assert_eq!(month_start(utc(2024, 3, 15, 12, 0), utc0), utc(2024, 3, 1, 0, 0));
        assert_eq!(month_start(utc(2024, 3, 1, 0, 0), utc0), utc(2024, 3, 1, 0, 0));

        // 20:00 UTC on Mar 31 is already April 1st at +05:30.
        assert_eq!(
            month_start(utc(2024, 3, 31, 20, 0), plus_0530()),
            utc(2024, 3, 31, 18, 30)
        );

        let minus_5 = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(month_start(utc(2024, 4, 1, 2, 0), minus_5), utc(2024, 3, 1, 5, 0));
    }

    #[test]
    fn test_month_to_date_excludes_previous_month() {
        let utc0 = FixedOffset::east_opt(0).unwrap();
        let now = utc(2024, 3, 15, 12, 0);
        let bills: Vec<Bill> = vec![
            summary(1, 1, None, utc(2024, 2, 29, 23, 59)).bill,
            summary(2, 1, None, utc(2024, 3, 1, 0, 0)).bill,
            summary(3, 1, None, utc(2024, 3, 14, 9, 0)).bill,
        ];

        assert_eq!(month_to_date_sales(&bills, now, utc0).cents(), 5000);
        assert!(month_to_date_sales(&Vec::<Bill>::new(), now, utc0).is_zero());
    }
}
