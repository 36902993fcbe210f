//! # Invoice Projection
//!
//! A pure, presentation-ready view of one bill. The PDF renderer in
//! `tally-invoice` only lays out what this module computes.
//!
//! ```text
//! BillDetails ──project()──► InvoiceDocument ──render──► PDF bytes
//!  (bill, shop,               (title, shop, date,
//!   current items,             rows, grand total)
//!   product names)
//! ```
//!
//! Returned quantities never appear as negative rows: a return shrinks the
//! item, so the invoice always shows what the shop kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::BillDetails;
use crate::validation::ValidationResult;

/// Title printed at the top of every invoice.
pub const INVOICE_TITLE: &str = "INVOICE";

/// Characters that are not allowed in file names on common platforms.
const ILLEGAL_FILE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// One row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceRow {
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything printed on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDocument {
    pub title: String,
    pub bill_id: i64,
    pub shop_name: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub rows: Vec<InvoiceRow>,
    pub grand_total: Money,
}

impl InvoiceDocument {
    /// Projects a bill into an invoice.
    ///
    /// The grand total is the bill's stored aggregate, which equals the sum
    /// of the row totals while the aggregate invariant holds.
    pub fn project(details: &BillDetails) -> ValidationResult<Self> {
        let rows = details
            .lines
            .iter()
            .map(|line| -> ValidationResult<InvoiceRow> {
                Ok(InvoiceRow {
                    description: line.product_display_name().to_string(),
                    quantity: line.item.quantity,
                    unit_price: line.item.price_at_time(),
                    line_total: line.item.line_total()?,
                })
            })
            .collect::<ValidationResult<Vec<_>>>()?;

        Ok(InvoiceDocument {
            title: INVOICE_TITLE.to_string(),
            bill_id: details.bill.id,
            shop_name: details.shop_display_name().to_string(),
            date: details.bill.date,
            rows,
            grand_total: details.bill.total_amount(),
        })
    }

    /// `Invoice_<billId>_<shopName>.pdf`, with characters that cannot appear
    /// in a file name replaced by `_`.
    pub fn file_name(&self) -> String {
        let shop: String = self
            .shop_name
            .chars()
            .map(|c| {
                if ILLEGAL_FILE_NAME_CHARS.contains(&c) || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect();

        format!("Invoice_{}_{}.pdf", self.bill_id, shop)
    }

    /// Σ row line totals.
    pub fn rows_total(&self) -> Money {
        self.rows.iter().map(|r| r.line_total).sum()
    }
}
