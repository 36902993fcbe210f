//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Shop       │   │      Bill       │   │    BillItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  shop_id (FK)   │◄──│  bill_id (FK)   │       │
//! │  │  name           │   │  total_amount   │   │  product_id     │──┐    │
//! │  │  phone          │   │  total_cost     │   │  quantity       │  │    │
//! │  │  address        │   │  date           │   │  price_at_time  │  │    │
//! │  └─────────────────┘   └─────────────────┘   │  cost_at_time   │  │    │
//! │                                              └─────────────────┘  │    │
//! │  ┌─────────────────┐                                              │    │
//! │  │    Product      │◄─────────────── informational only ──────────┘    │
//! │  │  ─────────────  │                                                   │
//! │  │  id, name       │                                                   │
//! │  │  cost_price     │                                                   │
//! │  │  selling_price  │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a store-generated auto-increment integer that is
//! unique per table and never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;
use crate::{UNKNOWN_PRODUCT, UNKNOWN_SHOP};

// =============================================================================
// Shop
// =============================================================================

/// A customer shop that bills are issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Validated shop fields, ready to insert or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShop {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Price edits never reach historical bills: a [`BillItem`] carries its own
/// snapshot of both prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Purchase cost in cents (for margin reporting). Never negative.
    pub cost_price_cents: i64,
    /// Selling price in cents. Always positive.
    pub selling_price_cents: i64,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }
}

/// Validated product fields, ready to insert or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub cost_price: Money,
    pub selling_price: Money,
}

// =============================================================================
// Bill
// =============================================================================

/// A committed sale to a shop.
///
/// ## Aggregate Invariant
/// `total_amount_cents` and `total_cost_cents` are cached aggregates over the
/// bill's *current* items:
/// ```text
/// total_amount = Σ item.quantity × item.price_at_time
/// total_cost   = Σ item.quantity × item.cost_at_time (absent = 0)
/// ```
/// The ledger rewrites both in the same transaction as every return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    pub id: i64,
    pub shop_id: i64,
    pub total_amount_cents: i64,
    /// Absent on rows written before cost tracking existed.
    pub total_cost_cents: Option<i64>,
    /// Creation timestamp; never changes.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Bill {
    /// Returns the total amount as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Returns the total cost as Money, treating an absent value as zero.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents.unwrap_or(0))
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// One product line of a bill.
/// Uses the snapshot pattern: prices are frozen at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    /// Informational; the product may since have been deleted.
    pub product_id: i64,
    /// Only ever decremented (by returns). Always > 0 while the row exists.
    pub quantity: i64,
    /// Unit selling price at time of sale (frozen).
    pub price_at_time_cents: i64,
    /// Unit cost at time of sale (frozen). Absent on legacy rows.
    pub cost_at_time_cents: Option<i64>,
}

impl BillItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price_at_time(&self) -> Money {
        Money::from_cents(self.price_at_time_cents)
    }

    /// Returns the unit cost as Money, treating an absent value as zero.
    #[inline]
    pub fn cost_at_time(&self) -> Money {
        Money::from_cents(self.cost_at_time_cents.unwrap_or(0))
    }

    /// quantity × price_at_time
    pub fn line_total(&self) -> ValidationResult<Money> {
        self.price_at_time()
            .checked_mul(self.quantity)
            .ok_or_else(|| ValidationError::too_large("Line total"))
    }

    /// quantity × cost_at_time
    pub fn line_cost(&self) -> ValidationResult<Money> {
        self.cost_at_time()
            .checked_mul(self.quantity)
            .ok_or_else(|| ValidationError::too_large("Line cost"))
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A bill joined with its shop's name, as listed in history and dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillSummary {
    pub bill: Bill,
    /// `None` when the shop no longer resolves.
    pub shop_name: Option<String>,
}

impl BillSummary {
    /// Shop name for display.
    pub fn shop_display_name(&self) -> &str {
        self.shop_name.as_deref().unwrap_or(UNKNOWN_SHOP)
    }
}

/// A bill item joined with its product's current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillLine {
    pub item: BillItem,
    /// `None` when the product was deleted from the catalog.
    pub product_name: Option<String>,
}

impl BillLine {
    /// Product name for display.
    pub fn product_display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(UNKNOWN_PRODUCT)
    }
}

/// Everything known about one bill: the input of the "view items" screen
/// and of the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillDetails {
    pub bill: Bill,
    pub shop: Option<Shop>,
    pub lines: Vec<BillLine>,
}

impl BillDetails {
    /// Shop name for display.
    pub fn shop_display_name(&self) -> &str {
        self.shop.as_ref().map(|s| s.name.as_str()).unwrap_or(UNKNOWN_SHOP)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
