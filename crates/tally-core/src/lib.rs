//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate is the **heart** of Tally POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal (apps/cli)                          │   │
//! │  │   Dashboard ─ Shops ─ Products ─ Billing ─ History ─ Invoice   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌───────┐ ┌──────┐ ┌────────┐ ┌───────┐ ┌──────┐ │   │
//! │  │   │  types  │ │ money │ │ cart │ │ ledger │ │history│ │invoice│ │   │
//! │  │   └─────────┘ └───────┘ └──────┘ └────────┘ └───────┘ └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        tally-db (SQLite)        tally-invoice (PDF)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Shop, Product, Bill, BillItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog input validation and tolerant parsing
//! - [`cart`] - Session-scoped cart
//! - [`ledger`] - Bill drafts, return planning, aggregate recomputation
//! - [`history`] - Bill filters and month-to-date reporting
//! - [`invoice`] - Invoice projection of a bill
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::cart::Cart;
//! use tally_core::ledger::draft_bill;
//! use tally_core::Product;
//!
//! let widget = Product {
//!     id: 1,
//!     name: "Widget".to_string(),
//!     cost_price_cents: 1000,
//!     selling_price_cents: 2500,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&widget, 3).unwrap();
//!
//! let draft = draft_bill(Some(1), &cart, chrono::Utc::now()).unwrap();
//! assert_eq!(draft.total_amount.cents(), 7500);
//! assert_eq!(draft.total_cost.cents(), 3000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod history;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Display name for a bill whose shop no longer resolves.
pub const UNKNOWN_SHOP: &str = "Unknown Shop";

/// Display name for a bill item whose product was deleted from the catalog.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Maximum length of shop and product names.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum quantity of one product in the cart, and so on one bill item.
///
/// ## Business Reason
/// Catches a mistyped quantity (1000 instead of 10) before it reaches a bill.
pub const MAX_ITEM_QUANTITY: i64 = 999;
