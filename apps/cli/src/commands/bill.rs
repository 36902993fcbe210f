//! # Bill Commands
//!
//! Committing carts as bills, viewing a bill's items, and returns.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bill save                                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger::draft_bill(shop, &cart, now)   ◄── no shop / empty cart:       │
//! │       │                                     ValidationError             │
//! │       ▼                                                                 │
//! │  BillRepository::commit_bill(&draft)    ◄── one transaction; stale      │
//! │       │                                     shop: NotFound, no write    │
//! │       ▼                                                                 │
//! │  cart cleared, "Bill #12 saved" toast                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartState, DbState};
use tally_core::cart::Cart;
use tally_core::ledger::{draft_bill, ReturnReceipt};
use tally_core::{Bill, BillDetails, CoreError};

/// Result of a committed bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBill {
    pub bill: Bill,
    pub item_count: usize,
}

/// Commits the session cart as a bill for the selected shop.
///
/// The cart is cleared only after the commit succeeded; on any error the
/// session is left as it was.
pub async fn save_bill(db: &DbState, cart: &CartState) -> Result<SavedBill, ApiError> {
    debug!("save_bill command");

    let session = cart.snapshot();
    let saved = commit(db, session.shop_id, &session.cart).await?;

    cart.with_session_mut(|s| s.cart.clear());
    Ok(saved)
}

/// One-shot sale: builds a cart from `(product_id, quantity)` pairs and
/// commits it for `shop_id`. Repeated products are summed.
///
/// The session cart is not touched.
pub async fn quick_sell(
    db: &DbState,
    shop_id: i64,
    items: &[(i64, i64)],
) -> Result<SavedBill, ApiError> {
    debug!(shop_id = shop_id, lines = items.len(), "quick_sell command");

    let mut cart = Cart::new();
    for &(product_id, quantity) in items {
        let product = db
            .inner()
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(product_id))?;
        cart.add_item(&product, quantity)?;
    }

    commit(db, Some(shop_id), &cart).await
}

async fn commit(db: &DbState, shop_id: Option<i64>, cart: &Cart) -> Result<SavedBill, ApiError> {
    let draft = draft_bill(shop_id, cart, Utc::now())?;
    let bill = db.inner().bills().commit_bill(&draft).await?;

    info!(
        bill_id = bill.id,
        shop_id = bill.shop_id,
        total = bill.total_amount_cents,
        items = draft.items.len(),
        "Bill saved"
    );

    Ok(SavedBill {
        bill,
        item_count: draft.items.len(),
    })
}

/// Gets a bill with its shop and current items.
pub async fn get_bill_details(db: &DbState, bill_id: i64) -> Result<BillDetails, ApiError> {
    debug!(bill_id = bill_id, "get_bill_details command");
    Ok(db.inner().bills().bill_details(bill_id).await?)
}

/// Returns `quantity` units of a bill item.
///
/// ## Returns
/// * `Ok(ReturnReceipt)` - Refund and the bill's new totals
/// * `Err(ValidationError)` - Quantity outside `1..=current`
/// * `Err(NotFound)` - Item doesn't exist (or was already fully returned)
pub async fn return_item(
    db: &DbState,
    bill_item_id: i64,
    quantity: i64,
) -> Result<ReturnReceipt, ApiError> {
    debug!(bill_item_id = bill_item_id, quantity = quantity, "return_item command");

    let receipt = db.inner().bills().return_item(bill_item_id, quantity).await?;

    info!(
        bill_id = receipt.bill_id,
        bill_item_id = bill_item_id,
        returned = receipt.returned_quantity,
        refund = receipt.refund_amount.cents(),
        "Item returned"
    );
    Ok(receipt)
}
