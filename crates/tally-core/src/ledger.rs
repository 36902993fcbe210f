//! # Billing Ledger
//!
//! Pure math behind the two ledger writes: committing a cart as a bill and
//! returning (part of) a bill item. The database layer runs these inside a
//! transaction; nothing here touches storage.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Cart ──draft_bill()──► BillDraft ──commit (1 tx)──► Bill + BillItems │
//! │                                                            │            │
//! │                               ┌────────────────────────────┘            │
//! │                               ▼                                         │
//! │   BillItem ──plan_return()──► ReturnPlan                                │
//! │                                  │                                      │
//! │                     ┌────────────┴────────────┐                         │
//! │                     ▼                         ▼                         │
//! │            Decrement { remaining }         Remove                       │
//! │                     │                         │                         │
//! │                     └────────────┬────────────┘                         │
//! │                                  ▼                                      │
//! │        BillTotals::from_items(surviving items) ──► bill aggregates      │
//! │                                                   (same tx)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Aggregates Are Recomputed
//! After a return the bill totals are rebuilt from the surviving items rather
//! than decremented by the refund. With integer cents both give the same
//! number; recomputing also repairs legacy rows whose cost was never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::BillItem;
use crate::validation::{validate_return_quantity, ValidationResult};

// =============================================================================
// Bill Draft
// =============================================================================

/// A validated bill, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDraft {
    pub shop_id: i64,
    pub date: DateTime<Utc>,
    pub total_amount: Money,
    pub total_cost: Money,
    pub items: Vec<BillItemDraft>,
}

/// One item of a [`BillDraft`], with the cart's price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillItemDraft {
    pub product_id: i64,
    pub quantity: i64,
    pub price_at_time: Money,
    pub cost_at_time: Money,
}

/// Turns the cart into a bill draft for `shop_id`.
///
/// ## Rules
/// - A shop must be selected
/// - The cart must not be empty
/// - Prices come from the cart lines, never from the current catalog
/// - Totals that overflow are rejected, never wrapped
///
/// Whether the shop still exists is checked by the storage layer, inside
/// the commit transaction.
pub fn draft_bill(shop_id: Option<i64>, cart: &Cart, now: DateTime<Utc>) -> CoreResult<BillDraft> {
    let shop_id = shop_id.ok_or_else(|| ValidationError::required("Shop"))?;

    if cart.is_empty() {
        return Err(ValidationError::required("Cart items").into());
    }

    let items: Vec<BillItemDraft> = cart
        .lines()
        .iter()
        .map(|line| BillItemDraft {
            product_id: line.product_id,
            quantity: line.quantity,
            price_at_time: line.price(),
            cost_at_time: line.cost(),
        })
        .collect();

    Ok(BillDraft {
        shop_id,
        date: now,
        total_amount: cart.total_amount()?,
        total_cost: cart.total_cost()?,
        items,
    })
}

// =============================================================================
// Bill Totals
// =============================================================================

/// The two cached aggregates of a bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillTotals {
    pub total_amount: Money,
    pub total_cost: Money,
}

impl BillTotals {
    /// Recomputes both aggregates from a bill's current items.
    /// Items without a cost snapshot count as zero cost.
    pub fn from_items<'a, I>(items: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = &'a BillItem>,
    {
        items
            .into_iter()
            .try_fold(BillTotals::default(), |totals, item| -> ValidationResult<_> {
                Ok(BillTotals {
                    total_amount: totals
                        .total_amount
                        .checked_add(item.line_total()?)
                        .ok_or_else(|| ValidationError::too_large("Bill total"))?,
                    total_cost: totals
                        .total_cost
                        .checked_add(item.line_cost()?)
                        .ok_or_else(|| ValidationError::too_large("Bill cost"))?,
                })
            })
    }
}

// =============================================================================
// Returns
// =============================================================================

/// What happens to the bill item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum ReturnAction {
    /// The whole remaining quantity goes back: delete the row.
    Remove,
    /// Part of the quantity goes back.
    Decrement { remaining: i64 },
}

impl ReturnAction {
    /// Quantity left on the item after the return.
    pub fn remaining_quantity(&self) -> i64 {
        match self {
            ReturnAction::Remove => 0,
            ReturnAction::Decrement { remaining } => *remaining,
        }
    }
}

/// Outcome of returning `returned_quantity` units of a bill item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnPlan {
    pub returned_quantity: i64,
    pub refund_amount: Money,
    pub refund_cost: Money,
    pub action: ReturnAction,
}

/// Plans a return of `return_qty` units of `item`.
///
/// ## Rules
/// - `1 ≤ return_qty ≤ item.quantity`; anything else is rejected, never clamped
/// - Refund is priced at the item's snapshot, absent cost counts as zero
///
/// ## Example
/// ```rust
/// use tally_core::ledger::{plan_return, ReturnAction};
/// use tally_core::BillItem;
///
/// let item = BillItem {
///     id: 1, bill_id: 1, product_id: 1, quantity: 3,
///     price_at_time_cents: 2500, cost_at_time_cents: Some(1000),
/// };
/// let plan = plan_return(&item, 1).unwrap();
/// assert_eq!(plan.refund_amount.cents(), 2500);
/// assert_eq!(plan.action, ReturnAction::Decrement { remaining: 2 });
/// ```
pub fn plan_return(item: &BillItem, return_qty: i64) -> CoreResult<ReturnPlan> {
    validate_return_quantity(return_qty, item.quantity)?;

    let remaining = item.quantity - return_qty;
    let action = if remaining == 0 {
        ReturnAction::Remove
    } else {
        ReturnAction::Decrement { remaining }
    };

    let refund_amount = item
        .price_at_time()
        .checked_mul(return_qty)
        .ok_or_else(|| ValidationError::too_large("Refund"))?;
    let refund_cost = item
        .cost_at_time()
        .checked_mul(return_qty)
        .ok_or_else(|| ValidationError::too_large("Refund cost"))?;

    Ok(ReturnPlan {
        returned_quantity: return_qty,
        refund_amount,
        refund_cost,
        action,
    })
}

/// Result of a committed return, reported back to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnReceipt {
    pub bill_id: i64,
    pub bill_item_id: i64,
    pub returned_quantity: i64,
    pub remaining_quantity: i64,
    pub refund_amount: Money,
    pub refund_cost: Money,
    /// Bill aggregates after the return.
    pub totals: BillTotals,
}

impl ReturnReceipt {
    pub fn new(item: &BillItem, plan: &ReturnPlan, totals: BillTotals) -> Self {
        ReturnReceipt {
            bill_id: item.bill_id,
            bill_item_id: item.id,
            returned_quantity: plan.returned_quantity,
            remaining_quantity: plan.action.remaining_quantity(),
            refund_amount: plan.refund_amount,
            refund_cost: plan.refund_cost,
            totals,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::Product;

    fn widget() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            cost_price_cents: 1000,
            selling_price_cents: 2500,
        }
    }

    fn item(id: i64, quantity: i64, price: i64, cost: Option<i64>) -> BillItem {
        BillItem {
            id,
            bill_id: 7,
            product_id: 1,
            quantity,
            price_at_time_cents: price,
            cost_at_time_cents: cost,
        }
    }

    #[test]
    fn test_draft_bill() {
        let mut cart = Cart::new();
        cart.add_item(&widget(), 3).unwrap();
        let now = Utc::now();

        let draft = draft_bill(Some(4), &cart, now).unwrap();

        assert_eq!(draft.shop_id, 4);
        assert_eq!(draft.date, now);
        assert_eq!(draft.total_amount.cents(), 7500);
        assert_eq!(draft.total_cost.cents(), 3000);
        assert_eq!(
            draft.items,
            vec![BillItemDraft {
                product_id: 1,
                quantity: 3,
                price_at_time: Money::from_cents(2500),
                cost_at_time: Money::from_cents(1000),
            }]
        );
    }

    #[test]
    fn test_draft_bill_requires_shop() {
        let mut cart = Cart::new();
        cart.add_item(&widget(), 1).unwrap();

        let err = draft_bill(None, &cart, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_draft_bill_requires_items() {
        let err = draft_bill(Some(1), &Cart::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_totals_from_items() {
        let items = vec![item(1, 2, 2500, Some(1000)), item(2, 1, 400, None)];
        let totals = BillTotals::from_items(&items).unwrap();

        assert_eq!(totals.total_amount.cents(), 5400);
        assert_eq!(totals.total_cost.cents(), 2000);

        let none: Vec<BillItem> = Vec::new();
        assert_eq!(BillTotals::from_items(&none).unwrap(), BillTotals::default());
    }

    #[test]
    fn test_totals_from_items_report_overflow() {
        let huge = item(1, 3, i64::MAX / 2, Some(1));
        assert!(matches!(
            BillTotals::from_items([&huge]),
            Err(ValidationError::TooLarge { .. })
        ));

        let items = vec![
            item(1, 1, i64::MAX / 2, None),
            item(2, 1, i64::MAX / 2, None),
            item(3, 1, 10, None),
        ];
        let err = BillTotals::from_items(&items).unwrap_err();
        assert_eq!(err.to_string(), "Bill total is too large");
    }

    #[test]
    fn test_draft_bill_rejects_overflowing_cart() {
        // Carts are deserializable, so totals are checked again at draft time.
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "lines": [{
                "productId": 2,
                "name": "Pricey",
                "priceCents": i64::MAX / 2,
                "costCents": 0,
                "quantity": 3
            }]
        }))
        .unwrap();

        let err = draft_bill(Some(1), &cart, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_plan_partial_return() {
        let plan = plan_return(&item(1, 3, 2500, Some(1000)), 1).unwrap();

        assert_eq!(plan.refund_amount.cents(), 2500);
        assert_eq!(plan.refund_cost.cents(), 1000);
        assert_eq!(plan.action, ReturnAction::Decrement { remaining: 2 });
    }

    #[test]
    fn test_plan_full_return_removes_item() {
        let plan = plan_return(&item(1, 2, 2500, Some(1000)), 2).unwrap();

        assert_eq!(plan.refund_amount.cents(), 5000);
        assert_eq!(plan.action, ReturnAction::Remove);
        assert_eq!(plan.action.remaining_quantity(), 0);
    }

    #[test]
    fn test_plan_return_legacy_cost() {
        let plan = plan_return(&item(1, 2, 500, None), 1).unwrap();
        assert!(plan.refund_cost.is_zero());
    }

    #[test]
    fn test_plan_return_rejects_out_of_range() {
        let line = item(1, 3, 2500, Some(1000));

        assert!(plan_return(&line, 0).is_err());
        assert!(plan_return(&line, 4).is_err());
        assert!(plan_return(&line, -1).is_err());
    }

    #[test]
    fn test_return_receipt() {
        let line = item(5, 3, 2500, Some(1000));
        let plan = plan_return(&line, 1).unwrap();
        let survivor = item(5, 2, 2500, Some(1000));
        let receipt = ReturnReceipt::new(&line, &plan, BillTotals::from_items([&survivor]).unwrap());

        assert_eq!(receipt.bill_id, 7);
        assert_eq!(receipt.bill_item_id, 5);
        assert_eq!(receipt.remaining_quantity, 2);
        assert_eq!(receipt.totals.total_amount.cents(), 5000);
        assert_eq!(receipt.totals.total_cost.cents(), 2000);
    }
}
