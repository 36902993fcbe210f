//! # Cart
//!
//! The in-progress, unsaved list of (product, quantity) pairs being composed
//! into a bill.
//!
//! ## Ownership
//! The cart is plain data. The app session owns exactly one and passes it
//! explicitly to the ledger; it is never persisted.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Session Command         Cart Change           │
//! │  ───────────────          ───────────────         ───────────           │
//! │                                                                         │
//! │  Add product ───────────► cart add ─────────────► lines.push(line)     │
//! │                                                   or line.qty += n      │
//! │                                                                         │
//! │  Remove line ───────────► cart remove <pos> ────► lines.remove(i)      │
//! │                                                                         │
//! │  Save bill ─────────────► bill save ────────────► lines.clear()        │
//! │                                                                         │
//! │  Enter billing view ────► billing ──────────────► lines.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_quantity, ValidationResult};
use crate::MAX_ITEM_QUANTITY;

/// A line in the cart.
///
/// ## Snapshot
/// `price_cents` and `cost_cents` are copied from the product when the line
/// is first created. Adding the same product again only bumps the quantity,
/// so the first price seen wins even if the catalog changes in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub quantity: i64,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            price_cents: product.selling_price_cents,
            cost_cents: product.cost_price_cents,
            quantity,
        }
    }

    /// Unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Unit cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// price × quantity
    pub fn line_total(&self) -> ValidationResult<Money> {
        self.price()
            .checked_mul(self.quantity)
            .ok_or_else(|| ValidationError::too_large("Line total"))
    }

    /// cost × quantity
    pub fn line_cost(&self) -> ValidationResult<Money> {
        self.cost()
            .checked_mul(self.quantity)
            .ok_or_else(|| ValidationError::too_large("Line cost"))
    }
}

/// The cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` and kept in insertion order
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - `quantity` must be in `1..=MAX_ITEM_QUANTITY`
    /// - Existing line: quantities are summed, price snapshot unchanged;
    ///   a sum above the cap is rejected
    /// - New line: appended with the product's current prices
    /// - An add that would overflow the cart totals is rejected
    ///
    /// On error the cart is left as it was.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        match self.lines.iter().position(|l| l.product_id == product.id) {
            Some(i) => {
                let previous = self.lines[i].quantity;
                let new_qty = previous + quantity;
                if new_qty > MAX_ITEM_QUANTITY {
                    return Err(ValidationError::OutOfRange {
                        field: format!("Quantity of '{}'", self.lines[i].name),
                        min: 1,
                        max: MAX_ITEM_QUANTITY,
                    }
                    .into());
                }

                self.lines[i].quantity = new_qty;
                if let Err(err) = self.check_totals() {
                    self.lines[i].quantity = previous;
                    return Err(err.into());
                }
            }
            None => {
                self.lines.push(CartLine::from_product(product, quantity));
                if let Err(err) = self.check_totals() {
                    self.lines.pop();
                    return Err(err.into());
                }
            }
        }

        Ok(())
    }

    /// Removes the line at `index` (0-based) and returns it.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }

        Ok(self.lines.remove(index))
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ price × quantity
    pub fn total_amount(&self) -> ValidationResult<Money> {
        checked_total(self.lines.iter().map(CartLine::line_total), "Cart total")
    }

    /// Σ cost × quantity
    pub fn total_cost(&self) -> ValidationResult<Money> {
        checked_total(self.lines.iter().map(CartLine::line_cost), "Cart cost")
    }

    fn check_totals(&self) -> ValidationResult<()> {
        self.total_amount()?;
        self.total_cost()?;
        Ok(())
    }
}

fn checked_total<I>(mut amounts: I, field: &str) -> ValidationResult<Money>
where
    I: Iterator<Item = ValidationResult<Money>>,
{
    amounts.try_fold(Money::zero(), |total, amount| {
        total
            .checked_add(amount?)
            .ok_or_else(|| ValidationError::too_large(field))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: i64, cost_cents: i64, price_cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            cost_price_cents: cost_cents,
            selling_price_cents: price_cents,
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let widget = test_product(1, 1000, 2500);

        cart.add_item(&widget, 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_amount().unwrap().cents(), 7500);
        assert_eq!(cart.total_cost().unwrap().cents(), 3000);
    }

    #[test]
    fn test_cart_add_same_product_sums_quantity() {
        let mut cart = Cart::new();
        let widget = test_product(1, 1000, 2500);

        cart.add_item(&widget, 2).unwrap();
        cart.add_item(&widget, 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_cart_first_price_wins() {
        let mut cart = Cart::new();
        let mut widget = test_product(1, 1000, 2500);

        cart.add_item(&widget, 1).unwrap();
        widget.selling_price_cents = 3000;
        widget.cost_price_cents = 1200;
        cart.add_item(&widget, 1).unwrap();

        let line = &cart.lines()[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price_cents, 2500);
        assert_eq!(line.cost_cents, 1000);
        assert_eq!(cart.total_amount().unwrap().cents(), 5000);
    }

    #[test]
    fn test_cart_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let widget = test_product(1, 1000, 2500);

        assert!(matches!(
            cart.add_item(&widget, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.add_item(&widget, -2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_rejects_quantity_above_cap() {
        let mut cart = Cart::new();
        let widget = test_product(1, 1000, 2500);

        assert!(matches!(
            cart.add_item(&widget, i64::MAX / 1000),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(cart.add_item(&widget, i64::MAX).is_err());
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount().unwrap(), Money::zero());
    }

    #[test]
    fn test_cart_rejects_summed_quantity_above_cap() {
        let mut cart = Cart::new();
        let widget = test_product(1, 1000, 2500);

        cart.add_item(&widget, MAX_ITEM_QUANTITY).unwrap();
        let err = cart.add_item(&widget, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Quantity of 'Product 1' must be between 1 and 999"
        );

        assert_eq!(cart.lines()[0].quantity, MAX_ITEM_QUANTITY);
        assert_eq!(cart.total_amount().unwrap().cents(), 2500 * MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_cart_rejects_add_that_overflows_totals() {
        let mut cart = Cart::new();
        let pricey = test_product(1, 0, i64::MAX / 2);

        assert!(matches!(
            cart.add_item(&pricey, 3),
            Err(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
        assert!(cart.is_empty());

        cart.add_item(&pricey, 1).unwrap();
        cart.add_item(&test_product(2, 0, i64::MAX / 2), 1).unwrap();
        let err = cart.add_item(&test_product(3, 0, 10), 1).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Cart total is too large");
        assert_eq!(cart.len(), 2);

        assert!(cart.add_item(&pricey, 1).is_err());
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.total_amount().unwrap().cents(), i64::MAX - 1);
    }

    #[test]
    fn test_cart_totals_report_overflow() {
        let line = CartLine {
            product_id: 1,
            name: "Pricey".to_string(),
            price_cents: i64::MAX / 2,
            cost_cents: i64::MAX / 2,
            quantity: 3,
        };
        assert!(matches!(line.line_total(), Err(ValidationError::TooLarge { .. })));
        assert!(line.line_cost().is_err());

        let cart = Cart { lines: vec![line] };
        assert!(matches!(
            cart.total_amount(),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(cart.total_cost().is_err());
    }

    #[test]
    fn test_cart_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(2, 0, 100), 1).unwrap();
        cart.add_item(&test_product(1, 0, 200), 1).unwrap();
        cart.add_item(&test_product(2, 0, 100), 1).unwrap();

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_cart_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 0, 100), 1).unwrap();
        cart.add_item(&test_product(2, 0, 200), 2).unwrap();

        let removed = cart.remove_item(0).unwrap();
        assert_eq!(removed.product_id, 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_amount().unwrap().cents(), 400);
    }

    #[test]
    fn test_cart_remove_out_of_range() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 0, 100), 1).unwrap();

        let err = cart.remove_item(1).unwrap_err();
        assert!(matches!(err, CoreError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 0, 100), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total_amount().unwrap().is_zero());
    }
}
