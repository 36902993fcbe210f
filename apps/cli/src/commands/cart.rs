//! # Cart Commands
//!
//! The billing view: pick a shop, add products, drop lines.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  start_billing  ┌──────────┐   save_bill   ┌──────────┐  │
//! │  │  Empty   │────────────────►│ In Cart  │──────────────►│  Bill    │  │
//! │  │  Cart    │                 │          │   (bill.rs)   │ committed│  │
//! │  └──────────┘                 └──────────┘               └────┬─────┘  │
//! │       ▲                        │  ▲                           │        │
//! │       │                        ▼  │ add_to_cart               │        │
//! │       │                     remove_from_cart                  │        │
//! │       │                     select_shop                       │        │
//! │       └──────────── clear_cart / cart cleared on commit ◄─────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are frozen when a product first enters the cart. Adding the same
//! product again only adds quantity, even if the catalog price changed in
//! between.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{BillingSession, CartState, DbState};
use tally_core::cart::CartLine;
use tally_core::{CoreError, Money};

/// Cart contents and totals with the selected shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub shop_id: Option<i64>,
    /// `None` when no shop is selected or it no longer resolves.
    pub shop_name: Option<String>,
    pub lines: Vec<CartLine>,
    pub total_quantity: i64,
    pub total_amount: Money,
    pub total_cost: Money,
}

impl CartResponse {
    fn new(session: &BillingSession, shop_name: Option<String>) -> Result<Self, ApiError> {
        Ok(CartResponse {
            shop_id: session.shop_id,
            shop_name,
            lines: session.cart.lines().to_vec(),
            total_quantity: session.cart.total_quantity(),
            total_amount: session.cart.total_amount()?,
            total_cost: session.cart.total_cost()?,
        })
    }
}

/// Gets the current cart with its shop name.
pub async fn get_cart(db: &DbState, cart: &CartState) -> Result<CartResponse, ApiError> {
    let session = cart.snapshot();

    let shop_name = match session.shop_id {
        Some(id) => db.inner().shops().get_by_id(id).await?.map(|s| s.name),
        None => None,
    };

    CartResponse::new(&session, shop_name)
}

/// Enters the billing view: empties the cart and optionally preselects a
/// shop.
///
/// ## Returns
/// * `Ok(CartResponse)` - Fresh, empty cart
/// * `Err(NotFound)` - The shop doesn't exist; the session is unchanged
pub async fn start_billing(
    db: &DbState,
    cart: &CartState,
    shop_id: Option<i64>,
) -> Result<CartResponse, ApiError> {
    debug!(?shop_id, "start_billing command");

    if let Some(id) = shop_id {
        ensure_shop(db, id).await?;
    }
    cart.with_session_mut(|s| s.reset(shop_id));

    get_cart(db, cart).await
}

/// Sets the shop the next bill is issued to. The cart is kept.
pub async fn select_shop(
    db: &DbState,
    cart: &CartState,
    shop_id: i64,
) -> Result<CartResponse, ApiError> {
    debug!(shop_id = shop_id, "select_shop command");

    ensure_shop(db, shop_id).await?;
    cart.with_session_mut(|s| s.shop_id = Some(shop_id));

    get_cart(db, cart).await
}

/// Adds a product to the cart at its current catalog price.
///
/// ## Behavior
/// - Quantity must be positive
/// - If the product is already in the cart its quantity increases and the
///   first captured price is kept
///
/// ## Returns
/// Updated cart, or `NotFound` if the product doesn't exist
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    product_id: i64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = product_id, quantity = quantity, "add_to_cart command");

    let product = db
        .inner()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(product_id))?;

    cart.with_session_mut(|s| s.cart.add_item(&product, quantity))?;

    info!(product_id = product_id, quantity = quantity, "Added to cart");
    get_cart(db, cart).await
}

/// Removes the line at `index` (zero-based) and returns it.
pub fn remove_from_cart(cart: &CartState, index: usize) -> Result<CartLine, ApiError> {
    debug!(index = index, "remove_from_cart command");

    let removed = cart.with_session_mut(|s| s.cart.remove_item(index))?;

    info!(product_id = removed.product_id, "Removed from cart");
    Ok(removed)
}

/// Empties the cart. The selected shop is kept.
pub fn clear_cart(cart: &CartState) {
    debug!("clear_cart command");
    cart.with_session_mut(|s| s.cart.clear());
}

async fn ensure_shop(db: &DbState, id: i64) -> Result<(), ApiError> {
    match db.inner().shops().get_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(CoreError::ShopNotFound(id).into()),
    }
}
