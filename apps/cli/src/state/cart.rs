//! # Cart State
//!
//! The billing session: the cart being composed and the shop it will be
//! billed to. Lives only as long as the process; nothing here is persisted
//! until `bill save` commits it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Billing Session Operations                           │
//! │                                                                         │
//! │  Shell Command            Command Function        Session Change        │
//! │  ─────────────            ────────────────        ──────────────        │
//! │                                                                         │
//! │  billing [--shop 3] ─────► start_billing() ─────► cart cleared,        │
//! │                                                   shop = 3 / None       │
//! │                                                                         │
//! │  cart shop 3 ────────────► select_shop() ───────► shop = 3             │
//! │                                                                         │
//! │  cart add 7 2 ───────────► add_to_cart() ───────► lines += (7, ×2)     │
//! │                                                                         │
//! │  cart remove 1 ──────────► remove_from_cart() ──► lines.remove(0)      │
//! │                                                                         │
//! │  bill save ──────────────► save_bill() ─────────► cart cleared         │
//! │                                                   (shop kept)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tally_core::cart::Cart;

/// Cart plus the selected shop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSession {
    /// Shop the next bill is issued to.
    pub shop_id: Option<i64>,
    pub cart: Cart,
}

impl BillingSession {
    /// Empties the cart and sets (or unsets) the shop.
    pub fn reset(&mut self, shop_id: Option<i64>) {
        self.cart.clear();
        self.shop_id = shop_id;
    }
}

/// Session-owned billing state.
///
/// A `Mutex` keeps the state `Sync` so commands can take `&CartState`;
/// a poisoned lock still yields the session since every mutation is a
/// single cart call.
#[derive(Debug, Default)]
pub struct CartState {
    session: Mutex<BillingSession>,
}

impl CartState {
    /// Creates an empty session with no shop selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = cart_state.with_session(|s| s.cart.total_amount());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BillingSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_session_mut(|s| s.cart.add_item(&product, 1))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut BillingSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> BillingSession {
        self.with_session(BillingSession::clone)
    }
}
