//! # Dispatch
//!
//! Maps a parsed [`Command`] to its command function and decides what the
//! operator sees afterwards: a toast, a screen, or both.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┬──────────────────────────┐
//! │ Command          │ Toast                    │ Screen                   │
//! ├──────────────────┼──────────────────────────┼──────────────────────────┤
//! │ shop add/edit    │ Shop 'Acme' saved (#3)   │ Shops (reloaded)         │
//! │ product add/edit │ Product 'Tea' saved (#7) │ Products (reloaded)      │
//! │ product delete   │ Product #7 deleted       │ Products (reloaded)      │
//! │ billing / cart * │ (cart changes only)      │ Billing (reloaded)       │
//! │ bill save / sell │ Bill #12 saved: Rs 75.00 │ Billing / Bill #12       │
//! │ bill return      │ Returned 1, refund ...   │ Bill (reloaded)          │
//! │ bill invoice     │ Invoice saved to ...     │ -                        │
//! │ list / view      │ -                        │ the requested view       │
//! └──────────────────┴──────────────────────────┴──────────────────────────┘
//! ```

use serde::Serialize;

use crate::cli::{BillCommand, CartCommand, Command, HistoryArgs, ProductCommand, ShopCommand};
use crate::commands::{bill, cart, config, invoice, product, shop};
use crate::error::ApiError;
use crate::state::AppState;
use crate::view::{Screen, Toast, View};
use tally_core::history::BillFilter;
use tally_core::validation::{ProductInput, ShopInput};

/// What a successful command shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Outcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<Screen>,
}

impl Outcome {
    fn screen(screen: Screen) -> Self {
        Outcome {
            toast: None,
            screen: Some(screen),
        }
    }

    fn toast(message: impl Into<String>) -> Self {
        Outcome {
            toast: Some(Toast::success(message)),
            screen: None,
        }
    }

    fn then(mut self, screen: Screen) -> Self {
        self.screen = Some(screen);
        self
    }
}

impl From<HistoryArgs> for BillFilter {
    fn from(args: HistoryArgs) -> Self {
        BillFilter {
            shop_id: args.shop,
            date_start: args.from,
            date_end: args.to,
            search: args.search,
        }
    }
}

/// Runs one command against the application state.
pub async fn execute(state: &AppState, command: Command) -> Result<Outcome, ApiError> {
    let db = &state.db;
    let money = |m| state.config.format_currency(m);

    let outcome = match command {
        Command::Dashboard => Outcome::screen(View::Dashboard.load(state).await?),

        Command::Shop(ShopCommand::List) => Outcome::screen(View::Shops.load(state).await?),
        Command::Shop(ShopCommand::Add {
            name,
            phone,
            address,
        }) => {
            let input = ShopInput {
                name,
                phone,
                address,
            };
            let created = shop::create_shop(db, &input).await?;
            Outcome::toast(format!("Shop '{}' created (#{})", created.name, created.id))
                .then(View::Shops.load(state).await?)
        }
        Command::Shop(ShopCommand::Edit {
            id,
            name,
            phone,
            address,
        }) => {
            let existing = shop::get_shop(db, id).await?;
            let mut form = shop::shop_form(&existing);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(phone) = phone {
                form.phone = phone;
            }
            if let Some(address) = address {
                form.address = address;
            }
            let updated = shop::update_shop(db, id, &form).await?;
            Outcome::toast(format!("Shop '{}' updated (#{})", updated.name, updated.id))
                .then(View::Shops.load(state).await?)
        }

        Command::Product(ProductCommand::List) => {
            Outcome::screen(View::Products.load(state).await?)
        }
        Command::Product(ProductCommand::Add { name, price, cost }) => {
            let input = ProductInput {
                name,
                cost_price: cost,
                selling_price: price,
            };
            let created = product::create_product(db, &input).await?;
            Outcome::toast(format!("Product '{}' created (#{})", created.name, created.id))
                .then(View::Products.load(state).await?)
        }
        Command::Product(ProductCommand::Edit {
            id,
            name,
            price,
            cost,
        }) => {
            let existing = product::get_product(db, id).await?;
            let mut form = product::product_form(&existing);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(price) = price {
                form.selling_price = price;
            }
            if let Some(cost) = cost {
                form.cost_price = cost;
            }
            let updated = product::update_product(db, id, &form).await?;
            Outcome::toast(format!("Product '{}' updated (#{})", updated.name, updated.id))
                .then(View::Products.load(state).await?)
        }
        Command::Product(ProductCommand::Delete { id }) => {
            product::delete_product(db, id).await?;
            Outcome::toast(format!("Product #{} deleted", id))
                .then(View::Products.load(state).await?)
        }

        Command::Billing { shop } => {
            cart::start_billing(db, &state.cart, shop).await?;
            Outcome::screen(View::Billing.load(state).await?)
        }
        Command::Cart(CartCommand::Show) => Outcome::screen(View::Billing.load(state).await?),
        Command::Cart(CartCommand::Shop { id }) => {
            let cart = cart::select_shop(db, &state.cart, id).await?;
            let name = cart.shop_name.unwrap_or_default();
            Outcome::toast(format!("Billing '{}'", name)).then(View::Billing.load(state).await?)
        }
        Command::Cart(CartCommand::Add { product, quantity }) => {
            cart::add_to_cart(db, &state.cart, product, quantity).await?;
            Outcome::screen(View::Billing.load(state).await?)
        }
        Command::Cart(CartCommand::Remove { position }) => {
            let index = usize::try_from(position - 1)
                .map_err(|_| ApiError::validation("Position is too large"))?;
            let removed = cart::remove_from_cart(&state.cart, index)?;
            Outcome::toast(format!("Removed '{}'", removed.name))
                .then(View::Billing.load(state).await?)
        }
        Command::Cart(CartCommand::Clear) => {
            cart::clear_cart(&state.cart);
            Outcome::toast("Cart cleared").then(View::Billing.load(state).await?)
        }

        Command::Bill(BillCommand::Save) => {
            let saved = bill::save_bill(db, &state.cart).await?;
            Outcome::toast(format!(
                "Bill #{} saved: {}",
                saved.bill.id,
                money(saved.bill.total_amount())
            ))
            .then(View::Billing.load(state).await?)
        }
        Command::Bill(BillCommand::View { id }) => {
            Outcome::screen(Screen::Bill(bill::get_bill_details(db, id).await?))
        }
        Command::Bill(BillCommand::Return { item, quantity }) => {
            let receipt = bill::return_item(db, item, quantity).await?;
            let details = bill::get_bill_details(db, receipt.bill_id).await?;
            Outcome::toast(format!(
                "Returned {} (refund {}), bill total now {}",
                receipt.returned_quantity,
                money(receipt.refund_amount),
                money(receipt.totals.total_amount)
            ))
            .then(Screen::Bill(details))
        }
        Command::Bill(BillCommand::Invoice { id, dir }) => {
            let exported =
                invoice::export_invoice(db, &state.config, id, dir.as_deref()).await?;
            Outcome::toast(format!("Invoice saved to {}", exported.path.display()))
        }

        Command::History(args) => {
            Outcome::screen(View::History(BillFilter::from(args)).load(state).await?)
        }

        Command::Sell { shop, items } => {
            let saved = bill::quick_sell(db, shop, &items).await?;
            let details = bill::get_bill_details(db, saved.bill.id).await?;
            Outcome::toast(format!(
                "Bill #{} saved: {}",
                saved.bill.id,
                money(saved.bill.total_amount())
            ))
            .then(Screen::Bill(details))
        }

        Command::Config => Outcome::screen(Screen::Config(config::get_config(&state.config))),

        Command::Shell => return Err(ApiError::validation("Already in the shell")),
    };

    Ok(outcome)
}
