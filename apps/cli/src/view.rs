//! # Views and Toasts
//!
//! The five screens of the application plus the bill details screen, and
//! the one-line success/error notifications shown after a command.
//!
//! ## Load / Render
//! ```text
//! ┌────────────┐   load(&AppState)   ┌────────────┐   render(&ConfigState)
//! │    View    │ ──────────────────► │   Screen   │ ─────────────────────► text
//! │ (what to   │   (queries only)    │ (data)     │
//! │  show)     │                     │            │ ─── serde_json ──────► --json
//! └────────────┘                     └────────────┘
//! ```
//!
//! A write command never renders by itself: it returns a toast and the
//! view to reload, so lists always show what is actually stored.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::commands::cart::{get_cart, CartResponse};
use crate::commands::dashboard::{get_dashboard, DashboardResponse};
use crate::commands::history::list_history;
use crate::commands::product::list_products;
use crate::commands::shop::list_shops;
use crate::error::ApiError;
use crate::state::{AppState, ConfigState};
use tally_core::history::BillFilter;
use tally_core::{BillDetails, BillSummary, Money, Product, Shop, ValidationError};

// =============================================================================
// Views
// =============================================================================

/// A screen that can be (re)loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Shops,
    Products,
    Billing,
    History(BillFilter),
}

impl View {
    /// Queries everything the view shows.
    pub async fn load(&self, state: &AppState) -> Result<Screen, ApiError> {
        let screen = match self {
            View::Dashboard => {
                Screen::Dashboard(get_dashboard(&state.db, &state.config, Utc::now()).await?)
            }
            View::Shops => Screen::Shops(list_shops(&state.db).await?),
            View::Products => Screen::Products(list_products(&state.db).await?),
            View::Billing => Screen::Billing {
                cart: get_cart(&state.db, &state.cart).await?,
                products: list_products(&state.db).await?,
            },
            View::History(filter) => {
                Screen::History(list_history(&state.db, &state.config, filter).await?)
            }
        };
        Ok(screen)
    }
}

/// Loaded screen data.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "camelCase")]
pub enum Screen {
    Dashboard(DashboardResponse),
    Shops(Vec<Shop>),
    Products(Vec<Product>),
    Billing {
        cart: CartResponse,
        products: Vec<Product>,
    },
    History(Vec<BillSummary>),
    Bill(BillDetails),
    Config(ConfigState),
}

impl Screen {
    /// Renders the screen as terminal text.
    pub fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, config);
        out
    }

    fn write_to(&self, out: &mut String, config: &ConfigState) -> fmt::Result {
        let money = |m: Money| config.format_currency(m);
        let amount = |m: Result<Money, ValidationError>| match m {
            Ok(m) => money(m),
            Err(_) => "overflow".to_string(),
        };
        let date = |d: DateTime<Utc>| {
            d.with_timezone(&config.utc_offset())
                .format("%Y-%m-%d %H:%M")
                .to_string()
        };

        match self {
            Screen::Dashboard(dash) => {
                writeln!(out, "== Dashboard ==")?;
                writeln!(out, "Shops: {}", dash.shop_count)?;
                writeln!(out, "Sales this month: {}", money(dash.month_to_date_sales))?;
                writeln!(out)?;
                writeln!(out, "Recent bills")?;
                write_bills(out, &dash.recent_bills, &money, &date)?;
            }
            Screen::Shops(shops) => {
                writeln!(out, "== Shops ==")?;
                if shops.is_empty() {
                    writeln!(out, "No shops yet. Add one with `shop add <name>`.")?;
                }
                for shop in shops {
                    writeln!(
                        out,
                        "{:>5}  {:<28}  {:<14}  {}",
                        shop.id,
                        clip(&shop.name, 28),
                        shop.phone.as_deref().unwrap_or("-"),
                        shop.address.as_deref().unwrap_or("-"),
                    )?;
                }
            }
            Screen::Products(products) => {
                writeln!(out, "== Products ==")?;
                write_products(out, products, &money)?;
            }
            Screen::Billing { cart, products } => {
                writeln!(out, "== Billing ==")?;
                let shop = match (cart.shop_id, cart.shop_name.as_deref()) {
                    (Some(id), Some(name)) => format!("{} (#{})", name, id),
                    (Some(id), None) => format!("{} (#{})", tally_core::UNKNOWN_SHOP, id),
                    (None, _) => "none selected".to_string(),
                };
                writeln!(out, "Shop: {}", shop)?;
                writeln!(out)?;
                if cart.lines.is_empty() {
                    writeln!(out, "Cart is empty. Add items with `cart add <product> [qty]`.")?;
                }
                for (i, line) in cart.lines.iter().enumerate() {
                    writeln!(
                        out,
                        "{:>3}. {:<28} {:>4} x {:>12} = {:>12}",
                        i + 1,
                        clip(&line.name, 28),
                        line.quantity,
                        money(line.price()),
                        amount(line.line_total()),
                    )?;
                }
                writeln!(out, "Total: {}", money(cart.total_amount))?;
                writeln!(out)?;
                writeln!(out, "Catalog")?;
                write_products(out, products, &money)?;
            }
            Screen::History(bills) => {
                writeln!(out, "== History ==")?;
                write_bills(out, bills, &money, &date)?;
            }
            Screen::Bill(details) => {
                writeln!(out, "== Bill #{} ==", details.bill.id)?;
                writeln!(out, "Shop: {}", details.shop_display_name())?;
                writeln!(out, "Date: {}", date(details.bill.date))?;
                writeln!(out)?;
                if details.lines.is_empty() {
                    writeln!(out, "All items have been returned.")?;
                }
                for line in &details.lines {
                    writeln!(
                        out,
                        "{:>5}  {:<28} {:>4} x {:>12} = {:>12}",
                        line.item.id,
                        clip(line.product_display_name(), 28),
                        line.item.quantity,
                        money(line.item.price_at_time()),
                        amount(line.item.line_total()),
                    )?;
                }
                writeln!(out, "Total: {}", money(details.bill.total_amount()))?;
            }
            Screen::Config(config) => {
                let path = |p: &Option<std::path::PathBuf>| {
                    p.as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(default)".to_string())
                };
                writeln!(out, "database_path      = {}", path(&config.database_path))?;
                writeln!(out, "store_name         = {}", config.store_name)?;
                writeln!(out, "currency_symbol    = {:?}", config.currency_symbol)?;
                writeln!(out, "currency_decimals  = {}", config.currency_decimals)?;
                match config.utc_offset_minutes {
                    Some(m) => writeln!(out, "utc_offset_minutes = {}", m)?,
                    None => writeln!(out, "utc_offset_minutes = (system local)")?,
                }
                writeln!(out, "invoice_dir        = {}", path(&config.invoice_dir))?;
            }
        }
        Ok(())
    }
}

fn write_products<M>(out: &mut String, products: &[Product], money: &M) -> fmt::Result
where
    M: Fn(Money) -> String,
{
    if products.is_empty() {
        return writeln!(out, "No products yet. Add one with `product add <name> --price <amount>`.");
    }
    for p in products {
        writeln!(
            out,
            "{:>5}  {:<28}  cost {:>12}  price {:>12}",
            p.id,
            clip(&p.name, 28),
            money(p.cost_price()),
            money(p.selling_price()),
        )?;
    }
    Ok(())
}

fn write_bills<M, D>(out: &mut String, bills: &[BillSummary], money: &M, date: &D) -> fmt::Result
where
    M: Fn(Money) -> String,
    D: Fn(DateTime<Utc>) -> String,
{
    if bills.is_empty() {
        return writeln!(out, "No bills found.");
    }
    for s in bills {
        writeln!(
            out,
            "#{:<5} {:<24}  {}  {:>12}",
            s.bill.id,
            clip(s.shop_display_name(), 24),
            date(s.bill.date),
            money(s.bill.total_amount()),
        )?;
    }
    Ok(())
}

/// Cuts `text` to `width` characters, marking the cut with `~`.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

// =============================================================================
// Toasts
// =============================================================================

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// One-line notification after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl From<&ApiError> for Toast {
    fn from(err: &ApiError) -> Self {
        Toast::error(err.message.clone())
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Success => write!(f, "✓ {}", self.message),
            Severity::Error => write!(f, "✗ {}", self.message),
        }
    }
}
