//! # Validation Module
//!
//! Input validation for the catalog forms and the billing screen.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal (clap)                                              │
//! │  └── Type validation (ids are integers, dates are dates)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required names                                                    │
//! │  ├── Tolerant money parsing (garbage → 0)                              │
//! │  └── Business rules (selling price > 0, 1 ≤ quantity ≤ 999)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{ProductInput, validate_product};
//!
//! let input = ProductInput {
//!     name: "Widget".to_string(),
//!     cost_price: "10".to_string(),
//!     selling_price: "25".to_string(),
//! };
//! let product = validate_product(&input).unwrap();
//! assert_eq!(product.selling_price.cents(), 2500);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, NewShop};
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Raw Form Input
// =============================================================================

/// Shop form exactly as the operator typed it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopInput {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Product form exactly as the operator typed it.
///
/// Prices stay text until validation so that the tolerant parsing policy
/// lives in one place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub cost_price: String,
    pub selling_price: String,
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a shop form.
///
/// ## Rules
/// - Name is required (after trimming) and at most 200 characters
/// - Phone and address are free text; blank becomes `None`
pub fn validate_shop(input: &ShopInput) -> ValidationResult<NewShop> {
    let name = validate_name("Shop name", &input.name)?;

    Ok(NewShop {
        name,
        phone: optional_text(&input.phone),
        address: optional_text(&input.address),
    })
}

/// Validates a product form.
///
/// ## Rules
/// - Name is required (after trimming) and at most 200 characters
/// - Prices are parsed leniently: malformed or empty text counts as 0
/// - Selling price must then be positive
/// - Cost price defaults to 0 and must not be negative
///
/// ## Example
/// ```rust
/// use tally_core::validation::{ProductInput, validate_product};
///
/// // Empty cost is fine, it coerces to zero.
/// let ok = ProductInput { name: "Tea".into(), cost_price: "".into(), selling_price: "4".into() };
/// assert!(validate_product(&ok).is_ok());
///
/// // Malformed selling price coerces to zero, which is then rejected.
/// let bad = ProductInput { name: "Tea".into(), cost_price: "1".into(), selling_price: "n/a".into() };
/// assert!(validate_product(&bad).is_err());
/// ```
pub fn validate_product(input: &ProductInput) -> ValidationResult<NewProduct> {
    let name = validate_name("Product name", &input.name)?;

    let selling_price = Money::parse_lenient(&input.selling_price);
    if !selling_price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Selling price".to_string(),
        });
    }

    let cost_price = Money::parse_lenient(&input.cost_price);
    if cost_price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "Cost price".to_string(),
        });
    }

    Ok(NewProduct {
        name,
        cost_price,
        selling_price,
    })
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a display name and returns it trimmed.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a quantity being added to the cart.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`] (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "Quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a return against the quantity still on the bill line.
///
/// ## Rules
/// - `1 ≤ return_qty ≤ current_qty`, never clamped
pub fn validate_return_quantity(return_qty: i64, current_qty: i64) -> ValidationResult<()> {
    if return_qty < 1 || return_qty > current_qty {
        return Err(ValidationError::OutOfRange {
            field: "Return quantity".to_string(),
            min: 1,
            max: current_qty,
        });
    }

    Ok(())
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
