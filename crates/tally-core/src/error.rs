//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator sees (error toast)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Toast        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ID, index, bounds)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Shop cannot be found.
    ///
    /// ## When This Occurs
    /// - Committing a bill for a shop id that no longer exists
    /// - Editing a shop with a stale id
    #[error("Shop not found: {0}")]
    ShopNotFound(i64),

    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Adding a deleted product to the cart
    /// - Editing or deleting with a stale id
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Bill not found.
    #[error("Bill not found: {0}")]
    BillNotFound(i64),

    /// Bill item not found (already fully returned, or never existed).
    #[error("Bill item not found: {0}")]
    BillItemNotFound(i64),

    /// Cart position is outside `[0, len)`.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [Widget x3, Gadget x1]   (len = 2)
    ///      │
    ///      ▼
    /// remove_item(5)
    ///      │
    ///      ▼
    /// IndexOutOfRange { index: 5, len: 2 }
    /// ```
    #[error("Cart position {index} is out of range (cart has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true if this error means a referenced entity is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ShopNotFound(_)
                | CoreError::ProductNotFound(_)
                | CoreError::BillNotFound(_)
                | CoreError::BillItemNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Nothing is ever written to storage when one of these is raised.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// A computed amount or quantity does not fit in an i64.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Invalid format (e.g. a date that does not parse).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a TooLarge error for a field.
    pub fn too_large(field: impl Into<String>) -> Self {
        ValidationError::TooLarge {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
