//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A bill total kept by repeated float subtraction (one per return)       │
//! │  slowly drifts away from the sum of its remaining lines.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    total = Σ quantity × price_cents   (exact, every time)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(2500); // 25.00
//! let line = price.checked_mul(3);     // 75.00
//! assert_eq!(line.map(|m| m.cents()), Some(7500));
//!
//! // Ledger math never wraps: overflow is reported, not committed.
//! assert_eq!(price.checked_mul(i64::MAX), None);
//!
//! // Operator input is parsed leniently: garbage becomes zero.
//! assert_eq!(Money::parse_lenient("25.5").cents(), 2550);
//! assert_eq!(Money::parse_lenient("abc").cents(), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// Product.selling_price_cents ──► CartLine.price ──► BillItem.price_at_time
///                                                          │
///                                                          ▼
///                              Bill.total_amount = Σ quantity × price_at_time
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses operator input the way the catalog forms always have:
    /// the longest numeric prefix wins, anything unparseable is zero.
    ///
    /// ## Rules
    /// - Leading/trailing whitespace is ignored
    /// - Optional sign, digits, optional `.` and fraction
    /// - Fractions beyond two digits are rounded half-up on the third digit
    /// - Empty, malformed or overflowing input → `Money::zero()`
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("10").cents(), 1000);
    /// assert_eq!(Money::parse_lenient(" 12.345 ").cents(), 1235);
    /// assert_eq!(Money::parse_lenient("7kg").cents(), 700);
    /// assert_eq!(Money::parse_lenient("").cents(), 0);
    /// ```
    pub fn parse_lenient(input: &str) -> Money {
        parse_prefix(input.trim()).unwrap_or_default()
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity. `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul(3), Some(Money::from_cents(897)));
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Σ of `amounts`, or `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }
}

fn parse_prefix(s: &str) -> Option<Money> {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut chars = rest.chars().peekable();

    let mut whole: i64 = 0;
    let mut whole_digits = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        whole = whole.checked_mul(10)?.checked_add(i64::from(d))?;
        whole_digits += 1;
        chars.next();
    }

    let mut frac: i64 = 0;
    let mut frac_digits = 0;
    let mut round_up = false;
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            match frac_digits {
                0 | 1 => frac = frac * 10 + i64::from(d),
                2 => round_up = d >= 5,
                _ => {}
            }
            frac_digits += 1;
            chars.next();
        }
    }

    if whole_digits == 0 && frac_digits == 0 {
        return None;
    }
    if frac_digits == 1 {
        frac *= 10;
    }

    let mut cents = whole.checked_mul(100)?.checked_add(frac)?;
    if round_up {
        cents = cents.checked_add(1)?;
    }

    Some(Money(if negative { -cents } else { cents }))
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`75.00`, `-5.50`).
///
/// The currency symbol is a presentation concern and is added by the app's
/// configured formatter.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the i64 bounds. Only read-side reporting sums use this;
/// ledger writes go through the `checked_*` methods.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// How amounts are shown to the operator: a symbol prefix and a number of
/// decimals (0-2). Rounding is half away from zero.
///
/// ## Example
/// ```rust
/// use tally_core::money::{CurrencyFormat, Money};
///
/// let rs = CurrencyFormat::default();
/// assert_eq!(rs.format(Money::from_cents(7500)), "Rs 75.00");
///
/// let whole = CurrencyFormat::new("$", 0);
/// assert_eq!(whole.format(Money::from_cents(7550)), "$76");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimals: u8,
}

impl CurrencyFormat {
    /// Creates a format; `decimals` above 2 are treated as 2.
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            decimals: decimals.min(2),
        }
    }

    /// Formats `amount` with the symbol, e.g. `Rs 75.00` or `-Rs 5.50`.
    pub fn format(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let cents = amount.cents().unsigned_abs();

        match self.decimals {
            0 => format!("{}{}{}", sign, self.symbol, (cents + 50) / 100),
            1 => {
                let tenths = (cents + 5) / 10;
                format!("{}{}{}.{}", sign, self.symbol, tenths / 10, tenths % 10)
            }
            _ => format!("{}{}{}.{:02}", sign, self.symbol, cents / 100, cents % 100),
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::new("Rs ", 2)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(7500).to_string(), "75.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
    }

    #[test]
    fn test_checked_ops_report_overflow() {
        let big = Money::from_cents(i64::MAX / 1000);
        assert_eq!(big.checked_mul(2500), None);
        assert_eq!(Money::from_cents(2500).checked_mul(i64::MAX / 1000), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);

        let total = Money::checked_sum([Money::from_cents(i64::MAX - 1), Money::from_cents(2)]);
        assert_eq!(total, None);
        assert_eq!(
            Money::checked_sum([Money::from_cents(100), Money::from_cents(250)]),
            Some(Money::from_cents(350))
        );
        assert_eq!(Money::checked_sum(std::iter::empty()), Some(Money::zero()));
    }

    #[test]
    fn test_reporting_sum_saturates() {
        let values = [Money::from_cents(i64::MAX), Money::from_cents(1)];
        assert_eq!(values.into_iter().sum::<Money>().cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = values.into_iter().sum();
        assert_eq!(total.cents(), 350);
        assert_eq!(std::iter::empty::<Money>().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_parse_lenient_well_formed() {
        assert_eq!(Money::parse_lenient("25").cents(), 2500);
        assert_eq!(Money::parse_lenient("25.5").cents(), 2550);
        assert_eq!(Money::parse_lenient("25.05").cents(), 2505);
        assert_eq!(Money::parse_lenient(".75").cents(), 75);
        assert_eq!(Money::parse_lenient("+3").cents(), 300);
        assert_eq!(Money::parse_lenient("-3.2").cents(), -320);
    }

    #[test]
    fn test_parse_lenient_rounds_third_fraction_digit() {
        assert_eq!(Money::parse_lenient("0.125").cents(), 13);
        assert_eq!(Money::parse_lenient("0.124").cents(), 12);
        assert_eq!(Money::parse_lenient("1.9999").cents(), 200);
    }

    #[test]
    fn test_parse_lenient_malformed_is_zero() {
        assert!(Money::parse_lenient("").is_zero());
        assert!(Money::parse_lenient("   ").is_zero());
        assert!(Money::parse_lenient("abc").is_zero());
        assert!(Money::parse_lenient("-").is_zero());
        assert!(Money::parse_lenient(".").is_zero());
        assert!(Money::parse_lenient("99999999999999999999999").is_zero());
    }

    #[test]
    fn test_parse_lenient_takes_numeric_prefix() {
        assert_eq!(Money::parse_lenient("12abc").cents(), 1200);
        assert_eq!(Money::parse_lenient("1,000").cents(), 100);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(7500)).unwrap();
        assert_eq!(json, "7500");
    }

    #[test]
    fn test_currency_format() {
        let rs = CurrencyFormat::default();
        assert_eq!(rs.format(Money::from_cents(7500)), "Rs 75.00");
        assert_eq!(rs.format(Money::from_cents(-550)), "-Rs 5.50");
        assert_eq!(rs.format(Money::zero()), "Rs 0.00");

        let one = CurrencyFormat::new("$", 1);
        assert_eq!(one.format(Money::from_cents(1234)), "$12.3");
        assert_eq!(one.format(Money::from_cents(1235)), "$12.4");

        let none = CurrencyFormat::new("", 0);
        assert_eq!(none.format(Money::from_cents(149)), "1");
        assert_eq!(none.format(Money::from_cents(150)), "2");

        assert_eq!(CurrencyFormat::new("", 9).decimals, 2);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
