//! # Money
//!
//! Prices and cart totals in integer cents.
//!
//! ## Price Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  content API          storefront-content         storefront-core       │
//! │                                                                         │
//! │  "price": 19.99  ──►  serde_json::Number  ──►  parse_decimal("19.99")  │
//! │                        (decimal text kept)      = Money(1999)           │
//! │                                                                         │
//! │  cart line:   unit_price.multiply_quantity(qty)                        │
//! │  cart total:  running sum of line charges, never a float               │
//! │  display:     "$19.99" (Display)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Going through the decimal text means `0.1 + 0.2` style drift never
//! reaches a cart total.
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::parse_decimal("19.99").unwrap();
//! assert_eq!(price.cents(), 1999);
//! assert_eq!((price * 2).to_string(), "$39.98");
//! assert_eq!(price + Money::from_cents(1), Money::from_cents(2000));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in cents. Serializes as a bare integer (`1999`).
///
/// Signed so that subtracting a removed line can never wrap.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──┬──► CartItem.unit_price ──► CartItem.line_total
///                 │
///                 └──► Displayed as "$10.99" on product cards
///
/// CartState.total_price ──► Cart overlay subtotal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses the decimal text of a price (`"19"`, `"19.9"`, `"19.99"`).
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - Digits, then optionally `.` and digits
    /// - At most two significant fraction digits (`"19.990"` is fine,
    ///   `"19.999"` is rejected rather than rounded)
    /// - No exponent notation
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("99").unwrap().cents(), 9900);
    /// assert_eq!(Money::parse_decimal("2.5").unwrap().cents(), 250);
    /// assert!(Money::parse_decimal("1e3").is_err());
    /// ```
    pub fn parse_decimal(text: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a decimal number"));
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a decimal number"));
        }

        let significant = fraction.trim_end_matches('0');
        if significant.len() > 2 {
            return Err(invalid("more than two decimal places"));
        }

        let major: i64 = whole.parse().map_err(|_| invalid("amount too large"))?;
        let minor: i64 = match significant.len() {
            0 => 0,
            1 => significant.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => significant.parse::<i64>().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole dollars, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents after the dollar point, 0 to 99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Charge for `qty` units at this price.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// [`Money::multiply_quantity`], or `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

// =============================================================================
// Operators and Formatting
// =============================================================================

/// `$12.34`. Whole-dollar prices keep their cents (`$99.00`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let price = Money::from_cents(4599);
        assert_eq!((price.dollars(), price.cents_part()), (45, 99));

        let refund = Money::from_cents(-705);
        assert_eq!((refund.dollars(), refund.cents_part()), (-7, 5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Money::from_cents(9900).to_string(), "$99.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn test_running_total() {
        let speaker = Money::from_cents(4500);
        let earphones = Money::from_cents(1990);

        let mut total = Money::zero();
        total += speaker.multiply_quantity(2);
        total += earphones * 3;
        assert_eq!(total, Money::from_cents(14970));

        total -= speaker.multiply_quantity(2);
        assert_eq!(total - earphones, Money::from_cents(3980));
    }

    #[test]
    fn test_sum() {
        let lines = [(1999, 2), (500, 1)];
        let total: Money = lines
            .iter()
            .map(|&(cents, qty)| Money::from_cents(cents).multiply_quantity(qty))
            .sum();
        assert_eq!(total.cents(), 4498);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(1999);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_cents(5997)));
        assert_eq!(price.checked_add(Money::from_cents(1)), Some(Money::from_cents(2000)));

        assert_eq!(price.checked_multiply_quantity(i64::MAX / 1000), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_parse_decimal_accepts_content_prices() {
        assert_eq!(Money::parse_decimal("99").unwrap().cents(), 9900);
        assert_eq!(Money::parse_decimal("19.99").unwrap().cents(), 1999);
        assert_eq!(Money::parse_decimal("2.5").unwrap().cents(), 250);
        assert_eq!(Money::parse_decimal("99.0").unwrap().cents(), 9900);
        assert_eq!(Money::parse_decimal("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse_decimal("19.990").unwrap().cents(), 1999);
        assert_eq!(Money::parse_decimal("-3.10").unwrap().cents(), -310);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".5").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1e3").is_err());
        assert!(Money::parse_decimal("19.999").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }
}
