//! # Money Module
//!
//! Provides the `Money` type for rupee amounts held as integer paise.
//!
//! ## Where Decimals Stop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP JSON (decimal rupees)          kiosk-core / kiosk-db (paise)      │
//! │                                                                         │
//! │    "price": 45.5  ── from_decimal ──►  Money(4550)                      │
//! │                                            │                            │
//! │                                  calculate_tax / multiply_quantity      │
//! │                                            │                            │
//! │    "grandTotal": 53.69 ◄── to_decimal ──  Money(5369)                   │
//! │                                                                         │
//! │  Floats exist only at the JSON edge. Everything in between is i64.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kiosk_core::money::Money;
//!
//! let price = Money::from_cents(1099); // ₹10.99
//! let doubled = price * 2;             // ₹21.98
//! let total = price + Money::from_cents(500);
//!
//! assert_eq!(doubled.cents(), 2198);
//! assert_eq!(total.to_string(), "₹15.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// The name of the accessor is `cents()` because the arithmetic does not care
/// which currency's minor unit it counts.
///
/// ## User Workflow Context
/// ```text
/// Product.price_cents ──► PricedLine.subtotal ──► + line tax ──► Sale.grand_total
///                                                                   │
///                                     UPI intent "am=53.69" ◄───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // ₹10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal rupee amount from the HTTP edge into paise,
    /// rounding to the nearest paisa.
    ///
    /// Non-finite input saturates the way `as i64` does (NaN becomes zero).
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(45.5).cents(), 4550);
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
    /// ```
    #[inline]
    pub fn from_decimal(rupees: f64) -> Self {
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value as decimal rupees for JSON responses and exports.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).rupees(), 10);
    /// assert_eq!(Money::from_cents(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// Calculates GST on this amount, rounded half-up to the paisa.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::Money;
    /// use kiosk_core::types::TaxRate;
    ///
    /// let line = Money::from_cents(4550);   // ₹45.50
    /// let rate = TaxRate::from_bps(1800);   // 18%
    ///
    /// // ₹45.50 × 18% = ₹8.19
    /// assert_eq!(line.calculate_tax(rate).cents(), 819);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Line subtotal: ₹45.50 (qty × unit price)
    ///      │
    ///      ▼
    /// calculate_tax(18%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line GST: ₹8.19 ──► summed into Sale.gst
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large bills from overflowing before the division
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000); // ₹10.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(299).checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable rupee amount, used in logs and the seed tool.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
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

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
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
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(Money::from_decimal(100.5).cents(), 10050);
        assert_eq!(Money::from_decimal(10.0).cents(), 1000);
        assert_eq!(Money::from_decimal(-2.25).cents(), -225);
        // Float noise from the client must not leak into paise
        assert_eq!(Money::from_decimal(19.99).cents(), 1999);
        assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);

        assert_eq!(Money::from_cents(5369).to_decimal(), 53.69);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);

        let mut acc = Money::zero();
        acc += b;
        acc += b;
        assert_eq!(acc, a);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(100), Money::from_cents(250)];
        let by_ref: Money = lines.iter().sum();
        let by_val: Money = lines.into_iter().sum();
        assert_eq!(by_ref.cents(), 350);
        assert_eq!(by_val.cents(), 350);
    }

    #[test]
    fn test_gst_calculation() {
        // ₹100.00 at 18% = ₹18.00
        let amount = Money::from_cents(10000);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(1800)).cents(), 1800);

        // ₹0.05 at 5% = 0.25 paise → rounds down
        assert_eq!(Money::from_cents(5).calculate_tax(TaxRate::from_bps(500)).cents(), 0);

        // ₹0.10 at 5% = 0.5 paise → rounds half up
        assert_eq!(Money::from_cents(10).calculate_tax(TaxRate::from_bps(500)).cents(), 1);

        // Zero rate yields zero tax
        assert!(amount.calculate_tax(TaxRate::zero()).is_zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_cents(100_000_000_000_000_000);
        assert_eq!(big.checked_multiply_quantity(100), None);
        assert_eq!(big.checked_multiply_quantity(10).map(|m| m.cents()), Some(1_000_000_000_000_000_000));

        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(1).checked_add(Money::from_cents(2)), Some(Money::from_cents(3)));
    }

    #[test]
    fn test_tax_on_largest_amount_fits() {
        let tax = Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(TaxRate::MAX_BPS));
        assert_eq!(tax.cents(), i64::MAX);
    }
}
