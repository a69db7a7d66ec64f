//! # Money Module
//!
//! Provides the `Money` and `Quantity` types used by every computation in
//! the document engine.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An invoice total that is off by a fraction of a unit is a tampered    │
//! │  invoice as far as the counterparty is concerned.                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Amounts are i64 counts of the currency's smallest unit.             │
//! │    Quantities are i64 counts of thousandths, so 2.5 hours is exact.    │
//! │    Rounding happens exactly once per derived figure, half-up.          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiskal_core::money::{Money, Quantity};
//! use fiskal_core::types::VatRate;
//!
//! let unit_price = Money::from_minor(100_000); // 1000.00
//! let net = unit_price.times_quantity(Quantity::from_whole(3));
//! let vat = net.vat_amount(VatRate::from_percent(20));
//!
//! assert_eq!(net.minor(), 300_000);  // 3000.00
//! assert_eq!(vat.minor(), 60_000);   //  600.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::VatRate;

/// Divides with half-up rounding, keeping the math in i128 so large
/// document totals cannot overflow mid-computation.
///
/// `denom` must be positive. Negative numerators round away from zero,
/// mirroring half-up on the absolute value.
pub(crate) fn round_half_up(numer: i128, denom: i128) -> i64 {
    debug_assert!(denom > 0);
    let rounded = if numer >= 0 {
        (numer + denom / 2) / denom
    } else {
        -((-numer + denom / 2) / denom)
    };
    rounded as i64
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative intermediate values (imbalance
///   deltas in the balance validator)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: unit
/// prices, line totals, document totals, turnover, balance sheet cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use fiskal_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // 10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major_part(&self) -> i64 {
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a quantity in thousandths, rounding half-up once.
    ///
    /// This is the line-item net: `unit_price × quantity`. The product is
    /// kept at full precision in i128 and rounded to minor units exactly
    /// once, at the point the figure becomes persistable.
    ///
    /// ## Example
    /// ```rust
    /// use fiskal_core::money::{Money, Quantity};
    ///
    /// // 2.5 h at 400.00/h = 1000.00
    /// let net = Money::from_minor(40_000).times_quantity(Quantity::from_milli(2_500));
    /// assert_eq!(net.minor(), 100_000);
    /// ```
    pub fn times_quantity(&self, qty: Quantity) -> Money {
        Money(round_half_up(self.0 as i128 * qty.milli() as i128, 1000))
    }

    /// Computes the VAT amount at the given rate, rounding half-up.
    ///
    /// ## Implementation
    /// Integer math over basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use fiskal_core::money::Money;
    /// use fiskal_core::types::VatRate;
    ///
    /// let net = Money::from_minor(300_000); // 3000.00
    /// let vat = net.vat_amount(VatRate::from_percent(20));
    /// assert_eq!(vat.minor(), 60_000);      //  600.00
    /// ```
    pub fn vat_amount(&self, rate: VatRate) -> Money {
        Money(round_half_up(self.0 as i128 * rate.bps() as i128, 10_000))
    }
}

/// Display implementation shows money in a human-readable format.
///
/// This is for debugging and logs. Render consumers format for
/// locale themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major_part().abs(), self.minor_part())
    }
}

/// Default money is zero.
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, n: i64) -> Self {
        Money(self.0 * n)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A line-item quantity in thousandths of a unit.
///
/// ## Why Thousandths?
/// Invoiced quantities are not always whole: 2.5 hours of work, 0.75 m of
/// cable. Thousandths keep those exact in integer math, the same way
/// basis points keep tax rates exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use fiskal_core::money::Quantity;
    ///
    /// assert_eq!(Quantity::from_whole(3).milli(), 3000);
    /// ```
    #[inline]
    pub const fn from_whole(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Creates a quantity from thousandths.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Returns the quantity in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Checks if the quantity is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}", self.0 / 1000)
        } else {
            let sign = if self.0 < 0 { "-" } else { "" };
            write!(f, "{}{}.{:03}", sign, (self.0 / 1000).abs(), (self.0 % 1000).abs())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major_part(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_minor(500)), "5.00");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_minor(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
    }

    #[test]
    fn test_times_quantity_whole() {
        let unit_price = Money::from_minor(100_000); // 1000.00
        let net = unit_price.times_quantity(Quantity::from_whole(3));
        assert_eq!(net.minor(), 300_000);
    }

    #[test]
    fn test_times_quantity_fractional_rounds_half_up() {
        // 0.333 × 10.00 = 3.33
        let net = Money::from_minor(1000).times_quantity(Quantity::from_milli(333));
        assert_eq!(net.minor(), 333);

        // 0.005 × 1.00 = 0.005 → rounds up to 0.01
        let net = Money::from_minor(100).times_quantity(Quantity::from_milli(5));
        assert_eq!(net.minor(), 1);
    }

    #[test]
    fn test_vat_amount_standard_rates() {
        let net = Money::from_minor(300_000); // 3000.00
        assert_eq!(net.vat_amount(VatRate::from_percent(20)).minor(), 60_000);
        assert_eq!(net.vat_amount(VatRate::from_percent(10)).minor(), 30_000);
        assert_eq!(net.vat_amount(VatRate::from_percent(0)).minor(), 0);
    }

    #[test]
    fn test_vat_amount_rounds_half_up() {
        // 0.25 at 10% = 0.025 → 0.03
        let vat = Money::from_minor(25).vat_amount(VatRate::from_percent(10));
        assert_eq!(vat.minor(), 3);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_minor(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().minor(), 100);
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(format!("{}", Quantity::from_whole(3)), "3");
        assert_eq!(format!("{}", Quantity::from_milli(2500)), "2.500");
    }

    #[test]
    fn test_round_half_up_symmetry() {
        assert_eq!(round_half_up(15, 10), 2);
        assert_eq!(round_half_up(14, 10), 1);
        assert_eq!(round_half_up(-15, 10), -2);
        assert_eq!(round_half_up(-14, 10), -1);
    }
}
