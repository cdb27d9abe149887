//! # Money Module
//!
//! Provides the `Money` and `ExactMoney` types for handling monetary values.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Repeated add/remove cycles on a cart drift the same way.               │
//! │                                                                         │
//! │  OUR SOLUTION: Two fixed-point integer types                            │
//! │    Money       i64  in cents            exact prices and subtotals     │
//! │    ExactMoney  i128 in 1/10,000 cent    exact tax and grand totals     │
//! │                                                                         │
//! │  Tax = cents × basis points lands exactly on the 1/10,000-cent grid,   │
//! │  so nothing is rounded until the presentation boundary.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lane_core::money::{Money, TaxRate};
//!
//! let subtotal = Money::from_cents(10_000); // $100.00
//! let tax = subtotal.tax(TaxRate::from_bps(850)); // exact 8.50% tax
//!
//! assert_eq!(tax.round_to_cents().cents(), 850); // $8.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: change calculations can subtract freely
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every price, subtotal, and tendered amount in the system flows through
/// this type. Only tax and grand totals, which carry sub-cent precision,
/// use [`ExactMoney`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use lane_core::money::Money;
    ///
    /// let price = Money::from_cents(1299); // Represents $12.99
    /// assert_eq!(price.cents(), 1299);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Widens to the full-precision representation.
    #[inline]
    pub const fn exact(self) -> ExactMoney {
        ExactMoney(self.0 as i128 * ExactMoney::SCALE)
    }

    /// Computes the exact (unrounded) tax on this amount.
    ///
    /// ## Precision
    /// `rate.bps()` is basis points: 850 = 8.50%. Multiplying cents by
    /// basis points yields a value in 1/10,000 of a cent, which is exactly
    /// the [`ExactMoney`] unit. No precision is lost here; rounding happens
    /// once, at the presentation boundary.
    ///
    /// ## Example
    /// ```rust
    /// use lane_core::money::{Money, TaxRate};
    ///
    /// let subtotal = Money::from_cents(3448); // $34.48
    /// let tax = subtotal.tax(TaxRate::from_bps(850));
    ///
    /// // $34.48 × 8.50% = $2.9308 exactly
    /// assert_eq!(tax.raw(), 2_930_800);
    /// assert_eq!(tax.round_to_cents().cents(), 293); // $2.93 for display
    /// ```
    #[inline]
    pub const fn tax(self, rate: TaxRate) -> ExactMoney {
        ExactMoney(self.0 as i128 * rate.bps() as i128)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use lane_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. The presentation layer owns actual
/// currency formatting.
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// ExactMoney Type
// =============================================================================

/// A full-precision monetary amount in 1/10,000 of a cent.
///
/// ## Where This Is Used
/// ```text
/// Cart items ──► subtotal (Money, exact cents)
///                    │
///                    ▼
///               subtotal × TaxRate ──► tax (ExactMoney, exact)
///                    │
///                    ▼
///               subtotal + tax ──► total (ExactMoney, exact)
///                    │
///                    ▼ round_to_cents() at the presentation boundary
///               "$37.41"
/// ```
///
/// Internal accumulation retains full precision across add/remove cycles;
/// rounding to whole cents happens exactly once, when a value leaves the
/// core for display or settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExactMoney(i128);

impl ExactMoney {
    /// Number of internal units per cent.
    pub const SCALE: i128 = 10_000;

    /// Creates an amount from raw 1/10,000-cent units.
    #[inline]
    pub const fn from_raw(units: i128) -> Self {
        ExactMoney(units)
    }

    /// Returns the raw value in 1/10,000-cent units.
    #[inline]
    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        ExactMoney(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Rounds to whole cents (half away from zero).
    ///
    /// This is the single place sub-cent precision is dropped. Callers
    /// invoke it only when a value crosses the presentation or settlement
    /// boundary.
    ///
    /// ## Example
    /// ```rust
    /// use lane_core::money::ExactMoney;
    ///
    /// // $2.9308 → $2.93
    /// assert_eq!(ExactMoney::from_raw(2_930_800).round_to_cents().cents(), 293);
    /// // exactly half a cent rounds up
    /// assert_eq!(ExactMoney::from_raw(5_000).round_to_cents().cents(), 1);
    /// ```
    pub const fn round_to_cents(&self) -> Money {
        let half = Self::SCALE / 2;
        let cents = if self.0 >= 0 {
            (self.0 + half) / Self::SCALE
        } else {
            (self.0 - half) / Self::SCALE
        };
        Money::from_cents(cents as i64)
    }
}

impl Add for ExactMoney {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        ExactMoney(self.0 + other.0)
    }
}

impl AddAssign for ExactMoney {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for ExactMoney {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        ExactMoney(self.0 - other.0)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 850 bps = 8.50% (the default rate)
///
/// A rate is configuration, never a hard-coded literal at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
