//! # Totals Module
//!
//! Pure computation of a transaction's derived monetary fields.
//!
//! ## The Totals Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ (unit_price × quantity)        exact integer cents        │
//! │  tax      = subtotal × TAX_RATE              exact, 1/10,000 cent       │
//! │  total    = subtotal + tax                   exact, 1/10,000 cent       │
//! │                                                                         │
//! │  Rounding to 2 decimal places happens ONLY at the presentation          │
//! │  boundary (TotalsSnapshot / round_to_cents), never while               │
//! │  accumulating. Repeated add/remove cycles therefore cannot drift.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `compute_totals` is a pure function: deterministic, order-independent
//! (integer addition is associative and commutative), no I/O.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{ExactMoney, Money, TaxRate};
use crate::types::LineItem;

// =============================================================================
// Totals
// =============================================================================

/// Derived totals of a transaction, at full internal precision.
///
/// Never set directly; always produced by [`compute_totals`] from the
/// current items. Callers hand [`TotalsSnapshot`] (rounded) to anything
/// outside the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line totals, in exact cents.
    pub subtotal: Money,

    /// Tax on the subtotal, unrounded.
    pub tax: ExactMoney,

    /// Subtotal plus tax, unrounded.
    pub total: ExactMoney,
}

impl Totals {
    /// The totals of an empty transaction.
    pub const fn zero() -> Self {
        Totals {
            subtotal: Money::zero(),
            tax: ExactMoney::zero(),
            total: ExactMoney::zero(),
        }
    }

    /// Checks whether all components are zero.
    pub fn is_zero(&self) -> bool {
        self.subtotal.is_zero() && self.tax.is_zero() && self.total.is_zero()
    }

    /// Tax rounded to whole cents, for display and settlement.
    #[inline]
    pub fn tax_rounded(&self) -> Money {
        self.tax.round_to_cents()
    }

    /// Grand total rounded to whole cents, for display and settlement.
    ///
    /// This is the amount a customer actually pays: change for a cash
    /// tender is computed against this value.
    #[inline]
    pub fn total_rounded(&self) -> Money {
        self.total.round_to_cents()
    }

    /// Produces the rounded, serializable view for the presentation layer.
    pub fn snapshot(&self) -> TotalsSnapshot {
        TotalsSnapshot {
            subtotal_cents: self.subtotal.cents(),
            tax_cents: self.tax_rounded().cents(),
            total_cents: self.total_rounded().cents(),
        }
    }
}

// =============================================================================
// Totals Snapshot
// =============================================================================

/// Rounded totals as shown to the cashier and customer.
///
/// This is the presentation boundary: all three values are whole cents.
/// Because the subtotal is always whole cents, the rounded tax and the
/// rounded total stay consistent (`subtotal + tax = total` holds after
/// rounding too).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TotalsSnapshot {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl TotalsSnapshot {
    /// The snapshot of an empty transaction.
    pub const fn zero() -> Self {
        TotalsSnapshot {
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
        }
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Computes derived totals from a set of line items.
///
/// Pure function over the items: same input, same output, regardless of
/// how many times it runs or in which order the items were added.
///
/// ## Example
/// ```rust
/// use lane_core::money::TaxRate;
/// use lane_core::totals::compute_totals;
/// use lane_core::types::{CatalogEntry, LineItem};
///
/// let items = vec![LineItem::from_entry(&CatalogEntry::new("1", "Notebook", 850))];
/// let totals = compute_totals(&items, TaxRate::from_bps(850));
///
/// assert_eq!(totals.subtotal.cents(), 850);
/// assert_eq!(totals.snapshot().tax_cents, 72); // $0.7225 → $0.72
/// ```
pub fn compute_totals(items: &[LineItem], rate: TaxRate) -> Totals {
    let subtotal = items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.line_total());
    let tax = subtotal.tax(rate);
    let total = subtotal.exact() + tax;

    Totals {
        subtotal,
        tax,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
