//! # Domain Types
//!
//! Core domain types used throughout LanePOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐          ┌─────────────────┐                      │
//! │  │  CatalogEntry   │  add ──► │    LineItem     │                      │
//! │  │  ─────────────  │          │  ─────────────  │                      │
//! │  │  product_id     │          │  product_id     │                      │
//! │  │  name           │          │  name (frozen)  │                      │
//! │  │  price_cents    │          │  unit_price     │                      │
//! │  │  (external,     │          │  (frozen)       │                      │
//! │  │   read-only)    │          │  quantity ≥ 1   │                      │
//! │  └─────────────────┘          └─────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes the catalog name and price at the moment the item
//! is scanned. If the catalog changes mid-transaction, the cart keeps the
//! price the customer saw at the register.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog Entry
// =============================================================================

/// A product record from the external catalog.
///
/// The catalog is a read-only key-value source from the core's point of
/// view: `product_id` is the lookup key, name and price are the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogEntry {
    /// Catalog key (barcode, SKU, or other business identifier).
    pub product_id: String,

    /// Display name shown to the cashier and on the cart.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,
}

impl CatalogEntry {
    /// Creates a new catalog entry.
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        CatalogEntry {
            product_id: product_id.into(),
            name: name.into(),
            price_cents,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One catalog product's accumulated quantity within a transaction.
///
/// ## Invariants
/// - `quantity >= 1` (a zero-quantity line does not exist; removal is
///   whole-line, never a decrement)
/// - at most one line per `product_id` within a cart
/// - `name` and `unit_price_cents` are frozen at add time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Catalog key of the product (immutable once created).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Accumulated quantity, always at least 1.
    pub quantity: i64,

    /// When this line was first added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a new line item from a catalog entry with quantity 1.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. Later catalog updates do not
    /// touch lines already in the cart.
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        LineItem {
            product_id: entry.product_id.clone(),
            name: entry.name.clone(),
            unit_price_cents: entry.price_cents,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
