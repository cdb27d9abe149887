//! # Cart Module
//!
//! The in-progress transaction's item collection and its mutation rules.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Mutation Rules                               │
//! │                                                                         │
//! │  add_item(entry)                                                        │
//! │     ├── product already in cart? ──► quantity += 1 (price NOT          │
//! │     │                                refreshed from the catalog)        │
//! │     └── otherwise ──────────────► append new line, quantity = 1        │
//! │                                                                         │
//! │  remove_item(product_id)                                                │
//! │     ├── line present ──► whole line removed (no decrement)             │
//! │     └── line absent ───► no-op, returns false                          │
//! │                                                                         │
//! │  clear() ──► items emptied, cart timestamp reset                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! By contract, every caller that mutates a cart recomputes derived totals
//! before handing control back to anything that can observe the cart. The
//! controller in lane-register enforces this inside a single critical
//! section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::TaxRate;
use crate::totals::{compute_totals, Totals};
use crate::types::{CatalogEntry, LineItem};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The in-progress transaction's ordered item collection.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product merges by
///   incrementing quantity)
/// - Insertion order is display order
/// - Maximum unique lines: [`MAX_CART_ITEMS`]
/// - Maximum quantity per line: [`MAX_ITEM_QUANTITY`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart, in insertion order.
    pub items: Vec<LineItem>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a catalog product to the cart.
    ///
    /// ## Behavior
    /// - If the product is already in the cart: its quantity increases by
    ///   one. The frozen name/price are kept; the catalog entry passed in
    ///   is NOT re-consulted (price-at-scan semantics).
    /// - Otherwise: a new line is appended with quantity 1, snapshotting
    ///   name and price from the entry.
    ///
    /// Absence of a matching line is the "create" branch, not a failure.
    /// The only error paths are the cart-size and quantity limits, and a
    /// failed add leaves the cart untouched.
    pub fn add_item(&mut self, entry: &CatalogEntry) -> CoreResult<()> {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == entry.product_id)
        {
            if item.quantity + 1 > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: item.quantity + 1,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity += 1;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(LineItem::from_entry(entry));
        Ok(())
    }

    /// Removes the whole line for a product, if present.
    ///
    /// Removing a non-existent id is a no-op, not an error. Returns
    /// whether a line was actually removed. Quantity is removed wholesale;
    /// there is no "reduce by one" operation.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of unique lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Computes the derived totals for the current items.
    pub fn totals(&self, rate: TaxRate) -> Totals {
        compute_totals(&self.items, rate)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
