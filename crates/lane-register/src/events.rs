//! # Register Events
//!
//! The event contract between the core and the (external) presentation
//! layer.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register operation          Events emitted                             │
//! │  ─────────────────           ──────────────                             │
//! │  scan hit                    ItemAdded, CartChanged                     │
//! │  scan miss                   LookupFailed                               │
//! │  search (many matches)       AmbiguousMatch                             │
//! │  remove line                 CartChanged                                │
//! │  settlement failure          PaymentFailed                              │
//! │  settlement success          TransactionCompleted, CartChanged          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are facts, not commands: the presentation layer renders them
//! (cart display, toasts) and produces nothing the core consumes. Every
//! payload is serializable so a frontend can consume the stream as JSON;
//! ts-rs keeps the TypeScript side in sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use lane_core::{CatalogEntry, LineItem, TotalsSnapshot};

use crate::settlement::PaymentMethod;

/// Events emitted by the register, consumed by presentation/notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[ts(export)]
pub enum RegisterEvent {
    /// A product was added to the cart (scan hit, single search match, or
    /// disambiguation answer).
    ItemAdded { product_name: String },

    /// A lookup produced nothing: unknown code or zero search matches.
    /// No cart mutation happened.
    LookupFailed { query: String },

    /// A search matched several products. The candidates are presented to
    /// the cashier in order; the answer comes back as a selection index.
    /// No cart mutation happens until the selection resolves.
    AmbiguousMatch { candidates: Vec<CatalogEntry> },

    /// The cart changed: items and freshly recomputed totals, rounded for
    /// display. Emitted after every mutation, including the reset to
    /// empty after completion or cancellation.
    CartChanged {
        items: Vec<LineItem>,
        totals: TotalsSnapshot,
    },

    /// A settlement attempt failed. The cart is unchanged.
    PaymentFailed { reason: String },

    /// Settlement succeeded and the transaction is finalized. The totals
    /// snapshot is taken before the cart is cleared.
    TransactionCompleted {
        transaction_id: String,
        final_totals: TotalsSnapshot,
        method: PaymentMethod,
        change_cents: i64,
        reference: Option<String>,
        #[ts(as = "String")]
        completed_at: DateTime<Utc>,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_added_wire_shape() {
        let event = RegisterEvent::ItemAdded {
            product_name: "Pen".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "itemAdded", "productName": "Pen" })
        );
    }

    #[test]
    fn test_cart_changed_wire_shape() {
        let event = RegisterEvent::CartChanged {
            items: Vec::new(),
            totals: TotalsSnapshot::zero(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "cartChanged");
        assert_eq!(value["totals"]["subtotalCents"], 0);
        assert_eq!(value["totals"]["taxCents"], 0);
        assert_eq!(value["totals"]["totalCents"], 0);
    }

    #[test]
    fn test_payment_failed_wire_shape() {
        let event = RegisterEvent::PaymentFailed {
            reason: "no items in cart".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "paymentFailed");
        assert_eq!(value["reason"], "no items in cart");
    }
}
