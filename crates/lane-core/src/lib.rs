//! # lane-core: Pure Business Logic for LanePOS
//!
//! This crate is the **heart** of LanePOS. It contains the transaction
//! accumulation and totals engine as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LanePOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (external: web UI, shell)             │   │
//! │  │        renders cart state, surfaces notifications               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ event stream                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 lane-register (controller)                      │   │
//! │  │    catalog resolution, settlement, event emission               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lane-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  totals   │  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │  Totals   │  │   │
//! │  │   │ CatalogEntry │ ExactMoney│  │  merge    │  │ snapshot  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogEntry, LineItem)
//! - [`money`] - Fixed-point money types (no floating point!)
//! - [`cart`] - Cart state and mutation rules
//! - [`totals`] - Pure subtotal/tax/total computation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are fixed-point integers
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lane_core::Money` instead of
// `use lane_core::money::Money`

pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{ExactMoney, Money, TaxRate};
pub use totals::{compute_totals, Totals, TotalsSnapshot};
pub use types::{CatalogEntry, LineItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points (8.50%).
///
/// Used when no rate is configured. Always threaded through
/// [`TaxRate`]; call sites never hard-code a rate.
pub const DEFAULT_TAX_RATE_BPS: u32 = 850;

/// Maximum unique lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., a barcode scanner stuck in a
/// repeat loop).
pub const MAX_ITEM_QUANTITY: i64 = 999;
