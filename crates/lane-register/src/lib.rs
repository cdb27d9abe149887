//! # lane-register: Transaction Controller for LanePOS
//!
//! This crate orchestrates a cashier session: it resolves scanned codes
//! and search terms against the product catalog, mutates the cart through
//! lane-core, keeps derived totals fresh, emits events for the
//! presentation layer, and drives payment settlement.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  scanned code / search term                                             │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌───────────────┐   lookup    ┌─────────────────┐                     │
//! │  │   Register    │ ──────────► │  Catalog (ext.) │                     │
//! │  │  (controller) │ ◄────────── │  id → name,price│                     │
//! │  └──────┬────────┘   entry     └─────────────────┘                     │
//! │         │ mutate + recompute totals (one critical section)             │
//! │         ▼                                                              │
//! │  ┌───────────────┐             ┌─────────────────┐                     │
//! │  │  Cart/Totals  │             │ SettlementGate- │  card/mobile:       │
//! │  │  (lane-core)  │             │ way (trait)     │  oneshot result     │
//! │  └──────┬────────┘             └─────────────────┘                     │
//! │         │ broadcast                                                    │
//! │         ▼                                                              │
//! │  RegisterEvent stream ──► presentation / notification (external)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`register`] - The transaction controller and its state machine
//! - [`catalog`] - Catalog lookup trait + in-memory implementation
//! - [`events`] - The event contract consumed by presentation
//! - [`settlement`] - Payment methods, gateway trait, simulated terminal
//! - [`config`] - Register configuration (tax rate, delays)
//! - [`error`] - Controller error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod register;
pub mod settlement;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, InMemoryCatalog};
pub use config::RegisterConfig;
pub use error::{RegisterError, RegisterResult};
pub use events::RegisterEvent;
pub use register::{Register, Resolution, SettlementSummary, TransactionPhase};
pub use settlement::{
    PaymentMethod, SettlementGateway, SettlementOutcome, SimulatedTerminal, Tender,
};
