//! # Payment Settlement
//!
//! The settlement contract: given a method and an amount due, produce an
//! outcome over a result channel.
//!
//! ## Settlement Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Settlement Dispatch                                │
//! │                                                                         │
//! │  Tender::Cash { tendered }                                              │
//! │       │  validated synchronously by the register:                       │
//! │       ├── tendered >= due ──► success, change = tendered - due         │
//! │       └── tendered <  due ──► InsufficientTender, cart unchanged       │
//! │                                                                         │
//! │  Tender::Card / Tender::Mobile                                          │
//! │       │  asynchronous: the gateway returns a oneshot receiver,          │
//! │       ▼  the register awaits it with the cart guarded                   │
//! │  SettlementGateway::begin(method, amount) ──► SettlementOutcome        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The simulated terminal always approves after its configured delay.
//! The outcome type still carries a decline variant so a real gateway can
//! slot in behind the same trait without touching the register.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use lane_core::Money;

use crate::config::RegisterConfig;

// =============================================================================
// Payment Method
// =============================================================================

/// How a transaction is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash handed over at the register.
    Cash,
    /// Card payment on a terminal.
    Card,
    /// Mobile wallet payment.
    Mobile,
}

// =============================================================================
// Tender
// =============================================================================

/// A settlement request from the cashier.
///
/// Cash carries the tendered amount; card and mobile carry nothing, the
/// amount due is taken from the transaction totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tender {
    Cash { tendered_cents: i64 },
    Card,
    Mobile,
}

impl Tender {
    /// The payment method this tender settles with.
    pub fn method(&self) -> PaymentMethod {
        match self {
            Tender::Cash { .. } => PaymentMethod::Cash,
            Tender::Card => PaymentMethod::Card,
            Tender::Mobile => PaymentMethod::Mobile,
        }
    }
}

// =============================================================================
// Settlement Outcome
// =============================================================================

/// Result of an asynchronous settlement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// The gateway approved the payment.
    Approved {
        /// External reference (auth code, wallet receipt id).
        reference: String,
    },
    /// The gateway declined the payment.
    Declined { reason: String },
}

// =============================================================================
// Settlement Gateway
// =============================================================================

/// An asynchronous settlement task with a result channel.
///
/// `begin` must not block: it starts the settlement and immediately
/// returns the receiving half of a oneshot channel. If the sending half
/// is dropped without a verdict, the register treats that as a failure
/// with the cart preserved unchanged, so a misbehaving gateway can never
/// wedge a transaction.
pub trait SettlementGateway: Send + Sync {
    fn begin(&self, method: PaymentMethod, amount: Money) -> oneshot::Receiver<SettlementOutcome>;
}

// =============================================================================
// Simulated Terminal
// =============================================================================

/// A settlement gateway that approves everything after a fixed delay.
///
/// Stands in for a real card terminal / wallet gateway during
/// development. Cash never reaches a gateway; the register validates it
/// synchronously.
#[derive(Debug, Clone)]
pub struct SimulatedTerminal {
    card_delay: Duration,
    mobile_delay: Duration,
}

impl SimulatedTerminal {
    /// Creates a terminal with explicit delays.
    pub fn new(card_delay: Duration, mobile_delay: Duration) -> Self {
        SimulatedTerminal {
            card_delay,
            mobile_delay,
        }
    }

    /// Creates a terminal with the delays from a register config.
    pub fn from_config(config: &RegisterConfig) -> Self {
        SimulatedTerminal::new(config.card_delay(), config.mobile_delay())
    }

    fn delay_for(&self, method: PaymentMethod) -> Duration {
        match method {
            PaymentMethod::Cash => Duration::ZERO,
            PaymentMethod::Card => self.card_delay,
            PaymentMethod::Mobile => self.mobile_delay,
        }
    }
}

impl SettlementGateway for SimulatedTerminal {
    /// Spawns the simulated settlement task. Requires a tokio runtime.
    fn begin(&self, method: PaymentMethod, amount: Money) -> oneshot::Receiver<SettlementOutcome> {
        let (tx, rx) = oneshot::channel();
        let delay = self.delay_for(method);

        debug!(?method, %amount, ?delay, "simulated settlement started");

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let reference = format!("SIM-{}", Uuid::new_v4().simple());
            // Receiver dropped means the register gave up; nothing to do
            let _ = tx.send(SettlementOutcome::Approved { reference });
        });

        rx
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
