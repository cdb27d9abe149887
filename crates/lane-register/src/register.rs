//! # Register Module
//!
//! The transaction controller: the only mutator of the active
//! transaction's cart.
//!
//! ## Transaction State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              first add_item                settle_payment               │
//! │   ┌───────┐ ───────────────► ┌──────────────┐ ─────────► ┌──────────┐  │
//! │   │ EMPTY │                  │ ACCUMULATING │            │ SETTLING │  │
//! │   └───────┘ ◄─────────────── └──────────────┘ ◄───────── └────┬─────┘  │
//! │       ▲       cancel            ▲        │      failure       │        │
//! │       │                         └────────┘                    │        │
//! │       │                     add/remove (stays, even           │        │
//! │       │                     at zero items)                    │        │
//! │       └───────────────────────────────────────────────────────┘        │
//! │                        success (fresh transaction)                     │
//! │                                                                         │
//! │  SETTLING is non-reentrant: while a settlement is outstanding, every   │
//! │  cart mutation and further settlement attempt is rejected with         │
//! │  SettlementInFlight. Failure leaves the cart byte-for-byte intact.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals Freshness
//! Derived totals are recomputed inside the same critical section as the
//! cart mutation that invalidated them. No caller, on any thread, can
//! observe a cart whose totals are stale relative to its items.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use lane_core::validation::validate_search_term;
use lane_core::{Cart, CatalogEntry, CoreError, LineItem, Money, TaxRate, Totals, TotalsSnapshot};

use crate::catalog::Catalog;
use crate::config::RegisterConfig;
use crate::error::{RegisterError, RegisterResult};
use crate::events::RegisterEvent;
use crate::settlement::{
    PaymentMethod, SettlementGateway, SettlementOutcome, SimulatedTerminal, Tender,
};

// =============================================================================
// Transaction Phase
// =============================================================================

/// Where the active transaction is in its lifecycle.
///
/// `Accumulating` is sticky: removing the last line does not return the
/// transaction to `Empty`. "Empty but not yet finalized" is a real state
/// a cashier can be in after voiding every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPhase {
    /// Fresh transaction, nothing scanned yet.
    Empty,
    /// Items have been added (possibly all removed again since).
    Accumulating,
    /// A settlement is outstanding; the cart is locked against mutation.
    Settling,
}

// =============================================================================
// Resolution
// =============================================================================

/// Typed result of an id or search resolution, mirroring the emitted
/// events for callers that prefer return values over subscribing.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The product was resolved and added to the cart.
    Added { product_name: String },
    /// Nothing matched; the cart was not touched.
    NotFound,
    /// Several products matched; a selection is required before anything
    /// is added.
    NeedsSelection { candidates: Vec<CatalogEntry> },
}

// =============================================================================
// Settlement Summary
// =============================================================================

/// What a successful settlement hands back to the caller.
///
/// The totals snapshot is taken before the cart is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SettlementSummary {
    pub transaction_id: String,
    pub method: PaymentMethod,
    /// Amount charged: the transaction total rounded to whole cents.
    pub amount_cents: i64,
    /// Change due back to the customer (cash only; zero otherwise).
    pub change_cents: i64,
    pub totals: TotalsSnapshot,
}

// =============================================================================
// Register
// =============================================================================

/// Mutable state of the active transaction, guarded by the register's
/// mutex.
#[derive(Debug)]
struct RegisterInner {
    /// Identifier of the active transaction; replaced on every reset.
    transaction_id: String,

    /// The in-progress cart.
    cart: Cart,

    /// Derived totals, recomputed with every cart mutation.
    totals: Totals,

    /// Lifecycle phase of the transaction.
    phase: TransactionPhase,

    /// Candidates of an unanswered ambiguous search, if any.
    pending: Vec<CatalogEntry>,
}

/// The transaction controller for one cashier session.
///
/// Owns the single active transaction. There is no ambient global state:
/// a second cashier session is simply a second `Register` with its own
/// catalog and gateway handles.
///
/// ## Thread Safety
/// The inner state sits behind a `Mutex` because resolution commands and
/// an outstanding settlement task can race. Critical sections are short;
/// the settlement result is awaited with the lock released and the phase
/// flag standing guard instead.
pub struct Register {
    catalog: Arc<dyn Catalog>,
    gateway: Arc<dyn SettlementGateway>,
    tax_rate: TaxRate,
    events: broadcast::Sender<RegisterEvent>,
    inner: Mutex<RegisterInner>,
}

impl Register {
    /// Creates a register over a catalog and a settlement gateway.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        gateway: Arc<dyn SettlementGateway>,
        config: &RegisterConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Register {
            catalog,
            gateway,
            tax_rate: config.tax_rate(),
            events,
            inner: Mutex::new(RegisterInner {
                transaction_id: Uuid::new_v4().to_string(),
                cart: Cart::new(),
                totals: Totals::zero(),
                phase: TransactionPhase::Empty,
                pending: Vec::new(),
            }),
        }
    }

    /// Creates a register settling through the simulated terminal.
    pub fn with_simulated_terminal(catalog: Arc<dyn Catalog>, config: &RegisterConfig) -> Self {
        let gateway = Arc::new(SimulatedTerminal::from_config(config));
        Register::new(catalog, gateway, config)
    }

    // -------------------------------------------------------------------------
    // Event stream
    // -------------------------------------------------------------------------

    /// Subscribes to the register's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<RegisterEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: RegisterEvent) {
        // A send error only means nobody is subscribed right now
        let _ = self.events.send(event);
    }

    fn cart_changed(inner: &RegisterInner) -> RegisterEvent {
        RegisterEvent::CartChanged {
            items: inner.cart.items.clone(),
            totals: inner.totals.snapshot(),
        }
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Resolves a scanned code by exact catalog key.
    ///
    /// A hit adds one unit to the cart (merging by product id) and emits
    /// `ItemAdded` + `CartChanged`. A miss emits `LookupFailed` and
    /// mutates nothing.
    pub fn resolve_by_exact_id(&self, id: &str) -> RegisterResult<Resolution> {
        let mut inner = self.lock();
        Self::guard_not_settling(&inner)?;

        match self.catalog.lookup_by_id(id) {
            Some(entry) => {
                self.add_entry(&mut inner, &entry)?;
                Ok(Resolution::Added {
                    product_name: entry.name,
                })
            }
            None => {
                debug!(id = %id, "product lookup miss");
                self.emit(RegisterEvent::LookupFailed {
                    query: id.to_string(),
                });
                Ok(Resolution::NotFound)
            }
        }
    }

    /// Resolves a free-text search term against product names.
    ///
    /// Zero matches emit `LookupFailed`; exactly one match behaves like
    /// the exact-id path; several matches park the ordered candidate list
    /// and emit `AmbiguousMatch`, leaving the cart untouched until
    /// [`Register::select_candidate`] answers.
    pub fn resolve_by_search(&self, term: &str) -> RegisterResult<Resolution> {
        let mut inner = self.lock();
        Self::guard_not_settling(&inner)?;

        let term = validate_search_term(term).map_err(CoreError::from)?;
        let matches = if term.is_empty() {
            Vec::new()
        } else {
            self.catalog.search_by_name(&term)
        };

        if matches.is_empty() {
            debug!(term = %term, "search produced no matches");
            self.emit(RegisterEvent::LookupFailed {
                query: term.clone(),
            });
            Ok(Resolution::NotFound)
        } else if matches.len() == 1 {
            let entry = matches[0].clone();
            self.add_entry(&mut inner, &entry)?;
            Ok(Resolution::Added {
                product_name: entry.name,
            })
        } else {
            debug!(term = %term, count = matches.len(), "search ambiguous; awaiting selection");
            inner.pending = matches.clone();
            self.emit(RegisterEvent::AmbiguousMatch {
                candidates: matches.clone(),
            });
            Ok(Resolution::NeedsSelection {
                candidates: matches,
            })
        }
    }

    /// Answers a pending ambiguous search with a candidate index.
    ///
    /// Returns the added product's name, or `None` when there is no
    /// pending selection or the index is out of range. The out-of-range
    /// case deliberately mutates nothing and surfaces no error; callers
    /// that want to harden this can treat `None` as one.
    pub fn select_candidate(&self, index: usize) -> RegisterResult<Option<String>> {
        let mut inner = self.lock();
        Self::guard_not_settling(&inner)?;

        let entry = match inner.pending.get(index) {
            Some(entry) => entry.clone(),
            None => {
                debug!(index, pending = inner.pending.len(), "selection ignored");
                return Ok(None);
            }
        };

        self.add_entry(&mut inner, &entry)?;
        Ok(Some(entry.name))
    }

    // -------------------------------------------------------------------------
    // Cart mutation
    // -------------------------------------------------------------------------

    /// Removes a whole line from the cart.
    ///
    /// Removing an absent id is a no-op returning `false`. An actual
    /// removal recomputes totals and emits `CartChanged`. The transaction
    /// stays `Accumulating` even if this empties the cart.
    pub fn remove_item(&self, product_id: &str) -> RegisterResult<bool> {
        let mut inner = self.lock();
        Self::guard_not_settling(&inner)?;

        let removed = inner.cart.remove_item(product_id);
        if removed {
            inner.totals = inner.cart.totals(self.tax_rate);
            debug!(product_id = %product_id, remaining = inner.cart.item_count(), "line removed");
            self.emit(Self::cart_changed(&inner));
        } else {
            debug!(product_id = %product_id, "remove for absent line; no-op");
        }
        Ok(removed)
    }

    /// Explicitly cancels the active transaction.
    ///
    /// The cart is cleared, a fresh transaction id is issued, and a
    /// `CartChanged` with zero totals is emitted.
    pub fn cancel(&self) -> RegisterResult<()> {
        let mut inner = self.lock();
        Self::guard_not_settling(&inner)?;

        info!(transaction_id = %inner.transaction_id, "transaction cancelled");
        self.reset(&mut inner);
        self.emit(Self::cart_changed(&inner));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Settlement
    // -------------------------------------------------------------------------

    /// Settles the active transaction with the given tender.
    ///
    /// ## Preconditions
    /// - The cart must be non-empty (`EmptyCart` otherwise)
    /// - No settlement may already be outstanding (`SettlementInFlight`)
    ///
    /// ## Behavior
    /// Cash validates synchronously: sufficient tender completes the
    /// transaction with change, short tender fails with the cart intact.
    /// Card and mobile flip the phase to `Settling`, hand the amount to
    /// the gateway, and await its result channel with the lock released;
    /// the phase flag keeps every mutation out in the meantime.
    ///
    /// On success the totals snapshot is captured, the cart is cleared
    /// for a fresh transaction, and `TransactionCompleted` plus an empty
    /// `CartChanged` are emitted. On any failure the cart is preserved
    /// unchanged for retry.
    pub async fn settle_payment(&self, tender: Tender) -> RegisterResult<SettlementSummary> {
        let (method, due) = {
            let mut inner = self.lock();

            if inner.phase == TransactionPhase::Settling {
                self.emit(RegisterEvent::PaymentFailed {
                    reason: RegisterError::SettlementInFlight.to_string(),
                });
                return Err(RegisterError::SettlementInFlight);
            }
            if inner.cart.is_empty() {
                self.emit(RegisterEvent::PaymentFailed {
                    reason: RegisterError::EmptyCart.to_string(),
                });
                return Err(RegisterError::EmptyCart);
            }

            let due = inner.totals.total_rounded();
            match tender {
                Tender::Cash { tendered_cents } => {
                    let tendered = Money::from_cents(tendered_cents);
                    if tendered < due {
                        let err = RegisterError::InsufficientTender {
                            required_cents: due.cents(),
                            tendered_cents,
                        };
                        warn!(due = %due, tendered = %tendered, "cash tender below amount due");
                        self.emit(RegisterEvent::PaymentFailed {
                            reason: err.to_string(),
                        });
                        return Err(err);
                    }
                    let change = tendered - due;
                    return Ok(self.complete(&mut inner, PaymentMethod::Cash, due, change, None));
                }
                Tender::Card | Tender::Mobile => {
                    inner.phase = TransactionPhase::Settling;
                    (tender.method(), due)
                }
            }
        };

        info!(?method, due = %due, "settlement started");
        let receiver = self.gateway.begin(method, due);
        let outcome = receiver.await.unwrap_or_else(|_| SettlementOutcome::Declined {
            reason: "settlement channel closed".to_string(),
        });

        let mut inner = self.lock();
        match outcome {
            SettlementOutcome::Approved { reference } => {
                Ok(self.complete(&mut inner, method, due, Money::zero(), Some(reference)))
            }
            SettlementOutcome::Declined { reason } => {
                inner.phase = TransactionPhase::Accumulating;
                warn!(reason = %reason, "settlement declined; cart preserved");
                self.emit(RegisterEvent::PaymentFailed {
                    reason: reason.clone(),
                });
                Err(RegisterError::SettlementFailed { reason })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Current cart lines, in display order.
    pub fn items(&self) -> Vec<LineItem> {
        self.lock().cart.items.clone()
    }

    /// Current derived totals (full precision).
    pub fn totals(&self) -> Totals {
        self.lock().totals
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lock().cart.is_empty()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> TransactionPhase {
        self.lock().phase
    }

    /// Identifier of the active transaction.
    pub fn transaction_id(&self) -> String {
        self.lock().transaction_id.clone()
    }

    /// Candidates of the pending ambiguous search, if any.
    pub fn pending_candidates(&self) -> Vec<CatalogEntry> {
        self.lock().pending.clone()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, RegisterInner> {
        self.inner.lock().expect("register mutex poisoned")
    }

    fn guard_not_settling(inner: &RegisterInner) -> RegisterResult<()> {
        if inner.phase == TransactionPhase::Settling {
            Err(RegisterError::SettlementInFlight)
        } else {
            Ok(())
        }
    }

    /// Adds one unit of a resolved entry, recomputes totals, and emits
    /// `ItemAdded` + `CartChanged`. Clears any pending selection: a new
    /// resolution supersedes an unanswered one.
    fn add_entry(&self, inner: &mut RegisterInner, entry: &CatalogEntry) -> RegisterResult<()> {
        inner.cart.add_item(entry)?;
        inner.totals = inner.cart.totals(self.tax_rate);
        inner.phase = TransactionPhase::Accumulating;
        inner.pending.clear();

        debug!(
            product_id = %entry.product_id,
            quantity = inner.cart.total_quantity(),
            "item added to cart"
        );
        self.emit(RegisterEvent::ItemAdded {
            product_name: entry.name.clone(),
        });
        self.emit(Self::cart_changed(inner));
        Ok(())
    }

    /// Finalizes a successful settlement: snapshots totals, emits
    /// `TransactionCompleted`, resets for a fresh transaction, and emits
    /// the empty `CartChanged`.
    fn complete(
        &self,
        inner: &mut RegisterInner,
        method: PaymentMethod,
        amount: Money,
        change: Money,
        reference: Option<String>,
    ) -> SettlementSummary {
        let summary = SettlementSummary {
            transaction_id: inner.transaction_id.clone(),
            method,
            amount_cents: amount.cents(),
            change_cents: change.cents(),
            totals: inner.totals.snapshot(),
        };

        info!(
            transaction_id = %summary.transaction_id,
            ?method,
            amount = %amount,
            change = %change,
            "transaction completed"
        );
        self.emit(RegisterEvent::TransactionCompleted {
            transaction_id: summary.transaction_id.clone(),
            final_totals: summary.totals.clone(),
            method,
            change_cents: change.cents(),
            reference,
            completed_at: Utc::now(),
        });

        self.reset(inner);
        self.emit(Self::cart_changed(inner));
        summary
    }

    /// Resets to a fresh, empty transaction.
    fn reset(&self, inner: &mut RegisterInner) {
        inner.cart.clear();
        inner.totals = Totals::zero();
        inner.phase = TransactionPhase::Empty;
        inner.pending.clear();
        inner.transaction_id = Uuid::new_v4().to_string();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use tokio::sync::oneshot;

    fn demo_catalog() -> Arc<InMemoryCatalog> {
        let mut catalog = InMemoryCatalog::new();
        catalog
            .insert(CatalogEntry::new("123456789", "Coffee Mug", 1299))
            .unwrap();
        catalog
            .insert(CatalogEntry::new("987654321", "T-Shirt", 2499))
            .unwrap();
        catalog
            .insert(CatalogEntry::new("456789123", "Notebook", 850))
            .unwrap();
        catalog
            .insert(CatalogEntry::new("789123456", "Pen", 299))
            .unwrap();
        catalog
            .insert(CatalogEntry::new("111222333", "Polo Shirt", 1999))
            .unwrap();
        Arc::new(catalog)
    }

    fn instant_register() -> Register {
        let config = RegisterConfig {
            card_delay_ms: 0,
            mobile_delay_ms: 0,
            ..RegisterConfig::default()
        };
        Register::with_simulated_terminal(demo_catalog(), &config)
    }

    fn drain(rx: &mut broadcast::Receiver<RegisterEvent>) -> Vec<RegisterEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Gateway whose verdicts are delivered by the test itself.
    #[derive(Default)]
    struct ManualGateway {
        pending: std::sync::Mutex<Vec<oneshot::Sender<SettlementOutcome>>>,
    }

    impl ManualGateway {
        fn release(&self, outcome: SettlementOutcome) {
            let tx = self
                .pending
                .lock()
                .unwrap()
                .pop()
                .expect("no settlement in flight");
            tx.send(outcome).unwrap();
        }

        fn drop_channel(&self) {
            drop(self.pending.lock().unwrap().pop().expect("no settlement in flight"));
        }
    }

    impl SettlementGateway for ManualGateway {
        fn begin(
            &self,
            _method: PaymentMethod,
            _amount: Money,
        ) -> oneshot::Receiver<SettlementOutcome> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push(tx);
            rx
        }
    }

    fn manual_register() -> (Arc<Register>, Arc<ManualGateway>) {
        let gateway = Arc::new(ManualGateway::default());
        let register = Arc::new(Register::new(
            demo_catalog(),
            gateway.clone(),
            &RegisterConfig::default(),
        ));
        (register, gateway)
    }

    async fn wait_for_settling(register: &Register) {
        while register.phase() != TransactionPhase::Settling {
            tokio::task::yield_now().await;
        }
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    #[test]
    fn scan_hit_adds_and_merges() {
        let register = instant_register();
        let mut events = register.subscribe();

        let first = register.resolve_by_exact_id("123456789").unwrap();
        assert_eq!(
            first,
            Resolution::Added {
                product_name: "Coffee Mug".to_string()
            }
        );

        register.resolve_by_exact_id("123456789").unwrap();

        let items = register.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(register.totals().subtotal.cents(), 2598);

        let emitted = drain(&mut events);
        assert!(matches!(emitted[0], RegisterEvent::ItemAdded { .. }));
        assert!(matches!(emitted[1], RegisterEvent::CartChanged { .. }));
        assert!(matches!(emitted[2], RegisterEvent::ItemAdded { .. }));
        assert!(matches!(emitted[3], RegisterEvent::CartChanged { .. }));
    }

    #[test]
    fn scan_miss_emits_lookup_failed() {
        let register = instant_register();
        let mut events = register.subscribe();

        let resolution = register.resolve_by_exact_id("000000000").unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert!(register.is_empty());

        let emitted = drain(&mut events);
        assert_eq!(
            emitted,
            vec![RegisterEvent::LookupFailed {
                query: "000000000".to_string()
            }]
        );
    }

    #[test]
    fn search_single_match_adds() {
        let register = instant_register();

        let resolution = register.resolve_by_search("note").unwrap();
        assert_eq!(
            resolution,
            Resolution::Added {
                product_name: "Notebook".to_string()
            }
        );
        assert_eq!(register.items()[0].product_id, "456789123");
    }

    #[test]
    fn search_zero_matches_is_miss() {
        let register = instant_register();
        let mut events = register.subscribe();

        assert_eq!(
            register.resolve_by_search("zebra").unwrap(),
            Resolution::NotFound
        );
        assert!(register.is_empty());
        assert!(matches!(
            drain(&mut events)[0],
            RegisterEvent::LookupFailed { .. }
        ));
    }

    #[test]
    fn ambiguous_search_waits_for_selection() {
        let register = instant_register();
        let mut events = register.subscribe();

        let resolution = register.resolve_by_search("shirt").unwrap();
        let candidates = match resolution {
            Resolution::NeedsSelection { candidates } => candidates,
            other => panic!("expected NeedsSelection, got {other:?}"),
        };
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "T-Shirt");
        assert_eq!(candidates[1].name, "Polo Shirt");

        // Nothing added until the selection resolves
        assert!(register.is_empty());
        assert!(matches!(
            drain(&mut events)[0],
            RegisterEvent::AmbiguousMatch { .. }
        ));

        let added = register.select_candidate(1).unwrap();
        assert_eq!(added.as_deref(), Some("Polo Shirt"));
        assert_eq!(register.items()[0].product_id, "111222333");
        assert!(register.pending_candidates().is_empty());
    }

    #[test]
    fn invalid_selection_is_ignored() {
        let register = instant_register();

        register.resolve_by_search("shirt").unwrap();
        assert_eq!(register.select_candidate(5).unwrap(), None);
        assert!(register.is_empty());

        // The pending list survives an out-of-range answer; a valid one
        // still resolves it
        assert_eq!(register.pending_candidates().len(), 2);
        assert_eq!(
            register.select_candidate(0).unwrap().as_deref(),
            Some("T-Shirt")
        );

        // With nothing pending anymore, any selection is a no-op
        assert_eq!(register.select_candidate(0).unwrap(), None);
        assert_eq!(register.items().len(), 1);
    }

    #[test]
    fn new_resolution_supersedes_pending_selection() {
        let register = instant_register();

        register.resolve_by_search("shirt").unwrap();
        register.resolve_by_exact_id("789123456").unwrap();

        // The scan answered nothing; it replaced the pending question
        assert_eq!(register.select_candidate(0).unwrap(), None);
        assert_eq!(register.items().len(), 1);
        assert_eq!(register.items()[0].name, "Pen");
    }

    // -------------------------------------------------------------------------
    // Cart mutation
    // -------------------------------------------------------------------------

    #[test]
    fn remove_recomputes_totals() {
        let register = instant_register();
        register.resolve_by_exact_id("123456789").unwrap();
        register.resolve_by_exact_id("456789123").unwrap();

        assert!(register.remove_item("123456789").unwrap());
        assert_eq!(register.items().len(), 1);
        assert_eq!(register.totals().subtotal.cents(), 850);

        // Absent id: no-op
        assert!(!register.remove_item("123456789").unwrap());
        assert_eq!(register.items().len(), 1);
    }

    #[test]
    fn phase_is_sticky_while_accumulating() {
        let register = instant_register();
        assert_eq!(register.phase(), TransactionPhase::Empty);

        register.resolve_by_exact_id("789123456").unwrap();
        assert_eq!(register.phase(), TransactionPhase::Accumulating);

        register.remove_item("789123456").unwrap();
        assert!(register.is_empty());
        // Empty again, but not a fresh transaction
        assert_eq!(register.phase(), TransactionPhase::Accumulating);
    }

    #[test]
    fn cancel_resets_to_fresh_transaction() {
        let register = instant_register();
        let before = register.transaction_id();

        register.resolve_by_exact_id("789123456").unwrap();
        register.cancel().unwrap();

        assert!(register.is_empty());
        assert_eq!(register.phase(), TransactionPhase::Empty);
        assert!(register.totals().is_zero());
        assert_ne!(register.transaction_id(), before);
    }

    // -------------------------------------------------------------------------
    // Cash settlement
    // -------------------------------------------------------------------------

    /// The full scenario: $12.99 × 2 + $8.50 → $34.48 / $2.93 / $37.41,
    /// cash $40.00 → change $2.59.
    #[tokio::test]
    async fn cash_settlement_success() {
        let register = instant_register();
        register.resolve_by_exact_id("123456789").unwrap();
        register.resolve_by_exact_id("123456789").unwrap();
        register.resolve_by_exact_id("456789123").unwrap();

        let snapshot = register.totals().snapshot();
        assert_eq!(snapshot.subtotal_cents, 3448);
        assert_eq!(snapshot.tax_cents, 293);
        assert_eq!(snapshot.total_cents, 3741);

        let before = register.transaction_id();
        let mut events = register.subscribe();

        let summary = register
            .settle_payment(Tender::Cash {
                tendered_cents: 4000,
            })
            .await
            .unwrap();

        assert_eq!(summary.method, PaymentMethod::Cash);
        assert_eq!(summary.amount_cents, 3741);
        assert_eq!(summary.change_cents, 259);
        assert_eq!(summary.totals.total_cents, 3741);
        assert_eq!(summary.transaction_id, before);

        // Fresh transaction afterwards
        assert!(register.is_empty());
        assert!(register.totals().is_zero());
        assert_eq!(register.phase(), TransactionPhase::Empty);
        assert_ne!(register.transaction_id(), before);

        let emitted = drain(&mut events);
        match &emitted[0] {
            RegisterEvent::TransactionCompleted {
                final_totals,
                change_cents,
                method,
                ..
            } => {
                assert_eq!(final_totals.total_cents, 3741);
                assert_eq!(*change_cents, 259);
                assert_eq!(*method, PaymentMethod::Cash);
            }
            other => panic!("expected TransactionCompleted, got {other:?}"),
        }
        match &emitted[1] {
            RegisterEvent::CartChanged { items, totals } => {
                assert!(items.is_empty());
                assert_eq!(totals, &TotalsSnapshot::zero());
            }
            other => panic!("expected CartChanged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn insufficient_cash_preserves_cart() {
        let register = instant_register();
        register.resolve_by_exact_id("123456789").unwrap();
        register.resolve_by_exact_id("123456789").unwrap();
        register.resolve_by_exact_id("456789123").unwrap();
        let mut events = register.subscribe();

        let err = register
            .settle_payment(Tender::Cash {
                tendered_cents: 3000,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegisterError::InsufficientTender {
                required_cents: 3741,
                tendered_cents: 3000,
            }
        ));

        // Both lines still present, totals unchanged, still retryable
        assert_eq!(register.items().len(), 2);
        assert_eq!(register.totals().snapshot().total_cents, 3741);
        assert_eq!(register.phase(), TransactionPhase::Accumulating);
        assert!(matches!(
            drain(&mut events)[0],
            RegisterEvent::PaymentFailed { .. }
        ));
    }

    #[tokio::test]
    async fn settling_empty_cart_fails() {
        let register = instant_register();
        let mut events = register.subscribe();

        let err = register.settle_payment(Tender::Card).await.unwrap_err();
        assert!(matches!(err, RegisterError::EmptyCart));
        assert!(matches!(
            drain(&mut events)[0],
            RegisterEvent::PaymentFailed { .. }
        ));
    }

    // -------------------------------------------------------------------------
    // Async settlement
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn card_and_mobile_settlements_complete() {
        for tender in [Tender::Card, Tender::Mobile] {
            let register = instant_register();
            register.resolve_by_exact_id("789123456").unwrap();

            let summary = register.settle_payment(tender).await.unwrap();
            assert_eq!(summary.method, tender.method());
            assert_eq!(summary.change_cents, 0);
            // $2.99 + 8.5% = $3.2442 → $3.24
            assert_eq!(summary.amount_cents, 324);

            assert!(register.is_empty());
            assert_eq!(register.phase(), TransactionPhase::Empty);
        }
    }

    #[tokio::test]
    async fn outstanding_settlement_blocks_everything() {
        let (register, gateway) = manual_register();
        register.resolve_by_exact_id("123456789").unwrap();

        let task = tokio::spawn({
            let register = register.clone();
            async move { register.settle_payment(Tender::Card).await }
        });
        wait_for_settling(&register).await;

        assert!(matches!(
            register.resolve_by_exact_id("456789123"),
            Err(RegisterError::SettlementInFlight)
        ));
        assert!(matches!(
            register.resolve_by_search("pen"),
            Err(RegisterError::SettlementInFlight)
        ));
        assert!(matches!(
            register.remove_item("123456789"),
            Err(RegisterError::SettlementInFlight)
        ));
        assert!(matches!(
            register.cancel(),
            Err(RegisterError::SettlementInFlight)
        ));
        assert!(matches!(
            register
                .settle_payment(Tender::Cash {
                    tendered_cents: 999_999
                })
                .await,
            Err(RegisterError::SettlementInFlight)
        ));

        gateway.release(SettlementOutcome::Approved {
            reference: "AUTH-1".to_string(),
        });

        let summary = task.await.unwrap().unwrap();
        assert_eq!(summary.method, PaymentMethod::Card);
        assert!(register.is_empty());
        assert_eq!(register.phase(), TransactionPhase::Empty);
    }

    #[tokio::test]
    async fn declined_settlement_preserves_cart() {
        let (register, gateway) = manual_register();
        register.resolve_by_exact_id("123456789").unwrap();
        let mut events = register.subscribe();

        let task = tokio::spawn({
            let register = register.clone();
            async move { register.settle_payment(Tender::Mobile).await }
        });
        wait_for_settling(&register).await;

        gateway.release(SettlementOutcome::Declined {
            reason: "card declined".to_string(),
        });

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, RegisterError::SettlementFailed { .. }));

        // Cart untouched, back to accumulating, retry possible
        assert_eq!(register.items().len(), 1);
        assert_eq!(register.phase(), TransactionPhase::Accumulating);
        assert!(matches!(
            drain(&mut events)[0],
            RegisterEvent::PaymentFailed { .. }
        ));

        let summary = register
            .settle_payment(Tender::Cash {
                tendered_cents: 2000,
            })
            .await
            .unwrap();
        assert_eq!(summary.method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn dropped_result_channel_is_a_failure() {
        let (register, gateway) = manual_register();
        register.resolve_by_exact_id("456789123").unwrap();

        let task = tokio::spawn({
            let register = register.clone();
            async move { register.settle_payment(Tender::Card).await }
        });
        wait_for_settling(&register).await;

        gateway.drop_channel();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, RegisterError::SettlementFailed { .. }));
        assert_eq!(register.items().len(), 1);
        assert_eq!(register.phase(), TransactionPhase::Accumulating);
    }
}
