//! # Closing Session
//!
//! Owns the draft closing record and runs the deterministic recompute
//! pipeline after every committed mutation.
//!
//! ## Recompute Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Closing Session Data Flow                               │
//! │                                                                         │
//! │  operator mutation (count, withdrawal pin, payment figure, target)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CashLedger ──► WithdrawalPlan ──► VarianceReport ──► draft signature   │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                                          SignatureTracker (save gate)   │
//! │                                                                         │
//! │  The pipeline is invoked explicitly and in this order after every       │
//! │  committed mutation. No hidden intermediate state exists: each stage    │
//! │  is recomputed from scratch out of locally-held values.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Async Boundary
//! Loading and saving are the only suspension points. Both retry exactly
//! once after a short fixed delay on a transient failure; a second failure
//! surfaces to the operator with the draft untouched. A save either fully
//! succeeds (server signature updated, dirty cleared) or fully fails
//! (tracker untouched), so the UI can never report "saved" when it was
//! not. Load results carry an epoch ticket and are dropped when the
//! session was reset while the read was in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use tally_core::{
    canonical_signature, planner, Amount, CashLedger, ClosingRecord, DenominationTable,
    NetCashInputs, RecordHeader, VarianceReport, WithdrawalPlan,
};
use tally_db::generate_record_id;
use tally_sync::ConfigBroadcast;

use crate::config::SessionConfig;
use crate::dirty::SignatureTracker;
use crate::error::{SessionError, SessionResult};
use crate::resolver::FloatTargetResolver;
use crate::store::ClosingStore;

// =============================================================================
// Load Ticket
// =============================================================================

/// Identity of an in-flight load: which session epoch asked, and for what
/// key. A result whose ticket no longer matches the session is stale and
/// is dropped instead of applied.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    epoch: u64,
    branch_id: String,
    business_date: NaiveDate,
}

// =============================================================================
// Closing Session
// =============================================================================

/// The editable state of one cashier-closing record.
pub struct ClosingSession {
    config: SessionConfig,
    header: RecordHeader,
    inputs: NetCashInputs,
    ledger: CashLedger,
    plan: WithdrawalPlan,
    resolver: FloatTargetResolver,
    tracker: SignatureTracker,
    variance: VarianceReport,
    draft_signature: String,
    /// Bumped on every reset; stale async results check against it.
    epoch: u64,
}

impl ClosingSession {
    /// Creates a fresh draft for a branch and business date.
    ///
    /// Pass an empty `branch_id` when no branch is selected yet; saving
    /// is blocked until one is.
    pub fn new(
        table: Arc<DenominationTable>,
        config: SessionConfig,
        branch_id: impl Into<String>,
        business_date: NaiveDate,
    ) -> Self {
        let ledger = CashLedger::new(Arc::clone(&table));
        let plan = WithdrawalPlan::empty(table);
        let resolver = FloatTargetResolver::new(config.default_float_target);
        let inputs = NetCashInputs::default();
        let variance =
            VarianceReport::compute(inputs.net_cash(), resolver.resolve(), ledger.total());

        let mut session = ClosingSession {
            config,
            header: RecordHeader::new(generate_record_id(), branch_id, business_date),
            inputs,
            ledger,
            plan,
            resolver,
            tracker: SignatureTracker::new(),
            variance,
            draft_signature: String::new(),
            epoch: 0,
        };
        session.recompute();
        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn ledger(&self) -> &CashLedger {
        &self.ledger
    }

    pub fn plan(&self) -> &WithdrawalPlan {
        &self.plan
    }

    pub fn inputs(&self) -> &NetCashInputs {
        &self.inputs
    }

    /// The latest variance summary.
    pub fn variance(&self) -> &VarianceReport {
        &self.variance
    }

    /// The effective float target for this session.
    pub fn resolved_float_target(&self) -> Amount {
        self.resolver.resolve()
    }

    /// True iff the draft differs from the last persisted/loaded snapshot
    /// (outside the quiet windows around load and save).
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty(&self.draft_signature)
    }

    /// Current session epoch. Bumped by [`ClosingSession::reset`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Snapshot of the draft in its persisted shape.
    pub fn draft_record(&self) -> ClosingRecord {
        ClosingRecord {
            header: self.header.clone(),
            inputs: self.inputs,
            float_target_at_save: self.resolver.resolve(),
            cash_counts: self.ledger.counts_by_id(),
            withdrawal_plan: self.plan.takes_by_id(),
        }
    }

    // =========================================================================
    // Mutations (each ends with the explicit recompute pipeline)
    // =========================================================================

    /// Commits a physical count for the denomination at `index`.
    ///
    /// The plan re-solves with every pinned row honored: an unrelated
    /// count change never moves an operator-pinned withdrawal.
    pub fn set_count(&mut self, index: usize, count: i64) {
        self.ledger.set_count(index, count);
        self.plan =
            planner::resuggest_keeping_pins(&self.ledger, self.resolver.resolve(), &self.plan);
        self.recompute();
    }

    /// Pins the withdrawal count for the denomination at `index`.
    ///
    /// Rows above keep their pins, rows below are re-suggested fresh;
    /// see `tally_core::planner` for the ordering rules.
    pub fn edit_withdrawal(&mut self, index: usize, requested: i64) {
        self.plan = planner::recompute_with_override(
            &self.ledger,
            self.resolver.resolve(),
            &self.plan,
            index,
            requested,
        );
        self.recompute();
    }

    /// Clears all counts, the plan, and every pinned row.
    pub fn clear_counts(&mut self) {
        self.ledger.clear();
        self.plan.clear();
        self.recompute();
    }

    /// Explicitly requests a fresh suggestion pass, dropping all pins.
    pub fn request_suggestion(&mut self) {
        self.plan = planner::suggest(&self.ledger, self.resolver.resolve());
        self.recompute();
    }

    /// Replaces the payment/adjustment figures from the revenue forms.
    pub fn set_inputs(&mut self, inputs: NetCashInputs) {
        self.inputs = inputs;
        self.recompute();
    }

    /// Sets the operator note.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.header.notes = notes;
        self.recompute();
    }

    /// Sets the cashier being reconciled.
    pub fn set_cashier(&mut self, cashier_id: Option<String>) {
        self.header.cashier_id = cashier_id;
        self.recompute();
    }

    /// Pushes a session-local float-target override from the settings
    /// screen; the plan re-solves against the new target.
    pub fn set_session_float_target(&mut self, value: i64) {
        self.resolver.set_session_override(value);
        self.replan_keeping_pins();
    }

    /// Adopts the branch's persisted float-target configuration.
    pub fn apply_branch_config(&mut self, value: Option<i64>) {
        self.resolver.set_branch_config(value);
        self.replan_keeping_pins();
    }

    /// Handles a cross-session configuration broadcast. Messages for
    /// other branches are ignored; duplicates are harmless.
    pub fn on_broadcast(&mut self, message: &ConfigBroadcast) {
        match message {
            ConfigBroadcast::FloatTargetChanged(change) => {
                if change.branch_id == self.header.branch_id {
                    debug!(value = change.value, "Adopting broadcast float target");
                    self.apply_branch_config(Some(change.value));
                }
            }
        }
    }

    /// Discards the draft and starts over for a (possibly different)
    /// branch and date. In-flight async results from before the reset
    /// will be dropped by their ticket check.
    pub fn reset(&mut self, branch_id: impl Into<String>, business_date: NaiveDate) {
        self.epoch += 1;
        self.header = RecordHeader::new(generate_record_id(), branch_id, business_date);
        self.inputs = NetCashInputs::default();
        self.ledger.clear();
        self.plan.clear();
        self.resolver.set_record_value(None);
        self.tracker = SignatureTracker::new();
        self.recompute();
    }

    // =========================================================================
    // The Async Boundary
    // =========================================================================

    /// Ticket for a load of the current key at the current epoch.
    pub fn load_ticket(&self) -> LoadTicket {
        LoadTicket {
            epoch: self.epoch,
            branch_id: self.header.branch_id.clone(),
            business_date: self.header.business_date,
        }
    }

    /// Reads the persisted record for a ticket, retrying once on a
    /// transient failure. Does not touch the session: pair with
    /// [`ClosingSession::apply_loaded`].
    pub async fn fetch<S: ClosingStore>(
        store: &S,
        ticket: &LoadTicket,
        retry_delay: Duration,
    ) -> SessionResult<Option<ClosingRecord>> {
        if ticket.branch_id.is_empty() {
            return Ok(None);
        }
        match store.load(&ticket.branch_id, ticket.business_date).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Load failed, retrying once after fixed delay");
                sleep(retry_delay).await;
                Ok(store.load(&ticket.branch_id, ticket.business_date).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a fetched result, unless the session moved on while the
    /// read was in flight.
    ///
    /// Returns true when an existing record was applied. A `None` result
    /// still (re)establishes the fresh draft as the server baseline.
    pub fn apply_loaded(&mut self, ticket: &LoadTicket, loaded: Option<ClosingRecord>) -> bool {
        if ticket.epoch != self.epoch {
            debug!(
                ticket_epoch = ticket.epoch,
                session_epoch = self.epoch,
                "Stale load result dropped"
            );
            return false;
        }

        match loaded {
            Some(record) => {
                info!(id = %record.header.id, "Applying loaded closing record");
                self.header = record.header.clone();
                self.inputs = record.inputs;
                self.ledger.load_counts(&record.cash_counts);
                self.plan = WithdrawalPlan::from_takes(&self.ledger, &record.withdrawal_plan);
                self.resolver
                    .set_record_value(Some(record.float_target_at_save.units()));
                self.recompute();
                self.tracker
                    .mark_loaded(self.draft_signature.clone(), self.config.cold_start_grace);
                true
            }
            None => {
                self.tracker
                    .mark_loaded(self.draft_signature.clone(), self.config.cold_start_grace);
                false
            }
        }
    }

    /// Fetches and applies the persisted record for the current key.
    pub async fn load<S: ClosingStore>(&mut self, store: &S) -> SessionResult<bool> {
        let ticket = self.load_ticket();
        let loaded = Self::fetch(store, &ticket, self.config.retry_delay).await?;
        Ok(self.apply_loaded(&ticket, loaded))
    }

    /// Reloads from the server. Refused while dirty unless `force` is
    /// set (switching from live auto-sync back to saved mode always
    /// forces, discarding live-only derived values).
    pub async fn reload<S: ClosingStore>(
        &mut self,
        store: &S,
        force: bool,
    ) -> SessionResult<bool> {
        if !self.tracker.can_reload(&self.draft_signature, force) {
            return Err(SessionError::ReloadRefused);
        }
        self.load(store).await
    }

    /// Persists the draft.
    ///
    /// Blocked without a branch. A transient failure is retried exactly
    /// once after the configured delay; a second failure (or any
    /// non-transient one, such as a conflicting concurrent record)
    /// surfaces with the draft and tracker untouched. On success the
    /// server signature updates atomically and the record reads clean.
    pub async fn save<S: ClosingStore>(&mut self, store: &S) -> SessionResult<()> {
        if self.header.branch_id.is_empty() {
            return Err(SessionError::NoBranchSelected);
        }

        let record = self.draft_record();
        let signature = canonical_signature(&record);

        match store.save(&record).await {
            Ok(()) => {}
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Save failed, retrying once after fixed delay");
                sleep(self.config.retry_delay).await;
                store.save(&record).await?;
            }
            Err(e) => return Err(e.into()),
        }

        self.tracker
            .mark_saved(signature, self.config.post_save_silence);
        info!(
            id = %record.header.id,
            branch_id = %record.header.branch_id,
            "Closing record saved"
        );
        Ok(())
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Re-solves the plan against the current target, honoring pins, then
    /// runs the tail of the pipeline.
    fn replan_keeping_pins(&mut self) {
        self.plan =
            planner::resuggest_keeping_pins(&self.ledger, self.resolver.resolve(), &self.plan);
        self.recompute();
    }

    /// The tail of the pipeline: variance, then the draft signature.
    fn recompute(&mut self) {
        self.variance = VarianceReport::compute(
            self.inputs.net_cash(),
            self.resolver.resolve(),
            self.ledger.total(),
        );
        self.draft_signature = canonical_signature(&self.draft_record());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
