//! # tally-core: Pure Business Logic for the Cashier-Closing Suite
//!
//! This crate is the **heart** of the cash-drawer reconciliation engine.
//! It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Cashier-Closing Data Flow                              │
//! │                                                                         │
//! │  Operator input (counts, pinned withdrawals, payment figures)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  CashLedger ──► FloatAllocation ──► Variance ──► Signature     │   │
//! │  │  (counts)       (withdrawal plan)   (over/short)  (dirty gate)  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tally-session (recompute pipeline) / tally-db (persistence)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Amount` type with whole-unit integer arithmetic
//! - [`denomination`] - The fixed, ordered denomination table
//! - [`ledger`] - Physical drawer counts per denomination
//! - [`planner`] - Float-withdrawal allocation and override re-solve
//! - [`variance`] - Expected-vs-counted cash variance
//! - [`signature`] - Canonical record signature for dirty tracking
//! - [`types`] - Closing record shapes shared with persistence
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole currency units (i64)
//! 4. **Clamp, Don't Fail**: Operator numeric entry is clamped, never rejected

// =============================================================================
// Module Declarations
// =============================================================================

pub mod denomination;
pub mod error;
pub mod ledger;
pub mod money;
pub mod planner;
pub mod signature;
pub mod types;
pub mod variance;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Amount` instead of
// `use tally_core::money::Amount`

pub use denomination::{Denomination, DenominationTable};
pub use error::{CoreError, CoreResult};
pub use ledger::CashLedger;
pub use money::Amount;
pub use planner::WithdrawalPlan;
pub use signature::canonical_signature;
pub use types::{ClosingRecord, NetCashInputs, RecordHeader};
pub use variance::VarianceReport;
