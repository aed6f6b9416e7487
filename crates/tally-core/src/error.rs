//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Where Errors Can (and Cannot) Occur
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Surface                                   │
//! │                                                                         │
//! │  CAN fail:                                                              │
//! │  └── DenominationTable construction (bad configuration)                 │
//! │                                                                         │
//! │  CANNOT fail (inputs are clamped, never rejected):                      │
//! │  ├── CashLedger mutation                                                │
//! │  ├── Withdrawal-plan allocation and override re-solve                   │
//! │  ├── Variance computation                                               │
//! │  └── Record signatures                                                  │
//! │                                                                         │
//! │  Flow: CoreError → DbError → SessionError → operator message            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Out-of-range numeric entry during counting is a deliberate non-error:
//! it is silently clamped so fast keyboard entry is never interrupted.

use thiserror::Error;

/// Core business logic errors.
///
/// These only arise from invalid denomination configuration, which is
/// fixed at deployment time. The counting/allocation pipeline itself is
/// total: it clamps instead of failing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The denomination table was configured with no entries.
    #[error("Denomination table must not be empty")]
    EmptyDenominationTable,

    /// A denomination was configured with a zero or negative face value.
    #[error("Denomination '{id}' has non-positive face value {face_value}")]
    NonPositiveFaceValue { id: String, face_value: i64 },

    /// The table is not strictly descending by face value.
    ///
    /// The allocation algorithm walks the table largest-to-smallest and
    /// relies on this ordering; an unsorted table is a configuration bug.
    #[error("Denomination table must be strictly descending: '{id}' ({face_value}) follows {previous}")]
    NotDescending {
        id: String,
        face_value: i64,
        previous: i64,
    },

    /// Two denominations share the same identifier.
    #[error("Duplicate denomination id '{id}'")]
    DuplicateDenominationId { id: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
