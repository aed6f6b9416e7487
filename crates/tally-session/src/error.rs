//! Session error types.
//!
//! All failures surface here as a single human-readable message for the
//! operator. The pure computation layers below never fail; errors only
//! arise at the save/load boundary and from the two explicit gates
//! (missing branch, refused reload).

use thiserror::Error;

use tally_db::DbError;

/// Closing-session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Saving requires a branch; this is the only condition that blocks
    /// a save attempt outright.
    #[error("Select a branch before saving the closing record")]
    NoBranchSelected,

    /// The draft has unsaved changes and the reload was not forced.
    #[error("Unsaved changes present; reload refused")]
    ReloadRefused,

    /// A storage failure that survived the single automatic retry, or a
    /// non-retryable one (duplicate record, corrupt row). The in-memory
    /// draft is left untouched.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
