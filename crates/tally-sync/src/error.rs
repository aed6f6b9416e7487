//! Error types for the propagation layer.
//!
//! Propagation is best-effort: these errors are logged at the boundary
//! where they occur and never affect a session's local state.

use thiserror::Error;

use tally_db::DbError;

/// Propagation errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading the change marker or configuration row failed.
    #[error("Settings read failed: {0}")]
    Db(#[from] DbError),

    /// A channel endpoint was dropped.
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

/// Result type for propagation operations.
pub type SyncResult<T> = Result<T, SyncError>;
