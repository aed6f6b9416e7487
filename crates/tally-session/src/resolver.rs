//! # Float Target Resolver
//!
//! Resolves one authoritative float target from competing sources.
//!
//! ## Resolution Precedence (first present wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Float Target Resolution                                │
//! │                                                                         │
//! │  1. Session override     pushed by the configuration screen during     │
//! │                          this session; lets the operator see a new     │
//! │                          target instantly without reloading            │
//! │                                                                         │
//! │  2. Branch configuration the persisted per-branch value                 │
//! │                                                                         │
//! │  3. Loaded record        the target stored inside the record being     │
//! │                          edited; only set once a record has loaded,    │
//! │                          so a fresh draft never adopts a stale value   │
//! │                          before the branch configuration is known      │
//! │                                                                         │
//! │  4. System default       hard-coded fallback                            │
//! │                                                                         │
//! │  Override hygiene: the moment the override equals the branch           │
//! │  configuration it is cleared, so the persisted value is the source     │
//! │  of truth again and a held override can never mask later changes.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::Amount;
use tracing::debug;

/// Which source produced the resolved value. Useful for logs and the
/// settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatTargetSource {
    SessionOverride,
    BranchConfig,
    LoadedRecord,
    Default,
}

/// Resolves the effective float target for one session.
#[derive(Debug, Clone)]
pub struct FloatTargetResolver {
    session_override: Option<i64>,
    branch_config: Option<i64>,
    record_value: Option<i64>,
    default_value: i64,
}

impl FloatTargetResolver {
    /// Creates a resolver with only the hard-coded default populated.
    pub fn new(default_value: i64) -> Self {
        FloatTargetResolver {
            session_override: None,
            branch_config: None,
            record_value: None,
            default_value: default_value.max(0),
        }
    }

    /// The resolved float target.
    pub fn resolve(&self) -> Amount {
        Amount::from_units(
            self.session_override
                .or(self.branch_config)
                .or(self.record_value)
                .unwrap_or(self.default_value),
        )
    }

    /// Which source currently wins.
    pub fn source(&self) -> FloatTargetSource {
        if self.session_override.is_some() {
            FloatTargetSource::SessionOverride
        } else if self.branch_config.is_some() {
            FloatTargetSource::BranchConfig
        } else if self.record_value.is_some() {
            FloatTargetSource::LoadedRecord
        } else {
            FloatTargetSource::Default
        }
    }

    /// Pushes a session-local override from the configuration screen.
    ///
    /// Negative input clamps to 0. An override equal to the branch
    /// configuration collapses into it immediately.
    pub fn set_session_override(&mut self, value: i64) {
        self.session_override = Some(value.max(0));
        self.collapse_override();
    }

    /// Drops the session override, falling back to the persisted sources.
    pub fn clear_session_override(&mut self) {
        self.session_override = None;
    }

    /// Adopts a branch configuration value (or its absence).
    pub fn set_branch_config(&mut self, value: Option<i64>) {
        self.branch_config = value.map(|v| v.max(0));
        self.collapse_override();
    }

    /// Adopts the float target stored in a loaded record, or clears it on
    /// record reset.
    pub fn set_record_value(&mut self, value: Option<i64>) {
        self.record_value = value.map(|v| v.max(0));
    }

    /// Clears the override once it matches the persisted configuration.
    fn collapse_override(&mut self) {
        if self.session_override.is_some() && self.session_override == self.branch_config {
            debug!("Session float-target override matches branch config; clearing");
            self.session_override = None;
        }
    }
}
