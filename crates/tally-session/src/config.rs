//! # Session Configuration
//!
//! Tunables for the closing-session state machine.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Defaults (this file)
//!
//! All durations are deliberately short: they exist to absorb derived
//! fields settling asynchronously around load/save, not to hide real
//! changes.

use std::time::Duration;

use tracing::warn;

/// Hard-coded fallback float target, used only when no session override,
/// branch configuration, or loaded record supplies one.
pub const DEFAULT_FLOAT_TARGET: i64 = 0;

/// Tunables for [`crate::session::ClosingSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lowest-precedence float target (see the resolver).
    /// Default: 0 (withdraw everything unless configured otherwise)
    pub default_float_target: i64,

    /// Dirty notifications are suppressed for this long after a load,
    /// while derived fields settle.
    /// Default: 1.5 seconds
    pub cold_start_grace: Duration,

    /// Dirty notifications are suppressed for this long after a save,
    /// while the just-written data echoes back.
    /// Default: 1 second
    pub post_save_silence: Duration,

    /// Fixed delay before the single automatic retry of a failed
    /// load/save.
    /// Default: 400 milliseconds
    pub retry_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_float_target: DEFAULT_FLOAT_TARGET,
            cold_start_grace: Duration::from_millis(1_500),
            post_save_silence: Duration::from_millis(1_000),
            retry_delay: Duration::from_millis(400),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_DEFAULT_FLOAT_TARGET`: fallback float target (whole units)
    /// - `TALLY_COLD_START_GRACE_MS`: grace window after load
    /// - `TALLY_POST_SAVE_SILENCE_MS`: silence window after save
    /// - `TALLY_RETRY_DELAY_MS`: delay before the automatic retry
    pub fn from_env() -> Self {
        let mut config = SessionConfig::default();

        if let Some(v) = env_i64("TALLY_DEFAULT_FLOAT_TARGET") {
            config.default_float_target = v.max(0);
        }
        if let Some(ms) = env_i64("TALLY_COLD_START_GRACE_MS") {
            config.cold_start_grace = Duration::from_millis(ms.max(0) as u64);
        }
        if let Some(ms) = env_i64("TALLY_POST_SAVE_SILENCE_MS") {
            config.post_save_silence = Duration::from_millis(ms.max(0) as u64);
        }
        if let Some(ms) = env_i64("TALLY_RETRY_DELAY_MS") {
            config.retry_delay = Duration::from_millis(ms.max(0) as u64);
        }

        config
    }

    /// All windows and delays zeroed. Makes the dirty state a pure
    /// signature comparison; intended for tests.
    pub fn immediate() -> Self {
        SessionConfig {
            default_float_target: DEFAULT_FLOAT_TARGET,
            cold_start_grace: Duration::ZERO,
            post_save_silence: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }
}

fn env_i64(name: &str) -> Option<i64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(name, raw, "Ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.default_float_target, 0);
        assert_eq!(config.retry_delay, Duration::from_millis(400));
    }

    #[test]
    fn test_immediate_zeroes_windows() {
        let config = SessionConfig::immediate();
        assert_eq!(config.cold_start_grace, Duration::ZERO);
        assert_eq!(config.post_save_silence, Duration::ZERO);
        assert_eq!(config.retry_delay, Duration::ZERO);
    }
}
