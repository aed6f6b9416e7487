//! # Signature Tracker
//!
//! Compares the draft record's canonical signature against the last-known
//! server signature to decide whether unsaved changes exist, and gates
//! reload/save behavior on the answer.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dirty Tracking Windows                               │
//! │                                                                         │
//! │  load ──► mark_loaded(sig)                                             │
//! │             server := sig, quiet for cold_start_grace                   │
//! │             (derived fields settle without flagging dirty)              │
//! │                                                                         │
//! │  save ──► mark_saved(sig)      only on confirmed success               │
//! │             server := sig, quiet for post_save_silence                  │
//! │             (the written data echoing back stays quiet)                 │
//! │                                                                         │
//! │  failed save ──► tracker untouched: the UI can never report            │
//! │                  "saved" when it was not                                │
//! │                                                                         │
//! │  is_dirty(draft) = signatures differ AND outside any quiet window      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

/// Tracks the server signature and the quiet windows around load/save.
#[derive(Debug, Clone)]
pub struct SignatureTracker {
    /// Signature of the last persisted or loaded snapshot. None before
    /// the first load.
    server_signature: Option<String>,

    /// Dirty notifications are suppressed until this instant.
    quiet_until: Option<Instant>,
}

impl SignatureTracker {
    /// Creates a tracker with no server snapshot known.
    pub fn new() -> Self {
        SignatureTracker {
            server_signature: None,
            quiet_until: None,
        }
    }

    /// Adopts the signature of a freshly loaded snapshot and opens the
    /// cold-start grace window.
    pub fn mark_loaded(&mut self, signature: String, grace: Duration) {
        self.server_signature = Some(signature);
        self.quiet_until = Some(Instant::now() + grace);
    }

    /// Adopts the signature of a successfully saved snapshot and opens
    /// the post-save silence window.
    ///
    /// Callers invoke this only after the write is confirmed; a failed
    /// save leaves the tracker untouched.
    pub fn mark_saved(&mut self, signature: String, silence: Duration) {
        debug!("Server signature updated after save");
        self.server_signature = Some(signature);
        self.quiet_until = Some(Instant::now() + silence);
    }

    /// True iff the draft differs from the server snapshot, outside any
    /// quiet window.
    ///
    /// Before the first load there is nothing to clobber, so a fresh
    /// draft is not dirty.
    pub fn is_dirty(&self, draft_signature: &str) -> bool {
        if let Some(until) = self.quiet_until {
            if Instant::now() < until {
                return false;
            }
        }
        match &self.server_signature {
            Some(server) => server != draft_signature,
            None => false,
        }
    }

    /// Whether a reload may proceed: refused while dirty unless forced.
    pub fn can_reload(&self, draft_signature: &str, force: bool) -> bool {
        force || !self.is_dirty(draft_signature)
    }

    /// Last-known server signature, if any snapshot was loaded or saved.
    pub fn server_signature(&self) -> Option<&str> {
        self.server_signature.as_deref()
    }
}

impl Default for SignatureTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tracker_is_clean() {
        let tracker = SignatureTracker::new();
        assert!(!tracker.is_dirty("anything"));
    }

    #[test]
    fn test_dirty_iff_signatures_differ() {
        let mut tracker = SignatureTracker::new();
        tracker.mark_loaded("sig-a".to_string(), Duration::ZERO);

        assert!(!tracker.is_dirty("sig-a"));
        assert!(tracker.is_dirty("sig-b"));
    }

    #[test]
    fn test_save_updates_server_signature() {
        let mut tracker = SignatureTracker::new();
        tracker.mark_loaded("sig-a".to_string(), Duration::ZERO);
        assert!(tracker.is_dirty("sig-b"));

        tracker.mark_saved("sig-b".to_string(), Duration::ZERO);
        assert!(!tracker.is_dirty("sig-b"));
        assert!(tracker.is_dirty("sig-a"));
    }

    #[test]
    fn test_cold_start_grace_suppresses_dirty() {
        let mut tracker = SignatureTracker::new();
        tracker.mark_loaded("sig-a".to_string(), Duration::from_millis(50));

        // Inside the window a differing draft stays quiet.
        assert!(!tracker.is_dirty("sig-b"));

        std::thread::sleep(Duration::from_millis(70));
        assert!(tracker.is_dirty("sig-b"));
    }

    #[test]
    fn test_post_save_silence_suppresses_echo() {
        let mut tracker = SignatureTracker::new();
        tracker.mark_loaded("sig-a".to_string(), Duration::ZERO);
        tracker.mark_saved("sig-b".to_string(), Duration::from_millis(50));

        // Residual recomputation echoing back right after the save does
        // not flip the record dirty.
        assert!(!tracker.is_dirty("sig-echo"));

        std::thread::sleep(Duration::from_millis(70));
        assert!(tracker.is_dirty("sig-echo"));
    }

    #[test]
    fn test_reload_gating() {
        let mut tracker = SignatureTracker::new();
        tracker.mark_loaded("sig-a".to_string(), Duration::ZERO);

        assert!(tracker.can_reload("sig-a", false));
        assert!(!tracker.can_reload("sig-b", false));
        // Switching live → saved mode always forces.
        assert!(tracker.can_reload("sig-b", true));
    }
}
