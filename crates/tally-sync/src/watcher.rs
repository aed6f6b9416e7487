//! # Settings Watcher
//!
//! Background task that polls a branch's `settings_rev` change marker and
//! republishes the configuration value on the [`ConfigBus`] when the
//! marker moves.
//!
//! ## Watch Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Settings Watch Loop                                 │
//! │                                                                         │
//! │  every poll interval:                                                  │
//! │    1. rev = SELECT settings_rev                                        │
//! │    2. unchanged? ──► sleep until next tick                             │
//! │    3. moved?     ──► invalidate cache, re-read cash_float_target,      │
//! │                      publish FloatTargetChanged on the bus             │
//! │                                                                         │
//! │  The first observation only records the baseline: startup must not     │
//! │  replay a change nobody made.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is the polling leg of the propagation design: in-process changes
//! ride the bus directly, while changes written by another process are
//! noticed here. Both legs are idempotent, so double delivery is fine.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use tally_db::SettingsRepository;

use crate::bus::ConfigBus;
use crate::error::{SyncError, SyncResult};
use crate::messages::{ConfigBroadcast, FloatTargetChanged};

/// Default marker poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls one branch's settings change marker.
pub struct SettingsWatcher {
    /// Settings repository (shares the application pool).
    settings: SettingsRepository,

    /// Bus to publish adopted values on.
    bus: ConfigBus,

    /// Branch being watched.
    branch_id: String,

    /// Poll interval.
    poll_interval: Duration,

    /// Marker value at the previous poll; None before the baseline read.
    last_rev: Option<i64>,

    /// Shutdown receiver.
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for controlling a running watcher.
#[derive(Clone)]
pub struct SettingsWatcherHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl SettingsWatcherHandle {
    /// Triggers graceful shutdown.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SyncError::ChannelClosed("Shutdown channel closed".into()))
    }
}

impl SettingsWatcher {
    /// Creates a watcher and its control handle.
    pub fn new(
        settings: SettingsRepository,
        bus: ConfigBus,
        branch_id: impl Into<String>,
        poll_interval: Duration,
    ) -> (Self, SettingsWatcherHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let watcher = SettingsWatcher {
            settings,
            bus,
            branch_id: branch_id.into(),
            poll_interval,
            last_rev: None,
            shutdown_rx,
        };

        (watcher, SettingsWatcherHandle { shutdown_tx })
    }

    /// Runs the poll loop. Spawn this as a background task.
    pub async fn run(mut self) {
        info!(branch_id = %self.branch_id, "Settings watcher starting");

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.check_once().await {
                        // Best-effort: log and keep polling.
                        error!(?e, branch_id = %self.branch_id, "Settings poll failed");
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!(branch_id = %self.branch_id, "Settings watcher shutting down");
                    break;
                }
            }
        }
    }

    /// One poll: compare the marker, re-read and publish on movement.
    async fn check_once(&mut self) -> SyncResult<()> {
        let rev = self.settings.settings_rev(&self.branch_id).await?;

        match self.last_rev {
            None => {
                // Baseline: record without publishing.
                self.last_rev = Some(rev);
            }
            Some(seen) if seen != rev => {
                self.last_rev = Some(rev);
                self.settings.invalidate(&self.branch_id);

                if let Some(value) = self.settings.float_target(&self.branch_id).await? {
                    debug!(
                        branch_id = %self.branch_id,
                        value,
                        rev,
                        "Settings marker moved, republishing"
                    );
                    self.bus.publish(ConfigBroadcast::FloatTargetChanged(
                        FloatTargetChanged::new(self.branch_id.clone(), value),
                    ));
                }
            }
            Some(_) => {}
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tally_db::{Database, DbConfig};
    use tokio::time::timeout;

    const FAST_POLL: Duration = Duration::from_millis(10);

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_marker_movement_publishes_new_value() {
        let db = test_db().await;
        let settings = db.settings();
        settings.set_float_target("b-7", 1_000_000).await.unwrap();

        let bus = ConfigBus::new();
        let mut rx = bus.subscribe();

        let (watcher, handle) =
            SettingsWatcher::new(db.settings(), bus.clone(), "b-7", FAST_POLL);
        let task = tokio::spawn(watcher.run());

        // Give the watcher time to take its baseline, then change the
        // configuration through a different repository instance.
        tokio::time::sleep(FAST_POLL * 3).await;
        settings.set_float_target("b-7", 2_000_000).await.unwrap();

        let msg = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("watcher publishes within the timeout")
            .unwrap();
        assert_eq!(
            msg,
            ConfigBroadcast::FloatTargetChanged(FloatTargetChanged::new("b-7", 2_000_000))
        );

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_baseline_is_not_replayed() {
        let db = test_db().await;
        db.settings().set_float_target("b-7", 1_000_000).await.unwrap();

        let bus = ConfigBus::new();
        let mut rx = bus.subscribe();

        let (watcher, handle) =
            SettingsWatcher::new(db.settings(), bus.clone(), "b-7", FAST_POLL);
        let task = tokio::spawn(watcher.run());

        // No configuration change: nothing may be published.
        tokio::time::sleep(FAST_POLL * 5).await;
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert!(rx.try_recv().is_err());
    }
}
