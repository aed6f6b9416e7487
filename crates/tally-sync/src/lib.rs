//! # tally-sync: Cross-Session Configuration Propagation
//!
//! Whenever a branch's cash float target changes, every concurrent closing
//! session viewing that branch must observe the new value without a manual
//! refresh. Two legs make that happen:
//!
//! - [`bus::ConfigBus`]: in-process broadcast of typed
//!   [`messages::ConfigBroadcast`] messages, for sessions in this process.
//! - [`watcher::SettingsWatcher`]: a poll of the persisted `settings_rev`
//!   change marker, for changes written by other processes; movements are
//!   republished on the bus.
//!
//! Delivery is at-least-once and idempotent: receivers adopt the latest
//! numeric value, so duplicates are harmless and no ordering guarantees
//! are needed.

pub mod bus;
pub mod error;
pub mod messages;
pub mod watcher;

pub use bus::ConfigBus;
pub use error::{SyncError, SyncResult};
pub use messages::{ConfigBroadcast, FloatTargetChanged};
pub use watcher::{SettingsWatcher, SettingsWatcherHandle, DEFAULT_POLL_INTERVAL};
