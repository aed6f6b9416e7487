//! # Configuration Bus
//!
//! In-process publish/subscribe fan-out for [`ConfigBroadcast`] messages.
//!
//! Every closing session subscribes; the settings screen (and the
//! [`crate::watcher::SettingsWatcher`] on behalf of other processes)
//! publishes. Receivers treat each delivery as the new source of truth,
//! so duplicate or out-of-order deliveries are harmless: the latest value
//! simply wins.
//!
//! A lagged subscriber (one that missed messages because its buffer
//! filled) only loses intermediate values it would have overwritten
//! anyway.

use tokio::sync::broadcast;
use tracing::debug;

use crate::messages::ConfigBroadcast;

/// Default buffer size for subscribers.
const DEFAULT_CAPACITY: usize = 64;

/// Broadcast bus for configuration messages.
///
/// Cloning is cheap; all clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct ConfigBus {
    tx: broadcast::Sender<ConfigBroadcast>,
}

impl ConfigBus {
    /// Creates a bus with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus with an explicit per-subscriber buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        ConfigBus { tx }
    }

    /// Publishes a message to all current subscribers.
    ///
    /// Returns the number of subscribers that received it. Zero
    /// subscribers is not an error: propagation is best-effort.
    pub fn publish(&self, message: ConfigBroadcast) -> usize {
        match self.tx.send(message) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("Config broadcast dropped: no subscribers");
                0
            }
        }
    }

    /// Subscribes to future messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigBroadcast> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ConfigBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::FloatTargetChanged;

    fn changed(value: i64) -> ConfigBroadcast {
        ConfigBroadcast::FloatTargetChanged(FloatTargetChanged::new("b-7", value))
    }

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let bus = ConfigBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(changed(1_000_000)), 2);
        assert_eq!(a.recv().await.unwrap(), changed(1_000_000));
        assert_eq!(b.recv().await.unwrap(), changed(1_000_000));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_harmless() {
        let bus = ConfigBus::new();
        assert_eq!(bus.publish(changed(1_000_000)), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_only_later_messages() {
        let bus = ConfigBus::new();
        let _early = bus.subscribe();
        bus.publish(changed(1));

        let mut late = bus.subscribe();
        bus.publish(changed(2));
        assert_eq!(late.recv().await.unwrap(), changed(2));
    }
}
