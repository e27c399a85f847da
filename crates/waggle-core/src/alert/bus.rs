//! Broadcast bus for distributing `Alert` to multiple subscribers.
//!
//! Built on `tokio::sync::broadcast`, the `AlertBus` supports multiple
//! concurrent subscribers. Publishing with no active subscribers is a no-op,
//! so the coordinator and rate limiter can emit alerts unconditionally.

use tokio::sync::broadcast;
use waggle_types::alert::Alert;

/// Multi-consumer bus for operational alerts.
///
/// Wraps a `tokio::sync::broadcast` channel. Cloning the bus clones the
/// sender, allowing multiple producers and consumers.
pub struct AlertBus {
    sender: broadcast::Sender<Alert>,
}

impl AlertBus {
    /// Create a new alert bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future alerts.
    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.sender.subscribe()
    }

    /// Publish an alert to all current subscribers.
    ///
    /// If there are no subscribers, the alert is silently dropped.
    pub fn publish(&self, alert: Alert) {
        let _ = self.sender.send(alert);
    }

    /// Access the underlying broadcast sender.
    pub fn sender(&self) -> &broadcast::Sender<Alert> {
        &self.sender
    }
}

impl Clone for AlertBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for AlertBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}
