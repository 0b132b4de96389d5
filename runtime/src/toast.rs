//! Bounded toast queue acting as the default notification sink.

use order_desk_core::environment::NotificationSink;
use order_desk_core::notification::Notification;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Default number of toasts kept by [`ToastQueue::default`]
pub const DEFAULT_TOAST_CAPACITY: usize = 5;

/// Transient notification buffer
///
/// Keeps the most recent `capacity` notifications (oldest evicted first) and
/// fans every notification out to broadcast subscribers. Cloning shares the
/// underlying buffer.
///
/// # Example
///
/// ```
/// use order_desk_core::environment::NotificationSink;
/// use order_desk_core::Notification;
/// use order_desk_runtime::ToastQueue;
///
/// let toasts = ToastQueue::new(2);
/// toasts.notify(Notification::info("one", ""));
/// toasts.notify(Notification::info("two", ""));
/// toasts.notify(Notification::info("three", ""));
///
/// let titles: Vec<_> = toasts.recent().into_iter().map(|t| t.title).collect();
/// assert_eq!(titles, vec!["two", "three"]);
/// ```
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Arc<Mutex<VecDeque<Notification>>>,
    capacity: usize,
    broadcast: broadcast::Sender<Notification>,
}

impl ToastQueue {
    /// Create a queue holding at most `capacity` toasts (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (broadcast, _) = broadcast::channel(capacity.max(16));
        Self {
            toasts: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
            broadcast,
        }
    }

    /// Subscribe to every notification delivered from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.broadcast.subscribe()
    }

    /// Currently visible toasts, oldest first
    #[must_use]
    pub fn recent(&self) -> Vec<Notification> {
        self.toasts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Most recent toast, if any
    #[must_use]
    pub fn latest(&self) -> Option<Notification> {
        self.toasts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Remove and return all visible toasts (dismiss)
    pub fn drain(&self) -> Vec<Notification> {
        self.toasts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Number of visible toasts
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check if no toast is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of visible toasts
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_CAPACITY)
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            level = %notification.level,
            title = %notification.title,
            "Toast"
        );

        {
            let mut toasts = self
                .toasts
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if toasts.len() >= self.capacity {
                toasts.pop_front();
            }
            toasts.push_back(notification.clone());
        }

        metrics::counter!("toasts.delivered", "level" => notification.level.to_string())
            .increment(1);

        // No subscribers is fine; the buffer still holds the toast
        let _ = self.broadcast.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let toasts = ToastQueue::new(2);
        toasts.notify(Notification::success("a", ""));
        toasts.notify(Notification::success("b", ""));
        toasts.notify(Notification::error("c", ""));

        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts.latest().map(|t| t.title), Some("c".to_string()));
        assert_eq!(toasts.recent()[0].title, "b");
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let toasts = ToastQueue::new(0);
        assert_eq!(toasts.capacity(), 1);
        toasts.notify(Notification::info("only", ""));
        assert_eq!(toasts.len(), 1);
    }

    #[test]
    fn drain_dismisses_everything() {
        let toasts = ToastQueue::default();
        toasts.notify(Notification::info("a", ""));
        toasts.notify(Notification::info("b", ""));

        let drained = toasts.drain();
        assert_eq!(drained.len(), 2);
        assert!(toasts.is_empty());
    }

    #[test]
    fn subscribers_receive_toasts() {
        let toasts = ToastQueue::default();
        let mut rx = toasts.subscribe();
        toasts.notify(Notification::warning("Low stock", "Delta Suite"));

        let received = rx.try_recv();
        assert!(matches!(received, Ok(ref n) if n.title == "Low stock"));
    }

    #[test]
    fn clones_share_the_buffer() {
        let toasts = ToastQueue::default();
        let handle = toasts.clone();
        handle.notify(Notification::info("shared", ""));
        assert_eq!(toasts.len(), 1);
    }
}
