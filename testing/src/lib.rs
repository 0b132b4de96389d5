//! # Order Desk Testing
//!
//! Testing utilities and helpers for the Order Desk architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits (clocks, id generation)
//! - A recording notification sink
//! - A Given-When-Then harness for reducers and effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use order_desk_testing::{test_clock, SequentialIdGenerator};
//!
//! #[test]
//! fn test_order_flow() {
//!     let env = OrderEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()));
//!     let engine = OrderEngine::with_environment(DemoConfig::default(), env);
//!
//!     engine.create_order(&ProductId::new("prod-002"), 3).unwrap();
//!     assert_eq!(engine.snapshot().orders.len(), 1);
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use order_desk_core::environment::{Clock, IdGenerator, NotificationSink};
use order_desk_core::notification::{Notification, NotificationLevel};

/// Fluent reducer test harness
pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{
        Clock, DateTime, Duration, IdGenerator, Notification, NotificationLevel,
        NotificationSink, Utc,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use order_desk_testing::mocks::FixedClock;
    /// use order_desk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every call
    ///
    /// Useful when a test needs timestamps that strictly increase.
    ///
    /// ```
    /// use order_desk_testing::mocks::SteppingClock;
    /// use order_desk_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = SteppingClock::new(Utc::now(), Duration::seconds(1));
    /// assert!(clock.now() < clock.now());
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` that advances by `step` per reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Predictable ids: `ord-0001`, `ord-0002`, `note-0001`, ...
    ///
    /// Each prefix has its own counter.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        counters: Mutex<HashMap<String, u64>>,
    }

    impl SequentialIdGenerator {
        /// Create a generator with all counters at zero
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self, prefix: &str) -> String {
            let mut counters = self
                .counters
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let counter = counters.entry(prefix.to_string()).or_insert(0);
            *counter += 1;
            format!("{prefix}-{counter:04}")
        }
    }

    /// Notification sink that records everything it receives
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        received: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        /// Create an empty sink
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// All notifications received so far, in delivery order
        #[must_use]
        pub fn notifications(&self) -> Vec<Notification> {
            self.received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }

        /// The most recent notification
        #[must_use]
        pub fn last(&self) -> Option<Notification> {
            self.received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .last()
                .cloned()
        }

        /// Number of notifications with the given level
        #[must_use]
        pub fn count_level(&self, level: NotificationLevel) -> usize {
            self.received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .iter()
                .filter(|n| n.level == level)
                .count()
        }

        /// Number of notifications received
        #[must_use]
        pub fn len(&self) -> usize {
            self.received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .len()
        }

        /// Check if nothing was received
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.received
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(notification);
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// A stepping clock starting at the test epoch, one second per reading
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(test_epoch(), Duration::seconds(1))
    }

    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[allow(clippy::expect_used)]
    fn test_epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

// Re-export commonly used items
pub use mocks::{
    stepping_clock, test_clock, FixedClock, RecordingSink, SequentialIdGenerator, SteppingClock,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn stepping_clock_strictly_increases() {
        let clock = stepping_clock();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::seconds(1));
    }

    #[test]
    fn sequential_ids_are_per_prefix() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id("ord"), "ord-0001");
        assert_eq!(ids.next_id("ord"), "ord-0002");
        assert_eq!(ids.next_id("note"), "note-0001");
    }

    #[test]
    fn recording_sink_counts_levels() {
        let sink = RecordingSink::new();
        sink.notify(Notification::success("a", ""));
        sink.notify(Notification::error("b", ""));
        sink.notify(Notification::error("c", ""));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.count_level(NotificationLevel::Error), 2);
        assert_eq!(sink.last().map(|n| n.title), Some("c".to_string()));
    }
}
