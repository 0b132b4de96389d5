//! # Order Desk Runtime
//!
//! Runtime implementation for the Order Desk architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer and publishes immutable snapshots
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//! - **Toast Queue**: Default notification sink for `Effect::Notify`
//!
//! Everything is synchronous: `send` runs the reducer and every resulting
//! effect to completion before returning, so readers never observe a
//! half-applied action.
//!
//! ## Example
//!
//! ```ignore
//! use order_desk_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action, get the resulting snapshot back
//! let snapshot = store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use order_desk_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;

/// Bounded toast queue (default notification sink)
pub mod toast;

pub use toast::{ToastQueue, DEFAULT_TOAST_CAPACITY};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A previous reducer call panicked while holding the state lock
        ///
        /// The state may be inconsistent; the store refuses further actions.
        #[error("Store state lock poisoned by an earlier panic")]
        Poisoned,

        /// A chain of `Effect::Send` feedback actions exceeded the configured depth
        ///
        /// Actions processed before the limit was hit remain applied.
        #[error("Feedback loop exceeded {0} actions in a single send")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use order_desk_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(8);
/// assert_eq!(config.max_feedback_actions, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions (initial + feedback) processed by one `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Set the feedback limit (minimum 1)
    #[must_use]
    pub fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 64,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Arc, Effect, Reducer, StoreConfig, StoreError, ToastQueue};
    use order_desk_core::environment::NotificationSink;
    use order_desk_core::notification::Notification;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;
    use tokio::sync::watch;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (the writable copy behind a `Mutex`)
    /// 2. Snapshots (the latest `Arc<S>` published on a `watch` channel)
    /// 3. Reducer (business logic)
    /// 4. Environment (injected dependencies)
    /// 5. Effect execution (notifications and the feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(DemoState::seeded(), OrderReducer::new(config), env);
    ///
    /// let snapshot = store.send(OrderAction::CreateOrder {
    ///     product_id: ProductId::new("prod-002"),
    ///     quantity: 3,
    /// })?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Mutex<S>,
        snapshot: watch::Sender<Arc<S>>,
        reducer: R,
        environment: E,
        sink: Arc<dyn NotificationSink>,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Notifications go to a default [`ToastQueue`]; use
        /// [`Store::with_sink`] to observe them.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_sink(
                initial_state,
                reducer,
                environment,
                Arc::new(ToastQueue::default()),
            )
        }

        /// Create a new store delivering notifications to `sink`
        #[must_use]
        pub fn with_sink(
            initial_state: S,
            reducer: R,
            environment: E,
            sink: Arc<dyn NotificationSink>,
        ) -> Self {
            Self::with_config(initial_state, reducer, environment, sink, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            sink: Arc<dyn NotificationSink>,
            config: StoreConfig,
        ) -> Self {
            let (snapshot, _) = watch::channel(Arc::new(initial_state.clone()));
            Self {
                state: Mutex::new(initial_state),
                snapshot,
                reducer,
                environment,
                sink,
                config,
            }
        }

        /// Send an action to the store
        ///
        /// This is the primary way to interact with the store:
        /// 1. Locks the writable state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Publishes the new snapshot to subscribers
        /// 4. Executes returned effects; `Effect::Send` actions are reduced next
        /// 5. Delivers notifications once the lock is released
        ///
        /// # Returns
        ///
        /// The snapshot published after the last processed action.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Poisoned`]: an earlier reducer panicked
        /// - [`StoreError::FeedbackLimitExceeded`]: feedback actions did not settle
        ///
        /// Notifications gathered before a feedback overflow are still delivered.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) -> Result<Arc<S>, StoreError> {
            let mut notifications = Vec::new();
            let result = self.process(action, &mut notifications);

            // Lock is released here; sinks may safely read the store
            for notification in notifications {
                self.sink.notify(notification);
            }

            result
        }

        fn process(
            &self,
            action: A,
            notifications: &mut Vec<Notification>,
        ) -> Result<Arc<S>, StoreError> {
            let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
            let mut pending = VecDeque::from([action]);
            let mut processed = 0usize;
            let mut latest = None;

            while let Some(action) = pending.pop_front() {
                if processed >= self.config.max_feedback_actions {
                    tracing::error!(
                        limit = self.config.max_feedback_actions,
                        "Feedback loop did not settle"
                    );
                    return Err(StoreError::FeedbackLimitExceeded(
                        self.config.max_feedback_actions,
                    ));
                }
                processed += 1;

                let start = Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                metrics::counter!("store.actions.processed").increment(1);

                let snapshot = Arc::new(state.clone());
                self.snapshot.send_replace(Arc::clone(&snapshot));
                latest = Some(snapshot);

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                for effect in effects {
                    Self::execute_effect(effect, &mut pending, notifications);
                }
            }

            tracing::debug!(actions = processed, "Action processing completed");
            Ok(latest.unwrap_or_else(|| self.snapshot.borrow().clone()))
        }

        fn execute_effect(
            effect: Effect<A>,
            pending: &mut VecDeque<A>,
            notifications: &mut Vec<Notification>,
        ) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Notify(notification) => {
                    metrics::counter!("store.effects.executed", "type" => "notify").increment(1);
                    notifications.push(notification);
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    for effect in effects {
                        Self::execute_effect(effect, pending, notifications);
                    }
                },
                Effect::Send(action) => {
                    metrics::counter!("store.effects.executed", "type" => "send").increment(1);
                    pending.push_back(*action);
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let order_count = store.state(|s| s.orders.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let snapshot = self.snapshot();
            f(&snapshot)
        }

        /// The latest published snapshot
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::clone(&self.snapshot.borrow())
        }

        /// Subscribe to snapshot publication
        ///
        /// The receiver sees the current snapshot immediately and is marked
        /// changed after every processed action.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
            self.snapshot.subscribe()
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use order_desk_core::{smallvec, Notification, SmallVec};
    use order_desk_testing::RecordingSink;

    #[derive(Debug, Clone, Default)]
    struct TallyState {
        total: i64,
        history: Vec<i64>,
    }

    #[derive(Debug, Clone)]
    enum TallyAction {
        Add(i64),
        AddTwice(i64),
        Loop,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    state.history.push(n);
                    smallvec![Effect::Notify(Notification::success("Added", n.to_string()))]
                },
                TallyAction::AddTwice(n) => smallvec![Effect::chain(vec![
                    Effect::send(TallyAction::Add(n)),
                    Effect::send(TallyAction::Add(n)),
                ])],
                TallyAction::Loop => smallvec![Effect::send(TallyAction::Loop)],
            }
        }
    }

    #[test]
    fn send_returns_new_snapshot() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let snapshot = store.send(TallyAction::Add(3)).unwrap();
        assert_eq!(snapshot.total, 3);
        assert_eq!(store.state(|s| s.total), 3);
    }

    #[test]
    fn feedback_actions_run_in_order() {
        let sink = Arc::new(RecordingSink::new());
        let store = Store::with_sink(TallyState::default(), TallyReducer, (), sink.clone());

        let snapshot = store.send(TallyAction::AddTwice(5)).unwrap();

        assert_eq!(snapshot.total, 10);
        assert_eq!(snapshot.history, vec![5, 5]);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn runaway_feedback_is_bounded() {
        let store = Store::with_config(
            TallyState::default(),
            TallyReducer,
            (),
            Arc::new(ToastQueue::default()),
            StoreConfig::default().with_max_feedback_actions(4),
        );

        let result = store.send(TallyAction::Loop);
        assert_eq!(result.err(), Some(StoreError::FeedbackLimitExceeded(4)));
    }

    #[test]
    fn subscribers_observe_each_snapshot() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let mut rx = store.subscribe();
        assert_eq!(rx.borrow_and_update().total, 0);

        let _ = store.send(TallyAction::Add(2));
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(rx.borrow_and_update().total, 2);
    }

    #[test]
    fn earlier_snapshots_are_immutable() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let before = store.snapshot();
        let _ = store.send(TallyAction::Add(7));
        assert_eq!(before.total, 0);
        assert_eq!(store.snapshot().total, 7);
    }
}
