//! # Order Desk Core
//!
//! Core traits and types for the Order Desk architecture.
//!
//! The demo order engine is built as a single reducer over one shared state
//! value. This crate provides the abstractions that reducer is written against:
//!
//! - **State**: Domain state (catalog, orders, customer) as owned, cloneable data
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (notifications, follow-up actions)
//! - **Environment**: Injected dependencies (clock, id generation)
//!
//! ## Example
//!
//! ```ignore
//! use order_desk_core::*;
//!
//! impl Reducer for OrderReducer {
//!     type State = DemoState;
//!     type Action = OrderAction;
//!     type Environment = OrderEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut DemoState,
//!         action: OrderAction,
//!         env: &OrderEnvironment,
//!     ) -> SmallVec<[Effect<OrderAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Transient user-facing notifications
pub mod notification;

pub use notification::{Notification, NotificationLevel};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for OrderReducer {
    ///     type State = DemoState;
    ///     type Action = OrderAction;
    ///     type Environment = OrderEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut DemoState,
    ///         action: OrderAction,
    ///         env: &OrderEnvironment,
    ///     ) -> SmallVec<[Effect<OrderAction>; 4]> {
    ///         match action {
    ///             OrderAction::ConfirmOrder { order_id } => {
    ///                 // Business logic here
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// A rejected action must leave `state` exactly as it found it,
        /// apart from whatever outcome bookkeeping the state type defines.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution). The Order Desk runtime is synchronous,
/// so every effect runs to completion before `send` returns.
pub mod effect {
    use crate::notification::Notification;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Debug, Clone, PartialEq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Surface a transient notification to the user
        Notify(Notification),

        /// Run effects in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action back into the reducer once the current one completes
        Send(Box<Action>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an action as a feedback effect
        #[must_use]
        pub fn send(action: Action) -> Effect<Action> {
            Effect::Send(Box::new(action))
        }

        /// Iterate over every notification this effect (recursively) carries
        pub fn notifications(&self) -> Box<dyn Iterator<Item = &Notification> + '_> {
            match self {
                Effect::Notify(notification) => Box::new(std::iter::once(notification)),
                Effect::Sequential(effects) => {
                    Box::new(effects.iter().flat_map(Effect::notifications))
                },
                Effect::None | Effect::Send(_) => Box::new(std::iter::empty()),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism (time, identifiers) and all outward-facing
/// sinks are abstracted behind traits and injected via the Environment parameter.
pub mod environment {
    use crate::notification::Notification;
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use order_desk_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _now = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Generates opaque identifiers for newly created entities
    ///
    /// Implementations must never return the same id twice for the same
    /// prefix within one session.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next id, e.g. `next_id("ord")` → `"ord-…"`
        fn next_id(&self, prefix: &str) -> String;
    }

    /// Receives notifications produced by effects
    pub trait NotificationSink: Send + Sync {
        /// Deliver a notification
        fn notify(&self, notification: Notification);
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::notification::Notification;

    #[test]
    fn notifications_are_collected_from_nested_effects() {
        let effect: Effect<()> = Effect::chain(vec![
            Effect::Notify(Notification::success("Order created", "ord-1")),
            Effect::None,
            Effect::chain(vec![Effect::Notify(Notification::warning(
                "Low stock",
                "Beta Package",
            ))]),
            Effect::send(()),
        ]);

        let titles: Vec<&str> = effect.notifications().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Order created", "Low stock"]);
    }
}
