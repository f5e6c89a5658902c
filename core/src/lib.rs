//! # Conduit Core
//!
//! Core traits and types for the Conduit reducer architecture.
//!
//! This crate provides the fundamental abstractions for building a single-page
//! application as a closed state machine driven by actions, in the style of the
//! Elm architecture (model / update / view / subscriptions).
//!
//! ## Core Concepts
//!
//! - **State**: Application or page state
//! - **Action**: All possible inputs to a reducer (user input, async replies, URL changes)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Subscription**: Long-lived action sources the runtime keeps running while the
//!   state asks for them
//! - **Environment**: Injected dependencies
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use conduit_core::{smallvec, Effect, Effects, Reducer};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> Effects<CounterAction> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let _ = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

/// Lifting page results into a parent state and action space
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// URL navigation primitives (history handle, navigation commands, link requests)
pub mod navigation;

/// Subscriptions - long-lived action sources
pub mod subscription;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effects;
    use super::subscription::Subscription;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
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
        /// 1. Inspects the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;

        /// Subscriptions the runtime should keep alive for the given state
        ///
        /// Called by the runtime after every reduction. Subscriptions are matched
        /// by id: ids that appear are started, ids that disappear are stopped.
        ///
        /// Defaults to no subscriptions.
        fn subscriptions(
            &self,
            _state: &Self::State,
            _env: &Self::Environment,
        ) -> Subscription<Self::Action> {
            Subscription::None
        }
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use super::navigation::Navigation;
    use smallvec::SmallVec;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// The effect list returned by a reducer
    pub type Effects<Action> = SmallVec<[Effect<Action>; 4]>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for slow-load thresholds and timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Change the browser URL through a navigation handle
        Navigate(Navigation),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Navigate(navigation) => {
                    f.debug_tuple("Effect::Navigate").field(navigation).finish()
                },
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` if executing this effect does nothing
        ///
        /// Empty or all-`None` batches count as no-ops.
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) | Effect::Navigate(_) => false,
            }
        }

        /// All navigation commands carried by this effect, in order
        #[must_use]
        pub fn navigations(&self) -> Vec<&Navigation> {
            match self {
                Effect::Navigate(navigation) => vec![navigation],
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().flat_map(Effect::navigations).collect()
                },
                Effect::None | Effect::Delay { .. } | Effect::Future(_) => Vec::new(),
            }
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Re-tag every action this effect can produce
        ///
        /// This is how a parent embeds a child's effects: a reply produced by the
        /// mapped effect can only ever come back wrapped by `f`.
        #[must_use]
        pub fn map<B: Send + 'static>(self, f: fn(Action) -> B) -> Effect<B> {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f)).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
                Effect::Navigate(navigation) => Effect::Navigate(navigation),
            }
        }
    }
}

pub use effect::{Effect, Effects};
pub use navigation::{History, NavKey, Navigation, NavigationError, Url, UrlRequest};
pub use reducer::Reducer;
pub use subscription::{Subscription, SubscriptionId};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum ChildAction {
        Loaded(u32),
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Child(ChildAction),
    }

    #[test]
    fn test_is_none_for_nested_batches() {
        let empty: Effect<ChildAction> = Effect::merge(vec![Effect::None, Effect::chain(vec![])]);
        assert!(empty.is_none());

        let delayed = Effect::merge(vec![
            Effect::None,
            Effect::Delay {
                duration: Duration::from_millis(1),
                action: Box::new(ChildAction::Loaded(1)),
            },
        ]);
        assert!(!delayed.is_none());
    }

    #[test]
    fn test_map_delay_wraps_action() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(ChildAction::Loaded(7)),
        };

        match effect.map(ParentAction::Child) {
            Effect::Delay { duration, action } => {
                assert_eq!(duration, Duration::from_millis(5));
                assert_eq!(*action, ParentAction::Child(ChildAction::Loaded(7)));
            },
            other => unreachable!("expected delay, got {other:?}"),
        }
    }

    #[test]
    fn test_map_future_wraps_reply() {
        let effect: Effect<ChildAction> =
            Effect::Future(Box::pin(async { Some(ChildAction::Loaded(3)) }));

        let Effect::Future(fut) = effect.map(ParentAction::Child) else {
            unreachable!("map preserves the future variant");
        };

        let reply = tokio_test::block_on(fut);
        assert_eq!(reply, Some(ParentAction::Child(ChildAction::Loaded(3))));
    }

    #[test]
    fn test_map_preserves_batch_shape() {
        let effect: Effect<ChildAction> = Effect::chain(vec![
            Effect::None,
            Effect::Delay {
                duration: Duration::ZERO,
                action: Box::new(ChildAction::Loaded(1)),
            },
        ]);

        let Effect::Sequential(effects) = effect.map(ParentAction::Child) else {
            unreachable!("map preserves the sequential variant");
        };
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], Effect::None));
    }
}
