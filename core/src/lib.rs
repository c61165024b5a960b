//! # Todolists Core
//!
//! Core traits and types for the todolists state architecture.
//!
//! This crate provides the fundamental abstractions for driving a client-side
//! store through a closed set of actions using the Reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: The snapshot a feature owns (lists, task buckets, request status)
//! - **Action**: All possible inputs to a reducer (caller intents and remote outcomes)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
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
//! use todolists_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct ChecklistState {
//!     done: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ChecklistAction {
//!     Tick,
//! }
//!
//! struct ChecklistReducer;
//!
//! impl Reducer for ChecklistReducer {
//!     type State = ChecklistState;
//!     type Action = ChecklistAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ChecklistState,
//!         action: ChecklistAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<ChecklistAction>; 4]> {
//!         match action {
//!             ChecklistAction::Tick => state.done += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = ChecklistState::default();
//! let _ = ChecklistReducer.reduce(&mut state, ChecklistAction::Tick, &());
//! assert_eq!(state.done, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for ListsReducer {
    ///     type State = ListsState;
    ///     type Action = TodoAction;
    ///     type Environment = TodoEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut ListsState,
    ///         action: TodoAction,
    ///         env: &TodoEnvironment,
    ///     ) -> SmallVec<[Effect<TodoAction>; 4]> {
    ///         match action {
    ///             TodoAction::ListAdded { list_id, title } => {
    ///                 state.lists.push(TodoList::new(list_id, title));
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
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
        /// # Returns
        ///
        /// Effects to be executed by the runtime
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
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

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

        /// Arbitrary async computation (remote requests)
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
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
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism (time, identifiers) are abstracted behind
/// traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
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

    /// Process-wide unique identifier source
    ///
    /// Reducers never mint identifiers themselves; they ask the environment so
    /// tests can substitute a predictable sequence.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier, never returned before by this generator
        fn next_id(&self) -> String;
    }
}
