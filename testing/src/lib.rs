//! # Todolists Testing
//!
//! Testing utilities and helpers for the todolists reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todolists_testing::{assertions, ReducerTest, SequentialIds};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(AppState::default())
//!     .when_action(TodoAction::AddList { title: "Groceries".into() })
//!     .then_state(|state| assert_eq!(state.lists.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use todolists_core::environment::{Clock, IdGenerator};


pub use reducer_test::{assertions, ReducerTest};

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use todolists_testing::mocks::FixedClock;
    /// use todolists_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// Predictable identifiers: `{prefix}-1`, `{prefix}-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use todolists_testing::mocks::SequentialIds;
    /// use todolists_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIds::new("id");
    /// assert_eq!(ids.next_id(), "id-1");
    /// assert_eq!(ids.next_id(), "id-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIds {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator whose ids start at `{prefix}-1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }

        /// How many ids have been handed out
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.next.load(Ordering::SeqCst) - 1
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::new("id")
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }
}

/// Install a fmt subscriber honouring `RUST_LOG`, once per test binary
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, SequentialIds};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("task");
        assert_eq!(ids.issued(), 0);
        assert_eq!(ids.next_id(), "task-1");
        assert_eq!(ids.next_id(), "task-2");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_init_tracing_twice() {
        init_test_tracing();
        init_test_tracing();
    }
}
