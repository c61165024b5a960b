//! Reducer composition utilities
//!
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on one slice of a larger state
//!
//! Combining scoped reducers is how independent stores react to the same
//! action: each slice transitions off the same intent, inside the same
//! dispatch, so no observer sees one slice updated without the other.
//!
//! # Example
//!
//! ```
//! use todolists_core::composition::{combine_reducers, scope_reducer};
//! use todolists_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct Names(Vec<String>);
//!
//! #[derive(Clone, Default)]
//! struct Counts(Vec<usize>);
//!
//! #[derive(Default)]
//! struct Board {
//!     names: Names,
//!     counts: Counts,
//! }
//!
//! #[derive(Clone)]
//! enum BoardAction {
//!     Add(String),
//! }
//!
//! struct NamesReducer;
//! struct CountsReducer;
//!
//! impl Reducer for NamesReducer {
//!     type State = Names;
//!     type Action = BoardAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Names, action: BoardAction, _env: &()) -> SmallVec<[Effect<BoardAction>; 4]> {
//!         let BoardAction::Add(name) = action;
//!         state.0.push(name);
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for CountsReducer {
//!     type State = Counts;
//!     type Action = BoardAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Counts, _action: BoardAction, _env: &()) -> SmallVec<[Effect<BoardAction>; 4]> {
//!         state.0.push(0);
//!         SmallVec::new()
//!     }
//! }
//!
//! fn names(board: &mut Board) -> &mut Names {
//!     &mut board.names
//! }
//!
//! fn counts(board: &mut Board) -> &mut Counts {
//!     &mut board.counts
//! }
//!
//! let board = combine_reducers(vec![
//!     Box::new(scope_reducer(NamesReducer, names)),
//!     Box::new(scope_reducer(CountsReducer, counts)),
//! ]);
//!
//! let mut state = Board::default();
//! let _ = board.reduce(&mut state, BoardAction::Add("Groceries".into()), &());
//! assert_eq!(state.names.0.len(), state.counts.0.len());
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence against the same action, and all effects
/// are collected and concatenated in reducer order.
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers this combination runs
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the combination is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|e| !e.is_none()));
        }

        all_effects
    }
}

/// Scopes a reducer to operate on one slice of a larger state.
///
/// `lens` borrows the slice mutably out of the parent state; the child
/// reducer mutates it in place.
pub fn scope_reducer<S, SubS, A, E, R>(reducer: R, lens: fn(&mut S) -> &mut SubS) -> ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer { reducer, lens }
}

/// A scoped reducer that operates on a slice of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, R> {
    reducer: R,
    lens: fn(&mut S) -> &mut SubS,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.reducer.reduce((self.lens)(state), action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.counter += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.counter -= 1;
                    smallvec![Effect::None]
                },
                TestAction::SetName(_) => smallvec![Effect::None],
            }
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if let TestAction::SetName(name) = action {
                state.name = name;
                return smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))];
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn test_combine_reducers() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        assert_eq!(combined.len(), 2);

        let mut state = TestState::default();

        let _ = combined.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(state.counter, 1);

        let _ = combined.reduce(&mut state, TestAction::SetName("Alice".to_string()), &());
        assert_eq!(state.name, "Alice");

        let _ = combined.reduce(&mut state, TestAction::Decrement, &());
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_combine_drops_noop_effects() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        let mut state = TestState::default();

        let effects = combined.reduce(&mut state, TestAction::Increment, &());
        assert!(effects.is_empty());

        let effects = combined.reduce(&mut state, TestAction::SetName("Bob".to_string()), &());
        assert_eq!(effects.len(), 1);
    }

    #[derive(Clone, Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone)]
    enum SubAction {
        Add(i32),
        Multiply(i32),
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SubAction::Add(n) => state.value += n,
                SubAction::Multiply(n) => state.value *= n,
            }
            SmallVec::new()
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[test]
    fn test_scope_reducer() {
        fn sub(parent: &mut ParentState) -> &mut SubState {
            &mut parent.sub
        }

        let scoped = scope_reducer(SubReducer, sub);

        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        let _ = scoped.reduce(&mut state, SubAction::Add(3), &());
        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");

        let _ = scoped.reduce(&mut state, SubAction::Multiply(2), &());
        assert_eq!(state.sub.value, 16);
        assert_eq!(state.other, "test");
    }
}
