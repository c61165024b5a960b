//! Global request state and the user-visible error slot

use crate::action::TodoAction;
use crate::environment::TodoEnvironment;
use crate::error::AppError;
use crate::types::RequestStatus;
use todolists_core::{effect::Effect, reducer::Reducer, SmallVec};

/// App-level status: what is in flight and what went wrong
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusState {
    /// Global request flag
    pub status: RequestStatus,
    /// Message slot shown to the user
    pub error: Option<AppError>,
    /// Whether the initial load has completed
    pub is_initialized: bool,
}

/// Applies app-level transitions
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusReducer;

impl Reducer for StatusReducer {
    type State = StatusState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::DismissError => state.error = None,
            TodoAction::SetInitialized(value) => state.is_initialized = value,
            TodoAction::ValidationFailed { error } => state.error = Some(error.into()),
            TodoAction::RequestFailed { error, .. } => {
                state.status = RequestStatus::Failed;
                state.error = Some(error);
            },
            TodoAction::ListsFetched { .. } => {
                state.status = RequestStatus::Succeeded;
                state.is_initialized = true;
            },
            action if action.is_remote() => state.status = RequestStatus::Loading,
            action if action.is_remote_success() => state.status = RequestStatus::Succeeded,
            _ => {},
        }
        SmallVec::new()
    }
}
