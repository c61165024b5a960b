//! Injected dependencies of the to-do reducers

use crate::api::TodoApi;
use std::sync::Arc;
use todolists_core::environment::{Clock, IdGenerator, SystemClock};

/// Random v4 UUIDs as local ids
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Environment dependencies for the to-do reducers
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Remote service; `None` means local-only and remote intents are rejected
    pub api: Option<Arc<dyn TodoApi>>,
    /// Source of local list and task ids
    pub ids: Arc<dyn IdGenerator>,
    /// Clock for task creation times
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a local-only environment
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api: None,
            ids,
            clock,
        }
    }

    /// Local-only environment with UUID ids and the system clock
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(UuidIds), Arc::new(SystemClock))
    }

    /// Attach a remote service
    #[must_use]
    pub fn with_api(mut self, api: Arc<dyn TodoApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Whether a remote service is attached
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.api.is_some()
    }

    /// Sequential ids and a fixed clock
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new(
            Arc::new(todolists_testing::SequentialIds::default()),
            Arc::new(todolists_testing::test_clock()),
        )
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("remote", &self.is_remote())
            .finish_non_exhaustive()
    }
}
