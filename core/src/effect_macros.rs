//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block evaluates to `Option<Action>`; `Some` is fed back to the store.
///
/// # Example
///
/// ```rust,ignore
/// use todolists_core::async_effect;
///
/// let api = Arc::clone(&env.api);
/// async_effect! {
///     match api.get_tasks(list_id.clone()).await {
///         Ok(tasks) => Some(TodoAction::TasksFetched { list_id, tasks }),
///         Err(error) => Some(TodoAction::RequestFailed { target, error: error.into() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
