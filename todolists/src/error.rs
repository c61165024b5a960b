//! Error types for validation, the remote service, and the user-visible slot

use crate::types::{ListId, TaskId};
use thiserror::Error;

/// Message shown when the failure carries nothing more specific
pub const GENERIC_ERROR_MESSAGE: &str = "Some error occurred";

/// An intent rejected locally, before any mutation or network call
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TodoError {
    /// Title empty after trimming whitespace
    #[error("Title is required")]
    EmptyTitle,

    /// Title longer than the accepted maximum
    #[error("Title is too long ({len} characters, max {max})")]
    TitleTooLong {
        /// Length of the rejected title
        len: usize,
        /// Accepted maximum
        max: usize,
    },

    /// No list with this id
    #[error("List {0} not found")]
    ListNotFound(ListId),

    /// No task with this id in the list's bucket
    #[error("Task {task_id} not found in list {list_id}")]
    TaskNotFound {
        /// List searched
        list_id: ListId,
        /// Missing task
        task_id: TaskId,
    },

    /// A list with this id already exists
    #[error("List {0} already exists")]
    DuplicateList(ListId),

    /// The list's bucket already holds a task with this id
    #[error("Task {task_id} already exists in list {list_id}")]
    DuplicateTask {
        /// Bucket searched
        list_id: ListId,
        /// Colliding task
        task_id: TaskId,
    },

    /// A remote intent was sent but no remote service is configured
    #[error("Remote service is not configured")]
    RemoteUnavailable,
}

/// Errors that can occur when talking to the remote to-do service
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Non-success HTTP status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Transport succeeded but the service refused the operation (`resultCode != 0`)
    #[error("Rejected with result code {result_code}: {}", .messages.join("; "))]
    Rejected {
        /// The service's domain result code
        result_code: i32,
        /// Messages provided by the service
        messages: Vec<String>,
    },

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::ResponseParseFailed(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// What ends up in `app.error`
///
/// `Display` is the message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AppError {
    /// Intent rejected locally
    #[error("{0}")]
    Validation(#[from] TodoError),

    /// The service refused the operation
    #[error("{}", first_or_generic(.messages))]
    Domain {
        /// Server-provided messages, first one is shown
        messages: Vec<String>,
    },

    /// Transport, protocol, or timeout failure
    #[error("{}", non_empty_or_generic(.0))]
    Network(String),
}

fn first_or_generic(messages: &[String]) -> &str {
    messages.first().map_or(GENERIC_ERROR_MESSAGE, String::as_str)
}

fn non_empty_or_generic(message: &str) -> &str {
    if message.is_empty() { GENERIC_ERROR_MESSAGE } else { message }
}

impl AppError {
    /// Whether this came from the service refusing the operation
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }

    /// Whether this came from a transport or protocol failure
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Rejected { messages, .. } => Self::Domain { messages },
            other => Self::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_shows_first_message() {
        let error = AppError::from(ApiError::Rejected {
            result_code: 1,
            messages: vec!["Title too long".to_string(), "second".to_string()],
        });
        assert!(error.is_domain());
        assert_eq!(error.to_string(), "Title too long");
    }

    #[test]
    fn domain_error_without_messages_is_generic() {
        let error = AppError::Domain { messages: vec![] };
        assert_eq!(error.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn transport_failures_are_network_errors() {
        let error = AppError::from(ApiError::Timeout);
        assert!(error.is_network());
        assert_eq!(error.to_string(), "Request timed out");

        let error = AppError::from(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(error.is_network());
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn empty_network_message_is_generic() {
        assert_eq!(AppError::Network(String::new()).to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn validation_error_message() {
        let error = AppError::from(TodoError::ListNotFound(ListId::from("l9")));
        assert_eq!(error.to_string(), "List l9 not found");

        let error = AppError::from(TodoError::DuplicateTask {
            list_id: ListId::from("l1"),
            task_id: TaskId::from("t1"),
        });
        assert_eq!(error.to_string(), "Task t1 already exists in list l1");
    }
}
