//! Metric descriptions for the store runtime.
//!
//! The store records through the `metrics` facade; whichever recorder the
//! host installs receives them. Without a recorder the calls are no-ops.

use metrics::{describe_counter, describe_histogram, Unit};

/// Counter: every action accepted by `Store::send`
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Histogram: time spent inside the reducer under the write lock
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Counter: effects started, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Counter: actions refused because shutdown began
pub const SHUTDOWN_REJECTED: &str = "store.shutdown.rejected_actions";

/// Counter: shutdowns that gave up waiting for effects
pub const SHUTDOWN_TIMEOUT: &str = "store.shutdown.timeout";

/// Register descriptions for every metric the store emits.
///
/// Call once after installing a recorder.
pub fn describe_store_metrics() {
    describe_counter!(COMMANDS_TOTAL, "Total number of actions dispatched to the store");
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time taken to reduce one action"
    );
    describe_counter!(EFFECTS_EXECUTED, "Total number of effects executed, by type");
    describe_counter!(
        SHUTDOWN_REJECTED,
        "Actions rejected because the store was shutting down"
    );
    describe_counter!(
        SHUTDOWN_TIMEOUT,
        "Shutdowns that timed out with effects still running"
    );
}
