//! Crate-wide error type.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Every failure the monitor can surface to a caller.
///
/// Nothing here is fatal: a failed `record` means "this sample was not
/// stored", and the caller decides whether to retry, log, or move on.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The store could not run the command (connection, timeout, script error).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The metric name cannot be turned into storage keys.
    #[error("invalid metric name {name:?}: {reason}")]
    InvalidMetricName { name: String, reason: &'static str },

    #[error("config: {0}")]
    Config(String),
}

impl From<redis::RedisError> for MonitorError {
    fn from(e: redis::RedisError) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}
