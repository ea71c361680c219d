//! Error types for the observation layer.

use thiserror::Error;

/// Result type alias for observation calls.
pub type ObserveResult<T> = Result<T, ObserveError>;

/// Errors returned by an observation service.
///
/// Every variant is transient from the monitor's point of view: the
/// poll loop logs it and retries until its deadline.
#[derive(Debug, Clone, Error)]
pub enum ObserveError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("observation call timed out: {0}")]
    Timeout(String),
}
