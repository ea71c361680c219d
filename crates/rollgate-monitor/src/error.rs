//! Monitor error types.
//!
//! These are caller precondition errors, surfaced by
//! [`RolloutMonitor::new`](crate::RolloutMonitor::new) before the
//! first poll. Runtime conditions (observation failures, budget
//! breaches, deadline expiry) are not errors; they resolve into a
//! [`RolloutOutcome`](crate::RolloutOutcome).

use thiserror::Error;

use crate::budget::ParseBudgetError;

/// Result type alias for monitor setup.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur when preparing a monitor run.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("budget policy permits no movement: max_surge and max_unavailable both resolve to 0")]
    ZeroAllowance,

    #[error("invalid workload reference: {0}")]
    InvalidWorkload(String),

    #[error("poll interval must be non-zero")]
    ZeroPollInterval,

    #[error("deadline must be non-zero")]
    ZeroDeadline,

    #[error("budget parse error: {0}")]
    Budget(#[from] ParseBudgetError),
}
