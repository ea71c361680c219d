//! rollgate-monitor — rollout budget monitoring.
//!
//! Validates the rolling-update guarantees a platform declares for a
//! workload (max-surge, max-unavailable, optional min-available floor)
//! by passively sampling the workload's pod set during an update. The
//! caller triggers the update; the monitor owns polling until a
//! terminal outcome.
//!
//! # Components
//!
//! - **`classify`** — pure pod lifecycle classification and counters
//! - **`budget`** — int-or-percent budget resolution
//! - **`monitor`** — the polling state machine (`RolloutMonitor`)
//!
//! # Outcomes
//!
//! A run resolves to exactly one of `Success` (the rollout converged),
//! `BudgetViolation` (a declared limit was breached — fatal on first
//! sight), or `Timeout` (the deadline passed with the rollout still
//! incomplete). Observation errors are transient and retried until the
//! deadline.

pub mod budget;
pub mod classify;
pub mod error;
pub mod monitor;

pub use budget::{Budget, BudgetPolicy, ParseBudgetError, ResolvedBudgets};
pub use classify::{PodClassification, PodCounts, classify_pod};
pub use error::{MonitorError, MonitorResult};
pub use monitor::{MonitorConfig, RolloutMonitor, RolloutOutcome, ViolationKind};
