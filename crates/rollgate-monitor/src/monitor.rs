//! Rollout monitor — drives one rolling update observation to a
//! terminal outcome.
//!
//! The monitor is a passive observer. The caller triggers the update
//! (submitting the new spec is its job), then hands the monitor a
//! workload reference, the target replica count, and the declared
//! budget policy. The monitor polls workload and pod state until the
//! rollout converges (`Success`), a budget limit is breached
//! (`BudgetViolation`), or the deadline passes (`Timeout`).
//!
//! Observation errors are transient: they are logged and retried up to
//! the deadline without advancing any budget check. A budget breach is
//! fatal on first sight — a single observed violation is proof of a
//! contract failure by the platform under observation.

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use rollgate_observe::{
    ObservationService, ObserveError, ObserveResult, PodSnapshot, WorkloadRef, WorkloadSnapshot,
};

use crate::budget::{BudgetPolicy, ResolvedBudgets};
use crate::classify::{PodCounts, classify_pod};
use crate::error::{MonitorError, MonitorResult};

/// Per-call bound applied when the caller does not set one. Each call
/// is additionally capped by the time remaining before the deadline.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Which declared limit a rollout breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// More pods above the desired count than max_surge allows.
    Surge,
    /// More non-contributing pods than max_unavailable allows.
    Unavailable,
    /// Fewer ready pods than the configured min-available floor.
    MinAvailable,
}

/// Terminal result of one monitor run. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutOutcome {
    /// Every status counter converged to the desired replica count.
    Success,
    /// A declared limit was breached. Never retried.
    BudgetViolation {
        kind: ViolationKind,
        observed: u32,
        allowed: u32,
    },
    /// The deadline elapsed with the rollout still incomplete and no
    /// violation observed. Failure to converge, not success.
    Timeout,
}

impl RolloutOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RolloutOutcome::Success)
    }
}

impl fmt::Display for RolloutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RolloutOutcome::Success => write!(f, "rollout completed"),
            RolloutOutcome::BudgetViolation {
                kind,
                observed,
                allowed,
            } => match kind {
                ViolationKind::Surge => {
                    write!(f, "max_surge violation: {observed} > {allowed}")
                }
                ViolationKind::Unavailable => {
                    write!(f, "max_unavailable violation: {observed} > {allowed}")
                }
                ViolationKind::MinAvailable => {
                    write!(f, "min_available violation: {observed} < {allowed}")
                }
            },
            RolloutOutcome::Timeout => {
                write!(f, "rollout did not converge before the deadline")
            }
        }
    }
}

/// Configuration for one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Replica count the rollout is expected to converge to.
    pub desired_replicas: u32,
    /// Declared update budget, resolved once at run start.
    pub policy: BudgetPolicy,
    /// Sleep between samples. Call sites range from milliseconds to
    /// seconds; always explicit, never a baked-in constant.
    pub poll_interval: Duration,
    /// Overall wall-clock budget for the run.
    pub deadline: Duration,
    min_available: Option<u32>,
    call_timeout: Duration,
}

impl MonitorConfig {
    pub fn new(
        desired_replicas: u32,
        policy: BudgetPolicy,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            desired_replicas,
            policy,
            poll_interval,
            deadline,
            min_available: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Require at least `floor` ready pods at every sample — a
    /// disruption-budget style guarantee, stricter than per-sample
    /// max_unavailable compliance.
    pub fn with_min_available(mut self, floor: u32) -> Self {
        self.min_available = Some(floor);
        self
    }

    /// Bound each observation call. A hung call must never prevent the
    /// deadline check from firing, so calls are also capped by the
    /// remaining run budget.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// Monitors one rolling update from trigger to terminal outcome.
///
/// Owns all per-run state (`polls`, `min_observed_available`); runs
/// share nothing, so any number of monitors may execute concurrently
/// without locking.
#[derive(Debug)]
pub struct RolloutMonitor {
    workload: WorkloadRef,
    config: MonitorConfig,
    resolved: ResolvedBudgets,
    min_observed_available: Option<u32>,
    polls: u32,
}

impl RolloutMonitor {
    /// Validate caller preconditions and prepare a run.
    ///
    /// Budgets are resolved here against the desired replica count at
    /// run start and never recomputed mid-run. A policy under which no
    /// rollout could ever proceed is rejected before the first poll.
    pub fn new(workload: WorkloadRef, config: MonitorConfig) -> MonitorResult<Self> {
        if workload.namespace.is_empty() || workload.name.is_empty() {
            return Err(MonitorError::InvalidWorkload(
                "namespace and name are required".to_string(),
            ));
        }
        if workload.selector.trim().is_empty() {
            return Err(MonitorError::InvalidWorkload(
                "empty pod selector".to_string(),
            ));
        }
        if config.poll_interval.is_zero() {
            return Err(MonitorError::ZeroPollInterval);
        }
        if config.deadline.is_zero() {
            return Err(MonitorError::ZeroDeadline);
        }

        let resolved = config.policy.resolve(config.desired_replicas);
        if resolved.is_zero() {
            return Err(MonitorError::ZeroAllowance);
        }

        Ok(Self {
            workload,
            config,
            resolved,
            min_observed_available: None,
            polls: 0,
        })
    }

    /// Resolved budget ceilings for this run.
    pub fn budgets(&self) -> ResolvedBudgets {
        self.resolved
    }

    /// Samples taken over the run.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Minimum ready-pod count observed across all classified samples.
    ///
    /// `None` until at least one pod list has been classified. Callers
    /// that need a "never below N available across the whole run"
    /// guarantee check this after the run.
    pub fn min_observed_available(&self) -> Option<u32> {
        self.min_observed_available
    }

    /// Poll until the rollout reaches a terminal outcome.
    pub async fn run(&mut self, service: &impl ObservationService) -> RolloutOutcome {
        let deadline = Instant::now() + self.config.deadline;

        info!(
            workload = %self.workload,
            desired = self.config.desired_replicas,
            max_surge = self.resolved.max_surge,
            max_unavailable = self.resolved.max_unavailable,
            min_available = ?self.config.min_available,
            "rollout monitor started"
        );

        loop {
            let iteration_start = Instant::now();
            if iteration_start >= deadline {
                warn!(
                    workload = %self.workload,
                    polls = self.polls,
                    "deadline elapsed with rollout incomplete"
                );
                return RolloutOutcome::Timeout;
            }

            let call_budget = self.config.call_timeout.min(deadline - iteration_start);
            self.polls += 1;

            if let Some(outcome) = self.sample(service, call_budget).await {
                return outcome;
            }

            let next = (iteration_start + self.config.poll_interval).min(deadline);
            time::sleep_until(next).await;
        }
    }

    /// Take one sample. Returns a terminal outcome, or `None` to keep
    /// polling.
    async fn sample(
        &mut self,
        service: &impl ObservationService,
        call_budget: Duration,
    ) -> Option<RolloutOutcome> {
        let status = match self.fetch_status(service, call_budget).await {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    workload = %self.workload,
                    poll = self.polls,
                    error = %e,
                    "workload status fetch failed; retrying"
                );
                return None;
            }
        };

        if rollout_complete(&status, self.config.desired_replicas) {
            info!(
                workload = %self.workload,
                polls = self.polls,
                min_observed_available = ?self.min_observed_available,
                "rollout completed"
            );
            return Some(RolloutOutcome::Success);
        }

        let pods = match self.fetch_pods(service, call_budget).await {
            Ok(pods) => pods,
            Err(e) => {
                warn!(
                    workload = %self.workload,
                    poll = self.polls,
                    error = %e,
                    "pod list failed; retrying"
                );
                return None;
            }
        };

        let counts = self.log_pod_states(&pods);
        let desired = self.config.desired_replicas;
        let surge = counts.total.saturating_sub(desired);
        let unavailable = counts.unavailable();

        debug!(
            workload = %self.workload,
            poll = self.polls,
            total = counts.total,
            ready = counts.ready,
            running_not_ready = counts.running_not_ready,
            pending = counts.pending,
            terminating = counts.terminating,
            surge,
            unavailable,
            "sampled rollout status"
        );

        if surge > self.resolved.max_surge {
            warn!(
                workload = %self.workload,
                observed = surge,
                allowed = self.resolved.max_surge,
                "max_surge violated"
            );
            return Some(RolloutOutcome::BudgetViolation {
                kind: ViolationKind::Surge,
                observed: surge,
                allowed: self.resolved.max_surge,
            });
        }
        if unavailable > self.resolved.max_unavailable {
            warn!(
                workload = %self.workload,
                observed = unavailable,
                allowed = self.resolved.max_unavailable,
                ready = counts.ready,
                running_not_ready = counts.running_not_ready,
                pending = counts.pending,
                terminating = counts.terminating,
                "max_unavailable violated"
            );
            return Some(RolloutOutcome::BudgetViolation {
                kind: ViolationKind::Unavailable,
                observed: unavailable,
                allowed: self.resolved.max_unavailable,
            });
        }

        self.min_observed_available = Some(match self.min_observed_available {
            Some(prev) => prev.min(counts.ready),
            None => counts.ready,
        });

        if let Some(floor) = self.config.min_available {
            if counts.ready < floor {
                warn!(
                    workload = %self.workload,
                    observed = counts.ready,
                    allowed = floor,
                    "min_available floor violated"
                );
                return Some(RolloutOutcome::BudgetViolation {
                    kind: ViolationKind::MinAvailable,
                    observed: counts.ready,
                    allowed: floor,
                });
            }
        }

        None
    }

    async fn fetch_status(
        &self,
        service: &impl ObservationService,
        call_budget: Duration,
    ) -> ObserveResult<WorkloadSnapshot> {
        match time::timeout(call_budget, service.workload_status(&self.workload)).await {
            Ok(result) => result,
            Err(_) => Err(ObserveError::Timeout(format!(
                "workload status: no response within {call_budget:?}"
            ))),
        }
    }

    async fn fetch_pods(
        &self,
        service: &impl ObservationService,
        call_budget: Duration,
    ) -> ObserveResult<Vec<PodSnapshot>> {
        match time::timeout(call_budget, service.list_pods(&self.workload.selector)).await {
            Ok(result) => result,
            Err(_) => Err(ObserveError::Timeout(format!(
                "pod list: no response within {call_budget:?}"
            ))),
        }
    }

    /// Log per-pod states in stable (name-sorted) order and return the
    /// aggregate counts.
    fn log_pod_states(&self, pods: &[PodSnapshot]) -> PodCounts {
        let mut states: Vec<_> = pods
            .iter()
            .map(|pod| (pod.name.as_str(), classify_pod(pod)))
            .collect();
        states.sort_unstable_by_key(|(name, _)| *name);

        for (name, classification) in states {
            match classification {
                Some(state) => {
                    debug!(workload = %self.workload, pod = name, state = ?state, "pod state");
                }
                None => {
                    debug!(workload = %self.workload, pod = name, "pod in unrecognized phase");
                }
            }
        }

        PodCounts::tally(pods)
    }
}

/// Rollout completion: every status counter equals the desired count.
fn rollout_complete(status: &WorkloadSnapshot, desired: u32) -> bool {
    status.updated_replicas == desired
        && status.total_replicas == desired
        && status.available_replicas == desired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Budget;

    fn workload() -> WorkloadRef {
        WorkloadRef::new("test-ns", "app", "app=app")
    }

    fn policy(max_surge: Budget, max_unavailable: Budget) -> BudgetPolicy {
        BudgetPolicy {
            max_surge,
            max_unavailable,
        }
    }

    fn config() -> MonitorConfig {
        MonitorConfig::new(
            4,
            policy(Budget::Count(1), Budget::Count(0)),
            Duration::from_secs(1),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn rollout_complete_requires_all_counters() {
        let complete = WorkloadSnapshot {
            desired_replicas: 4,
            updated_replicas: 4,
            total_replicas: 4,
            available_replicas: 4,
        };
        assert!(rollout_complete(&complete, 4));

        let still_updating = WorkloadSnapshot {
            updated_replicas: 3,
            ..complete
        };
        assert!(!rollout_complete(&still_updating, 4));

        let extra_pod = WorkloadSnapshot {
            total_replicas: 5,
            ..complete
        };
        assert!(!rollout_complete(&extra_pod, 4));

        let not_available = WorkloadSnapshot {
            available_replicas: 3,
            ..complete
        };
        assert!(!rollout_complete(&not_available, 4));
    }

    #[test]
    fn new_resolves_budgets_once() {
        let cfg = MonitorConfig::new(
            4,
            policy(Budget::Percent(25), Budget::Percent(25)),
            Duration::from_secs(1),
            Duration::from_secs(30),
        );
        let monitor = RolloutMonitor::new(workload(), cfg).unwrap();
        assert_eq!(monitor.budgets().max_surge, 1);
        assert_eq!(monitor.budgets().max_unavailable, 1);
    }

    #[test]
    fn new_rejects_zero_allowance_policy() {
        let cfg = MonitorConfig::new(
            3,
            // 25% of 3 floors to 0 for unavailability; surge 0 outright.
            policy(Budget::Count(0), Budget::Percent(25)),
            Duration::from_secs(1),
            Duration::from_secs(30),
        );
        let err = RolloutMonitor::new(workload(), cfg).unwrap_err();
        assert!(matches!(err, MonitorError::ZeroAllowance));
    }

    #[test]
    fn new_rejects_empty_selector() {
        let bad = WorkloadRef::new("test-ns", "app", "  ");
        let err = RolloutMonitor::new(bad, config()).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidWorkload(_)));
    }

    #[test]
    fn new_rejects_missing_name() {
        let bad = WorkloadRef::new("test-ns", "", "app=app");
        let err = RolloutMonitor::new(bad, config()).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidWorkload(_)));
    }

    #[test]
    fn new_rejects_zero_durations() {
        let mut cfg = config();
        cfg.poll_interval = Duration::ZERO;
        assert!(matches!(
            RolloutMonitor::new(workload(), cfg).unwrap_err(),
            MonitorError::ZeroPollInterval
        ));

        let mut cfg = config();
        cfg.deadline = Duration::ZERO;
        assert!(matches!(
            RolloutMonitor::new(workload(), cfg).unwrap_err(),
            MonitorError::ZeroDeadline
        ));
    }

    #[test]
    fn outcome_display_carries_diagnostics() {
        let violation = RolloutOutcome::BudgetViolation {
            kind: ViolationKind::Unavailable,
            observed: 2,
            allowed: 1,
        };
        assert_eq!(violation.to_string(), "max_unavailable violation: 2 > 1");
        assert!(!violation.is_success());

        let floor = RolloutOutcome::BudgetViolation {
            kind: ViolationKind::MinAvailable,
            observed: 3,
            allowed: 4,
        };
        assert_eq!(floor.to_string(), "min_available violation: 3 < 4");

        assert!(RolloutOutcome::Success.is_success());
    }
}
