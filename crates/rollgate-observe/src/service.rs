//! The observation service seam.

use async_trait::async_trait;

use crate::error::ObserveResult;
use crate::types::{PodSnapshot, WorkloadRef, WorkloadSnapshot};

/// Read-only view of the cluster used by the rollout monitor.
///
/// Implementations wrap the platform API client. The monitor issues
/// only these two reads and never mutates workload state through this
/// seam. Both calls may fail transiently; the monitor retries them up
/// to its deadline.
#[async_trait]
pub trait ObservationService: Send + Sync {
    /// Current replica counters for the workload.
    async fn workload_status(&self, workload: &WorkloadRef) -> ObserveResult<WorkloadSnapshot>;

    /// Pods matching the given label selector.
    async fn list_pods(&self, selector: &str) -> ObserveResult<Vec<PodSnapshot>>;
}
