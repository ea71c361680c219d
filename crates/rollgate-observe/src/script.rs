//! Scripted observation service for tests.
//!
//! Serves pre-recorded status and pod-list responses in queue order.
//! The last entry of each queue repeats once the queue is down to one
//! element, so a steady final state needs only a single trailing entry.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ObserveError, ObserveResult};
use crate::service::ObservationService;
use crate::types::{PodSnapshot, WorkloadRef, WorkloadSnapshot};

/// In-memory [`ObservationService`] fed with scripted responses.
#[derive(Debug, Default)]
pub struct ScriptedObservation {
    statuses: Mutex<VecDeque<ObserveResult<WorkloadSnapshot>>>,
    pod_lists: Mutex<VecDeque<ObserveResult<Vec<PodSnapshot>>>>,
}

impl ScriptedObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful status response.
    pub fn push_status(&self, snapshot: WorkloadSnapshot) {
        lock(&self.statuses).push_back(Ok(snapshot));
    }

    /// Queue a failed status response.
    pub fn push_status_error(&self, err: ObserveError) {
        lock(&self.statuses).push_back(Err(err));
    }

    /// Queue a successful pod list response.
    pub fn push_pods(&self, pods: Vec<PodSnapshot>) {
        lock(&self.pod_lists).push_back(Ok(pods));
    }

    /// Queue a failed pod list response.
    pub fn push_pods_error(&self, err: ObserveError) {
        lock(&self.pod_lists).push_back(Err(err));
    }
}

#[async_trait]
impl ObservationService for ScriptedObservation {
    async fn workload_status(&self, _workload: &WorkloadRef) -> ObserveResult<WorkloadSnapshot> {
        serve(&self.statuses, "workload status")
    }

    async fn list_pods(&self, _selector: &str) -> ObserveResult<Vec<PodSnapshot>> {
        serve(&self.pod_lists, "pod list")
    }
}

/// Pop the next scripted response, keeping the final one in place so
/// it repeats on every later call.
fn serve<T: Clone>(
    queue: &Mutex<VecDeque<ObserveResult<T>>>,
    what: &str,
) -> ObserveResult<T> {
    let mut queue = lock(queue);
    let next = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    };
    match next {
        Some(result) => {
            debug!(what, remaining = queue.len(), "serving scripted response");
            result
        }
        None => Err(ObserveError::Api(format!("{what} script is empty"))),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
