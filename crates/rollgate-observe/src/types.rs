//! Domain types for workload observation.
//!
//! Snapshots are read-only captures of cluster state at a single poll.
//! They are produced by an [`ObservationService`](crate::ObservationService)
//! implementation, folded into aggregate counters by the monitor, and
//! discarded; nothing here is mutated after capture.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a workload under observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadRef {
    pub namespace: String,
    pub name: String,
    /// Label selector matching the workload's pods (e.g. `app=app`).
    pub selector: String,
}

impl WorkloadRef {
    pub fn new(namespace: &str, name: &str, selector: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            selector: selector.to_string(),
        }
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Point-in-time replica counters for a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    /// Replica count the workload spec currently asks for.
    pub desired_replicas: u32,
    /// Replicas already running the updated template.
    pub updated_replicas: u32,
    /// All replicas, old and new template alike.
    pub total_replicas: u32,
    /// Replicas counted as available by the platform.
    pub available_replicas: u32,
}

/// Coarse pod phase as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodPhase {
    Pending,
    Running,
    /// Any phase the monitor does not recognize (succeeded, failed, ...).
    Other,
}

/// One pod as seen at a single poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSnapshot {
    pub name: String,
    /// Deletion has been requested but not yet completed.
    pub is_terminating: bool,
    pub phase: PodPhase,
    /// Readiness signal; only meaningful when `phase` is `Running`.
    pub is_ready: bool,
}
