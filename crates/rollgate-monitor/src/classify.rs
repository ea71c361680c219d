//! Pod lifecycle classification.
//!
//! Maps raw pod snapshots into at most one lifecycle bucket per pod.
//! Terminating takes priority over phase; readiness only matters for
//! running pods. Everything here is a pure function of its input.

use serde::{Deserialize, Serialize};

use rollgate_observe::{PodPhase, PodSnapshot};

/// Lifecycle bucket for a single pod at one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodClassification {
    Ready,
    RunningNotReady,
    Pending,
    Terminating,
}

/// Classify one pod.
///
/// Precedence is fixed: terminating, then pending, then running split
/// by readiness. Returns `None` for pods in an unrecognized phase;
/// such pods count toward the total but toward no bucket.
pub fn classify_pod(pod: &PodSnapshot) -> Option<PodClassification> {
    if pod.is_terminating {
        return Some(PodClassification::Terminating);
    }
    match pod.phase {
        PodPhase::Pending => Some(PodClassification::Pending),
        PodPhase::Running if pod.is_ready => Some(PodClassification::Ready),
        PodPhase::Running => Some(PodClassification::RunningNotReady),
        PodPhase::Other => None,
    }
}

/// Aggregate counts over one pod list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PodCounts {
    pub ready: u32,
    pub running_not_ready: u32,
    pub pending: u32,
    pub terminating: u32,
    /// Number of input pods. Can exceed the bucket sum when pods in an
    /// unrecognized phase are present.
    pub total: u32,
}

impl PodCounts {
    /// Tally a pod list into per-bucket counts.
    pub fn tally(pods: &[PodSnapshot]) -> Self {
        let mut counts = Self::default();
        for pod in pods {
            match classify_pod(pod) {
                Some(PodClassification::Ready) => counts.ready += 1,
                Some(PodClassification::RunningNotReady) => counts.running_not_ready += 1,
                Some(PodClassification::Pending) => counts.pending += 1,
                Some(PodClassification::Terminating) => counts.terminating += 1,
                None => {}
            }
            counts.total += 1;
        }
        counts
    }

    /// Pods not contributing capacity: terminating, pending, or running
    /// without readiness.
    pub fn unavailable(&self) -> u32 {
        self.terminating + self.pending + self.running_not_ready
    }

    /// Sum of the four named buckets.
    pub fn classified(&self) -> u32 {
        self.ready + self.running_not_ready + self.pending + self.terminating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(name: &str, phase: PodPhase, is_ready: bool, is_terminating: bool) -> PodSnapshot {
        PodSnapshot {
            name: name.to_string(),
            is_terminating,
            phase,
            is_ready,
        }
    }

    #[test]
    fn terminating_takes_priority_over_phase() {
        let p = pod("a", PodPhase::Pending, false, true);
        assert_eq!(classify_pod(&p), Some(PodClassification::Terminating));

        let p = pod("b", PodPhase::Running, true, true);
        assert_eq!(classify_pod(&p), Some(PodClassification::Terminating));
    }

    #[test]
    fn running_splits_on_readiness() {
        let p = pod("a", PodPhase::Running, true, false);
        assert_eq!(classify_pod(&p), Some(PodClassification::Ready));

        let p = pod("b", PodPhase::Running, false, false);
        assert_eq!(classify_pod(&p), Some(PodClassification::RunningNotReady));
    }

    #[test]
    fn pending_ignores_readiness() {
        // Readiness is only meaningful for running pods.
        let p = pod("a", PodPhase::Pending, true, false);
        assert_eq!(classify_pod(&p), Some(PodClassification::Pending));
    }

    #[test]
    fn unrecognized_phase_is_unclassified() {
        let p = pod("a", PodPhase::Other, true, false);
        assert_eq!(classify_pod(&p), None);
    }

    #[test]
    fn tally_counts_each_bucket() {
        let pods = vec![
            pod("a", PodPhase::Running, true, false),
            pod("b", PodPhase::Running, true, false),
            pod("c", PodPhase::Running, false, false),
            pod("d", PodPhase::Pending, false, false),
            pod("e", PodPhase::Running, true, true),
        ];
        let counts = PodCounts::tally(&pods);
        assert_eq!(counts.ready, 2);
        assert_eq!(counts.running_not_ready, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.terminating, 1);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.classified(), counts.total);
    }

    #[test]
    fn unrecognized_phase_stays_in_total_only() {
        let pods = vec![
            pod("a", PodPhase::Running, true, false),
            pod("b", PodPhase::Other, false, false),
        ];
        let counts = PodCounts::tally(&pods);
        assert_eq!(counts.ready, 1);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.classified(), 1);
        assert!(counts.classified() <= counts.total);
    }

    #[test]
    fn tally_is_deterministic() {
        let pods = vec![
            pod("a", PodPhase::Running, true, false),
            pod("b", PodPhase::Pending, false, false),
            pod("c", PodPhase::Running, false, true),
        ];
        assert_eq!(PodCounts::tally(&pods), PodCounts::tally(&pods));
    }

    #[test]
    fn unavailable_excludes_ready() {
        let pods = vec![
            pod("a", PodPhase::Running, true, false),
            pod("b", PodPhase::Running, false, false),
            pod("c", PodPhase::Pending, false, false),
            pod("d", PodPhase::Running, true, true),
        ];
        let counts = PodCounts::tally(&pods);
        assert_eq!(counts.unavailable(), 3);
    }

    #[test]
    fn empty_list_tallies_to_zero() {
        let counts = PodCounts::tally(&[]);
        assert_eq!(counts, PodCounts::default());
        assert_eq!(counts.unavailable(), 0);
    }
}
