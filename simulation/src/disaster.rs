//! Disaster injection
//!
//! Fails a uniformly random subset of the currently ACTIVE links. Requests
//! larger than the number of active links are clamped; the returned
//! [`DisasterReport`] makes that visible instead of leaving it silent.
//!
//! Chosen links are reported on the diagnostic channel (tracing), never on
//! the primary output.

use adrn_core::{
    EdgeKey, EdgeStatus, NodeId, RandomSource, Topology, TopologyError, TopologyResult,
};
use tracing::{info, warn};

/// What a disaster actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisasterReport {
    /// Number of failures asked for
    pub requested: usize,
    /// Active links available when the disaster struck
    pub active_before: usize,
    /// Links transitioned to FAILED, in selection order
    pub failed: Vec<EdgeKey>,
}

impl DisasterReport {
    /// Number of links actually failed: `min(requested, active_before)`
    pub fn effective(&self) -> usize {
        self.failed.len()
    }

    /// Whether fewer links failed than were requested
    pub fn is_partial(&self) -> bool {
        self.effective() < self.requested
    }
}

/// Fail `min(count, active)` distinct ACTIVE links chosen uniformly at random
///
/// Candidates are taken in canonical edge order and drawn with a partial
/// Fisher-Yates shuffle, so a given random sequence always selects the same
/// links. FAILED links are never candidates.
pub fn inject_failures<R>(
    topology: &mut Topology,
    count: usize,
    rng: &mut R,
) -> TopologyResult<DisasterReport>
where
    R: RandomSource + ?Sized,
{
    let mut candidates: Vec<EdgeKey> = topology.active_edges().map(|e| e.key.clone()).collect();
    let active_before = candidates.len();
    let take = count.min(active_before);

    for i in 0..take {
        let j = i + rng.next_index(active_before - i);
        candidates.swap(i, j);
    }
    candidates.truncate(take);

    for key in &candidates {
        topology.set_edge_status(key, EdgeStatus::Failed)?;
        let cost = topology.edge(key).map(|e| e.cost).unwrap_or_default();
        warn!(edge = %key, cost, "Link FAILED");
    }

    let report = DisasterReport {
        requested: count,
        active_before,
        failed: candidates,
    };

    if report.is_partial() {
        warn!(
            requested = report.requested,
            effective = report.effective(),
            "Disaster clamped to the remaining active links"
        );
    }
    info!(
        failed = report.effective(),
        remaining_active = active_before - report.effective(),
        "Disaster simulation complete"
    );
    Ok(report)
}

/// Fail one named link, returning its key
///
/// Failing an already-failed link succeeds without change.
pub fn fail_link(topology: &mut Topology, a: &NodeId, b: &NodeId) -> TopologyResult<EdgeKey> {
    let key = EdgeKey::new(a.clone(), b.clone())
        .ok_or_else(|| TopologyError::SelfLoop(a.clone()))?;
    let previous = topology.set_edge_status(&key, EdgeStatus::Failed)?;
    if previous == EdgeStatus::Active {
        warn!(edge = %key, "Link FAILED (targeted)");
    } else {
        info!(edge = %key, "Link was already failed");
    }
    Ok(key)
}
