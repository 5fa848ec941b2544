//! Failure-aware shortest-path routing
//!
//! Dijkstra restricted to ACTIVE links. Heap entries carry the full node
//! sequence, keyed by `(cost, sequence)`, so the first settled path to any
//! node is the cheapest one and, among equally cheap paths, the one whose
//! node sequence is lexicographically smallest (ids compared as strings,
//! element by element).
//!
//! Routing never mutates the topology.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use adrn_core::{Cost, NodeId, Path, RouteFailure, Topology};
use tracing::{debug, trace};

use crate::connectivity::same_component;

/// Partial path waiting in the frontier
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    cost: Cost,
    nodes: Vec<NodeId>,
}

/// Find the minimum-cost path from `start` to `end` over ACTIVE links
///
/// # Errors
///
/// - [`RouteFailure::UnknownNode`] if either endpoint is absent (start is
///   checked first)
/// - [`RouteFailure::NoPath`] if the endpoints are in different components
/// - [`RouteFailure::CostOverflow`] if the endpoints are connected but every
///   connecting path costs more than [`Cost::MAX`]
pub fn route(topology: &Topology, start: &NodeId, end: &NodeId) -> Result<Path, RouteFailure> {
    for node in [start, end] {
        if !topology.contains_node(node) {
            return Err(RouteFailure::UnknownNode(node.to_string()));
        }
    }

    if start == end {
        return Ok(Path::trivial(start.clone()));
    }

    let mut frontier = BinaryHeap::new();
    let mut settled: BTreeSet<NodeId> = BTreeSet::new();
    let mut best: BTreeMap<NodeId, Cost> = BTreeMap::new();

    best.insert(start.clone(), 0);
    frontier.push(Reverse(Candidate {
        cost: 0,
        nodes: vec![start.clone()],
    }));

    while let Some(Reverse(candidate)) = frontier.pop() {
        let Some(current) = candidate.nodes.last().cloned() else {
            continue;
        };
        if !settled.insert(current.clone()) {
            continue;
        }

        if &current == end {
            debug!(
                %start,
                %end,
                cost = candidate.cost,
                hops = candidate.nodes.len() - 1,
                "Route found"
            );
            return Ok(Path {
                nodes: candidate.nodes,
                cost: candidate.cost,
            });
        }

        for (neighbor, link_cost) in topology.active_neighbors(&current) {
            if settled.contains(neighbor) {
                continue;
            }
            let Some(next_cost) = candidate.cost.checked_add(link_cost) else {
                trace!(from = %current, to = %neighbor, "Path cost overflow, extension dropped");
                continue;
            };
            // Equal cost is still pushed: it may win the tie-break.
            if best.get(neighbor).is_some_and(|&known| next_cost > known) {
                continue;
            }
            best.insert(neighbor.clone(), next_cost);

            let mut nodes = candidate.nodes.clone();
            nodes.push(neighbor.clone());
            frontier.push(Reverse(Candidate {
                cost: next_cost,
                nodes,
            }));
        }
    }

    if same_component(topology, start, end) == Some(true) {
        debug!(%start, %end, "Endpoints connected but every path overflows");
        Err(RouteFailure::CostOverflow)
    } else {
        debug!(%start, %end, "No path over active links");
        Err(RouteFailure::NoPath {
            start: start.clone(),
            end: end.clone(),
        })
    }
}
