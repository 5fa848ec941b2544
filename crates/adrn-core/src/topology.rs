//! Topology store for the ADRN engine
//!
//! Holds the node set and the weighted links between nodes, along with each
//! link's health. Construction validates every invariant up front; mutation
//! after construction is limited to adding elements and failing links, and
//! each call either fully applies or leaves the store untouched.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{TopologyError, TopologyResult};
use crate::types::{Cost, Edge, EdgeKey, EdgeStatus, NodeId};

/// Link definitions of the canonical 8-node fixture: `(a, b, cost)`
pub const SEED_LINKS: &[(&str, &str, Cost)] = &[
    ("P1", "C1", 5),
    ("H1", "C1", 3),
    ("F1", "C1", 7),
    ("C1", "C2", 1),
    ("C2", "P2", 4),
    ("C2", "H2", 6),
    ("P1", "H1", 8),
    ("H2", "F1", 2),
    ("C1", "F2", 9),
    ("F2", "P2", 10),
    ("H1", "P2", 5),
];

/// A network topology: nodes, links, and link health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// All links, keyed by canonical endpoint pair
    edges: BTreeMap<EdgeKey, Edge>,
    /// Adjacency list; its key set is the node set
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Topology {
    /// Start building a topology
    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::new()
    }

    /// The canonical 8-node fixture (P1, C1, C2, H1, F1, P2, H2, F2), all links ACTIVE
    pub fn seed() -> Self {
        // The fixture is a compile-time constant; failing here is a programming defect.
        from_edges(SEED_LINKS).expect("seed topology is valid")
    }

    /// Add a node to a built topology
    pub fn add_node(&mut self, id: NodeId) -> TopologyResult<()> {
        if self.adjacency.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        self.adjacency.insert(id, BTreeSet::new());
        Ok(())
    }

    /// Add an ACTIVE link between two existing nodes
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, cost: Cost) -> TopologyResult<EdgeKey> {
        self.insert_edge(a, b, cost, EdgeStatus::Active)
    }

    fn insert_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        cost: Cost,
        status: EdgeStatus,
    ) -> TopologyResult<EdgeKey> {
        for endpoint in [&a, &b] {
            if !self.adjacency.contains_key(endpoint) {
                return Err(TopologyError::UnknownEndpoint {
                    from: a.clone(),
                    to: b.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        let key = EdgeKey::new(a.clone(), b.clone()).ok_or(TopologyError::SelfLoop(a))?;
        if self.edges.contains_key(&key) {
            return Err(TopologyError::DuplicateEdge(key));
        }

        // Validation done; apply everything.
        if let Some(neighbors) = self.adjacency.get_mut(key.first()) {
            neighbors.insert(key.second().clone());
        }
        if let Some(neighbors) = self.adjacency.get_mut(key.second()) {
            neighbors.insert(key.first().clone());
        }
        self.edges.insert(
            key.clone(),
            Edge {
                key: key.clone(),
                cost,
                status,
            },
        );
        Ok(key)
    }

    /// All node ids in sorted order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    /// All links in canonical order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Links currently carrying traffic, in canonical order
    pub fn active_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(|e| e.is_active())
    }

    /// Links that have failed, in canonical order
    pub fn failed_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(|e| !e.is_active())
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// Look up the link between two nodes, in either direction
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&Edge> {
        EdgeKey::new(a.clone(), b.clone()).and_then(|key| self.edges.get(&key))
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn active_edge_count(&self) -> usize {
        self.active_edges().count()
    }

    /// Neighbors reachable from `node` over an ACTIVE link, with the link cost
    ///
    /// Yields nothing for an unknown node.
    pub fn active_neighbors<'a>(
        &'a self,
        node: &'a NodeId,
    ) -> impl Iterator<Item = (&'a NodeId, Cost)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(move |neighbor| {
                self.edge_between(node, neighbor)
                    .filter(|edge| edge.is_active())
                    .map(|edge| (neighbor, edge.cost))
            })
    }

    /// Change a link's health, returning the previous status
    ///
    /// FAILED is terminal: ACTIVE -> FAILED applies, FAILED -> FAILED is a
    /// no-op, FAILED -> ACTIVE is rejected.
    pub fn set_edge_status(
        &mut self,
        key: &EdgeKey,
        status: EdgeStatus,
    ) -> TopologyResult<EdgeStatus> {
        let edge = self
            .edges
            .get_mut(key)
            .ok_or_else(|| TopologyError::UnknownEdge(key.clone()))?;
        let previous = edge.status;
        match (previous, status) {
            (EdgeStatus::Failed, EdgeStatus::Active) => Err(TopologyError::IllegalTransition {
                edge: key.clone(),
                from: previous,
                to: status,
            }),
            _ => {
                edge.status = status;
                debug!(edge = %key, from = %previous, to = %status, "Edge status set");
                Ok(previous)
            }
        }
    }

    /// Fail the link between `a` and `b`, returning its previous status
    pub fn fail_edge(&mut self, a: &NodeId, b: &NodeId) -> TopologyResult<EdgeStatus> {
        let key = EdgeKey::new(a.clone(), b.clone())
            .ok_or_else(|| TopologyError::SelfLoop(a.clone()))?;
        self.set_edge_status(&key, EdgeStatus::Failed)
    }

    /// Simple ASCII rendering of the adjacency list, for interactive sessions
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        output.push_str("Topology:\n");
        output.push_str(&format!("  Nodes: {}\n", self.node_count()));
        output.push_str(&format!(
            "  Links: {} ({} failed)\n\n",
            self.edge_count(),
            self.failed_edges().count()
        ));

        for (node, neighbors) in &self.adjacency {
            let links: Vec<String> = neighbors
                .iter()
                .filter_map(|n| {
                    self.edge_between(node, n).map(|e| match e.status {
                        EdgeStatus::Active => format!("{n}({})", e.cost),
                        EdgeStatus::Failed => format!("{n}({}, down)", e.cost),
                    })
                })
                .collect();
            output.push_str(&format!("  {} -> [{}]\n", node, links.join(", ")));
        }
        output
    }
}

/// Deferred, all-or-nothing topology construction
///
/// Steps are recorded and validated together in [`build`](Self::build); if
/// any step is invalid no topology is produced.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<String>,
    edges: Vec<(String, String, Cost, EdgeStatus)>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(mut self, id: impl Into<String>) -> Self {
        self.nodes.push(id.into());
        self
    }

    pub fn add_edge(self, a: impl Into<String>, b: impl Into<String>, cost: Cost) -> Self {
        self.add_edge_with_status(a, b, cost, EdgeStatus::Active)
    }

    pub fn add_edge_with_status(
        mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        cost: Cost,
        status: EdgeStatus,
    ) -> Self {
        self.edges.push((a.into(), b.into(), cost, status));
        self
    }

    /// Validate every recorded step and produce the topology
    pub fn build(self) -> TopologyResult<Topology> {
        if self.nodes.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut topology = Topology {
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
        };
        for label in self.nodes {
            topology.add_node(NodeId::new(label)?)?;
        }
        for (a, b, cost, status) in self.edges {
            topology.insert_edge(NodeId::new(a)?, NodeId::new(b)?, cost, status)?;
        }

        debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "Topology built"
        );
        Ok(topology)
    }
}

/// Build a topology from a link list, declaring each endpoint on first use
pub fn from_edges(links: &[(&str, &str, Cost)]) -> TopologyResult<Topology> {
    let mut builder = TopologyBuilder::new();
    let mut declared = BTreeSet::new();
    for (a, b, cost) in links {
        for endpoint in [*a, *b] {
            if declared.insert(endpoint) {
                builder = builder.add_node(endpoint);
            }
        }
        builder = builder.add_edge(*a, *b, *cost);
    }
    builder.build()
}
