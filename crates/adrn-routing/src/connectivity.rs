//! Connectivity analysis over ACTIVE links
//!
//! Components are recomputed on demand with a union-find pass; nothing is
//! cached, so the answer always reflects the topology's current health.

use std::collections::{BTreeMap, BTreeSet};

use adrn_core::{NodeId, Topology};
use tracing::trace;

/// Disjoint-set forest with path compression and union by rank
#[derive(Debug, Clone)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSets {
    /// Create `size` singleton sets
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
            sets: size,
        }
    }

    /// Representative of the set containing `i`
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Compress
        let mut current = i;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`; returns false if already merged
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    /// Number of disjoint sets
    pub fn set_count(&self) -> usize {
        self.sets
    }
}

/// Union-find state for one topology, with the node index used to build it
struct Partition<'a> {
    index: BTreeMap<&'a NodeId, usize>,
    sets: DisjointSets,
}

impl<'a> Partition<'a> {
    fn of(topology: &'a Topology) -> Self {
        let index: BTreeMap<&NodeId, usize> =
            topology.nodes().enumerate().map(|(i, n)| (n, i)).collect();
        let mut sets = DisjointSets::new(index.len());

        for edge in topology.active_edges() {
            // Both endpoints exist by topology invariant.
            if let (Some(&a), Some(&b)) = (index.get(edge.key.first()), index.get(edge.key.second())) {
                if sets.union(a, b) {
                    trace!(edge = %edge.key, "Joined components");
                }
            }
        }
        Self { index, sets }
    }
}

/// Number of maximal groups of nodes mutually reachable over ACTIVE links
///
/// Isolated nodes count as their own component. Always at least 1 for a
/// built topology.
pub fn count_components(topology: &Topology) -> usize {
    Partition::of(topology).sets.set_count()
}

/// The components themselves, each sorted, ordered by their smallest node
pub fn components(topology: &Topology) -> Vec<BTreeSet<NodeId>> {
    let mut partition = Partition::of(topology);
    let mut groups: BTreeMap<usize, BTreeSet<NodeId>> = BTreeMap::new();
    let entries: Vec<(&NodeId, usize)> = partition.index.iter().map(|(n, i)| (*n, *i)).collect();
    for (node, i) in entries {
        let root = partition.sets.find(i);
        groups.entry(root).or_default().insert(node.clone());
    }

    let mut result: Vec<BTreeSet<NodeId>> = groups.into_values().collect();
    result.sort_by(|a, b| a.first().cmp(&b.first()));
    result
}

/// Whether `a` and `b` are connected over ACTIVE links
///
/// Returns `None` if either node is not part of the topology.
pub fn same_component(topology: &Topology, a: &NodeId, b: &NodeId) -> Option<bool> {
    let mut partition = Partition::of(topology);
    let ia = *partition.index.get(a)?;
    let ib = *partition.index.get(b)?;
    Some(partition.sets.find(ia) == partition.sets.find(ib))
}
