//! Core value types for the ADRN engine
//!
//! Models a topology of labelled nodes joined by weighted, undirected links
//! whose health can degrade from ACTIVE to FAILED.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TopologyError;

/// Traversal weight of a single link, and of an accumulated path
pub type Cost = u32;

/// Unique label of a node in the topology (e.g. `P1`, `C1`)
///
/// Labels travel through a line protocol, so they may not be empty and may
/// not contain `,` `|` `:` or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id, validating the label
    pub fn new(label: impl Into<String>) -> Result<Self, TopologyError> {
        let label = label.into();
        let valid = !label.is_empty()
            && !label
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ',' | '|' | ':'));
        if valid {
            Ok(Self(label))
        } else {
            Err(TopologyError::InvalidNodeId(label))
        }
    }

    /// Get the label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = TopologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Health of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeStatus {
    /// Link carries traffic
    #[default]
    Active,
    /// Link is down for the rest of the run
    Failed,
}

impl EdgeStatus {
    /// Wire form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for EdgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "FAILED" => Ok(Self::Failed),
            other => Err(format!("unknown edge status: {other}")),
        }
    }
}

/// Identity of an edge: its unordered endpoint pair in canonical order
///
/// `EdgeKey::new(b, a)` and `EdgeKey::new(a, b)` yield the same key, so a
/// topology can hold at most one edge per node pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    low: NodeId,
    high: NodeId,
}

impl EdgeKey {
    /// Normalize a pair of endpoints. Returns `None` for a self loop.
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller endpoint (displayed first)
    pub fn first(&self) -> &NodeId {
        &self.low
    }

    /// The lexicographically larger endpoint
    pub fn second(&self) -> &NodeId {
        &self.high
    }

    /// Whether `node` is one of the endpoints
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.low == node || &self.high == node
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint
    pub fn other(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.low == node {
            Some(&self.high)
        } else if &self.high == node {
            Some(&self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// A weighted, bidirectional link with a mutable health status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub key: EdgeKey,
    pub cost: Cost,
    pub status: EdgeStatus,
}

impl Edge {
    pub fn is_active(&self) -> bool {
        self.status == EdgeStatus::Active
    }
}

/// Ordered node sequence returned by the router, with its total cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub cost: Cost,
}

impl Path {
    /// The zero-cost path consisting of a single node
    pub fn trivial(node: NodeId) -> Self {
        Self {
            nodes: vec![node],
            cost: 0,
        }
    }

    /// Number of links traversed
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&NodeId> {
        self.nodes.first()
    }

    pub fn end(&self) -> Option<&NodeId> {
        self.nodes.last()
    }

    /// Whether the path traverses the link between `a` and `b` (either direction)
    pub fn contains_edge(&self, a: &NodeId, b: &NodeId) -> bool {
        self.nodes
            .windows(2)
            .any(|w| (&w[0] == a && &w[1] == b) || (&w[0] == b && &w[1] == a))
    }

    /// Canonical keys of every link on the path
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.nodes
            .windows(2)
            .filter_map(|w| EdgeKey::new(w[0].clone(), w[1].clone()))
            .collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
