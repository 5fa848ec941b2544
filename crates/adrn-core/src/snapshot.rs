//! Serializable topology snapshots
//!
//! The same JSON shape serves as a topology definition file (status may be
//! omitted and defaults to ACTIVE) and as persisted state between runs.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::topology::Topology;
use crate::types::{Cost, EdgeStatus, NodeId};

/// One link in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub cost: Cost,
    #[serde(default)]
    pub status: EdgeStatus,
}

/// Full serializable state of a topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeRecord>,
}

impl TopologySnapshot {
    /// Rebuild a topology, re-validating every invariant
    pub fn into_topology(self) -> Result<Topology, SnapshotError> {
        let mut builder = Topology::builder();
        for node in self.nodes {
            builder = builder.add_node(node);
        }
        for edge in self.edges {
            builder = builder.add_edge_with_status(edge.from, edge.to, edge.cost, edge.status);
        }
        Ok(builder.build()?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Deserialization(e.to_string()))
    }
}

impl Topology {
    /// Capture the current state
    pub fn snapshot(&self) -> TopologySnapshot {
        TopologySnapshot {
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|edge| EdgeRecord {
                    from: edge.key.first().clone(),
                    to: edge.key.second().clone(),
                    cost: edge.cost,
                    status: edge.status,
                })
                .collect(),
        }
    }
}
