//! Error types for the ADRN engine

use thiserror::Error;

use crate::types::{EdgeKey, EdgeStatus, NodeId};

/// Errors raised while building or mutating a [`Topology`](crate::Topology)
///
/// Every variant leaves the store untouched: mutation is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Topology has no nodes")]
    Empty,

    #[error("Invalid node id {0:?}: must be non-empty without separators or whitespace")]
    InvalidNodeId(String),

    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),

    #[error("Edge {from}-{to} references unknown node {missing}")]
    UnknownEndpoint {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("Self loop on node {0}")]
    SelfLoop(NodeId),

    #[error("Duplicate edge between {0}")]
    DuplicateEdge(EdgeKey),

    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeKey),

    #[error("Edge {edge} cannot move from {from} to {to}")]
    IllegalTransition {
        edge: EdgeKey,
        from: EdgeStatus,
        to: EdgeStatus,
    },
}

/// Handled failure of a reroute query
///
/// These are results, not crashes: the protocol layer turns each one into a
/// `FAILED|N/A|...` line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteFailure {
    /// Carries the label as requested, which need not be a valid [`NodeId`]
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("No path from {start} to {end} over active links")]
    NoPath { start: NodeId, end: NodeId },

    #[error("Accumulated path cost exceeds the representable range")]
    CostOverflow,
}

/// Errors converting between a [`Topology`](crate::Topology) and its
/// serialized snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Snapshot describes an invalid topology: {0}")]
    Invalid(#[from] TopologyError),
}

/// Result alias for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;
