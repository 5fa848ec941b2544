//! Error types for dispatch, the line protocol, and state persistence

use std::io;
use std::path::PathBuf;

use adrn_core::{SnapshotError, TopologyError};
use thiserror::Error;

/// Errors from turning a request into an engine operation
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Unrecognized verb or wrong number of arguments
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument for {command}: {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },

    /// A mutating command was sent through the read-only path
    #[error("Command {0} requires exclusive access")]
    RequiresWrite(&'static str),

    #[error("Topology rejected the operation: {0}")]
    Topology(#[from] TopologyError),
}

/// Errors parsing the line protocol
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Missing {0} line")]
    MissingStatus(&'static str),

    #[error("Parsed records do not form a valid topology: {0}")]
    InvalidTopology(#[from] TopologyError),
}

/// Errors loading or saving topology state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Snapshot error in {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}
