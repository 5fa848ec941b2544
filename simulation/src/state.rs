//! Topology state persisted between invocations
//!
//! Each CLI invocation is a separate process, so failures injected by one
//! call only reach the next if the host saves them. The state file is a JSON
//! [`TopologySnapshot`]; writes go to a temporary file in the same directory
//! and are renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use adrn_core::{Topology, TopologySnapshot};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::StateError;

/// Read a JSON topology definition (or saved state) from disk
pub fn load_definition(path: &Path) -> Result<Topology, StateError> {
    let json = fs::read_to_string(path).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot_error = |source| StateError::Snapshot {
        path: path.to_path_buf(),
        source,
    };
    let topology = TopologySnapshot::from_json(&json)
        .and_then(TopologySnapshot::into_topology)
        .map_err(snapshot_error)?;
    debug!(
        path = %path.display(),
        nodes = topology.node_count(),
        edges = topology.edge_count(),
        "Topology loaded"
    );
    Ok(topology)
}

/// File-backed topology state
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved state, or `None` if nothing has been saved yet
    pub fn load(&self) -> Result<Option<Topology>, StateError> {
        match fs::metadata(&self.path) {
            Ok(_) => load_definition(&self.path).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Load saved state, falling back to `initial` when none exists
    pub fn load_or(
        &self,
        initial: impl FnOnce() -> Result<Topology, StateError>,
    ) -> Result<Topology, StateError> {
        match self.load()? {
            Some(topology) => {
                info!(path = %self.path.display(), "Resuming saved topology state");
                Ok(topology)
            }
            None => initial(),
        }
    }

    /// Load saved state, falling back to the built-in seed topology
    pub fn load_or_seed(&self) -> Result<Topology, StateError> {
        self.load_or(|| Ok(Topology::seed()))
    }

    /// Atomically replace the saved state
    pub fn save(&self, topology: &Topology) -> Result<(), StateError> {
        let json = topology.snapshot().to_json().map_err(|source| StateError::Snapshot {
            path: self.path.clone(),
            source,
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        file.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!(
            path = %self.path.display(),
            failed = topology.failed_edges().count(),
            "Topology state saved"
        );
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
