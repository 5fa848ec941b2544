//! Engine configuration

use std::path::PathBuf;

use adrn_core::{SeededRandom, Topology};
use tracing::info;

use crate::error::StateError;
use crate::state::{load_definition, StateStore};

/// Where the engine gets its topology and randomness
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for failure selection; drawn from OS entropy when absent
    pub seed: Option<u64>,
    /// State file carried across invocations
    pub state_path: Option<PathBuf>,
    /// JSON topology definition used when there is no saved state
    pub topology_path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    pub fn with_topology_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.topology_path = Some(path.into());
        self
    }

    /// Random source for disaster injection
    ///
    /// The seed actually used is logged so an entropy-seeded run can be
    /// replayed with `--seed`.
    pub fn random_source(&self) -> SeededRandom {
        let rng = match self.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        info!(seed = rng.seed(), "Random source ready");
        rng
    }

    pub fn state_store(&self) -> Option<StateStore> {
        self.state_path.as_ref().map(StateStore::new)
    }

    /// Topology to start from when no state has been saved
    pub fn initial_topology(&self) -> Result<Topology, StateError> {
        match &self.topology_path {
            Some(path) => load_definition(path),
            None => Ok(Topology::seed()),
        }
    }

    /// Saved state if configured and present, otherwise the initial topology
    pub fn load_topology(&self) -> Result<Topology, StateError> {
        match self.state_store() {
            Some(store) => store.load_or(|| self.initial_topology()),
            None => self.initial_topology(),
        }
    }
}
