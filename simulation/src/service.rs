//! Shared topology service
//!
//! Owns one [`Topology`] for the lifetime of a host process. Dump and
//! reroute run under a read lock and may proceed concurrently; disaster and
//! targeted failures take the write lock, so readers never observe a
//! half-applied disaster.

use adrn_core::{RandomSource, Topology};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::dispatch::{apply, query, Command, Outcome};
use crate::error::DispatchError;

/// Thread-safe owner of the engine state
pub struct TopologyService {
    topology: RwLock<Topology>,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl TopologyService {
    pub fn new(topology: Topology, rng: Box<dyn RandomSource>) -> Self {
        Self {
            topology: RwLock::new(topology),
            rng: Mutex::new(rng),
        }
    }

    /// Run a command and return its typed outcome together with the rendered
    /// protocol text
    pub fn dispatch(&self, command: &Command) -> Result<(Outcome, String), DispatchError> {
        if command.is_mutating() {
            // Lock order: random source, then topology.
            let mut rng = self.rng.lock();
            let mut topology = self.topology.write();
            debug!(%command, "Write lock acquired");
            let outcome = apply(&mut topology, command, &mut **rng)?;
            let text = outcome.render(&topology);
            Ok((outcome, text))
        } else {
            let topology = self.topology.read();
            let outcome = query(&topology, command)?;
            let text = outcome.render(&topology);
            Ok((outcome, text))
        }
    }

    /// Run a command and return only the protocol text
    pub fn execute(&self, command: &Command) -> Result<String, DispatchError> {
        self.dispatch(command).map(|(_, text)| text)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Topology {
        self.topology.read().clone()
    }

    /// Run a closure against the current state under the read lock
    pub fn with_topology<T>(&self, f: impl FnOnce(&Topology) -> T) -> T {
        let topology = self.topology.read();
        f(&*topology)
    }

    pub fn into_topology(self) -> Topology {
        self.topology.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use adrn_core::{ScriptedRandom, SeededRandom};

    use super::*;

    #[test]
    fn test_mutation_visible_to_later_reads() {
        let service = TopologyService::new(Topology::seed(), Box::new(ScriptedRandom::new([0])));

        let text = service.execute(&Command::Disaster { count: 1 }).unwrap();
        assert!(text.contains("EDGE:C1,C2,1,FAILED"));

        let line = service
            .execute(&Command::Reroute {
                start: "P1".into(),
                end: "H2".into(),
            })
            .unwrap();
        assert_eq!(line, "SUCCESS|14|P1 -> C1 -> F1 -> H2\n");
        assert_eq!(service.with_topology(|t| t.failed_edges().count()), 1);
    }

    #[test]
    fn test_failed_dispatch_leaves_state() {
        let service = TopologyService::new(Topology::seed(), Box::new(SeededRandom::new(1)));
        let err = service.execute(&Command::Fail {
            a: "P1".into(),
            b: "Q".into(),
        });
        assert!(err.is_err());
        assert_eq!(service.snapshot(), Topology::seed());
    }

    #[test]
    fn test_dispatch_returns_typed_outcome() {
        let service = TopologyService::new(Topology::seed(), Box::new(SeededRandom::new(1)));
        let (outcome, text) = service
            .dispatch(&Command::Reroute {
                start: "P1".into(),
                end: "P1".into(),
            })
            .unwrap();
        assert!(matches!(outcome, Outcome::Reroute(Ok(_))));
        assert_eq!(text, "SUCCESS|0|P1\n");
        assert_eq!(service.into_topology(), Topology::seed());
    }
}
