//! # ADRN Simulation
//!
//! Disaster injection, command dispatch, and the line protocol for the
//! Adaptive Disaster Rerouting Network engine.
//!
//! ## Overview
//!
//! A host owns a [`Topology`](adrn_core::Topology) and feeds it one
//! [`Command`] at a time:
//!
//! - **Dump**: print node count, component count, and every link
//! - **Disaster**: fail N random active links, then dump
//! - **Fail**: fail one named link, then dump
//! - **Reroute**: print the cheapest surviving path between two nodes
//!
//! Results stay typed ([`Outcome`]) until [`Outcome::render`] turns them
//! into protocol text for stdout. Logs never share that channel.
//!
//! ## Architecture
//!
//! - **Disaster** (`disaster.rs`): Random and targeted link failure
//! - **Protocol** (`protocol.rs`): Encoder and parser for the line protocol
//! - **Dispatch** (`dispatch.rs`): Command parsing and routing to the engine
//! - **Service** (`service.rs`): Lock-guarded state for long-lived hosts
//! - **State** (`state.rs`): JSON state carried between CLI invocations
//! - **Config** (`config.rs`): Seed, state file, and definition file
//!
//! ## Example
//!
//! ```rust
//! use adrn_core::{ScriptedRandom, Topology};
//! use adrn_simulation::{Command, TopologyService};
//!
//! let service = TopologyService::new(Topology::seed(), Box::new(ScriptedRandom::new([0])));
//!
//! // C1-C2 is first in canonical order, so index 0 fails it
//! let dump = service.execute(&Command::parse(&["disaster", "1"]).unwrap()).unwrap();
//! assert!(dump.contains("EDGE:C1,C2,1,FAILED"));
//!
//! let line = service.execute(&Command::parse(&["reroute", "P1", "H2"]).unwrap()).unwrap();
//! assert_eq!(line, "SUCCESS|14|P1 -> C1 -> F1 -> H2\n");
//! ```

pub mod config;
pub mod disaster;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod service;
pub mod state;

pub use config::EngineConfig;
pub use disaster::{fail_link, inject_failures, DisasterReport};
pub use dispatch::{apply, query, Command, Outcome};
pub use error::{DispatchError, ProtocolError, StateError};
pub use protocol::{
    encode_route, encode_snapshot, failure_reason, parse_route_line, parse_snapshot,
    ParsedSnapshot, RouteLine,
};
pub use service::TopologyService;
pub use state::{load_definition, StateStore};
