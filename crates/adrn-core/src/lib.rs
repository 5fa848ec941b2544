//! # ADRN Core
//!
//! Core types, the topology store, and errors for the ADRN resilience engine.
//!
//! ADRN models a network of labelled nodes joined by weighted links, fails
//! links to simulate localized disasters, and finds the cheapest surviving
//! route between two endpoints. This crate holds the pieces every other
//! layer operates on.
//!
//! ## Key Types
//!
//! - [`Topology`]: The node/link store with all-or-nothing mutation
//! - [`NodeId`], [`EdgeKey`], [`Edge`], [`EdgeStatus`]: Topology elements
//! - [`Path`]: A routed node sequence with its total cost
//! - [`TopologySnapshot`]: Serializable state, also used as a definition file
//! - [`RandomSource`]: Injectable randomness for failure selection
//!
//! ## Example
//!
//! ```rust
//! use adrn_core::{NodeId, Topology};
//!
//! let mut topology = Topology::seed();
//! let c1 = NodeId::new("C1").unwrap();
//! let c2 = NodeId::new("C2").unwrap();
//! topology.fail_edge(&c1, &c2).unwrap();
//! assert_eq!(topology.failed_edges().count(), 1);
//! ```

pub mod error;
pub mod random;
pub mod snapshot;
pub mod topology;
pub mod types;

pub use error::*;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use snapshot::{EdgeRecord, TopologySnapshot};
pub use topology::{from_edges, Topology, TopologyBuilder, SEED_LINKS};
pub use types::*;
