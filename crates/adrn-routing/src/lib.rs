//! # ADRN Routing
//!
//! Failure-aware graph analysis for the ADRN engine.
//!
//! Both components read a [`Topology`](adrn_core::Topology) and only ever
//! consider ACTIVE links; neither mutates it.
//!
//! ## Core Components
//!
//! - [`count_components`] / [`components`]: Connectivity analysis via union-find
//! - [`route`]: Minimum-cost path between two nodes via Dijkstra
//!
//! ## Tie-breaking
//!
//! When several paths share the minimum cost, [`route`] returns the one whose
//! node sequence is lexicographically smallest.
//!
//! ## Example
//!
//! ```rust
//! use adrn_core::{NodeId, Topology};
//! use adrn_routing::{count_components, route};
//!
//! let mut topology = Topology::seed();
//! let id = |s: &str| NodeId::new(s).unwrap();
//! topology.fail_edge(&id("C1"), &id("C2")).unwrap();
//!
//! assert_eq!(count_components(&topology), 1);
//! let path = route(&topology, &id("P1"), &id("H2")).unwrap();
//! assert_eq!(path.to_string(), "P1 -> C1 -> F1 -> H2");
//! assert_eq!(path.cost, 14);
//! ```

pub mod connectivity;
pub mod router;

pub use connectivity::{components, count_components, same_component, DisjointSets};
pub use router::route;

// Re-export core routing types for convenience
pub use adrn_core::{Path, RouteFailure};
