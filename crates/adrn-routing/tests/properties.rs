//! Property checks for connectivity and routing
//!
//! Random small topologies (seeded, so failures reproduce) are checked
//! against brute-force enumeration of every simple path.

use adrn_core::{EdgeStatus, NodeId, RouteFailure, Topology};
use adrn_routing::{components, count_components, route, same_component};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const GRAPHS: u64 = 200;

fn random_topology(rng: &mut ChaCha8Rng) -> Topology {
    let node_count = rng.random_range(1..=7);
    let mut builder = Topology::builder();
    for i in 0..node_count {
        builder = builder.add_node(format!("N{i}"));
    }
    for a in 0..node_count {
        for b in (a + 1)..node_count {
            if rng.random_bool(0.45) {
                let status = if rng.random_bool(0.3) {
                    EdgeStatus::Failed
                } else {
                    EdgeStatus::Active
                };
                let cost = rng.random_range(0..6);
                builder = builder.add_edge_with_status(format!("N{a}"), format!("N{b}"), cost, status);
            }
        }
    }
    builder.build().unwrap()
}

/// Every simple path over ACTIVE links from `start` to `end`, with its cost
fn all_paths(topology: &Topology, start: &NodeId, end: &NodeId) -> Vec<(u64, Vec<NodeId>)> {
    fn walk(
        topology: &Topology,
        end: &NodeId,
        path: &mut Vec<NodeId>,
        cost: u64,
        out: &mut Vec<(u64, Vec<NodeId>)>,
    ) {
        let Some(current) = path.last().cloned() else {
            return;
        };
        if &current == end {
            out.push((cost, path.clone()));
            return;
        }
        let next: Vec<(NodeId, u32)> = topology
            .active_neighbors(&current)
            .map(|(n, c)| (n.clone(), c))
            .collect();
        for (neighbor, link_cost) in next {
            if path.contains(&neighbor) {
                continue;
            }
            path.push(neighbor);
            walk(topology, end, path, cost + u64::from(link_cost), out);
            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(topology, end, &mut vec![start.clone()], 0, &mut out);
    out
}

#[test]
fn test_route_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xADE7);

    for _ in 0..GRAPHS {
        let topology = random_topology(&mut rng);
        let nodes: Vec<NodeId> = topology.nodes().cloned().collect();

        for start in &nodes {
            for end in &nodes {
                let result = route(&topology, start, end);
                let expected = all_paths(&topology, start, end).into_iter().min();

                match (result, expected) {
                    (Ok(path), Some((cost, sequence))) => {
                        assert_eq!(u64::from(path.cost), cost, "cost {start}->{end}");
                        assert_eq!(path.nodes, sequence, "tie-break {start}->{end}");
                    }
                    (Err(RouteFailure::NoPath { .. }), None) => {
                        assert_eq!(same_component(&topology, start, end), Some(false));
                    }
                    (other, expected) => {
                        panic!("{start}->{end}: got {other:?}, brute force {expected:?}")
                    }
                }
            }
        }
    }
}

#[test]
fn test_routes_never_use_failed_links() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..GRAPHS {
        let topology = random_topology(&mut rng);
        let nodes: Vec<NodeId> = topology.nodes().cloned().collect();

        for start in &nodes {
            for end in &nodes {
                if let Ok(path) = route(&topology, start, end) {
                    let mut total = 0u32;
                    for key in path.edge_keys() {
                        let edge = topology.edge(&key).expect("path follows real links");
                        assert!(edge.is_active(), "{key} is failed");
                        total += edge.cost;
                    }
                    assert_eq!(total, path.cost);
                }
            }
        }
    }
}

#[test]
fn test_no_path_exactly_when_components_differ() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..GRAPHS {
        let topology = random_topology(&mut rng);
        let groups = components(&topology);
        assert_eq!(groups.len(), count_components(&topology));
        assert!(count_components(&topology) >= 1);

        for start in topology.nodes() {
            for end in topology.nodes() {
                let together = groups.iter().any(|g| g.contains(start) && g.contains(end));
                let routed = route(&topology, start, end);
                assert_eq!(routed.is_ok(), together, "{start}->{end}");
                if !together {
                    assert!(matches!(routed, Err(RouteFailure::NoPath { .. })));
                }
            }
        }
    }
}

#[test]
fn test_components_equal_nodes_when_nothing_is_active() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for _ in 0..50 {
        let mut topology = random_topology(&mut rng);
        let keys: Vec<_> = topology.edges().map(|e| e.key.clone()).collect();
        for key in &keys {
            topology.set_edge_status(key, EdgeStatus::Failed).unwrap();
        }
        assert_eq!(count_components(&topology), topology.node_count());
    }
}
