//! End-to-end scenarios on the 8-node fixture
//!
//! Each test drives the engine the way a host does: parse a command, apply
//! it to the topology, render the protocol text.

use adrn_core::{RandomSource, ScriptedRandom, SeededRandom, Topology};
use adrn_simulation::{
    apply, parse_route_line, parse_snapshot, Command, EngineConfig, RouteLine, StateStore,
};

/// Parse and run one invocation, returning the primary output
fn run(topology: &mut Topology, words: &[&str], rng: &mut dyn RandomSource) -> String {
    let command = Command::parse(words).unwrap();
    apply(topology, &command, rng).unwrap().render(topology)
}

fn has_line(text: &str, expected: &str) -> bool {
    text.lines().any(|line| line == expected)
}

#[test]
fn test_initial_dump_is_connected() {
    let mut topology = Topology::seed();
    let out = run(&mut topology, &[], &mut SeededRandom::new(0));

    assert!(has_line(&out, "STATUS_NODES:8"));
    assert!(has_line(&out, "STATUS_COMPONENTS:1"));
    assert_eq!(out.lines().filter(|l| l.ends_with(",ACTIVE")).count(), 11);
}

#[test]
fn test_disaster_fails_core_link_graph_stays_connected() {
    let mut topology = Topology::seed();
    let out = run(&mut topology, &["disaster", "1"], &mut ScriptedRandom::new([0]));

    assert!(has_line(&out, "EDGE:C1,C2,1,FAILED"));
    assert!(has_line(&out, "STATUS_COMPONENTS:1"));
    assert_eq!(out.lines().filter(|l| l.ends_with(",FAILED")).count(), 1);
}

#[test]
fn test_reroute_avoids_failed_core_link() {
    let mut topology = Topology::seed();
    let mut rng = ScriptedRandom::new([0]);
    run(&mut topology, &["disaster", "1"], &mut rng);

    let out = run(&mut topology, &["reroute", "P1", "H2"], &mut rng);
    assert_eq!(out, "SUCCESS|14|P1 -> C1 -> F1 -> H2\n");
}

#[test]
fn test_reroute_to_self() {
    let mut topology = Topology::seed();
    let out = run(&mut topology, &["reroute", "P1", "P1"], &mut SeededRandom::new(0));
    assert_eq!(out, "SUCCESS|0|P1\n");
}

#[test]
fn test_reroute_unknown_node() {
    let mut topology = Topology::seed();
    let out = run(&mut topology, &["reroute", "P1", "Z"], &mut SeededRandom::new(0));
    assert_eq!(out, "FAILED|N/A|unknown node: Z\n");
}

#[test]
fn test_reroute_to_isolated_node() {
    let mut topology = Topology::seed();
    let mut rng = SeededRandom::new(0);
    run(&mut topology, &["fail", "C1", "F2"], &mut rng);
    let dump = run(&mut topology, &["fail", "P2", "F2"], &mut rng);
    assert!(has_line(&dump, "STATUS_COMPONENTS:2"));

    let out = run(&mut topology, &["reroute", "P1", "F2"], &mut rng);
    assert_eq!(out, "FAILED|N/A|no path available\n");
}

#[test]
fn test_total_outage_every_node_alone() {
    let mut topology = Topology::seed();
    let out = run(&mut topology, &["disaster", "100"], &mut SeededRandom::new(3));
    assert!(has_line(&out, "STATUS_COMPONENTS:8"));

    // Self-routes still succeed with nothing active
    let out = run(&mut topology, &["reroute", "H1", "H1"], &mut SeededRandom::new(3));
    assert_eq!(out, "SUCCESS|0|H1\n");
}

#[test]
fn test_output_parses_with_protocol_grammar() {
    let mut topology = Topology::seed();
    let mut rng = SeededRandom::new(2024);
    let dump = run(&mut topology, &["disaster", "4"], &mut rng);

    let parsed = parse_snapshot(&dump).unwrap();
    assert_eq!(parsed.node_count, 8);
    assert_eq!(parsed.edges.len(), 11);
    assert_eq!(parsed.into_topology().unwrap(), topology);

    let line = run(&mut topology, &["reroute", "P1", "P2"], &mut rng);
    match parse_route_line(&line).unwrap() {
        RouteLine::Success { nodes, .. } => {
            assert_eq!(nodes.first().map(|n| n.as_str()), Some("P1"));
            assert_eq!(nodes.last().map(|n| n.as_str()), Some("P2"));
        }
        RouteLine::Failed { reason } => assert_eq!(reason, "no path available"),
    }
}

#[test]
fn test_failures_persist_across_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default()
        .with_seed(7)
        .with_state_path(dir.path().join("state.json"));

    // First invocation: targeted failure, saved by the host
    let mut topology = config.load_topology().unwrap();
    let command = Command::parse(&["fail", "C1", "C2"]).unwrap();
    apply(&mut topology, &command, &mut config.random_source()).unwrap();
    let store: StateStore = config.state_store().unwrap();
    store.save(&topology).unwrap();

    // Second invocation sees it
    let mut topology = config.load_topology().unwrap();
    let out = run(&mut topology, &["reroute", "P1", "H2"], &mut config.random_source());
    assert_eq!(out, "SUCCESS|14|P1 -> C1 -> F1 -> H2\n");
}

#[test]
fn test_unknown_command_leaves_state() {
    assert!(Command::parse(&["meltdown", "now"]).is_err());

    let mut topology = Topology::seed();
    let command = Command::parse(&["fail", "P1", "P2"]).unwrap();
    assert!(apply(&mut topology, &command, &mut SeededRandom::new(0)).is_err());
    assert_eq!(topology, Topology::seed());
}
