//! Line protocol encoding and parsing
//!
//! Snapshot output (DUMP, DISASTER and FAIL):
//!
//! ```text
//! STATUS_NODES:<int>
//! STATUS_COMPONENTS:<int>
//! NODE:<id>
//! EDGE:<from>,<to>,<cost>,<ACTIVE|FAILED>
//! ```
//!
//! Reroute output is a single line, `SUCCESS|<cost>|A -> B -> C` or
//! `FAILED|N/A|<reason>`.
//!
//! Engine results stay typed until they reach this module. The parsers exist
//! for clients and for round-trip checks; they ignore unknown prefixes so
//! additive extensions (such as `NODE:`) do not break older readers.

use adrn_core::{Cost, EdgeRecord, EdgeStatus, NodeId, Path, RouteFailure, Topology};
use adrn_routing::count_components;

use crate::error::ProtocolError;

const STATUS_NODES: &str = "STATUS_NODES:";
const STATUS_COMPONENTS: &str = "STATUS_COMPONENTS:";
const NODE: &str = "NODE:";
const EDGE: &str = "EDGE:";
const PATH_SEPARATOR: &str = " -> ";

/// Render the full topology state, one record per line
pub fn encode_snapshot(topology: &Topology) -> String {
    let mut out = format!(
        "{STATUS_NODES}{}\n{STATUS_COMPONENTS}{}\n",
        topology.node_count(),
        count_components(topology)
    );
    for node in topology.nodes() {
        out.push_str(&format!("{NODE}{node}\n"));
    }
    for edge in topology.edges() {
        out.push_str(&format!(
            "{EDGE}{},{},{},{}\n",
            edge.key.first(),
            edge.key.second(),
            edge.cost,
            edge.status
        ));
    }
    out
}

/// Render a reroute result as its single protocol line
pub fn encode_route(result: &Result<Path, RouteFailure>) -> String {
    match result {
        Ok(path) => format!("SUCCESS|{}|{}\n", path.cost, path),
        Err(failure) => format!("FAILED|N/A|{}\n", failure_reason(failure)),
    }
}

/// Human-readable reason carried by a `FAILED` reroute line
pub fn failure_reason(failure: &RouteFailure) -> String {
    match failure {
        RouteFailure::UnknownNode(label) => format!("unknown node: {label}"),
        RouteFailure::NoPath { .. } => "no path available".to_string(),
        RouteFailure::CostOverflow => "path cost overflow".to_string(),
    }
}

/// Snapshot text parsed back into records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSnapshot {
    pub node_count: usize,
    pub components: usize,
    /// Explicit `NODE:` lines, in input order
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeRecord>,
}

impl ParsedSnapshot {
    /// Rebuild a topology from the parsed records
    ///
    /// Without `NODE:` lines the node set is inferred from edge endpoints,
    /// which loses isolated nodes.
    pub fn into_topology(self) -> Result<Topology, ProtocolError> {
        let mut builder = Topology::builder();
        let mut declared = std::collections::BTreeSet::new();

        let endpoints = self.edges.iter().flat_map(|e| [&e.from, &e.to]);
        for node in self.nodes.iter().chain(endpoints) {
            if declared.insert(node.clone()) {
                builder = builder.add_node(node.clone());
            }
        }
        for edge in self.edges {
            builder = builder.add_edge_with_status(edge.from, edge.to, edge.cost, edge.status);
        }
        Ok(builder.build()?)
    }
}

/// Parse snapshot output produced by [`encode_snapshot`]
pub fn parse_snapshot(text: &str) -> Result<ParsedSnapshot, ProtocolError> {
    let mut node_count = None;
    let mut components = None;
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        let malformed = |reason: String| ProtocolError::Malformed {
            line: line_no,
            reason,
        };

        if let Some(value) = line.strip_prefix(STATUS_NODES) {
            node_count = Some(parse_number::<usize>(value).map_err(malformed)?);
        } else if let Some(value) = line.strip_prefix(STATUS_COMPONENTS) {
            components = Some(parse_number::<usize>(value).map_err(malformed)?);
        } else if let Some(value) = line.strip_prefix(NODE) {
            nodes.push(parse_node(value).map_err(malformed)?);
        } else if let Some(value) = line.strip_prefix(EDGE) {
            edges.push(parse_edge(value).map_err(malformed)?);
        }
    }

    Ok(ParsedSnapshot {
        node_count: node_count.ok_or(ProtocolError::MissingStatus("STATUS_NODES"))?,
        components: components.ok_or(ProtocolError::MissingStatus("STATUS_COMPONENTS"))?,
        nodes,
        edges,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("expected a non-negative integer, got {value:?}"))
}

fn parse_node(value: &str) -> Result<NodeId, String> {
    NodeId::new(value.trim()).map_err(|e| e.to_string())
}

fn parse_edge(value: &str) -> Result<EdgeRecord, String> {
    let fields: Vec<&str> = value.split(',').collect();
    let [from, to, cost, status] = fields.as_slice() else {
        return Err(format!("expected 4 comma-separated fields, got {}", fields.len()));
    };
    Ok(EdgeRecord {
        from: parse_node(from)?,
        to: parse_node(to)?,
        cost: parse_number::<Cost>(cost)?,
        status: status.trim().parse::<EdgeStatus>()?,
    })
}

/// A parsed reroute line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLine {
    Success { cost: Cost, nodes: Vec<NodeId> },
    Failed { reason: String },
}

/// Parse the single line produced by [`encode_route`]
pub fn parse_route_line(line: &str) -> Result<RouteLine, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let malformed = |reason: String| ProtocolError::Malformed { line: 1, reason };

    let mut parts = line.splitn(3, '|');
    let (Some(kind), Some(middle), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed(format!("expected 3 '|'-separated fields in {line:?}")));
    };

    match kind {
        "SUCCESS" => {
            let cost = parse_number::<Cost>(middle).map_err(malformed)?;
            let nodes = rest
                .split(PATH_SEPARATOR)
                .map(parse_node)
                .collect::<Result<Vec<_>, _>>()
                .map_err(malformed)?;
            Ok(RouteLine::Success { cost, nodes })
        }
        "FAILED" if middle == "N/A" => Ok(RouteLine::Failed {
            reason: rest.to_string(),
        }),
        "FAILED" => Err(malformed(format!("expected N/A after FAILED, got {middle:?}"))),
        other => Err(malformed(format!("unknown result kind {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn test_seed_snapshot_layout() {
        let text = encode_snapshot(&Topology::seed());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "STATUS_NODES:8");
        assert_eq!(lines[1], "STATUS_COMPONENTS:1");
        assert_eq!(lines[2], "NODE:C1");
        assert_eq!(lines.iter().filter(|l| l.starts_with("NODE:")).count(), 8);
        assert_eq!(lines.iter().filter(|l| l.starts_with("EDGE:")).count(), 11);
        assert!(lines.contains(&"EDGE:C1,C2,1,ACTIVE"));
        assert!(lines.contains(&"EDGE:F2,P2,10,ACTIVE"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_small_snapshot_exact_text() {
        let mut topology = adrn_core::from_edges(&[("B", "A", 3), ("B", "C", 4)]).unwrap();
        topology.fail_edge(&id("C"), &id("B")).unwrap();
        assert_eq!(
            encode_snapshot(&topology),
            "STATUS_NODES:3\n\
             STATUS_COMPONENTS:2\n\
             NODE:A\n\
             NODE:B\n\
             NODE:C\n\
             EDGE:A,B,3,ACTIVE\n\
             EDGE:B,C,4,FAILED\n"
        );
    }

    #[test]
    fn test_failed_edge_is_encoded() {
        let mut topology = Topology::seed();
        topology.fail_edge(&id("C2"), &id("C1")).unwrap();
        let text = encode_snapshot(&topology);
        assert!(text.lines().any(|l| l == "EDGE:C1,C2,1,FAILED"));
    }

    #[test]
    fn test_encode_route_lines() {
        let path = Path {
            nodes: vec![id("P1"), id("C1"), id("F1"), id("H2")],
            cost: 14,
        };
        assert_eq!(encode_route(&Ok(path)), "SUCCESS|14|P1 -> C1 -> F1 -> H2\n");
        assert_eq!(
            encode_route(&Ok(Path::trivial(id("P1")))),
            "SUCCESS|0|P1\n"
        );
        assert_eq!(
            encode_route(&Err(RouteFailure::UnknownNode("Z".into()))),
            "FAILED|N/A|unknown node: Z\n"
        );
        assert_eq!(
            encode_route(&Err(RouteFailure::NoPath {
                start: id("P1"),
                end: id("F2"),
            })),
            "FAILED|N/A|no path available\n"
        );
        assert_eq!(
            encode_route(&Err(RouteFailure::CostOverflow)),
            "FAILED|N/A|path cost overflow\n"
        );
    }

    #[test]
    fn test_snapshot_round_trip_keeps_isolated_nodes() {
        let mut topology = Topology::builder()
            .add_node("A")
            .add_node("B")
            .add_node("LONE")
            .add_edge("A", "B", 3)
            .build()
            .unwrap();
        topology.fail_edge(&id("A"), &id("B")).unwrap();

        let parsed = parse_snapshot(&encode_snapshot(&topology)).unwrap();
        assert_eq!(parsed.node_count, 3);
        assert_eq!(parsed.components, 3);
        assert_eq!(parsed.into_topology().unwrap(), topology);
    }

    #[test]
    fn test_parse_without_node_lines() {
        let text = "STATUS_NODES:2\nSTATUS_COMPONENTS:1\nEDGE:A,B,4,ACTIVE\n";
        let parsed = parse_snapshot(text).unwrap();
        assert!(parsed.nodes.is_empty());
        let topology = parsed.into_topology().unwrap();
        assert_eq!(topology.node_count(), 2);
    }

    #[test]
    fn test_parse_ignores_unknown_prefixes() {
        let text = "# comment\nSTATUS_NODES:1\nSTATUS_COMPONENTS:1\nNODE:A\nEXTRA:whatever\n";
        let parsed = parse_snapshot(text).unwrap();
        assert_eq!(parsed.nodes, vec![id("A")]);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        let err = parse_snapshot("STATUS_NODES:x\n").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { line: 1, .. }));

        let err = parse_snapshot("STATUS_NODES:1\nSTATUS_COMPONENTS:1\nEDGE:A,B,1\n").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { line: 3, .. }));

        let err = parse_snapshot("STATUS_NODES:1\nEDGE:A,B,1,BROKEN\n").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { line: 2, .. }));

        let err = parse_snapshot("STATUS_NODES:1\n").unwrap_err();
        assert!(matches!(err, ProtocolError::MissingStatus("STATUS_COMPONENTS")));
    }

    #[test]
    fn test_parse_route_lines() {
        assert_eq!(
            parse_route_line("SUCCESS|14|P1 -> C1 -> F1 -> H2\n").unwrap(),
            RouteLine::Success {
                cost: 14,
                nodes: vec![id("P1"), id("C1"), id("F1"), id("H2")],
            }
        );
        assert_eq!(
            parse_route_line("SUCCESS|0|P1").unwrap(),
            RouteLine::Success {
                cost: 0,
                nodes: vec![id("P1")],
            }
        );
        assert_eq!(
            parse_route_line("FAILED|N/A|unknown node: Z").unwrap(),
            RouteLine::Failed {
                reason: "unknown node: Z".to_string(),
            }
        );
        assert!(parse_route_line("SUCCESS|abc|P1").is_err());
        assert!(parse_route_line("FAILED|12|x").is_err());
        assert!(parse_route_line("MAYBE|1|P1").is_err());
        assert!(parse_route_line("SUCCESS|1").is_err());
    }
}
