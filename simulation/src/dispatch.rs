//! Command dispatch
//!
//! Maps one invocation mode onto the engine and returns a typed [`Outcome`].
//! Text is produced only by [`Outcome::render`].
//!
//! Reads ([`query`]) borrow the topology immutably; mutations ([`apply`])
//! need exclusive access plus a random source.

use std::fmt;

use adrn_core::{EdgeKey, NodeId, Path, RandomSource, RouteFailure, Topology};
use adrn_routing::route;
use tracing::{debug, info};

use crate::disaster::{fail_link, inject_failures, DisasterReport};
use crate::error::DispatchError;
use crate::protocol::{encode_route, encode_snapshot};

/// A single engine request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current topology
    Dump,
    /// Fail `count` random active links, then print the topology
    Disaster { count: usize },
    /// Find the cheapest route between two labels
    Reroute { start: String, end: String },
    /// Fail one named link, then print the topology
    Fail { a: String, b: String },
}

impl Command {
    /// Parse positional words, e.g. `["reroute", "P1", "H2"]`
    ///
    /// No words means [`Command::Dump`].
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, DispatchError> {
        let words: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        match words.as_slice() {
            [] | ["dump"] => Ok(Self::Dump),
            ["disaster", count] => {
                let count = count
                    .parse::<usize>()
                    .map_err(|_| DispatchError::InvalidArgument {
                        command: "disaster",
                        reason: format!("count must be a non-negative integer, got {count:?}"),
                    })?;
                Ok(Self::Disaster { count })
            }
            ["reroute", start, end] => Ok(Self::Reroute {
                start: start.to_string(),
                end: end.to_string(),
            }),
            ["fail", a, b] => Ok(Self::Fail {
                a: a.to_string(),
                b: b.to_string(),
            }),
            _ => Err(DispatchError::UnknownCommand(words.join(" "))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dump => "dump",
            Self::Disaster { .. } => "disaster",
            Self::Reroute { .. } => "reroute",
            Self::Fail { .. } => "fail",
        }
    }

    /// Whether the command changes link status
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Disaster { .. } | Self::Fail { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dump => write!(f, "dump"),
            Self::Disaster { count } => write!(f, "disaster {count}"),
            Self::Reroute { start, end } => write!(f, "reroute {start} {end}"),
            Self::Fail { a, b } => write!(f, "fail {a} {b}"),
        }
    }
}

/// Typed result of a dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Snapshot,
    Disaster(DisasterReport),
    Failed(EdgeKey),
    Reroute(Result<Path, RouteFailure>),
}

impl Outcome {
    /// Serialize for the primary output channel
    ///
    /// Snapshot-style outcomes render the topology as it is after the
    /// command ran.
    pub fn render(&self, topology: &Topology) -> String {
        match self {
            Self::Reroute(result) => encode_route(result),
            Self::Snapshot | Self::Disaster(_) | Self::Failed(_) => encode_snapshot(topology),
        }
    }
}

/// Run a read-only command
///
/// # Errors
///
/// [`DispatchError::RequiresWrite`] for mutating commands.
pub fn query(topology: &Topology, command: &Command) -> Result<Outcome, DispatchError> {
    match command {
        Command::Dump => Ok(Outcome::Snapshot),
        Command::Reroute { start, end } => Ok(Outcome::Reroute(reroute(topology, start, end))),
        Command::Disaster { .. } | Command::Fail { .. } => {
            Err(DispatchError::RequiresWrite(command.name()))
        }
    }
}

/// Run any command with exclusive access to the topology
pub fn apply<R>(
    topology: &mut Topology,
    command: &Command,
    rng: &mut R,
) -> Result<Outcome, DispatchError>
where
    R: RandomSource + ?Sized,
{
    debug!(%command, "Dispatching");
    match command {
        Command::Disaster { count } => {
            let report = inject_failures(topology, *count, rng)?;
            Ok(Outcome::Disaster(report))
        }
        Command::Fail { a, b } => {
            let a = NodeId::new(a.as_str())?;
            let b = NodeId::new(b.as_str())?;
            let key = fail_link(topology, &a, &b)?;
            Ok(Outcome::Failed(key))
        }
        Command::Dump | Command::Reroute { .. } => query(topology, command),
    }
}

/// Route between raw labels; a label that is not a valid id is simply unknown
fn reroute(topology: &Topology, start: &str, end: &str) -> Result<Path, RouteFailure> {
    let start = NodeId::new(start).map_err(|_| RouteFailure::UnknownNode(start.to_string()))?;
    let end = NodeId::new(end).map_err(|_| RouteFailure::UnknownNode(end.to_string()))?;
    let result = route(topology, &start, &end);
    match &result {
        Ok(path) => info!(%start, %end, cost = path.cost, "Reroute succeeded"),
        Err(failure) => info!(%start, %end, %failure, "Reroute failed"),
    }
    result
}
