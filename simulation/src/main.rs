//! ADRN - Adaptive Disaster Rerouting Network
//!
//! Runs one engine command per invocation and prints the line protocol on
//! stdout. With `--state`, link failures persist to the next invocation.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use adrn_core::{RandomSource, Topology};
use adrn_logging::{AdrnSubscriberBuilder, FileConfig, LogConfig, LogGuard, RotationStrategy};
use adrn_routing::components;
use adrn_simulation::{apply, Command, DispatchError, EngineConfig, StateStore, TopologyService};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "adrn",
    about = "Network disaster simulation with failure-aware rerouting",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// State file carried between invocations
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,

    /// JSON topology definition used when no state has been saved
    #[arg(long, global = true, value_name = "PATH")]
    topology: Option<PathBuf>,

    /// Seed for disaster selection (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Emit logs on stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write JSON logs to this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly, or never
    #[arg(long, global = true, default_value = "daily")]
    log_rotation: RotationStrategy,

    /// Override the log level (e.g. "info", "adrn_routing=trace")
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print node count, component count, and every link (the default)
    Dump,

    /// Fail a number of random active links, then dump
    Disaster {
        /// Number of links to fail
        count: usize,
    },

    /// Find the cheapest route over active links
    Reroute { start: String, end: String },

    /// Fail one named link, then dump
    Fail { a: String, b: String },

    /// Keep the topology in memory and read commands from stdin
    Interactive,
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        match self {
            Self::Dump => Some(Command::Dump),
            Self::Disaster { count } => Some(Command::Disaster { count }),
            Self::Reroute { start, end } => Some(Command::Reroute { start, end }),
            Self::Fail { a, b } => Some(Command::Fail { a, b }),
            Self::Interactive => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&cli)?;

    let config = EngineConfig {
        seed: cli.seed,
        state_path: cli.state.clone(),
        topology_path: cli.topology.clone(),
    };
    let topology = config
        .load_topology()
        .context("Failed to load the starting topology")?;
    let mut rng = config.random_source();
    let store = config.state_store();

    match cli.command.unwrap_or(Commands::Dump).into_command() {
        Some(command) => run_once(topology, &command, &mut rng, store.as_ref()),
        None => run_interactive(TopologyService::new(topology, Box::new(rng)), store.as_ref()),
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<LogGuard> {
    let mut config = if cli.verbose {
        LogConfig::development()
    } else {
        match &cli.log_dir {
            Some(dir) => {
                let mut config = LogConfig::production(dir.clone());
                config.console.enabled = true;
                config
            }
            None => LogConfig::default(),
        }
    };
    if let Some(dir) = &cli.log_dir {
        config.file = Some(FileConfig {
            directory: dir.clone(),
            rotation: cli.log_rotation,
            ..FileConfig::default()
        });
    }

    let mut builder = AdrnSubscriberBuilder::new()
        .with_config(config)
        .with_json_console(cli.log_json);
    if let Some(level) = &cli.log_level {
        builder = builder.with_level(level.as_str());
    }
    builder.init().context("Failed to initialize logging")
}

/// Execute one command, persist mutations, and print the result
fn run_once(
    mut topology: Topology,
    command: &Command,
    rng: &mut dyn RandomSource,
    store: Option<&StateStore>,
) -> anyhow::Result<()> {
    let outcome = apply(&mut topology, command, rng)
        .with_context(|| format!("Command `{command}` failed"))?;

    if command.is_mutating() {
        if let Some(store) = store {
            store.save(&topology)?;
            debug!(path = %store.path().display(), "State persisted");
        }
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(outcome.render(&topology).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn run_interactive(service: TopologyService, store: Option<&StateStore>) -> anyhow::Result<()> {
    println!("{}", service.with_topology(Topology::visualize));
    println!("\nInteractive mode. Commands:");
    println!("  dump              - Show status and all links");
    println!("  disaster <n>      - Fail n random active links");
    println!("  fail <a> <b>      - Fail the link between a and b");
    println!("  reroute <a> <b>   - Cheapest route over active links");
    println!("  components        - List connected components");
    println!("  topology          - Draw the link table");
    println!("  help              - Show this list");
    println!("  quit              - Exit");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(input) = lines.next() else {
            break;
        };
        let input = input?;
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(&verb) = parts.first() else {
            continue;
        };

        match verb {
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "help" => {
                println!("  Commands: dump, disaster <n>, fail <a> <b>, reroute <a> <b>,");
                println!("            components, topology, quit");
            }
            "components" => {
                let groups = service.with_topology(components);
                println!("  {} component(s)", groups.len());
                for group in groups {
                    let names: Vec<&str> = group.iter().map(|n| n.as_str()).collect();
                    println!("    {{{}}}", names.join(", "));
                }
            }
            "topology" => {
                println!("{}", service.with_topology(Topology::visualize));
            }
            _ => match Command::parse(&parts).and_then(|command| {
                service.execute(&command).map(|text| (command, text))
            }) {
                Ok((command, text)) => {
                    print!("{text}");
                    if command.is_mutating() {
                        if let Some(store) = store {
                            store.save(&service.snapshot())?;
                        }
                    }
                }
                Err(DispatchError::UnknownCommand(_)) => {
                    println!("  Unknown command: {input}. Type 'help' for the list.");
                }
                Err(e) => {
                    println!("  Error: {e}");
                }
            },
        }
    }

    info!("Interactive session ended");
    Ok(())
}
