//! Tickwire CLI - run signal circuits from the command line

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tickwire::config::{CircuitFile, SimConfig};
use tickwire::engine::CompiledCircuit;
use tickwire::graph::PortRef;
use tickwire::registry::NodeRegistry;
use tickwire::results::CycleResults;
use tickwire::sample_buffer::RollingBuffer;
use tickwire::tick_clock::TickClock;

#[derive(Parser)]
#[command(name = "tickwire")]
#[command(about = "Deterministic multi-tick signal circuit simulator", long_about = None)]
struct Cli {
    /// Config file (TOML); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every built-in node type as JSON
    Catalog,

    /// Evaluate a circuit over the full window
    Run {
        /// Circuit file (.json)
        circuit: PathBuf,

        /// Window length in ticks (overrides config)
        #[arg(short, long)]
        ticks: Option<usize>,

        /// Print the results table as JSON
        #[arg(long)]
        json: bool,

        /// Print the SHA-256 digest of the results
        #[arg(long)]
        digest: bool,
    },

    /// Step a circuit live and show one port's recent values
    Scope {
        /// Circuit file (.json)
        circuit: PathBuf,

        /// Node to watch
        #[arg(short, long)]
        node: usize,

        /// Output port on that node (default: 0)
        #[arg(short, long, default_value = "0")]
        port: usize,

        /// Values to retain (overrides config)
        #[arg(long)]
        capacity: Option<usize>,

        /// Ticks to step (overrides config window)
        #[arg(short, long)]
        ticks: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    match cli.command {
        Commands::Catalog => {
            let registry = NodeRegistry::builtin();
            println!("{}", serde_json::to_string_pretty(&registry.descriptors())?);
        }

        Commands::Run {
            circuit,
            ticks,
            json,
            digest,
        } => {
            let (file, registry) = load_circuit(&circuit)?;
            let compiled = CompiledCircuit::compile(&file.graph, &registry)?;
            let window = ticks.unwrap_or(config.window_ticks);
            let results = compiled.run(&file.stimuli, window)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_table(&results);
            }
            if digest {
                println!("digest: {}", results.digest());
            }
        }

        Commands::Scope {
            circuit,
            node,
            port,
            capacity,
            ticks,
        } => {
            let (file, registry) = load_circuit(&circuit)?;
            let compiled = CompiledCircuit::compile(&file.graph, &registry)?;
            let watched = PortRef::new(node, port);
            if !compiled.columns().contains(&watched) {
                return Err(format!("Node {} has no output port {}", node, port).into());
            }

            let mut scope = RollingBuffer::new(capacity.unwrap_or(config.scope_capacity));
            let mut clock = TickClock::new(config.clock_subdivisions);
            let mut simulation = compiled.simulate(&file.stimuli);

            for _ in 0..ticks.unwrap_or(config.window_ticks) {
                simulation.step()?;
                if let Some(value) = simulation.value(watched) {
                    scope.push(value);
                }
                clock.advance();
                if clock.on_downbeat() {
                    println!(
                        "cycle {:>4} | {}",
                        clock.cycle(),
                        format_values(scope.iter())
                    );
                }
            }

            println!(
                "tick {} (cycle {}, subdivision {}/{})",
                clock.ticks(),
                clock.cycle(),
                clock.subdivision(),
                clock.subdivisions_per_cycle()
            );
            println!("last {}: {}", scope.len(), format_values(scope.iter()));
        }
    }

    Ok(())
}

/// Read a circuit file and prepare a registry that knows its sub-circuits
fn load_circuit(path: &Path) -> Result<(CircuitFile, NodeRegistry), Box<dyn std::error::Error>> {
    let file = CircuitFile::load(path)?;
    let mut registry = NodeRegistry::builtin();
    file.prepare(&mut registry)?;
    Ok((file, registry))
}

fn print_table(results: &CycleResults) {
    let header: Vec<String> = results
        .columns()
        .iter()
        .map(|c| format!("{}.{}", c.node, c.port))
        .collect();
    println!("{:>5} | {}", "tick", format_cells(header));

    for tick in 0..results.ticks() {
        if let Some(row) = results.row(tick) {
            println!("{:>5} | {}", tick, format_values(row.iter().copied()));
        }
    }
}

fn format_values(values: impl Iterator<Item = f32>) -> String {
    format_cells(values.map(|v| format!("{}", v)))
}

fn format_cells(cells: impl IntoIterator<Item = String>) -> String {
    cells
        .into_iter()
        .map(|c| format!("{:>7}", c))
        .collect::<Vec<_>>()
        .join(" ")
}
