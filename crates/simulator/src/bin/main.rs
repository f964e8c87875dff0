//! fastsir Simulator CLI
//!
//! Run seeded SIR simulations on generated or loaded contact networks.
//!
//! # Example
//!
//! ```bash
//! # Continuous-time run on a sparse random graph
//! fastsir-sim --seed 42 -n 10000 --degree 6 --transmissibility 0.3
//!
//! # 64 discrete-time runs from a configuration file, JSON on stdout
//! fastsir-sim --config outbreak.toml --model discrete --runs 64 --json
//! ```

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use fastsir_simulator::{
    GraphConfig, InfectionTable, ModelKind, Seeding, Simulator, SimulatorConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Model {
    Continuous,
    Discrete,
    Annealed,
}

/// fastsir Simulator
///
/// Runs SIR contagion on networks. Reproducible when the same seed is used.
/// Flags override values read from `--config`.
#[derive(Parser, Debug)]
#[command(name = "fastsir-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Event generation strategy
    #[arg(short, long, value_enum)]
    model: Option<Model>,

    /// Number of nodes
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Mean degree of the random graph, or the degree of the annealed network
    #[arg(short, long)]
    degree: Option<usize>,

    /// Edge probability of the random graph (overrides --degree for the graph)
    #[arg(long)]
    edge_prob: Option<f64>,

    /// Read the network from an edge-list file
    #[arg(long)]
    edges: Option<PathBuf>,

    /// Recovery rate, or per-tick recovery probability for the discrete model
    #[arg(short, long)]
    recovery: Option<f64>,

    /// Per-contact transmissibility; infection is 1 - (1 - q)^k
    #[arg(short, long)]
    transmissibility: Option<f64>,

    /// Fraction of nodes infected at the start
    #[arg(short = 'f', long)]
    initial_fraction: Option<f64>,

    /// Simulated time to evolve
    #[arg(short, long)]
    period: Option<f64>,

    /// Spacing of the prevalence samples
    #[arg(long)]
    sample_interval: Option<f64>,

    /// Number of independent runs
    #[arg(long)]
    runs: Option<usize>,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Record the transmission tree
    #[arg(long)]
    transmissions: bool,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,fastsir_simulator=info")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    info!(
        model = ?config.model,
        graph = ?config.graph,
        recovery = config.recovery,
        period = config.period,
        runs = config.runs,
        seed = config.seed,
        "Starting simulation"
    );

    let simulator = Simulator::new(config).context("Failed to create simulator")?;

    if simulator.config().runs == 1 {
        let report = simulator.run()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print_summary();
        }
    } else {
        let report = simulator.run_ensemble()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print_summary();
        }
    }
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => SimulatorConfig::default(),
    };

    let nodes = args.nodes.unwrap_or(1000);
    let degree = args.degree.unwrap_or(4);

    if let Some(model) = args.model {
        config.model = match model {
            Model::Continuous => ModelKind::Continuous,
            Model::Discrete => ModelKind::Discrete,
            Model::Annealed => ModelKind::Annealed { nodes, degree },
        };
    } else if let ModelKind::Annealed {
        nodes: configured_nodes,
        degree: configured_degree,
    } = &mut config.model
    {
        if let Some(nodes) = args.nodes {
            *configured_nodes = nodes;
        }
        if let Some(degree) = args.degree {
            *configured_degree = degree;
        }
    }

    if let Some(path) = &args.edges {
        config.graph = GraphConfig::EdgeList { path: path.clone() };
    } else if let Some(edge_probability) = args.edge_prob {
        config.graph = GraphConfig::ErdosRenyi {
            nodes,
            edge_probability,
        };
    } else if args.nodes.is_some() || args.degree.is_some() || args.config.is_none() {
        if nodes < 2 {
            bail!("a random graph needs at least two nodes");
        }
        config.graph = GraphConfig::ErdosRenyi {
            nodes,
            edge_probability: (degree as f64 / (nodes - 1) as f64).min(1.0),
        };
    }

    if let Some(recovery) = args.recovery {
        config.recovery = recovery;
    }
    if let Some(transmissibility) = args.transmissibility {
        config.infection = Some(InfectionTable::Independent { transmissibility });
    }
    if let Some(fraction) = args.initial_fraction {
        config.seeding = Seeding::Fraction(fraction);
    }
    if let Some(period) = args.period {
        config.period = period;
    }
    if let Some(interval) = args.sample_interval {
        config.sample_interval = interval;
    }
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    } else if args.config.is_none() {
        config.seed = rand::random();
    }
    if args.transmissions {
        config.record_transmissions = true;
    }

    config.validate()?;
    Ok(config)
}
