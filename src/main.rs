use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::runtime::Builder;
use tracing::Level;

use linkstate_sim::config::{OutputFormat, SimulationConfig};
use linkstate_sim::network::{Topology, generate_topology};
use linkstate_sim::{ChangeKind, ChangeSimulator, ConflictPolicy, Convergence, ConvergenceEngine};

#[derive(Parser)]
#[command(name = "linkstate-sim", about = "Simulate link-state routing convergence")]
struct Cli {
    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    nodes: Option<usize>,

    #[arg(long)]
    probability: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    change: Option<ChangeKind>,

    /// How to settle LSAs that disagree on a link cost
    #[arg(long, value_enum)]
    conflict_policy: Option<ConflictPolicy>,

    /// Compute routing tables on worker threads
    #[arg(long)]
    parallel: bool,

    /// Print routing tables as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<(SimulationConfig, u8)> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load_from_file(path)
                .with_context(|| format!("loading configuration from {path}"))?,
            None => SimulationConfig::default(),
        };

        if let Some(nodes) = self.nodes {
            config.node_count = nodes;
        }
        if let Some(probability) = self.probability {
            config.connection_probability = probability;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(change) = self.change {
            config.change = change;
        }
        if let Some(policy) = self.conflict_policy {
            config.conflict_policy = policy;
        }
        config.parallel |= self.parallel;
        if self.json {
            config.output = OutputFormat::Json;
        }
        Ok((config, self.verbose))
    }
}

fn init_tracing(config: &SimulationConfig, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.parse::<Level>().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let (config, verbose) = Cli::parse().into_config()?;
    init_tracing(&config, verbose);

    let rt = Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(simulate(config))
}

async fn simulate(config: SimulationConfig) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let topology = generate_topology(config.node_count, config.connection_probability, &mut rng)?;
    println!(
        "Initial topology: {} routers, {} links",
        topology.router_count(),
        topology.link_count()
    );
    for link in topology.links() {
        println!("  {link}");
    }

    let engine = ConvergenceEngine::new(config.conflict_policy);
    let before = converge(&engine, &topology, config.parallel).await?;
    print_tables(&before, config.output)?;

    let change = ChangeSimulator::new(rng).apply(&topology, config.change)?;
    println!("\nTopology change: {}", change.record);

    let after = converge(&engine, &change.topology, config.parallel).await?;
    println!("Updated routing tables:");
    print_tables(&after, config.output)?;

    Ok(())
}

async fn converge(
    engine: &ConvergenceEngine,
    topology: &Topology,
    parallel: bool,
) -> Result<Convergence> {
    let convergence = if parallel {
        engine.run_parallel(topology).await?
    } else {
        engine.run(topology)?
    };
    Ok(convergence)
}

fn print_tables(convergence: &Convergence, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => print!("{}", convergence.report()),
        OutputFormat::Json => println!("{}", convergence.to_json()?),
    }
    Ok(())
}
