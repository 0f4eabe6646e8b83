use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use warforge_data::Biome;
use warforge_lib::model::config::AppConfig;
use warforge_lib::model::metrics::init_logging;
use warforge_lib::model::narrative::{DisabledEnhancer, HttpEnhancer, NarrativeEnhancer};
use warforge_lib::model::pipeline::{summarize, GenerationRequest, Seed};
use warforge_lib::Simulation;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deterministic tactical scenario generator", long_about = None)]
struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a scenario and print its summary as JSON
    Generate {
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        biome: Option<Biome>,
        /// Ask the configured enhancer for mission briefings
        #[arg(long)]
        enhance: bool,
    },
    /// Generate, apply commands, then tick
    Run {
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = 10)]
        ticks: u32,
        /// Seconds per tick; defaults to `[simulation] tick_dt`
        #[arg(long)]
        dt: Option<f64>,
        /// Override command, applied before the first tick (repeatable)
        #[arg(long = "command")]
        commands: Vec<String>,
    },
}

fn init_tracing() {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => init_logging(),
    }
}

fn load_config(path: &str) -> Result<AppConfig> {
    if !Path::new(path).exists() {
        return Ok(AppConfig::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing config {path}"))
}

fn enhancer(config: &AppConfig) -> Box<dyn NarrativeEnhancer> {
    match HttpEnhancer::from_config(&config.enhancer) {
        Ok(http) => Box::new(http),
        Err(e) => {
            tracing::warn!(error = %e, "Enhancer unavailable, using procedural briefings");
            Box::new(DisabledEnhancer)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    tracing::debug!(fingerprint = %config.fingerprint(), "Config loaded");

    match cli.cmd {
        Cmd::Generate {
            seed,
            width,
            height,
            biome,
            enhance,
        } => {
            let mut request = GenerationRequest::from_config(&config);
            request.seed = seed.map(Seed::Text);
            request.width = width.unwrap_or(request.width);
            request.height = height.unwrap_or(request.height);
            request.primary_biome = biome.or(request.primary_biome);
            request.enhance |= enhance;

            let sim = if request.enhance {
                let enhancer = enhancer(&config);
                Simulation::generate_enhanced(config, &request, enhancer.as_ref()).await?
            } else {
                Simulation::generate(config, &request)?
            };
            let summary = summarize(&sim.snapshot());
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Cmd::Run {
            seed,
            ticks,
            dt,
            commands,
        } => {
            let dt = dt.unwrap_or(config.simulation.tick_dt);
            let mut request = GenerationRequest::from_config(&config);
            request.seed = seed.map(Seed::Text);
            let mut sim = Simulation::generate(config, &request)?;
            println!("seed {} ({} entities)", sim.metadata.seed, sim.entities.len());

            for text in &commands {
                match sim.submit_command(text, "cli") {
                    Some(result) if result.success => println!("applied: {text}"),
                    Some(result) => println!(
                        "rejected: {text} ({})",
                        result.error.unwrap_or_default()
                    ),
                    None => println!("ignored: {text}"),
                }
            }

            for _ in 0..ticks {
                let summary = sim.tick(dt)?;
                println!(
                    "tick {:>4}: {} changed, {} combat events",
                    summary.tick,
                    summary.changed,
                    summary.combat_events.len()
                );
            }
            println!("living: {}/{}", sim.living(), sim.entities.len());
            println!("checksum: {}", sim.checksum()?);
        }
    }

    Ok(())
}
