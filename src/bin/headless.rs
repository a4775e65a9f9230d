//! Headless Savanna Runner
//!
//! Runs the simulation without a renderer at a fixed timestep, prints a
//! population line once per simulated second and a summary at the end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use savanna::core::{Result, SimulationConfig};
use savanna::ecs::PopulationStats;
use savanna::entity::AnimalRegistry;
use savanna::simulation::build_world;

/// Headless Savanna Runner - deterministic predator/prey simulation
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run the savanna simulation without graphics and report population counts")]
struct Args {
    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    duration: f32,

    /// Ticks per simulated second (overrides the config)
    #[arg(long)]
    tps: Option<u32>,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rabbits to spawn (overrides the config)
    #[arg(long)]
    rabbits: Option<usize>,

    /// Number of wolves to spawn (overrides the config)
    #[arg(long)]
    wolves: Option<usize>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging for the simulation
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Final report
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    simulated_seconds: f32,
    initial: PopulationStats,
    r#final: PopulationStats,
    total_grass: f32,
    history: Vec<PopulationStats>,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(tps) = args.tps {
        config.world.ticks_per_second = tps;
    }
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(rabbits) = args.rabbits {
        config.population.rabbits = rabbits;
    }
    if let Some(wolves) = args.wolves {
        config.population.wolves = wolves;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<RunSummary> {
    let config = load_config(args)?;
    let seed = config.world.seed;
    let tps = config.world.ticks_per_second;
    let dt = config.fixed_dt();
    let total_ticks = (args.duration.max(0.0) * tps as f32).round() as u64;

    let registry = AnimalRegistry::default();
    let (mut world, _) = build_world(config, &registry)?;
    let initial = world.population_stats();
    tracing::info!(seed, tps, ticks = total_ticks, ?initial, "simulation starting");

    let mut history = Vec::new();
    for tick in 1..=total_ticks {
        world.tick(dt);

        if tick % tps as u64 == 0 {
            let stats = world.population_stats();
            if args.format == "text" {
                println!(
                    "t={:>5}s rabbits={:>3} wolves={:>2} corpses={:>2} carrion={:>2}",
                    tick / tps as u64,
                    stats.rabbits,
                    stats.wolves,
                    stats.corpses,
                    stats.carrion
                );
            }
            history.push(stats);
        }
    }

    Ok(RunSummary {
        seed,
        ticks: world.current_tick(),
        simulated_seconds: world.elapsed(),
        initial,
        r#final: world.population_stats(),
        total_grass: world.vegetation().total_grass(),
        history,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();

    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            return ExitCode::FAILURE;
        }
    };

    match args.format.as_str() {
        "json" => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize summary");
                return ExitCode::FAILURE;
            }
        },
        _ => {
            println!("=== Simulation Complete ===");
            println!("Seed: {}", summary.seed);
            println!("Ticks: {} ({:.1}s simulated)", summary.ticks, summary.simulated_seconds);
            println!(
                "Rabbits: {} -> {}   Wolves: {} -> {}",
                summary.initial.rabbits, summary.r#final.rabbits, summary.initial.wolves, summary.r#final.wolves
            );
            println!("Remains: {} corpses, {} carrion", summary.r#final.corpses, summary.r#final.carrion);
            println!("Total grass: {:.0}", summary.total_grass);
        }
    }

    ExitCode::SUCCESS
}
