//! Headless MOBA match runner.
//!
//! Drafts and plays matches without any UI. Results go to stdout as JSON,
//! logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Play one match on a generated roster
//! cargo run -p moba_headless -- run --seed 7
//!
//! # Play one match from a scenario file with custom tuning
//! cargo run -p moba_headless -- run --seed 7 --scenario lck.ron --config sim.ron
//!
//! # Run a batch balance test
//! cargo run -p moba_headless -- batch --count 1000 --seed 0 --output results/batch.json
//!
//! # Print a generated scenario to edit by hand
//! cargo run -p moba_headless -- generate --seed 3 > lck.ron
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use moba_core::config::SimConfig;
use moba_core::match_sim::MatchId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moba_headless::{
    batch::{run_batch, verify_determinism, BatchConfig},
    error::Result,
    game_runner::{run_game, GameConfig},
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "moba_headless")]
#[command(about = "Headless MOBA match runner for balance checks and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft and play a single match
    Run {
        /// Random seed for draft and match
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Simulation config file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Scenario file (RON); a generated roster is used when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Match id for the report
        #[arg(long, default_value = "1")]
        match_id: u64,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Run a batch of matches for balance testing
    Batch {
        /// Number of matches to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Maximum parallel matches (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Simulation config file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Scenario file (RON) shared by every match
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Save full results (JSON) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify determinism by running the same seed multiple times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,

        /// Scenario file (RON)
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Print the generated scenario for a seed as RON
    Generate {
        /// Seed for the roster
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for results)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let result = match cli.command {
        Some(Commands::Run {
            seed,
            config,
            scenario,
            match_id,
            pretty,
        }) => cmd_run(seed, config, scenario, match_id, pretty),
        Some(Commands::Batch {
            count,
            seed,
            parallel,
            config,
            scenario,
            output,
        }) => cmd_batch(count, seed, parallel, config, scenario, output),
        Some(Commands::Verify {
            seed,
            runs,
            scenario,
        }) => cmd_verify(seed, runs, scenario),
        Some(Commands::Generate { seed }) => cmd_generate(seed),
        None => cmd_run(0, None, None, 1, false),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn load_sim_config(path: Option<PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading simulation config from {:?}", path);
            Ok(SimConfig::load(path)?)
        }
        None => Ok(SimConfig::default()),
    }
}

fn load_scenario(path: Option<PathBuf>) -> Result<Option<Scenario>> {
    match path {
        Some(path) => {
            let scenario = Scenario::load(&path)?;
            tracing::info!(
                "Loaded scenario '{}' from {:?}: {} champions",
                scenario.name,
                path,
                scenario.champions.len()
            );
            Ok(Some(scenario))
        }
        None => Ok(None),
    }
}

/// Draft and play one match, print its report
fn cmd_run(
    seed: u64,
    config: Option<PathBuf>,
    scenario: Option<PathBuf>,
    match_id: u64,
    pretty: bool,
) -> Result<()> {
    let sim = load_sim_config(config)?;
    let scenario = load_scenario(scenario)?.unwrap_or_else(|| Scenario::generated(seed));

    let result = run_game(&GameConfig {
        seed,
        match_id: MatchId(match_id),
        scenario,
        sim,
    })?;

    let json = if pretty {
        serde_json::to_string_pretty(&result.report)?
    } else {
        serde_json::to_string(&result.report)?
    };
    println!("{json}");
    Ok(())
}

/// Run batch of matches for balance testing
fn cmd_batch(
    count: u32,
    seed: u64,
    parallel: u32,
    config: Option<PathBuf>,
    scenario: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let sim = load_sim_config(config)?;
    let scenario = load_scenario(scenario)?;

    let batch_config = BatchConfig::new(count)
        .with_seed(seed)
        .with_parallel(parallel)
        .with_sim_config(sim);
    let results = run_batch(batch_config, scenario.as_ref());

    if let Some(path) = output {
        results.save(&path)?;
        tracing::info!("Saved batch results to {:?}", path);
    }

    if !results.summary.is_balanced(0.1) {
        tracing::warn!(
            "Side imbalance: blue wins {:.1}%",
            results.summary.blue_win_rate * 100.0
        );
    }

    println!("{}", serde_json::to_string_pretty(&results.summary)?);
    Ok(())
}

/// Verify determinism
fn cmd_verify(seed: u64, runs: u32, scenario: Option<PathBuf>) -> Result<()> {
    let scenario = load_scenario(scenario)?;
    let deterministic = verify_determinism(scenario.as_ref(), seed, runs)?;

    if deterministic {
        tracing::info!("Determinism verified: {} runs of seed {}", runs, seed);
    } else {
        tracing::error!("Determinism check FAILED for seed {}", seed);
        std::process::exit(2);
    }
    Ok(())
}

/// Print a generated scenario
fn cmd_generate(seed: u64) -> Result<()> {
    println!("{}", Scenario::generated(seed).to_ron_string()?);
    Ok(())
}
