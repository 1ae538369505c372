//! afl_cli - run seeded matches from the command line.
//!
//! `run` plays one match and prints a summary (or the full JSON response);
//! `batch` plays many seeds in parallel and prints aggregate results.

#[cfg(feature = "cli")]
mod squad;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use afl_core::api::json_api::DEFAULT_MAX_TICKS;
#[cfg(feature = "cli")]
use afl_core::{simulate_match, MatchOutcome, MatchRequest, MatchResponse, SimConfig, TeamId, SCHEMA_VERSION};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "afl_cli")]
#[command(about = "Simulate Australian football matches", long_about = None)]
struct Cli {
    /// Simulation config JSON; falls back to AFL_SIM_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate a single match
    Run {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 9)]
        units_per_team: usize,

        /// Fast-forward factor for the whole match
        #[arg(long, default_value_t = 1.0)]
        fast_forward: f32,

        /// Print the full JSON response instead of a summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Simulate many seeds in parallel
    Batch {
        /// Number of seeds, starting at --first-seed
        #[arg(long, default_value_t = 100)]
        seeds: u64,

        #[arg(long, default_value_t = 0)]
        first_seed: u64,

        #[arg(long, default_value_t = 9)]
        units_per_team: usize,
    },
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => SimConfig::default().from_env_override().context("invalid config override"),
    }
}

#[cfg(feature = "cli")]
fn build_request(config: &SimConfig, seed: u64, units_per_team: usize, fast_forward: f32) -> MatchRequest {
    // Squads get their own seeds so the same line-up can face different match seeds.
    MatchRequest {
        schema_version: SCHEMA_VERSION,
        seed,
        config: Some(config.clone()),
        home_team: squad::team_sheet("Home", units_per_team, seed.wrapping_mul(2)),
        away_team: squad::team_sheet("Away", units_per_team, seed.wrapping_mul(2) + 1),
        fast_forward,
        max_ticks: DEFAULT_MAX_TICKS,
        omit_events: false,
    }
}

#[cfg(feature = "cli")]
fn print_summary(response: &MatchResponse) {
    let line = |side: &afl_core::api::TeamResult| {
        format!("{} {}.{} ({})", side.name, side.score.goals, side.score.behinds, side.points)
    };
    println!("Seed {}", response.seed);
    println!("   {}", line(&response.home));
    println!("   {}", line(&response.away));
    match &response.winner {
        Some(name) => println!("   Winner: {name}"),
        None if response.completed => println!("   Draw"),
        None => println!("   Incomplete after {} ticks", response.ticks),
    }
    println!("   Events:      {}", response.event_count);
    println!("   Fingerprint: {}", response.fingerprint);
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run { seed, units_per_team, fast_forward, json } => {
            let request = build_request(&config, seed, units_per_team, fast_forward);
            let response = simulate_match(&request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_summary(&response);
            }
        }

        Commands::Batch { seeds, first_seed, units_per_team } => {
            use rayon::prelude::*;

            let results: Vec<Option<MatchOutcome>> = (first_seed..first_seed + seeds)
                .into_par_iter()
                .map(|seed| {
                    let mut request = build_request(&config, seed, units_per_team, 1.0);
                    request.omit_events = true;
                    simulate_match(&request).map(|response| response.outcome)
                })
                .collect::<Result<_, _>>()?;

            let count = |wanted: Option<MatchOutcome>| results.iter().filter(|o| **o == wanted).count();
            let home = count(Some(MatchOutcome::Winner(TeamId::HOME)));
            let away = count(Some(MatchOutcome::Winner(TeamId::AWAY)));
            let draws = count(Some(MatchOutcome::Draw));
            let incomplete = count(None);

            tracing::info!(seeds, home, away, draws, "batch finished");
            println!("Matches:    {}", results.len());
            println!("Home wins:  {home}");
            println!("Away wins:  {away}");
            println!("Draws:      {draws}");
            if incomplete > 0 {
                println!("Incomplete: {incomplete}");
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("afl_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
