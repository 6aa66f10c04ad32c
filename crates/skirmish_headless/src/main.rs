//! Headless skirmish match runner.
//!
//! Plays the combat bot against the sandbox arena without a platform.
//!
//! # Usage
//!
//! ```bash
//! # Play one match with the reference policy
//! cargo run -p skirmish_headless
//!
//! # Play the alternate policy with a bigger tick budget
//! cargo run -p skirmish_headless -- --policy assault --ticks 10000
//!
//! # Load a policy from a RON file
//! cargo run -p skirmish_headless -- --policy-file my_policy.ron
//! ```
//!
//! Output (stdout): the JSON match report.
//! Logs (stderr): progress, controlled via RUST_LOG / --verbose.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skirmish_core::config::BotConfig;
use skirmish_core::policy::SpawnPolicy;
use skirmish_headless::runner::{run_match, MatchConfig};

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Headless skirmish match runner for playtesting and CI")]
#[command(version)]
struct Cli {
    /// Preset policy name (kiter, assault)
    #[arg(short, long, default_value = "kiter", conflicts_with = "policy_file")]
    policy: String,

    /// Load the spawn policy from a RON file instead
    #[arg(long)]
    policy_file: Option<PathBuf>,

    /// Load bot configuration from a RON file
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Maximum ticks before the match times out
    #[arg(short, long, default_value = "5000")]
    ticks: u64,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let policy = if let Some(path) = &cli.policy_file {
        match SpawnPolicy::load(path) {
            Ok(policy) => policy,
            Err(err) => {
                eprintln!("failed to load policy: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        match SpawnPolicy::preset(&cli.policy) {
            Some(policy) => policy,
            None => {
                eprintln!("unknown policy preset: {}", cli.policy);
                return ExitCode::FAILURE;
            }
        }
    };

    let bot_config = if let Some(path) = &cli.config_file {
        match BotConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load config: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        BotConfig::default()
    };

    let report = run_match(MatchConfig {
        bot_config,
        policy,
        max_ticks: cli.ticks,
    });

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            ExitCode::FAILURE
        }
    }
}
