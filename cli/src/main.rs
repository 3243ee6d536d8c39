//! NQG command line: entry point for running the model.

use anyhow::Context;
use clap::Parser;
use nqg_simulation::{run_samples, RunHistory, SimulationConfig, RUN_COUNTERS};
use nqg_utils::{init_logging, LogFormat, StatsCounter};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nqg", about = "Neural Quorum Governance simulation")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base; CLI
    /// flags and env vars override them.
    #[arg(long, env = "NQG_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "NQG_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "NQG_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the simulation and write every round snapshot as JSON.
    Run {
        /// Rounds per sample.
        #[arg(long, default_value_t = 100, env = "NQG_TIMESTEPS")]
        timesteps: u64,

        /// Independent samples; sample `i` uses seed `seed + i`.
        #[arg(long, default_value_t = 1, env = "NQG_SAMPLES")]
        samples: usize,

        /// Seed of the first sample (defaults to the config's seed).
        #[arg(long, env = "NQG_SEED")]
        seed: Option<u64>,

        /// Output file. Writes to stdout when absent.
        #[arg(long, env = "NQG_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    label: &'a str,
    timesteps: u64,
    runs: &'a [RunHistory],
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SimulationConfig> {
    match path {
        Some(path) => {
            let config = SimulationConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run {
            timesteps,
            samples,
            seed,
            output,
        } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let params = config.build().context("invalid simulation parameters")?;

            tracing::info!(
                label = %params.label,
                seed = params.seed,
                timesteps,
                samples,
                projects = params.projects.len(),
                "starting simulation"
            );

            let runs = run_samples(&params, timesteps, samples)?;

            let totals = StatsCounter::new(RUN_COUNTERS);
            for run in &runs {
                let last = run.latest();
                let counts = last.decision_counts();
                totals.add("rounds", run.rounds());
                totals.add("users_onboarded", last.population() as u64);
                totals.add("voters", counts.voters as u64);
                totals.add("delegators", counts.delegators as u64);
                totals.add("abstainers", counts.abstainers as u64);
                tracing::info!(
                    sample = run.sample,
                    seed = run.seed,
                    population = last.population(),
                    funded = last.funded_projects().count(),
                    "sample complete"
                );
            }
            tracing::info!(totals = %totals, "simulation complete");

            let summary = RunSummary {
                label: &params.label,
                timesteps,
                runs: &runs,
            };
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &summary)?;
                    tracing::info!("Wrote {} run(s) to {}", runs.len(), path.display());
                }
                None => {
                    serde_json::to_writer_pretty(std::io::stdout().lock(), &summary)?;
                    println!();
                }
            }
        }
    }

    Ok(())
}
