//! Command Line Interface for the Kelly Monte Carlo study.
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use kelly_mc_domain::{BetModel, SimulationConfig};
use kelly_mc_simulation::experiment::{ExperimentOptions, run_experiment};
use kelly_mc_simulation::policy::Policy;
use kelly_mc_simulation::sensitivity::{SensitivityGrid, sensitivity_sweep};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod experiment_file;
mod output;

use experiment_file::ExperimentFile;

#[derive(Parser)]
#[command(name = "kelly-mc")]
#[command(about = "Compare bet-sizing rules on repeated binary bets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Ensemble size and seed shared by both subcommands.
#[derive(Args)]
struct EnsembleArgs {
    /// Independent trajectories per policy
    #[arg(long, default_value_t = 20_000)]
    trials: usize,

    /// Bets per trajectory
    #[arg(long, default_value_t = 200)]
    rounds: usize,

    /// Base seed; policy i uses seed + 1000 * i
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the policy comparison for one bet model
    Run {
        #[command(flatten)]
        ensemble: EnsembleArgs,

        /// Win probability
        #[arg(long, default_value_t = 0.53)]
        p: f64,

        /// Net payoff multiple on a win
        #[arg(long, default_value_t = 1.0)]
        b: f64,

        /// Bootstrap resamples per confidence interval
        #[arg(long, default_value_t = 800)]
        bootstrap_samples: usize,

        /// Confidence level of the intervals
        #[arg(long, default_value_t = 0.95)]
        confidence: f64,

        /// Trajectories written to paths_<policy>.csv
        #[arg(long, default_value_t = 50)]
        sample_paths: usize,

        /// Output directory
        #[arg(long, default_value = "outputs")]
        outdir: PathBuf,

        /// JSON experiment file; overrides every numeric flag
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Sweep win probability and payoff multiple
    Sensitivity {
        #[command(flatten)]
        ensemble: EnsembleArgs,

        /// Output directory
        #[arg(long, default_value = "outputs_sensitivity")]
        outdir: PathBuf,
    },
}

impl EnsembleArgs {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig::new(self.rounds, self.trials).with_seed(self.seed)
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            ensemble,
            p,
            b,
            bootstrap_samples,
            confidence,
            sample_paths,
            outdir,
            config,
        } => {
            let file = match config {
                Some(path) => {
                    info!(path = %path.display(), "loading experiment file");
                    ExperimentFile::load(&path)?
                }
                None => ExperimentFile {
                    model: BetModel::new(p, b)?,
                    config: ensemble.simulation_config(),
                    policies: Policy::standard_set(),
                    options: ExperimentOptions::default()
                        .with_bootstrap_samples(bootstrap_samples)
                        .with_confidence_level(confidence)
                        .with_sample_paths(sample_paths),
                },
            };

            let result = run_experiment(&file.model, &file.config, &file.policies, &file.options)?;
            let written =
                output::write_run(&outdir, &file.model, &file.config, &file.options, &result)?;
            info!(outdir = %outdir.display(), files = written.len(), "wrote outputs");

            output::print_summary(
                &output::summary_rows(&result),
                file.options.confidence_level,
            );
        }
        Commands::Sensitivity { ensemble, outdir } => {
            let options = ExperimentOptions::default().with_bootstrap_samples(400);
            let rows = sensitivity_sweep(
                &SensitivityGrid::default(),
                &ensemble.simulation_config(),
                &Policy::standard_set(),
                &options,
            )?;
            let path = output::write_sensitivity(&outdir, &rows)?;
            info!(path = %path.display(), rows = rows.len(), "wrote sensitivity summary");

            output::print_sensitivity(&rows, 20);
        }
    }

    Ok(())
}
