//! Experiment orchestration.
//!
//! Runs a list of policies against one bet model and configuration, each with
//! its own derived seed, and collects per-policy metrics keyed by name.

use crate::policy::SizingPolicy;
use crate::simulator::{PathSampling, simulate};
use kelly_mc_domain::rng::policy_seed;
use kelly_mc_domain::{BetModel, DomainError, MetricsResult, SampledPaths, SimulationConfig};
use kelly_mc_estimation::{EstimationConfig, compute_metrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Estimation and sampling options of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentOptions {
    /// Bootstrap resamples per confidence interval.
    pub bootstrap_samples: usize,
    /// Two-sided confidence level of every interval.
    pub confidence_level: f64,
    /// Trajectories kept per policy.
    pub sample_paths: usize,
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            bootstrap_samples: 800,
            confidence_level: 0.95,
            sample_paths: PathSampling::DEFAULT_PATHS,
        }
    }
}

impl ExperimentOptions {
    /// Sets the number of bootstrap resamples.
    #[must_use]
    pub fn with_bootstrap_samples(mut self, samples: usize) -> Self {
        self.bootstrap_samples = samples;
        self
    }

    /// Sets the confidence level.
    #[must_use]
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Sets the number of sampled paths.
    #[must_use]
    pub fn with_sample_paths(mut self, paths: usize) -> Self {
        self.sample_paths = paths;
        self
    }

    /// Estimation settings for a run under `config`, before seeding.
    #[must_use]
    pub fn estimation_config(&self, config: &SimulationConfig) -> EstimationConfig {
        EstimationConfig::from_simulation(config)
            .with_bootstrap_samples(self.bootstrap_samples)
            .with_confidence_level(self.confidence_level)
    }
}

/// Everything one policy produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRun {
    /// Policy name.
    pub name: String,
    /// Seed used for this policy's simulation and bootstrap.
    pub seed: Option<u64>,
    /// Summary metrics.
    pub metrics: MetricsResult,
    /// Terminal wealth of every trial.
    pub terminal_wealth: Vec<f64>,
    /// Leading trajectories.
    pub sampled_paths: SampledPaths,
}

/// Per-policy runs in supply order, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentResult {
    runs: Vec<PolicyRun>,
}

impl ExperimentResult {
    /// Adds a run; a run with an existing name replaces it in place.
    pub fn insert(&mut self, run: PolicyRun) {
        match self.runs.iter_mut().find(|existing| existing.name == run.name) {
            Some(existing) => {
                warn!(policy = %run.name, "duplicate policy name, earlier result overwritten");
                *existing = run;
            }
            None => self.runs.push(run),
        }
    }

    /// Runs in supply order.
    pub fn runs(&self) -> &[PolicyRun] {
        &self.runs
    }

    /// Run by policy name.
    pub fn get(&self, name: &str) -> Option<&PolicyRun> {
        self.runs.iter().find(|run| run.name == name)
    }

    /// Number of distinct policy names.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// `true` when no policy ran.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Metrics keyed by policy name.
    pub fn metrics_by_name(&self) -> BTreeMap<&str, &MetricsResult> {
        self.runs
            .iter()
            .map(|run| (run.name.as_str(), &run.metrics))
            .collect()
    }

    /// Terminal wealth keyed by policy name.
    pub fn terminal_by_name(&self) -> BTreeMap<&str, &[f64]> {
        self.runs
            .iter()
            .map(|run| (run.name.as_str(), run.terminal_wealth.as_slice()))
            .collect()
    }

    /// Sampled paths keyed by policy name.
    pub fn paths_by_name(&self) -> BTreeMap<&str, &SampledPaths> {
        self.runs
            .iter()
            .map(|run| (run.name.as_str(), &run.sampled_paths))
            .collect()
    }

    /// Consumes the result, yielding runs in supply order.
    pub fn into_runs(self) -> Vec<PolicyRun> {
        self.runs
    }
}

/// Simulates and evaluates every policy in `policies`.
///
/// Policy `i` runs with seed `config.seed + 1000 * i`, path sampling on, and
/// a bootstrap seeded with that same value. Model, configuration, options
/// and every derived seed are validated before the first policy runs.
///
/// # Errors
///
/// Returns the first [`DomainError`] from validation, seed derivation,
/// simulation or estimation. No partial result is returned.
pub fn run_experiment<P: SizingPolicy>(
    model: &BetModel,
    config: &SimulationConfig,
    policies: &[P],
    options: &ExperimentOptions,
) -> Result<ExperimentResult, DomainError> {
    model.validate()?;
    config.validate()?;
    let estimation = options.estimation_config(config);
    estimation.validate()?;

    debug!(
        p = model.win_probability,
        b = model.payoff_multiple,
        trials = config.trials,
        rounds = config.rounds,
        seed = ?config.seed,
        policies = policies.len(),
        "starting experiment"
    );

    let sampling = PathSampling::Enabled {
        paths: options.sample_paths,
    };
    let seeds = (0..policies.len())
        .map(|index| policy_seed(config.seed, index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut result = ExperimentResult::default();
    for (policy, seed) in policies.iter().zip(seeds) {
        let outcome = simulate(model, &config.with_seed(seed), policy, sampling)?;
        let sampled_paths = outcome.sampled_paths.unwrap_or_default();
        let metrics = compute_metrics(
            &outcome.terminal_wealth,
            Some(&sampled_paths),
            &estimation.with_seed(seed),
        )?;

        info!(
            policy = policy.name(),
            mean_log_growth = metrics.mean_log_growth,
            ruin_probability = metrics.ruin_probability,
            terminal_median = metrics.terminal_median,
            "policy finished"
        );

        result.insert(PolicyRun {
            name: policy.name().to_string(),
            seed,
            metrics,
            terminal_wealth: outcome.terminal_wealth,
            sampled_paths,
        });
    }

    Ok(result)
}
