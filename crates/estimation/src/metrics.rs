//! Point estimates and bootstrap intervals for one policy's outcome ensemble.

use crate::bootstrap::{BootstrapConfig, bootstrap_ci};
use crate::drawdown::mean_max_drawdown;
use crate::stats::{fraction_below, log_growth, mean, quantile_sorted, sample_std, sorted};
use kelly_mc_domain::bounds::{in_open_unit_interval, is_positive};
use kelly_mc_domain::{
    CiMetric, DomainError, MetricsResult, SampledPaths, SimulationConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Parameters of [`compute_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Wealth every trial started from.
    pub initial_wealth: f64,
    /// Ruin line as a fraction of `initial_wealth`.
    pub ruin_threshold: f64,
    /// Bootstrap resamples per interval.
    pub bootstrap_samples: usize,
    /// Interval coverage, in `(0, 1)`.
    pub confidence_level: f64,
    /// Seed shared by every interval of one call.
    pub seed: Option<u64>,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            initial_wealth: 1.0,
            ruin_threshold: 0.2,
            bootstrap_samples: 800,
            confidence_level: 0.95,
            seed: None,
        }
    }
}

impl EstimationConfig {
    /// Takes initial wealth, ruin threshold and seed from a simulation config.
    #[must_use]
    pub fn from_simulation(config: &SimulationConfig) -> Self {
        Self {
            initial_wealth: config.initial_wealth,
            ruin_threshold: config.ruin_threshold,
            seed: config.seed,
            ..Self::default()
        }
    }

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

    /// Sets or clears the bootstrap seed.
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<Option<u64>>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Absolute ruin line.
    #[must_use]
    pub fn ruin_line(&self) -> f64 {
        self.initial_wealth * self.ruin_threshold
    }

    /// Resampling parameters derived from this config.
    #[must_use]
    pub fn bootstrap(&self) -> BootstrapConfig {
        BootstrapConfig::new(self.bootstrap_samples, self.confidence_level, self.seed)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns the [`DomainError`] for the first field out of range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !is_positive(self.initial_wealth) {
            return Err(DomainError::NonPositiveWealth(self.initial_wealth));
        }
        if !in_open_unit_interval(self.ruin_threshold) {
            return Err(DomainError::RuinThresholdOutOfRange(self.ruin_threshold));
        }
        self.bootstrap().validate()
    }
}

/// Reduces terminal wealth (and optional sampled paths) to a [`MetricsResult`].
///
/// Point estimates use the full `terminal_wealth` array. The max-drawdown
/// estimate is the mean over `sampled_paths` and is absent without them.
/// Intervals for terminal mean, loss and ruin probability resample terminal
/// wealth; the mean-log-growth interval resamples the log-growth array. All
/// four reuse `config.seed`.
///
/// # Errors
///
/// Returns the errors of [`EstimationConfig::validate`], or
/// [`DomainError::EmptySample`] for an empty array. Validation runs before
/// any statistic is computed.
pub fn compute_metrics(
    terminal_wealth: &[f64],
    sampled_paths: Option<&SampledPaths>,
    config: &EstimationConfig,
) -> Result<MetricsResult, DomainError> {
    config.validate()?;
    if terminal_wealth.is_empty() {
        return Err(DomainError::EmptySample);
    }

    let initial_wealth = config.initial_wealth;
    let ruin_line = config.ruin_line();
    let ordered = sorted(terminal_wealth);
    let growth = log_growth(terminal_wealth, initial_wealth);

    let boot = config.bootstrap();
    let mut ci = BTreeMap::new();
    ci.insert(
        CiMetric::TerminalMean,
        bootstrap_ci(terminal_wealth, mean, &boot)?,
    );
    ci.insert(
        CiMetric::LossProbability,
        bootstrap_ci(terminal_wealth, |x| fraction_below(x, initial_wealth), &boot)?,
    );
    ci.insert(
        CiMetric::RuinProbability,
        bootstrap_ci(terminal_wealth, |x| fraction_below(x, ruin_line), &boot)?,
    );
    ci.insert(CiMetric::MeanLogGrowth, bootstrap_ci(&growth, mean, &boot)?);

    let metrics = MetricsResult {
        n: terminal_wealth.len(),
        terminal_mean: mean(terminal_wealth),
        terminal_median: quantile_sorted(&ordered, 0.5),
        terminal_p10: quantile_sorted(&ordered, 0.1),
        terminal_p90: quantile_sorted(&ordered, 0.9),
        loss_probability: fraction_below(terminal_wealth, initial_wealth),
        ruin_probability: fraction_below(terminal_wealth, ruin_line),
        mean_log_growth: mean(&growth),
        vol_log_growth: sample_std(&growth),
        max_drawdown_mean: sampled_paths.and_then(mean_max_drawdown),
        ci,
    };

    debug!(
        n = metrics.n,
        terminal_mean = metrics.terminal_mean,
        mean_log_growth = metrics.mean_log_growth,
        bootstrap_samples = config.bootstrap_samples,
        "computed metrics"
    );

    Ok(metrics)
}
