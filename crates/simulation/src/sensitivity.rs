//! Sensitivity sweep over the bet model.

use crate::experiment::{ExperimentOptions, run_experiment};
use crate::policy::SizingPolicy;
use crate::simulator::MAX_FRACTION;
use kelly_mc_domain::{BetModel, DomainError, SimulationConfig, expected_log_growth};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cartesian grid of win probabilities and payoff multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityGrid {
    /// Win probabilities, outer loop.
    pub win_probabilities: Vec<f64>,
    /// Payoff multiples, inner loop.
    pub payoff_multiples: Vec<f64>,
}

impl Default for SensitivityGrid {
    fn default() -> Self {
        Self {
            win_probabilities: vec![0.51, 0.53, 0.55],
            payoff_multiples: vec![0.8, 1.0, 1.2],
        }
    }
}

impl SensitivityGrid {
    /// Grid over the given axes.
    #[must_use]
    pub fn new(win_probabilities: Vec<f64>, payoff_multiples: Vec<f64>) -> Self {
        Self {
            win_probabilities,
            payoff_multiples,
        }
    }

    /// Validated bet models in `p`-major order.
    ///
    /// # Errors
    ///
    /// Returns the [`DomainError`] of the first invalid `(p, b)` pair.
    pub fn models(&self) -> Result<Vec<BetModel>, DomainError> {
        self.win_probabilities
            .iter()
            .flat_map(|&p| self.payoff_multiples.iter().map(move |&b| BetModel::new(p, b)))
            .collect()
    }
}

/// One policy's headline metrics at one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    /// Win probability of the grid point.
    pub p: f64,
    /// Payoff multiple of the grid point.
    pub b: f64,
    /// Unclamped Kelly fraction of the grid point.
    pub kelly_fraction: f64,
    /// Theoretical mean log growth over the horizon when staking the clamped
    /// Kelly fraction every round.
    pub optimal_log_growth: f64,
    /// Policy name.
    pub policy: String,
    /// Mean of `ln(w / initial)` over trials.
    pub mean_log_growth: f64,
    /// Share of trials ending below the ruin line.
    pub ruin_probability: f64,
    /// Share of trials ending below initial wealth.
    pub loss_probability: f64,
    /// Mean terminal wealth.
    pub terminal_mean: f64,
    /// Median terminal wealth.
    pub terminal_median: f64,
}

/// Runs `policies` at every grid point and flattens the results.
///
/// Every grid point reuses `config` (seed included). Rows are sorted by `p`
/// and `b` ascending, then by mean log growth descending.
///
/// # Errors
///
/// Returns the first [`DomainError`] from grid validation or any experiment.
pub fn sensitivity_sweep<P: SizingPolicy>(
    grid: &SensitivityGrid,
    config: &SimulationConfig,
    policies: &[P],
    options: &ExperimentOptions,
) -> Result<Vec<SensitivityRow>, DomainError> {
    let models = grid.models()?;
    let mut rows = Vec::with_capacity(models.len() * policies.len());

    for model in &models {
        let kelly = model.kelly_fraction();
        let optimal_log_growth = config.rounds as f64
            * expected_log_growth(
                model.win_probability,
                model.payoff_multiple,
                kelly.clamp(0.0, MAX_FRACTION),
            );
        let result = run_experiment(model, config, policies, options)?;
        info!(
            p = model.win_probability,
            b = model.payoff_multiple,
            kelly_fraction = kelly,
            "grid point finished"
        );

        rows.extend(result.into_runs().into_iter().map(|run| SensitivityRow {
            p: model.win_probability,
            b: model.payoff_multiple,
            kelly_fraction: kelly,
            optimal_log_growth,
            policy: run.name,
            mean_log_growth: run.metrics.mean_log_growth,
            ruin_probability: run.metrics.ruin_probability,
            loss_probability: run.metrics.loss_probability,
            terminal_mean: run.metrics.terminal_mean,
            terminal_median: run.metrics.terminal_median,
        }));
    }

    rows.sort_by(|x, y| {
        x.p.total_cmp(&y.p)
            .then(x.b.total_cmp(&y.b))
            .then(y.mean_log_growth.total_cmp(&x.mean_log_growth))
    });
    Ok(rows)
}
