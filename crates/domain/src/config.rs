//! Simulation configuration.

use crate::bounds::{in_open_unit_interval, is_positive};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Size and initial conditions of a Monte Carlo run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of bets per trajectory.
    pub rounds: usize,
    /// Number of independent trajectories.
    pub trials: usize,
    /// Starting wealth of every trajectory.
    pub initial_wealth: f64,
    /// A trajectory is ruined when it ends below `ruin_threshold * initial_wealth`.
    pub ruin_threshold: f64,
    /// Seed of the outcome stream. `None` draws fresh entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 200,
            trials: 10_000,
            initial_wealth: 1.0,
            ruin_threshold: 0.2,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration with the given size and default initial conditions.
    #[must_use]
    pub fn new(rounds: usize, trials: usize) -> Self {
        Self {
            rounds,
            trials,
            ..Self::default()
        }
    }

    /// Sets the initial wealth.
    #[must_use]
    pub fn with_initial_wealth(mut self, initial_wealth: f64) -> Self {
        self.initial_wealth = initial_wealth;
        self
    }

    /// Sets the ruin threshold.
    #[must_use]
    pub fn with_ruin_threshold(mut self, ruin_threshold: f64) -> Self {
        self.ruin_threshold = ruin_threshold;
        self
    }

    /// Sets or clears the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<Option<u64>>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Absolute wealth below which a trajectory counts as ruined.
    #[must_use]
    pub fn ruin_line(&self) -> f64 {
        self.initial_wealth * self.ruin_threshold
    }

    /// Number of `(trial, round)` outcome cells, `None` when it overflows.
    ///
    /// Sampled paths need `rounds + 1` columns, so that must fit as well.
    #[must_use]
    pub fn outcome_cells(&self) -> Option<usize> {
        self.rounds.checked_add(1)?;
        self.trials.checked_mul(self.rounds)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns the [`DomainError`] for the first field out of range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rounds == 0 {
            return Err(DomainError::ZeroRounds);
        }
        if self.trials == 0 {
            return Err(DomainError::ZeroTrials);
        }
        if self.outcome_cells().is_none() {
            return Err(DomainError::EnsembleTooLarge {
                trials: self.trials,
                rounds: self.rounds,
            });
        }
        if !is_positive(self.initial_wealth) {
            return Err(DomainError::NonPositiveWealth(self.initial_wealth));
        }
        if !in_open_unit_interval(self.ruin_threshold) {
            return Err(DomainError::RuinThresholdOutOfRange(self.ruin_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.rounds, 200);
        assert_eq!(config.trials, 10_000);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SimulationConfig::new(10, 1000)
            .with_initial_wealth(100.0)
            .with_ruin_threshold(0.5)
            .with_seed(1);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.ruin_line(), 50.0);
        assert_eq!(config.with_seed(None).seed, None);
    }

    #[test]
    fn test_validation_errors() {
        let base = SimulationConfig::new(10, 10);
        assert_eq!(
            SimulationConfig { rounds: 0, ..base }.validate(),
            Err(DomainError::ZeroRounds)
        );
        assert_eq!(
            SimulationConfig { trials: 0, ..base }.validate(),
            Err(DomainError::ZeroTrials)
        );
        assert!(matches!(
            base.with_initial_wealth(0.0).validate(),
            Err(DomainError::NonPositiveWealth(_))
        ));
        for threshold in [0.0, 1.0, 1.5] {
            assert!(matches!(
                base.with_ruin_threshold(threshold).validate(),
                Err(DomainError::RuinThresholdOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_oversized_ensemble_rejected() {
        let config = SimulationConfig::new(usize::MAX / 2, 3);
        assert_eq!(
            config.validate(),
            Err(DomainError::EnsembleTooLarge {
                trials: 3,
                rounds: usize::MAX / 2,
            })
        );
        assert_eq!(
            SimulationConfig::new(usize::MAX, 1).validate(),
            Err(DomainError::EnsembleTooLarge {
                trials: 1,
                rounds: usize::MAX,
            })
        );
        assert_eq!(SimulationConfig::new(10, 7).outcome_cells(), Some(70));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"rounds":10,"trials":1000,"seed":1}"#).unwrap();
        assert_eq!(config.rounds, 10);
        assert_eq!(config.initial_wealth, 1.0);
        assert_eq!(config.ruin_threshold, 0.2);
        assert_eq!(config.seed, Some(1));
    }
}
