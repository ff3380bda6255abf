//! Path simulator.
//!
//! Advances an ensemble of independent wealth trajectories for a fixed number
//! of rounds. Only the current wealth vector and the first `k` trajectories
//! are kept in memory.

use crate::policy::{Fraction, SizingPolicy};
use kelly_mc_domain::rng::{self, Stream};
use kelly_mc_domain::{BetModel, DomainError, SampledPaths, SimulationConfig};
use rand_distr::{Bernoulli, Distribution};
use tracing::debug;

/// Largest fraction the simulator lets a policy stake.
///
/// Keeps wealth strictly positive after a loss.
pub const MAX_FRACTION: f64 = 0.999;

/// Whether to keep full trajectories of the leading trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathSampling {
    /// Return terminal wealth only.
    #[default]
    Disabled,
    /// Keep the trajectories of the first `min(paths, trials)` trials.
    Enabled {
        /// Requested number of paths.
        paths: usize,
    },
}

impl PathSampling {
    /// Default number of sampled paths.
    pub const DEFAULT_PATHS: usize = 50;

    /// Sampling enabled with [`PathSampling::DEFAULT_PATHS`] paths.
    #[must_use]
    pub fn enabled() -> Self {
        Self::Enabled {
            paths: Self::DEFAULT_PATHS,
        }
    }

    /// Number of rows to keep for an ensemble of `trials`, if sampling.
    #[must_use]
    pub fn rows(&self, trials: usize) -> Option<usize> {
        match self {
            Self::Disabled => None,
            Self::Enabled { paths } => Some((*paths).min(trials)),
        }
    }
}

/// Output of [`simulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Final wealth of every trial, shape `(trials,)`.
    pub terminal_wealth: Vec<f64>,
    /// Trajectories of the first `k` trials, shape `(k, rounds + 1)`.
    pub sampled_paths: Option<SampledPaths>,
}

/// Pre-drawn win/lose outcomes, bit-packed in trial-major order.
///
/// Cell `(trial, round)` lives at bit `trial * rounds + round`, so the first
/// `t` trials of a larger matrix equal the whole matrix drawn for `t` trials
/// from the same seed.
#[derive(Debug, Clone)]
struct OutcomeMatrix {
    rounds: usize,
    bits: Vec<u64>,
}

impl OutcomeMatrix {
    /// `trials * rounds` must fit in a `usize`; [`SimulationConfig::validate`] ensures it.
    fn draw(stream: &mut Stream, win: &Bernoulli, trials: usize, rounds: usize) -> Self {
        let cells = trials * rounds;
        let mut bits = vec![0_u64; cells.div_ceil(64)];
        for cell in 0..cells {
            if win.sample(stream) {
                bits[cell / 64] |= 1 << (cell % 64);
            }
        }
        Self { rounds, bits }
    }

    fn won(&self, trial: usize, round: usize) -> bool {
        let cell = trial * self.rounds + round;
        self.bits[cell / 64] & (1 << (cell % 64)) != 0
    }
}

/// Clamps a proposed fraction into `[0, MAX_FRACTION]`; NaN stakes nothing.
#[must_use]
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, MAX_FRACTION)
    }
}

fn apply_round(wealth: f64, won: bool, fraction: f64, payoff_multiple: f64) -> f64 {
    if won {
        wealth * (1.0 + fraction * payoff_multiple)
    } else {
        wealth * (1.0 - fraction)
    }
}

/// Simulates `config.trials` trajectories of `config.rounds` bets sized by `policy`.
///
/// Outcomes are drawn up front from a ChaCha8 stream seeded by `config.seed`
/// (fresh entropy when unseeded). Each round the policy's fraction is clamped
/// into `[0, 0.999]`, then wealth grows by `1 + f * b` on a win and shrinks by
/// `1 - f` on a loss.
///
/// # Errors
///
/// Returns the validation errors of [`BetModel::validate`] and
/// [`SimulationConfig::validate`] before any work is done, or
/// [`DomainError::FractionShapeMismatch`] if the policy returns a per-trial
/// vector of the wrong length.
pub fn simulate<P>(
    model: &BetModel,
    config: &SimulationConfig,
    policy: &P,
    sampling: PathSampling,
) -> Result<SimulationOutcome, DomainError>
where
    P: SizingPolicy + ?Sized,
{
    model.validate()?;
    config.validate()?;

    let _span = tracing::debug_span!(
        "simulate",
        policy = policy.name(),
        p = model.win_probability,
        b = model.payoff_multiple,
        trials = config.trials,
        rounds = config.rounds,
        seed = ?config.seed,
    )
    .entered();

    let win = Bernoulli::new(model.win_probability)
        .map_err(|_| DomainError::WinProbabilityOutOfRange(model.win_probability))?;
    let mut stream = rng::stream(config.seed);
    let outcomes = OutcomeMatrix::draw(&mut stream, &win, config.trials, config.rounds);

    let b = model.payoff_multiple;
    let mut wealth = vec![config.initial_wealth; config.trials];
    let mut paths = sampling
        .rows(config.trials)
        .map(|rows| SampledPaths::with_initial(rows, config.rounds, config.initial_wealth));
    let mut clamped_rounds = 0_usize;

    for round in 0..config.rounds {
        let mut clamped = false;
        match policy.fraction(model, &wealth, round) {
            Fraction::Scalar(raw) => {
                let f = clamp_fraction(raw);
                clamped = f != raw;
                for (trial, w) in wealth.iter_mut().enumerate() {
                    *w = apply_round(*w, outcomes.won(trial, round), f, b);
                }
            }
            Fraction::PerTrial(fractions) => {
                if fractions.len() != config.trials {
                    return Err(DomainError::FractionShapeMismatch {
                        policy: policy.name().to_string(),
                        expected: config.trials,
                        actual: fractions.len(),
                    });
                }
                for (trial, (w, raw)) in wealth.iter_mut().zip(fractions).enumerate() {
                    let f = clamp_fraction(raw);
                    clamped |= f != raw;
                    *w = apply_round(*w, outcomes.won(trial, round), f, b);
                }
            }
        }
        if clamped {
            clamped_rounds += 1;
        }
        if let Some(paths) = paths.as_mut() {
            paths.record(round + 1, &wealth);
        }
    }

    if clamped_rounds > 0 {
        debug!(clamped_rounds, "policy fractions clamped into [0, 0.999]");
    }

    Ok(SimulationOutcome {
        terminal_wealth: wealth,
        sampled_paths: paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{FixedFraction, Kelly};

    fn model() -> BetModel {
        BetModel::new(0.55, 1.0).unwrap()
    }

    /// Stakes trial index `i` as `i / 10`; used to exercise per-trial fractions.
    struct ByTrial {
        len: Option<usize>,
    }

    impl SizingPolicy for ByTrial {
        fn name(&self) -> &str {
            "ByTrial"
        }

        fn fraction(&self, _model: &BetModel, wealth: &[f64], _round: usize) -> Fraction {
            let len = self.len.unwrap_or(wealth.len());
            Fraction::PerTrial((0..len).map(|i| i as f64 / 10.0).collect())
        }
    }

    #[test]
    fn test_shapes_with_sampling() {
        let config = SimulationConfig::new(10, 1000).with_seed(1);
        let outcome = simulate(
            &model(),
            &config,
            &FixedFraction::new(0.02),
            PathSampling::Enabled { paths: 25 },
        )
        .unwrap();

        assert_eq!(outcome.terminal_wealth.len(), 1000);
        let paths = outcome.sampled_paths.unwrap();
        assert_eq!(paths.shape(), (25, 11));
        assert!(paths.column(0).iter().all(|&w| w == config.initial_wealth));
        // Last column matches the terminal wealth of the sampled trials.
        assert_eq!(paths.column(10), outcome.terminal_wealth[..25].to_vec());
    }

    #[test]
    fn test_sampled_rows_limited_by_trials() {
        let config = SimulationConfig::new(5, 8).with_seed(3);
        let outcome =
            simulate(&model(), &config, &FixedFraction::new(0.1), PathSampling::enabled()).unwrap();
        assert_eq!(outcome.sampled_paths.unwrap().shape(), (8, 6));
    }

    #[test]
    fn test_no_paths_when_disabled() {
        let config = SimulationConfig::new(5, 10).with_seed(3);
        let outcome =
            simulate(&model(), &config, &FixedFraction::new(0.1), PathSampling::Disabled).unwrap();
        assert!(outcome.sampled_paths.is_none());
    }

    #[test]
    fn test_wealth_positive_with_small_fraction() {
        let config = SimulationConfig::new(50, 2000).with_seed(2);
        let outcome =
            simulate(&model(), &config, &FixedFraction::new(0.05), PathSampling::Disabled).unwrap();
        assert!(outcome.terminal_wealth.iter().all(|&w| w > 0.0));
    }

    #[test]
    fn test_oversized_fraction_is_clamped() {
        let config = SimulationConfig::new(20, 500).with_seed(4);
        let reckless =
            simulate(&model(), &config, &FixedFraction::new(5.0), PathSampling::Disabled).unwrap();
        let capped = simulate(
            &model(),
            &config,
            &FixedFraction::new(MAX_FRACTION),
            PathSampling::Disabled,
        )
        .unwrap();

        assert_eq!(reckless, capped);
        assert!(reckless.terminal_wealth.iter().all(|&w| w > 0.0));
    }

    #[test]
    fn test_negative_fraction_stakes_nothing() {
        let config = SimulationConfig::new(30, 100).with_seed(5);
        let negative_edge = BetModel::new(0.45, 1.0).unwrap();
        let outcome =
            simulate(&negative_edge, &config, &Kelly::new(), PathSampling::Disabled).unwrap();
        assert!(outcome.terminal_wealth.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_clamp_fraction() {
        assert_eq!(clamp_fraction(-0.2), 0.0);
        assert_eq!(clamp_fraction(0.3), 0.3);
        assert_eq!(clamp_fraction(1.0), MAX_FRACTION);
        assert_eq!(clamp_fraction(f64::NAN), 0.0);
    }

    #[test]
    fn test_single_round_update_rule() {
        // Even odds, 10% stake: winners at 1.1, losers at 0.9.
        let config = SimulationConfig::new(1, 200).with_seed(6);
        let outcome =
            simulate(&model(), &config, &FixedFraction::new(0.1), PathSampling::Disabled).unwrap();
        for w in outcome.terminal_wealth {
            assert!((w - 1.1).abs() < 1e-12 || (w - 0.9).abs() < 1e-12, "w = {w}");
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let config = SimulationConfig::new(25, 300).with_seed(7);
        let policy = FixedFraction::new(0.05);
        let a = simulate(&model(), &config, &policy, PathSampling::enabled()).unwrap();
        let b = simulate(&model(), &config, &policy, PathSampling::enabled()).unwrap();
        assert_eq!(a, b);

        let c = simulate(&model(), &config.with_seed(8), &policy, PathSampling::enabled()).unwrap();
        assert_ne!(a.terminal_wealth, c.terminal_wealth);
    }

    #[test]
    fn test_per_trial_fractions() {
        let config = SimulationConfig::new(10, 5).with_seed(9);
        let outcome = simulate(
            &model(),
            &config,
            &ByTrial { len: None },
            PathSampling::Disabled,
        )
        .unwrap();
        // Trial 0 stakes nothing.
        assert_eq!(outcome.terminal_wealth[0], 1.0);
        assert!(outcome.terminal_wealth.iter().all(|&w| w > 0.0));
    }

    #[test]
    fn test_per_trial_shape_mismatch() {
        let config = SimulationConfig::new(10, 5).with_seed(9);
        let err = simulate(
            &model(),
            &config,
            &ByTrial { len: Some(3) },
            PathSampling::Disabled,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::FractionShapeMismatch {
                policy: "ByTrial".to_string(),
                expected: 5,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_validation_fails_fast() {
        let bad_model = BetModel {
            win_probability: 1.0,
            payoff_multiple: 1.0,
        };
        let config = SimulationConfig::new(10, 10);
        assert!(matches!(
            simulate(&bad_model, &config, &FixedFraction::new(0.1), PathSampling::Disabled),
            Err(DomainError::WinProbabilityOutOfRange(_))
        ));
        assert_eq!(
            simulate(
                &model(),
                &SimulationConfig::new(0, 10),
                &FixedFraction::new(0.1),
                PathSampling::Disabled
            ),
            Err(DomainError::ZeroRounds)
        );
    }

    #[test]
    fn test_oversized_ensemble_fails_before_drawing() {
        let config = SimulationConfig::new(usize::MAX / 2, 4).with_seed(1);
        assert_eq!(
            simulate(&model(), &config, &FixedFraction::new(0.1), PathSampling::Disabled),
            Err(DomainError::EnsembleTooLarge {
                trials: 4,
                rounds: usize::MAX / 2,
            })
        );
    }

    #[test]
    fn test_outcome_matrix_is_trial_major() {
        let win = Bernoulli::new(0.5).unwrap();
        let small = OutcomeMatrix::draw(&mut rng::stream(Some(1)), &win, 3, 70);
        let large = OutcomeMatrix::draw(&mut rng::stream(Some(1)), &win, 10, 70);
        for trial in 0..3 {
            for round in 0..70 {
                assert_eq!(small.won(trial, round), large.won(trial, round));
            }
        }
    }
}
