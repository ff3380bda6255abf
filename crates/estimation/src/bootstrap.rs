//! Nonparametric percentile bootstrap.
//!
//! Resamples are independent, so they are evaluated in parallel. Each resample
//! draws its indices from its own ChaCha8 stream whose seed comes from the
//! master stream in resample order; the interval therefore depends only on the
//! seed, never on the thread count.

use crate::stats::quantile_sorted;
use kelly_mc_domain::bounds::in_open_unit_interval;
use kelly_mc_domain::rng;
use kelly_mc_domain::{ConfidenceInterval, DomainError};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Resampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resamples.
    pub samples: usize,
    /// Coverage of the interval, in `(0, 1)`.
    pub confidence_level: f64,
    /// Seed of the master stream.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            confidence_level: 0.95,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(samples: usize, confidence_level: f64, seed: Option<u64>) -> Self {
        Self {
            samples,
            confidence_level,
            seed,
        }
    }

    /// Checks the resample count and confidence level.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveBootstrapSamples`] or
    /// [`DomainError::ConfidenceLevelOutOfRange`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.samples == 0 {
            return Err(DomainError::NonPositiveBootstrapSamples);
        }
        if !in_open_unit_interval(self.confidence_level) {
            return Err(DomainError::ConfidenceLevelOutOfRange(self.confidence_level));
        }
        Ok(())
    }

    /// Tail mass on each side, `(1 - level) / 2`.
    #[must_use]
    pub fn tail(&self) -> f64 {
        (1.0 - self.confidence_level) / 2.0
    }
}

/// Percentile bootstrap interval of `statistic` over `data`.
///
/// Draws `config.samples` resamples of size `n` with replacement, evaluates
/// `statistic` on each and returns the empirical `(α/2, 1 - α/2)` quantiles of
/// the resulting distribution, `α = 1 - confidence_level`.
///
/// # Errors
///
/// Returns the validation errors of [`BootstrapConfig::validate`], or
/// [`DomainError::EmptySample`] for empty `data`.
pub fn bootstrap_ci<F>(
    data: &[f64],
    statistic: F,
    config: &BootstrapConfig,
) -> Result<ConfidenceInterval, DomainError>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    config.validate()?;
    if data.is_empty() {
        return Err(DomainError::EmptySample);
    }

    let n = data.len();
    let mut master = rng::stream(config.seed);
    let resample_seeds: Vec<u64> = (0..config.samples).map(|_| master.next_u64()).collect();

    let mut statistics: Vec<f64> = resample_seeds
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(n),
            |resample: &mut Vec<f64>, seed| {
                let mut stream = ChaCha8Rng::seed_from_u64(seed);
                resample.clear();
                resample.extend((0..n).map(|_| data[stream.random_range(0..n)]));
                statistic(resample)
            },
        )
        .collect();
    statistics.sort_by(f64::total_cmp);

    let tail = config.tail();
    Ok(ConfidenceInterval::new(
        quantile_sorted(&statistics, tail),
        quantile_sorted(&statistics, 1.0 - tail),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::mean;

    fn uniform_grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / n as f64).collect()
    }

    #[test]
    fn test_interval_is_ordered_and_covers_mean() {
        let data = uniform_grid(1000);
        let config = BootstrapConfig::new(2000, 0.95, Some(11));
        let ci = bootstrap_ci(&data, mean, &config).unwrap();

        assert!(ci.low <= ci.high);
        assert!(ci.contains(mean(&data)));
    }

    #[test]
    fn test_seeded_interval_is_reproducible() {
        let data = uniform_grid(200);
        let config = BootstrapConfig::new(300, 0.9, Some(3));
        let a = bootstrap_ci(&data, mean, &config).unwrap();
        let b = bootstrap_ci(&data, mean, &config).unwrap();
        assert_eq!(a, b);

        let other = bootstrap_ci(&data, mean, &BootstrapConfig { seed: Some(4), ..config }).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_width_stabilizes_with_more_resamples() {
        let data = uniform_grid(1000);
        let coarse = bootstrap_ci(&data, mean, &BootstrapConfig::new(100, 0.95, Some(5))).unwrap();
        let fine = bootstrap_ci(&data, mean, &BootstrapConfig::new(5000, 0.95, Some(5))).unwrap();

        // Normal approximation: 2 * 1.96 * sigma / sqrt(n), sigma^2 = 1/12.
        let expected_width = 2.0 * 1.96 * (1.0_f64 / 12.0).sqrt() / (1000.0_f64).sqrt();
        assert!((fine.width() - expected_width).abs() / expected_width < 0.1);
        assert!((coarse.width() - fine.width()).abs() / fine.width() < 0.35);
    }

    #[test]
    fn test_higher_confidence_gives_wider_interval() {
        let data = uniform_grid(500);
        let narrow = bootstrap_ci(&data, mean, &BootstrapConfig::new(2000, 0.5, Some(9))).unwrap();
        let wide = bootstrap_ci(&data, mean, &BootstrapConfig::new(2000, 0.99, Some(9))).unwrap();
        assert!(wide.width() > narrow.width());
    }

    #[test]
    fn test_constant_data_gives_degenerate_interval() {
        let data = vec![2.0; 50];
        let ci = bootstrap_ci(&data, mean, &BootstrapConfig::new(100, 0.95, None)).unwrap();
        assert_eq!(ci, ConfidenceInterval::new(2.0, 2.0));
    }

    #[test]
    fn test_validation_errors() {
        let data = [1.0, 2.0];
        assert_eq!(
            bootstrap_ci(&data, mean, &BootstrapConfig::new(0, 0.95, None)),
            Err(DomainError::NonPositiveBootstrapSamples)
        );
        for level in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                bootstrap_ci(&data, mean, &BootstrapConfig::new(10, level, None)),
                Err(DomainError::ConfidenceLevelOutOfRange(_))
            ));
        }
        assert_eq!(
            bootstrap_ci(&[], mean, &BootstrapConfig::default()),
            Err(DomainError::EmptySample)
        );
    }
}
