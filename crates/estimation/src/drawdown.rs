//! Peak-to-trough drawdown of wealth paths.

use crate::stats::mean;
use kelly_mc_domain::SampledPaths;

/// Largest relative decline from a running peak along `path`.
///
/// Drawdown at step `i` is `1 - path[i] / max(path[..=i])`. An empty path has
/// no drawdown.
#[must_use]
pub fn max_drawdown(path: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &wealth in path {
        peak = peak.max(wealth);
        worst = worst.max(1.0 - wealth / peak);
    }
    worst
}

/// Mean of per-path max drawdowns across the sampled trials.
///
/// `None` when the matrix holds no rows.
#[must_use]
pub fn mean_max_drawdown(paths: &SampledPaths) -> Option<f64> {
    if paths.rows() == 0 {
        return None;
    }
    let drawdowns: Vec<f64> = paths.iter_rows().map(max_drawdown).collect();
    Some(mean(&drawdowns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_path_has_no_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 1.1, 1.2, 1.5]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_drawdown_measured_from_running_peak() {
        // Peak 2.0, trough 1.0 => 50%; later dip from 4.0 to 3.0 is only 25%.
        let path = [1.0, 2.0, 1.0, 4.0, 3.0];
        assert!((max_drawdown(&path) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_over_sampled_paths() {
        let paths = SampledPaths::from_rows(vec![
            vec![1.0, 0.8, 0.9],  // 20%
            vec![1.0, 1.2, 0.6],  // 50%
            vec![1.0, 1.1, 1.21], // 0%
        ])
        .unwrap();
        let expected = (0.2 + 0.5 + 0.0) / 3.0;
        assert!((mean_max_drawdown(&paths).unwrap() - expected).abs() < 1e-12);
        assert_eq!(mean_max_drawdown(&SampledPaths::default()), None);
    }
}
