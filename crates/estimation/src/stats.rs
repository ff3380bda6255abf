//! Descriptive statistics over `f64` slices.
//!
//! Empty inputs yield NaN; callers that need a hard error check emptiness
//! first.

/// Arithmetic mean.
#[must_use]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation with Bessel's correction (divisor `n - 1`).
///
/// A single observation has no spread and returns 0.
#[must_use]
pub fn sample_std(data: &[f64]) -> f64 {
    match data.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => {
            let m = mean(data);
            let ss = data.iter().map(|x| (x - m).powi(2)).sum::<f64>();
            (ss / (n - 1) as f64).sqrt()
        }
    }
}

/// Fraction of observations strictly below `threshold`.
#[must_use]
pub fn fraction_below(data: &[f64], threshold: f64) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().filter(|&&x| x < threshold).count() as f64 / data.len() as f64
}

/// Returns a sorted copy of `data`.
#[must_use]
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut values = data.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// Quantile `q ∈ [0, 1]` of already sorted data.
///
/// Linear interpolation between the order statistics bracketing
/// `q * (n - 1)`.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Quantile `q ∈ [0, 1]` of unsorted data.
#[must_use]
pub fn quantile(data: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted(data), q)
}

/// Percentile `pct ∈ [0, 100]`.
#[must_use]
pub fn percentile(data: &[f64], pct: f64) -> f64 {
    quantile(data, pct / 100.0)
}

/// Median.
#[must_use]
pub fn median(data: &[f64]) -> f64 {
    quantile(data, 0.5)
}

/// `ln(w / initial)` for every observation.
#[must_use]
pub fn log_growth(terminal_wealth: &[f64], initial_wealth: f64) -> Vec<f64> {
    terminal_wealth
        .iter()
        .map(|w| (w / initial_wealth).ln())
        .collect()
}
