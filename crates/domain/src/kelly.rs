//! Kelly criterion for a binary bet.

/// Growth-optimal stake fraction `f* = p - (1 - p) / b`.
///
/// Negative values mean the bet has negative edge and the optimal stake is to
/// not play (or to take the other side).
///
/// # Arguments
///
/// * `p` - Win probability
/// * `b` - Payoff multiple on a win (even odds => 1.0)
#[must_use]
pub fn kelly_fraction(p: f64, b: f64) -> f64 {
    p - (1.0 - p) / b
}

/// Expected log growth per round when staking fraction `f`.
///
/// `g(f) = p * ln(1 + f * b) + (1 - p) * ln(1 - f)`, maximised at
/// [`kelly_fraction`]. Defined for `f` in `[0, 1)`; `f = 1` yields `-inf`.
#[must_use]
pub fn expected_log_growth(p: f64, b: f64, f: f64) -> f64 {
    p * (f * b).ln_1p() + (1.0 - p) * (-f).ln_1p()
}
