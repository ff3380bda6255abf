use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metrics that carry a bootstrap confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiMetric {
    /// Mean terminal wealth.
    TerminalMean,
    /// Probability of ending below initial wealth.
    LossProbability,
    /// Probability of ending below the ruin line.
    RuinProbability,
    /// Mean of `ln(terminal / initial)`.
    MeanLogGrowth,
}

impl CiMetric {
    /// Every metric, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::TerminalMean,
        Self::LossProbability,
        Self::RuinProbability,
        Self::MeanLogGrowth,
    ];

    /// Snake-case identifier used in reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TerminalMean => "terminal_mean",
            Self::LossProbability => "loss_probability",
            Self::RuinProbability => "ruin_probability",
            Self::MeanLogGrowth => "mean_log_growth",
        }
    }
}

impl fmt::Display for CiMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-sided interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl ConfidenceInterval {
    /// Creates an interval.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `high - low`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `value` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Summary of one policy's terminal-wealth ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Number of trials.
    pub n: usize,
    /// Mean terminal wealth.
    pub terminal_mean: f64,
    /// Median terminal wealth.
    pub terminal_median: f64,
    /// 10th percentile of terminal wealth.
    pub terminal_p10: f64,
    /// 90th percentile of terminal wealth.
    pub terminal_p90: f64,
    /// Fraction of trials ending below initial wealth.
    pub loss_probability: f64,
    /// Fraction of trials ending below the ruin line.
    pub ruin_probability: f64,
    /// Mean of `ln(terminal / initial)`.
    pub mean_log_growth: f64,
    /// Sample standard deviation (divisor `n - 1`) of the log growth.
    pub vol_log_growth: f64,
    /// Mean of per-path max drawdowns over the sampled paths.
    ///
    /// `None` when no sampled paths were supplied.
    pub max_drawdown_mean: Option<f64>,
    /// Bootstrap percentile intervals.
    pub ci: BTreeMap<CiMetric, ConfidenceInterval>,
}

impl MetricsResult {
    /// Interval of `metric`, if it was computed.
    #[must_use]
    pub fn interval(&self, metric: CiMetric) -> Option<ConfidenceInterval> {
        self.ci.get(&metric).copied()
    }

    /// Point estimate of `metric`.
    #[must_use]
    pub fn point_estimate(&self, metric: CiMetric) -> f64 {
        match metric {
            CiMetric::TerminalMean => self.terminal_mean,
            CiMetric::LossProbability => self.loss_probability,
            CiMetric::RuinProbability => self.ruin_probability,
            CiMetric::MeanLogGrowth => self.mean_log_growth,
        }
    }
}
