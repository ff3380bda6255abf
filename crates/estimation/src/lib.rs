//! Estimation layer: reduces terminal-wealth ensembles to metrics.
//!
//! Works on plain `f64` slices and [`SampledPaths`](kelly_mc_domain::SampledPaths)
//! only; nothing here knows about sizing policies or the bet model.

/// Nonparametric percentile bootstrap.
pub mod bootstrap;
/// Peak-to-trough drawdown.
pub mod drawdown;
/// Per-policy metrics with confidence intervals.
pub mod metrics;
/// Descriptive statistics.
pub mod stats;

pub use bootstrap::{BootstrapConfig, bootstrap_ci};
pub use drawdown::{max_drawdown, mean_max_drawdown};
pub use metrics::{EstimationConfig, compute_metrics};
