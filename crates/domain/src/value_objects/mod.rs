pub mod metrics_result;
pub mod sampled_paths;

pub use metrics_result::{CiMetric, ConfidenceInterval, MetricsResult};
pub use sampled_paths::SampledPaths;
