//! JSON experiment description for `kelly-mc run --config`.

use anyhow::{Context, Result};
use kelly_mc_domain::{BetModel, SimulationConfig};
use kelly_mc_simulation::experiment::ExperimentOptions;
use kelly_mc_simulation::policy::Policy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to run one experiment.
///
/// ```json
/// {
///   "model": {"win_probability": 0.53, "payoff_multiple": 1.0},
///   "config": {"rounds": 200, "trials": 20000, "seed": 7},
///   "policies": [{"kind": "kelly"}, {"kind": "fixed", "fraction": 0.02, "name": "Fixed_2pct"}],
///   "options": {"bootstrap_samples": 800}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentFile {
    pub model: BetModel,
    #[serde(default)]
    pub config: SimulationConfig,
    #[serde(default = "Policy::standard_set")]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub options: ExperimentOptions,
}

impl ExperimentFile {
    /// Reads and parses an experiment file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read experiment file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid experiment file {}", path.display()))
    }

    /// Parses an experiment description from JSON text.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
