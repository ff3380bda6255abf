//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate and
//! the domain types they take.
//!
//! # Example
//!
//! ```rust
//! use kelly_mc_simulation::prelude::*;
//!
//! let model = BetModel::new(0.55, 1.0).unwrap();
//! let config = SimulationConfig::new(10, 100).with_seed(1);
//! let outcome = simulate(&model, &config, &FixedFraction::new(0.02), PathSampling::Disabled).unwrap();
//! assert_eq!(outcome.terminal_wealth.len(), 100);
//! ```

// Domain
pub use kelly_mc_domain::{BetModel, DomainError, MetricsResult, SampledPaths, SimulationConfig};

// Experiments
pub use crate::experiment::{ExperimentOptions, ExperimentResult, PolicyRun, run_experiment};

// Policies
pub use crate::policy::{
    CappedKelly, FixedFraction, Fraction, FractionalKelly, Kelly, Policy, SizingPolicy,
};

// Sensitivity
pub use crate::sensitivity::{SensitivityGrid, SensitivityRow, sensitivity_sweep};

// Simulator
pub use crate::simulator::{MAX_FRACTION, PathSampling, SimulationOutcome, simulate};
