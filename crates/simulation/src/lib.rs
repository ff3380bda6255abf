//! Simulation layer for repeated binary bets.
//!
//! This crate provides:
//! - Bet-sizing policies behind the [`SizingPolicy`](policy::SizingPolicy) trait
//! - The path simulator advancing a wealth ensemble round by round
//! - The experiment orchestrator comparing policies under derived seeds
//! - A sensitivity sweep over win probability and payoff multiple

/// Prelude module for convenient imports.
pub mod prelude;

/// Experiment orchestration.
pub mod experiment;
/// Bet-sizing policies.
pub mod policy;
/// Sweep over bet models.
pub mod sensitivity;
/// Path simulator.
pub mod simulator;

pub use experiment::{ExperimentOptions, ExperimentResult, PolicyRun, run_experiment};
pub use sensitivity::{SensitivityGrid, SensitivityRow, sensitivity_sweep};
pub use simulator::{PathSampling, SimulationOutcome, simulate};
