//! Core domain types for repeated binary bets.
//!
//! This crate holds the read-only inputs of an experiment and the records it
//! produces:
//! - Bet model and simulation configuration with validation
//! - Kelly sizing math
//! - Sampled wealth paths and per-policy metrics
//! - Seeded random streams shared by simulation and estimation

/// Numeric bounds shared by the validators.
pub mod bounds;
/// Simulation configuration.
pub mod config;
/// Domain errors.
pub mod error;
/// Kelly criterion helpers.
pub mod kelly;
/// Binary bet model.
pub mod model;
/// Random stream construction and seed derivation.
pub mod rng;
/// Immutable records produced by a run.
pub mod value_objects;

pub use config::SimulationConfig;
pub use error::{DomainError, DomainResult};
pub use kelly::{expected_log_growth, kelly_fraction};
pub use model::BetModel;
pub use value_objects::{CiMetric, ConfidenceInterval, MetricsResult, SampledPaths};
