//! Errors raised when experiment parameters leave their domain.

use thiserror::Error;

/// Invalid model, configuration or estimation parameters.
///
/// Every variant is raised synchronously before any simulation or resampling
/// work starts, except [`DomainError::FractionShapeMismatch`], which is raised
/// from the round in which a policy returns a mis-shaped vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Win probability outside `(0, 1)`.
    #[error("win probability out of range: {0} (expected 0 < p < 1)")]
    WinProbabilityOutOfRange(f64),

    /// Payoff multiple not strictly positive.
    #[error("payoff multiple must be positive, got {0}")]
    NonPositivePayoff(f64),

    /// Zero rounds requested.
    #[error("rounds must be > 0")]
    ZeroRounds,

    /// Zero trials requested.
    #[error("trials must be > 0")]
    ZeroTrials,

    /// `trials * rounds` outcome cells do not fit in a `usize`.
    #[error("ensemble of {trials} trials x {rounds} rounds is too large")]
    EnsembleTooLarge {
        /// Requested trials.
        trials: usize,
        /// Requested rounds.
        rounds: usize,
    },

    /// Initial wealth not strictly positive.
    #[error("initial wealth must be positive, got {0}")]
    NonPositiveWealth(f64),

    /// Ruin threshold outside `(0, 1)`.
    #[error("ruin threshold out of range: {0} (expected 0 < threshold < 1)")]
    RuinThresholdOutOfRange(f64),

    /// Zero bootstrap resamples requested.
    #[error("bootstrap sample count must be > 0")]
    NonPositiveBootstrapSamples,

    /// Confidence level outside `(0, 1)`.
    #[error("confidence level out of range: {0} (expected 0 < level < 1)")]
    ConfidenceLevelOutOfRange(f64),

    /// Metrics requested for an empty sample.
    #[error("cannot estimate metrics from an empty sample")]
    EmptySample,

    /// Sampled path rows of unequal length, or rows with no columns.
    #[error("sampled paths must be non-empty rows of equal length")]
    RaggedPaths,

    /// A per-trial fraction vector does not match the ensemble size.
    #[error("policy `{policy}` returned {actual} fractions for {expected} trials")]
    FractionShapeMismatch {
        /// Name of the offending policy.
        policy: String,
        /// Ensemble size.
        expected: usize,
        /// Length of the returned vector.
        actual: usize,
    },

    /// `base + 1000 * index` does not fit in a `u64`.
    #[error("seed overflow deriving policy {index} from base seed {base}")]
    SeedOverflow {
        /// Experiment base seed.
        base: u64,
        /// Zero-based policy index.
        index: usize,
    },
}

/// Convenience alias for results carrying a [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;
