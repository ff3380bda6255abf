//! Bet-sizing policies.
//!
//! A policy maps `(model, current wealth, round)` to the fraction of wealth to
//! stake. The variants in this module depend only on the bet model, never on
//! wealth history; the signature still receives wealth and round so
//! path-dependent rules can implement the same trait.

mod fixed;
mod kelly;

pub use fixed::FixedFraction;
pub use kelly::{CappedKelly, FractionalKelly, Kelly};

use kelly_mc_domain::BetModel;
use serde::{Deserialize, Serialize};

/// Fraction of wealth to stake this round.
#[derive(Debug, Clone, PartialEq)]
pub enum Fraction {
    /// Same fraction for every trial; broadcast to the ensemble.
    Scalar(f64),
    /// One fraction per trial, in trial order.
    PerTrial(Vec<f64>),
}

impl Fraction {
    /// Expands to one value per trial.
    #[must_use]
    pub fn broadcast(self, trials: usize) -> Vec<f64> {
        match self {
            Self::Scalar(f) => vec![f; trials],
            Self::PerTrial(fractions) => fractions,
        }
    }
}

impl From<f64> for Fraction {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

/// A bet-sizing rule.
pub trait SizingPolicy {
    /// Name keying this policy's results in an experiment.
    fn name(&self) -> &str;

    /// Fraction to stake in `round` given the current wealth of every trial.
    ///
    /// Values outside `[0, 0.999]` are clamped by the simulator.
    fn fraction(&self, model: &BetModel, wealth: &[f64], round: usize) -> Fraction;
}

impl<P: SizingPolicy + ?Sized> SizingPolicy for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fraction(&self, model: &BetModel, wealth: &[f64], round: usize) -> Fraction {
        (**self).fraction(model, wealth, round)
    }
}

impl<P: SizingPolicy + ?Sized> SizingPolicy for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fraction(&self, model: &BetModel, wealth: &[f64], round: usize) -> Fraction {
        (**self).fraction(model, wealth, round)
    }
}

/// Closed set of the built-in policies.
///
/// Serialised with a `kind` tag, e.g.
/// `{"kind": "fractional_kelly", "multiplier": 0.5, "name": "HalfKelly"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    /// See [`FixedFraction`].
    Fixed(FixedFraction),
    /// See [`Kelly`].
    Kelly(Kelly),
    /// See [`FractionalKelly`].
    FractionalKelly(FractionalKelly),
    /// See [`CappedKelly`].
    CappedKelly(CappedKelly),
}

impl Policy {
    /// Fixed 2% and 5%, full Kelly, half Kelly and Kelly capped at 10%.
    #[must_use]
    pub fn standard_set() -> Vec<Self> {
        vec![
            FixedFraction::new(0.02).named("Fixed_2pct").into(),
            FixedFraction::new(0.05).named("Fixed_5pct").into(),
            Kelly::new().into(),
            FractionalKelly::new(0.5).named("HalfKelly").into(),
            CappedKelly::new(0.10).named("KellyCapped_10pct").into(),
        ]
    }

    fn inner(&self) -> &dyn SizingPolicy {
        match self {
            Self::Fixed(policy) => policy,
            Self::Kelly(policy) => policy,
            Self::FractionalKelly(policy) => policy,
            Self::CappedKelly(policy) => policy,
        }
    }
}

impl SizingPolicy for Policy {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn fraction(&self, model: &BetModel, wealth: &[f64], round: usize) -> Fraction {
        self.inner().fraction(model, wealth, round)
    }
}

impl From<FixedFraction> for Policy {
    fn from(policy: FixedFraction) -> Self {
        Self::Fixed(policy)
    }
}

impl From<Kelly> for Policy {
    fn from(policy: Kelly) -> Self {
        Self::Kelly(policy)
    }
}

impl From<FractionalKelly> for Policy {
    fn from(policy: FractionalKelly) -> Self {
        Self::FractionalKelly(policy)
    }
}

impl From<CappedKelly> for Policy {
    fn from(policy: CappedKelly) -> Self {
        Self::CappedKelly(policy)
    }
}

/// Applies an optional upper cap.
pub(crate) fn apply_cap(fraction: f64, cap: Option<f64>) -> f64 {
    match cap {
        Some(cap) => fraction.min(cap),
        None => fraction,
    }
}
