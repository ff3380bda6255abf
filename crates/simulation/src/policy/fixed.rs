//! Constant-fraction sizing.

use super::{Fraction, SizingPolicy};
use kelly_mc_domain::BetModel;
use serde::{Deserialize, Serialize};

/// Stakes the same fraction of wealth every round, whatever the odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFraction {
    /// Fraction of wealth staked each round.
    pub fraction: f64,
    /// Display name.
    #[serde(default = "FixedFraction::default_name")]
    pub name: String,
}

impl FixedFraction {
    /// Creates a fixed-fraction policy named `FixedFraction`.
    #[must_use]
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            name: Self::default_name(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn default_name() -> String {
        "FixedFraction".to_string()
    }
}

impl SizingPolicy for FixedFraction {
    fn name(&self) -> &str {
        &self.name
    }

    fn fraction(&self, _model: &BetModel, _wealth: &[f64], _round: usize) -> Fraction {
        Fraction::Scalar(self.fraction)
    }
}
