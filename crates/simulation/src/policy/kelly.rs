//! Kelly-family sizing.
//!
//! All three variants start from the growth-optimal fraction
//! `f* = p - (1 - p) / b` of the bet model. A negative `f*` is passed through
//! unchanged and clamped to zero by the simulator.

use super::{Fraction, SizingPolicy, apply_cap};
use kelly_mc_domain::BetModel;
use serde::{Deserialize, Serialize};

/// Full Kelly, optionally capped above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kelly {
    /// Upper bound on the staked fraction.
    #[serde(default)]
    pub cap: Option<f64>,
    /// Display name.
    #[serde(default = "Kelly::default_name")]
    pub name: String,
}

impl Default for Kelly {
    fn default() -> Self {
        Self::new()
    }
}

impl Kelly {
    /// Creates an uncapped Kelly policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cap: None,
            name: Self::default_name(),
        }
    }

    /// Caps the fraction at `cap`.
    #[must_use]
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn default_name() -> String {
        "Kelly".to_string()
    }
}

impl SizingPolicy for Kelly {
    fn name(&self) -> &str {
        &self.name
    }

    fn fraction(&self, model: &BetModel, _wealth: &[f64], _round: usize) -> Fraction {
        Fraction::Scalar(apply_cap(model.kelly_fraction(), self.cap))
    }
}

/// A multiple `k` of full Kelly, optionally capped above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionalKelly {
    /// Multiplier `k` applied to `f*`.
    #[serde(default = "FractionalKelly::default_multiplier")]
    pub multiplier: f64,
    /// Upper bound on the staked fraction.
    #[serde(default)]
    pub cap: Option<f64>,
    /// Display name.
    #[serde(default = "FractionalKelly::default_name")]
    pub name: String,
}

impl Default for FractionalKelly {
    fn default() -> Self {
        Self::new(Self::default_multiplier())
    }
}

impl FractionalKelly {
    /// Creates an uncapped `multiplier * f*` policy.
    #[must_use]
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            cap: None,
            name: Self::default_name(),
        }
    }

    /// Caps the fraction at `cap`.
    #[must_use]
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn default_multiplier() -> f64 {
        0.5
    }

    fn default_name() -> String {
        "FractionalKelly".to_string()
    }
}

impl SizingPolicy for FractionalKelly {
    fn name(&self) -> &str {
        &self.name
    }

    fn fraction(&self, model: &BetModel, _wealth: &[f64], _round: usize) -> Fraction {
        Fraction::Scalar(apply_cap(self.multiplier * model.kelly_fraction(), self.cap))
    }
}

/// Full Kelly limited to `min(f*, cap)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CappedKelly {
    /// Upper bound on the staked fraction.
    #[serde(default = "CappedKelly::default_cap")]
    pub cap: f64,
    /// Display name.
    #[serde(default = "CappedKelly::default_name")]
    pub name: String,
}

impl Default for CappedKelly {
    fn default() -> Self {
        Self::new(Self::default_cap())
    }
}

impl CappedKelly {
    /// Creates a Kelly policy capped at `cap`.
    #[must_use]
    pub fn new(cap: f64) -> Self {
        Self {
            cap,
            name: Self::default_name(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn default_cap() -> f64 {
        0.10
    }

    fn default_name() -> String {
        "CappedKelly".to_string()
    }
}

impl SizingPolicy for CappedKelly {
    fn name(&self) -> &str {
        &self.name
    }

    fn fraction(&self, model: &BetModel, _wealth: &[f64], _round: usize) -> Fraction {
        Fraction::Scalar(apply_cap(model.kelly_fraction(), Some(self.cap)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelly_mc_domain::kelly_fraction;

    fn scalar(fraction: Fraction) -> f64 {
        match fraction {
            Fraction::Scalar(f) => f,
            Fraction::PerTrial(_) => panic!("Expected scalar fraction"),
        }
    }

    #[test]
    fn test_kelly_matches_formula() {
        let model = BetModel::new(0.53, 1.2).unwrap();
        let f = scalar(Kelly::new().fraction(&model, &[1.0], 0));
        assert_eq!(f, kelly_fraction(0.53, 1.2));
    }

    #[test]
    fn test_kelly_cap() {
        let model = BetModel::new(0.6, 1.0).unwrap(); // f* = 0.2
        assert!((scalar(Kelly::new().fraction(&model, &[], 0)) - 0.2).abs() < 1e-12);
        assert_eq!(scalar(Kelly::new().with_cap(0.1).fraction(&model, &[], 0)), 0.1);
    }

    #[test]
    fn test_fractional_kelly_scales_then_caps() {
        let model = BetModel::new(0.6, 1.0).unwrap();
        let half = FractionalKelly::new(0.5);
        assert!((scalar(half.fraction(&model, &[], 0)) - 0.1).abs() < 1e-12);

        let capped = FractionalKelly::new(0.5).with_cap(0.05);
        assert_eq!(scalar(capped.fraction(&model, &[], 0)), 0.05);
        assert_eq!(FractionalKelly::default().multiplier, 0.5);
    }

    #[test]
    fn test_capped_kelly_takes_minimum() {
        let strong = BetModel::new(0.7, 1.0).unwrap(); // f* = 0.4
        let weak = BetModel::new(0.52, 1.0).unwrap(); // f* = 0.04
        let policy = CappedKelly::default();

        assert_eq!(policy.cap, 0.10);
        assert_eq!(scalar(policy.fraction(&strong, &[], 0)), 0.10);
        assert!((scalar(policy.fraction(&weak, &[], 0)) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_negative_edge_passes_negative_fraction_through() {
        let model = BetModel::new(0.45, 1.0).unwrap();
        assert!(scalar(Kelly::new().fraction(&model, &[], 0)) < 0.0);
        assert!(scalar(CappedKelly::new(0.1).fraction(&model, &[], 0)) < 0.0);
    }

    #[test]
    fn test_stateless_in_round_and_wealth() {
        let model = BetModel::new(0.55, 1.0).unwrap();
        let policy = FractionalKelly::new(0.5);
        let early = policy.fraction(&model, &[1.0, 1.0], 0);
        let late = policy.fraction(&model, &[0.3, 7.0], 150);
        assert_eq!(early, late);
    }
}
