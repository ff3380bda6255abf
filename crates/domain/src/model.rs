//! Binary repeated-bet model.
//!
//! Each round the bettor stakes a fraction `f` of current wealth:
//! - win with probability `p`: wealth *= 1 + f * b
//! - lose with probability 1 - p: wealth *= 1 - f

use crate::bounds::{in_open_unit_interval, is_positive};
use crate::error::DomainError;
use crate::kelly::kelly_fraction;
use serde::{Deserialize, Serialize};

/// Parameters of a single repeated binary wager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetModel {
    /// Probability of winning a round, in `(0, 1)`.
    pub win_probability: f64,
    /// Payoff multiple applied to the stake on a win (even odds => 1.0).
    pub payoff_multiple: f64,
}

impl BetModel {
    /// Creates a validated bet model.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::WinProbabilityOutOfRange`] or
    /// [`DomainError::NonPositivePayoff`] when a parameter is out of range.
    pub fn new(win_probability: f64, payoff_multiple: f64) -> Result<Self, DomainError> {
        let model = Self {
            win_probability,
            payoff_multiple,
        };
        model.validate()?;
        Ok(model)
    }

    /// Checks both parameters.
    ///
    /// Needed for models built by struct literal or deserialisation.
    ///
    /// # Errors
    ///
    /// See [`BetModel::new`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if !in_open_unit_interval(self.win_probability) {
            return Err(DomainError::WinProbabilityOutOfRange(self.win_probability));
        }
        if !is_positive(self.payoff_multiple) {
            return Err(DomainError::NonPositivePayoff(self.payoff_multiple));
        }
        Ok(())
    }

    /// Probability of losing a round.
    #[must_use]
    pub fn loss_probability(&self) -> f64 {
        1.0 - self.win_probability
    }

    /// Expected gain per unit staked: `p * b - (1 - p)`.
    #[must_use]
    pub fn edge(&self) -> f64 {
        self.win_probability * self.payoff_multiple - self.loss_probability()
    }

    /// Growth-optimal stake fraction for this model.
    #[must_use]
    pub fn kelly_fraction(&self) -> f64 {
        kelly_fraction(self.win_probability, self.payoff_multiple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_valid_model() {
        let model = BetModel::new(0.55, 1.0).unwrap();
        assert_eq!(model.win_probability, 0.55);
        assert_eq!(model.payoff_multiple, 1.0);
        assert!((model.edge() - 0.1).abs() < 1e-12);
        assert!((model.kelly_fraction() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        for p in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = BetModel::new(p, 1.0).unwrap_err();
            assert!(matches!(err, DomainError::WinProbabilityOutOfRange(_)), "p = {p}");
        }
        assert!(
            BetModel::new(0.0, 1.0)
                .unwrap_err()
                .to_string()
                .contains("win probability out of range")
        );
    }

    #[test]
    fn test_rejects_non_positive_payoff() {
        for b in [0.0, -1.0, f64::NAN] {
            let err = BetModel::new(0.5, b).unwrap_err();
            assert!(matches!(err, DomainError::NonPositivePayoff(_)), "b = {b}");
        }
        assert!(
            BetModel::new(0.5, 0.0)
                .unwrap_err()
                .to_string()
                .contains("payoff multiple must be positive")
        );
    }

    #[test]
    fn test_validate_catches_literal_construction() {
        let model = BetModel {
            win_probability: 1.2,
            payoff_multiple: 1.0,
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_deserialized_model_round_trips_fields() {
        let model: BetModel =
            serde_json::from_str(r#"{"win_probability":0.53,"payoff_multiple":1.2}"#).unwrap();
        assert_eq!(model, BetModel::new(0.53, 1.2).unwrap());
    }
}
