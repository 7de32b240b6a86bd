//! Evaluation types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Evaluation errors
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    /// Probability outside [0, 100]
    #[error("probability out of range [0, 100]: {0}")]
    ProbabilityOutOfRange(Decimal),
    /// NaN or infinite input
    #[error("probability is not a finite number: {0}")]
    NonFinite(f64),
    /// Majority accuracy outside (0, 1]
    #[error("majority_accuracy must be in (0, 1]: {0}")]
    MajorityAccuracyOutOfRange(Decimal),
    /// Fee rate outside [0, 1)
    #[error("fee_rate must be in [0, 1): {0}")]
    FeeRateOutOfRange(Decimal),
    /// Payout arithmetic left the Decimal range
    #[error("stake {0} is too large to price")]
    Overflow(Decimal),
}

/// Outcome side of a binary market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Yes => write!(f, "YES"),
            Side::No => write!(f, "NO"),
        }
    }
}

/// Recommended action for one market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pick {
    /// Buy Yes shares
    Yes,
    /// Buy No shares
    No,
    /// Neither side clears the EV threshold
    Hold,
}

impl Pick {
    /// Side staked on, if any
    pub fn side(&self) -> Option<Side> {
        match self {
            Pick::Yes => Some(Side::Yes),
            Pick::No => Some(Side::No),
            Pick::Hold => None,
        }
    }
}

impl From<Side> for Pick {
    fn from(side: Side) -> Self {
        match side {
            Side::Yes => Pick::Yes,
            Side::No => Pick::No,
        }
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::Yes => write!(f, "YES"),
            Pick::No => write!(f, "NO"),
            Pick::Hold => write!(f, "HOLD"),
        }
    }
}

/// Engine parameters, fixed for one evaluation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalConfig {
    /// P(majority side is actually correct)
    pub majority_accuracy: Decimal,
    /// EV per $1 required to place a bet
    pub min_ev: Decimal,
    /// Proportional fee on winnings
    pub fee_rate: Decimal,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            majority_accuracy: Decimal::new(90, 2),
            min_ev: Decimal::ZERO,
            fee_rate: Decimal::ZERO,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.majority_accuracy <= Decimal::ZERO || self.majority_accuracy > Decimal::ONE {
            return Err(EvalError::MajorityAccuracyOutOfRange(self.majority_accuracy));
        }
        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err(EvalError::FeeRateOutOfRange(self.fee_rate));
        }
        Ok(())
    }
}

/// Display-rounded outcome of evaluating one market
///
/// Probabilities carry 4 decimal places and dollar amounts 2. The side was
/// chosen on unrounded values before this record was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub question: String,
    pub p_yes_market: Decimal,
    pub p_no_market: Decimal,
    pub q_yes_calibrated: Decimal,
    pub side: Pick,
    pub stake: Decimal,
    pub chosen_price: Option<Decimal>,
    pub win_prob_of_chosen: Option<Decimal>,
    pub ev_per_dollar: Decimal,
    pub ev_dollars: Decimal,
    pub win_payout_if_correct: Decimal,
    pub lose_payout_if_wrong: Decimal,
}

impl EvaluationResult {
    pub fn is_hold(&self) -> bool {
        self.side == Pick::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvalConfig::default().validate().is_ok());
    }

    #[test]
    fn test_accuracy_bounds() {
        let mut config = EvalConfig::default();
        config.majority_accuracy = dec!(1);
        assert!(config.validate().is_ok());

        config.majority_accuracy = dec!(0);
        assert_eq!(
            config.validate(),
            Err(EvalError::MajorityAccuracyOutOfRange(dec!(0)))
        );
    }

    #[test]
    fn test_fee_bounds() {
        let config = EvalConfig {
            fee_rate: dec!(-0.01),
            ..EvalConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EvalError::FeeRateOutOfRange(_))
        ));
    }

    #[test]
    fn test_negative_min_ev_allowed() {
        let config = EvalConfig {
            min_ev: dec!(-0.5),
            ..EvalConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pick_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Pick::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(serde_json::to_string(&Side::No).unwrap(), "\"NO\"");
        assert_eq!(Pick::from(Side::Yes), Pick::Yes);
        assert_eq!(Pick::Hold.side(), None);
    }
}
