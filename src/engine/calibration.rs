//! Majority-rule calibration
//!
//! The market favourite is assumed to win `majority_accuracy` of the time,
//! whatever the size of its lead.

use super::{EvalError, Side};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest tolerated |p_yes + p_no - 1| before p_no is recomputed
const PAIR_TOLERANCE: Decimal = dec!(0.000001);

const HUNDRED: Decimal = dec!(100);

/// Normalize a fraction in [0, 1] or a percentage in (1, 100] to [0, 1]
pub fn normalize_probability(raw: Decimal) -> Result<Decimal, EvalError> {
    if raw < Decimal::ZERO || raw > HUNDRED {
        return Err(EvalError::ProbabilityOutOfRange(raw));
    }
    if raw > Decimal::ONE {
        Ok(raw / HUNDRED)
    } else {
        Ok(raw)
    }
}

/// Same as [`normalize_probability`] for float input, rejecting NaN and infinities
pub fn probability_from_f64(raw: f64) -> Result<Decimal, EvalError> {
    if !raw.is_finite() {
        return Err(EvalError::NonFinite(raw));
    }
    let value = Decimal::from_f64(raw).ok_or(EvalError::NonFinite(raw))?;
    normalize_probability(value)
}

/// Market-implied probabilities, normalized and forced to sum to one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketOdds {
    pub p_yes: Decimal,
    pub p_no: Decimal,
}

impl MarketOdds {
    /// Build odds from raw Yes and optional No inputs
    ///
    /// A missing or inconsistent No value is replaced by `1 - p_yes`.
    pub fn new(yes: Decimal, no: Option<Decimal>) -> Result<Self, EvalError> {
        let p_yes = normalize_probability(yes)?;
        let p_no = match no {
            Some(raw) => normalize_probability(raw)?,
            None => Decimal::ONE - p_yes,
        };

        let p_no = if (p_yes + p_no - Decimal::ONE).abs() > PAIR_TOLERANCE {
            tracing::debug!(%p_yes, supplied_no = %p_no, "No price inconsistent with Yes, recomputing");
            Decimal::ONE - p_yes
        } else {
            p_no
        };

        Ok(Self { p_yes, p_no })
    }

    /// Side with the strictly greater implied probability
    pub fn majority(&self) -> Option<Side> {
        match self.p_yes.cmp(&self.p_no) {
            std::cmp::Ordering::Greater => Some(Side::Yes),
            std::cmp::Ordering::Less => Some(Side::No),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Implied probability (price) of one side
    pub fn price(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.p_yes,
            Side::No => self.p_no,
        }
    }
}

/// Calibrated probability that Yes is the true outcome
pub fn calibrate(odds: &MarketOdds, majority_accuracy: Decimal) -> Decimal {
    match odds.majority() {
        Some(Side::Yes) => majority_accuracy,
        Some(Side::No) => Decimal::ONE - majority_accuracy,
        None => dec!(0.5),
    }
}
