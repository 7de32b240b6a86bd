//! Side selection, expected value and payout

use super::calibration::{calibrate, MarketOdds};
use super::{EvalConfig, EvalError, EvaluationResult, Pick, Side};
use rust_decimal::Decimal;

const PROBABILITY_DP: u32 = 4;
const DOLLAR_DP: u32 = 2;

/// Unrounded outcome of the decision step
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub pick: Pick,
    /// EV per $1 on Yes
    pub ev_yes: Decimal,
    /// EV per $1 on No
    pub ev_no: Decimal,
    /// Price paid per share of the chosen side
    pub chosen_price: Option<Decimal>,
    /// Calibrated probability that the chosen side wins
    pub win_probability: Option<Decimal>,
    pub ev_per_dollar: Decimal,
    pub ev_dollars: Decimal,
    pub win_payout: Decimal,
    pub lose_payout: Decimal,
}

impl Decision {
    fn hold(ev_yes: Decimal, ev_no: Decimal) -> Self {
        Self {
            pick: Pick::Hold,
            ev_yes,
            ev_no,
            chosen_price: None,
            win_probability: None,
            ev_per_dollar: Decimal::ZERO,
            ev_dollars: Decimal::ZERO,
            win_payout: Decimal::ZERO,
            lose_payout: Decimal::ZERO,
        }
    }
}

/// Total returned on a winning bet of `stake` at `price`, net of fees on profit
///
/// A zero price buys zero shares. When the gross return is below the stake the
/// fee term goes negative and acts as a rebate.
pub fn win_payout(price: Decimal, stake: Decimal, fee_rate: Decimal) -> Result<Decimal, EvalError> {
    let overflow = || EvalError::Overflow(stake);
    let shares = if price.is_zero() {
        Decimal::ZERO
    } else {
        stake.checked_div(price).ok_or_else(overflow)?
    };
    // Each winning share pays $1
    let gross = shares;
    let fee = gross
        .checked_sub(stake)
        .and_then(|profit| fee_rate.checked_mul(profit))
        .ok_or_else(overflow)?;
    gross.checked_sub(fee).ok_or_else(overflow)
}

/// Choose a side for calibrated `q_yes` against market `odds`
///
/// Fails with [`EvalError::Overflow`] when the stake is too large for the
/// payout to be represented.
pub fn decide(
    odds: &MarketOdds,
    q_yes: Decimal,
    stake: Decimal,
    config: &EvalConfig,
) -> Result<Decision, EvalError> {
    let ev_yes = q_yes - odds.p_yes;
    let ev_no = (Decimal::ONE - q_yes) - odds.p_no;

    if ev_yes < config.min_ev && ev_no < config.min_ev {
        return Ok(Decision::hold(ev_yes, ev_no));
    }

    let side = if ev_yes >= ev_no { Side::Yes } else { Side::No };
    let price = odds.price(side);
    let q_win = match side {
        Side::Yes => q_yes,
        Side::No => Decimal::ONE - q_yes,
    };

    // The losing side pays nothing, so EV$ reduces to q_win * win - stake.
    let (win, ev_dollars) = if stake > Decimal::ZERO {
        let win = win_payout(price, stake, config.fee_rate)?;
        let ev = q_win
            .checked_mul(win)
            .and_then(|expected| expected.checked_sub(stake))
            .ok_or(EvalError::Overflow(stake))?;
        (win, ev)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    Ok(Decision {
        pick: side.into(),
        ev_yes,
        ev_no,
        chosen_price: Some(price),
        win_probability: Some(q_win),
        ev_per_dollar: ev_yes.max(ev_no),
        ev_dollars,
        win_payout: win,
        lose_payout: Decimal::ZERO,
    })
}

/// Run calibration and decision for one market and build its rounded result
pub fn evaluate_market(
    question: &str,
    yes: Decimal,
    no: Option<Decimal>,
    stake: Decimal,
    config: &EvalConfig,
) -> Result<EvaluationResult, EvalError> {
    config.validate()?;
    let odds = MarketOdds::new(yes, no)?;
    let q_yes = calibrate(&odds, config.majority_accuracy);
    let decision = decide(&odds, q_yes, stake, config)?;

    tracing::debug!(
        question,
        p_yes = %odds.p_yes,
        q_yes = %q_yes,
        ev_yes = %decision.ev_yes,
        ev_no = %decision.ev_no,
        pick = %decision.pick,
        "Evaluated market"
    );

    Ok(EvaluationResult {
        question: question.to_string(),
        p_yes_market: odds.p_yes.round_dp(PROBABILITY_DP),
        p_no_market: odds.p_no.round_dp(PROBABILITY_DP),
        q_yes_calibrated: q_yes.round_dp(PROBABILITY_DP),
        side: decision.pick,
        stake: stake.round_dp(DOLLAR_DP),
        chosen_price: decision.chosen_price.map(|p| p.round_dp(PROBABILITY_DP)),
        win_prob_of_chosen: decision.win_probability.map(|q| q.round_dp(PROBABILITY_DP)),
        ev_per_dollar: decision.ev_per_dollar.round_dp(PROBABILITY_DP),
        ev_dollars: decision.ev_dollars.round_dp(DOLLAR_DP),
        win_payout_if_correct: decision.win_payout.round_dp(DOLLAR_DP),
        lose_payout_if_wrong: decision.lose_payout.round_dp(DOLLAR_DP),
    })
}
