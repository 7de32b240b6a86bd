//! Batch totals over evaluated markets

use super::EvaluationResult;
use rust_decimal::Decimal;
use serde::Serialize;

/// Aggregate figures for a batch of evaluations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchTotals {
    /// Number of evaluated markets
    pub markets: usize,
    /// Markets where a side was picked
    pub picks: usize,
    /// Sum of all stakes
    pub total_stake: Decimal,
    /// Sum of EV in dollars
    pub total_ev: Decimal,
    /// Payout if every pick wins (HOLD entries excluded); absent if nothing was picked
    pub total_win_all: Option<Decimal>,
    /// `total_win_all - total_stake`
    pub profit_all_win: Option<Decimal>,
}

/// Caller-owned collection of evaluation results
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    results: Vec<EvaluationResult>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: EvaluationResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn totals(&self) -> BatchTotals {
        let total_stake = saturating_sum(self.results.iter().map(|r| r.stake));
        let total_ev = saturating_sum(self.results.iter().map(|r| r.ev_dollars));
        let picked: Vec<&EvaluationResult> =
            self.results.iter().filter(|r| !r.is_hold()).collect();

        let total_win_all = if picked.is_empty() {
            None
        } else {
            Some(saturating_sum(picked.iter().map(|r| r.win_payout_if_correct)))
        };

        BatchTotals {
            markets: self.results.len(),
            picks: picked.len(),
            total_stake: total_stake.round_dp(2),
            total_ev: total_ev.round_dp(2),
            total_win_all: total_win_all.map(|w| w.round_dp(2)),
            profit_all_win: total_win_all.map(|w| w.saturating_sub(total_stake).round_dp(2)),
        }
    }

    /// Format per-market lines and totals for CLI output
    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        if self.results.is_empty() {
            out.push_str("No markets entered.\n");
            return out;
        }

        out.push_str("=== Summary ===\n");
        for r in &self.results {
            out.push_str(&format!(
                "- {}\n    market Yes={} No={}  calib q_yes={}  -> {}  stake=${}  EV$={}  win_payout=${}\n",
                r.question,
                r.p_yes_market,
                r.p_no_market,
                r.q_yes_calibrated,
                r.side,
                r.stake,
                r.ev_dollars,
                r.win_payout_if_correct,
            ));
        }

        let totals = self.totals();
        out.push_str(&format!("\nTotal stake: ${}\n", totals.total_stake));
        out.push_str(&format!("Total expected profit (sum EV): ${}\n", totals.total_ev));
        if let (Some(win), Some(profit)) = (totals.total_win_all, totals.profit_all_win) {
            out.push_str(&format!(
                "If ALL your recommended picks win: total payout back to you = ${win}\n"
            ));
            out.push_str(&format!("Profit in that all-win scenario = ${profit}\n"));
        }
        out
    }
}

/// Sum that clamps at the Decimal bounds instead of panicking
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

impl FromIterator<EvaluationResult> for BatchReport {
    fn from_iter<I: IntoIterator<Item = EvaluationResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
