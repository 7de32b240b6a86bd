//! Evaluate command implementation

use super::EvalOverrides;
use crate::config::Config;
use crate::engine::{evaluate_market, EvaluationResult};
use clap::Args;
use rust_decimal::Decimal;
use std::io::Write;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Market question, for display
    #[arg(short, long, default_value = "Market")]
    pub question: String,

    /// Market Yes probability, as 62 or 0.62
    #[arg(long)]
    pub yes: Decimal,

    /// Market No probability; defaults to 1 - Yes
    #[arg(long)]
    pub no: Option<Decimal>,

    /// Dollars to spend on the recommended side
    #[arg(long, allow_negative_numbers = true)]
    pub stake: Decimal,

    #[command(flatten)]
    pub overrides: EvalOverrides,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl EvaluateArgs {
    pub fn evaluate(&self, config: &Config) -> anyhow::Result<EvaluationResult> {
        let eval_config = self.overrides.apply(config.evaluation.to_eval_config());
        let result = evaluate_market(&self.question, self.yes, self.no, self.stake, &eval_config)?;
        Ok(result)
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let result = self.evaluate(config)?;
        let mut stdout = std::io::stdout().lock();
        if self.json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&result)?)?;
        } else {
            write_result(&mut stdout, &result)?;
        }
        Ok(())
    }
}

/// Human-readable rendering of one evaluation
pub fn write_result(out: &mut impl Write, r: &EvaluationResult) -> std::io::Result<()> {
    writeln!(out, "{}", r.question)?;
    writeln!(
        out,
        "  market Yes={} No={}  calibrated q_yes={}",
        r.p_yes_market, r.p_no_market, r.q_yes_calibrated
    )?;
    writeln!(out, "  side: {}", r.side)?;
    if let (Some(price), Some(q)) = (r.chosen_price, r.win_prob_of_chosen) {
        writeln!(out, "  price: {price}  win probability: {q}")?;
    }
    writeln!(
        out,
        "  EV per $: {}  EV$: {}  stake: ${}",
        r.ev_per_dollar, r.ev_dollars, r.stake
    )?;
    writeln!(
        out,
        "  win payout if correct: ${}  lose payout: ${}",
        r.win_payout_if_correct, r.lose_payout_if_wrong
    )
}
