//! Interactive evaluator
//!
//! Reads settings and then markets from a line-oriented input until a blank
//! question, printing each result and a batch summary at the end.

use crate::config::Config;
use crate::engine::{evaluate_market, normalize_probability, BatchReport, EvalConfig, EvalError};
use crate::market::decimal_from_str;
use clap::Args;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

#[derive(Args, Debug)]
pub struct InteractiveArgs {}

impl InteractiveArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let stdin = std::io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), std::io::stdout().lock());
        let report = run_session(&mut prompter, config.evaluation.to_eval_config())?;
        tracing::debug!(markets = report.results().len(), "Interactive session finished");
        Ok(())
    }
}

/// Line prompter over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line of text
    pub fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Prompt and read one trimmed line; `None` at end of input
    pub fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read a number accepted by `check`, re-prompting on anything else
    ///
    /// `check` may map the number to another value, as the stake prompt does
    /// with the evaluated market.
    ///
    /// Blank input yields `None` when `allow_blank` is set. End of input
    /// always yields `None`.
    pub fn read_checked<T, F>(
        &mut self,
        prompt: &str,
        allow_blank: bool,
        check: F,
    ) -> anyhow::Result<Option<T>>
    where
        F: Fn(Decimal) -> Result<T, EvalError>,
    {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if line.is_empty() && allow_blank {
                return Ok(None);
            }
            match decimal_from_str(&line) {
                Some(value) => match check(value) {
                    Ok(value) => return Ok(Some(value)),
                    Err(e) => self.say(&format!("{e}. Please try again."))?,
                },
                None => self.say("Please enter a number (or leave blank if allowed).")?,
            }
        }
    }

    /// Read any number
    pub fn read_number(&mut self, prompt: &str, allow_blank: bool) -> anyhow::Result<Option<Decimal>> {
        self.read_checked(prompt, allow_blank, Ok::<Decimal, EvalError>)
    }

    /// Read a probability given as a fraction or a percentage
    pub fn read_probability(
        &mut self,
        prompt: &str,
        allow_blank: bool,
    ) -> anyhow::Result<Option<Decimal>> {
        self.read_checked(prompt, allow_blank, normalize_probability)
    }
}

fn check_accuracy(value: Decimal) -> Result<Decimal, EvalError> {
    EvalConfig {
        majority_accuracy: value,
        ..EvalConfig::default()
    }
    .validate()
    .map(|_| value)
}

fn check_fee(value: Decimal) -> Result<Decimal, EvalError> {
    EvalConfig {
        fee_rate: value,
        ..EvalConfig::default()
    }
    .validate()
    .map(|_| value)
}

/// Prompt for settings, then markets until a blank question
pub fn run_session<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    defaults: EvalConfig,
) -> anyhow::Result<BatchReport> {
    prompter.say("=== Majority-Rule Interactive Evaluator ===")?;

    let accuracy = prompter.read_checked(
        &format!("Majority accuracy (default {}): ", defaults.majority_accuracy),
        true,
        check_accuracy,
    )?;
    let min_ev = prompter.read_number(
        &format!("Min EV per $ to bet (default {}): ", defaults.min_ev),
        true,
    )?;
    let fee_rate = prompter.read_checked(
        &format!("Fee rate on profits (default {}, e.g. 0.02 for 2%): ", defaults.fee_rate),
        true,
        check_fee,
    )?;
    let config = EvalConfig {
        majority_accuracy: accuracy.unwrap_or(defaults.majority_accuracy),
        min_ev: min_ev.unwrap_or(defaults.min_ev),
        fee_rate: fee_rate.unwrap_or(defaults.fee_rate),
    };

    prompter.say("\nEnter markets. Leave question blank to finish.")?;
    prompter.say("You can enter Yes% as 62 or 0.62; No% optional (assumes 1 - Yes).\n")?;

    let mut report = BatchReport::new();
    loop {
        let question = match prompter.read_line("Question: ")? {
            Some(q) if !q.is_empty() => q,
            _ => break,
        };
        let Some(yes) = prompter.read_probability("  Yes % (e.g. 62 or 0.62): ", false)? else {
            break;
        };
        let no = prompter.read_probability("  No %  (optional, press Enter to use 1 - Yes): ", true)?;
        let Some(result) = prompter.read_checked(
            "  Stake ($ to spend on recommended side): ",
            false,
            |stake| evaluate_market(&question, yes, no, stake, &config),
        )?
        else {
            break;
        };

        prompter.say(&format!(
            "  -> Side: {}, EV$: {}, Win payout if correct: ${}, Lose payout: ${}\n",
            result.side, result.ev_dollars, result.win_payout_if_correct, result.lose_payout_if_wrong
        ))?;
        report.push(result);
    }

    prompter.say("")?;
    prompter.say(report.format_summary().trim_end())?;
    Ok(report)
}
