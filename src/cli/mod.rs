//! CLI interface for poly-majority
//!
//! Provides subcommands for:
//! - `scan`: Discover binary markets ending ~N days out and resolve their odds
//! - `evaluate`: Evaluate a single market from given odds
//! - `interactive`: Prompt for markets and print a batch summary
//! - `config`: Show configuration

mod evaluate;
mod interactive;
mod output;
mod scan;

pub use evaluate::EvaluateArgs;
pub use interactive::{run_session, InteractiveArgs, Prompter};
pub use output::write_json;
pub use scan::ScanArgs;

use crate::engine::EvalConfig;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "poly-majority")]
#[command(about = "Majority-rule evaluator for Polymarket binary Yes/No markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover markets and resolve P(Yes) for each
    Scan(ScanArgs),
    /// Evaluate one market
    Evaluate(EvaluateArgs),
    /// Enter markets one by one and get a batch summary
    Interactive(InteractiveArgs),
    /// Show configuration
    Config,
}

/// Per-invocation overrides of the `[evaluation]` section
#[derive(Args, Debug, Clone, Default)]
pub struct EvalOverrides {
    /// P(majority side is actually correct)
    #[arg(long)]
    pub accuracy: Option<Decimal>,

    /// Minimum EV per $1 required to place a bet
    #[arg(long, allow_negative_numbers = true)]
    pub min_ev: Option<Decimal>,

    /// Proportional fee on winnings
    #[arg(long)]
    pub fee: Option<Decimal>,
}

impl EvalOverrides {
    pub fn apply(&self, base: EvalConfig) -> EvalConfig {
        EvalConfig {
            majority_accuracy: self.accuracy.unwrap_or(base.majority_accuracy),
            min_ev: self.min_ev.unwrap_or(base.min_ev),
            fee_rate: self.fee.unwrap_or(base.fee_rate),
        }
    }
}
