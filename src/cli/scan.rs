//! Scan command implementation

use super::{write_json, EvalOverrides};
use crate::config::Config;
use crate::market::{GammaClient, GammaConfig, MarketQuery};
use crate::quote::{ClobClient, ClobConfig};
use crate::scan::{ScanOptions, Scanner};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Center the end-date window this many days ahead
    #[arg(long)]
    pub days: Option<u32>,

    /// Days either side of the center
    #[arg(long)]
    pub pad: Option<u32>,

    /// Maximum markets per Gamma request
    #[arg(long)]
    pub limit: Option<u32>,

    /// Include listed markets that are not accepting orders
    #[arg(long)]
    pub no_accepting: bool,

    /// Evaluate this stake on every resolved market
    #[arg(long)]
    pub stake: Option<Decimal>,

    /// Write JSON to this path instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: EvalOverrides,
}

impl ScanArgs {
    /// Scan options from config with flags taking precedence
    pub fn options(&self, config: &Config) -> ScanOptions {
        let discovery = &config.discovery;
        ScanOptions {
            query: MarketQuery {
                days_ahead: self.days.unwrap_or(discovery.days_ahead),
                pad_days: self.pad.unwrap_or(discovery.pad_days),
                limit: self.limit.unwrap_or(discovery.limit),
                require_accepting: discovery.require_accepting && !self.no_accepting,
            },
            concurrency: discovery.concurrency,
            stake: self.stake,
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let eval_config = self.overrides.apply(config.evaluation.to_eval_config());
        eval_config.validate()?;

        let gamma = GammaClient::with_config(GammaConfig {
            base_url: config.api.gamma_url.clone(),
            timeout: config.api.timeout(),
        })?;
        let clob = ClobClient::with_config(ClobConfig {
            base_url: config.api.clob_url.clone(),
            timeout: config.api.timeout(),
            single_timeout: config.api.single_timeout(),
        })?;

        let opts = self.options(config);
        tracing::info!(
            days_ahead = opts.query.days_ahead,
            pad_days = opts.query.pad_days,
            require_accepting = opts.query.require_accepting,
            "Starting market scan"
        );

        let scanner = Scanner::new(gamma, clob, eval_config);
        let report = scanner.run(&opts, Utc::now().date_naive()).await?;

        write_json(&report, self.out.as_deref(), std::io::stdout().lock())?;
        if let Some(path) = &self.out {
            println!("Wrote {} markets to {}", report.count, path.display());
        }
        Ok(())
    }
}
