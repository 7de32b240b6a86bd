//! Market scanner
//!
//! Discovers binary markets ending in a window, resolves P(Yes) for each and
//! optionally evaluates a fixed stake on every resolved market.

use crate::engine::{evaluate_market, BatchReport, BatchTotals, EvalConfig, EvaluationResult, Side};
use crate::market::{classify, CanonicalOutcomePair, MarketQuery, MarketRecord, MarketSource};
use crate::quote::{
    majority_side, MarketFallback, QuoteResolver, QuoteSet, QuoteSource, ResolutionTier,
    ResolvedQuote,
};
use chrono::{NaiveDate, SecondsFormat, Utc};
use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Per-run scan parameters
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub query: MarketQuery,
    /// Markets resolved concurrently
    pub concurrency: usize,
    /// Stake to evaluate on each resolved market
    pub stake: Option<Decimal>,
}

/// One side's identifier and last observed quotes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenQuote {
    pub label: String,
    pub token_id: Option<String>,
    pub best_buy: Option<Decimal>,
    pub best_sell: Option<Decimal>,
    pub midpoint: Option<Decimal>,
}

impl TokenQuote {
    fn new(label: &str, token_id: Option<&String>, quotes: &QuoteSet) -> Self {
        Self {
            label: label.to_string(),
            token_id: token_id.cloned(),
            best_buy: quotes.best_buy,
            best_sell: quotes.best_sell,
            midpoint: quotes.midpoint,
        }
    }
}

/// Scan output for one market
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub question: Option<String>,
    pub category: Option<String>,
    pub end_date: Option<String>,
    pub binary: bool,
    pub yes: TokenQuote,
    pub no: TokenQuote,
    pub q_yes_mid: Option<Decimal>,
    pub majority_side: Option<Side>,
    pub resolution_tier: Option<ResolutionTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResult>,
}

impl MarketSummary {
    fn new(record: &MarketRecord, pair: &CanonicalOutcomePair, resolved: &ResolvedQuote) -> Self {
        let q_yes_mid = resolved.probability();
        Self {
            id: record.id_string(),
            slug: record.slug.clone(),
            question: record.question.clone(),
            category: record.category.clone(),
            end_date: record.end_date.clone(),
            binary: true,
            yes: TokenQuote::new(&pair.yes_label, pair.yes_token_id.as_ref(), &resolved.yes_quotes),
            no: TokenQuote::new(&pair.no_label, pair.no_token_id.as_ref(), &resolved.no_quotes),
            q_yes_mid,
            majority_side: majority_side(q_yes_mid),
            resolution_tier: resolved.resolution.map(|r| r.tier),
            evaluation: None,
        }
    }
}

/// Complete scan output
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub count: usize,
    /// UTC timestamp, RFC 3339
    pub as_of: String,
    pub days_ahead: u32,
    pub pad_days: u32,
    pub require_accepting: bool,
    pub markets: Vec<MarketSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<BatchTotals>,
}

/// Discovery, quoting and evaluation pipeline
pub struct Scanner<M, Q> {
    markets: M,
    quotes: Q,
    config: EvalConfig,
}

impl<M: MarketSource, Q: QuoteSource> Scanner<M, Q> {
    pub fn new(markets: M, quotes: Q, config: EvalConfig) -> Self {
        Self {
            markets,
            quotes,
            config,
        }
    }

    /// Run one scan for markets ending around `today + days_ahead`
    pub async fn run(&self, opts: &ScanOptions, today: NaiveDate) -> anyhow::Result<ScanReport> {
        let records = self.markets.markets_due_in(&opts.query, today).await?;
        let fetched = records.len();

        let binary: Vec<(MarketRecord, CanonicalOutcomePair)> = records
            .into_iter()
            .filter_map(|record| match classify(&record) {
                Ok(pair) => Some((record, pair)),
                Err(reason) => {
                    tracing::debug!(slug = ?record.slug, %reason, "Skipping non-binary market");
                    None
                }
            })
            .collect();

        tracing::info!(fetched, binary = binary.len(), "Classified markets");

        let ids = unique_token_ids(binary.iter().map(|(_, pair)| pair));
        let bulk = match self.quotes.bulk_quotes(&ids).await {
            Ok(bulk) => bulk,
            Err(e) => {
                tracing::warn!(error = %e, "Bulk quotes failed, falling back to single quotes");
                HashMap::new()
            }
        };

        let resolver = QuoteResolver::new(&self.quotes);
        let bulk = &bulk;
        let resolver = &resolver;
        let mut markets: Vec<MarketSummary> = stream::iter(binary.iter())
            .map(|(record, pair)| async move {
                let fallback = MarketFallback::from_record(record, pair);
                let resolved = resolver.resolve(pair, bulk, &fallback).await;
                if resolved.resolution.is_none() {
                    tracing::warn!(slug = ?record.slug, "Could not resolve P(Yes), skipping");
                }
                MarketSummary::new(record, pair, &resolved)
            })
            .buffered(opts.concurrency.max(1))
            .collect()
            .await;

        let totals = opts.stake.map(|stake| self.evaluate_all(&mut markets, stake));

        Ok(ScanReport {
            count: markets.len(),
            as_of: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            days_ahead: opts.query.days_ahead,
            pad_days: opts.query.pad_days,
            require_accepting: opts.query.require_accepting,
            markets,
            totals,
        })
    }

    /// Evaluate the stake on every resolved market and total the batch
    fn evaluate_all(&self, markets: &mut [MarketSummary], stake: Decimal) -> BatchTotals {
        let mut report = BatchReport::new();
        for market in markets.iter_mut() {
            let Some(p_yes) = market.q_yes_mid else {
                continue;
            };
            let question = market.question.as_deref().unwrap_or_default();
            match evaluate_market(question, p_yes, None, stake, &self.config) {
                Ok(result) => {
                    report.push(result.clone());
                    market.evaluation = Some(result);
                }
                Err(e) => tracing::warn!(slug = ?market.slug, error = %e, "Evaluation failed"),
            }
        }
        report.totals()
    }
}

/// Present identifiers across pairs, first occurrence order, no duplicates
pub fn unique_token_ids<'a>(pairs: impl Iterator<Item = &'a CanonicalOutcomePair>) -> Vec<String> {
    let mut seen = HashSet::new();
    pairs
        .flat_map(CanonicalOutcomePair::token_ids)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
