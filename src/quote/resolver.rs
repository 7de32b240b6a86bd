//! Quote resolution cascade
//!
//! Reduces bulk quotes, single-identifier quotes and market-level fallbacks
//! to one P(Yes) estimate. Tiers are tried in a fixed order and the first one
//! producing a value wins:
//!
//! 1. Yes midpoint
//! 2. Yes best buy / best sell mean
//! 3. Yes best buy
//! 4. 1 - No midpoint
//! 5. The same four again on single-identifier quotes
//! 6. Outcome settlement price at the Yes position
//! 7. Best bid / best ask mean

use super::{QuoteSet, QuoteSource};
use crate::engine::Side;
use crate::market::{CanonicalOutcomePair, MarketRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const TWO: Decimal = dec!(2);
const HALF: Decimal = dec!(0.5);

/// Which Yes-side quote produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSignal {
    Midpoint,
    BuySellMean,
    BestBuy,
}

/// Cascade step that produced a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    BulkYes(QuoteSignal),
    BulkNoMidpoint,
    SingleYes(QuoteSignal),
    SingleNoMidpoint,
    OutcomePrices,
    BidAskMean,
}

impl fmt::Display for QuoteSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteSignal::Midpoint => "midpoint",
            QuoteSignal::BuySellMean => "buy_sell_mean",
            QuoteSignal::BestBuy => "best_buy",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionTier::BulkYes(signal) => write!(f, "bulk_yes_{signal}"),
            ResolutionTier::BulkNoMidpoint => f.write_str("bulk_no_midpoint"),
            ResolutionTier::SingleYes(signal) => write!(f, "single_yes_{signal}"),
            ResolutionTier::SingleNoMidpoint => f.write_str("single_no_midpoint"),
            ResolutionTier::OutcomePrices => f.write_str("outcome_prices"),
            ResolutionTier::BidAskMean => f.write_str("bid_ask_mean"),
        }
    }
}

/// A resolved P(Yes) and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub probability: Decimal,
    pub tier: ResolutionTier,
}

impl Resolution {
    fn new(probability: Decimal, tier: ResolutionTier) -> Self {
        Self { probability, tier }
    }
}

/// YES at or above one half, NO below, absent when unresolved
pub fn majority_side(probability: Option<Decimal>) -> Option<Side> {
    probability.map(|p| if p >= HALF { Side::Yes } else { Side::No })
}

type QuoteAttempt = fn(&QuoteSet) -> Option<Decimal>;

fn midpoint(quotes: &QuoteSet) -> Option<Decimal> {
    quotes.midpoint
}

fn buy_sell_mean(quotes: &QuoteSet) -> Option<Decimal> {
    Some((quotes.best_buy? + quotes.best_sell?) / TWO)
}

fn best_buy(quotes: &QuoteSet) -> Option<Decimal> {
    quotes.best_buy
}

/// Yes-side attempts in precedence order
const YES_TIERS: [(QuoteSignal, QuoteAttempt); 3] = [
    (QuoteSignal::Midpoint, midpoint),
    (QuoteSignal::BuySellMean, buy_sell_mean),
    (QuoteSignal::BestBuy, best_buy),
];

/// P(Yes) from the Yes identifier's own quotes
pub fn yes_side_probability(quotes: &QuoteSet) -> Option<(Decimal, QuoteSignal)> {
    YES_TIERS
        .iter()
        .find_map(|(signal, attempt)| attempt(quotes).map(|p| (p, *signal)))
}

/// P(Yes) as the complement of the No midpoint
pub fn no_side_probability(quotes: &QuoteSet) -> Option<Decimal> {
    quotes.midpoint.map(|m| Decimal::ONE - m)
}

fn quotes_for(bulk: &HashMap<String, QuoteSet>, id: Option<&String>) -> QuoteSet {
    id.and_then(|id| bulk.get(id)).copied().unwrap_or_default()
}

/// Tiers 1 to 4 over bulk quotes only
pub fn resolve_bulk(
    pair: &CanonicalOutcomePair,
    bulk: &HashMap<String, QuoteSet>,
) -> Option<Resolution> {
    let yes = quotes_for(bulk, pair.yes_token_id.as_ref());
    let no = quotes_for(bulk, pair.no_token_id.as_ref());
    resolve_quotes(&yes, &no, ResolutionTier::BulkYes, ResolutionTier::BulkNoMidpoint)
}

fn resolve_quotes(
    yes: &QuoteSet,
    no: &QuoteSet,
    yes_tier: fn(QuoteSignal) -> ResolutionTier,
    no_tier: ResolutionTier,
) -> Option<Resolution> {
    if let Some((p, signal)) = yes_side_probability(yes) {
        return Some(Resolution::new(p, yes_tier(signal)));
    }
    no_side_probability(no).map(|p| Resolution::new(p, no_tier))
}

/// Market-level data used once quotes are exhausted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketFallback {
    pub outcome_prices: Option<Vec<Decimal>>,
    /// Raw position of the Yes label
    pub yes_index: usize,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
}

impl MarketFallback {
    pub fn from_record(record: &MarketRecord, pair: &CanonicalOutcomePair) -> Self {
        Self {
            outcome_prices: record.outcome_prices(),
            yes_index: pair.yes_index,
            best_bid: record.best_bid(),
            best_ask: record.best_ask(),
        }
    }
}

fn in_unit_range(p: Decimal) -> Option<Decimal> {
    (p >= Decimal::ZERO && p <= Decimal::ONE).then_some(p)
}

fn outcome_price(fallback: &MarketFallback) -> Option<Decimal> {
    let prices = fallback.outcome_prices.as_ref().filter(|p| p.len() >= 2)?;
    let index = if fallback.yes_index < prices.len() {
        fallback.yes_index
    } else {
        0
    };
    in_unit_range(prices[index])
}

fn bid_ask_mean(fallback: &MarketFallback) -> Option<Decimal> {
    in_unit_range((fallback.best_bid? + fallback.best_ask?) / TWO)
}

type FallbackAttempt = fn(&MarketFallback) -> Option<Decimal>;

const FALLBACK_TIERS: [(ResolutionTier, FallbackAttempt); 2] = [
    (ResolutionTier::OutcomePrices, outcome_price),
    (ResolutionTier::BidAskMean, bid_ask_mean),
];

/// Resolution plus the quotes last observed for each side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedQuote {
    pub resolution: Option<Resolution>,
    pub yes_quotes: QuoteSet,
    pub no_quotes: QuoteSet,
}

impl ResolvedQuote {
    pub fn probability(&self) -> Option<Decimal> {
        self.resolution.map(|r| r.probability)
    }
}

/// Runs the full cascade, fetching single quotes when bulk data is missing
pub struct QuoteResolver<'a> {
    source: &'a dyn QuoteSource,
}

impl<'a> QuoteResolver<'a> {
    pub fn new(source: &'a dyn QuoteSource) -> Self {
        Self { source }
    }

    pub async fn resolve(
        &self,
        pair: &CanonicalOutcomePair,
        bulk: &HashMap<String, QuoteSet>,
        fallback: &MarketFallback,
    ) -> ResolvedQuote {
        let mut resolved = ResolvedQuote {
            resolution: None,
            yes_quotes: quotes_for(bulk, pair.yes_token_id.as_ref()),
            no_quotes: quotes_for(bulk, pair.no_token_id.as_ref()),
        };

        resolved.resolution = resolve_quotes(
            &resolved.yes_quotes,
            &resolved.no_quotes,
            ResolutionTier::BulkYes,
            ResolutionTier::BulkNoMidpoint,
        );
        if resolved.resolution.is_some() {
            return resolved;
        }

        if let Some(id) = &pair.yes_token_id {
            let single = self.source.single_quote(id).await;
            tracing::debug!(token_id = %id, ?single, "Fetched single Yes quote");
            if !single.is_empty() {
                resolved.yes_quotes = single;
            }
            if let Some((p, signal)) = yes_side_probability(&single) {
                resolved.resolution = Some(Resolution::new(p, ResolutionTier::SingleYes(signal)));
                return resolved;
            }
        }

        if let Some(id) = &pair.no_token_id {
            let single = self.source.single_quote(id).await;
            tracing::debug!(token_id = %id, ?single, "Fetched single No quote");
            if !single.is_empty() {
                resolved.no_quotes = single;
            }
            if let Some(p) = no_side_probability(&single) {
                resolved.resolution = Some(Resolution::new(p, ResolutionTier::SingleNoMidpoint));
                return resolved;
            }
        }

        resolved.resolution = FALLBACK_TIERS
            .iter()
            .find_map(|(tier, attempt)| attempt(fallback).map(|p| Resolution::new(p, *tier)));

        if resolved.resolution.is_none() {
            tracing::debug!(yes = ?pair.yes_token_id, "No probability signal for market");
        }
        resolved
    }
}
