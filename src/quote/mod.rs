//! Quote module
//!
//! CLOB price observations per quote identifier and the cascade that reduces
//! them to one P(Yes) estimate.

mod clob;
mod resolver;

pub use clob::{apply_midpoints, apply_prices, ClobClient, ClobConfig};
pub use resolver::{
    majority_side, no_side_probability, resolve_bulk, yes_side_probability, MarketFallback,
    QuoteResolver, QuoteSignal, Resolution, ResolutionTier, ResolvedQuote,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prices observed for one quote identifier, each in [0, 1] when present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSet {
    /// Price to buy (BUY side)
    pub best_buy: Option<Decimal>,
    /// Price to sell (SELL side)
    pub best_sell: Option<Decimal>,
    pub midpoint: Option<Decimal>,
}

impl QuoteSet {
    pub fn is_empty(&self) -> bool {
        self.best_buy.is_none() && self.best_sell.is_none() && self.midpoint.is_none()
    }
}

/// Trait for quote provider implementations
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Quotes for many identifiers at once; missing identifiers are normal
    async fn bulk_quotes(&self, ids: &[String]) -> anyhow::Result<HashMap<String, QuoteSet>>;

    /// Quotes for one identifier; every leg independently optional
    async fn single_quote(&self, id: &str) -> QuoteSet;
}
