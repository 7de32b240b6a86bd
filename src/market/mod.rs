//! Market discovery and classification
//!
//! Finds binary Yes/No markets ending in a date window via the Gamma API and
//! normalizes their outcome labels and quote identifiers.

pub mod classifier;
mod gamma;
mod record;

pub use classifier::{classify, is_binary_yes_no, NotBinary};
pub use gamma::{DiscoveryWindow, GammaClient, GammaConfig};
pub use record::{
    decimal_from_str, parse_decimal, parse_decimal_list, parse_list, parse_probability,
    MarketRecord,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome labels and quote identifiers with Yes first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalOutcomePair {
    pub yes_label: String,
    pub no_label: String,
    /// Quote identifier of the Yes outcome
    pub yes_token_id: Option<String>,
    /// Quote identifier of the No outcome
    pub no_token_id: Option<String>,
    /// Position the Yes label held in the raw record
    pub yes_index: usize,
}

impl CanonicalOutcomePair {
    /// Present identifiers, Yes first
    pub fn token_ids(&self) -> Vec<String> {
        [&self.yes_token_id, &self.no_token_id]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Discovery parameters for one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    /// Center of the end-date window, in days from today
    pub days_ahead: u32,
    /// Days either side of the center
    pub pad_days: u32,
    /// Maximum markets per request
    pub limit: u32,
    /// Only keep markets accepting orders
    pub require_accepting: bool,
}

/// Trait for market discovery implementations
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Open markets whose end date falls in the query window around `today`
    async fn markets_due_in(
        &self,
        query: &MarketQuery,
        today: NaiveDate,
    ) -> anyhow::Result<Vec<MarketRecord>>;
}
