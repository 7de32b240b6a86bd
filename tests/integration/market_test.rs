//! Integration tests for market classification

use poly_majority::market::{classify, MarketRecord, NotBinary};
use poly_majority::quote::{MarketFallback, QuoteResolver, QuoteSet, QuoteSource};
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::HashMap;

struct NoQuotes;

#[async_trait::async_trait]
impl QuoteSource for NoQuotes {
    async fn bulk_quotes(&self, _ids: &[String]) -> anyhow::Result<HashMap<String, QuoteSet>> {
        Ok(HashMap::new())
    }

    async fn single_quote(&self, _id: &str) -> QuoteSet {
        QuoteSet::default()
    }
}

#[test]
fn test_reordered_labels_keep_identifiers_aligned() {
    let record: MarketRecord = serde_json::from_value(json!({
        "outcomes": "[\"No\", \"Yes\"]",
        "clobTokenIds": "[\"tokA\", \"tokB\"]"
    }))
    .unwrap();

    let pair = classify(&record).unwrap();
    assert_eq!(pair.yes_label, "Yes");
    assert_eq!(pair.yes_token_id.as_deref(), Some("tokB"));
    assert_eq!(pair.no_token_id.as_deref(), Some("tokA"));
}

#[test]
fn test_multi_outcome_market_is_not_binary() {
    let record: MarketRecord = serde_json::from_value(json!({
        "outcomes": ["Trump", "Harris", "Other"],
        "clobTokenIds": ["a", "b", "c"]
    }))
    .unwrap();

    assert_eq!(classify(&record), Err(NotBinary::OutcomeCount(3)));
}

#[tokio::test]
async fn test_outcome_price_follows_raw_yes_position() {
    let record: MarketRecord = serde_json::from_value(json!({
        "outcomes": ["No", "Yes"],
        "outcomePrices": "[\"0.35\", \"0.65\"]",
    }))
    .unwrap();
    let pair = classify(&record).unwrap();
    let fallback = MarketFallback::from_record(&record, &pair);

    let resolved = QuoteResolver::new(&NoQuotes)
        .resolve(&pair, &HashMap::new(), &fallback)
        .await;
    assert_eq!(resolved.probability(), Some(dec!(0.65)));
}
