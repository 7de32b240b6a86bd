//! Polymarket CLOB REST client for quotes
//!
//! Bulk endpoints accept either a `{"params": [...]}` wrapper or a bare list
//! depending on deployment, so each bulk call tries the wrapper first and
//! falls back to the bare list when it is rejected.

use super::{QuoteSet, QuoteSource};
use crate::config::DEFAULT_CLOB_URL;
use crate::market::parse_probability;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const BUY: &str = "BUY";
const SELL: &str = "SELL";

/// Configuration for the CLOB client
#[derive(Debug, Clone)]
pub struct ClobConfig {
    /// Base URL for the CLOB REST API
    pub base_url: String,
    /// Timeout for bulk requests
    pub timeout: Duration,
    /// Timeout for single-identifier requests
    pub single_timeout: Duration,
}

impl Default for ClobConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLOB_URL.to_string(),
            timeout: Duration::from_secs(30),
            single_timeout: Duration::from_secs(15),
        }
    }
}

/// Client for Polymarket's CLOB price endpoints
pub struct ClobClient {
    config: ClobConfig,
    client: Client,
}

impl ClobClient {
    /// Create a new CLOB client with default configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(ClobConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClobConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create CLOB HTTP client")?;

        Ok(Self { config, client })
    }

    /// POST `wrapped`, then `bare` if the first payload is rejected
    async fn post_with_fallback(
        &self,
        path: &str,
        wrapped: &Value,
        bare: &Value,
    ) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.config.base_url, path);

        match self.client.post(&url).json(wrapped).send().await {
            Ok(resp) if resp.status().is_success() => {
                return resp
                    .json()
                    .await
                    .with_context(|| format!("Failed to parse {path} response"));
            }
            Ok(resp) => {
                tracing::debug!(path, status = %resp.status(), "Wrapped payload rejected, retrying bare list");
            }
            Err(e) => {
                tracing::debug!(path, error = %e, "Wrapped payload failed, retrying bare list");
            }
        }

        let response = self
            .client
            .post(&url)
            .json(bare)
            .send()
            .await
            .with_context(|| format!("CLOB {path} request failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CLOB {} error: {} - {}", path, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {path} response"))
    }

    /// Bulk BUY and SELL prices
    pub async fn fetch_prices(&self, ids: &[String]) -> anyhow::Result<Value> {
        let params: Vec<Value> = ids
            .iter()
            .flat_map(|id| {
                [BUY, SELL]
                    .into_iter()
                    .map(move |side| json!({ "token_id": id, "side": side }))
            })
            .collect();

        let bare = Value::Array(params);
        let wrapped = json!({ "params": bare });
        self.post_with_fallback("/prices", &wrapped, &bare).await
    }

    /// Bulk midpoints
    pub async fn fetch_midpoints(&self, ids: &[String]) -> anyhow::Result<Value> {
        self.post_with_fallback("/midpoints", &json!({ "params": ids }), &json!(ids))
            .await
    }

    async fn get_field(&self, path: &str, params: &[(&str, &str)], field: &str) -> Option<Decimal> {
        let url = format!("{}{}", self.config.base_url, path);
        let result = self
            .client
            .get(&url)
            .query(params)
            .timeout(self.config.single_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let body: Value = match result {
            Ok(resp) => resp.json().await.ok()?,
            Err(e) => {
                tracing::debug!(path, error = %e, "Single quote request failed");
                return None;
            }
        };
        body.get(field).and_then(parse_probability)
    }
}

/// Merge a `/prices` response, either `{id: {BUY, SELL}}` or `[{token_id, side, price}]`
pub fn apply_prices(body: &Value, quotes: &mut HashMap<String, QuoteSet>) {
    match body {
        Value::Object(map) => {
            for (id, sides) in map {
                let entry = quotes.entry(id.clone()).or_default();
                if let Some(p) = sides.get(BUY).and_then(parse_probability) {
                    entry.best_buy = Some(p);
                }
                if let Some(p) = sides.get(SELL).and_then(parse_probability) {
                    entry.best_sell = Some(p);
                }
            }
        }
        Value::Array(rows) => {
            for row in rows {
                let Some(id) = row.get("token_id").and_then(Value::as_str) else {
                    continue;
                };
                let Some(price) = row.get("price").and_then(parse_probability) else {
                    continue;
                };
                let entry = quotes.entry(id.to_string()).or_default();
                match row.get("side").and_then(Value::as_str) {
                    Some(side) if side.eq_ignore_ascii_case(BUY) => entry.best_buy = Some(price),
                    Some(side) if side.eq_ignore_ascii_case(SELL) => entry.best_sell = Some(price),
                    _ => {}
                }
            }
        }
        other => tracing::warn!(response = %other, "Unexpected /prices response shape"),
    }
}

/// Merge a `/midpoints` response, either `{id: {"mid": p}}` or `{id: p}`
pub fn apply_midpoints(body: &Value, quotes: &mut HashMap<String, QuoteSet>) {
    let Value::Object(map) = body else {
        tracing::warn!(response = %body, "Unexpected /midpoints response shape");
        return;
    };
    for (id, value) in map {
        let mid = match value {
            Value::Object(_) => value.get("mid").and_then(parse_probability),
            other => parse_probability(other),
        };
        if let Some(mid) = mid {
            quotes.entry(id.clone()).or_default().midpoint = Some(mid);
        }
    }
}

#[async_trait]
impl QuoteSource for ClobClient {
    async fn bulk_quotes(&self, ids: &[String]) -> anyhow::Result<HashMap<String, QuoteSet>> {
        let mut quotes = HashMap::new();
        if ids.is_empty() {
            return Ok(quotes);
        }

        let prices = self.fetch_prices(ids).await?;
        apply_prices(&prices, &mut quotes);

        match self.fetch_midpoints(ids).await {
            Ok(mids) => apply_midpoints(&mids, &mut quotes),
            Err(e) => tracing::warn!(error = %e, "Bulk midpoints unavailable, continuing without"),
        }

        tracing::info!(
            requested = ids.len(),
            quoted = quotes.len(),
            "Fetched bulk CLOB quotes"
        );
        Ok(quotes)
    }

    async fn single_quote(&self, id: &str) -> QuoteSet {
        QuoteSet {
            best_buy: self
                .get_field("/price", &[("token_id", id), ("side", BUY)], "price")
                .await,
            best_sell: self
                .get_field("/price", &[("token_id", id), ("side", SELL)], "price")
                .await,
            midpoint: self
                .get_field("/midpoint", &[("token_id", id)], "mid")
                .await,
        }
    }
}
