//! Gamma API client for market discovery
//!
//! Fetches open Polymarket markets whose end date falls in a window centered
//! a number of days ahead. An empty first answer triggers one retry with a
//! doubled window and client-side status filtering.

use super::{MarketQuery, MarketRecord, MarketSource};
use crate::config::DEFAULT_GAMMA_URL;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::Client;
use std::time::Duration;

/// Configuration for the Gamma client
#[derive(Debug, Clone)]
pub struct GammaConfig {
    /// Base URL for the Gamma API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GAMMA_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// End-date bounds for a discovery query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryWindow {
    /// Start of the first day, `YYYY-MM-DDT00:00:00Z`
    pub end_date_min: String,
    /// End of the last day, `YYYY-MM-DDT23:59:59Z`
    pub end_date_max: String,
}

impl DiscoveryWindow {
    /// Window of `today + days_ahead` plus or minus `pad_days`
    ///
    /// Fails when either bound falls outside the calendar range.
    pub fn around(today: NaiveDate, days_ahead: u32, pad_days: u32) -> anyhow::Result<Self> {
        let ahead = ChronoDuration::days(i64::from(days_ahead));
        let pad = ChronoDuration::days(i64::from(pad_days));
        let target = today.checked_add_signed(ahead);
        let (Some(start), Some(end)) = (
            target.and_then(|t| t.checked_sub_signed(pad)),
            target.and_then(|t| t.checked_add_signed(pad)),
        ) else {
            anyhow::bail!(
                "discovery window out of range: {days_ahead} days ahead, pad {pad_days} days"
            );
        };
        Ok(Self {
            end_date_min: format!("{}T00:00:00Z", start.format("%Y-%m-%d")),
            end_date_max: format!("{}T23:59:59Z", end.format("%Y-%m-%d")),
        })
    }
}

/// Client for Polymarket's Gamma API
pub struct GammaClient {
    config: GammaConfig,
    client: Client,
}

impl GammaClient {
    /// Create a new Gamma API client with default configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(GammaConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: GammaConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create Gamma HTTP client")?;

        Ok(Self { config, client })
    }

    /// GET `/markets` with the given query parameters
    pub async fn fetch_markets(
        &self,
        params: &[(&str, String)],
    ) -> anyhow::Result<Vec<MarketRecord>> {
        let url = format!("{}/markets", self.config.base_url);

        tracing::debug!(url = %url, ?params, "Fetching markets from Gamma API");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .context("Gamma API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gamma API error: {} - {}", status, body);
        }

        let markets: Vec<MarketRecord> = response
            .json()
            .await
            .context("Failed to parse Gamma markets response")?;

        Ok(markets)
    }
}

fn window_params(window: &DiscoveryWindow, limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("end_date_min", window.end_date_min.clone()),
        ("end_date_max", window.end_date_max.clone()),
        ("limit", limit.to_string()),
        ("order", "endDate".to_string()),
        ("ascending", "true".to_string()),
    ]
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn markets_due_in(
        &self,
        query: &MarketQuery,
        today: NaiveDate,
    ) -> anyhow::Result<Vec<MarketRecord>> {
        let window = DiscoveryWindow::around(today, query.days_ahead, query.pad_days)?;
        let mut params = window_params(&window, query.limit);
        params.insert(0, ("closed", "false".to_string()));
        if query.require_accepting {
            params.push(("acceptingOrders", "true".to_string()));
        }

        let markets = self.fetch_markets(&params).await?;
        if !markets.is_empty() {
            tracing::info!(count = markets.len(), "Fetched Gamma markets");
            return Ok(markets);
        }

        tracing::debug!("Gamma returned no markets, retrying with a wider window");
        let wide_pad = query.pad_days.saturating_mul(2);
        let wide = DiscoveryWindow::around(today, query.days_ahead, wide_pad)?;
        let markets: Vec<MarketRecord> = self
            .fetch_markets(&window_params(&wide, query.limit))
            .await?
            .into_iter()
            .filter(|m| m.closed != Some(true))
            // Paused markets stay when the caller did not ask for accepting orders
            .filter(|m| !query.require_accepting || m.accepting_orders == Some(true))
            .collect();

        tracing::info!(count = markets.len(), "Fetched Gamma markets from wider window");
        Ok(markets)
    }
}
