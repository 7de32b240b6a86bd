//! Configuration types for poly-majority

use crate::engine::EvalConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Gamma API base URL
pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";
/// CLOB API base URL
pub const DEFAULT_CLOB_URL: &str = "https://clob.polymarket.com";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Evaluation parameters out of range
    #[error("invalid [evaluation] section: {0}")]
    Evaluation(#[from] crate::engine::EvalError),
    /// Concurrency must allow at least one in-flight market
    #[error("discovery.concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Majority-rule evaluation settings
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Probability that the market majority is right
    #[serde(default = "default_majority_accuracy")]
    pub majority_accuracy: Decimal,
    /// Minimum EV per dollar required to take a side
    #[serde(default)]
    pub min_ev: Decimal,
    /// Proportional fee charged on winnings
    #[serde(default)]
    pub fee_rate: Decimal,
}

fn default_majority_accuracy() -> Decimal {
    Decimal::new(90, 2) // 0.90
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            majority_accuracy: default_majority_accuracy(),
            min_ev: Decimal::ZERO,
            fee_rate: Decimal::ZERO,
        }
    }
}

impl EvaluationConfig {
    /// Immutable engine parameters for one run
    pub fn to_eval_config(&self) -> EvalConfig {
        EvalConfig {
            majority_accuracy: self.majority_accuracy,
            min_ev: self.min_ev,
            fee_rate: self.fee_rate,
        }
    }
}

/// Market discovery window settings
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Center of the end-date window, in days from today
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
    /// Days either side of the center
    #[serde(default = "default_pad_days")]
    pub pad_days: u32,
    /// Maximum markets per Gamma request
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Only keep markets currently accepting orders
    #[serde(default = "default_true")]
    pub require_accepting: bool,
    /// Markets resolved concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_days_ahead() -> u32 {
    30
}
fn default_pad_days() -> u32 {
    7
}
fn default_limit() -> u32 {
    200
}
fn default_true() -> bool {
    true
}
fn default_concurrency() -> usize {
    8
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            days_ahead: default_days_ahead(),
            pad_days: default_pad_days(),
            limit: default_limit(),
            require_accepting: true,
            concurrency: default_concurrency(),
        }
    }
}

/// HTTP endpoints and timeouts
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,
    #[serde(default = "default_clob_url")]
    pub clob_url: String,
    /// Timeout for Gamma and bulk CLOB requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for single-token CLOB requests
    #[serde(default = "default_single_timeout_secs")]
    pub single_timeout_secs: u64,
}

fn default_gamma_url() -> String {
    DEFAULT_GAMMA_URL.to_string()
}
fn default_clob_url() -> String {
    DEFAULT_CLOB_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_single_timeout_secs() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gamma_url: default_gamma_url(),
            clob_url: default_clob_url(),
            timeout_secs: default_timeout_secs(),
            single_timeout_secs: default_single_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn single_timeout(&self) -> Duration {
        Duration::from_secs(self.single_timeout_secs)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluation.to_eval_config().validate()?;
        if self.discovery.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
