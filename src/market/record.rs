//! Raw Gamma market record and loose field parsing
//!
//! Gamma encodes list fields either as JSON arrays or as strings holding a
//! JSON array or a comma-separated list, and numbers either as numbers or as
//! numeric strings. Every accessor here degrades to "absent" instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Market record as returned by the Gamma `/markets` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Outcome labels, list or string
    #[serde(default)]
    pub outcomes: Option<Value>,
    /// Quote identifiers, list or string
    #[serde(default)]
    pub clob_token_ids: Option<Value>,
    /// Same identifiers under the snake_case key some payloads use
    #[serde(default, rename = "clob_token_ids")]
    pub clob_token_ids_snake: Option<Value>,
    /// Outcome settlement prices, list or string
    #[serde(default)]
    pub outcome_prices: Option<Value>,
    #[serde(default)]
    pub best_bid: Option<Value>,
    #[serde(default)]
    pub best_ask: Option<Value>,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub accepting_orders: Option<bool>,
}

impl MarketRecord {
    /// Identifier rendered as text
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().filter(|v| !v.is_null()).map(value_to_string)
    }

    /// Raw quote identifiers in their original order
    pub fn token_ids(&self) -> Vec<String> {
        [&self.clob_token_ids, &self.clob_token_ids_snake]
            .into_iter()
            .flatten()
            .map(parse_list)
            .find(|ids| !ids.is_empty())
            .unwrap_or_default()
    }

    /// Outcome settlement prices; absent when any entry fails to parse
    pub fn outcome_prices(&self) -> Option<Vec<Decimal>> {
        self.outcome_prices.as_ref().and_then(parse_decimal_list)
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.best_bid.as_ref().and_then(parse_decimal)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.best_ask.as_ref().and_then(parse_decimal)
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Items of a list-or-string field, trimmed, with empty items dropped
///
/// A bracketed string is read as a JSON array first and falls back to comma
/// splitting when that fails. Non list, non string values yield nothing.
pub fn parse_list(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|v| value_to_string(v).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let s = s.trim();
            if s.starts_with('[') && s.ends_with(']') {
                if let Ok(items) = serde_json::from_str::<Vec<Value>>(s) {
                    return parse_list(&Value::Array(items));
                }
            }
            split_csv(s)
        }
        _ => Vec::new(),
    }
}

/// Parse a decimal from text, accepting scientific notation
pub fn decimal_from_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse a number or numeric string
pub fn parse_decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s),
        _ => None,
    }
}

/// Parse a number that must be a probability in [0, 1]
pub fn parse_probability(raw: &Value) -> Option<Decimal> {
    parse_decimal(raw).filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE)
}

/// Parse a list-or-string of numbers; any bad entry discards the whole list
pub fn parse_decimal_list(raw: &Value) -> Option<Vec<Decimal>> {
    let items: Vec<Value> = match raw {
        Value::Array(items) => items.clone(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if s.starts_with('[') && s.ends_with(']') {
                serde_json::from_str::<Vec<Value>>(s).ok()?
            } else {
                s.split(',').map(|t| Value::String(t.to_string())).collect()
            }
        }
        _ => return None,
    };
    items.iter().map(parse_decimal).collect()
}
