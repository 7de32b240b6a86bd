//! poly-majority: Majority-rule evaluator for Polymarket binary Yes/No markets
//!
//! This library provides the core components for:
//! - Market discovery via Gamma API
//! - Binary Yes/No classification of market records
//! - Quote resolution from CLOB prices with market-level fallbacks
//! - Majority-rule calibration and bet evaluation
//! - Batch scanning and reporting

pub mod cli;
pub mod config;
pub mod engine;
pub mod market;
pub mod quote;
pub mod scan;
pub mod telemetry;
