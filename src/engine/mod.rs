//! Calibration and decision engine
//!
//! Turns market-implied odds into a calibrated probability under the
//! majority-rule heuristic, then picks a side and prices the bet.

mod calibration;
mod decision;
mod report;
mod types;

pub use calibration::{calibrate, normalize_probability, probability_from_f64, MarketOdds};
pub use decision::{decide, evaluate_market, win_payout, Decision};
pub use report::{BatchReport, BatchTotals};
pub use types::{EvalConfig, EvalError, EvaluationResult, Pick, Side};
