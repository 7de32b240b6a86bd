//! Telemetry module
//!
//! Structured logging to stderr, leaving stdout for report output

mod logging;

pub use logging::{filter_directive, init_logging};

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
///
/// `verbose` raises the configured level to debug. `RUST_LOG` still wins.
pub fn init_telemetry(config: &TelemetryConfig, verbose: bool) -> anyhow::Result<TelemetryGuard> {
    let level = filter_directive(&config.log_level, verbose);
    init_logging(level, config.format)?;

    Ok(TelemetryGuard { _priv: () })
}
