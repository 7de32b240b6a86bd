//! Integration tests for configuration loading

use poly_majority::config::{Config, LogFormat};
use rust_decimal_macros::dec;

#[test]
fn test_example_config_parses_and_validates() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.validate().unwrap();
    assert_eq!(config.evaluation.majority_accuracy, dec!(0.90));
    assert_eq!(config.discovery.days_ahead, 30);
    assert_eq!(config.api.clob_url, "https://clob.polymarket.com");
    assert_eq!(config.telemetry.format, LogFormat::Pretty);
}

#[test]
fn test_load_rejects_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[evaluation]\nfee_rate = 1.0\n").unwrap();

    assert!(Config::load(&path).is_err());
}
