//! Configuration file integration tests

use market_stats::config::{Config, LogFormat};
use std::io::Write;

const EXAMPLE: &str = include_str!("../../config.toml.example");

#[test]
fn test_example_config_is_valid() {
    let config: Config = toml::from_str(EXAMPLE).unwrap();
    config.validate().unwrap();

    assert_eq!(config.market.volume_quote_asset, "BTC");
    assert_eq!(config.market.trade_count_quote_asset, "USDT");
    assert_eq!(config.market.top_limit, 5);
    assert_eq!(config.poller.interval_secs, 10);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}

#[test]
fn test_load_from_file_with_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [market]
        trade_count_quote_asset = "FDUSD"
        spread_depth = 10

        [telemetry]
        log_format = "json"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    config.validate().unwrap();
    assert_eq!(config.market.trade_count_quote_asset, "FDUSD");
    assert_eq!(config.market.spread_depth, 10);
    assert_eq!(config.market.volume_quote_asset, "BTC");
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
}

#[test]
fn test_invalid_depth_rejected() {
    let config: Config = toml::from_str("[market]\nspread_depth = 7\n").unwrap();
    assert!(config.validate().is_err());
}
