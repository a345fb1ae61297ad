//! Configuration types for market-stats

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Depth limits accepted by the exchange's order book endpoint
pub const VALID_DEPTHS: [u32; 8] = [5, 10, 20, 50, 100, 500, 1000, 5000];

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Upstream REST API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the exchange REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Ranking and order book settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketConfig {
    /// Quote asset for the top-volume ranking
    #[serde(default = "default_volume_quote_asset")]
    pub volume_quote_asset: String,
    /// Quote asset for the top-trade-count ranking
    #[serde(default = "default_trade_count_quote_asset")]
    pub trade_count_quote_asset: String,
    /// Number of symbols kept per ranking
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
    /// Levels requested per side for notional aggregation
    #[serde(default = "default_notional_depth")]
    pub notional_depth: u32,
    /// Levels summed per side for notional aggregation
    #[serde(default = "default_notional_levels")]
    pub notional_levels: usize,
    /// Levels requested per side for spread computation
    #[serde(default = "default_spread_depth")]
    pub spread_depth: u32,
}

/// Background poller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollerConfig {
    /// Seconds between poll cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Lifetime of the published snapshot (seconds), must outlive the interval
    #[serde(default = "default_publish_ttl_secs")]
    pub publish_ttl_secs: u64,
}

/// Memoization cache lifetimes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_exchange_info_ttl_secs")]
    pub exchange_info_ttl_secs: u64,
    #[serde(default = "default_ticker_ttl_secs")]
    pub ticker_ttl_secs: u64,
    #[serde(default = "default_ranking_ttl_secs")]
    pub ranking_ttl_secs: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_base_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_volume_quote_asset() -> String {
    "BTC".to_string()
}
fn default_trade_count_quote_asset() -> String {
    "USDT".to_string()
}
fn default_top_limit() -> usize {
    5
}
fn default_notional_depth() -> u32 {
    500
}
fn default_notional_levels() -> usize {
    200
}
fn default_spread_depth() -> u32 {
    5
}
fn default_interval_secs() -> u64 {
    10
}
fn default_publish_ttl_secs() -> u64 {
    30
}
fn default_exchange_info_ttl_secs() -> u64 {
    600
}
fn default_ticker_ttl_secs() -> u64 {
    1
}
fn default_ranking_ttl_secs() -> u64 {
    300
}
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            volume_quote_asset: default_volume_quote_asset(),
            trade_count_quote_asset: default_trade_count_quote_asset(),
            top_limit: default_top_limit(),
            notional_depth: default_notional_depth(),
            notional_levels: default_notional_levels(),
            spread_depth: default_spread_depth(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            publish_ttl_secs: default_publish_ttl_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            exchange_info_ttl_secs: default_exchange_info_ttl_secs(),
            ticker_ttl_secs: default_ticker_ttl_secs(),
            ranking_ttl_secs: default_ranking_ttl_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            market: MarketConfig::default(),
            poller: PollerConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api.base_url must not be empty")]
    EmptyBaseUrl,

    #[error("{0} must not be empty")]
    EmptyQuoteAsset(&'static str),

    #[error("market.top_limit must be greater than zero")]
    ZeroTopLimit,

    #[error("{field} = {value} is not an accepted depth limit")]
    InvalidDepth { field: &'static str, value: u32 },

    #[error("market.notional_levels ({levels}) exceeds market.notional_depth ({depth})")]
    LevelsExceedDepth { levels: usize, depth: u32 },

    #[error("poller.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error(
        "poller.publish_ttl_secs ({ttl}) must be at least poller.interval_secs plus api.timeout_secs ({minimum})"
    )]
    PublishTtlTooShort { ttl: u64, minimum: u64 },
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check value ranges once at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.market.volume_quote_asset.is_empty() {
            return Err(ConfigError::EmptyQuoteAsset("market.volume_quote_asset"));
        }
        if self.market.trade_count_quote_asset.is_empty() {
            return Err(ConfigError::EmptyQuoteAsset(
                "market.trade_count_quote_asset",
            ));
        }
        if self.market.top_limit == 0 {
            return Err(ConfigError::ZeroTopLimit);
        }
        for (field, value) in [
            ("market.notional_depth", self.market.notional_depth),
            ("market.spread_depth", self.market.spread_depth),
        ] {
            if !VALID_DEPTHS.contains(&value) {
                return Err(ConfigError::InvalidDepth { field, value });
            }
        }
        if self.market.notional_levels > self.market.notional_depth as usize {
            return Err(ConfigError::LevelsExceedDepth {
                levels: self.market.notional_levels,
                depth: self.market.notional_depth,
            });
        }
        if self.poller.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        // a cycle can finish up to one request timeout later than the previous one
        let minimum = self
            .poller
            .interval_secs
            .saturating_add(self.api.timeout_secs);
        if self.poller.publish_ttl_secs < minimum {
            return Err(ConfigError::PublishTtlTooShort {
                ttl: self.poller.publish_ttl_secs,
                minimum,
            });
        }
        Ok(())
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn publish_ttl(&self) -> Duration {
        Duration::from_secs(self.publish_ttl_secs)
    }
}

impl CacheConfig {
    pub fn exchange_info_ttl(&self) -> Duration {
        Duration::from_secs(self.exchange_info_ttl_secs)
    }

    pub fn ticker_ttl(&self) -> Duration {
        Duration::from_secs(self.ticker_ttl_secs)
    }

    pub fn ranking_ttl(&self) -> Duration {
        Duration::from_secs(self.ranking_ttl_secs)
    }
}
