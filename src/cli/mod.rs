//! CLI interface for market-stats
//!
//! Provides subcommands for:
//! - `run`: Start the poller and the HTTP server
//! - `snapshot`: Compute one snapshot and print it as JSON
//! - `config`: Show the effective configuration

mod run;
mod snapshot;

pub use run::RunArgs;
pub use snapshot::SnapshotArgs;

use crate::api::{BinanceClient, BinanceConfig, CachingClient, SharedClient};
use crate::config::Config;
use crate::market::MarketDataService;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "market-stats")]
#[command(about = "Exchange market statistics: top symbols, notional depth and spreads")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the poller and the HTTP server
    Run(RunArgs),
    /// Compute one snapshot and print it as JSON
    Snapshot(SnapshotArgs),
    /// Show the effective configuration
    Config,
}

/// Build the caching exchange client and load exchange metadata.
///
/// Failing to load metadata is fatal for every command that needs it.
pub async fn build_service(config: &Config) -> anyhow::Result<Arc<MarketDataService>> {
    let binance = BinanceClient::with_config(BinanceConfig {
        base_url: config.api.base_url.clone(),
        timeout: config.api.timeout(),
    })?;
    let client: SharedClient = Arc::new(CachingClient::new(
        Arc::new(binance),
        config.cache.exchange_info_ttl(),
        config.cache.ticker_ttl(),
    ));

    let service = MarketDataService::new(client, config.market.clone(), config.cache.ranking_ttl())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load exchange metadata: {}", e))?;

    Ok(Arc::new(service))
}
