//! Exchange REST API access
//!
//! The [`ApiClient`] trait is the only way the rest of the crate reaches the
//! exchange. [`BinanceClient`] talks HTTP; [`CachingClient`] memoizes the
//! slow-changing endpoints in front of any other client.

mod binance;
mod cached;

pub use binance::{BinanceClient, BinanceConfig, BINANCE_API_URL};
pub use cached::CachingClient;

use crate::error::Result;
use crate::orderbook::OrderBook;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Exchange-wide trading rules and symbol list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeInfo {
    pub timezone: String,
    /// Exchange clock in milliseconds since epoch
    pub server_time: i64,
    pub symbols: Vec<SymbolInfo>,
}

/// Static description of a trading pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// A trading filter, e.g. PRICE_FILTER or LOT_SIZE, with its raw parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFilter {
    pub filter_type: String,
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// 24h rolling statistics for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerStat {
    pub symbol: String,
    /// Base asset volume
    pub volume: Decimal,
    /// Number of trades
    pub trade_count: u64,
    pub last_price: Decimal,
}

/// Market data capability of the exchange
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch the symbol list and trading rules
    async fn exchange_info(&self) -> Result<ExchangeInfo>;

    /// Fetch 24h statistics for one symbol, or for all symbols when `None`
    async fn ticker_statistics(&self, symbol: Option<&str>) -> Result<Vec<TickerStat>>;

    /// Fetch an order book snapshot with `depth` levels per side
    async fn order_book(&self, symbol: &str, depth: u32) -> Result<OrderBook>;
}

/// Shared handle used by fan-out tasks
pub type SharedClient = Arc<dyn ApiClient>;
