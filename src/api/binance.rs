//! Binance REST client
//!
//! Fetches exchange metadata, 24h ticker statistics and depth snapshots from
//! the public market-data endpoints. No authentication is used.

use super::{ApiClient, ExchangeInfo, SymbolInfo, TickerStat};
use crate::error::{Error, Result};
use crate::orderbook::{OrderBook, PriceLevel};
use crate::telemetry::{self, UpstreamOutcome};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Binance REST API base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Response header carrying the request weight consumed in the current window
const USED_WEIGHT_HEADER: &str = "x-mbx-used-weight";

/// Configuration for the Binance client
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Base URL for the REST API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Market-data endpoints used by this crate
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    ExchangeInfo,
    Ticker24h,
    Depth,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::ExchangeInfo => "/api/v3/exchangeInfo",
            Endpoint::Ticker24h => "/api/v3/ticker/24hr",
            Endpoint::Depth => "/api/v3/depth",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Endpoint::ExchangeInfo => "exchange_info",
            Endpoint::Ticker24h => "ticker_24h",
            Endpoint::Depth => "depth",
        }
    }
}

/// Client for Binance's public REST API
pub struct BinanceClient {
    config: BinanceConfig,
    client: Client,
}

impl BinanceClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(BinanceConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: BinanceConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }

    /// GET an endpoint and decode its JSON body, recording the outcome
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T> {
        let started = Instant::now();
        let result = self.fetch(endpoint, query).await;

        let outcome = match &result {
            Ok(_) => UpstreamOutcome::Success,
            Err(Error::Upstream { .. }) => UpstreamOutcome::Rejected,
            Err(Error::Decode { .. }) => UpstreamOutcome::Malformed,
            Err(_) => UpstreamOutcome::Failed,
        };
        telemetry::record_upstream_request(endpoint.name(), outcome, started.elapsed());

        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(url = %url, ?query, "Starting request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();

        match response
            .headers()
            .get(USED_WEIGHT_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            Some(weight) => {
                tracing::debug!(url = %url, %status, weight_used = weight, "Completed request")
            }
            None => tracing::debug!(url = %url, %status, "Completed request"),
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| Error::decode(endpoint.name(), e))
    }
}

#[async_trait]
impl ApiClient for BinanceClient {
    async fn exchange_info(&self) -> Result<ExchangeInfo> {
        let raw: RawExchangeInfo = self.get_json(Endpoint::ExchangeInfo, &[]).await?;
        Ok(ExchangeInfo {
            timezone: raw.timezone,
            server_time: raw.server_time,
            symbols: raw.symbols,
        })
    }

    async fn ticker_statistics(&self, symbol: Option<&str>) -> Result<Vec<TickerStat>> {
        let raw = match symbol {
            Some(symbol) => {
                let query = [("symbol", symbol.to_string())];
                let ticker: RawTicker = self.get_json(Endpoint::Ticker24h, &query).await?;
                vec![ticker]
            }
            None => self.get_json::<Vec<RawTicker>>(Endpoint::Ticker24h, &[]).await?,
        };

        raw.into_iter().map(RawTicker::into_ticker).collect()
    }

    async fn order_book(&self, symbol: &str, depth: u32) -> Result<OrderBook> {
        let query = [("symbol", symbol.to_string()), ("limit", depth.to_string())];
        let raw: RawOrderBook = self.get_json(Endpoint::Depth, &query).await?;
        raw.into_order_book(symbol)
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

fn upstream_error(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(err) => Error::Upstream {
            status,
            code: Some(err.code),
            message: err.msg,
        },
        Err(_) => Error::Upstream {
            status,
            code: None,
            message: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

/// Raw exchangeInfo response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExchangeInfo {
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    server_time: i64,
    symbols: Vec<SymbolInfo>,
}

/// Raw 24hr ticker; decimals arrive as strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTicker {
    symbol: String,
    volume: String,
    count: u64,
    last_price: String,
}

impl RawTicker {
    fn into_ticker(self) -> Result<TickerStat> {
        let volume = parse_decimal(&self.volume, || format!("volume of {}", self.symbol))?;
        let last_price =
            parse_decimal(&self.last_price, || format!("last price of {}", self.symbol))?;

        Ok(TickerStat {
            symbol: self.symbol,
            volume,
            trade_count: self.count,
            last_price,
        })
    }
}

/// Raw depth response; each level is `[price, quantity]`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderBook {
    last_update_id: u64,
    #[serde(default)]
    bids: Vec<[String; 2]>,
    #[serde(default)]
    asks: Vec<[String; 2]>,
}

impl RawOrderBook {
    fn into_order_book(self, symbol: &str) -> Result<OrderBook> {
        Ok(OrderBook {
            symbol: symbol.to_string(),
            last_update_id: self.last_update_id,
            bids: parse_levels(&self.bids, symbol)?,
            asks: parse_levels(&self.asks, symbol)?,
            fetched_at: Utc::now(),
        })
    }
}

fn parse_levels(raw: &[[String; 2]], symbol: &str) -> Result<Vec<PriceLevel>> {
    raw.iter()
        .map(|[price, quantity]| {
            let context = || format!("order book level of {}", symbol);
            Ok(PriceLevel {
                price: parse_decimal(price, context)?,
                quantity: parse_decimal(quantity, context)?,
            })
        })
        .collect()
}

fn parse_decimal(raw: &str, context: impl FnOnce() -> String) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| Error::decode(context(), format!("{:?}: {}", raw, e)))
}
