//! Memoizing decorator for an [`ApiClient`]

use super::{ApiClient, ExchangeInfo, SharedClient, TickerStat};
use crate::cache::TtlCache;
use crate::error::Result;
use crate::orderbook::OrderBook;
use async_trait::async_trait;
use std::time::Duration;

/// Caches exchange info and ticker statistics in front of another client.
///
/// Order books pass straight through: they change on every request.
pub struct CachingClient {
    inner: SharedClient,
    exchange_info: TtlCache<(), ExchangeInfo>,
    tickers: TtlCache<Option<String>, Vec<TickerStat>>,
}

impl CachingClient {
    pub fn new(inner: SharedClient, exchange_info_ttl: Duration, ticker_ttl: Duration) -> Self {
        Self {
            inner,
            exchange_info: TtlCache::new(exchange_info_ttl),
            tickers: TtlCache::new(ticker_ttl),
        }
    }
}

#[async_trait]
impl ApiClient for CachingClient {
    async fn exchange_info(&self) -> Result<ExchangeInfo> {
        self.exchange_info
            .get_or_try_insert_with((), || self.inner.exchange_info())
            .await
    }

    async fn ticker_statistics(&self, symbol: Option<&str>) -> Result<Vec<TickerStat>> {
        self.tickers
            .get_or_try_insert_with(symbol.map(str::to_string), || {
                tracing::debug!(symbol = ?symbol, "Ticker statistics not cached, fetching");
                self.inner.ticker_statistics(symbol)
            })
            .await
    }

    async fn order_book(&self, symbol: &str, depth: u32) -> Result<OrderBook> {
        self.inner.order_book(symbol, depth).await
    }
}
