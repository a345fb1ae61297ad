//! Market data service
//!
//! Owns the API client, the exchange metadata loaded at construction and the
//! ranking memo cache, and exposes the individual views plus a combined query.

use super::{
    aggregate_notional, compute_spreads, fetch_spreads, rank, symbols_of, ExchangeMetadata,
    MarketData, MarketQuery, NotionalValue, RankMetric, RankedSymbol, SpreadMetric, SpreadState,
};
use crate::api::SharedClient;
use crate::cache::TtlCache;
use crate::config::MarketConfig;
use crate::error::Result;
use std::time::Duration;

/// Memo key for a resolved ranking
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RankingKey {
    metric: RankMetric,
    quote_asset: String,
    limit: usize,
}

/// Computes ranked and order-book derived market views
pub struct MarketDataService {
    client: SharedClient,
    metadata: ExchangeMetadata,
    rankings: TtlCache<RankingKey, Vec<RankedSymbol>>,
    settings: MarketConfig,
}

impl MarketDataService {
    /// Load exchange metadata and build the service.
    ///
    /// Fails if the metadata cannot be fetched; callers treat that as fatal.
    pub async fn new(
        client: SharedClient,
        settings: MarketConfig,
        ranking_ttl: Duration,
    ) -> Result<Self> {
        let info = client.exchange_info().await?;
        let metadata = ExchangeMetadata::from_exchange_info(info);
        tracing::info!(symbols = metadata.len(), "Loaded exchange metadata");

        Ok(Self::with_metadata(client, metadata, settings, ranking_ttl))
    }

    /// Build the service from already loaded metadata
    pub fn with_metadata(
        client: SharedClient,
        metadata: ExchangeMetadata,
        settings: MarketConfig,
        ranking_ttl: Duration,
    ) -> Self {
        Self {
            client,
            metadata,
            rankings: TtlCache::new(ranking_ttl),
            settings,
        }
    }

    pub fn metadata(&self) -> &ExchangeMetadata {
        &self.metadata
    }

    pub fn settings(&self) -> &MarketConfig {
        &self.settings
    }

    /// Query for the configured quote assets
    pub fn default_query(&self) -> MarketQuery {
        MarketQuery {
            volume_quote_asset: self.settings.volume_quote_asset.clone(),
            trade_count_quote_asset: self.settings.trade_count_quote_asset.clone(),
        }
    }

    /// Rank fresh ticker statistics; bypasses the ranking cache
    pub async fn top_symbols(
        &self,
        quote_asset: &str,
        limit: usize,
        metric: RankMetric,
    ) -> Result<Vec<RankedSymbol>> {
        let tickers = self.client.ticker_statistics(None).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to get ticker statistics");
            e
        })?;

        Ok(rank(&tickers, &self.metadata, quote_asset, limit, metric))
    }

    /// Ranking served from the memo cache, resolved on miss
    pub async fn cached_top_symbols(
        &self,
        quote_asset: &str,
        limit: usize,
        metric: RankMetric,
    ) -> Result<Vec<RankedSymbol>> {
        let key = RankingKey {
            metric,
            quote_asset: quote_asset.to_string(),
            limit,
        };

        self.rankings
            .get_or_try_insert_with(key, || self.top_symbols(quote_asset, limit, metric))
            .await
    }

    /// Notional totals for `symbols` using the configured depth and levels
    pub async fn total_notional_values(&self, symbols: &[String]) -> Result<Vec<NotionalValue>> {
        aggregate_notional(
            &self.client,
            symbols,
            self.settings.notional_depth,
            self.settings.notional_levels,
        )
        .await
    }

    /// Spreads for `symbols` with deltas against `prior`
    pub async fn spreads(
        &self,
        symbols: &[String],
        prior: &SpreadState,
    ) -> Result<(Vec<SpreadMetric>, SpreadState)> {
        compute_spreads(&self.client, symbols, self.settings.spread_depth, prior).await
    }

    /// Compute every view for `query` without delta tracking
    pub async fn market_data(&self, query: &MarketQuery) -> Result<MarketData> {
        let limit = self.settings.top_limit;
        let (top_volumes, top_trade_counts) = tokio::try_join!(
            self.cached_top_symbols(&query.volume_quote_asset, limit, RankMetric::Volume),
            self.cached_top_symbols(&query.trade_count_quote_asset, limit, RankMetric::TradeCount),
        )?;

        let notional_targets = symbols_of(&top_volumes);
        let spread_targets = symbols_of(&top_trade_counts);
        let (notional_values, spreads) = tokio::try_join!(
            self.total_notional_values(&notional_targets),
            fetch_spreads(&self.client, &spread_targets, self.settings.spread_depth),
        )?;

        Ok(MarketData {
            top_volumes,
            top_trade_counts,
            notional_values,
            spreads,
        })
    }
}
