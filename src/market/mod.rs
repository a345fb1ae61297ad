//! Market-data views
//!
//! Ranks symbols by 24h activity and enriches the selected symbols with
//! order-book derived values:
//! - top symbols by volume and by trade count for a quote asset
//! - notional resting on the book for each top-volume symbol
//! - bid/ask spread with its change since the previous poll

mod fanout;
mod metadata;
mod notional;
mod ranking;
mod service;
mod spread;

pub use metadata::ExchangeMetadata;
pub use notional::{aggregate_notional, NotionalValue};
pub use ranking::rank;
pub use service::MarketDataService;
pub use spread::{
    apply_deltas, compute_spreads, fetch_spreads, DeltaSign, SpreadMetric, SpreadSnapshot,
    SpreadState,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metric a ranking is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    /// 24h base asset volume
    Volume,
    /// 24h number of trades
    TradeCount,
}

impl RankMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankMetric::Volume => "volume",
            RankMetric::TradeCount => "trade_count",
        }
    }
}

/// A symbol selected by a ranking pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSymbol {
    pub symbol: String,
    pub volume: Decimal,
    pub trade_count: u64,
}

impl RankedSymbol {
    /// Value of the given ranking metric
    pub fn value(&self, metric: RankMetric) -> Decimal {
        match metric {
            RankMetric::Volume => self.volume,
            RankMetric::TradeCount => Decimal::from(self.trade_count),
        }
    }
}

/// Quote assets for a combined market data query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuery {
    pub volume_quote_asset: String,
    pub trade_count_quote_asset: String,
}

/// All views computed for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub top_volumes: Vec<RankedSymbol>,
    pub top_trade_counts: Vec<RankedSymbol>,
    pub notional_values: Vec<NotionalValue>,
    pub spreads: Vec<SpreadSnapshot>,
}

/// Symbols of a ranking, in rank order
pub fn symbols_of(ranked: &[RankedSymbol]) -> Vec<String> {
    ranked.iter().map(|r| r.symbol.clone()).collect()
}
