//! Top-N selection over ticker statistics

use super::{ExchangeMetadata, RankMetric, RankedSymbol};
use crate::api::TickerStat;

/// Rank tickers quoted in `quote_asset` by `metric`, highest first.
///
/// The sort is stable, so equal values keep their input order. Tickers for
/// symbols missing from `metadata` are dropped. At most `limit` entries are
/// returned; an empty filter result yields an empty list.
pub fn rank(
    tickers: &[TickerStat],
    metadata: &ExchangeMetadata,
    quote_asset: &str,
    limit: usize,
    metric: RankMetric,
) -> Vec<RankedSymbol> {
    let mut ranked: Vec<RankedSymbol> = tickers
        .iter()
        .filter(|t| metadata.is_quoted_in(&t.symbol, quote_asset))
        .map(|t| RankedSymbol {
            symbol: t.symbol.clone(),
            volume: t.volume,
            trade_count: t.trade_count,
        })
        .collect();

    tracing::debug!(
        quote_asset,
        metric = metric.as_str(),
        candidates = ranked.len(),
        "Found symbols to rank"
    );

    match metric {
        RankMetric::Volume => ranked.sort_by(|a, b| b.volume.cmp(&a.volume)),
        RankMetric::TradeCount => ranked.sort_by(|a, b| b.trade_count.cmp(&a.trade_count)),
    }
    ranked.truncate(limit);
    ranked
}
