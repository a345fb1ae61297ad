//! Published result of one poll cycle

use crate::market::{NotionalValue, RankedSymbol, SpreadMetric};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Everything computed by a successful cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub cycle_id: Uuid,
    pub taken_at: DateTime<Utc>,
    pub top_volumes: Vec<RankedSymbol>,
    pub top_trade_counts: Vec<RankedSymbol>,
    pub notional_values: Vec<NotionalValue>,
    pub spreads: Vec<SpreadMetric>,
}

impl MarketSnapshot {
    /// Spread metric for `symbol`, if it was among the tracked symbols
    pub fn spread(&self, symbol: &str) -> Option<&SpreadMetric> {
        self.spreads.iter().find(|m| m.symbol() == symbol)
    }

    /// Notional totals for `symbol`
    pub fn notional(&self, symbol: &str) -> Option<&NotionalValue> {
        self.notional_values.iter().find(|v| v.symbol == symbol)
    }

    /// Distinct symbols across both rankings
    pub fn symbol_count(&self) -> usize {
        self.top_volumes
            .iter()
            .chain(&self.top_trade_counts)
            .map(|r| r.symbol.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}
