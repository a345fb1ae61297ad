//! Order book snapshot

use super::{notional_sum, PriceLevel};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// L2 depth snapshot for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    /// Trading pair, e.g. "ETHBTC"
    pub symbol: String,
    /// Exchange sequence number of this snapshot
    pub last_update_id: u64,
    /// Bid levels, sorted best (highest) to worst
    pub bids: Vec<PriceLevel>,
    /// Ask levels, sorted best (lowest) to worst
    pub asks: Vec<PriceLevel>,
    /// When the snapshot was received
    pub fetched_at: DateTime<Utc>,
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_update_id: 0,
            bids: vec![],
            asks: vec![],
            fetched_at: Utc::now(),
        }
    }

    /// Get best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    /// Notional resting on the first `levels` ask levels
    pub fn asks_notional(&self, levels: usize) -> Decimal {
        notional_sum(&self.asks, levels)
    }

    /// Notional resting on the first `levels` bid levels
    pub fn bids_notional(&self, levels: usize) -> Decimal {
        notional_sum(&self.bids, levels)
    }
}
