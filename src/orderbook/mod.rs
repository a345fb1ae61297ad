//! Order book module
//!
//! REST depth snapshots and the decimal arithmetic taken over them

mod book;

pub use book::OrderBook;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price level in the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level
    pub price: Decimal,
    /// Quantity resting at this price
    pub quantity: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }

    /// Price times quantity
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}

/// Sum of price×quantity over at most `count` leading levels.
///
/// Returns zero for an empty side and sums everything when fewer than
/// `count` levels are present.
pub fn notional_sum(levels: &[PriceLevel], count: usize) -> Decimal {
    levels.iter().take(count).map(PriceLevel::notional).sum()
}
