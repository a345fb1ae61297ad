//! Notional value resting on the order book

use super::fanout::fan_out;
use crate::api::SharedClient;
use crate::error::Result;
use crate::orderbook::OrderBook;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sum of price×quantity over the leading levels of each side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionalValue {
    pub symbol: String,
    pub asks_total: Decimal,
    pub bids_total: Decimal,
}

impl NotionalValue {
    /// Totals over at most `levels` levels per side of `book`
    pub fn from_book(book: &OrderBook, levels: usize) -> Self {
        Self {
            symbol: book.symbol.clone(),
            asks_total: book.asks_notional(levels),
            bids_total: book.bids_notional(levels),
        }
    }
}

/// Fetch `depth` levels for every symbol concurrently and total the first
/// `levels` of each side.
///
/// Any failed fetch fails the whole batch; partial results are discarded.
pub async fn aggregate_notional(
    client: &SharedClient,
    symbols: &[String],
    depth: u32,
    levels: usize,
) -> Result<Vec<NotionalValue>> {
    let values = fan_out(client, symbols, move |client, symbol| async move {
        let book = client.order_book(&symbol, depth).await.map_err(|e| {
            tracing::warn!(symbol = %symbol, error = %e, "Failed to fetch order book for notional");
            e
        })?;
        Ok(NotionalValue::from_book(&book, levels))
    })
    .await?;

    tracing::debug!(symbols = values.len(), depth, levels, "Aggregated notional values");
    Ok(values)
}
