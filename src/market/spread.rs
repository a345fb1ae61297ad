//! Bid/ask spread with change tracking across polls

use super::fanout::fan_out;
use crate::api::SharedClient;
use crate::error::{BookSide, Error, Result};
use crate::orderbook::OrderBook;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Best prices and spread for one symbol at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadSnapshot {
    pub symbol: String,
    pub highest_bid: Decimal,
    pub lowest_ask: Decimal,
    /// `lowest_ask - highest_bid`; negative when the book is crossed
    pub spread: Decimal,
}

impl SpreadSnapshot {
    /// Read the top of `book`, failing if either side is empty
    pub fn from_book(book: &OrderBook) -> Result<Self> {
        let highest_bid = book.best_bid().ok_or_else(|| Error::NoLiquidity {
            symbol: book.symbol.clone(),
            side: BookSide::Bid,
        })?;
        let lowest_ask = book.best_ask().ok_or_else(|| Error::NoLiquidity {
            symbol: book.symbol.clone(),
            side: BookSide::Ask,
        })?;

        Ok(Self {
            symbol: book.symbol.clone(),
            highest_bid,
            lowest_ask,
            spread: lowest_ask - highest_bid,
        })
    }
}

/// Direction of a spread change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSign {
    Positive,
    Negative,
    Zero,
}

impl DeltaSign {
    pub fn of(delta: Decimal) -> Self {
        if delta.is_zero() {
            DeltaSign::Zero
        } else if delta.is_sign_negative() {
            DeltaSign::Negative
        } else {
            DeltaSign::Positive
        }
    }

    /// Symbol used in log lines
    pub fn symbol(&self) -> &'static str {
        match self {
            DeltaSign::Positive => "+",
            DeltaSign::Negative => "-",
            DeltaSign::Zero => "=",
        }
    }

    /// Value of the `sign` metric label
    pub fn label(&self) -> &'static str {
        match self {
            DeltaSign::Positive => "1",
            DeltaSign::Negative => "-1",
            DeltaSign::Zero => "0",
        }
    }
}

/// A spread snapshot with its change since the previous poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadMetric {
    #[serde(flatten)]
    pub snapshot: SpreadSnapshot,
    /// Current minus previous spread; zero on first observation
    pub delta: Decimal,
    pub sign: DeltaSign,
}

impl SpreadMetric {
    pub fn symbol(&self) -> &str {
        &self.snapshot.symbol
    }
}

impl std::fmt::Display for SpreadMetric {
    /// `<symbol>: <spread> (<sign><abs-delta>)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({}{})",
            self.snapshot.symbol,
            self.snapshot.spread.normalize(),
            self.sign.symbol(),
            self.delta.abs().normalize()
        )
    }
}

/// Most recent spread snapshot per symbol, replaced wholesale every poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadState {
    snapshots: HashMap<String, SpreadSnapshot>,
}

impl SpreadState {
    pub fn get(&self, symbol: &str) -> Option<&SpreadSnapshot> {
        self.snapshots.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }
}

impl FromIterator<SpreadSnapshot> for SpreadState {
    fn from_iter<I: IntoIterator<Item = SpreadSnapshot>>(iter: I) -> Self {
        Self {
            snapshots: iter.into_iter().map(|s| (s.symbol.clone(), s)).collect(),
        }
    }
}

/// Fetch a shallow book for every symbol concurrently and read its spread.
///
/// Any fetch error, or an empty side on any book, fails the whole batch.
pub async fn fetch_spreads(
    client: &SharedClient,
    symbols: &[String],
    depth: u32,
) -> Result<Vec<SpreadSnapshot>> {
    fan_out(client, symbols, move |client, symbol| async move {
        let book = client.order_book(&symbol, depth).await;
        book.and_then(|book| SpreadSnapshot::from_book(&book))
            .map_err(|e| {
                tracing::warn!(symbol = %symbol, error = %e, "Failed to read spread");
                e
            })
    })
    .await
}

/// Compare snapshots with `prior` and build the next state.
///
/// The returned state holds exactly the given snapshots; symbols absent from
/// this batch are dropped.
pub fn apply_deltas(
    snapshots: Vec<SpreadSnapshot>,
    prior: &SpreadState,
) -> (Vec<SpreadMetric>, SpreadState) {
    let metrics: Vec<SpreadMetric> = snapshots
        .into_iter()
        .map(|snapshot| {
            let delta = prior
                .get(&snapshot.symbol)
                .map_or(Decimal::ZERO, |previous| snapshot.spread - previous.spread);
            SpreadMetric {
                snapshot,
                delta,
                sign: DeltaSign::of(delta),
            }
        })
        .collect();

    let state = metrics.iter().map(|m| m.snapshot.clone()).collect();
    (metrics, state)
}

/// Fetch spreads and derive deltas against `prior`
pub async fn compute_spreads(
    client: &SharedClient,
    symbols: &[String],
    depth: u32,
    prior: &SpreadState,
) -> Result<(Vec<SpreadMetric>, SpreadState)> {
    let snapshots = fetch_spreads(client, symbols, depth).await?;
    Ok(apply_deltas(snapshots, prior))
}
