//! Error types for upstream access and market-data computation

use serde::Serialize;
use thiserror::Error;

/// Side of an order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Bid,
    Ask,
}

impl std::fmt::Display for BookSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookSide::Bid => f.write_str("bid"),
            BookSide::Ask => f.write_str("ask"),
        }
    }
}

/// Errors raised while fetching or deriving market data
#[derive(Debug, Error)]
pub enum Error {
    /// Exchange answered with a non-success status
    #[error("upstream returned {status}: {message} (code {code:?})")]
    Upstream {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Connection, timeout or other transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("failed to decode {context}: {reason}")]
    Decode { context: String, reason: String },

    /// An order book side was empty where a best price was required
    #[error("no liquidity for {symbol}: empty {side} side")]
    NoLiquidity { symbol: String, side: BookSide },

    /// A fan-out task panicked or was cancelled
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Build a decode error with the offending context
    pub fn decode(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
