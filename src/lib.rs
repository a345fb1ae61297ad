//! market-stats: market statistics service for a spot crypto exchange
//!
//! This library provides the core components for:
//! - REST access to exchange metadata, 24h tickers and order books
//! - Time-windowed caching of upstream calls and rankings
//! - Top-N ranking by volume and by trade count per quote asset
//! - Notional value aggregation over the leading book levels
//! - Bid/ask spread tracking with per-poll deltas
//! - A background poller publishing snapshots
//! - HTTP endpoints for data, health and Prometheus metrics

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod market;
pub mod orderbook;
pub mod poller;
pub mod server;
pub mod telemetry;

pub use error::{Error, Result};
