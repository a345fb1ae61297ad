//! Background poller
//!
//! Recomputes the market views on a fixed interval, keeps the previous spread
//! state for delta tracking and publishes each successful cycle as a
//! [`MarketSnapshot`].

mod snapshot;

pub use snapshot::MarketSnapshot;

use crate::cache::Published;
use crate::error::Result;
use crate::market::{symbols_of, MarketDataService, MarketQuery, RankMetric, SpreadState};
use crate::telemetry::{record_cycle, set_gauge, CycleOutcome, GaugeMetric};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

/// Drives the periodic recomputation
pub struct Poller {
    service: Arc<MarketDataService>,
    query: MarketQuery,
    interval: Duration,
    state: SpreadState,
    published: Arc<Published<MarketSnapshot>>,
}

impl Poller {
    pub fn new(
        service: Arc<MarketDataService>,
        interval: Duration,
        published: Arc<Published<MarketSnapshot>>,
    ) -> Self {
        let query = service.default_query();
        Self {
            service,
            query,
            interval,
            state: SpreadState::default(),
            published,
        }
    }

    /// Spread state carried into the next cycle
    pub fn state(&self) -> &SpreadState {
        &self.state
    }

    /// Run one cycle.
    ///
    /// On failure the spread state and the published snapshot are left as
    /// they were.
    pub async fn run_cycle(&mut self) -> Result<Arc<MarketSnapshot>> {
        let started = Instant::now();
        match self.compute().await {
            Ok(snapshot) => {
                for metric in &snapshot.spreads {
                    tracing::info!("{}", metric);
                }
                set_gauge(GaugeMetric::TrackedSymbols, snapshot.symbol_count() as f64);
                record_cycle(CycleOutcome::Published, started.elapsed());

                let snapshot = Arc::new(snapshot);
                self.published.publish_shared(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "Poll cycle failed, keeping previous snapshot");
                record_cycle(CycleOutcome::Failed, started.elapsed());
                Err(e)
            }
        }
    }

    async fn compute(&mut self) -> Result<MarketSnapshot> {
        let limit = self.service.settings().top_limit;
        let (top_volumes, top_trade_counts) = tokio::try_join!(
            self.service
                .cached_top_symbols(&self.query.volume_quote_asset, limit, RankMetric::Volume),
            self.service.cached_top_symbols(
                &self.query.trade_count_quote_asset,
                limit,
                RankMetric::TradeCount
            ),
        )?;

        let notional_targets = symbols_of(&top_volumes);
        let spread_targets = symbols_of(&top_trade_counts);
        let (notional_values, (spreads, state)) = tokio::try_join!(
            self.service.total_notional_values(&notional_targets),
            self.service.spreads(&spread_targets, &self.state),
        )?;

        self.state = state;

        Ok(MarketSnapshot {
            cycle_id: Uuid::new_v4(),
            taken_at: Utc::now(),
            top_volumes,
            top_trade_counts,
            notional_values,
            spreads,
        })
    }

    /// Run cycles until ctrl-c.
    ///
    /// The first cycle starts immediately. Cycles never overlap; ticks missed
    /// while a cycle is running are skipped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            volume_quote = %self.query.volume_quote_asset,
            trade_count_quote = %self.query.trade_count_quote_asset,
            "Starting poller"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // failures are logged and counted inside
                    let _ = self.run_cycle().await;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutting down poller");
                    break;
                }
            }
        }
    }
}
