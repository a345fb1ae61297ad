//! Run command implementation

use super::build_service;
use crate::cache::Published;
use crate::config::Config;
use crate::poller::Poller;
use crate::server::{self, AppState};
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the configured listen address
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,
}

impl RunArgs {
    pub async fn execute(
        &self,
        config: &Config,
        metrics: Option<PrometheusHandle>,
    ) -> anyhow::Result<()> {
        let service = build_service(config).await?;
        let published = Arc::new(Published::new(config.poller.publish_ttl()));

        let poller = Poller::new(
            Arc::clone(&service),
            config.poller.interval(),
            Arc::clone(&published),
        );
        let poller_task = tokio::spawn(poller.run());

        let addr = self.listen.unwrap_or(config.server.listen_addr);
        let state = Arc::new(AppState::new(service, published, metrics));
        let served = server::serve(addr, state).await;

        poller_task.abort();
        served
    }
}
