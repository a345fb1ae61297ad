//! Snapshot command implementation

use super::build_service;
use crate::cache::Published;
use crate::config::Config;
use crate::poller::Poller;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

impl SnapshotArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = build_service(config).await?;
        let published = Arc::new(Published::new(config.poller.publish_ttl()));
        let mut poller = Poller::new(service, config.poller.interval(), published);

        let snapshot = poller.run_cycle().await?;
        let json = if self.compact {
            serde_json::to_string(snapshot.as_ref())?
        } else {
            serde_json::to_string_pretty(snapshot.as_ref())?
        };
        println!("{json}");
        Ok(())
    }
}
