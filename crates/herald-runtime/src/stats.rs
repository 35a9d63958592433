//! Periodic service statistics.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::context::Context;

/// Writes one stats snapshot to the event store. Failures are logged and
/// swallowed; the snapshot is best-effort.
pub async fn persist_stats(ctx: &Context) {
    let guild_count = ctx.guilds.len() as u64;
    let user_count = ctx.guilds.member_total();
    let uptime_seconds = ctx.uptime().as_secs();
    if let Err(error) = ctx
        .events
        .update_stats(guild_count, user_count, uptime_seconds)
        .await
    {
        warn!(%error, "failed to persist stats snapshot");
    } else {
        debug!(guild_count, user_count, uptime_seconds, "persisted stats snapshot");
    }
}

/// Handle to the background stats aggregator.
pub struct StatsHandle {
    task: JoinHandle<()>,
    token: CancellationToken,
}

impl StatsHandle {
    /// Requests shutdown and waits for the aggregator to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(error) = self.task.await {
            warn!(%error, "stats aggregator task panicked");
        }
    }
}

/// Spawns the interval-driven stats aggregator.
pub fn spawn_aggregator(ctx: Arc<Context>) -> StatsHandle {
    let token = CancellationToken::new();
    let loop_token = token.clone();
    let period = Duration::from_secs(ctx.config.stats_interval_secs);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The immediate first tick: a snapshot is written right at startup.
        loop {
            tokio::select! {
                _ = loop_token.cancelled() => {
                    debug!("stats aggregator stopping");
                    break;
                }
                _ = ticker.tick() => persist_stats(&ctx).await,
            }
        }
    });
    StatsHandle { task, token }
}
