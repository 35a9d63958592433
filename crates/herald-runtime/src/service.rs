//! Service assembly and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use herald_core::GatewayEvent;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::HeraldConfig;
use crate::context::{Context, Ports};
use crate::error::StartupError;
use crate::registry::CommandRegistry;
use crate::router::EventRouter;
use crate::stats::{spawn_aggregator, StatsHandle};
use crate::{commands, stats};

/// The bot service. Owns the shared context and the background stats
/// aggregator; the platform adapter feeds it gateway events.
pub struct Herald {
    ctx: Arc<Context>,
    router: EventRouter,
    stats: Option<StatsHandle>,
}

impl Herald {
    /// Assembles the service from validated configuration and port handles,
    /// with the built-in command set.
    pub fn new(config: HeraldConfig, ports: Ports) -> Self {
        Self::with_registry(config, ports, commands::builtin())
    }

    /// Assembles the service with a caller-supplied command registry.
    pub fn with_registry(config: HeraldConfig, ports: Ports, registry: CommandRegistry) -> Self {
        let ctx = Arc::new(Context::new(config, ports, Arc::new(registry)));
        let router = EventRouter::new(ctx.clone());
        Self {
            ctx,
            router,
            stats: None,
        }
    }

    pub fn context(&self) -> Arc<Context> {
        self.ctx.clone()
    }

    pub fn uptime(&self) -> Duration {
        self.ctx.uptime()
    }

    /// Registers structured commands with the platform catalog and spawns
    /// the stats aggregator. Registration failure is fatal.
    pub async fn start(&mut self) -> Result<(), StartupError> {
        let scope = self.ctx.config.command_scope();
        self.ctx
            .registry
            .sync_to_catalog(self.ctx.catalog.as_ref(), &scope)
            .await?;
        self.ctx.mark_started();
        self.stats = Some(spawn_aggregator(self.ctx.clone()));
        info!("service started");
        Ok(())
    }

    /// Runs the service until the event channel closes or a shutdown
    /// signal arrives, then tears down.
    pub async fn run(
        &mut self,
        events: mpsc::Receiver<GatewayEvent>,
    ) -> Result<(), StartupError> {
        self.start().await?;
        tokio::select! {
            _ = self.router.run(events) => {
                info!("event stream ended");
            }
            _ = shutdown_signal() => {
                info!("shutdown signal received");
            }
        }
        self.stop().await;
        Ok(())
    }

    /// Graceful teardown: removes dev-scoped command definitions and stops
    /// the stats aggregator after a final snapshot.
    pub async fn stop(&mut self) {
        let scope = self.ctx.config.command_scope();
        self.ctx
            .registry
            .remove_from_catalog(self.ctx.catalog.as_ref(), &scope)
            .await;
        stats::persist_stats(&self.ctx).await;
        if let Some(handle) = self.stats.take() {
            handle.shutdown().await;
        }
        info!("service stopped");
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(error) => {
                error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
                return;
            }
        };
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(error) = result {
                    error!(%error, "failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            }
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
