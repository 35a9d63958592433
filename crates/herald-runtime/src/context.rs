//! Shared state handed to every command handler and event callback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use herald_core::{
    ChatApi, CommandCatalog, EventStore, GuildStateStore, PermissionOracle, UserId, VoiceTransport,
};
use parking_lot::RwLock;

use crate::config::HeraldConfig;
use crate::registry::CommandRegistry;
use crate::voice::VoiceManager;

/// The platform-facing collaborators the runtime is wired against.
pub struct Ports {
    pub chat: Arc<dyn ChatApi>,
    pub permissions: Arc<dyn PermissionOracle>,
    pub catalog: Arc<dyn CommandCatalog>,
    pub events: Arc<dyn EventStore>,
    pub voice: Arc<dyn VoiceTransport>,
}

pub struct Context {
    pub config: HeraldConfig,
    pub guilds: GuildStateStore,
    pub voice: VoiceManager,
    pub chat: Arc<dyn ChatApi>,
    pub permissions: Arc<dyn PermissionOracle>,
    pub catalog: Arc<dyn CommandCatalog>,
    pub events: Arc<dyn EventStore>,
    pub registry: Arc<CommandRegistry>,
    started_at: RwLock<Instant>,
    current_user: RwLock<Option<UserId>>,
}

impl Context {
    pub fn new(config: HeraldConfig, ports: Ports, registry: Arc<CommandRegistry>) -> Self {
        Self {
            config,
            guilds: GuildStateStore::new(),
            voice: VoiceManager::new(ports.voice),
            chat: ports.chat,
            permissions: ports.permissions,
            catalog: ports.catalog,
            events: ports.events,
            registry,
            started_at: RwLock::new(Instant::now()),
            current_user: RwLock::new(None),
        }
    }

    /// Resets the uptime origin; called once the gateway reports ready.
    pub fn mark_started(&self) {
        *self.started_at.write() = Instant::now();
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.read().elapsed()
    }

    pub fn set_current_user(&self, user: UserId) {
        *self.current_user.write() = Some(user);
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.current_user.read().clone()
    }

    /// Whether the given author is the bot itself.
    pub fn is_self(&self, user: &UserId) -> bool {
        self.current_user.read().as_ref() == Some(user)
    }
}
