//! Command registry.
//!
//! Both command flavors live here: text commands addressed by prefix and
//! structured commands validated by the platform catalog. Lookup is
//! case-insensitive and later registrations replace earlier ones.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use herald_core::{
    Capabilities, ChannelId, CommandCatalog, CommandDecl, CommandInvocation, CommandScope,
    GuildId, InteractionId, MessageEvent, UserId,
};
use tracing::{debug, error, info};

use crate::context::Context;
use crate::error::{CommandResult, StartupError};

/// A structured-command invocation with its surrounding metadata.
#[derive(Debug, Clone)]
pub struct SlashRequest {
    pub interaction: InteractionId,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub user: UserId,
    pub invocation: CommandInvocation,
}

pub type PrefixHandler =
    Arc<dyn Fn(Arc<Context>, MessageEvent, Vec<String>) -> BoxFuture<'static, CommandResult> + Send + Sync>;

pub type SlashHandler =
    Arc<dyn Fn(Arc<Context>, SlashRequest) -> BoxFuture<'static, CommandResult> + Send + Sync>;

/// Adapts an async fn into the boxed handler shape stored in the registry.
pub fn prefix_handler<F, Fut>(f: F) -> PrefixHandler
where
    F: Fn(Arc<Context>, MessageEvent, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CommandResult> + Send + 'static,
{
    Arc::new(move |ctx, message, args| Box::pin(f(ctx, message, args)))
}

pub fn slash_handler<F, Fut>(f: F) -> SlashHandler
where
    F: Fn(Arc<Context>, SlashRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CommandResult> + Send + 'static,
{
    Arc::new(move |ctx, request| Box::pin(f(ctx, request)))
}

#[derive(Clone)]
pub struct PrefixCommand {
    pub name: String,
    pub description: String,
    /// Shown to the user when the command is invoked incorrectly.
    pub usage: String,
    pub handler: PrefixHandler,
}

#[derive(Clone)]
pub struct SlashCommand {
    pub decl: CommandDecl,
    /// Capabilities the invoking member must hold, checked before the
    /// handler runs. Empty means unrestricted.
    pub required: Capabilities,
    pub handler: SlashHandler,
}

#[derive(Default)]
pub struct CommandRegistry {
    prefix: HashMap<String, PrefixCommand>,
    slash: HashMap<String, SlashCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_prefix(&mut self, command: PrefixCommand) {
        self.prefix.insert(command.name.to_lowercase(), command);
    }

    pub fn register_slash(&mut self, command: SlashCommand) {
        self.slash.insert(command.decl.name.to_lowercase(), command);
    }

    pub fn prefix(&self, name: &str) -> Option<&PrefixCommand> {
        self.prefix.get(&name.to_lowercase())
    }

    pub fn slash(&self, name: &str) -> Option<&SlashCommand> {
        self.slash.get(&name.to_lowercase())
    }

    pub fn prefix_commands(&self) -> impl Iterator<Item = &PrefixCommand> {
        self.prefix.values()
    }

    pub fn slash_commands(&self) -> impl Iterator<Item = &SlashCommand> {
        self.slash.values()
    }

    /// Pushes every structured command definition to the platform catalog.
    /// Any failure is fatal so a half-registered catalog never goes live.
    pub async fn sync_to_catalog(
        &self,
        catalog: &dyn CommandCatalog,
        scope: &CommandScope,
    ) -> Result<(), StartupError> {
        for command in self.slash.values() {
            catalog
                .create_command(scope, &command.decl)
                .await
                .map_err(|source| StartupError::CommandRegistration {
                    name: command.decl.name.clone(),
                    source,
                })?;
            info!(command = %command.decl.name, "registered structured command");
        }
        Ok(())
    }

    /// Removes catalog entries on shutdown. Only guild-scoped definitions
    /// are deleted; global ones persist across restarts.
    pub async fn remove_from_catalog(&self, catalog: &dyn CommandCatalog, scope: &CommandScope) {
        match scope {
            CommandScope::Global => {
                debug!("keeping global command definitions in place");
            }
            CommandScope::Guild(guild) => {
                if let Err(error) = catalog.delete_commands(scope).await {
                    error!(guild = %guild, %error, "failed to delete guild-scoped commands");
                } else {
                    info!(guild = %guild, "deleted guild-scoped commands");
                }
            }
        }
    }
}
