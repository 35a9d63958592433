//! Gateway event routing.
//!
//! One router instance serves the whole session. Each event from the
//! channel is handled on its own spawned task, so a slow handler never
//! stalls the gateway feed.

use std::sync::Arc;

use herald_core::{
    ArgumentMap, Capabilities, ChannelKind, GatewayEvent, GuildSnapshot, InteractionEvent,
    InteractionKind, MessageEvent, ReadyEvent,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::commands::{EXAMPLE_BUTTON_ID, EXAMPLE_SELECT_ID};
use crate::context::Context;
use crate::dispatcher::{respond_ephemeral, CommandDispatcher};
use crate::stats::persist_stats;

const PRESENCE_TEXT: &str = "Type /help for commands";

#[derive(Clone)]
pub struct EventRouter {
    ctx: Arc<Context>,
}

impl EventRouter {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    /// Consumes events until the channel closes, spawning one task per
    /// event.
    pub async fn run(&self, mut events: mpsc::Receiver<GatewayEvent>) {
        while let Some(event) = events.recv().await {
            let router = self.clone();
            tokio::spawn(async move { router.handle(event).await });
        }
        debug!("gateway event channel closed");
    }

    pub async fn handle(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::Ready(ready) => self.on_ready(ready).await,
            GatewayEvent::GuildJoined(snapshot) => self.on_guild_joined(snapshot).await,
            GatewayEvent::GuildLeft { guild_id } => {
                info!(guild = %guild_id, "left guild");
                self.ctx.guilds.remove(&guild_id);
                persist_stats(&self.ctx).await;
            }
            GatewayEvent::MessageReceived(message) => self.on_message(message).await,
            GatewayEvent::InteractionReceived(interaction) => {
                self.on_interaction(interaction).await
            }
        }
    }

    async fn on_ready(&self, ready: ReadyEvent) {
        info!(guilds = ready.guilds.len(), "gateway session ready");
        self.ctx.set_current_user(ready.bot_user);
        for snapshot in ready.guilds {
            self.ctx.guilds.upsert(snapshot);
        }
        if let Err(error) = self.ctx.chat.set_presence(PRESENCE_TEXT).await {
            warn!(%error, "failed to set presence");
        }
        persist_stats(&self.ctx).await;
    }

    async fn on_guild_joined(&self, snapshot: GuildSnapshot) {
        info!(guild = %snapshot.id, name = %snapshot.name, "joined guild");
        let guild_id = snapshot.id.clone();
        self.ctx.guilds.upsert(snapshot);
        persist_stats(&self.ctx).await;

        // Greet in the first text channel the bot can actually speak in.
        let Some(bot) = self.ctx.current_user() else {
            return;
        };
        let Some(snapshot) = self.ctx.guilds.get(&guild_id) else {
            return;
        };
        for channel in snapshot
            .channels
            .iter()
            .filter(|c| c.kind == ChannelKind::Text)
        {
            let held = match self
                .ctx
                .permissions
                .effective_permissions(&bot, &channel.id)
                .await
            {
                Ok(held) => held,
                Err(error) => {
                    warn!(channel = %channel.id, %error, "failed to query own permissions");
                    continue;
                }
            };
            if !held.contains(Capabilities::SEND_MESSAGES) {
                continue;
            }
            let embed = herald_core::Embed::new()
                .title("Hello!")
                .description(format!(
                    "Thanks for adding me to {}. Type {}help or /help to get started.",
                    snapshot.name, self.ctx.config.command_prefix
                ));
            if let Err(error) = self.ctx.chat.send_embed(&channel.id, &embed).await {
                warn!(channel = %channel.id, %error, "failed to send welcome message");
            }
            break;
        }
    }

    async fn on_message(&self, message: MessageEvent) {
        if self.ctx.is_self(&message.author) {
            return;
        }
        if let Some(body) = message.content.strip_prefix(&self.ctx.config.command_prefix) {
            let body = body.to_string();
            CommandDispatcher::dispatch_prefix(self.ctx.clone(), message, &body).await;
            return;
        }
        if message.content.to_lowercase().contains("hello bot") {
            if let Err(error) = self
                .ctx
                .chat
                .add_reaction(&message.channel_id, &message.message_id, "👋")
                .await
            {
                warn!(%error, "failed to add greeting reaction");
            }
        }
    }

    async fn on_interaction(&self, event: InteractionEvent) {
        match &event.kind {
            InteractionKind::Command(_) => {
                CommandDispatcher::dispatch_slash(self.ctx.clone(), event).await;
            }
            InteractionKind::Button { component_id } => {
                let component_id = component_id.clone();
                self.log_component(&event, "button", &component_id, ArgumentMap::new())
                    .await;
                let reply = match component_id.as_str() {
                    EXAMPLE_BUTTON_ID => "You clicked the button!",
                    _ => "Unknown button interaction.",
                };
                respond_ephemeral(&self.ctx, &event.id, reply).await;
            }
            InteractionKind::SelectMenu {
                component_id,
                values,
            } => {
                let component_id = component_id.clone();
                let mut data = ArgumentMap::new();
                data.insert(
                    "values".to_string(),
                    Value::Array(values.iter().cloned().map(Value::String).collect()),
                );
                self.log_component(&event, "select_menu", &component_id, data)
                    .await;
                let reply = match component_id.as_str() {
                    EXAMPLE_SELECT_ID => format!("You picked: {}", values.join(", ")),
                    _ => "Unknown select interaction.".to_string(),
                };
                respond_ephemeral(&self.ctx, &event.id, &reply).await;
            }
        }
    }

    async fn log_component(
        &self,
        event: &InteractionEvent,
        kind: &str,
        component_id: &str,
        data: ArgumentMap,
    ) {
        if let Err(error) = self
            .ctx
            .events
            .log_interaction(
                event.guild_id.as_ref(),
                &event.channel_id,
                &event.user,
                kind,
                component_id,
                &data,
            )
            .await
        {
            warn!(component = %component_id, %error, "failed to record interaction");
        }
    }
}
