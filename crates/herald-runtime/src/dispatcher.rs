//! Command dispatch.
//!
//! Prefix dispatch tokenizes a message body; structured dispatch consumes a
//! platform-validated interaction. Both record the invocation in the event
//! store on a spawned task so persistence latency never delays the handler.

use std::sync::Arc;

use herald_core::{
    ArgumentMap, ChannelId, CommandKind, CommandOption, GuildId, InteractionEvent,
    InteractionId, InteractionKind, MessageEvent, Reply, UserId,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::context::Context;
use crate::registry::SlashRequest;

/// Reserved key in the audit argument map naming the invoked sub-command.
pub const SUBCOMMAND_KEY: &str = "subcommand";

pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Dispatches a prefix command. `body` is the message content with the
    /// configured prefix already stripped. Unknown names are ignored so the
    /// bot stays quiet when users talk past it.
    pub async fn dispatch_prefix(ctx: Arc<Context>, message: MessageEvent, body: &str) {
        let mut parts = body.split_whitespace();
        let Some(name) = parts.next() else {
            return;
        };
        let name = name.to_lowercase();
        let args: Vec<String> = parts.map(str::to_string).collect();

        let Some(command) = ctx.registry.prefix(&name) else {
            debug!(command = %name, "ignoring unknown prefix command");
            return;
        };
        let handler = command.handler.clone();

        let mut recorded = ArgumentMap::new();
        for (index, arg) in args.iter().enumerate() {
            recorded.insert(format!("arg{}", index + 1), Value::String(arg.clone()));
        }
        spawn_command_log(
            ctx.clone(),
            message.guild_id.clone(),
            message.channel_id.clone(),
            message.author.clone(),
            name.clone(),
            CommandKind::Prefix,
            recorded,
        );

        if let Err(error) = handler(ctx, message, args).await {
            error!(command = %name, %error, "prefix command handler failed");
        }
    }

    /// Dispatches a structured command interaction. Unknown names and failed
    /// permission checks are answered with an ephemeral reply; the handler
    /// only runs once the invoker's capabilities cover the command's
    /// requirement.
    pub async fn dispatch_slash(ctx: Arc<Context>, event: InteractionEvent) {
        let InteractionEvent {
            id,
            guild_id,
            channel_id,
            user,
            kind,
        } = event;
        let InteractionKind::Command(invocation) = kind else {
            return;
        };

        let name = invocation.name.to_lowercase();
        let Some(command) = ctx.registry.slash(&name) else {
            warn!(command = %name, "received unregistered structured command");
            respond_ephemeral(&ctx, &id, "Unknown command.").await;
            return;
        };
        let handler = command.handler.clone();
        let required = command.required;

        if guild_id.is_some() && !required.is_empty() {
            let held = match ctx.permissions.effective_permissions(&user, &channel_id).await {
                Ok(held) => held,
                Err(error) => {
                    error!(command = %name, %error, "permission query failed");
                    respond_ephemeral(&ctx, &id, "An error occurred while checking permissions.")
                        .await;
                    return;
                }
            };
            if !held.contains(required) {
                respond_ephemeral(
                    &ctx,
                    &id,
                    "You don't have permission to use this command.",
                )
                .await;
                return;
            }
        }

        spawn_command_log(
            ctx.clone(),
            guild_id.clone(),
            channel_id.clone(),
            user.clone(),
            name.clone(),
            CommandKind::Slash,
            flatten_options(&invocation.options),
        );

        let request = SlashRequest {
            interaction: id,
            guild_id,
            channel_id,
            user,
            invocation,
        };
        if let Err(error) = handler(ctx, request).await {
            error!(command = %name, %error, "structured command handler failed");
        }
    }
}

/// Flattens a typed option tree into the audit argument map.
///
/// A leading sub-command contributes its name under [`SUBCOMMAND_KEY`] and
/// its nested options are lifted to the top level; everything else maps
/// name to scalar JSON value.
pub fn flatten_options(options: &[CommandOption]) -> ArgumentMap {
    let mut map = ArgumentMap::new();
    if let Some(first) = options.first() {
        if let herald_core::OptionValue::SubCommand(nested) = &first.value {
            map.insert(
                SUBCOMMAND_KEY.to_string(),
                Value::String(first.name.clone()),
            );
            for option in nested {
                map.insert(option.name.clone(), option.value.to_json());
            }
            return map;
        }
    }
    for option in options {
        map.insert(option.name.clone(), option.value.to_json());
    }
    map
}

/// Sends a private error reply, logging rather than propagating failures.
pub(crate) async fn respond_ephemeral(ctx: &Context, interaction: &InteractionId, content: &str) {
    if let Err(error) = ctx
        .chat
        .respond(interaction, &Reply::text(content).ephemeral())
        .await
    {
        warn!(%error, "failed to send ephemeral response");
    }
}

fn spawn_command_log(
    ctx: Arc<Context>,
    guild_id: Option<GuildId>,
    channel_id: ChannelId,
    user: UserId,
    name: String,
    kind: CommandKind,
    args: ArgumentMap,
) {
    tokio::spawn(async move {
        if let Err(error) = ctx
            .events
            .log_command(guild_id.as_ref(), &channel_id, &user, &name, kind, &args)
            .await
        {
            warn!(command = %name, %error, "failed to record command invocation");
        }
    });
}
