//! Built-in command set.
//!
//! Everything the service answers out of the box lives here. Prefix and
//! structured variants of the same command share helpers but are registered
//! independently, so embedders can drop either flavor.

use std::sync::Arc;
use std::time::{Instant, SystemTime};

use herald_core::{
    Capabilities, CommandDecl, Embed, MessageEvent, OptionDecl, OptionKind, OptionValue, Reply,
};
use tracing::warn;

use crate::context::Context;
use crate::error::CommandResult;
use crate::registry::{
    prefix_handler, slash_handler, CommandRegistry, PrefixCommand, SlashCommand, SlashRequest,
};

/// Component id the platform adapter attaches to the example button.
pub const EXAMPLE_BUTTON_ID: &str = "example_button";
/// Component id the platform adapter attaches to the example select menu.
pub const EXAMPLE_SELECT_ID: &str = "example_select";

const EMBED_COLOR: u32 = 0x00AE86;

/// Builds the registry holding every built-in command.
pub fn builtin() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register_prefix(PrefixCommand {
        name: "help".to_string(),
        description: "Lists commands or describes one".to_string(),
        usage: "help [command]".to_string(),
        handler: prefix_handler(help_prefix),
    });
    registry.register_prefix(PrefixCommand {
        name: "ping".to_string(),
        description: "Measures message round-trip latency".to_string(),
        usage: "ping".to_string(),
        handler: prefix_handler(ping_prefix),
    });
    registry.register_prefix(PrefixCommand {
        name: "info".to_string(),
        description: "Shows service statistics".to_string(),
        usage: "info".to_string(),
        handler: prefix_handler(info_prefix),
    });
    registry.register_prefix(PrefixCommand {
        name: "play".to_string(),
        description: "Joins your current voice channel".to_string(),
        usage: "play".to_string(),
        handler: prefix_handler(play_prefix),
    });
    registry.register_prefix(PrefixCommand {
        name: "leave".to_string(),
        description: "Leaves the voice channel".to_string(),
        usage: "leave".to_string(),
        handler: prefix_handler(leave_prefix),
    });
    registry.register_prefix(PrefixCommand {
        name: "stop".to_string(),
        description: "Stops audio playback".to_string(),
        usage: "stop".to_string(),
        handler: prefix_handler(stop_prefix),
    });

    registry.register_slash(SlashCommand {
        decl: CommandDecl::new("help", "Lists commands or describes one").option(
            OptionDecl::new(OptionKind::String, "command", "Command to describe"),
        ),
        required: Capabilities::NONE,
        handler: slash_handler(help_slash),
    });
    registry.register_slash(SlashCommand {
        decl: CommandDecl::new("ping", "Measures interaction latency"),
        required: Capabilities::NONE,
        handler: slash_handler(ping_slash),
    });
    registry.register_slash(SlashCommand {
        decl: CommandDecl::new("info", "Shows service statistics"),
        required: Capabilities::NONE,
        handler: slash_handler(info_slash),
    });
    registry.register_slash(SlashCommand {
        decl: CommandDecl::new("button", "Sends an example button"),
        required: Capabilities::NONE,
        handler: slash_handler(button_slash),
    });
    registry.register_slash(SlashCommand {
        decl: CommandDecl::new("select", "Sends an example select menu"),
        required: Capabilities::NONE,
        handler: slash_handler(select_slash),
    });
    registry.register_slash(SlashCommand {
        decl: CommandDecl::new("role", "Grants or revokes a role")
            .option(
                OptionDecl::new(OptionKind::SubCommand, "add", "Grant a role to a member")
                    .option(
                        OptionDecl::new(OptionKind::User, "user", "Member to grant the role to")
                            .required(),
                    )
                    .option(OptionDecl::new(OptionKind::Role, "role", "Role to grant").required()),
            )
            .option(
                OptionDecl::new(OptionKind::SubCommand, "remove", "Revoke a role from a member")
                    .option(
                        OptionDecl::new(OptionKind::User, "user", "Member to revoke the role from")
                            .required(),
                    )
                    .option(
                        OptionDecl::new(OptionKind::Role, "role", "Role to revoke").required(),
                    ),
            ),
        required: Capabilities::MANAGE_ROLES,
        handler: slash_handler(role_slash),
    });

    registry
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}h {minutes}m {secs}s")
}

fn info_embed(ctx: &Context) -> Embed {
    Embed::new()
        .title("Bot Information")
        .color(EMBED_COLOR)
        .field("Servers", ctx.guilds.len().to_string(), true)
        .field("Members", ctx.guilds.member_total().to_string(), true)
        .field("Uptime", format_uptime(ctx.uptime().as_secs()), true)
        .timestamp(SystemTime::now())
}

fn help_listing(ctx: &Context) -> Embed {
    let prefix = &ctx.config.command_prefix;
    let mut entries: Vec<_> = ctx.registry.prefix_commands().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    let mut embed = Embed::new().title("Commands").color(EMBED_COLOR);
    for command in entries {
        embed = embed.field(
            format!("{prefix}{}", command.name),
            command.description.clone(),
            false,
        );
    }
    embed
}

async fn help_prefix(ctx: Arc<Context>, message: MessageEvent, args: Vec<String>) -> CommandResult {
    match args.first() {
        Some(name) => {
            let reply = match ctx.registry.prefix(name) {
                Some(command) => format!(
                    "{}{} - {}\nUsage: {}{}",
                    ctx.config.command_prefix,
                    command.name,
                    command.description,
                    ctx.config.command_prefix,
                    command.usage,
                ),
                None => "Unknown command.".to_string(),
            };
            ctx.chat.send_message(&message.channel_id, &reply).await?;
        }
        None => {
            let embed = help_listing(&ctx);
            ctx.chat.send_embed(&message.channel_id, &embed).await?;
        }
    }
    Ok(())
}

async fn ping_prefix(ctx: Arc<Context>, message: MessageEvent, _args: Vec<String>) -> CommandResult {
    let started = Instant::now();
    let sent = ctx.chat.send_message(&message.channel_id, "Pinging...").await?;
    let latency = started.elapsed().as_millis();
    ctx.chat
        .edit_message(
            &message.channel_id,
            &sent,
            &format!("Pong! Latency: {latency}ms"),
        )
        .await?;
    Ok(())
}

async fn info_prefix(ctx: Arc<Context>, message: MessageEvent, _args: Vec<String>) -> CommandResult {
    let embed = info_embed(&ctx);
    ctx.chat.send_embed(&message.channel_id, &embed).await?;
    Ok(())
}

async fn play_prefix(ctx: Arc<Context>, message: MessageEvent, _args: Vec<String>) -> CommandResult {
    let Some(guild_id) = message.guild_id else {
        ctx.chat
            .send_message(&message.channel_id, "This command only works in a server.")
            .await?;
        return Ok(());
    };
    let channel = ctx
        .guilds
        .get(&guild_id)
        .and_then(|snapshot| snapshot.voice_channel_of(&message.author).cloned());
    let Some(channel) = channel else {
        ctx.chat
            .send_message(
                &message.channel_id,
                "You must be in a voice channel to use this command.",
            )
            .await?;
        return Ok(());
    };

    ctx.voice.join(&guild_id, &channel).await?;
    let name = ctx
        .guilds
        .get(&guild_id)
        .and_then(|snapshot| {
            snapshot
                .channels
                .iter()
                .find(|c| c.id == channel)
                .map(|c| c.name.clone())
        })
        .unwrap_or_else(|| channel.to_string());
    ctx.chat
        .send_message(&message.channel_id, &format!("Joined {name}."))
        .await?;
    Ok(())
}

async fn leave_prefix(ctx: Arc<Context>, message: MessageEvent, _args: Vec<String>) -> CommandResult {
    let Some(guild_id) = message.guild_id else {
        ctx.chat
            .send_message(&message.channel_id, "This command only works in a server.")
            .await?;
        return Ok(());
    };
    let reply = match ctx.voice.leave(&guild_id).await {
        Ok(()) => "Left the voice channel.",
        Err(herald_core::VoiceError::NotConnected) => "Not connected to a voice channel.",
        Err(error) => return Err(error.into()),
    };
    ctx.chat.send_message(&message.channel_id, reply).await?;
    Ok(())
}

async fn stop_prefix(ctx: Arc<Context>, message: MessageEvent, _args: Vec<String>) -> CommandResult {
    let Some(guild_id) = message.guild_id else {
        ctx.chat
            .send_message(&message.channel_id, "This command only works in a server.")
            .await?;
        return Ok(());
    };
    let reply = match ctx.voice.connection(&guild_id).await {
        Some(connection) if connection.is_playing() => {
            connection.stop();
            "Stopped playback."
        }
        Some(_) => "Nothing is playing.",
        None => "Not connected to a voice channel.",
    };
    ctx.chat.send_message(&message.channel_id, reply).await?;
    Ok(())
}

async fn help_slash(ctx: Arc<Context>, request: SlashRequest) -> CommandResult {
    let named = request
        .invocation
        .options
        .iter()
        .find(|o| o.name == "command")
        .and_then(|o| o.value.as_str());
    let reply = match named {
        Some(name) => match ctx.registry.slash(name) {
            Some(command) => Reply::text(format!(
                "/{} - {}",
                command.decl.name, command.decl.description
            ))
            .ephemeral(),
            None => Reply::text("Unknown command.").ephemeral(),
        },
        None => Reply::embed(help_listing(&ctx)),
    };
    ctx.chat.respond(&request.interaction, &reply).await?;
    Ok(())
}

async fn ping_slash(ctx: Arc<Context>, request: SlashRequest) -> CommandResult {
    // Clock skew can put the interaction timestamp in the future; clamp
    // to zero rather than erroring.
    let elapsed = SystemTime::now()
        .duration_since(request.invocation.created_at)
        .unwrap_or_default();
    ctx.chat
        .respond(
            &request.interaction,
            &Reply::text(format!("Pong! Latency: {}ms", elapsed.as_millis())),
        )
        .await?;
    Ok(())
}

async fn info_slash(ctx: Arc<Context>, request: SlashRequest) -> CommandResult {
    let embed = info_embed(&ctx);
    ctx.chat
        .respond(&request.interaction, &Reply::embed(embed))
        .await?;
    Ok(())
}

async fn button_slash(ctx: Arc<Context>, request: SlashRequest) -> CommandResult {
    ctx.chat
        .respond(&request.interaction, &Reply::text("Here is a button!"))
        .await?;
    Ok(())
}

async fn select_slash(ctx: Arc<Context>, request: SlashRequest) -> CommandResult {
    ctx.chat
        .respond(&request.interaction, &Reply::text("Pick an option below."))
        .await?;
    Ok(())
}

async fn role_slash(ctx: Arc<Context>, request: SlashRequest) -> CommandResult {
    let Some(guild_id) = request.guild_id.clone() else {
        ctx.chat
            .respond(
                &request.interaction,
                &Reply::text("This command only works in a server.").ephemeral(),
            )
            .await?;
        return Ok(());
    };

    let Some((subcommand, options)) = request.invocation.options.first().and_then(|o| {
        match &o.value {
            OptionValue::SubCommand(nested) => Some((o.name.as_str(), nested)),
            _ => None,
        }
    }) else {
        ctx.chat
            .respond(
                &request.interaction,
                &Reply::text("Missing subcommand.").ephemeral(),
            )
            .await?;
        return Ok(());
    };

    let user = options
        .iter()
        .find(|o| o.name == "user")
        .and_then(|o| o.value.as_user());
    let role = options
        .iter()
        .find(|o| o.name == "role")
        .and_then(|o| o.value.as_role());
    let (Some(user), Some(role)) = (user, role) else {
        ctx.chat
            .respond(
                &request.interaction,
                &Reply::text("Missing required options.").ephemeral(),
            )
            .await?;
        return Ok(());
    };

    // The invoker's capabilities were already checked by the dispatcher;
    // this one is about what the bot itself may do.
    let allowed = match ctx.current_user() {
        Some(bot) => {
            match ctx
                .permissions
                .effective_permissions(&bot, &request.channel_id)
                .await
            {
                Ok(held) => held.contains(Capabilities::MANAGE_ROLES),
                Err(error) => {
                    warn!(%error, "failed to query own permissions");
                    ctx.chat
                        .respond(
                            &request.interaction,
                            &Reply::text("An error occurred while checking permissions.")
                                .ephemeral(),
                        )
                        .await?;
                    return Ok(());
                }
            }
        }
        None => false,
    };
    if !allowed {
        ctx.chat
            .respond(
                &request.interaction,
                &Reply::text("I don't have permission to manage roles here.").ephemeral(),
            )
            .await?;
        return Ok(());
    }

    let reply = match subcommand {
        "add" => {
            ctx.chat.add_member_role(&guild_id, user, role).await?;
            Reply::text("Role granted.")
        }
        "remove" => {
            ctx.chat.remove_member_role(&guild_id, user, role).await?;
            Reply::text("Role revoked.")
        }
        other => {
            warn!(subcommand = %other, "unknown role subcommand");
            Reply::text("Unknown subcommand.").ephemeral()
        }
    };
    ctx.chat.respond(&request.interaction, &reply).await?;
    Ok(())
}
