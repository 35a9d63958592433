//! Inbound gateway event model.
//!
//! The gateway collaborator translates whatever it receives on the wire into
//! this closed set of variants; the router dispatches on the enum directly,
//! one spawned task per event. There is no runtime registration of handler
//! signatures: adding an event kind means adding a variant here and an arm
//! in the router.

use std::time::SystemTime;

use serde_json::Value;

use crate::id::{ChannelId, GuildId, InteractionId, MessageId, UserId};
use crate::store::GuildSnapshot;

/// An inbound event from the gateway collaborator.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// The session is established and initial state is available.
    Ready(ReadyEvent),
    /// The bot joined a guild (or the gateway replayed a known one).
    GuildJoined(GuildSnapshot),
    /// The bot left a guild.
    GuildLeft { guild_id: GuildId },
    /// A message was posted in a channel the bot can read.
    MessageReceived(MessageEvent),
    /// A structured interaction (slash command, button, select menu).
    InteractionReceived(InteractionEvent),
}

/// Payload of [`GatewayEvent::Ready`].
#[derive(Debug, Clone)]
pub struct ReadyEvent {
    /// The bot's own user id, used to ignore self-authored messages.
    pub bot_user: UserId,
    /// Guilds known at session start.
    pub guilds: Vec<GuildSnapshot>,
}

/// Payload of [`GatewayEvent::MessageReceived`].
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub message_id: MessageId,
    /// Absent for direct messages.
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub author: UserId,
    pub content: String,
}

/// Payload of [`GatewayEvent::InteractionReceived`].
#[derive(Debug, Clone)]
pub struct InteractionEvent {
    /// Handle for responding to this interaction.
    pub id: InteractionId,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub user: UserId,
    pub kind: InteractionKind,
}

/// The platform-validated sub-type of an interaction.
#[derive(Debug, Clone)]
pub enum InteractionKind {
    /// A structured (slash) command invocation.
    Command(CommandInvocation),
    /// A button click on a message component.
    Button { component_id: String },
    /// A selection in a select-menu component.
    SelectMenu {
        component_id: String,
        values: Vec<String>,
    },
}

/// A structured command invocation with its typed option tree.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Declared command name, already validated by the platform.
    pub name: String,
    /// Typed options, possibly nested one level under a sub-command.
    pub options: Vec<CommandOption>,
    /// When the platform created the interaction; latency measurements are
    /// taken against this instant.
    pub created_at: SystemTime,
}

/// A single named option of a command invocation.
#[derive(Debug, Clone)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

/// The typed value of a command option.
#[derive(Debug, Clone)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(UserId),
    Role(crate::id::RoleId),
    Channel(ChannelId),
    /// A sub-command marker carrying its own nested options.
    SubCommand(Vec<CommandOption>),
}

impl OptionValue {
    /// Converts a scalar option value to JSON for the audit argument map.
    ///
    /// Sub-commands have no scalar value of their own; the dispatcher flattens
    /// them structurally instead.
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::String(s) => Value::String(s.clone()),
            OptionValue::Integer(i) => Value::from(*i),
            OptionValue::Boolean(b) => Value::Bool(*b),
            OptionValue::User(id) => Value::String(id.to_string()),
            OptionValue::Role(id) => Value::String(id.to_string()),
            OptionValue::Channel(id) => Value::String(id.to_string()),
            OptionValue::SubCommand(_) => Value::Null,
        }
    }

    /// Returns the string payload if this is a string option.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the user id if this is a user option.
    pub fn as_user(&self) -> Option<&UserId> {
        match self {
            OptionValue::User(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the role id if this is a role option.
    pub fn as_role(&self) -> Option<&crate::id::RoleId> {
        match self {
            OptionValue::Role(id) => Some(id),
            _ => None,
        }
    }
}

impl CommandInvocation {
    /// Creates an invocation timestamped now; useful for embedders and tests.
    pub fn new(name: impl Into<String>, options: Vec<CommandOption>) -> Self {
        Self {
            name: name.into(),
            options,
            created_at: SystemTime::now(),
        }
    }
}
