//! Messaging, catalog, and permission ports.

use async_trait::async_trait;

use crate::capability::Capabilities;
use crate::command::{CommandDecl, CommandScope};
use crate::error::ApiResult;
use crate::id::{ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId};
use crate::message::{Embed, Reply};

/// The two-way messaging API of the chat platform.
///
/// Implementations wrap the platform session client. Calls may block on
/// network I/O; the core never invokes them while holding a lock.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends a plain-text message and returns its id.
    async fn send_message(&self, channel: &ChannelId, content: &str) -> ApiResult<MessageId>;

    /// Sends a rich embed message and returns its id.
    async fn send_embed(&self, channel: &ChannelId, embed: &Embed) -> ApiResult<MessageId>;

    /// Replaces the content of a previously sent message.
    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> ApiResult<()>;

    /// Adds a reaction emoji to a message.
    async fn add_reaction(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        emoji: &str,
    ) -> ApiResult<()>;

    /// Responds to an interaction; the reply may be ephemeral.
    async fn respond(&self, interaction: &InteractionId, reply: &Reply) -> ApiResult<()>;

    /// Grants a role to a guild member.
    async fn add_member_role(
        &self,
        guild: &GuildId,
        user: &UserId,
        role: &RoleId,
    ) -> ApiResult<()>;

    /// Revokes a role from a guild member.
    async fn remove_member_role(
        &self,
        guild: &GuildId,
        user: &UserId,
        role: &RoleId,
    ) -> ApiResult<()>;

    /// Sets the bot's presence/activity text.
    async fn set_presence(&self, activity: &str) -> ApiResult<()>;
}

/// The platform's structured-command catalog.
#[async_trait]
pub trait CommandCatalog: Send + Sync {
    /// Creates (or overwrites) a command definition in the given scope.
    async fn create_command(&self, scope: &CommandScope, decl: &CommandDecl) -> ApiResult<()>;

    /// Deletes every command definition the application owns in the given
    /// guild scope. Implementations are never asked to delete global
    /// definitions.
    async fn delete_commands(&self, scope: &CommandScope) -> ApiResult<()>;
}

/// Answers "which capabilities does this actor hold in this channel".
///
/// How capabilities are represented on the wire is the adapter's business;
/// the core only ever performs subset checks on the returned bit-set.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn effective_permissions(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> ApiResult<Capabilities>;
}
