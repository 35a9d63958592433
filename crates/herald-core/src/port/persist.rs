//! Persistence port for audit logging and periodic stats.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::id::{ChannelId, GuildId, UserId};

/// JSON argument map attached to audit-log entries.
///
/// The dispatcher produces this in a fixed shape (`arg1..argN` for prefix
/// commands; flattened options with a reserved `subcommand` key for
/// structured ones) that downstream consumers depend on.
pub type ArgumentMap = serde_json::Map<String, Value>;

/// Which invocation surface a command came in on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Prefix,
    Slash,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Prefix => "prefix",
            CommandKind::Slash => "slash",
        }
    }
}

/// Write-side persistence consumed by the core.
///
/// All three operations are best-effort from the core's point of view:
/// failures are logged and never surfaced to the invoking actor. Any
/// aggregate counters an implementation maintains alongside the audit log
/// (e.g. a running commands-count) are eventually consistent, not
/// exactly-once; the core does not require the two writes to be atomic.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Records one command invocation.
    async fn log_command(
        &self,
        guild: Option<&GuildId>,
        channel: &ChannelId,
        user: &UserId,
        name: &str,
        kind: CommandKind,
        args: &ArgumentMap,
    ) -> Result<(), StoreError>;

    /// Records one component interaction (button, select menu).
    async fn log_interaction(
        &self,
        guild: Option<&GuildId>,
        channel: &ChannelId,
        user: &UserId,
        kind: &str,
        component_id: &str,
        data: &ArgumentMap,
    ) -> Result<(), StoreError>;

    /// Persists the periodic service stats snapshot.
    async fn update_stats(
        &self,
        guild_count: u64,
        user_count: u64,
        uptime_seconds: u64,
    ) -> Result<(), StoreError>;
}
