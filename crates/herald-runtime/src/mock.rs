//! In-memory port implementations backing the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use herald_core::{
    ApiError, ApiResult, ArgumentMap, Capabilities, ChannelId, ChannelInfo, ChannelKind, ChatApi,
    CommandCatalog, CommandDecl, CommandKind, CommandScope, Embed, EventStore, GuildId,
    GuildSnapshot, InteractionId, MessageId, PermissionOracle, Reply, ReplyContent, RoleId,
    StoreError, UserId, VoiceSession, VoiceTransport,
};
use parking_lot::Mutex;

use crate::config::HeraldConfig;
use crate::context::{Context, Ports};
use crate::registry::CommandRegistry;

/// A guild snapshot with one text channel and no voice states.
pub fn snapshot(id: &str, members: u64) -> GuildSnapshot {
    GuildSnapshot {
        id: GuildId::new(id),
        name: format!("guild-{id}"),
        member_count: members,
        channels: vec![ChannelInfo {
            id: ChannelId::new("c1"),
            name: "general".to_string(),
            kind: ChannelKind::Text,
        }],
        voice_states: HashMap::new(),
    }
}

/// A cloneable boolean probe for observing whether a handler ran.
#[derive(Clone, Default)]
pub struct Flag(Arc<AtomicBool>);

pub fn flag() -> Flag {
    Flag::default()
}

impl Flag {
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn reply_text(reply: &Reply) -> String {
    match &reply.content {
        ReplyContent::Text(text) => text.clone(),
        ReplyContent::Embed(embed) => embed.title.clone().unwrap_or_default(),
    }
}

#[derive(Default)]
pub struct MockChat {
    counter: AtomicUsize,
    sent: Mutex<Vec<(ChannelId, String)>>,
    embeds: Mutex<Vec<(ChannelId, Embed)>>,
    edits: Mutex<Vec<(MessageId, String)>>,
    reactions: Mutex<Vec<(String, String, String)>>,
    responses: Mutex<Vec<(InteractionId, Reply)>>,
    role_changes: Mutex<Vec<(String, String)>>,
    presences: Mutex<Vec<String>>,
}

impl MockChat {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(channel, content)` pairs for every plain message sent.
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .iter()
            .map(|(channel, content)| (channel.to_string(), content.clone()))
            .collect()
    }

    pub fn sent_embeds(&self) -> Vec<Embed> {
        self.embeds.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn sent_embeds_with_channels(&self) -> Vec<(ChannelId, Embed)> {
        self.embeds.lock().clone()
    }

    /// `(message, new content)` pairs for every edit.
    pub fn edits(&self) -> Vec<(String, String)> {
        self.edits
            .lock()
            .iter()
            .map(|(message, content)| (message.to_string(), content.clone()))
            .collect()
    }

    /// `(channel, message, emoji)` triples for every reaction added.
    pub fn reactions(&self) -> Vec<(String, String, String)> {
        self.reactions.lock().clone()
    }

    /// `(interaction, text, ephemeral)` triples for every interaction
    /// response; embed replies are rendered as their title.
    pub fn responses(&self) -> Vec<(String, String, bool)> {
        self.responses
            .lock()
            .iter()
            .map(|(id, reply)| (id.to_string(), reply_text(reply), reply.ephemeral))
            .collect()
    }

    /// `("add"|"remove", "guild/user/role")` pairs for role mutations.
    pub fn role_changes(&self) -> Vec<(String, String)> {
        self.role_changes.lock().clone()
    }

    pub fn presences(&self) -> Vec<String> {
        self.presences.lock().clone()
    }
}

#[async_trait]
impl ChatApi for MockChat {
    async fn send_message(&self, channel: &ChannelId, content: &str) -> ApiResult<MessageId> {
        self.sent.lock().push((channel.clone(), content.to_string()));
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MessageId::new(format!("sent-{n}")))
    }

    async fn send_embed(&self, channel: &ChannelId, embed: &Embed) -> ApiResult<MessageId> {
        self.embeds.lock().push((channel.clone(), embed.clone()));
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MessageId::new(format!("sent-{n}")))
    }

    async fn edit_message(
        &self,
        _channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> ApiResult<()> {
        self.edits.lock().push((message.clone(), content.to_string()));
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        emoji: &str,
    ) -> ApiResult<()> {
        self.reactions
            .lock()
            .push((channel.to_string(), message.to_string(), emoji.to_string()));
        Ok(())
    }

    async fn respond(&self, interaction: &InteractionId, reply: &Reply) -> ApiResult<()> {
        self.responses.lock().push((interaction.clone(), reply.clone()));
        Ok(())
    }

    async fn add_member_role(
        &self,
        guild: &GuildId,
        user: &UserId,
        role: &RoleId,
    ) -> ApiResult<()> {
        self.role_changes
            .lock()
            .push(("add".to_string(), format!("{guild}/{user}/{role}")));
        Ok(())
    }

    async fn remove_member_role(
        &self,
        guild: &GuildId,
        user: &UserId,
        role: &RoleId,
    ) -> ApiResult<()> {
        self.role_changes
            .lock()
            .push(("remove".to_string(), format!("{guild}/{user}/{role}")));
        Ok(())
    }

    async fn set_presence(&self, activity: &str) -> ApiResult<()> {
        self.presences.lock().push(activity.to_string());
        Ok(())
    }
}

/// Grants nothing unless told otherwise.
#[derive(Default)]
pub struct MockOracle {
    grants: Mutex<HashMap<UserId, Capabilities>>,
    channel_grants: Mutex<HashMap<(UserId, ChannelId), Capabilities>>,
    fail_next: AtomicBool,
}

impl MockOracle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Grants capabilities to a user in every channel.
    pub fn grant(&self, user: UserId, capabilities: Capabilities) {
        self.grants.lock().insert(user, capabilities);
    }

    /// Grants capabilities to a user in one channel only, overriding any
    /// blanket grant there.
    pub fn grant_in_channel(&self, user: UserId, channel: ChannelId, capabilities: Capabilities) {
        self.channel_grants.lock().insert((user, channel), capabilities);
    }

    /// Makes the next query fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PermissionOracle for MockOracle {
    async fn effective_permissions(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> ApiResult<Capabilities> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Other("injected oracle failure".to_string()));
        }
        if let Some(held) = self
            .channel_grants
            .lock()
            .get(&(user.clone(), channel.clone()))
        {
            return Ok(*held);
        }
        Ok(self
            .grants
            .lock()
            .get(user)
            .copied()
            .unwrap_or(Capabilities::NONE))
    }
}

#[derive(Default)]
pub struct MockCatalog {
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<CommandScope>>,
    fail: AtomicBool,
}

impl MockCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let catalog = Self::new();
        catalog.fail_all();
        catalog
    }

    /// Makes every subsequent call fail.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }

    pub fn deleted_scopes(&self) -> Vec<CommandScope> {
        self.deleted.lock().clone()
    }
}

#[async_trait]
impl CommandCatalog for MockCatalog {
    async fn create_command(&self, _scope: &CommandScope, decl: &CommandDecl) -> ApiResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Other("injected catalog failure".to_string()));
        }
        self.created.lock().push(decl.name.clone());
        Ok(())
    }

    async fn delete_commands(&self, scope: &CommandScope) -> ApiResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Other("injected catalog failure".to_string()));
        }
        self.deleted.lock().push(scope.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoggedCommand {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub user: UserId,
    pub name: String,
    pub kind: CommandKind,
    pub args: ArgumentMap,
}

#[derive(Debug, Clone)]
pub struct LoggedInteraction {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub user: UserId,
    pub kind: String,
    pub component_id: String,
    pub data: ArgumentMap,
}

#[derive(Default)]
pub struct MockEventStore {
    commands: Mutex<Vec<LoggedCommand>>,
    interactions: Mutex<Vec<LoggedInteraction>>,
    stats: Mutex<Vec<(u64, u64, u64)>>,
    fail_next: AtomicBool,
}

impl MockEventStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes the next write fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<LoggedCommand> {
        self.commands.lock().clone()
    }

    pub fn interactions(&self) -> Vec<LoggedInteraction> {
        self.interactions.lock().clone()
    }

    /// `(guild_count, user_count, uptime_seconds)` snapshots.
    pub fn stats(&self) -> Vec<(u64, u64, u64)> {
        self.stats.lock().clone()
    }

    fn check_fail(&self) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::new("injected store failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn log_command(
        &self,
        guild: Option<&GuildId>,
        channel: &ChannelId,
        user: &UserId,
        name: &str,
        kind: CommandKind,
        args: &ArgumentMap,
    ) -> Result<(), StoreError> {
        self.check_fail()?;
        self.commands.lock().push(LoggedCommand {
            guild_id: guild.cloned(),
            channel_id: channel.clone(),
            user: user.clone(),
            name: name.to_string(),
            kind,
            args: args.clone(),
        });
        Ok(())
    }

    async fn log_interaction(
        &self,
        guild: Option<&GuildId>,
        channel: &ChannelId,
        user: &UserId,
        kind: &str,
        component_id: &str,
        data: &ArgumentMap,
    ) -> Result<(), StoreError> {
        self.check_fail()?;
        self.interactions.lock().push(LoggedInteraction {
            guild_id: guild.cloned(),
            channel_id: channel.clone(),
            user: user.clone(),
            kind: kind.to_string(),
            component_id: component_id.to_string(),
            data: data.clone(),
        });
        Ok(())
    }

    async fn update_stats(
        &self,
        guild_count: u64,
        user_count: u64,
        uptime_seconds: u64,
    ) -> Result<(), StoreError> {
        self.check_fail()?;
        self.stats
            .lock()
            .push((guild_count, user_count, uptime_seconds));
        Ok(())
    }
}

/// Voice transport whose sessions share one ordering log, so tests can
/// assert the relative order of joins and disconnects.
pub struct MockTransport {
    log: Arc<Mutex<Vec<String>>>,
    sessions: Mutex<HashMap<GuildId, Arc<MockSession>>>,
    joins: AtomicUsize,
    fail_join: AtomicBool,
    fail_disconnect: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(Vec::new())),
            sessions: Mutex::new(HashMap::new()),
            joins: AtomicUsize::new(0),
            fail_join: AtomicBool::new(false),
            fail_disconnect: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn join_count(&self) -> usize {
        self.joins.load(Ordering::SeqCst)
    }

    /// `"join g/c"` and `"disconnect g/c"` entries in call order.
    pub fn ordering(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// The most recent session created for a guild.
    pub fn session(&self, guild: &GuildId) -> Option<Arc<MockSession>> {
        self.sessions.lock().get(guild).cloned()
    }

    pub fn fail_next_join(&self) {
        self.fail_join.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_disconnect(&self) {
        self.fail_disconnect.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VoiceTransport for MockTransport {
    async fn join(
        &self,
        guild: &GuildId,
        channel: &ChannelId,
    ) -> ApiResult<Arc<dyn VoiceSession>> {
        if self.fail_join.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Transport("injected join failure".to_string()));
        }
        self.joins.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(format!("join {guild}/{channel}"));
        let session = Arc::new(MockSession {
            guild: guild.clone(),
            channel: channel.clone(),
            log: self.log.clone(),
            chunks: Mutex::new(Vec::new()),
            speaking: Mutex::new(Vec::new()),
            fail_speaking: AtomicBool::new(false),
            fail_disconnect: self.fail_disconnect.clone(),
        });
        self.sessions.lock().insert(guild.clone(), session.clone());
        Ok(session)
    }
}

pub struct MockSession {
    guild: GuildId,
    channel: ChannelId,
    log: Arc<Mutex<Vec<String>>>,
    chunks: Mutex<Vec<usize>>,
    speaking: Mutex<Vec<bool>>,
    fail_speaking: AtomicBool,
    fail_disconnect: Arc<AtomicBool>,
}

impl MockSession {
    /// Byte sizes of every audio chunk forwarded.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunks.lock().clone()
    }

    pub fn speaking_calls(&self) -> Vec<bool> {
        self.speaking.lock().clone()
    }

    pub fn fail_next_speaking(&self) {
        self.fail_speaking.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VoiceSession for MockSession {
    async fn set_speaking(&self, speaking: bool) -> ApiResult<()> {
        if self.fail_speaking.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Transport("injected speaking failure".to_string()));
        }
        self.speaking.lock().push(speaking);
        Ok(())
    }

    async fn send_audio(&self, chunk: &[u8]) -> ApiResult<()> {
        self.chunks.lock().push(chunk.len());
        Ok(())
    }

    async fn disconnect(&self) -> ApiResult<()> {
        if self.fail_disconnect.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Transport(
                "injected disconnect failure".to_string(),
            ));
        }
        self.log
            .lock()
            .push(format!("disconnect {}/{}", self.guild, self.channel));
        Ok(())
    }
}

/// Wires every mock port into a ready-to-use [`Context`].
pub struct TestHarness {
    pub chat: Arc<MockChat>,
    pub oracle: Arc<MockOracle>,
    pub catalog: Arc<MockCatalog>,
    pub events: Arc<MockEventStore>,
    pub transport: Arc<MockTransport>,
    ctx: Arc<Context>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_registry(|_| {})
    }

    pub fn with_registry(build: impl FnOnce(&mut CommandRegistry)) -> Self {
        let chat = MockChat::new();
        let oracle = MockOracle::new();
        let catalog = MockCatalog::new();
        let events = MockEventStore::new();
        let transport = MockTransport::new();

        let mut registry = CommandRegistry::new();
        build(&mut registry);

        let config = HeraldConfig {
            token: "test-token".to_string(),
            ..HeraldConfig::default()
        };
        let ports = Ports {
            chat: chat.clone(),
            permissions: oracle.clone(),
            catalog: catalog.clone(),
            events: events.clone(),
            voice: transport.clone(),
        };
        let ctx = Arc::new(Context::new(config, ports, Arc::new(registry)));

        Self {
            chat,
            oracle,
            catalog,
            events,
            transport,
            ctx,
        }
    }

    pub fn context(&self) -> Arc<Context> {
        self.ctx.clone()
    }

    /// A fresh set of port handles over the same mocks.
    pub fn ports(&self) -> Ports {
        Ports {
            chat: self.chat.clone(),
            permissions: self.oracle.clone(),
            catalog: self.catalog.clone(),
            events: self.events.clone(),
            voice: self.transport.clone(),
        }
    }
}
