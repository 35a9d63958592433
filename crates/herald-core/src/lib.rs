//! # Herald Core
//!
//! Platform-agnostic foundation of the Herald bot service.
//!
//! This crate defines everything the runtime shares with adapter
//! implementations without taking a side on the wire protocol:
//!
//! - **Identifiers**: snowflake-string newtypes ([`GuildId`], [`ChannelId`],
//!   [`UserId`], ...)
//! - **Gateway events**: the closed inbound event set ([`GatewayEvent`])
//! - **Capabilities**: the permission bit-set checked as a subset relation
//!   ([`Capabilities`])
//! - **Ports**: the collaborator traits the core calls through
//!   ([`ChatApi`], [`CommandCatalog`], [`PermissionOracle`],
//!   [`VoiceTransport`], [`EventStore`])
//! - **Guild state**: the concurrent, copy-returning snapshot cache
//!   ([`GuildStateStore`])
//!
//! The wire-level gateway client, SQL persistence, and configuration sources
//! are external collaborators; embedders implement the port traits and feed
//! [`GatewayEvent`]s to the runtime.

pub mod capability;
pub mod command;
pub mod error;
pub mod event;
pub mod id;
pub mod message;
pub mod port;
pub mod store;

pub use capability::Capabilities;
pub use command::{CommandDecl, CommandScope, OptionDecl, OptionKind};
pub use error::{ApiError, ApiResult, StoreError, VoiceError};
pub use event::{
    CommandInvocation, CommandOption, GatewayEvent, InteractionEvent, InteractionKind,
    MessageEvent, OptionValue, ReadyEvent,
};
pub use id::{ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId};
pub use message::{Embed, EmbedField, Reply, ReplyContent};
pub use port::{
    ArgumentMap, ChatApi, CommandCatalog, CommandKind, EventStore, PermissionOracle, VoiceSession,
    VoiceTransport,
};
pub use store::{ChannelInfo, ChannelKind, GuildSnapshot, GuildStateStore};
