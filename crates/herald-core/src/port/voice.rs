//! Voice transport port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::id::{ChannelId, GuildId};

/// Establishes voice connections.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Joins a voice channel and returns a handle to the live session.
    async fn join(&self, guild: &GuildId, channel: &ChannelId)
    -> ApiResult<Arc<dyn VoiceSession>>;
}

/// A live voice session for one guild.
///
/// The session is the opaque transport handle of a voice connection record;
/// the core drives it from the playback loop and never assumes anything about
/// the encoding of the chunks it forwards.
#[async_trait]
pub trait VoiceSession: Send + Sync {
    /// Marks the session as actively sending audio (or not).
    async fn set_speaking(&self, speaking: bool) -> ApiResult<()>;

    /// Forwards one already-encoded audio chunk to the outbound sink.
    async fn send_audio(&self, chunk: &[u8]) -> ApiResult<()>;

    /// Tears the session down.
    async fn disconnect(&self) -> ApiResult<()>;
}
