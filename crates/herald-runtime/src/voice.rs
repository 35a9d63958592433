//! Per-guild voice connection lifecycle and playback.
//!
//! One guild holds at most one connection. The manager map is guarded by an
//! async mutex held across transport calls, so concurrent join and leave
//! requests for the same guild serialize instead of racing: a join into a
//! new channel always disconnects the old session before the new transport
//! join begins.

use std::collections::HashMap;
use std::sync::Arc;

use herald_core::{ApiResult, ChannelId, GuildId, VoiceError, VoiceSession, VoiceTransport};
use parking_lot::Mutex as SyncMutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Size of one outbound audio chunk in bytes.
pub const AUDIO_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Clone)]
pub struct VoiceManager {
    transport: Arc<dyn VoiceTransport>,
    connections: Arc<Mutex<HashMap<GuildId, Arc<VoiceConnection>>>>,
}

impl VoiceManager {
    pub fn new(transport: Arc<dyn VoiceTransport>) -> Self {
        Self {
            transport,
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Connects the guild to the given channel and returns the connection.
    ///
    /// Joining the channel the guild is already connected to is idempotent.
    /// Joining a different channel stops playback and disconnects the old
    /// session first; if the new transport join then fails, the guild is
    /// left with no connection at all.
    pub async fn join(
        &self,
        guild: &GuildId,
        channel: &ChannelId,
    ) -> Result<Arc<VoiceConnection>, VoiceError> {
        let mut connections = self.connections.lock().await;

        if let Some(existing) = connections.get(guild) {
            if existing.channel_id == *channel {
                debug!(guild = %guild, channel = %channel, "already connected to requested channel");
                return Ok(existing.clone());
            }
        }
        if let Some(old) = connections.remove(guild) {
            old.stop();
            if let Err(error) = old.disconnect().await {
                warn!(guild = %guild, %error, "failed to disconnect old voice session");
            }
        }

        let session = self.transport.join(guild, channel).await?;
        let connection = Arc::new(VoiceConnection::new(guild.clone(), channel.clone(), session));
        connections.insert(guild.clone(), connection.clone());
        info!(guild = %guild, channel = %channel, "joined voice channel");
        Ok(connection)
    }

    /// Disconnects the guild's voice session.
    ///
    /// On transport failure the entry stays in the map so a later leave can
    /// retry the teardown.
    pub async fn leave(&self, guild: &GuildId) -> Result<(), VoiceError> {
        let mut connections = self.connections.lock().await;
        let connection = connections.get(guild).ok_or(VoiceError::NotConnected)?;
        connection.stop();
        connection.disconnect().await?;
        connections.remove(guild);
        info!(guild = %guild, "left voice channel");
        Ok(())
    }

    pub async fn connection(&self, guild: &GuildId) -> Option<Arc<VoiceConnection>> {
        self.connections.lock().await.get(guild).cloned()
    }

    pub async fn is_connected(&self, guild: &GuildId) -> bool {
        self.connections.lock().await.contains_key(guild)
    }
}

struct PlaybackState {
    playing: bool,
    stop: CancellationToken,
}

/// A live connection to one guild's voice channel.
pub struct VoiceConnection {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    session: Arc<dyn VoiceSession>,
    state: SyncMutex<PlaybackState>,
}

impl VoiceConnection {
    fn new(guild_id: GuildId, channel_id: ChannelId, session: Arc<dyn VoiceSession>) -> Self {
        Self {
            guild_id,
            channel_id,
            session,
            state: SyncMutex::new(PlaybackState {
                playing: false,
                stop: CancellationToken::new(),
            }),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    /// Requests that the running playback loop wind down. Returns
    /// immediately; the loop observes the request at its next chunk
    /// boundary.
    pub fn stop(&self) {
        self.state.lock().stop.cancel();
    }

    /// Streams audio from `source` to the session in fixed-size chunks
    /// until the source is exhausted or a stop is requested.
    ///
    /// Only one playback may run per connection; a second call while one is
    /// active fails with [`VoiceError::AlreadyPlaying`] without disturbing
    /// the running loop.
    pub async fn play<R>(&self, mut source: R) -> Result<(), VoiceError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let stop = {
            let mut state = self.state.lock();
            if state.playing {
                return Err(VoiceError::AlreadyPlaying);
            }
            state.playing = true;
            state.stop = CancellationToken::new();
            state.stop.clone()
        };

        if let Err(error) = self.session.set_speaking(true).await {
            self.state.lock().playing = false;
            return Err(error.into());
        }

        let mut chunk = vec![0u8; AUDIO_CHUNK_SIZE];
        loop {
            if stop.is_cancelled() {
                debug!(guild = %self.guild_id, "playback stop requested");
                break;
            }
            match source.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    if let Err(error) = self.session.send_audio(&chunk[..n]).await {
                        warn!(guild = %self.guild_id, %error, "failed to send audio chunk");
                        break;
                    }
                }
                Err(error) => {
                    warn!(guild = %self.guild_id, %error, "failed to read audio source");
                    break;
                }
            }
        }

        self.finish_playback().await;
        Ok(())
    }

    /// Resets playback state after the loop exits, on every path.
    async fn finish_playback(&self) {
        if let Err(error) = self.session.set_speaking(false).await {
            warn!(guild = %self.guild_id, %error, "failed to clear speaking state");
        }
        let mut state = self.state.lock();
        state.playing = false;
        state.stop = CancellationToken::new();
    }

    async fn disconnect(&self) -> ApiResult<()> {
        self.session.disconnect().await
    }
}
