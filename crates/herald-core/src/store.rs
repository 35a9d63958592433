//! Concurrent-safe cache of per-guild state snapshots.
//!
//! The store owns its data exclusively: every read hands back a defensive
//! copy, never a reference into the live map, so callers can iterate freely
//! while event handlers keep mutating the cache. Writers take the exclusive
//! side of the lock; concurrent readers share it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::id::{ChannelId, GuildId, UserId};

/// Kind of a guild channel, as far as the core cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    Other,
}

/// A channel entry inside a guild snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
}

/// A point-in-time view of one guild.
///
/// Created from a guild-joined event and replaced wholesale on the next one;
/// removed when the guild is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub id: GuildId,
    pub name: String,
    pub member_count: u64,
    pub channels: Vec<ChannelInfo>,
    /// Which voice channel each currently-connected member occupies.
    pub voice_states: HashMap<UserId, ChannelId>,
}

impl GuildSnapshot {
    /// Returns the voice channel the given member currently occupies, if any.
    pub fn voice_channel_of(&self, user: &UserId) -> Option<&ChannelId> {
        self.voice_states.get(user)
    }

    /// Returns the first channel of the given kind, in snapshot order.
    pub fn first_channel_of(&self, kind: ChannelKind) -> Option<&ChannelInfo> {
        self.channels.iter().find(|c| c.kind == kind)
    }
}

/// Concurrent cache mapping guild ids to their latest snapshots.
///
/// Cloning the store is cheap and yields a handle to the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct GuildStateStore {
    guilds: Arc<RwLock<HashMap<GuildId, GuildSnapshot>>>,
}

impl GuildStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the snapshot for a guild.
    pub fn upsert(&self, snapshot: GuildSnapshot) {
        self.guilds.write().insert(snapshot.id.clone(), snapshot);
    }

    /// Removes a guild's snapshot. Removing an absent guild is a no-op.
    pub fn remove(&self, id: &GuildId) {
        self.guilds.write().remove(id);
    }

    /// Returns a copy of the snapshot for a guild, if present.
    pub fn get(&self, id: &GuildId) -> Option<GuildSnapshot> {
        self.guilds.read().get(id).cloned()
    }

    /// Returns a copy of the full mapping.
    pub fn all(&self) -> HashMap<GuildId, GuildSnapshot> {
        self.guilds.read().clone()
    }

    /// Number of cached guilds.
    pub fn len(&self) -> usize {
        self.guilds.read().len()
    }

    /// Returns true if no guilds are cached.
    pub fn is_empty(&self) -> bool {
        self.guilds.read().is_empty()
    }

    /// Sum of member counts across all cached guilds.
    pub fn member_total(&self) -> u64 {
        self.guilds.read().values().map(|g| g.member_count).sum()
    }
}
