//! Capability bitmask for permission checks.
//!
//! Commands declare the capabilities they require as a bit-set; the dispatcher
//! checks them as a *subset* relation against the invoking actor's effective
//! permissions (queried through the [`PermissionOracle`] port). The values are
//! Herald's own; adapters translate to and from whatever encoding the wire
//! protocol uses.
//!
//! [`PermissionOracle`]: crate::port::PermissionOracle

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// A set of capabilities encoded as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(u64);

impl Capabilities {
    /// The empty set; commands requiring this skip the permission check.
    pub const NONE: Self = Self(0);

    /// Send messages to a text channel.
    pub const SEND_MESSAGES: Self = Self(1 << 0);
    /// Add reactions to messages.
    pub const ADD_REACTIONS: Self = Self(1 << 1);
    /// Delete or pin other users' messages.
    pub const MANAGE_MESSAGES: Self = Self(1 << 2);
    /// Join a voice channel.
    pub const CONNECT: Self = Self(1 << 3);
    /// Transmit audio in a voice channel.
    pub const SPEAK: Self = Self(1 << 4);
    /// Grant and revoke guild roles.
    pub const MANAGE_ROLES: Self = Self(1 << 5);
    /// Change guild-wide settings.
    pub const MANAGE_GUILD: Self = Self(1 << 6);
    /// Implies every other capability.
    pub const ADMINISTRATOR: Self = Self(1 << 7);

    /// Creates a set from raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns true if no capability bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `required` is present in `self`.
    ///
    /// This is a subset check, not an intersection check: an actor holding
    /// only one of two required capabilities does not pass.
    pub const fn contains(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Capabilities {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
