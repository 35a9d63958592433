//! Platform identifier newtypes.
//!
//! Chat platforms hand out opaque snowflake strings for every entity. Wrapping
//! them keeps guild/channel/user/role ids from being mixed up at call sites
//! while staying cheap to construct from inbound payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the raw id string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

snowflake_id! {
    /// Identifier of a guild (an isolated community/server context).
    GuildId
}

snowflake_id! {
    /// Identifier of a text or voice channel within a guild.
    ChannelId
}

snowflake_id! {
    /// Identifier of a platform user.
    UserId
}

snowflake_id! {
    /// Identifier of a sent message.
    MessageId
}

snowflake_id! {
    /// Identifier of a guild role.
    RoleId
}

snowflake_id! {
    /// Identifier of an in-flight interaction awaiting a response.
    InteractionId
}
