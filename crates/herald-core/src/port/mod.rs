//! Collaborator ports.
//!
//! The core never talks to a chat platform or a database directly. Everything
//! side-effecting goes through these trait objects, supplied by the embedding
//! program: the messaging API, the command catalog, the permission oracle,
//! the voice transport, and the persistence store.

mod chat;
mod persist;
mod voice;

pub use chat::{ChatApi, CommandCatalog, PermissionOracle};
pub use persist::{ArgumentMap, CommandKind, EventStore};
pub use voice::{VoiceSession, VoiceTransport};
