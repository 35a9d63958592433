//! Runtime layer of the Herald bot service.
//!
//! Assembles the pieces from `herald-core` into a running service: config
//! loading, the built-in command set, command dispatch, gateway event
//! routing, per-guild voice lifecycle, and the periodic stats aggregator.
//! Platform adapters implement the core's port traits and feed gateway
//! events into [`Herald::run`].

pub mod commands;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod registry;
pub mod router;
pub mod service;
pub mod stats;
pub mod voice;

#[cfg(test)]
pub(crate) mod mock;

pub use config::{ConfigError, HeraldConfig, LogOutput, LoggingConfig};
pub use context::{Context, Ports};
pub use dispatcher::CommandDispatcher;
pub use error::{CommandError, CommandResult, StartupError};
pub use registry::{
    prefix_handler, slash_handler, CommandRegistry, PrefixCommand, SlashCommand, SlashRequest,
};
pub use router::EventRouter;
pub use service::Herald;
pub use stats::StatsHandle;
pub use voice::{VoiceConnection, VoiceManager, AUDIO_CHUNK_SIZE};
