use herald_core::{ApiError, VoiceError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that prevent the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to register structured command '{name}': {source}")]
    CommandRegistration { name: String, source: ApiError },
}

/// Errors surfaced by command handlers.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

pub type CommandResult = Result<(), CommandError>;
