//! Service configuration.
//!
//! Values are layered: built-in defaults, then an optional `herald.toml`
//! in the working directory, then `HERALD_`-prefixed environment
//! variables (nested keys separated by `__`).

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use herald_core::{CommandScope, GuildId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "herald.toml";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("configuration field '{0}' must not be empty")]
    Empty(&'static str),
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeraldConfig {
    /// Authentication token for the chat platform.
    pub token: String,
    /// Leading marker for text commands, stripped before dispatch.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// When set, structured commands are registered per-guild for fast
    /// iteration instead of globally.
    #[serde(default)]
    pub dev_mode: bool,
    /// Guild that receives scoped registrations in dev mode.
    #[serde(default)]
    pub dev_guild: Option<GuildId>,
    /// Interval between stats snapshots written to the event store.
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub output: LogOutput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LogOutput {
    #[default]
    Stdout,
    File {
        directory: PathBuf,
        prefix: String,
    },
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_stats_interval() -> u64 {
    60
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            output: LogOutput::default(),
        }
    }
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: default_prefix(),
            dev_mode: false,
            dev_guild: None,
            stats_interval_secs: default_stats_interval(),
            logging: LoggingConfig::default(),
        }
    }
}

impl HeraldConfig {
    /// Loads configuration from the default file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("HERALD_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Empty("token"));
        }
        if self.command_prefix.is_empty() {
            return Err(ConfigError::Empty("command_prefix"));
        }
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidLevel(self.logging.level.clone()));
        }
        Ok(())
    }

    /// Scope for structured command registration. Dev mode without a
    /// configured guild falls back to global registration.
    pub fn command_scope(&self) -> CommandScope {
        if self.dev_mode {
            match &self.dev_guild {
                Some(guild) => return CommandScope::Guild(guild.clone()),
                None => warn!("dev_mode is set without dev_guild, registering globally"),
            }
        }
        CommandScope::Global
    }
}
