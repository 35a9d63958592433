//! Structured-command declaration schema.
//!
//! These declarations are what the service pushes to the platform's command
//! catalog at startup; the platform validates invocations against them before
//! the handler ever runs.

use serde::{Deserialize, Serialize};

use crate::id::GuildId;

/// Where a command definition lives in the platform catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandScope {
    /// Visible in every guild. Global definitions are not torn down on
    /// shutdown.
    Global,
    /// Visible only in one guild; used in development mode for fast
    /// iteration, and deleted wholesale on shutdown.
    Guild(GuildId),
}

/// The type of a declared command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    SubCommand,
    String,
    Integer,
    Boolean,
    User,
    Role,
    Channel,
}

/// A declared option of a structured command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Nested options; only meaningful for sub-commands.
    pub options: Vec<OptionDecl>,
}

impl OptionDecl {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }
}

/// A structured command definition as pushed to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDecl {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionDecl>,
}

impl CommandDecl {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }
}
