//! Outbound message model.
//!
//! Platform-agnostic shapes for the two content forms the service sends:
//! plain text and rich embeds, plus the reply wrapper that carries the
//! ephemeral flag for interaction responses.

use std::time::SystemTime;

/// A field inside a rich embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A rich embed message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
    pub timestamp: Option<SystemTime>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn timestamp(mut self, at: SystemTime) -> Self {
        self.timestamp = Some(at);
        self
    }
}

/// Content of an outbound reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyContent {
    Text(String),
    Embed(Embed),
}

/// A response to an interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: ReplyContent,
    /// Visible only to the invoking actor when set.
    pub ephemeral: bool,
}

impl Reply {
    /// A plain-text reply visible to the whole channel.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: ReplyContent::Text(content.into()),
            ephemeral: false,
        }
    }

    /// An embed reply visible to the whole channel.
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: ReplyContent::Embed(embed),
            ephemeral: false,
        }
    }

    /// Marks this reply as visible only to the invoking actor.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}
