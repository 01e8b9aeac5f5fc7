//! Result types for extraction output.
//!
//! This module defines the structured transcript produced by extraction:
//! the ordered messages, the platform they came from, and the counts the
//! format renderers and export response report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the chat.
    User,
    /// The AI model.
    Assistant,
    /// Could not be determined.
    Unknown,
}

impl Role {
    /// Lowercase identifier, also used as the HTML class of a message.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Unknown => "unknown",
        }
    }

    /// Parse an author-role attribute value. Unrecognised values yield `None`.
    #[must_use]
    pub fn from_author_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" | "human" => Some(Self::User),
            "assistant" | "ai" | "bot" => Some(Self::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a message block was found in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    /// Tag name of the block element.
    pub tag: String,

    /// A stable handle for the element if it has one: `id`, `data-testid`,
    /// or the author-role attribute.
    pub anchor: Option<String>,

    /// The strategy (selector or scan) that discovered the block.
    pub strategy: String,
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Author of the turn.
    pub role: Role,

    /// Markdown content.
    pub content: String,

    /// Zero-based position in discovery order. Dropped (empty) blocks leave
    /// gaps; indices are never renumbered.
    pub index: usize,

    /// Reference back to the source block.
    pub block: BlockRef,
}

/// Per-role and image counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Messages classified as user turns.
    pub user_count: usize,
    /// Messages classified as assistant turns.
    pub assistant_count: usize,
    /// Distinct images emitted during the run.
    pub image_count: usize,
}

/// An image emitted into a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// The `src` attribute exactly as found in the page.
    pub source_url: String,
    /// Identifier derived from the URL.
    pub id: String,
    /// Alt text, or the profile's default.
    pub alt: String,
}

/// Result of extracting one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Messages in discovery order.
    pub messages: Vec<Message>,

    /// Platform the page belongs to.
    pub platform: Platform,

    /// Model label: `Claude 3.5`, `Claude Opus`, `Claude`, or `ChatGPT`.
    pub version_label: String,

    /// Page `<title>`, if present.
    pub title: Option<String>,

    /// Role and image counts.
    pub stats: Stats,

    /// Images in the order they were emitted.
    pub images: Vec<ImageRecord>,

    /// Non-fatal findings, such as a one-sided conversation.
    pub warnings: Vec<String>,
}

impl Transcript {
    /// Heading used for messages of `role`.
    #[must_use]
    pub fn role_label(&self, role: Role) -> &str {
        match role {
            Role::User => self.platform.user_label(),
            Role::Assistant => &self.version_label,
            Role::Unknown => "Unknown",
        }
    }

    /// Document heading for rendered output.
    #[must_use]
    pub fn heading(&self) -> String {
        match self.platform {
            Platform::Claude => format!("{} Conversation", self.version_label),
            Platform::ChatGpt | Platform::Gemini => "AI Chat Conversation".to_string(),
        }
    }
}
