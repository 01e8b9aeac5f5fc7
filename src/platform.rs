//! Platform detection and per-platform presentation details.
//!
//! Detection looks at the page URL first and falls back to marker elements
//! in the DOM, so that saved snapshots without a URL still resolve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::DomNode;
use crate::error::Error;

/// A supported (or recognised) AI chat front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// chatgpt.com / chat.openai.com
    ChatGpt,
    /// claude.ai
    Claude,
    /// gemini.google.com (recognised, no extraction profile yet)
    Gemini,
}

/// DOM markers that identify a Claude page.
const CLAUDE_MARKERS: &[&str] = &[r#"[data-theme="claude"]"#, ".font-claude-message"];

/// DOM markers that identify a ChatGPT page.
const CHATGPT_MARKERS: &[&str] = &[
    r#"[data-testid^="conversation-turn-"]"#,
    "[data-message-author-role]",
];

impl Platform {
    /// Identifier used in serialized output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChatGpt => "chatgpt",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    /// Human-readable product name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ChatGpt => "ChatGPT",
            Self::Claude => "Claude",
            Self::Gemini => "Gemini",
        }
    }

    /// Heading used for user turns.
    #[must_use]
    pub fn user_label(self) -> &'static str {
        match self {
            Self::Claude => "Human",
            Self::ChatGpt | Self::Gemini => "User",
        }
    }

    /// Prefix for exported filenames.
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::ChatGpt | Self::Gemini => "ai-chat",
        }
    }

    /// Detect the platform from a page URL.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let host = Url::parse(url.trim())
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))?;

        if host_matches(&host, "claude.ai") {
            Some(Self::Claude)
        } else if host_matches(&host, "chatgpt.com") || host_matches(&host, "chat.openai.com") {
            Some(Self::ChatGpt)
        } else if host_matches(&host, "gemini.google.com") {
            Some(Self::Gemini)
        } else {
            None
        }
    }

    /// Detect the platform from marker elements below `root`.
    ///
    /// Claude markers are checked first because Claude pages may also carry
    /// `data-message-author-role` attributes.
    pub fn from_markers<N: DomNode>(root: &N) -> Option<Self> {
        let has_any = |markers: &[&str]| {
            markers
                .iter()
                .any(|css| root.query_selector(css).ok().flatten().is_some())
        };

        if has_any(CLAUDE_MARKERS) {
            Some(Self::Claude)
        } else if has_any(CHATGPT_MARKERS) {
            Some(Self::ChatGpt)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chatgpt" => Ok(Self::ChatGpt),
            "claude" => Ok(Self::Claude),
            "gemini" => Ok(Self::Gemini),
            other => Err(Error::Config(format!("unknown platform {other:?}"))),
        }
    }
}

/// True if `host` is `domain` or a subdomain of it.
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
