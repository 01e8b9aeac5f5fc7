//! Selector profiles.
//!
//! Everything that ties extraction to a particular front end's markup lives
//! here as data: where the conversation container is, how message blocks
//! are found, which elements hold the message body, which images are real
//! content, and the hints used to tell user turns from assistant turns.
//! Built-in profiles exist for ChatGPT and Claude; a replacement can be
//! loaded from JSON.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dom::validate_selector;
use crate::error::{Error, RenderError, Result};
use crate::platform::Platform;

/// One way of finding message blocks inside the conversation container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockStrategy {
    /// Try each selector in order; the first with enough matches wins.
    Selectors {
        /// Selectors, most specific first.
        selectors: Vec<String>,
    },

    /// Matches that carry some text and contain no `<script>`.
    NonEmpty {
        /// Candidate selector.
        selector: String,
    },

    /// Matches whose trimmed text exceeds `Options::min_text_length`,
    /// excluding anything inside `header`, `footer` or `nav`.
    TextBearing {
        /// Candidate selector.
        selector: String,
    },

    /// Depth-limited scan over `div`s scored by text length.
    ManualScan,
}

impl BlockStrategy {
    fn selectors(&self) -> Vec<&str> {
        match self {
            Self::Selectors { selectors } => selectors.iter().map(String::as_str).collect(),
            Self::NonEmpty { selector } | Self::TextBearing { selector } => vec![selector.as_str()],
            Self::ManualScan => Vec::new(),
        }
    }
}

/// Hints for user/assistant classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleHints {
    /// Attribute naming the author of a turn.
    pub author_attribute: String,

    /// Selectors that mark a user turn when the block or a descendant
    /// matches.
    pub user_markers: Vec<String>,
    /// Selectors that mark an assistant turn, same matching as `user_markers`.
    pub assistant_markers: Vec<String>,
    /// Selectors that mark a user turn when the block or an ancestor
    /// matches. Keep these specific: a page-level wrapper matching one
    /// claims every turn.
    pub user_ancestor_markers: Vec<String>,
    /// Ancestor markers for assistant turns.
    pub assistant_ancestor_markers: Vec<String>,

    /// Substrings of the block's own class names indicating a user turn.
    pub user_class_fragments: Vec<String>,
    /// Substrings of the block's own class names indicating an assistant turn.
    pub assistant_class_fragments: Vec<String>,

    /// Selector for the small heading screen readers see (`h5, h6`).
    pub heading_selector: String,
    /// Lowercase phrases in that heading for user turns.
    pub user_heading_phrases: Vec<String>,
    /// Lowercase phrases in that heading for assistant turns.
    pub assistant_heading_phrases: Vec<String>,

    /// Substrings of avatar `alt` text for user turns.
    pub user_avatar_alts: Vec<String>,
    /// Substrings of avatar `alt` text for assistant turns.
    pub assistant_avatar_alts: Vec<String>,

    /// Literal phrases only an assistant writes.
    pub assistant_phrases: Vec<String>,
    /// Regexes over block text that identify an assistant turn.
    pub assistant_patterns: Vec<String>,
}

/// Markup knowledge for one chat front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorProfile {
    /// Candidates for the conversation container, first match wins.
    pub container_selectors: Vec<String>,

    /// Block discovery strategies, most reliable first.
    pub block_strategies: Vec<BlockStrategy>,

    /// Elements inside a block holding the message body, first match wins.
    #[serde(default)]
    pub content_selectors: Vec<String>,

    /// Elements inside a block that wrap generated images.
    #[serde(default)]
    pub image_container_selectors: Vec<String>,

    /// Hosts (and their subdomains) images may be served from.
    #[serde(default)]
    pub image_domains: Vec<String>,

    /// Alt text used when an image has none.
    #[serde(default = "default_image_alt")]
    pub default_image_alt: String,

    /// Role classification hints.
    #[serde(default)]
    pub roles: RoleHints,
}

fn default_image_alt() -> String {
    "Image".to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn selectors(items: &[&str]) -> BlockStrategy {
    BlockStrategy::Selectors {
        selectors: strings(items),
    }
}

impl SelectorProfile {
    /// Built-in profile for chatgpt.com.
    #[must_use]
    pub fn chatgpt() -> Self {
        Self {
            container_selectors: strings(&[
                r#"div[id="__next"] main"#,
                "main div.flex.flex-col",
                r#"[role="presentation"]"#,
                "main .relative",
                "div#__next div.overflow-hidden",
                "div.flex.flex-col.items-center.text-sm.h-full",
                "main",
                "body",
            ]),
            block_strategies: vec![
                selectors(&[
                    r#"[data-testid^="conversation-turn-"]"#,
                    "article[data-message-author-role]",
                    "div[data-message-author-role]",
                    "div.w-full.text-token-text-primary",
                    ".group[data-group-pos]",
                    "div.text-base",
                ]),
                BlockStrategy::TextBearing {
                    selector: "p, div.whitespace-pre-wrap".to_string(),
                },
                BlockStrategy::ManualScan,
            ],
            content_selectors: strings(&[
                r#"div[data-message-text-content="true"]"#,
                "div.whitespace-pre-wrap",
                "div.markdown",
                ".prose",
                "div.flex.max-w-full.flex-col.grow",
                ".text-message",
            ]),
            image_container_selectors: strings(&[
                r".group\/imagegen-image",
                r#"[style*="aspect-ratio"]"#,
                "div.grid.pb-2",
                "div.relative.overflow-hidden",
                r#"div[tabindex="0"][role="button"]"#,
            ]),
            image_domains: strings(&["oaiusercontent.com", "openai.com"]),
            default_image_alt: "Generated image".to_string(),
            roles: RoleHints {
                author_attribute: "data-message-author-role".to_string(),
                user_markers: strings(&[".bg-token-message-surface", r".dark\:bg-gray-800"]),
                assistant_markers: strings(&[".bg-gray-50", ".markdown"]),
                user_ancestor_markers: Vec::new(),
                assistant_ancestor_markers: Vec::new(),
                user_class_fragments: strings(&["user"]),
                assistant_class_fragments: strings(&["assistant"]),
                heading_selector: "h5, h6".to_string(),
                user_heading_phrases: strings(&["you said"]),
                assistant_heading_phrases: strings(&["chatgpt", "assistant"]),
                user_avatar_alts: strings(&["User", "user"]),
                assistant_avatar_alts: strings(&["ChatGPT", "GPT", "Assistant"]),
                assistant_phrases: strings(&["As an AI language model"]),
                assistant_patterns: Vec::new(),
            },
        }
    }

    /// Built-in profile for claude.ai.
    #[must_use]
    pub fn claude() -> Self {
        Self {
            container_selectors: strings(&[
                r#"div[role="region"]"#,
                ".flex.min-h-screen",
                "main",
                ".chat-container",
                "#__next main",
                ".chat-view",
                r#"div[class*="chat-view"]"#,
                r#"div[class*="conversation"]"#,
                r".mx-auto.flex.max-w-\[--thread-content-max-width\]",
                ".flex.h-full.flex-col",
                "div.overflow-y-auto",
                "body",
            ]),
            block_strategies: vec![
                selectors(&["[data-message-author-role], [data-test-render-count]"]),
                selectors(&[
                    r#"[data-testid="user-message"], .font-claude-message, .font-claude-response"#,
                ]),
                selectors(&[
                    "div.min-h-8.text-message",
                    "article.text-token-text-primary",
                    "div.whitespace-pre-wrap.break-words",
                    "div.markdown.prose",
                    ".font-claude-message",
                ]),
                selectors(&[
                    r".flex.flex-col.gap-1.empty\:hidden",
                    ".text-base.my-auto",
                    r".mx-auto.flex.max-w-\[--thread-content-max-width\]",
                    r"div.group\/conversation-turn",
                    ".whitespace-pre-wrap",
                    "div[data-is-streaming] > div",
                    "div.flex.max-w-full.flex-col",
                    "div.prose",
                    "div.markdown",
                    "div.min-h-full > div > p",
                ]),
                BlockStrategy::NonEmpty {
                    selector: ".grid-cols-1".to_string(),
                },
                selectors(&[
                    r#"div[class*="message"]"#,
                    r#"div[class*="chat-message"]"#,
                    r#"div[class*="chat-turn"]"#,
                    r#"div[class*="message-content"]"#,
                    r#"div[class*="bubble"]"#,
                    r#"div[class*="message-bubble"]"#,
                    "div > div > p",
                ]),
                BlockStrategy::TextBearing {
                    selector: "p, div > p, div.whitespace-pre-wrap".to_string(),
                },
                BlockStrategy::ManualScan,
            ],
            content_selectors: Vec::new(),
            image_container_selectors: Vec::new(),
            image_domains: strings(&["anthropic.com"]),
            default_image_alt: default_image_alt(),
            roles: RoleHints {
                author_attribute: "data-message-author-role".to_string(),
                user_markers: strings(&[
                    ".bg-token-message-surface",
                    r#"[data-testid="user-message"]"#,
                ]),
                assistant_markers: strings(&[
                    ".font-claude-message",
                    ".font-claude-response",
                    ".text-token-text-primary",
                ]),
                user_ancestor_markers: Vec::new(),
                assistant_ancestor_markers: strings(&[r#"[data-is-streaming="true"]"#]),
                user_class_fragments: Vec::new(),
                assistant_class_fragments: Vec::new(),
                heading_selector: String::new(),
                user_heading_phrases: Vec::new(),
                assistant_heading_phrases: Vec::new(),
                user_avatar_alts: Vec::new(),
                assistant_avatar_alts: Vec::new(),
                assistant_phrases: strings(&["I am Claude", "As an AI assistant"]),
                assistant_patterns: strings(&[r"(?i)Claude (3\.5|Opus|Sonnet|Haiku)"]),
            },
        }
    }

    /// Built-in profile for a platform, if one exists.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Option<Self> {
        match platform {
            Platform::ChatGpt => Some(Self::chatgpt()),
            Platform::Claude => Some(Self::claude()),
            Platform::Gemini => None,
        }
    }

    /// Load and validate a profile from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed JSON or an empty container or
    /// strategy list, and [`Error::InvalidSelector`] for a selector or role
    /// pattern that does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("selector profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check every selector and pattern in the profile.
    ///
    /// # Errors
    ///
    /// See [`SelectorProfile::from_json`].
    pub fn validate(&self) -> Result<()> {
        if self.container_selectors.is_empty() {
            return Err(Error::Config("selector profile has no container selectors".into()));
        }
        if self.block_strategies.is_empty() {
            return Err(Error::Config("selector profile has no block strategies".into()));
        }

        let hints = &self.roles;
        let heading = (!hints.heading_selector.is_empty()).then_some(hints.heading_selector.as_str());

        let all_selectors = self
            .container_selectors
            .iter()
            .map(String::as_str)
            .chain(self.block_strategies.iter().flat_map(BlockStrategy::selectors))
            .chain(self.content_selectors.iter().map(String::as_str))
            .chain(self.image_container_selectors.iter().map(String::as_str))
            .chain(hints.user_markers.iter().map(String::as_str))
            .chain(hints.assistant_markers.iter().map(String::as_str))
            .chain(hints.user_ancestor_markers.iter().map(String::as_str))
            .chain(hints.assistant_ancestor_markers.iter().map(String::as_str))
            .chain(heading);

        for css in all_selectors {
            validate_selector(css).map_err(|err| selector_error(css, &err))?;
        }

        for pattern in &hints.assistant_patterns {
            Regex::new(pattern).map_err(|e| Error::InvalidSelector {
                selector: pattern.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}

fn selector_error(css: &str, err: &RenderError) -> Error {
    Error::InvalidSelector {
        selector: css.to_string(),
        reason: err.to_string(),
    }
}
