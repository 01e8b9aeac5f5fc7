//! Configuration options for transcript extraction.
//!
//! The `Options` struct controls platform detection, which selector profile
//! is used, and the thresholds of the block discovery heuristics.

use crate::platform::Platform;
use crate::selector::SelectorProfile;

/// Configuration options for transcript extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use ai_chat_export::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     url: Some("https://claude.ai/chat/123".to_string()),
///     min_blocks: 3,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// URL of the page the HTML came from.
    ///
    /// Used first for platform detection. When absent, the page's canonical
    /// link or `og:url` is used instead.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Force a platform, skipping detection.
    ///
    /// Default: `None`
    pub platform: Option<Platform>,

    /// Replace the built-in selector profile of the detected platform.
    ///
    /// Default: `None`
    pub profile: Option<SelectorProfile>,

    /// Deepest subtree the renderer descends into. Nodes below this depth
    /// render as empty and a warning is logged.
    ///
    /// Default: `256`
    pub max_depth: usize,

    /// Minimum trimmed text length for the text-bearing block strategy.
    ///
    /// Default: `15`
    pub min_text_length: usize,

    /// Minimum text length for a `div` to be a manual-scan candidate
    /// (a candidate containing a `<p>` qualifies regardless).
    ///
    /// Default: `20`
    pub manual_scan_min_text: usize,

    /// Number of highest-scoring manual-scan candidates kept.
    ///
    /// Default: `20`
    pub manual_scan_limit: usize,

    /// Deepest level below the container the manual scan visits.
    ///
    /// Default: `12`
    pub manual_scan_depth: usize,

    /// Fewest blocks a strategy must find to count as a conversation.
    ///
    /// Default: `2`
    pub min_blocks: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: None,
            platform: None,
            profile: None,
            max_depth: 256,
            min_text_length: 15,
            manual_scan_min_text: 20,
            manual_scan_limit: 20,
            manual_scan_depth: 12,
            min_blocks: 2,
        }
    }
}

impl Options {
    /// Options for a page loaded from `url`.
    #[must_use]
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(options.url.is_none());
        assert!(options.platform.is_none());
        assert!(options.profile.is_none());
        assert_eq!(options.max_depth, 256);
        assert_eq!(options.min_text_length, 15);
        assert_eq!(options.manual_scan_min_text, 20);
        assert_eq!(options.manual_scan_limit, 20);
        assert_eq!(options.manual_scan_depth, 12);
        assert_eq!(options.min_blocks, 2);
    }

    #[test]
    fn test_for_url() {
        let options = Options::for_url("https://chatgpt.com/c/1");
        assert_eq!(options.url.as_deref(), Some("https://chatgpt.com/c/1"));
        assert_eq!(options.min_blocks, 2);
    }
}
