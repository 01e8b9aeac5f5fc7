//! Compiled regex patterns for extraction and rendering.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns are organized by their purpose in the export pipeline.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Image Identification Patterns
// =============================================================================

/// A UUID anywhere in an image URL.
pub static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})")
        .expect("UUID regex")
});

/// The id following a `files/` path segment (`/files/file-abc123/content`).
pub static FILES_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)files/([^/?#]+)").expect("FILES_SEGMENT regex"));

// =============================================================================
// Version Label Patterns
// =============================================================================

/// `Claude 3.5`, `Claude Opus`, ... in a page title or message text.
pub static CLAUDE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Claude\s*(\d+(?:\.\d+)*|Opus|Sonnet|Haiku)").expect("CLAUDE_VERSION regex")
});

/// Self-introduction carrying a version (`I am Claude 3 Opus`).
pub static CLAUDE_SELF_INTRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)I am Claude\s*(\d+(?:\.\d+)*|Opus|Sonnet|Haiku)")
        .expect("CLAUDE_SELF_INTRO regex")
});

// =============================================================================
// Whitespace Normalization
// =============================================================================

/// Three or more consecutive newlines.
pub static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("EXCESS_NEWLINES regex"));

/// Lines consisting solely of horizontal whitespace.
pub static BLANK_LINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]+$").expect("BLANK_LINE_WHITESPACE regex"));

// =============================================================================
// Markdown Block and Span Patterns (Markdown -> HTML)
// =============================================================================

/// Fenced code block with optional language tag.
pub static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_+#.-]*)[ \t]*\n(.*?)\n?```").expect("FENCED_CODE regex")
});

/// Inline code span.
pub static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("INLINE_CODE regex"));

/// Display math delimited by `$$`.
pub static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").expect("DISPLAY_MATH regex"));

/// Inline math delimited by single `$` on one line.
pub static INLINE_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([^\n$]+?)\$").expect("INLINE_MATH regex"));

/// Image fragment with the optional trailing provenance comment.
pub static IMAGE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]\n]*)\]\(([^)\s]*)\)(?: *<!--.*?-->)?").expect("IMAGE_FRAGMENT regex")
});

/// Inline link.
pub static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\n]*)\]\(([^)\s]*)\)").expect("LINK regex"));

/// Bold span.
pub static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("BOLD regex"));

/// Italic span.
pub static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+?)\*").expect("ITALIC regex"));

/// ATX heading line.
pub static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6}) (.+)$").expect("HEADING regex"));

/// Unordered list item line.
pub static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+] (.+)$").expect("BULLET_ITEM regex"));

/// Ordered list item line.
pub static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\. (.+)$").expect("NUMBERED_ITEM regex"));

/// Stash placeholder emitted by the HTML renderer (private-use delimiters).
pub static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("PLACEHOLDER regex"));

// =============================================================================
// LaTeX Repair Patterns
// =============================================================================

/// `\left` delimiters.
pub static LATEX_LEFT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\left\b").expect("LATEX_LEFT regex"));

/// `\right` delimiters.
pub static LATEX_RIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\right\b").expect("LATEX_RIGHT regex"));

/// `\vec x` without braces. The follow-up character is checked by the caller.
pub static LATEX_BARE_VEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\vec\s*([A-Za-z])").expect("LATEX_BARE_VEC regex"));

/// `\frac ab` without braces.
pub static LATEX_BARE_FRAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\frac\s*([A-Za-z0-9]+)\s*([A-Za-z0-9]+)").expect("LATEX_BARE_FRAC regex")
});
