//! # ai-chat-export
//!
//! Extracts conversation transcripts from saved AI chat pages (ChatGPT,
//! Claude) and renders them as Markdown or as a self-contained HTML
//! document.
//!
//! ## Quick Start
//!
//! ```rust
//! use ai_chat_export::{extract, Role};
//!
//! let html = r#"<html><body><main>
//!   <div data-message-author-role="user"><p>What is 2 + 2?</p></div>
//!   <div data-message-author-role="assistant"><p>It is <strong>4</strong>.</p></div>
//! </main></body></html>"#;
//!
//! let transcript = extract(html, Some("https://chatgpt.com/c/123"))?;
//! assert_eq!(transcript.messages.len(), 2);
//! assert_eq!(transcript.messages[0].role, Role::User);
//! assert_eq!(transcript.messages[1].content, "It is **4**.");
//! # Ok::<(), ai_chat_export::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Platform Detection**: From the page URL, the canonical link, or marker elements
//! - **Message Discovery**: Ordered selector strategies with a manual-scan fallback
//! - **Role Classification**: Ordered rule list from author attributes down to alternation
//! - **Rendering**: Code blocks, lists, links, generated images, artifacts and LaTeX
//! - **Configurable**: Selector profiles are plain JSON data

mod error;
mod extract;
mod options;
mod result;

/// DOM capability interface and its `dom_query` implementation.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Export orchestration and download sinks.
pub mod export;

/// Message rendering and transcript assembly.
pub mod extractor;

/// HTML document rendering.
pub mod html_render;

/// Markdown document rendering.
pub mod markdown;

/// Page title and URL extraction.
pub mod metadata;

/// Compiled regex patterns.
pub mod patterns;

/// Supported chat platforms.
pub mod platform;

/// Selector profiles, block discovery and role classification.
pub mod selector;

/// URL utilities for image filtering and identification.
pub mod url_utils;

// Public API - re-exports
pub use error::{Error, RenderError, Result};
pub use export::{export_current, DownloadRequest, DownloadSink, ExportRequest, ExportResponse, FileSink, Formats};
pub use extract::{detect_platform, version_label};
pub use html_render::render_html;
pub use markdown::render_markdown;
pub use options::Options;
pub use platform::Platform;
pub use result::{BlockRef, ImageRecord, Message, Role, Stats, Transcript};
pub use selector::SelectorProfile;

/// Extracts the transcript from a page using default options.
///
/// `url` is the page's address, used for platform detection. Without it the
/// canonical link and marker elements decide.
///
/// # Errors
///
/// Returns [`Error::UnsupportedPage`] when `url` belongs to no supported
/// platform and the page carries no platform markers, and
/// [`Error::NoMessages`] when no conversation could be found.
pub fn extract(html: &str, url: Option<&str>) -> Result<Transcript> {
    let options = Options {
        url: url.map(str::to_string),
        ..Options::default()
    };
    extract_with_options(html, &options)
}

/// Extracts the transcript from a page with custom options.
///
/// # Example
///
/// ```rust
/// use ai_chat_export::{extract_with_options, Options, Platform};
///
/// let html = r#"<main>
///   <div data-testid="user-message"><p>Hi</p></div>
///   <div class="font-claude-message"><p>Hello! I am Claude 3 Opus.</p></div>
/// </main>"#;
/// let options = Options {
///     platform: Some(Platform::Claude),
///     ..Options::default()
/// };
/// let transcript = extract_with_options(html, &options)?;
/// assert_eq!(transcript.version_label, "Claude 3");
/// # Ok::<(), ai_chat_export::Error>(())
/// ```
///
/// # Errors
///
/// As [`extract`]; additionally [`Error::InvalidSelector`] or
/// [`Error::Config`] for an unusable `options.profile`, and
/// [`Error::UnsupportedPlatform`] for a platform without a profile.
pub fn extract_with_options(html: &str, options: &Options) -> Result<Transcript> {
    extract::extract_transcript(html, options)
}

/// Extracts the transcript from raw page bytes.
///
/// The encoding is detected from a byte-order mark or `<meta>` charset
/// declaration; malformed sequences become U+FFFD rather than errors.
///
/// # Example
///
/// ```rust
/// use ai_chat_export::{extract_bytes, Options};
///
/// let html = b"<meta charset=\"windows-1252\"><main>\
///   <div data-message-author-role=\"user\"><p>Caf\xE9?</p></div>\
///   <div data-message-author-role=\"assistant\"><p>Oui.</p></div></main>";
/// let transcript = extract_bytes(html, &Options::default())?;
/// assert_eq!(transcript.messages[0].content, "Café?");
/// # Ok::<(), ai_chat_export::Error>(())
/// ```
///
/// # Errors
///
/// As [`extract_with_options`].
pub fn extract_bytes(html: &[u8], options: &Options) -> Result<Transcript> {
    let html_str = encoding::transcode_to_utf8(html);
    extract_with_options(&html_str, options)
}
