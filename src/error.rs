//! Error types for ai-chat-export.
//!
//! This module defines the error types returned by extraction and export
//! operations. Per-node rendering failures have their own type
//! ([`RenderError`]) because they never escape the renderer.

use crate::platform::Platform;

/// Error type for extraction and export operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page is not a recognised AI chat page.
    #[error("Not a supported AI chat page: {0}")]
    UnsupportedPage(String),

    /// The platform was recognised but has no extraction profile.
    #[error("{0} conversations are not supported yet")]
    UnsupportedPlatform(Platform),

    /// No strategy found enough message blocks.
    #[error("No conversation messages found; the page layout may have changed")]
    NoMessages,

    /// A CSS selector from a profile could not be parsed.
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector text as written.
        selector: String,
        /// Parser message.
        reason: String,
    },

    /// A selector profile or option set is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The download sink reported a failure. Carries the sink's raw message.
    #[error("{0}")]
    Download(String),

    /// Reading input or writing output failed.
    #[error("cannot access {path}: {source}")]
    Io {
        /// File (or stream) being read or written.
        path: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// [`Error::Io`] for `path`.
    #[must_use]
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure while rendering a single DOM node.
///
/// These are caught at the node boundary, logged, and the node contributes
/// an empty fragment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A selector used by a node handler could not be parsed.
    #[error("invalid selector {0:?}")]
    InvalidSelector(String),

    /// The subtree is nested deeper than `Options::max_depth`.
    #[error("maximum render depth {0} exceeded")]
    DepthExceeded(usize),
}
