//! Page metadata extraction.
//!
//! Only the two fields the export needs: the document title (which carries
//! the Claude model name) and the page's own URL, used for platform
//! detection when the caller has no URL.

use crate::dom::DomNode;
use crate::selector::select_first;
use crate::url_utils;

/// Metadata read from the page head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Trimmed `<title>` text.
    pub title: Option<String>,
    /// Canonical link or `og:url`.
    pub url: Option<String>,
}

/// Extract all page metadata below `root`.
#[must_use]
pub fn extract_page_metadata<N: DomNode>(root: &N) -> PageMetadata {
    PageMetadata {
        title: page_title(root),
        url: page_url(root),
    }
}

/// Text of the `<title>` element, if non-empty.
#[must_use]
pub fn page_title<N: DomNode>(root: &N) -> Option<String> {
    let title = select_first(root, "title")?;
    let text = title.text_content().split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// The page's own URL from `<link rel="canonical">`, else `og:url`.
#[must_use]
pub fn page_url<N: DomNode>(root: &N) -> Option<String> {
    // Try canonical link
    if let Some(link) = select_first(root, r#"link[rel="canonical"]"#) {
        if let Some(href) = link.attr("href") {
            let href = href.trim();
            if url_utils::is_absolute_url(href).0 {
                return Some(href.to_string());
            }
        }
    }

    // Try og:url
    let meta = select_first(root, r#"meta[property="og:url"]"#)?;
    let content = meta.attr("content")?;
    let content = content.trim();
    (!content.is_empty()).then(|| content.to_string())
}
