//! DOM capability interface.
//!
//! The renderer and the message detectors only need a handful of read-only
//! node operations. They are expressed as the [`DomNode`] trait so that the
//! extraction engine never depends on a particular DOM implementation; the
//! implementation used in practice wraps `dom_query::NodeRef`.

use crate::error::RenderError;

// Re-export core types for external use
pub use dom_query::{Document, Matcher, NodeRef, Selection};

/// Coarse node classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An element node (`<div>`, `<p>`, ...).
    Element,
    /// A text node.
    Text,
    /// Comments, doctype, the document node itself.
    Other,
}

/// Read-only view of a DOM node.
///
/// The required methods mirror the browser DOM (`nodeType`, `tagName`,
/// `getAttribute`, `childNodes`, `parentNode`, `textContent`,
/// `querySelectorAll`). Everything else is derived from them.
pub trait DomNode: Clone {
    /// Node classification.
    fn kind(&self) -> NodeKind;

    /// Lowercase tag name for elements, `None` otherwise.
    fn tag_name(&self) -> Option<String>;

    /// Attribute value, `None` if absent or not an element.
    fn attr(&self, name: &str) -> Option<String>;

    /// All child nodes (elements and text) in document order.
    fn children(&self) -> Vec<Self>;

    /// Parent node, if any.
    fn parent(&self) -> Option<Self>;

    /// Concatenated text of the node and all descendants.
    fn text_content(&self) -> String;

    /// Serialized markup of the node including itself.
    fn outer_html(&self) -> String;

    /// Descendants matching a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidSelector`] if `css` does not parse.
    fn query_selector_all(&self, css: &str) -> Result<Vec<Self>, RenderError>;

    /// True if this element itself matches a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidSelector`] if `css` does not parse.
    fn matches(&self, css: &str) -> Result<bool, RenderError>;

    /// Identity comparison.
    fn is_same(&self, other: &Self) -> bool;

    /// First descendant matching a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidSelector`] if `css` does not parse.
    fn query_selector(&self, css: &str) -> Result<Option<Self>, RenderError> {
        Ok(self.query_selector_all(css)?.into_iter().next())
    }

    /// True for element nodes.
    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    /// True if this is an element with the given (lowercase) tag.
    fn is_tag(&self, tag: &str) -> bool {
        self.tag_name().is_some_and(|t| t == tag)
    }

    /// Class attribute split on whitespace.
    fn class_list(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Exact class token membership (`classList.contains`).
    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|token| token == class))
    }

    /// Value of a property in the inline `style` attribute.
    fn style_property(&self, name: &str) -> Option<String> {
        let style = self.attr("style")?;
        style.split(';').find_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    /// True if `other` is a strict descendant of `self`.
    fn is_ancestor_of(&self, other: &Self) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.is_same(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Nearest element, starting with `self`, that satisfies `predicate`.
    fn closest_where<F>(&self, predicate: F) -> Option<Self>
    where
        F: Fn(&Self) -> bool,
    {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.is_element() && predicate(&node) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }
}

impl<'a> DomNode for NodeRef<'a> {
    fn kind(&self) -> NodeKind {
        if self.is_element() {
            NodeKind::Element
        } else if self.is_text() {
            NodeKind::Text
        } else {
            NodeKind::Other
        }
    }

    fn tag_name(&self) -> Option<String> {
        if !NodeRef::is_element(self) {
            return None;
        }
        self.node_name().map(|t| t.to_ascii_lowercase())
    }

    fn attr(&self, name: &str) -> Option<String> {
        Selection::from(*self).attr(name).map(|v| v.to_string())
    }

    fn children(&self) -> Vec<Self> {
        NodeRef::children(self)
    }

    fn parent(&self) -> Option<Self> {
        NodeRef::parent(self)
    }

    fn text_content(&self) -> String {
        self.text().to_string()
    }

    fn outer_html(&self) -> String {
        Selection::from(*self).html().to_string()
    }

    fn query_selector_all(&self, css: &str) -> Result<Vec<Self>, RenderError> {
        let matcher =
            Matcher::new(css).map_err(|_| RenderError::InvalidSelector(css.to_string()))?;
        Ok(Selection::from(*self).select_matcher(&matcher).nodes().to_vec())
    }

    fn matches(&self, css: &str) -> Result<bool, RenderError> {
        validate_selector(css)?;
        Ok(NodeRef::is_element(self) && Selection::from(*self).is(css))
    }

    fn is_same(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

/// Check that a selector parses, without running it.
///
/// # Errors
///
/// Returns [`RenderError::InvalidSelector`] if `css` does not parse.
pub fn validate_selector(css: &str) -> Result<(), RenderError> {
    Matcher::new(css)
        .map(|_| ())
        .map_err(|_| RenderError::InvalidSelector(css.to_string()))
}

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The `<html>` element of a parsed document.
#[must_use]
pub fn root(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("html").nodes().first().copied()
}
