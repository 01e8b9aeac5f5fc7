//! Selector Infrastructure
//!
//! Provides the foundation for message discovery and role detection.
//! Rules are plain functions over a [`DomNode`]; selector lists are data
//! carried by a [`SelectorProfile`] so they can be replaced without code
//! changes when a chat front end changes its markup.

use tracing::warn;

use crate::dom::DomNode;

pub mod blocks;
pub mod profile;
pub mod roles;

pub use blocks::{find_blocks, find_container, Discovery};
pub use profile::{BlockStrategy, RoleHints, SelectorProfile};
pub use roles::{RoleClassifier, RoleContext, RoleRule};

/// Elements below `root` paired with their depth (children of `root` are
/// depth 1), in document order, not descending past `max_depth`.
#[must_use]
pub fn walk_elements<N: DomNode>(root: &N, max_depth: usize) -> Vec<(N, usize)> {
    let mut out = Vec::new();
    let mut stack: Vec<(N, usize)> = root
        .children()
        .into_iter()
        .rev()
        .map(|child| (child, 1))
        .collect();

    while let Some((node, depth)) = stack.pop() {
        if !node.is_element() {
            continue;
        }
        if depth < max_depth {
            stack.extend(node.children().into_iter().rev().map(|c| (c, depth + 1)));
        }
        out.push((node, depth));
    }
    out
}

/// Run a CSS selector, treating a parse failure as "no matches".
///
/// Profiles are validated at load time, so a failure here means a built-in
/// selector the DOM backend rejects; it is logged and skipped.
#[must_use]
pub fn select_all<N: DomNode>(root: &N, css: &str) -> Vec<N> {
    match root.query_selector_all(css) {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!(selector = css, error = %err, "skipping selector");
            Vec::new()
        }
    }
}

/// First match of a CSS selector, see [`select_all`].
#[must_use]
pub fn select_first<N: DomNode>(root: &N, css: &str) -> Option<N> {
    select_all(root, css).into_iter().next()
}

/// True if `node` itself matches `css`; parse failures count as no match.
#[must_use]
pub fn node_matches<N: DomNode>(node: &N, css: &str) -> bool {
    node.matches(css).unwrap_or_else(|err| {
        warn!(selector = css, error = %err, "skipping selector");
        false
    })
}

/// Remove every node that is a DOM ancestor of another node in the list.
///
/// The innermost matches are kept so that each conversational turn is
/// counted once. Relative order is preserved.
#[must_use]
pub fn drop_ancestors<N: DomNode>(nodes: Vec<N>) -> Vec<N> {
    let keep: Vec<bool> = nodes
        .iter()
        .map(|candidate| {
            !nodes
                .iter()
                .any(|other| !other.is_same(candidate) && candidate.is_ancestor_of(other))
        })
        .collect();

    nodes
        .into_iter()
        .zip(keep)
        .filter_map(|(node, keep)| keep.then_some(node))
        .collect()
}

/// Trimmed character count of a node's text.
#[must_use]
pub fn text_len<N: DomNode>(node: &N) -> usize {
    node.text_content().trim().chars().count()
}
