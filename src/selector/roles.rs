//! User/assistant role classification.
//!
//! Classification is an ordered list of rules, each a pure function of the
//! block and a [`RoleContext`]. The first rule returning `Some` decides.
//! Rules are ordered from the strongest signal (an explicit author
//! attribute) to the weakest (alternating position).

use regex::Regex;
use tracing::trace;

use super::node_matches;
use super::profile::RoleHints;
use crate::dom::DomNode;
use crate::error::{Error, Result};
use crate::result::Role;

/// Per-block inputs shared by all rules.
#[derive(Debug)]
pub struct RoleContext<'a> {
    /// Zero-based discovery position of the block.
    pub index: usize,
    /// Profile hints.
    pub hints: &'a RoleHints,
    /// Compiled `hints.assistant_patterns`.
    pub patterns: &'a [Regex],
}

/// A single classification rule.
pub type RoleRule<N> = fn(&N, &RoleContext<'_>) -> Option<Role>;

/// Rules in evaluation order, with names for logging.
fn rules<N: DomNode>() -> [(&'static str, RoleRule<N>); 7] {
    [
        ("author-attribute", explicit_author_role::<N>),
        ("heading", heading_label::<N>),
        ("avatar", avatar_icon::<N>),
        ("surface-markers", surface_markers::<N>),
        ("content", content_phrases::<N>),
        ("first-position", first_position::<N>),
        ("alternating", alternating::<N>),
    ]
}

/// Classifies message blocks using a profile's [`RoleHints`].
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    hints: RoleHints,
    patterns: Vec<Regex>,
}

impl RoleClassifier {
    /// Compile the hints' patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if an assistant pattern is not a
    /// valid regex.
    pub fn new(hints: &RoleHints) -> Result<Self> {
        let patterns = hints
            .assistant_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| Error::InvalidSelector {
                    selector: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            hints: hints.clone(),
            patterns,
        })
    }

    /// Attribute carrying an explicit author role, `""` if the profile has none.
    #[must_use]
    pub fn author_attribute(&self) -> &str {
        &self.hints.author_attribute
    }

    /// Classify the block found at discovery position `index`.
    pub fn classify<N: DomNode>(&self, block: &N, index: usize) -> Role {
        self.classify_with_rule(block, index).0
    }

    /// Classify and report which rule decided.
    pub fn classify_with_rule<N: DomNode>(&self, block: &N, index: usize) -> (Role, &'static str) {
        let ctx = RoleContext {
            index,
            hints: &self.hints,
            patterns: &self.patterns,
        };

        for (name, rule) in rules::<N>() {
            if let Some(role) = rule(block, &ctx) {
                trace!(index, rule = name, role = %role, "classified block");
                return (role, name);
            }
        }

        // `alternating` always decides; kept for exhaustiveness.
        (Role::Unknown, "none")
    }
}

/// Resolve a two-sided signal: decisive only when exactly one side fired.
fn one_sided(user: bool, assistant: bool) -> Option<Role> {
    match (user, assistant) {
        (true, false) => Some(Role::User),
        (false, true) => Some(Role::Assistant),
        _ => None,
    }
}

/// Author attribute on the block, its nearest ancestor carrying one, or a
/// single distinct value among its descendants.
pub fn explicit_author_role<N: DomNode>(block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    let attr = ctx.hints.author_attribute.as_str();
    if attr.is_empty() {
        return None;
    }

    let own_or_ancestor = block
        .closest_where(|n| n.attr(attr).is_some())
        .and_then(|n| n.attr(attr));
    if let Some(role) = own_or_ancestor.as_deref().and_then(Role::from_author_value) {
        return Some(role);
    }

    let mut found: Option<Role> = None;
    for node in block.query_selector_all(&format!("[{attr}]")).ok()? {
        let Some(role) = node.attr(attr).as_deref().and_then(Role::from_author_value) else {
            continue;
        };
        match found {
            None => found = Some(role),
            Some(existing) if existing != role => return None,
            Some(_) => {}
        }
    }
    found
}

/// Visually hidden "You said:" / "ChatGPT said:" headings.
pub fn heading_label<N: DomNode>(block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    let hints = ctx.hints;
    if hints.heading_selector.is_empty() {
        return None;
    }

    let heading = block.query_selector(&hints.heading_selector).ok()??;
    let text = heading.text_content().to_lowercase();
    if text.trim().is_empty() {
        return None;
    }

    if hints.user_heading_phrases.iter().any(|p| text.contains(p.as_str())) {
        Some(Role::User)
    } else if hints.assistant_heading_phrases.iter().any(|p| text.contains(p.as_str())) {
        Some(Role::Assistant)
    } else {
        None
    }
}

/// Avatar images identified by their `alt` text.
pub fn avatar_icon<N: DomNode>(block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    let hints = ctx.hints;
    if hints.user_avatar_alts.is_empty() && hints.assistant_avatar_alts.is_empty() {
        return None;
    }

    let alts: Vec<String> = block
        .query_selector_all("img[alt]")
        .ok()?
        .iter()
        .filter_map(|img| img.attr("alt"))
        .collect();

    let any_alt = |needles: &[String]| {
        alts.iter()
            .any(|alt| needles.iter().any(|needle| alt.contains(needle.as_str())))
    };

    one_sided(any_alt(&hints.user_avatar_alts), any_alt(&hints.assistant_avatar_alts))
}

/// Known surface styling on the block or inside it, turn-level flags on an
/// enclosing element, plus role words inside the block's own class names.
pub fn surface_markers<N: DomNode>(block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    let hints = ctx.hints;
    let classes = block.class_list();

    let has_fragment = |fragments: &[String]| {
        classes
            .iter()
            .any(|class| fragments.iter().any(|f| class.contains(f.as_str())))
    };
    let has_marker = |markers: &[String]| markers.iter().any(|css| self_or_descendant(block, css));
    let under_marker = |markers: &[String]| markers.iter().any(|css| self_or_ancestor(block, css));

    let user = has_marker(&hints.user_markers)
        || under_marker(&hints.user_ancestor_markers)
        || has_fragment(&hints.user_class_fragments);
    let assistant = has_marker(&hints.assistant_markers)
        || under_marker(&hints.assistant_ancestor_markers)
        || has_fragment(&hints.assistant_class_fragments);

    one_sided(user, assistant)
}

fn self_or_descendant<N: DomNode>(block: &N, css: &str) -> bool {
    node_matches(block, css) || block.query_selector(css).ok().flatten().is_some()
}

fn self_or_ancestor<N: DomNode>(block: &N, css: &str) -> bool {
    block.closest_where(|n| node_matches(n, css)).is_some()
}

/// Phrases and patterns only an assistant produces.
pub fn content_phrases<N: DomNode>(block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    let hints = ctx.hints;
    if hints.assistant_phrases.is_empty() && ctx.patterns.is_empty() {
        return None;
    }

    let text = block.text_content();
    let hit = hints.assistant_phrases.iter().any(|p| text.contains(p.as_str()))
        || ctx.patterns.iter().any(|re| re.is_match(&text));

    hit.then_some(Role::Assistant)
}

/// A conversation starts with the user.
pub fn first_position<N: DomNode>(_block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    (ctx.index == 0).then_some(Role::User)
}

/// Even positions are user turns, odd positions assistant turns.
pub fn alternating<N: DomNode>(_block: &N, ctx: &RoleContext<'_>) -> Option<Role> {
    Some(if ctx.index % 2 == 0 {
        Role::User
    } else {
        Role::Assistant
    })
}
