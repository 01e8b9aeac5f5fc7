//! Transcript assembly.
//!
//! Turns discovered message blocks into ordered [`Message`]s: classify the
//! role, render the block's content element, sweep the remaining image
//! containers, normalize whitespace and tally the counts.

use tracing::{debug, info, warn};

use super::images;
use super::node::render_node;
use super::state::RenderContext;
use crate::dom::DomNode;
use crate::patterns::{BLANK_LINE_WHITESPACE, EXCESS_NEWLINES};
use crate::result::{BlockRef, ImageRecord, Message, Role, Stats};
use crate::selector::{select_all, select_first, Discovery, RoleClassifier};

/// Output of [`assemble`].
#[derive(Debug, Clone, Default)]
pub struct Assembled {
    /// Non-empty messages in discovery order.
    pub messages: Vec<Message>,
    /// Role and image tallies.
    pub stats: Stats,
    /// Images emitted during the run, in order.
    pub images: Vec<ImageRecord>,
    /// Annotations about likely extraction problems.
    pub warnings: Vec<String>,
}

/// Render and classify every block of `discovery`.
///
/// The image de-dup set in `ctx` is cleared first, so repeated runs over
/// the same document produce identical output.
pub fn assemble<N: DomNode>(
    discovery: &Discovery<N>,
    classifier: &RoleClassifier,
    ctx: &mut RenderContext<'_>,
) -> Assembled {
    ctx.reset();

    let mut messages = Vec::with_capacity(discovery.blocks.len());
    let mut stats = Stats::default();

    for (index, block) in discovery.blocks.iter().enumerate() {
        let (role, rule) = classifier.classify_with_rule(block, index);
        let content = render_block(block, ctx);

        if content.is_empty() {
            debug!(index, "dropping empty block");
            continue;
        }

        debug!(index, role = %role, rule, chars = content.len(), "rendered message");
        match role {
            Role::User => stats.user_count += 1,
            Role::Assistant => stats.assistant_count += 1,
            Role::Unknown => {}
        }

        messages.push(Message {
            role,
            content,
            index,
            block: block_ref(block, &discovery.strategy, classifier.author_attribute()),
        });
    }

    stats.image_count = ctx.image_count();
    let warnings = one_sided_warnings(&stats);
    for warning in &warnings {
        warn!("{warning}");
    }

    info!(
        messages = messages.len(),
        users = stats.user_count,
        assistants = stats.assistant_count,
        images = stats.image_count,
        "assembled transcript"
    );

    Assembled {
        messages,
        stats,
        images: ctx.images().to_vec(),
        warnings,
    }
}

/// Render one block to normalized Markdown, `""` if it carries nothing.
pub fn render_block<N: DomNode>(block: &N, ctx: &mut RenderContext<'_>) -> String {
    let profile = ctx.profile();
    let content_element = profile
        .content_selectors
        .iter()
        .find_map(|css| select_first(block, css));

    let mut markdown = match &content_element {
        Some(element) => render_node(element, ctx, 0),
        None => render_node(block, ctx, 0),
    };

    if let Some(element) = &content_element {
        markdown.push_str(&sweep_images(block, element, ctx));
    }

    normalize(&markdown)
}

/// Resolve image containers of `block` that lie outside `content`.
fn sweep_images<N: DomNode>(block: &N, content: &N, ctx: &mut RenderContext<'_>) -> String {
    let profile = ctx.profile();
    let mut out = String::new();

    for css in &profile.image_container_selectors {
        for container in select_all(block, css) {
            if container.is_same(content) || content.is_ancestor_of(&container) {
                continue;
            }
            if let Some(img) = images::best_image(&container) {
                out.push_str(&images::resolve(&img, ctx));
            }
        }
    }

    out
}

/// Strip whitespace-only lines, trim, and collapse runs of blank lines.
#[must_use]
pub fn normalize(markdown: &str) -> String {
    let cleaned = BLANK_LINE_WHITESPACE.replace_all(markdown, "");
    EXCESS_NEWLINES
        .replace_all(cleaned.trim(), "\n\n")
        .into_owned()
}

fn block_ref<N: DomNode>(block: &N, strategy: &str, author_attribute: &str) -> BlockRef {
    let anchor = ["id", "data-testid", author_attribute]
        .iter()
        .filter(|name| !name.is_empty())
        .find_map(|name| block.attr(name).map(|value| format!("{name}={value}")));

    BlockRef {
        tag: block.tag_name().unwrap_or_default(),
        anchor,
        strategy: strategy.to_string(),
    }
}

/// Warnings for a transcript where one side has no messages at all.
#[must_use]
pub fn one_sided_warnings(stats: &Stats) -> Vec<String> {
    let mut warnings = Vec::new();
    if stats.user_count == 0 {
        warnings.push(
            "No user messages detected: extraction may be incomplete (roles may be misclassified)"
                .to_string(),
        );
    }
    if stats.assistant_count == 0 {
        warnings.push(
            "No assistant messages detected: extraction may be incomplete (roles may be misclassified)"
                .to_string(),
        );
    }
    warnings
}
