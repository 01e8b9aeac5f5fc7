//! Recursive node renderer.
//!
//! [`render_node`] turns one DOM node and its subtree into a Markdown
//! fragment. Every node is rendered through a fallible inner function; an
//! error is logged and the node contributes an empty fragment, so one
//! malformed element never aborts the walk.

use tracing::warn;

use super::handlers;
use super::images;
use super::state::RenderContext;
use super::tags::{heading_level, is_excluded_tag, BOLD_TAGS, ITALIC_TAGS};
use crate::dom::{DomNode, NodeKind};
use crate::error::RenderError;

/// Render `node` at `depth` (the message block itself is depth 0).
pub fn render_node<N: DomNode>(node: &N, ctx: &mut RenderContext<'_>, depth: usize) -> String {
    match try_render(node, ctx, depth) {
        Ok(fragment) => fragment,
        Err(err) => {
            warn!(
                tag = node.tag_name().as_deref().unwrap_or("#text"),
                depth,
                error = %err,
                "node rendered as empty"
            );
            String::new()
        }
    }
}

/// Concatenate the rendered children of `node`, in document order.
pub fn render_children<N: DomNode>(node: &N, ctx: &mut RenderContext<'_>, depth: usize) -> String {
    node.children()
        .iter()
        .map(|child| render_node(child, ctx, depth + 1))
        .collect()
}

fn try_render<N: DomNode>(
    node: &N,
    ctx: &mut RenderContext<'_>,
    depth: usize,
) -> Result<String, RenderError> {
    if depth > ctx.max_depth() {
        return Err(RenderError::DepthExceeded(ctx.max_depth()));
    }

    match node.kind() {
        NodeKind::Text => return Ok(node.text_content()),
        NodeKind::Other => return Ok(String::new()),
        NodeKind::Element => {}
    }

    let Some(tag) = node.tag_name() else {
        return Ok(String::new());
    };

    if is_excluded_tag(&tag) {
        return Ok(String::new());
    }

    if images::is_image_container(node) {
        if let Some(fragment) = images::render_container(node, ctx) {
            return Ok(fragment);
        }
    }

    if let Some(fragment) = handlers::handle_artifact(node, ctx, depth)? {
        return Ok(fragment);
    }

    if let Some(fragment) = handlers::handle_math(node)? {
        return Ok(fragment);
    }

    let fragment = match tag.as_str() {
        "img" => images::resolve(node, ctx),
        "br" => "\n".to_string(),
        "p" => render_children(node, ctx, depth) + "\n\n",
        t if BOLD_TAGS.contains(&t) => handlers::wrap_inline(&render_children(node, ctx, depth), "**"),
        t if ITALIC_TAGS.contains(&t) => handlers::wrap_inline(&render_children(node, ctx, depth), "*"),
        "code" => handlers::handle_code(node),
        "pre" => handlers::handle_pre(node)?,
        "a" => handlers::handle_link(node, ctx, depth),
        "ul" => handlers::handle_list(node, ctx, depth, false),
        "ol" => handlers::handle_list(node, ctx, depth, true),
        "li" => handlers::handle_stray_item(node, ctx, depth),
        t => match heading_level(t) {
            Some(level) => handlers::handle_heading(node, ctx, depth, level),
            None => render_children(node, ctx, depth),
        },
    };

    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, Document, NodeRef};
    use crate::selector::SelectorProfile;

    fn render_first(doc: &Document, css: &str) -> String {
        let profile = SelectorProfile::chatgpt();
        let mut ctx = RenderContext::new(&profile, 256);
        let node: NodeRef<'_> = doc.select(css).nodes()[0];
        render_node(&node, &mut ctx, 0)
    }

    #[test]
    fn test_paragraph_and_inline_formatting() {
        let doc = dom::parse("<div><p>Hello <strong>bold</strong> and <em>it</em><br>next</p></div>");
        assert_eq!(render_first(&doc, "div"), "Hello **bold** and *it*\nnext\n\n");
    }

    #[test]
    fn test_script_and_style_excluded() {
        let doc = dom::parse("<div>a<script>var x = 1;</script><style>p{}</style>b</div>");
        assert_eq!(render_first(&doc, "div"), "ab");
    }

    #[test]
    fn test_headings() {
        let doc = dom::parse("<div><h1>Title</h1><h3>Sub</h3></div>");
        assert_eq!(render_first(&doc, "div"), "# Title\n\n### Sub\n\n");
    }

    #[test]
    fn test_link_keeps_literal_href() {
        let doc = dom::parse(r#"<div><a href="/c/123?x=1">see <b>this</b></a></div>"#);
        assert_eq!(render_first(&doc, "div"), "[see **this**](/c/123?x=1)");
    }

    #[test]
    fn test_depth_limit_renders_empty() {
        let doc = dom::parse("<div><section><p>deep</p></section>shallow</div>");
        let profile = SelectorProfile::chatgpt();
        let mut ctx = RenderContext::new(&profile, 1);
        let node: NodeRef<'_> = doc.select("div").nodes()[0];

        assert_eq!(render_node(&node, &mut ctx, 0), "shallow");
    }

    #[test]
    fn test_image_container_renders_single_image() {
        let doc = dom::parse(
            r#"<div id="m"><div class="group/imagegen-image">
                 <div style="filter: blur(4px)"><img src="https://oaiusercontent.com/a"></div>
                 <div class="z-1"><img src="https://oaiusercontent.com/b"></div>
               </div><p>caption</p></div>"#,
        );
        let out = render_first(&doc, "#m");
        assert!(out.contains("(https://oaiusercontent.com/b)"));
        assert!(!out.contains("oaiusercontent.com/a"));
        assert!(out.contains("caption"));
    }

    #[test]
    fn test_image_container_without_image_renders_children() {
        let doc = dom::parse(r#"<div style="aspect-ratio: 16/9"><p>just text</p></div>"#);
        assert_eq!(render_first(&doc, "div"), "just text\n\n");
    }
}
