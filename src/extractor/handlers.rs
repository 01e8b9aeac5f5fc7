//! Element handlers for code, lists, links, headings, artifact panels and math.

use super::node::{render_children, render_node};
use super::state::RenderContext;
use super::tags::is_list_tag;
use crate::dom::DomNode;
use crate::error::RenderError;
use tracing::debug;

/// Wrap inline content in a Markdown delimiter (`**`, `*`).
///
/// Whitespace-only content is returned as is, so empty `<b></b>` pairs do
/// not leave stray delimiters behind.
#[must_use]
pub fn wrap_inline(content: &str, delimiter: &str) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }
    format!("{delimiter}{content}{delimiter}")
}

/// `<code>`: raw text inside `<pre>` (the `<pre>` owns fencing), else an
/// inline code span.
pub fn handle_code<N: DomNode>(node: &N) -> String {
    let text = node.text_content();
    if node.parent().is_some_and(|p| p.is_tag("pre")) {
        return text;
    }
    format!("`{text}`")
}

/// Language named by a `language-*` class token.
fn language_class<N: DomNode>(node: &N) -> Option<String> {
    node.class_list()
        .iter()
        .find_map(|class| class.strip_prefix("language-").map(str::to_string))
        .filter(|lang| !lang.is_empty())
}

fn fence(language: &str, code: &str) -> String {
    format!("```{language}\n{code}\n```")
}

/// `<pre>`: fenced code block; language from the inner `<code>` element.
///
/// # Errors
///
/// Only selector failures, which cannot happen with the fixed selector used.
pub fn handle_pre<N: DomNode>(node: &N) -> Result<String, RenderError> {
    let code = node.query_selector("code")?;
    let language = code.as_ref().and_then(language_class).unwrap_or_default();
    let text = code.as_ref().map_or_else(|| node.text_content(), DomNode::text_content);

    Ok(fence(&language, &text) + "\n\n")
}

/// `<a>`: Markdown link with the literal `href`. Anchors without one keep
/// their text.
pub fn handle_link<N: DomNode>(node: &N, ctx: &mut RenderContext<'_>, depth: usize) -> String {
    let text = render_children(node, ctx, depth);
    match node.attr("href") {
        Some(href) => format!("[{text}]({href})"),
        None => text,
    }
}

/// `<h1>`..`<h6>`.
pub fn handle_heading<N: DomNode>(
    node: &N,
    ctx: &mut RenderContext<'_>,
    depth: usize,
    level: usize,
) -> String {
    let text = render_children(node, ctx, depth);
    format!("{} {}\n\n", "#".repeat(level), text.trim())
}

/// `<ul>` / `<ol>`: one line per direct `<li>` child.
///
/// Multi-line item content (nested lists, several paragraphs) is indented
/// under its marker. `<ol start>` sets the first number; negative values
/// count up through zero and anything unparseable falls back to 1.
pub fn handle_list<N: DomNode>(
    node: &N,
    ctx: &mut RenderContext<'_>,
    depth: usize,
    ordered: bool,
) -> String {
    let start = if ordered { list_start(node) } else { 1 };

    let items: Vec<String> = node
        .children()
        .iter()
        .filter(|child| child.is_tag("li"))
        .zip(0_i64..)
        .map(|(li, offset)| {
            let marker = if ordered {
                format!("{}. ", start.saturating_add(offset))
            } else {
                "- ".to_string()
            };
            let content = render_children(li, ctx, depth + 1);
            list_item(&marker, content.trim())
        })
        .collect();

    format!("\n{}\n\n", items.join("\n"))
}

fn list_start<N: DomNode>(node: &N) -> i64 {
    let Some(raw) = node.attr("start") else {
        return 1;
    };
    let value = raw.trim();
    if let Ok(start) = value.parse::<i64>() {
        return start;
    }

    // Numeric but out of range: clamp instead of restarting at 1.
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return if value.starts_with('-') { i64::MIN } else { i64::MAX };
    }

    debug!(start = value, "ignoring unparseable list start");
    1
}

fn list_item(marker: &str, content: &str) -> String {
    let indent = " ".repeat(marker.len());
    let mut lines = content.lines();
    let mut out = format!("{marker}{}", lines.next().unwrap_or_default());

    for line in lines {
        out.push('\n');
        if !line.trim().is_empty() {
            out.push_str(&indent);
            out.push_str(line);
        }
    }
    out
}

/// An `<li>` reached outside its list's own iteration.
///
/// Items directly under `<ul>`/`<ol>` are rendered by [`handle_list`]; this
/// path would duplicate them.
pub fn handle_stray_item<N: DomNode>(node: &N, ctx: &mut RenderContext<'_>, depth: usize) -> String {
    let under_list = node
        .parent()
        .and_then(|p| p.tag_name())
        .is_some_and(|tag| is_list_tag(&tag));
    if under_list {
        return String::new();
    }
    render_children(node, ctx, depth)
}

// =============================================================================
// Artifact panels
// =============================================================================

/// Panels holding generated artifacts, identified by `data-artifact-id`.
///
/// Only the meaningful inner content is rendered, fenced according to the
/// declared `data-artifact-type`. Unknown types and panels missing their
/// inner element return `None` and render normally.
///
/// # Errors
///
/// Only selector failures, which cannot happen with the fixed selectors used.
pub fn handle_artifact<N: DomNode>(
    node: &N,
    ctx: &mut RenderContext<'_>,
    depth: usize,
) -> Result<Option<String>, RenderError> {
    if node.attr("data-artifact-id").is_none() {
        return Ok(None);
    }
    let artifact_type = node.attr("data-artifact-type").unwrap_or_default();

    let fragment = match artifact_type.trim() {
        "image/svg+xml" => node
            .query_selector("svg")?
            .map(|svg| fence("svg", &svg.outer_html())),

        "text/markdown" => node
            .query_selector(".artifact-content")?
            .map(|content| render_node(&content, ctx, depth + 1).trim().to_string()),

        "application/vnd.ant.code" => node.query_selector("pre code")?.map(|code| {
            let language = language_class(&code).unwrap_or_default();
            fence(&language, &code.text_content())
        }),

        _ => None,
    };

    Ok(fragment.map(|inner| format!("\n\n{inner}\n\n")))
}

// =============================================================================
// Math
// =============================================================================

/// Where the TeX source of a KaTeX element may be found, in priority order.
enum TexSource {
    /// Text of the first matching element.
    Text(&'static str),
    /// Attribute of the first matching element.
    Attr(&'static str, &'static str),
}

const TEX_SOURCES: [TexSource; 3] = [
    TexSource::Text(r#".katex-html annotation[encoding="application/x-tex"]"#),
    TexSource::Attr("math[data-latex]", "data-latex"),
    TexSource::Text(".katex-mathml annotation"),
];

/// KaTeX output (`.katex`, `.katex-display`) back to `$…$` / `$$…$$`.
///
/// When no source can be recovered a placeholder naming the kind of
/// equation is emitted instead.
///
/// # Errors
///
/// Only selector failures, which cannot happen with the fixed selectors used.
pub fn handle_math<N: DomNode>(node: &N) -> Result<Option<String>, RenderError> {
    if !node.has_class("katex") && !node.has_class("katex-display") {
        return Ok(None);
    }

    let display = node.has_class("katex-display")
        || node.parent().is_some_and(|p| p.has_class("katex-display"));

    let Some(tex) = tex_source(node)? else {
        let placeholder = if display {
            "[Display LaTeX Equation]"
        } else {
            "[Inline LaTeX Equation]"
        };
        return Ok(Some(placeholder.to_string()));
    };

    Ok(Some(if display {
        format!("$${tex}$$")
    } else {
        format!("${tex}$")
    }))
}

fn tex_source<N: DomNode>(node: &N) -> Result<Option<String>, RenderError> {
    for source in &TEX_SOURCES {
        let found = match source {
            TexSource::Text(css) => node.query_selector(css)?.map(|n| n.text_content()),
            TexSource::Attr(css, attr) => node.query_selector(css)?.and_then(|n| n.attr(attr)),
        };
        if let Some(tex) = found.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            return Ok(Some(tex));
        }
    }
    Ok(None)
}
