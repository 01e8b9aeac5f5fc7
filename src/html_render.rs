//! Self-contained HTML output.
//!
//! Message content is Markdown. It is converted with a small line-based
//! converter: code spans, code blocks, math and image fragments are first
//! stashed behind private-use placeholders so the emphasis, link and
//! paragraph rules cannot corrupt them, then restored as HTML at the end.
//! Highlighting and math typesetting happen client-side (highlight.js and
//! MathJax are referenced by the template).

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::markdown::EXPORT_DATE_FORMAT;
use crate::patterns::{
    BOLD, BULLET_ITEM, DISPLAY_MATH, FENCED_CODE, HEADING, IMAGE_FRAGMENT, INLINE_CODE,
    INLINE_MATH, ITALIC, LATEX_BARE_FRAC, LATEX_BARE_VEC, LATEX_LEFT, LATEX_RIGHT, LINK,
    NUMBERED_ITEM, PLACEHOLDER,
};
use crate::platform::Platform;
use crate::result::{Role, Transcript};

const TEMPLATE: &str = include_str!("../templates/transcript.html");

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Render a transcript as a standalone HTML document.
#[must_use]
pub fn render_html(transcript: &Transcript, exported_at: DateTime<Utc>) -> String {
    let mut conversation = String::new();
    for message in &transcript.messages {
        let class = if message.role == Role::User { "user" } else { "assistant" };
        let _ = write!(
            conversation,
            "<div class=\"{class}\">\n<h2>{}</h2>\n{}\n</div>\n",
            escape_html(transcript.role_label(message.role)),
            markdown_to_html(&message.content)
        );
    }

    let notes: String = transcript
        .warnings
        .iter()
        .map(|w| format!("  <p class=\"note\">{}</p>\n", escape_html(w)))
        .collect();

    let heading = escape_html(&transcript.heading());

    // Conversation last: message text must never be scanned for markers.
    TEMPLATE
        .replace("{{title}}", &heading)
        .replace("{{heading}}", &heading)
        .replace("{{exported_on}}", &exported_at.format(EXPORT_DATE_FORMAT).to_string())
        .replace("{{notes}}", &notes)
        .replace("{{footer}}", &footer(transcript.platform, exported_at))
        .replace("{{conversation}}", &conversation)
}

fn footer(platform: Platform, exported_at: DateTime<Utc>) -> String {
    let mut text = format!("Exported with ai-chat-export &bull; {}", exported_at.format("%Y-%m-%d"));
    if platform != Platform::ChatGpt {
        let _ = write!(text, " &bull; Platform: {}", platform.display_name());
    }
    text
}

// =============================================================================
// Placeholder Stash
// =============================================================================

#[derive(Debug, Clone)]
enum Stashed {
    CodeBlock { lang: String, code: String },
    InlineCode(String),
    DisplayMath(String),
    InlineMath(String),
    Image { alt: String, src: String },
}

impl Stashed {
    fn is_block(&self) -> bool {
        matches!(self, Self::CodeBlock { .. } | Self::DisplayMath(_) | Self::Image { .. })
    }

    fn to_html(&self) -> String {
        match self {
            Self::CodeBlock { lang, code } => {
                let class = if lang.is_empty() {
                    String::new()
                } else {
                    format!(" class=\"language-{}\"", escape_html(lang))
                };
                format!(
                    "<pre data-language=\"{}\"><code{class}>{}</code></pre>",
                    escape_html(&language_label(lang)),
                    escape_html(code)
                )
            }
            Self::InlineCode(code) => format!("<code>{}</code>", escape_html(code)),
            Self::DisplayMath(latex) => {
                let fixed = escape_html(&fix_latex(latex));
                format!("<div class=\"math-display\" data-latex-original=\"{fixed}\">\\[{fixed}\\]</div>")
            }
            Self::InlineMath(latex) => {
                let fixed = escape_html(&fix_latex(latex));
                format!("<span class=\"math-inline\" data-latex-original=\"{fixed}\">\\({fixed}\\)</span>")
            }
            Self::Image { alt, src } => format!(
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                escape_html(src),
                escape_html(alt)
            ),
        }
    }
}

#[derive(Debug, Default)]
struct Stash {
    items: Vec<Stashed>,
}

impl Stash {
    fn push(&mut self, item: Stashed) -> String {
        self.items.push(item);
        format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", self.items.len() - 1)
    }

    fn get(&self, placeholder: &str) -> Option<&Stashed> {
        let caps = PLACEHOLDER.captures(placeholder)?;
        if caps.get(0)?.as_str().len() != placeholder.len() {
            return None;
        }
        self.items.get(caps[1].parse::<usize>().ok()?)
    }

    fn is_block_line(&self, line: &str) -> bool {
        self.get(line).is_some_and(Stashed::is_block)
    }

    fn restore(&self, html: &str) -> String {
        PLACEHOLDER
            .replace_all(html, |caps: &regex::Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.items.get(i))
                    .map(Stashed::to_html)
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

// =============================================================================
// Markdown Conversion
// =============================================================================

/// Convert one message's Markdown into an HTML fragment.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut stash = Stash::default();

    // Placeholder delimiters are reserved; drop any the page itself carried.
    let markdown: String = markdown
        .chars()
        .filter(|c| !matches!(*c, PLACEHOLDER_OPEN | PLACEHOLDER_CLOSE))
        .collect();

    let text = FENCED_CODE.replace_all(&markdown, |caps: &regex::Captures<'_>| {
        stash.push(Stashed::CodeBlock {
            lang: caps[1].to_string(),
            code: caps[2].to_string(),
        })
    });
    let text = INLINE_CODE.replace_all(&text, |caps: &regex::Captures<'_>| {
        stash.push(Stashed::InlineCode(caps[1].to_string()))
    });
    let text = DISPLAY_MATH.replace_all(&text, |caps: &regex::Captures<'_>| {
        stash.push(Stashed::DisplayMath(caps[1].trim().to_string()))
    });
    let text = INLINE_MATH.replace_all(&text, |caps: &regex::Captures<'_>| {
        stash.push(Stashed::InlineMath(caps[1].to_string()))
    });
    let text = IMAGE_FRAGMENT.replace_all(&text, |caps: &regex::Captures<'_>| {
        stash.push(Stashed::Image {
            alt: caps[1].to_string(),
            src: caps[2].to_string(),
        })
    });

    let escaped = escape_html(&text);
    let html = convert_blocks(&escaped, &stash);
    stash.restore(&html)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// Line-based block conversion: headings, lists, paragraphs.
///
/// A blank line ends a paragraph but not a list; any other line ends a list.
fn convert_blocks(text: &str, stash: &Stash) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Option<ListKind> = None;

    let flush = |paragraph: &mut Vec<&str>, out: &mut Vec<String>| {
        if !paragraph.is_empty() {
            out.push(format!("<p>{}</p>", inline_spans(&paragraph.join("\n"))));
            paragraph.clear();
        }
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut out);
            continue;
        }

        let item = BULLET_ITEM
            .captures(line)
            .map(|c| (ListKind::Unordered, c))
            .or_else(|| NUMBERED_ITEM.captures(line).map(|c| (ListKind::Ordered, c)));

        if let Some((kind, caps)) = item {
            flush(&mut paragraph, &mut out);
            if list != Some(kind) {
                if let Some(open) = list {
                    out.push(format!("</{}>", open.tag()));
                }
                out.push(format!("<{}>", kind.tag()));
                list = Some(kind);
            }
            out.push(format!("<li>{}</li>", inline_spans(&caps[1])));
            continue;
        }

        if let Some(open) = list.take() {
            out.push(format!("</{}>", open.tag()));
        }

        if let Some(caps) = HEADING.captures(trimmed) {
            flush(&mut paragraph, &mut out);
            let level = caps[1].len();
            out.push(format!("<h{level}>{}</h{level}>", inline_spans(&caps[2])));
        } else if stash.is_block_line(trimmed) {
            flush(&mut paragraph, &mut out);
            out.push(trimmed.to_string());
        } else {
            paragraph.push(trimmed);
        }
    }

    flush(&mut paragraph, &mut out);
    if let Some(open) = list {
        out.push(format!("</{}>", open.tag()));
    }

    out.join("\n")
}

/// Links, bold and italic on already-escaped text.
fn inline_spans(text: &str) -> String {
    let text = LINK.replace_all(text, r#"<a href="$2" target="_blank" rel="noopener">$1</a>"#);
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    ITALIC.replace_all(&text, "<em>$1</em>").into_owned()
}

fn language_label(lang: &str) -> String {
    let mut chars = lang.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Plain text".to_string(),
    }
}

/// Escape text for element content and double-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

// =============================================================================
// LaTeX Repair
// =============================================================================

/// Repair common breakage in extracted LaTeX before typesetting.
///
/// Balances `\left`/`\right` pairs, braces bare `\vec x` and `\frac ab`
/// arguments, and balances unescaped curly braces.
#[must_use]
pub fn fix_latex(latex: &str) -> String {
    let mut fixed = latex.to_string();

    let lefts = LATEX_LEFT.find_iter(&fixed).count();
    let rights = LATEX_RIGHT.find_iter(&fixed).count();
    if lefts > rights {
        fixed.push_str(&" \\right.".repeat(lefts - rights));
    } else if rights > lefts {
        fixed.insert_str(0, &"\\left. ".repeat(rights - lefts));
    }

    let fixed = brace_bare_vec(&fixed);
    let fixed = LATEX_BARE_FRAC.replace_all(&fixed, r"\frac{$1}{$2}").into_owned();

    balance_braces(&fixed)
}

/// `\vec x` → `\vec{x}` when `x` is a single letter, not the start of a word.
fn brace_bare_vec(latex: &str) -> String {
    let mut out = String::with_capacity(latex.len() + 8);
    let mut last = 0;

    for caps in LATEX_BARE_VEC.captures_iter(latex) {
        let Some(whole) = caps.get(0) else { continue };
        let next = latex[whole.end()..].chars().next();
        if next.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        out.push_str(&latex[last..whole.start()]);
        let _ = write!(out, "\\vec{{{}}}", &caps[1]);
        last = whole.end();
    }

    out.push_str(&latex[last..]);
    out
}

fn balance_braces(latex: &str) -> String {
    let mut depth: i64 = 0;
    let mut missing_open: usize = 0;
    let mut escaped = false;

    for ch in latex.chars() {
        match ch {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '{' if !escaped => depth += 1,
            '}' if !escaped => {
                if depth == 0 {
                    missing_open += 1;
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
        escaped = false;
    }

    let missing_close = usize::try_from(depth).unwrap_or(0);
    format!("{}{latex}{}", "{".repeat(missing_open), "}".repeat(missing_close))
}
