//! Markdown output.
//!
//! The Markdown document is the transcript's native form: message content
//! is already Markdown, so rendering only adds the title, the export
//! timestamp, warning notes, and one `##` section per message.

use chrono::{DateTime, Utc};

use crate::result::Transcript;

/// Timestamp format shown in exported documents.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a transcript as a Markdown document.
///
/// # Examples
///
/// ```
/// use ai_chat_export::{extract, render_markdown};
/// use chrono::{TimeZone, Utc};
///
/// let html = r#"<main>
///   <div data-message-author-role="user"><p>Hi</p></div>
///   <div data-message-author-role="assistant"><p>Hello!</p></div>
/// </main>"#;
/// let transcript = extract(html, None)?;
/// let exported_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
///
/// let md = render_markdown(&transcript, exported_at);
/// assert!(md.starts_with("# AI Chat Conversation\n\nExported on: 2024-05-01 12:00:00 UTC\n\n"));
/// assert!(md.contains("## User\n\nHi\n\n## ChatGPT\n\nHello!\n\n"));
/// # Ok::<(), ai_chat_export::Error>(())
/// ```
#[must_use]
pub fn render_markdown(transcript: &Transcript, exported_at: DateTime<Utc>) -> String {
    let mut out = String::with_capacity(
        transcript.messages.iter().map(|m| m.content.len() + 32).sum::<usize>() + 128,
    );

    out.push_str(&format!(
        "# {}\n\nExported on: {}\n\n",
        transcript.heading(),
        exported_at.format(EXPORT_DATE_FORMAT)
    ));

    for warning in &transcript.warnings {
        out.push_str(&format!("> **Note:** {warning}\n\n"));
    }

    for message in &transcript.messages {
        out.push_str(&format!(
            "## {}\n\n{}\n\n",
            transcript.role_label(message.role),
            message.content
        ));
    }

    out
}
