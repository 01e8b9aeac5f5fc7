//! Decoding saved pages to UTF-8.
//!
//! Browser "Save page as" output is nearly always UTF-8, but older exports
//! and proxies sometimes hand over legacy encodings. The charset is taken
//! from a byte-order mark, else from the first `<meta>` declaration in the
//! first kilobyte, else UTF-8.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

/// Bytes inspected for a `<meta>` charset declaration.
const SNIFF_LEN: usize = 1024;

/// `<meta charset=...>` or the `charset=` part of an `http-equiv` content type.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?\s*([A-Za-z0-9_:.-]+)"#)
        .expect("META_CHARSET regex")
});

/// A decoded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// UTF-8 text.
    pub text: String,
    /// Encoding the bytes were decoded from.
    pub encoding: &'static Encoding,
    /// Whether malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Charset declared by the page, UTF-8 when none is recognised.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    declared_charset(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

fn declared_charset(head: &str) -> Option<Cow<'_, str>> {
    META_CHARSET
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| Cow::Borrowed(m.as_str()))
}

/// Decode `html` with its detected encoding.
#[must_use]
pub fn decode_html(html: &[u8]) -> Decoded {
    let encoding = detect_encoding(html);
    let (text, used, had_errors) = encoding.decode(html);

    if had_errors {
        debug!(encoding = used.name(), "replaced malformed input sequences");
    }

    Decoded {
        text: text.into_owned(),
        encoding: used,
        had_errors,
    }
}

/// Decode `html` to UTF-8, replacing malformed sequences.
///
/// # Examples
///
/// ```
/// use ai_chat_export::encoding::transcode_to_utf8;
///
/// let html = b"<meta charset=\"ISO-8859-1\"><p>Caf\xE9</p>";
/// assert!(transcode_to_utf8(html).contains("Café"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    decode_html(html).text
}
