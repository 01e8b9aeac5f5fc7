//! Tag constants used by the renderer.

/// Tags whose content is never part of a message.
pub static EXCLUDED_TAGS: [&str; 2] = ["script", "style"];

/// Bold wrappers.
pub static BOLD_TAGS: [&str; 2] = ["strong", "b"];

/// Italic wrappers.
pub static ITALIC_TAGS: [&str; 2] = ["em", "i"];

/// List roots.
pub static LIST_TAGS: [&str; 2] = ["ul", "ol"];

/// Check if tag is excluded from rendering.
#[inline]
#[must_use]
pub fn is_excluded_tag(tag: &str) -> bool {
    EXCLUDED_TAGS.contains(&tag)
}

/// Check if tag is a list root.
#[inline]
#[must_use]
pub fn is_list_tag(tag: &str) -> bool {
    LIST_TAGS.contains(&tag)
}

/// Heading level of `h1`..`h6`.
#[must_use]
pub fn heading_level(tag: &str) -> Option<usize> {
    let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}
