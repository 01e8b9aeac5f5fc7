//! URL Utility Functions
//!
//! Validation, host extraction, the image domain allow-list and the
//! best-effort image identifier derived from an image URL.

use url::Url;

use crate::patterns::{FILES_SEGMENT, UUID};
use crate::platform::host_matches;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Lowercase hostname of an absolute URL, or `None`.
#[must_use]
pub fn host_of(url_str: &str) -> Option<String> {
    let (_, parsed) = is_absolute_url(url_str);
    parsed.and_then(|url| url.host_str().map(str::to_ascii_lowercase))
}

/// True for inline `data:` URIs.
#[must_use]
pub fn is_data_uri(src: &str) -> bool {
    src.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Whether an image source may be emitted.
///
/// `data:` URIs are always rejected. Absolute http(s) URLs must be served
/// from one of `domains` (or a subdomain). Relative and `blob:` sources
/// belong to the page itself and are accepted.
#[must_use]
pub fn is_allowed_image_source(src: &str, domains: &[String]) -> bool {
    if is_data_uri(src) {
        return false;
    }

    let lower = src.trim().to_ascii_lowercase();
    if lower.starts_with("blob:") {
        return true;
    }
    if !lower.starts_with("http://") && !lower.starts_with("https://") && !lower.starts_with("//")
    {
        return true;
    }

    let absolute = if lower.starts_with("//") {
        format!("https:{lower}")
    } else {
        lower
    };

    match host_of(&absolute) {
        Some(host) => domains
            .iter()
            .any(|domain| host_matches(&host, &domain.to_ascii_lowercase())),
        None => false,
    }
}

/// Last path segment with query string and fragment removed.
#[must_use]
pub fn last_path_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Derive a stable identifier for an image URL.
///
/// Tried in order: a UUID anywhere in the URL, the segment following
/// `files/`, the last path segment without its query string. Falls back
/// to `"unknown"`.
#[must_use]
pub fn image_id_from_url(src: &str) -> String {
    if !src.contains('/') {
        return "unknown".to_string();
    }

    if let Some(caps) = UUID.captures(src) {
        return caps[1].to_string();
    }

    if let Some(caps) = FILES_SEGMENT.captures(src) {
        return caps[1].to_string();
    }

    let segment = last_path_segment(src);
    if segment.is_empty() {
        "unknown".to_string()
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| (*d).to_string()).collect()
    }

    #[test]
    fn test_is_absolute_url() {
        let (is_abs, parsed) = is_absolute_url("https://chatgpt.com/c/1");
        assert!(is_abs);
        assert!(parsed.is_some());

        assert!(!is_absolute_url("/relative/path").0);
        assert!(!is_absolute_url("blob:https://chatgpt.com/x").0);
        assert!(!is_absolute_url("").0);
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://Files.OAIUserContent.com/x"), Some("files.oaiusercontent.com".to_string()));
        assert_eq!(host_of("not a url"), None);
    }

    #[test]
    fn test_allow_list() {
        let allowed = domains(&["oaiusercontent.com", "openai.com"]);

        assert!(is_allowed_image_source("https://oaiusercontent.com/u1", &allowed));
        assert!(is_allowed_image_source("https://files.oaiusercontent.com/file-1", &allowed));
        assert!(is_allowed_image_source("https://cdn.openai.com/a.png", &allowed));
        assert!(!is_allowed_image_source("https://example.com/icon.png", &allowed));
        assert!(!is_allowed_image_source("https://oaiusercontent.com.evil.net/x", &allowed));
        assert!(!is_allowed_image_source("data:image/png;base64,AAAA", &allowed));
        assert!(is_allowed_image_source("blob:https://chatgpt.com/123", &allowed));
        assert!(is_allowed_image_source("/backend-api/estuary/content?id=1", &allowed));
        assert!(!is_allowed_image_source("//example.com/a.png", &allowed));
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("https://a.com/x/y/image.png?sig=1"), "image.png");
        assert_eq!(last_path_segment("https://a.com/x/y/img#frag"), "img");
        assert_eq!(last_path_segment("plain"), "plain");
    }

    #[test]
    fn test_image_id_prefers_uuid() {
        let url = "https://files.oaiusercontent.com/files/file-AbC/raw?id=1b2c3d4e-aaaa-4bbb-8ccc-0123456789ab";
        assert_eq!(image_id_from_url(url), "1b2c3d4e-aaaa-4bbb-8ccc-0123456789ab");
    }

    #[test]
    fn test_image_id_files_segment() {
        let url = "https://files.oaiusercontent.com/files/file-AbC/raw?se=2024";
        assert_eq!(image_id_from_url(url), "file-AbC");
    }

    #[test]
    fn test_image_id_last_segment_and_unknown() {
        assert_eq!(image_id_from_url("https://cdn.openai.com/img/photo.webp?x=1"), "photo.webp");
        assert_eq!(image_id_from_url("nopath"), "unknown");
        assert_eq!(image_id_from_url("https://cdn.openai.com/img/"), "unknown");
    }
}
