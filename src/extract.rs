//! Transcript extraction.
//!
//! Ties the stages together: parse, read page metadata, detect the
//! platform, discover message blocks, and assemble the transcript.

use tracing::{debug, info};

use crate::dom::{self, DomNode};
use crate::error::{Error, Result};
use crate::extractor::{pipeline, RenderContext};
use crate::metadata::{self, PageMetadata};
use crate::options::Options;
use crate::patterns::{CLAUDE_SELF_INTRO, CLAUDE_VERSION};
use crate::platform::Platform;
use crate::result::Transcript;
use crate::selector::{find_blocks, RoleClassifier, SelectorProfile};

/// Main entry point for transcript extraction.
pub(crate) fn extract_transcript(html: &str, options: &Options) -> Result<Transcript> {
    debug!(html_len = html.len(), "starting transcript extraction");

    let document = dom::parse(html);
    let root = dom::root(&document)
        .ok_or_else(|| Error::UnsupportedPage("document has no root element".to_string()))?;

    let page = metadata::extract_page_metadata(&root);
    let platform = detect_platform(&root, &page, options)?;
    let profile = resolve_profile(platform, options)?;
    info!(%platform, "detected platform");

    let discovery = find_blocks(&root, &profile, options).ok_or(Error::NoMessages)?;
    let classifier = RoleClassifier::new(&profile.roles)?;
    let mut ctx = RenderContext::new(&profile, options.max_depth);
    let assembled = pipeline::assemble(&discovery, &classifier, &mut ctx);

    if assembled.messages.is_empty() {
        return Err(Error::NoMessages);
    }

    let version_label = version_label(platform, page.title.as_deref(), &discovery.blocks);
    debug!(version = %version_label, "resolved version label");

    Ok(Transcript {
        messages: assembled.messages,
        platform,
        version_label,
        title: page.title,
        stats: assembled.stats,
        images: assembled.images,
        warnings: assembled.warnings,
    })
}

/// Decide which platform the page belongs to.
///
/// An explicit override wins. Otherwise the caller's URL (or the page's
/// canonical URL) is checked, then marker elements. A caller-supplied URL
/// that matches nothing, on a page without markers, is rejected; a page
/// with no URL at all falls back to ChatGPT.
///
/// # Errors
///
/// Returns [`Error::UnsupportedPage`] for an unrecognised URL without markers.
pub fn detect_platform<N: DomNode>(
    root: &N,
    page: &PageMetadata,
    options: &Options,
) -> Result<Platform> {
    if let Some(platform) = options.platform {
        return Ok(platform);
    }

    let url = options.url.as_deref().or(page.url.as_deref());
    if let Some(platform) = url.and_then(Platform::from_url) {
        return Ok(platform);
    }

    if let Some(platform) = Platform::from_markers(root) {
        debug!(%platform, "platform detected from page markers");
        return Ok(platform);
    }

    match &options.url {
        Some(url) => Err(Error::UnsupportedPage(url.clone())),
        None => Ok(Platform::ChatGpt),
    }
}

fn resolve_profile(platform: Platform, options: &Options) -> Result<SelectorProfile> {
    if let Some(profile) = &options.profile {
        profile.validate()?;
        return Ok(profile.clone());
    }
    SelectorProfile::for_platform(platform).ok_or(Error::UnsupportedPlatform(platform))
}

/// Label used for assistant messages.
///
/// Claude pages name the model in the title (`Claude 3.5 Sonnet`) or in a
/// self-introduction inside the conversation.
pub fn version_label<N: DomNode>(platform: Platform, title: Option<&str>, blocks: &[N]) -> String {
    match platform {
        Platform::ChatGpt => "ChatGPT".to_string(),
        Platform::Gemini => "Gemini".to_string(),
        Platform::Claude => title
            .and_then(claude_version)
            .or_else(|| {
                blocks.iter().find_map(|block| {
                    let text = block.text_content();
                    CLAUDE_SELF_INTRO
                        .captures(&text)
                        .or_else(|| CLAUDE_VERSION.captures(&text))
                        .map(|caps| format!("Claude {}", &caps[1]))
                })
            })
            .unwrap_or_else(|| "Claude".to_string()),
    }
}

fn claude_version(text: &str) -> Option<String> {
    CLAUDE_VERSION
        .captures(text)
        .map(|caps| format!("Claude {}", &caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeRef;

    fn page(url: Option<&str>) -> PageMetadata {
        PageMetadata {
            title: None,
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_detect_platform_order() {
        let doc = dom::parse(r#"<div data-message-author-role="user">x</div>"#);
        let root: NodeRef<'_> = dom::root(&doc).unwrap();

        let by_url = Options::for_url("https://claude.ai/chat/1");
        assert_eq!(detect_platform(&root, &page(None), &by_url).unwrap(), Platform::Claude);

        let by_marker = Options::default();
        assert_eq!(detect_platform(&root, &page(None), &by_marker).unwrap(), Platform::ChatGpt);

        let forced = Options {
            platform: Some(Platform::Gemini),
            ..Options::for_url("https://claude.ai/chat/1")
        };
        assert_eq!(detect_platform(&root, &page(None), &forced).unwrap(), Platform::Gemini);

        let canonical = page(Some("https://claude.ai/chat/abc"));
        assert_eq!(detect_platform(&root, &canonical, &by_marker).unwrap(), Platform::Claude);
    }

    #[test]
    fn test_detect_platform_unsupported_page() {
        let doc = dom::parse("<p>hello</p>");
        let root: NodeRef<'_> = dom::root(&doc).unwrap();

        let foreign = Options::for_url("https://example.com/");
        assert!(matches!(
            detect_platform(&root, &page(None), &foreign),
            Err(Error::UnsupportedPage(_))
        ));
        assert_eq!(
            detect_platform(&root, &page(None), &Options::default()).unwrap(),
            Platform::ChatGpt
        );
    }

    #[test]
    fn test_version_label() {
        let doc = dom::parse("<div>Hi! I am Claude 3 Opus, an AI assistant.</div>");
        let blocks: Vec<NodeRef<'_>> = doc.select("div").nodes().to_vec();

        assert_eq!(
            version_label(Platform::Claude, Some("Chat - Claude 3.5 Sonnet"), &blocks),
            "Claude 3.5"
        );
        assert_eq!(version_label(Platform::Claude, Some("New chat"), &blocks), "Claude 3");
        assert_eq!(version_label::<NodeRef<'_>>(Platform::Claude, None, &[]), "Claude");
        assert_eq!(version_label(Platform::ChatGpt, Some("Claude 3"), &blocks), "ChatGPT");
    }

    #[test]
    fn test_gemini_has_no_profile() {
        let options = Options::for_url("https://gemini.google.com/app/1");
        let err = extract_transcript("<div><p>a</p><p>b</p></div>", &options).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform(Platform::Gemini)));
    }
}
