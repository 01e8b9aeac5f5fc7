//! Image resolution and generated-image containers.
//!
//! Image generation UIs stack several `<img>` layers (blurred previews under
//! the final render) inside one container. Containers are detected here and
//! only the best layer is emitted.

use tracing::debug;

use super::state::RenderContext;
use crate::dom::DomNode;
use crate::result::ImageRecord;
use crate::url_utils::{image_id_from_url, is_allowed_image_source};

/// Class carried by ChatGPT's image generation wrapper.
const IMAGEGEN_CLASS: &str = "group/imagegen-image";

/// Parent classes of the top image layer.
const TOP_LAYER_CLASSES: [&str; 2] = ["z-1", "z-2"];

/// Opacity above which a layer counts as visible.
const VISIBLE_OPACITY: f32 = 0.8;

/// Render an `<img>` as a Markdown fragment, or `""` if it is skipped.
///
/// Skipped: no `src`, already emitted in this run, `data:` URIs, and hosts
/// outside the profile's allow-list.
pub fn resolve<N: DomNode>(img: &N, ctx: &mut RenderContext<'_>) -> String {
    let Some(src) = img.attr("src").filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };

    if ctx.is_seen(&src) {
        return String::new();
    }

    if !is_allowed_image_source(&src, &ctx.profile().image_domains) {
        debug!(src = %truncate(&src, 50), "skipping UI image");
        return String::new();
    }

    let alt = img
        .attr("alt")
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| ctx.profile().default_image_alt.clone());
    let id = image_id_from_url(&src);
    let fragment = image_markdown(&alt, &id, &src);

    debug!(src = %truncate(&src, 50), id = %id, "processing image");
    ctx.record_image(ImageRecord {
        source_url: src,
        id,
        alt,
    });

    fragment
}

/// The Markdown image fragment with its provenance comment.
#[must_use]
pub fn image_markdown(alt: &str, id: &str, url: &str) -> String {
    format!("\n\n![{alt} (ID: {id})]({url}) <!-- Image URI: {url} | Image ID: {id} -->\n\n")
}

/// Whether `node` wraps generated image layers.
pub fn is_image_container<N: DomNode>(node: &N) -> bool {
    if node.has_class(IMAGEGEN_CLASS) || node.style_property("aspect-ratio").is_some() {
        return true;
    }

    node.is_tag("div")
        && node
            .attr("class")
            .is_some_and(|class| class.contains("grid") && class.contains("pb-2"))
}

/// Pick the visible layer among a container's images.
///
/// Preferred: an image whose parent is not blurred and is either on a top
/// z-layer or nearly opaque. Otherwise the first image.
pub fn best_image<N: DomNode>(container: &N) -> Option<N> {
    let images = container.query_selector_all("img").ok()?;

    images
        .iter()
        .find(|img| img.parent().is_some_and(|parent| is_visible_layer(&parent)))
        .or_else(|| images.first())
        .cloned()
}

fn is_visible_layer<N: DomNode>(parent: &N) -> bool {
    let blurred = parent
        .style_property("filter")
        .is_some_and(|f| f.contains("blur"))
        || parent.attr("class").is_some_and(|c| c.contains("blur"));
    if blurred {
        return false;
    }

    let top_layer = TOP_LAYER_CLASSES.iter().any(|class| parent.has_class(class));
    let opaque = parent
        .style_property("opacity")
        .and_then(|o| o.parse::<f32>().ok())
        .is_some_and(|o| o > VISIBLE_OPACITY);

    top_layer || opaque
}

/// Render the best image of a container, `None` if it holds no image.
pub fn render_container<N: DomNode>(container: &N, ctx: &mut RenderContext<'_>) -> Option<String> {
    let img = best_image(container)?;
    Some(resolve(&img, ctx))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, Document, NodeRef};
    use crate::selector::SelectorProfile;

    fn first<'a>(doc: &'a Document, css: &str) -> NodeRef<'a> {
        doc.select(css).nodes()[0]
    }

    #[test]
    fn test_resolve_format() {
        let doc = dom::parse(r#"<img src="https://files.oaiusercontent.com/file-AbC" alt="A cat">"#);
        let profile = SelectorProfile::chatgpt();
        let mut ctx = RenderContext::new(&profile, 64);

        let md = resolve(&first(&doc, "img"), &mut ctx);
        assert_eq!(
            md,
            "\n\n![A cat (ID: file-AbC)](https://files.oaiusercontent.com/file-AbC) <!-- Image URI: https://files.oaiusercontent.com/file-AbC | Image ID: file-AbC -->\n\n"
        );
        assert_eq!(ctx.images()[0].alt, "A cat");
    }

    #[test]
    fn test_resolve_default_alt_and_dedup() {
        let doc = dom::parse(r#"<img src="https://oaiusercontent.com/u1">"#);
        let profile = SelectorProfile::chatgpt();
        let mut ctx = RenderContext::new(&profile, 64);
        let img = first(&doc, "img");

        assert!(resolve(&img, &mut ctx).contains("![Generated image (ID: u1)]"));
        assert_eq!(resolve(&img, &mut ctx), "");
        assert_eq!(ctx.image_count(), 1);
    }

    #[test]
    fn test_resolve_rejects_foreign_and_data() {
        let doc = dom::parse(
            r#"<img id="a" src="https://example.com/icon.png"><img id="b" src="data:image/png;base64,AA"><img id="c">"#,
        );
        let profile = SelectorProfile::chatgpt();
        let mut ctx = RenderContext::new(&profile, 64);

        for css in ["#a", "#b", "#c"] {
            assert_eq!(resolve(&first(&doc, css), &mut ctx), "");
        }
        assert_eq!(ctx.image_count(), 0);
    }

    #[test]
    fn test_container_detection() {
        let doc = dom::parse(
            r#"<div id="a" class="group/imagegen-image"></div>
               <div id="b" style="aspect-ratio: 1 / 1"></div>
               <div id="c" class="grid gap-4 pb-2"></div>
               <span id="d" class="grid pb-2"></span>
               <div id="e" class="flex"></div>"#,
        );

        assert!(is_image_container(&first(&doc, "#a")));
        assert!(is_image_container(&first(&doc, "#b")));
        assert!(is_image_container(&first(&doc, "#c")));
        assert!(!is_image_container(&first(&doc, "#d")));
        assert!(!is_image_container(&first(&doc, "#e")));
    }

    #[test]
    fn test_best_image_skips_blurred_layer() {
        let doc = dom::parse(
            r#"<div class="group/imagegen-image">
                 <div class="z-1" style="filter: blur(8px)"><img src="https://oaiusercontent.com/blurred"></div>
                 <div class="z-2"><img src="https://oaiusercontent.com/final"></div>
               </div>"#,
        );
        let best = best_image(&first(&doc, "div")).unwrap();
        assert_eq!(DomNode::attr(&best, "src").as_deref(), Some("https://oaiusercontent.com/final"));
    }

    #[test]
    fn test_best_image_opacity_and_fallback() {
        let doc = dom::parse(
            r#"<div id="o" style="aspect-ratio: 1">
                 <div style="opacity: 0.5"><img src="https://oaiusercontent.com/faint"></div>
                 <div style="opacity: 1"><img src="https://oaiusercontent.com/opaque"></div>
               </div>
               <div id="f" style="aspect-ratio: 1">
                 <div class="blur"><img src="https://oaiusercontent.com/first"></div>
                 <div><img src="https://oaiusercontent.com/second"></div>
               </div>"#,
        );

        let best = best_image(&first(&doc, "#o")).unwrap();
        assert_eq!(DomNode::attr(&best, "src").as_deref(), Some("https://oaiusercontent.com/opaque"));

        let best = best_image(&first(&doc, "#f")).unwrap();
        assert_eq!(DomNode::attr(&best, "src").as_deref(), Some("https://oaiusercontent.com/first"));
    }

    #[test]
    fn test_render_container_without_images() {
        let doc = dom::parse(r#"<div style="aspect-ratio: 1">no image</div>"#);
        let profile = SelectorProfile::chatgpt();
        let mut ctx = RenderContext::new(&profile, 64);
        assert!(render_container(&first(&doc, "div"), &mut ctx).is_none());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
