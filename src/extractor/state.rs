//! Per-run render state.
//!
//! The only mutable state of a render run is the set of image sources
//! already emitted. It lives in `RenderContext`, which is created for (or
//! reset at the start of) every extraction run and threaded through the
//! renderer explicitly.

use std::collections::HashSet;

use crate::result::ImageRecord;
use crate::selector::SelectorProfile;

/// Tracks emitted images and carries the settings the renderer needs.
#[derive(Debug)]
pub struct RenderContext<'p> {
    profile: &'p SelectorProfile,
    max_depth: usize,

    /// `src` values already rendered in this run.
    seen_images: HashSet<String>,

    /// Emitted images in order.
    images: Vec<ImageRecord>,
}

impl<'p> RenderContext<'p> {
    /// Create a fresh context.
    #[must_use]
    pub fn new(profile: &'p SelectorProfile, max_depth: usize) -> Self {
        Self {
            profile,
            max_depth,
            seen_images: HashSet::new(),
            images: Vec::new(),
        }
    }

    /// Forget every image seen so far. Called at the start of each run.
    pub fn reset(&mut self) {
        self.seen_images.clear();
        self.images.clear();
    }

    /// Profile in effect.
    #[must_use]
    pub fn profile(&self) -> &'p SelectorProfile {
        self.profile
    }

    /// Recursion limit for the renderer.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether `src` was already emitted in this run.
    #[must_use]
    pub fn is_seen(&self, src: &str) -> bool {
        self.seen_images.contains(src)
    }

    /// Record an emitted image. Returns `false` if its source was already seen.
    pub fn record_image(&mut self, record: ImageRecord) -> bool {
        if !self.seen_images.insert(record.source_url.clone()) {
            return false;
        }
        self.images.push(record);
        true
    }

    /// Number of distinct image sources emitted.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.seen_images.len()
    }

    /// Emitted images in order.
    #[must_use]
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }
}
