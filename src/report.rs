//! Degradations a build survived: they never fail the build, but callers
//! may want to surface them.

use folio_render_core::AnnotationError;
use folio_types::PageHandle;

/// A link whose text rendered but whose annotation was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkFailure {
    pub href: String,
    pub page: PageHandle,
    pub line: usize,
    pub reason: AnnotationError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub non_clickable_links: Vec<LinkFailure>,
    /// Internal `#id` links whose anchor was never defined.
    pub dangling_anchors: Vec<String>,
    /// Image sources replaced by a placeholder.
    pub missing_images: Vec<String>,
    /// Blocks drawn as an "unsupported" placeholder.
    pub placeholders: Vec<String>,
    /// Blocks intentionally left out of the PDF (audio, video).
    pub skipped_blocks: Vec<String>,
    /// Table rows cut to fit a single page.
    pub truncated_rows: usize,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.non_clickable_links.is_empty()
            && self.dangling_anchors.is_empty()
            && self.missing_images.is_empty()
            && self.placeholders.is_empty()
            && self.truncated_rows == 0
    }

    pub fn merge(&mut self, other: BuildReport) {
        self.non_clickable_links.extend(other.non_clickable_links);
        self.dangling_anchors.extend(other.dangling_anchors);
        self.missing_images.extend(other.missing_images);
        self.placeholders.extend(other.placeholders);
        self.skipped_blocks.extend(other.skipped_blocks);
        self.truncated_rows += other.truncated_rows;
    }
}
