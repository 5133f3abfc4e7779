use crate::annotation::{AnnotationError, AnnotationId, LinkTarget};
use crate::error::RenderError;
use crate::image::ImageObject;
use crate::types::{BackendOutput, DocumentInfo, GlyphRun, OutlineEntry, StrokeStyle};
use folio_layout::FontSet;
use folio_types::{AnchorId, Color, PageHandle, PageRect, Point, Size};
use std::sync::Arc;

/// The drawing primitives layout drives a page description format through.
///
/// All coordinates are in page (bottom-up) points. Drawing primitives are
/// infallible: a backend that cannot honour one logs it. Link creation
/// returns an explicit result so callers can report non-clickable links.
pub trait DocumentBackend: Send {
    fn begin(&mut self, fonts: &FontSet, info: &DocumentInfo);

    fn add_page(&mut self, size: Size) -> PageHandle;

    fn page_count(&self) -> usize;

    fn page_size(&self, page: PageHandle) -> Option<Size>;

    fn draw_glyph_run(&mut self, page: PageHandle, run: &GlyphRun<'_>);

    fn fill_rect(&mut self, page: PageHandle, rect: PageRect, color: &Color);

    fn stroke_rect(&mut self, page: PageHandle, rect: PageRect, stroke: &StrokeStyle);

    fn stroke_line(&mut self, page: PageHandle, from: Point, to: Point, stroke: &StrokeStyle);

    /// Places `image` stretched over `rect`, optionally clipped to `clip`.
    fn draw_image(
        &mut self,
        page: PageHandle,
        image: &Arc<ImageObject>,
        rect: PageRect,
        clip: Option<PageRect>,
    );

    fn add_link(
        &mut self,
        page: PageHandle,
        rect: PageRect,
        target: &LinkTarget,
    ) -> Result<AnnotationId, AnnotationError>;

    /// Records an internal destination at `y` (page coordinates) on `page`.
    fn define_anchor(&mut self, anchor: &AnchorId, page: PageHandle, y: f32);

    fn add_outline_entry(&mut self, entry: OutlineEntry);

    fn finish(self: Box<Self>) -> Result<BackendOutput, RenderError>;
}
