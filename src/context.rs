//! The owned state of one draw pass.
//!
//! A [`LayoutContext`] bundles the backend, the page cursor, the resolved
//! fonts and the current canvas defaults. Drawers never see it directly; they
//! take `&mut impl` of the narrow context traits in [`crate::draw`], all of
//! which it implements.

use crate::draw::{
    BoxContext, CursorContext, ImageContext, LinkRectContext, LinkTextContext, RuleContext,
    TextContext,
};
use crate::options::{Align, Theme};
use crate::report::{BuildReport, LinkFailure};
use folio_layout::{ContentArea, FontRole, FontSet, LayoutError, PageCursor};
use folio_render_core::{
    AnnotationError, AnnotationId, BackendOutput, DocumentBackend, DocumentInfo, GlyphRun,
    ImageObject, LinkTarget, OutlineEntry, RenderError, StrokeStyle,
};
use folio_types::{to_page_y, AnchorId, Color, Margins, PageHandle, Point, Rect, Size};
use log::{debug, warn};
use std::sync::Arc;

/// Defaults drawers fall back to when their options leave a field unset.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub font: FontRole,
    pub size: f32,
    pub color: Color,
    pub align: Align,
    pub line_height: f32,
    /// While set, horizontal layout is confined to this rect's x and width.
    pub region: Option<Rect>,
}

impl CanvasState {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            font: FontRole::Regular,
            size: theme.body_size,
            color: theme.text_color,
            align: Align::Left,
            line_height: theme.line_height,
            region: None,
        }
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

pub struct LayoutContext {
    backend: Box<dyn DocumentBackend>,
    cursor: PageCursor,
    page: PageHandle,
    fonts: FontSet,
    canvas: CanvasState,
    report: BuildReport,
}

impl LayoutContext {
    /// Starts the document on `backend` and places the cursor on page one.
    pub fn new(
        mut backend: Box<dyn DocumentBackend>,
        fonts: FontSet,
        page_size: Size,
        margins: &Margins,
        canvas: CanvasState,
        info: &DocumentInfo,
    ) -> Result<Self, LayoutError> {
        let mut cursor = PageCursor::new(page_size, margins)?;
        backend.begin(&fonts, info);
        let page = backend.add_page(page_size);
        cursor.start_page(page);
        Ok(Self {
            backend,
            cursor,
            page,
            fonts,
            canvas,
            report: BuildReport::default(),
        })
    }

    /// Forces a page break and returns the new page.
    pub fn add_page(&mut self) -> PageHandle {
        let page = self.backend.add_page(self.cursor.page_size());
        self.cursor.start_page(page);
        self.page = page;
        debug!("Explicit page break to {}", page);
        page
    }

    pub fn is_at_page_top(&self) -> bool {
        self.cursor.is_at_page_top()
    }

    pub fn area(&self) -> &ContentArea {
        self.cursor.area()
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasState {
        &mut self.canvas
    }

    pub fn report_mut(&mut self) -> &mut BuildReport {
        &mut self.report
    }

    /// Runs `f` with horizontal layout confined to `region`, restoring the
    /// previous region afterwards.
    pub fn with_region<R>(&mut self, region: Rect, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.canvas.region.replace(region);
        let result = f(self);
        self.canvas.region = previous;
        result
    }

    /// Records a destination at the current cursor position.
    pub fn define_anchor(&mut self, anchor: &AnchorId) {
        let y = self.to_page_y(self.cursor.y());
        self.backend.define_anchor(anchor, self.page, y);
    }

    pub fn add_outline_entry(&mut self, entry: OutlineEntry) {
        self.backend.add_outline_entry(entry);
    }

    /// Finishes the backend and hands back its output with the build report.
    pub fn finish(self) -> Result<(BackendOutput, BuildReport), RenderError> {
        let mut report = self.report;
        let output = self.backend.finish()?;
        for anchor in &output.dangling_links {
            warn!("Internal link to '#{}' has no matching anchor", anchor);
            report.dangling_anchors.push(anchor.to_string());
        }
        Ok((output, report))
    }

    fn page_rect(&self, rect: Rect) -> folio_types::PageRect {
        rect.to_page_rect(self.page_height())
    }
}

impl CursorContext for LayoutContext {
    fn cursor_y(&self) -> f32 {
        self.cursor.y()
    }

    fn page(&self) -> PageHandle {
        self.page
    }

    fn page_height(&self) -> f32 {
        self.cursor.page_size().height
    }

    fn content_left(&self) -> f32 {
        self.canvas.region.map_or(self.cursor.area().left, |r| r.x)
    }

    fn content_width(&self) -> f32 {
        self.canvas.region.map_or(self.cursor.area().width, |r| r.width)
    }

    fn content_height(&self) -> f32 {
        self.cursor.area().height()
    }

    fn ensure_space(&mut self, height: f32) -> Result<bool, LayoutError> {
        let backend = &mut self.backend;
        let added = self.cursor.ensure_space(height, |size| backend.add_page(size))?;
        if added {
            if let Some(page) = self.cursor.page() {
                self.page = page;
            }
        }
        Ok(added)
    }

    fn move_y(&mut self, dy: f32) {
        self.cursor.advance(dy);
    }

    fn to_page_y(&self, y: f32) -> f32 {
        to_page_y(self.page_height(), y)
    }
}

impl TextContext for LayoutContext {
    fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    fn draw_glyph_run(&mut self, run: &GlyphRun<'_>) {
        self.backend.draw_glyph_run(self.page, run);
    }

    fn fill_line_background(&mut self, rect: Rect, color: Color) {
        let rect = self.page_rect(rect);
        self.backend.fill_rect(self.page, rect, &color);
    }
}

impl BoxContext for LayoutContext {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if color.is_transparent() {
            return;
        }
        let rect = self.page_rect(rect);
        self.backend.fill_rect(self.page, rect, &color);
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) {
        let rect = self.page_rect(rect);
        self.backend.stroke_rect(self.page, rect, stroke);
    }
}

impl RuleContext for LayoutContext {
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeStyle) {
        let from = Point::new(from.x, self.to_page_y(from.y));
        let to = Point::new(to.x, self.to_page_y(to.y));
        self.backend.stroke_line(self.page, from, to, stroke);
    }
}

impl ImageContext for LayoutContext {
    fn draw_image(&mut self, image: &Arc<ImageObject>, rect: Rect, clip: Option<Rect>) {
        let rect = self.page_rect(rect);
        let clip = clip.map(|c| self.page_rect(c));
        self.backend.draw_image(self.page, image, rect, clip);
    }
}

impl LinkRectContext for LayoutContext {
    fn add_link(
        &mut self,
        page: PageHandle,
        rect: Rect,
        target: &LinkTarget,
    ) -> Result<AnnotationId, AnnotationError> {
        let height = self
            .backend
            .page_size(page)
            .ok_or(AnnotationError::UnknownPage(page))?
            .height;
        self.backend.add_link(page, rect.to_page_rect(height), target)
    }
}

impl LinkTextContext for LayoutContext {
    fn report_link_failure(&mut self, failure: LinkFailure) {
        self.report.non_clickable_links.push(failure);
    }
}
