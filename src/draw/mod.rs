//! Drawers: stateless functions that place one kind of content through a
//! narrow context trait.
//!
//! Every trait works in top-down layout coordinates except [`GlyphRun`],
//! whose baseline the text drawer converts with [`CursorContext::to_page_y`].

pub mod image;
pub mod link;
pub mod rule;
pub mod shape;
pub mod text;

pub use self::image::{draw_image, fit_image, FittedImage, ImageOptions, ImagePlacement};
pub use self::link::{draw_link_text, LinkResult, LinkTextOptions};
pub use self::rule::{draw_rule, RuleOptions, GRADIENT_SEGMENTS};
pub use self::shape::{draw_box, BoxPlacement, BoxSpec, BoxStyle};
pub use self::text::{
    draw_text, draw_text_with, draw_wrapped_with, place_lines, LinePlacement, TextOptions,
    TextResult,
};

use crate::context::CanvasState;
use crate::report::LinkFailure;
use folio_layout::{FontSet, LayoutError};
use folio_render_core::{AnnotationError, AnnotationId, GlyphRun, ImageObject, LinkTarget, StrokeStyle};
use folio_types::{Color, PageHandle, Point, Rect};
use std::sync::Arc;

/// Vertical position and the horizontal content box of the current page.
pub trait CursorContext {
    fn cursor_y(&self) -> f32;

    fn page(&self) -> PageHandle;

    fn page_height(&self) -> f32;

    /// Left edge of the active region, or of the page's content area.
    fn content_left(&self) -> f32;

    fn content_width(&self) -> f32;

    /// Height of the whole content area; the tallest region that can fit.
    fn content_height(&self) -> f32;

    /// Breaks to a new page unless `height` fits below the cursor.
    fn ensure_space(&mut self, height: f32) -> Result<bool, LayoutError>;

    fn move_y(&mut self, dy: f32);

    fn to_page_y(&self, y: f32) -> f32;
}

pub trait TextContext: CursorContext {
    fn fonts(&self) -> &FontSet;

    fn canvas(&self) -> &CanvasState;

    fn draw_glyph_run(&mut self, run: &GlyphRun<'_>);

    fn fill_line_background(&mut self, rect: Rect, color: Color);
}

pub trait BoxContext: CursorContext {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle);
}

pub trait RuleContext: CursorContext {
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeStyle);
}

pub trait ImageContext: CursorContext {
    /// Stretches `image` over `rect`, clipped to `clip` when given.
    fn draw_image(&mut self, image: &Arc<ImageObject>, rect: Rect, clip: Option<Rect>);
}

pub trait LinkRectContext {
    /// Registers a clickable region on `page`, which need not be the current one.
    fn add_link(
        &mut self,
        page: PageHandle,
        rect: Rect,
        target: &LinkTarget,
    ) -> Result<AnnotationId, AnnotationError>;
}

pub trait LinkTextContext: TextContext + LinkRectContext + RuleContext {
    fn report_link_failure(&mut self, failure: LinkFailure);
}
