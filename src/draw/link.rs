//! Link text: paragraph drawing with a clickable overlay per line.

use super::text::{draw_text_with, TextOptions};
use super::LinkTextContext;
use crate::report::LinkFailure;
use folio_layout::LayoutError;
use folio_render_core::{AnnotationError, LinkTarget, StrokeStyle};
use folio_types::{PageHandle, Point, Rect};
use log::warn;

#[derive(Debug, Clone, Default)]
pub struct LinkTextOptions {
    /// Displayed text; the URL itself when unset.
    pub label: Option<String>,
    pub text: TextOptions,
    pub underline: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkResult {
    /// One clickable region per drawn line, on the page the line landed on.
    pub rects: Vec<(PageHandle, Rect)>,
    pub height: f32,
    pub failures: Vec<AnnotationError>,
}

/// Draws `url` (or the label) and registers one annotation per line.
///
/// Rejected annotations are logged and reported; the text is drawn either
/// way. `#id` targets become internal links.
pub fn draw_link_text<C>(ctx: &mut C, url: &str, opts: &LinkTextOptions) -> Result<LinkResult, LayoutError>
where
    C: LinkTextContext + ?Sized,
{
    let target = LinkTarget::from_href(url);
    let label = opts.label.as_deref().unwrap_or(url);
    let mut rects = Vec::new();
    let mut failures = Vec::new();

    let result = draw_text_with(ctx, label, &opts.text, |ctx, line| {
        if line.text.is_empty() {
            return;
        }
        if opts.underline {
            let color = opts.text.color.unwrap_or(ctx.canvas().color);
            let y = ctx.to_page_y(line.baseline) + line.size * 0.12;
            let stroke = StrokeStyle::solid((line.size * 0.05).max(0.5), color);
            ctx.stroke_line(
                Point::new(line.rect.x, y),
                Point::new(line.rect.right(), y),
                &stroke,
            );
        }

        rects.push((line.page, line.rect));
        if let Err(err) = ctx.add_link(line.page, line.rect, &target) {
            warn!(
                "Link to '{}' on {} (line {}) is not clickable: {}",
                url, line.page, line.index, err
            );
            ctx.report_link_failure(LinkFailure {
                href: url.to_string(),
                page: line.page,
                line: line.index,
                reason: err.clone(),
            });
            failures.push(err);
        }
    })?;

    Ok(LinkResult {
        rects,
        height: result.height,
        failures,
    })
}
