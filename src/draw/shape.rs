use super::BoxContext;
use folio_layout::LayoutError;
use folio_render_core::StrokeStyle;
use folio_types::{Color, PageHandle, Rect};

/// Geometry of a box in the flow. `x` and `width` default to the content box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSpec {
    pub x: Option<f32>,
    pub width: Option<f32>,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub padding: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPlacement {
    pub outer: Rect,
    /// `outer` inset by the padding.
    pub content: Rect,
    pub page: PageHandle,
}

/// Reserves the box's full height, fills it, then strokes it. The cursor is
/// left at the box top so the caller can draw content into it first.
pub fn draw_box<C>(ctx: &mut C, spec: &BoxSpec, style: &BoxStyle) -> Result<BoxPlacement, LayoutError>
where
    C: BoxContext + ?Sized,
{
    if !spec.height.is_finite() || spec.height < 0.0 {
        return Err(LayoutError::InvalidHeight(spec.height));
    }
    ctx.ensure_space(spec.height)?;

    let x = spec.x.unwrap_or_else(|| ctx.content_left());
    let width = spec.width.unwrap_or_else(|| ctx.content_width());
    if !width.is_finite() || width <= 0.0 {
        return Err(LayoutError::InvalidWidth(width));
    }
    let outer = Rect::new(x, ctx.cursor_y(), width, spec.height);

    if let Some(fill) = style.fill {
        ctx.fill_rect(outer, fill);
    }
    if let Some(stroke) = style.stroke {
        if style.stroke_width > 0.0 {
            ctx.stroke_rect(outer, &StrokeStyle::solid(style.stroke_width, stroke));
        }
    }

    Ok(BoxPlacement {
        outer,
        content: outer.inset(style.padding),
        page: ctx.page(),
    })
}
