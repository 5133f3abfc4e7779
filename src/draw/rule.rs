use super::RuleContext;
use crate::blocks::RuleStyle;
use crate::options::Align;
use folio_layout::LayoutError;
use folio_render_core::StrokeStyle;
use folio_types::{Color, Point};

/// Number of strokes a gradient rule is approximated with.
pub const GRADIENT_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOptions {
    pub thickness: f32,
    pub color: Color,
    /// Gradient end colour; `color` when unset.
    pub end_color: Option<Color>,
    pub spacing_before: f32,
    pub spacing_after: f32,
    /// Content width when unset.
    pub width: Option<f32>,
    pub align: Align,
    pub style: RuleStyle,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: Color::gray(0xd0),
            end_color: None,
            spacing_before: 6.0,
            spacing_after: 6.0,
            width: None,
            align: Align::Left,
            style: RuleStyle::Solid,
        }
    }
}

impl RuleOptions {
    /// Vertical space the stroke itself occupies.
    fn band(&self) -> f32 {
        match self.style {
            RuleStyle::Double => self.thickness * 3.0,
            RuleStyle::Thick => self.thickness * 3.0,
            _ => self.thickness,
        }
    }
}

/// Draws a horizontal rule and returns the vertical advance.
pub fn draw_rule<C>(ctx: &mut C, opts: &RuleOptions) -> Result<f32, LayoutError>
where
    C: RuleContext + ?Sized,
{
    if !opts.thickness.is_finite() || opts.thickness <= 0.0 {
        return Err(LayoutError::InvalidHeight(opts.thickness));
    }
    let band = opts.band();
    let height = opts.spacing_before + band + opts.spacing_after;
    ctx.ensure_space(height.min(ctx.content_height()))?;

    let available = ctx.content_width();
    let width = opts.width.map_or(available, |w| w.clamp(0.0, available));
    let left = ctx.content_left()
        + match opts.align {
            Align::Left => 0.0,
            Align::Center => (available - width) / 2.0,
            Align::Right => available - width,
        };
    let right = left + width;
    let top = ctx.cursor_y() + opts.spacing_before;
    let mid = top + band / 2.0;
    let t = opts.thickness;

    match opts.style {
        RuleStyle::Solid => {
            ctx.stroke_line(Point::new(left, mid), Point::new(right, mid), &StrokeStyle::solid(t, opts.color));
        }
        RuleStyle::Thick => {
            let stroke = StrokeStyle::solid(band, opts.color);
            ctx.stroke_line(Point::new(left, mid), Point::new(right, mid), &stroke);
        }
        RuleStyle::Dashed => {
            let stroke = StrokeStyle::solid(t, opts.color).dashed((t * 4.0).max(3.0), (t * 3.0).max(2.0));
            ctx.stroke_line(Point::new(left, mid), Point::new(right, mid), &stroke);
        }
        RuleStyle::Dotted => {
            let stroke = StrokeStyle::solid(t, opts.color)
                .dashed(0.0, (t * 2.0).max(2.0))
                .round_cap();
            ctx.stroke_line(Point::new(left, mid), Point::new(right, mid), &stroke);
        }
        RuleStyle::Double => {
            let stroke = StrokeStyle::solid(t, opts.color);
            for y in [top + t / 2.0, top + band - t / 2.0] {
                ctx.stroke_line(Point::new(left, y), Point::new(right, y), &stroke);
            }
        }
        RuleStyle::Gradient => {
            let end = opts.end_color.unwrap_or(opts.color);
            let step = width / GRADIENT_SEGMENTS as f32;
            for i in 0..GRADIENT_SEGMENTS {
                let t_mix = i as f32 / (GRADIENT_SEGMENTS - 1) as f32;
                let stroke = StrokeStyle::solid(t, opts.color.lerp(&end, t_mix));
                let x0 = left + step * i as f32;
                ctx.stroke_line(Point::new(x0, mid), Point::new(x0 + step, mid), &stroke);
            }
        }
    }

    ctx.move_y(height);
    Ok(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CanvasState, LayoutContext};
    use crate::draw::CursorContext;
    use folio_layout::FontSet;
    use folio_render_core::{DocumentInfo, RecordedOp, RecordingBackend, RecordingLog};
    use folio_types::{mm, Margins, PageSize};

    fn context() -> (LayoutContext, RecordingLog) {
        let (backend, log) = RecordingBackend::new();
        let ctx = LayoutContext::new(
            Box::new(backend),
            FontSet::sans(),
            PageSize::A4.size(),
            &Margins::all(mm(20.0)),
            CanvasState::default(),
            &DocumentInfo::default(),
        )
        .unwrap();
        (ctx, log)
    }

    fn lines(log: &RecordingLog) -> Vec<(Point, Point, StrokeStyle)> {
        log.snapshot()
            .ops
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Line { from, to, stroke, .. } => Some((from, to, stroke)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn solid_rule_spans_content_width_and_advances() {
        let (mut ctx, log) = context();
        let start = ctx.cursor_y();
        let height = draw_rule(&mut ctx, &RuleOptions::default()).unwrap();
        assert!((height - 13.0).abs() < 1e-4);
        assert!((ctx.cursor_y() - start - 13.0).abs() < 1e-4);
        let drawn = lines(&log);
        assert_eq!(drawn.len(), 1);
        assert!((drawn[0].0.x - ctx.content_left()).abs() < 1e-4);
        assert!((drawn[0].1.x - (ctx.content_left() + ctx.content_width())).abs() < 1e-3);
    }

    #[test]
    fn gradient_interpolates_between_colors() {
        let (mut ctx, log) = context();
        let opts = RuleOptions {
            style: RuleStyle::Gradient,
            color: Color::rgb(0, 0, 0),
            end_color: Some(Color::rgb(255, 0, 0)),
            width: Some(320.0),
            align: Align::Center,
            ..Default::default()
        };
        draw_rule(&mut ctx, &opts).unwrap();
        let drawn = lines(&log);
        assert_eq!(drawn.len(), GRADIENT_SEGMENTS);
        assert_eq!(drawn[0].2.color, Color::rgb(0, 0, 0));
        assert_eq!(drawn[GRADIENT_SEGMENTS - 1].2.color, Color::rgb(255, 0, 0));
        let left = ctx.content_left() + (ctx.content_width() - 320.0) / 2.0;
        assert!((drawn[0].0.x - left).abs() < 1e-3);
        assert!((drawn[GRADIENT_SEGMENTS - 1].1.x - (left + 320.0)).abs() < 1e-3);
    }

    #[test]
    fn double_and_dotted_styles() {
        let (mut ctx, log) = context();
        draw_rule(&mut ctx, &RuleOptions { style: RuleStyle::Double, ..Default::default() }).unwrap();
        draw_rule(&mut ctx, &RuleOptions { style: RuleStyle::Dotted, ..Default::default() }).unwrap();
        let drawn = lines(&log);
        assert_eq!(drawn.len(), 3);
        assert!(drawn[0].0.y > drawn[1].0.y);
        assert!(drawn[2].2.dash.is_some());
    }
}
