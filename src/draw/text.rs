//! The paragraph drawer: wrap, paginate line by line, draw.

use super::TextContext;
use crate::options::Align;
use folio_layout::{
    measure_and_wrap, FontFace, FontRole, LayoutError, TextMetricsRequest, WrappedLine, WrappedText,
};
use folio_render_core::GlyphRun;
use folio_types::{Color, PageHandle, Rect};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub font: Option<FontRole>,
    pub size: Option<f32>,
    pub color: Option<Color>,
    pub align: Option<Align>,
    /// Multiplier of the font size.
    pub line_height: Option<f32>,
    pub max_width: Option<f32>,
    /// Left edge; the content box's left edge when unset.
    pub x: Option<f32>,
    /// Extra offset of the first line only.
    pub indent: f32,
    pub spacing_before: f32,
    pub spacing_after: f32,
    /// Filled behind every line across the full max width.
    pub background: Option<Color>,
    /// How far the background extends past both sides of the text column.
    pub background_bleed: f32,
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: FontRole) -> Self {
        self.font = Some(font);
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn line_height(mut self, multiplier: f32) -> Self {
        self.line_height = Some(multiplier);
        self
    }

    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn background(mut self, color: Color, bleed: f32) -> Self {
        self.background = Some(color);
        self.background_bleed = bleed;
        self
    }
}

/// Where one wrapped line landed. Passed to the per-line callback before the
/// cursor moves past the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlacement<'a> {
    pub page: PageHandle,
    /// Top-down box of the drawn text: its measured width, one line pitch tall.
    pub rect: Rect,
    /// Baseline in page (bottom-up) coordinates.
    pub baseline: f32,
    pub size: f32,
    pub index: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextResult {
    /// Total vertical advance, spacing included.
    pub height: f32,
    pub lines: Vec<WrappedLine>,
    pub line_height_px: f32,
}

/// Options with every canvas default applied.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedText {
    pub face: FontFace,
    pub font: FontRole,
    pub size: f32,
    pub color: Color,
    pub align: Align,
    pub line_height: f32,
    pub left: f32,
    pub max_width: f32,
}

impl ResolvedText {
    pub(crate) fn resolve<C: TextContext + ?Sized>(ctx: &C, opts: &TextOptions) -> Self {
        let canvas = ctx.canvas();
        let font = opts.font.unwrap_or(canvas.font);
        let content_right = ctx.content_left() + ctx.content_width();
        let left = opts.x.unwrap_or_else(|| ctx.content_left());
        let available = content_right - left;
        Self {
            face: *ctx.fonts().face(font),
            font,
            size: opts.size.unwrap_or(canvas.size),
            color: opts.color.unwrap_or(canvas.color),
            align: opts.align.unwrap_or(canvas.align),
            line_height: opts.line_height.unwrap_or(canvas.line_height),
            left,
            max_width: opts.max_width.map_or(available, |w| w.min(available)),
        }
    }

    pub(crate) fn request(&self, indent: f32) -> TextMetricsRequest<'_> {
        TextMetricsRequest::new(&self.face, self.size, self.max_width)
            .line_height(self.line_height)
            .first_line_indent(indent)
    }

    fn line_x(&self, line: &WrappedLine, first: bool, indent: f32) -> f32 {
        match self.align {
            Align::Left if first => self.left + indent,
            Align::Left => self.left,
            Align::Center => self.left + (self.max_width - line.width) / 2.0,
            Align::Right => self.left + self.max_width - line.width,
        }
    }

    /// Top-down baseline of a line whose box starts at `top`.
    fn baseline(&self, top: f32, line_height_px: f32) -> f32 {
        let half_leading = (line_height_px - self.size) / 2.0;
        top + half_leading + self.face.ascent(self.size)
    }
}

pub fn draw_text<C>(ctx: &mut C, text: &str, opts: &TextOptions) -> Result<TextResult, LayoutError>
where
    C: TextContext + ?Sized,
{
    draw_text_with(ctx, text, opts, |_, _| {})
}

/// Wraps and draws `text`, calling `on_line` once per placed line.
///
/// Each line gets its own `ensure_space`, so a paragraph flows across as many
/// pages as it needs and `on_line` always sees the page the line was drawn on.
pub fn draw_text_with<C, F>(
    ctx: &mut C,
    text: &str,
    opts: &TextOptions,
    on_line: F,
) -> Result<TextResult, LayoutError>
where
    C: TextContext + ?Sized,
    F: FnMut(&mut C, &LinePlacement<'_>),
{
    let resolved = ResolvedText::resolve(ctx, opts);
    let wrapped = measure_and_wrap(text, &resolved.request(opts.indent))?;
    draw_wrapped_with(ctx, wrapped, opts, on_line)
}

/// Draws lines that were already wrapped, e.g. preformatted code.
pub fn draw_wrapped_with<C, F>(
    ctx: &mut C,
    wrapped: WrappedText,
    opts: &TextOptions,
    mut on_line: F,
) -> Result<TextResult, LayoutError>
where
    C: TextContext + ?Sized,
    F: FnMut(&mut C, &LinePlacement<'_>),
{
    let resolved = ResolvedText::resolve(ctx, opts);
    let line_height_px = wrapped.line_height_px;

    ctx.move_y(opts.spacing_before);
    for (index, line) in wrapped.lines.iter().enumerate() {
        ctx.ensure_space(line_height_px)?;
        let top = ctx.cursor_y();
        if let Some(background) = opts.background {
            let bleed = opts.background_bleed;
            ctx.fill_line_background(
                Rect::new(
                    resolved.left - bleed,
                    top,
                    resolved.max_width + 2.0 * bleed,
                    line_height_px,
                ),
                background,
            );
        }

        let x = resolved.line_x(line, index == 0, opts.indent);
        let baseline = ctx.to_page_y(resolved.baseline(top, line_height_px));
        if !line.text.is_empty() {
            ctx.draw_glyph_run(&GlyphRun {
                text: &line.text,
                font: resolved.font,
                size: resolved.size,
                color: resolved.color,
                x,
                baseline,
            });
        }

        let placement = LinePlacement {
            page: ctx.page(),
            rect: Rect::new(x, top, line.width, line_height_px),
            baseline,
            size: resolved.size,
            index,
            text: &line.text,
        };
        on_line(ctx, &placement);
        ctx.move_y(line_height_px);
    }
    ctx.move_y(opts.spacing_after);

    Ok(TextResult {
        height: opts.spacing_before + wrapped.total_height + opts.spacing_after,
        lines: wrapped.lines,
        line_height_px,
    })
}

/// Draws pre-wrapped lines starting at `top` without consulting or moving
/// the cursor. Callers reserve the space first (table cells, message boxes).
pub fn place_lines<C>(ctx: &mut C, wrapped: &WrappedText, top: f32, opts: &TextOptions)
where
    C: TextContext + ?Sized,
{
    let resolved = ResolvedText::resolve(ctx, opts);
    for (index, line) in wrapped.lines.iter().enumerate() {
        if line.text.is_empty() {
            continue;
        }
        let line_top = top + index as f32 * wrapped.line_height_px;
        let baseline = ctx.to_page_y(resolved.baseline(line_top, wrapped.line_height_px));
        let x = resolved.line_x(line, index == 0, opts.indent);
        ctx.draw_glyph_run(&GlyphRun {
            text: &line.text,
            font: resolved.font,
            size: resolved.size,
            color: resolved.color,
            x,
            baseline,
        });
    }
}
