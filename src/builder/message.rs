use crate::blocks::{MessageBoxBlock, MessageKind};
use crate::context::LayoutContext;
use crate::draw::{
    draw_box, draw_rule, draw_text, place_lines, BoxContext, BoxSpec, BoxStyle, CursorContext,
    RuleOptions, TextContext, TextOptions,
};
use crate::options::{MessagePalette, Theme};
use folio_layout::{measure_and_wrap, FontRole, LayoutError, TextMetricsRequest};
use folio_types::Rect;
use log::debug;

const PADDING: f32 = 10.0;
const ACCENT_WIDTH: f32 = 4.0;
const TITLE_GAP: f32 = 4.0;

fn palette(theme: &Theme, kind: MessageKind) -> MessagePalette {
    match kind {
        MessageKind::Info => theme.info,
        MessageKind::Success => theme.success,
        MessageKind::Warning => theme.warning,
        MessageKind::Error => theme.error,
    }
}

/// Draws a tinted box with an accent bar. A message too tall for one page
/// degrades to ruled paragraphs so it can flow.
pub(crate) fn draw_message_box(ctx: &mut LayoutContext, theme: &Theme, block: &MessageBoxBlock) -> Result<(), LayoutError> {
    let colors = palette(theme, block.kind);
    let left = ctx.content_left();
    let width = ctx.content_width();
    let inner_x = left + ACCENT_WIDTH + PADDING;
    let inner_width = width - ACCENT_WIDTH - 2.0 * PADDING;

    let fonts = *ctx.fonts();
    let title = match &block.title {
        Some(title) => {
            let req = TextMetricsRequest::new(&fonts.bold, theme.body_size, inner_width).line_height(theme.line_height);
            Some(measure_and_wrap(title, &req)?)
        }
        None => None,
    };
    let req = TextMetricsRequest::new(&fonts.regular, theme.body_size, inner_width).line_height(theme.line_height);
    let body = measure_and_wrap(&block.text, &req)?;

    let title_height = title.as_ref().map_or(0.0, |t| t.total_height + TITLE_GAP);
    let height = 2.0 * PADDING + title_height + body.total_height;
    let spacing = theme.body_size * theme.paragraph_spacing;

    if height > ctx.content_height() {
        debug!("Message box of {:.1}pt does not fit a page; drawing it as paragraphs", height);
        let rule = RuleOptions {
            color: colors.border,
            thickness: 2.0,
            ..Default::default()
        };
        draw_rule(ctx, &rule)?;
        if let Some(text) = &block.title {
            draw_text(ctx, text, &TextOptions::new().font(FontRole::Bold).spacing(0.0, TITLE_GAP))?;
        }
        draw_text(ctx, &block.text, &TextOptions::new())?;
        draw_rule(ctx, &rule)?;
        return Ok(());
    }

    let style = BoxStyle {
        fill: Some(colors.background),
        stroke: Some(colors.border),
        stroke_width: 0.75,
        padding: 0.0,
    };
    let placed = draw_box(ctx, &BoxSpec { height, ..Default::default() }, &style)?;
    ctx.fill_rect(
        Rect::new(placed.outer.x, placed.outer.y, ACCENT_WIDTH, placed.outer.height),
        colors.border,
    );

    let mut top = placed.outer.y + PADDING;
    if let Some(title) = &title {
        let opts = TextOptions::new().x(inner_x).max_width(inner_width).font(FontRole::Bold);
        place_lines(ctx, title, top, &opts);
        top += title.total_height + TITLE_GAP;
    }
    let opts = TextOptions::new().x(inner_x).max_width(inner_width);
    place_lines(ctx, &body, top, &opts);

    ctx.move_y(height + spacing);
    Ok(())
}
