use crate::blocks::{ListBlock, ListItem};
use crate::context::LayoutContext;
use crate::draw::{draw_text_with, CursorContext, TextContext, TextOptions};
use crate::options::Theme;
use folio_layout::{measure, FontRole, LayoutError};
use folio_render_core::GlyphRun;

/// Width of one nesting level; markers sit in the first `LIST_INDENT` points.
const LIST_INDENT: f32 = 16.0;
const ITEM_GAP: f32 = 2.0;

pub(crate) fn draw_list(ctx: &mut LayoutContext, theme: &Theme, list: &ListBlock) -> Result<(), LayoutError> {
    let left = ctx.content_left();
    draw_items(ctx, theme, &list.items, list.ordered, 0, left)?;
    ctx.move_y(theme.body_size * theme.paragraph_spacing);
    Ok(())
}

fn marker(ordered: bool, index: usize, depth: usize) -> String {
    if ordered {
        return format!("{}.", index + 1);
    }
    match depth % 3 {
        0 => "\u{2022}".to_string(),
        1 => "\u{2013}".to_string(),
        _ => "\u{00b7}".to_string(),
    }
}

fn draw_items(
    ctx: &mut LayoutContext,
    theme: &Theme,
    items: &[ListItem],
    ordered: bool,
    depth: usize,
    left: f32,
) -> Result<(), LayoutError> {
    let marker_x = left + LIST_INDENT * depth as f32;
    let body_x = marker_x + LIST_INDENT;

    for (index, item) in items.iter().enumerate() {
        let label = marker(ordered, index, depth);
        let opts = TextOptions::new().x(body_x).spacing(0.0, ITEM_GAP);
        draw_text_with(ctx, item.text(), &opts, |ctx, line| {
            if line.index != 0 {
                return;
            }
            let face = ctx.fonts().regular;
            let width = measure(&label, &face, line.size);
            // Ordered markers hug the body; bullets sit at the marker column.
            let x = if ordered {
                (body_x - 4.0 - width).max(marker_x)
            } else {
                marker_x + 4.0
            };
            let color = ctx.canvas().color;
            ctx.draw_glyph_run(&GlyphRun {
                text: &label,
                font: FontRole::Regular,
                size: line.size,
                color,
                x,
                baseline: line.baseline,
            });
        })?;

        if !item.children().is_empty() {
            draw_items(ctx, theme, item.children(), ordered, depth + 1, left)?;
        }
    }
    Ok(())
}
