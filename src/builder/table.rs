//! Tables: boxed cells, rows that never split, header repeated after a break.

use crate::blocks::TableBlock;
use crate::context::LayoutContext;
use crate::draw::{draw_box, place_lines, BoxSpec, BoxStyle, CursorContext, TextContext, TextOptions};
use crate::options::Theme;
use folio_layout::{measure_and_wrap, FontRole, LayoutError, TextMetricsRequest, WrappedText};
use folio_types::Color;
use log::warn;

const CELL_PADDING: f32 = 4.0;
const CELL_LINE_HEIGHT: f32 = 1.3;
const BORDER_WIDTH: f32 = 0.5;

struct Row {
    cells: Vec<WrappedText>,
    height: f32,
}

struct TableLayout<'a> {
    theme: &'a Theme,
    xs: Vec<f32>,
    widths: Vec<f32>,
    size: f32,
}

impl TableLayout<'_> {
    fn wrap_row(
        &self,
        ctx: &LayoutContext,
        cells: &[String],
        font: FontRole,
        limit: f32,
        truncated: &mut usize,
    ) -> Result<Row, LayoutError> {
        let face = *ctx.fonts().face(font);
        let mut wrapped = Vec::with_capacity(self.widths.len());
        for (i, width) in self.widths.iter().enumerate() {
            let text = cells.get(i).map(String::as_str).unwrap_or("");
            let inner = (width - 2.0 * CELL_PADDING).max(1.0);
            let req = TextMetricsRequest::new(&face, self.size, inner).line_height(CELL_LINE_HEIGHT);
            wrapped.push(measure_and_wrap(text, &req)?);
        }

        let tallest = wrapped.iter().map(|w| w.total_height).fold(0.0, f32::max);
        let mut height = tallest + 2.0 * CELL_PADDING;
        if height > limit {
            let line_px = self.size * CELL_LINE_HEIGHT;
            let keep = (((limit - 2.0 * CELL_PADDING) / line_px).floor() as usize).max(1);
            for cell in &mut wrapped {
                if cell.lines.len() > keep {
                    cell.lines.truncate(keep);
                    cell.total_height = keep as f32 * line_px;
                }
            }
            warn!(
                "Table row of {:.1}pt exceeds {:.1}pt; cut to {} lines per cell",
                height, limit, keep
            );
            *truncated += 1;
            height = keep as f32 * line_px + 2.0 * CELL_PADDING;
        }
        Ok(Row { cells: wrapped, height })
    }

    fn draw_row(&self, ctx: &mut LayoutContext, row: &Row, font: FontRole, fill: Option<Color>) -> Result<(), LayoutError> {
        ctx.ensure_space(row.height)?;
        let style = BoxStyle {
            fill,
            stroke: Some(self.theme.table_border),
            stroke_width: BORDER_WIDTH,
            padding: CELL_PADDING,
        };
        for (i, cell) in row.cells.iter().enumerate() {
            let spec = BoxSpec {
                x: Some(self.xs[i]),
                width: Some(self.widths[i]),
                height: row.height,
            };
            let placed = draw_box(ctx, &spec, &style)?;
            let opts = TextOptions::new()
                .x(placed.content.x)
                .max_width(placed.content.width.max(1.0))
                .font(font)
                .size(self.size)
                .line_height(CELL_LINE_HEIGHT);
            place_lines(ctx, cell, placed.content.y, &opts);
        }
        ctx.move_y(row.height);
        Ok(())
    }
}

/// Column widths from relative weights; equal columns when the weights are
/// missing, mismatched or not all positive.
fn column_widths(total: f32, count: usize, weights: Option<&[f32]>) -> Vec<f32> {
    let weights: Vec<f32> = match weights {
        Some(w) if w.len() == count && w.iter().all(|v| v.is_finite() && *v > 0.0) => w.to_vec(),
        _ => vec![1.0; count],
    };
    let sum: f32 = weights.iter().sum();
    weights.iter().map(|w| total * w / sum).collect()
}

pub(crate) fn draw_table(ctx: &mut LayoutContext, theme: &Theme, table: &TableBlock) -> Result<(), LayoutError> {
    let columns = table.column_count();
    if columns == 0 {
        return Ok(());
    }

    let left = ctx.content_left();
    let widths = column_widths(ctx.content_width(), columns, table.column_widths.as_deref());
    let xs = widths
        .iter()
        .scan(left, |x, w| {
            let start = *x;
            *x += w;
            Some(start)
        })
        .collect();
    let layout = TableLayout {
        theme,
        xs,
        widths,
        size: theme.body_size - 1.0,
    };

    // A header may take at most half the page; every body row must fit
    // beneath it on a fresh page.
    let mut truncated = 0;
    let header = if table.headers.is_empty() {
        None
    } else {
        let limit = ctx.content_height() / 2.0;
        Some(layout.wrap_row(ctx, &table.headers, FontRole::Bold, limit, &mut truncated)?)
    };
    let row_limit = ctx.content_height() - header.as_ref().map_or(0.0, |h| h.height);

    let mut first = true;
    for (r, cells) in table.rows.iter().enumerate() {
        let row = layout.wrap_row(ctx, cells, FontRole::Regular, row_limit, &mut truncated)?;
        if let Some(header) = &header {
            let broke = if first {
                // Keep the header with the first body row.
                ctx.ensure_space(header.height + row.height)?
            } else {
                ctx.ensure_space(row.height)?
            };
            if first || broke {
                layout.draw_row(ctx, header, FontRole::Bold, Some(theme.table_header_background))?;
            }
        }
        let stripe = (r % 2 == 1).then_some(theme.table_stripe_background);
        layout.draw_row(ctx, &row, FontRole::Regular, stripe)?;
        first = false;
    }
    if table.rows.is_empty() {
        if let Some(header) = &header {
            layout.draw_row(ctx, header, FontRole::Bold, Some(theme.table_header_background))?;
        }
    }

    ctx.report_mut().truncated_rows += truncated;
    ctx.move_y(theme.body_size * theme.paragraph_spacing);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CanvasState;
    use folio_layout::FontSet;
    use folio_render_core::{DocumentInfo, RecordedOp, RecordingBackend, RecordingLog};
    use folio_types::{mm, Margins, PageHandle, PageSize};

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

    #[test]
    fn weights_fall_back_to_equal_columns() {
        assert_eq!(column_widths(300.0, 3, Some(&[1.0, 2.0, 3.0])), vec![50.0, 100.0, 150.0]);
        assert_eq!(column_widths(300.0, 3, Some(&[1.0, 2.0])), vec![100.0; 3]);
        assert_eq!(column_widths(300.0, 2, Some(&[1.0, -1.0])), vec![150.0; 2]);
    }

    #[test]
    fn header_repeats_after_page_break() {
        let (mut ctx, log) = context();
        let table = TableBlock {
            headers: vec!["Name".into(), "Value".into()],
            rows: (0..80).map(|i| vec![format!("row {}", i), i.to_string()]).collect(),
            column_widths: None,
        };
        draw_table(&mut ctx, &Theme::default(), &table).unwrap();

        let rec = log.snapshot();
        assert!(rec.pages.len() >= 2);
        for page in 0..rec.pages.len() {
            let first_text = rec.ops_on(PageHandle(page)).find_map(|op| match op {
                RecordedOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            });
            assert_eq!(first_text.as_deref(), Some("Name"), "page {}", page);
        }
        assert_eq!(ctx.report_mut().truncated_rows, 0);
    }

    #[test]
    fn tall_row_after_break_stays_under_repeated_header() {
        let (mut ctx, log) = context();
        let table = TableBlock {
            headers: vec!["Head".into()],
            rows: vec![vec!["short".into()], vec!["line\n".repeat(200)]],
            column_widths: None,
        };
        draw_table(&mut ctx, &Theme::default(), &table).unwrap();

        let rec = log.snapshot();
        assert_eq!(rec.pages.len(), 2);
        for page in 0..rec.pages.len() {
            let texts: Vec<&str> = rec
                .ops_on(PageHandle(page))
                .filter_map(|op| match op {
                    RecordedOp::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(texts.first(), Some(&"Head"), "page {}", page);
            assert!(texts.len() > 1, "page {} holds only the header", page);
        }
        assert_eq!(ctx.report_mut().truncated_rows, 1);
    }

    #[test]
    fn oversized_row_is_truncated_and_reported() {
        let (mut ctx, _log) = context();
        let table = TableBlock {
            headers: vec![],
            rows: vec![vec!["line\n".repeat(200)]],
            column_widths: None,
        };
        draw_table(&mut ctx, &Theme::default(), &table).unwrap();
        assert_eq!(ctx.report_mut().truncated_rows, 1);
    }
}
