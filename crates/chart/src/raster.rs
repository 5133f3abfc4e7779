//! Chart rasterizer on top of `tiny-skia`.
//!
//! Draws bars, lines and pie or doughnut wedges. Axis labels and legends
//! are left to the surrounding document text.

use crate::bridge::ChartRenderer;
use crate::config::{ChartKind, ChartSpec, Dataset};
use crate::ChartError;
use folio_types::Color;
use serde_json::Value;
use std::f32::consts::{FRAC_PI_2, TAU};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

const PALETTE: [Color; 6] = [
    Color::rgb(54, 162, 235),
    Color::rgb(255, 99, 132),
    Color::rgb(255, 206, 86),
    Color::rgb(75, 192, 192),
    Color::rgb(153, 102, 255),
    Color::rgb(255, 159, 64),
];
const AXIS: Color = Color::rgb(160, 160, 160);
/// Segments used to approximate a full circle.
const ARC_SEGMENTS: usize = 96;

#[derive(Debug, Default, Clone, Copy)]
pub struct RasterChartRenderer;

impl RasterChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn paint(color: &Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, (color.a.clamp(0.0, 1.0) * 255.0).round() as u8);
    paint.anti_alias = true;
    paint
}

fn dataset_color(dataset: &Dataset, dataset_index: usize, point_index: usize) -> Color {
    match dataset.fill.len() {
        0 => PALETTE[dataset_index % PALETTE.len()],
        1 => dataset.fill[0],
        n => dataset.fill[point_index % n],
    }
}

/// Plot area inside the pixmap, leaving a margin proportional to its size.
struct Plot {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl Plot {
    fn new(width: f32, height: f32) -> Self {
        let pad_x = (width * 0.06).max(2.0);
        let pad_y = (height * 0.08).max(2.0);
        Self {
            left: pad_x,
            top: pad_y,
            width: (width - 2.0 * pad_x).max(1.0),
            height: (height - 2.0 * pad_y).max(1.0),
        }
    }

    fn bottom(&self) -> f32 {
        self.top + self.height
    }

    fn y_for(&self, value: f64, max: f64) -> f32 {
        let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
        self.bottom() - ratio as f32 * self.height
    }
}

fn draw_axes(pixmap: &mut Pixmap, plot: &Plot, scale: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(plot.left, plot.top);
    pb.line_to(plot.left, plot.bottom());
    pb.line_to(plot.left + plot.width, plot.bottom());
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: scale,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint(&AXIS), &stroke, Transform::identity(), None);
    }
}

fn draw_bars(pixmap: &mut Pixmap, spec: &ChartSpec, plot: &Plot) {
    let categories = spec.category_count().max(1);
    let max = spec.max_value();
    let group_width = plot.width / categories as f32;
    let bar_width = group_width * 0.8 / spec.datasets.len() as f32;

    for (d, dataset) in spec.datasets.iter().enumerate() {
        for (i, value) in dataset.values.iter().enumerate() {
            let Some(value) = value.filter(|v| v.is_finite() && *v > 0.0) else {
                continue;
            };
            let x = plot.left + i as f32 * group_width + group_width * 0.1 + d as f32 * bar_width;
            let y = plot.y_for(value, max);
            if let Some(rect) = Rect::from_xywh(x, y, bar_width, plot.bottom() - y) {
                pixmap.fill_rect(rect, &paint(&dataset_color(dataset, d, i)), Transform::identity(), None);
            }
        }
    }
}

fn draw_lines(pixmap: &mut Pixmap, spec: &ChartSpec, plot: &Plot, scale: f32) {
    let categories = spec.category_count();
    let max = spec.max_value();
    let step = if categories > 1 {
        plot.width / (categories - 1) as f32
    } else {
        0.0
    };

    for (d, dataset) in spec.datasets.iter().enumerate() {
        let color = dataset
            .stroke
            .unwrap_or_else(|| dataset_color(dataset, d, 0));
        let mut pb = PathBuilder::new();
        let mut pen_down = false;
        let mut points = Vec::new();
        for (i, value) in dataset.values.iter().enumerate() {
            match value.filter(|v| v.is_finite()) {
                Some(v) => {
                    let (x, y) = (plot.left + i as f32 * step, plot.y_for(v, max));
                    if pen_down {
                        pb.line_to(x, y);
                    } else {
                        pb.move_to(x, y);
                        pen_down = true;
                    }
                    points.push((x, y));
                }
                // Gaps break the line.
                None => pen_down = false,
            }
        }
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: 2.0 * scale,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint(&color), &stroke, Transform::identity(), None);
        }
        for (x, y) in points {
            if let Some(dot) = PathBuilder::from_circle(x, y, 2.5 * scale) {
                pixmap.fill_path(&dot, &paint(&color), FillRule::Winding, Transform::identity(), None);
            }
        }
    }
}

fn wedge(cx: f32, cy: f32, outer: f32, inner: f32, start: f32, sweep: f32) -> Option<tiny_skia::Path> {
    let steps = ((sweep / TAU) * ARC_SEGMENTS as f32).ceil().max(1.0) as usize;
    let mut pb = PathBuilder::new();
    for s in 0..=steps {
        let a = start + sweep * s as f32 / steps as f32;
        let (x, y) = (cx + outer * a.cos(), cy + outer * a.sin());
        if s == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    if inner > 0.0 {
        for s in (0..=steps).rev() {
            let a = start + sweep * s as f32 / steps as f32;
            pb.line_to(cx + inner * a.cos(), cy + inner * a.sin());
        }
    } else {
        pb.line_to(cx, cy);
    }
    pb.close();
    pb.finish()
}

fn draw_pie(pixmap: &mut Pixmap, spec: &ChartSpec, plot: &Plot, doughnut: bool) {
    // Only the first dataset is drawn as wedges.
    let Some(dataset) = spec.datasets.first() else {
        return;
    };
    let values: Vec<f32> = dataset
        .values
        .iter()
        .map(|v| v.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0) as f32)
        .collect();
    let total: f32 = values.iter().sum();
    if total <= 0.0 {
        return;
    }

    let cx = plot.left + plot.width / 2.0;
    let cy = plot.top + plot.height / 2.0;
    let outer = plot.width.min(plot.height) / 2.0;
    let inner = if doughnut { outer * 0.5 } else { 0.0 };
    let mut angle = -FRAC_PI_2;
    for (i, value) in values.iter().enumerate() {
        let sweep = value / total * TAU;
        if sweep > 0.0
            && let Some(path) = wedge(cx, cy, outer, inner, angle, sweep)
        {
            pixmap.fill_path(
                &path,
                &paint(&dataset_color(dataset, 0, i)),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        angle += sweep;
    }
}

impl ChartRenderer for RasterChartRenderer {
    fn render_png(
        &self,
        config: &Value,
        width_px: u32,
        height_px: u32,
        background: Color,
    ) -> Result<Vec<u8>, ChartError> {
        let spec = ChartSpec::from_config(config)?;
        let mut pixmap = Pixmap::new(width_px, height_px).ok_or_else(|| {
            ChartError::Raster(format!("cannot allocate a {}x{} pixmap", width_px, height_px))
        })?;
        if !background.is_transparent() {
            let a = (background.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            pixmap.fill(tiny_skia::Color::from_rgba8(background.r, background.g, background.b, a));
        }

        let (w, h) = (width_px as f32, height_px as f32);
        // Stroke widths scale with resolution, measured against a 400px chart.
        let scale = (w.min(h) / 400.0).max(1.0);
        let plot = Plot::new(w, h);
        match spec.kind {
            ChartKind::Bar => {
                draw_axes(&mut pixmap, &plot, scale);
                draw_bars(&mut pixmap, &spec, &plot);
            }
            ChartKind::Line => {
                draw_axes(&mut pixmap, &plot, scale);
                draw_lines(&mut pixmap, &spec, &plot, scale);
            }
            ChartKind::Pie => draw_pie(&mut pixmap, &spec, &plot, false),
            ChartKind::Doughnut => draw_pie(&mut pixmap, &spec, &plot, true),
        }

        pixmap.encode_png().map_err(|e| ChartError::Raster(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn render(config: Value, background: Color) -> Vec<u8> {
        RasterChartRenderer::new()
            .render_png(&config, 200, 100, background)
            .unwrap()
    }

    #[test]
    fn renders_each_supported_kind() {
        for kind in ["bar", "line", "pie", "doughnut"] {
            let png = render(
                json!({"type": kind, "data": {"labels": ["a", "b", "c"], "datasets": [{"data": [3, 1, 2]}]}}),
                Color::transparent(),
            );
            assert!(png.starts_with(PNG_MAGIC), "{} chart is not a PNG", kind);
        }
    }

    #[test]
    fn opaque_background_fills_the_buffer() {
        let config = json!({"type": "bar", "data": {"datasets": [{"data": [0]}]}});
        let png = render(config, Color::rgb(255, 255, 255));
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let err = RasterChartRenderer::new()
            .render_png(&json!({"type": "bar"}), 10, 10, Color::transparent())
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn zero_sized_pixmap_is_an_error() {
        let config = json!({"type": "pie", "data": {"datasets": [{"data": [1]}]}});
        let err = RasterChartRenderer::new()
            .render_png(&config, 0, 10, Color::transparent())
            .unwrap_err();
        assert!(matches!(err, ChartError::Raster(_)));
    }
}
