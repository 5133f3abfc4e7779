//! Per-page content stream builder.

use folio_layout::{to_win_ansi, FontRole};
use folio_render_core::{GlyphRun, LineCap, RenderError, StrokeStyle};
use folio_types::{Color, PageRect, Point};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

/// Text and fill state that persists between operations on one page.
///
/// Strokes, images and clips are wrapped in `q`/`Q`, so only state set outside
/// those groups is tracked here.
#[derive(Default, Clone, PartialEq)]
struct ContentState {
    font: Option<(FontRole, f32)>,
    fill: Option<Color>,
}

#[derive(Default)]
pub(crate) struct PageContent {
    operations: Vec<Operation>,
    state: ContentState,
}

fn rgb_operands(color: &Color) -> Vec<Object> {
    color.to_unit_rgb().iter().map(|&c| c.into()).collect()
}

fn rect_operands(rect: &PageRect) -> Vec<Object> {
    vec![
        rect.llx.into(),
        rect.lly.into(),
        rect.width().into(),
        rect.height().into(),
    ]
}

impl PageContent {
    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: &Color) {
        if self.state.fill != Some(*color) {
            self.op("rg", rgb_operands(color));
            self.state.fill = Some(*color);
        }
    }

    fn set_font(&mut self, role: FontRole, size: f32) {
        if self.state.font != Some((role, size)) {
            self.op(
                "Tf",
                vec![Object::Name(role.resource_name().as_bytes().to_vec()), size.into()],
            );
            self.state.font = Some((role, size));
        }
    }

    fn apply_stroke(&mut self, stroke: &StrokeStyle) {
        self.op("w", vec![stroke.width.into()]);
        self.op("RG", rgb_operands(&stroke.color));
        if let Some(dash) = stroke.dash {
            self.op("d", vec![Object::Array(vec![dash.on.into(), dash.off.into()]), 0.into()]);
        }
        if stroke.cap == LineCap::Round {
            self.op("J", vec![1.into()]);
        }
    }

    pub fn text(&mut self, run: &GlyphRun<'_>) {
        if run.text.trim().is_empty() || run.color.is_transparent() {
            return;
        }
        self.op("BT", vec![]);
        self.set_font(run.font, run.size);
        self.set_fill_color(&run.color);
        self.op("Td", vec![run.x.into(), run.baseline.into()]);
        self.op(
            "Tj",
            vec![Object::String(to_win_ansi(run.text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    pub fn fill_rect(&mut self, rect: &PageRect, color: &Color) {
        if color.is_transparent() {
            return;
        }
        self.set_fill_color(color);
        self.op("re", rect_operands(rect));
        self.op("f", vec![]);
    }

    pub fn stroke_rect(&mut self, rect: &PageRect, stroke: &StrokeStyle) {
        if stroke.width <= 0.0 || stroke.color.is_transparent() {
            return;
        }
        self.op("q", vec![]);
        self.apply_stroke(stroke);
        self.op("re", rect_operands(rect));
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: &StrokeStyle) {
        if stroke.width <= 0.0 || stroke.color.is_transparent() {
            return;
        }
        self.op("q", vec![]);
        self.apply_stroke(stroke);
        self.op("m", vec![from.x.into(), from.y.into()]);
        self.op("l", vec![to.x.into(), to.y.into()]);
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    /// Paints the XObject `name` stretched over `rect`, clipped to `clip`.
    pub fn image(&mut self, name: &str, rect: &PageRect, clip: Option<&PageRect>) {
        self.op("q", vec![]);
        if let Some(clip) = clip {
            self.op("re", rect_operands(clip));
            self.op("W", vec![]);
            self.op("n", vec![]);
        }
        self.op(
            "cm",
            vec![
                rect.width().into(),
                0.into(),
                0.into(),
                rect.height().into(),
                rect.llx.into(),
                rect.lly.into(),
            ],
        );
        self.op("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.op("Q", vec![]);
    }

    pub fn encode(self) -> Result<Vec<u8>, RenderError> {
        Ok(Content {
            operations: self.operations,
        }
        .encode()?)
    }
}
