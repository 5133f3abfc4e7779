use folio_layout::FontRole;
use folio_types::{AnchorId, Color};

/// One line of text, positioned in page (bottom-up) coordinates.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRun<'a> {
    pub text: &'a str,
    pub font: FontRole,
    pub size: f32,
    pub color: Color,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPattern {
    pub on: f32,
    pub off: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Color,
    pub dash: Option<DashPattern>,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            width,
            color,
            dash: None,
            cap: LineCap::Butt,
        }
    }

    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some(DashPattern { on, off });
        self
    }

    pub fn round_cap(mut self) -> Self {
        self.cap = LineCap::Round;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub producer: String,
}

/// A bookmark pointing at an anchor; nesting follows `level` (1 = top).
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub title: String,
    pub anchor: AnchorId,
    pub level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct BackendOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Internal link targets that no anchor was defined for.
    pub dangling_links: Vec<AnchorId>,
}
