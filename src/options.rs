//! Build configuration: page geometry, TOC behaviour and the visual theme.

use folio_layout::FontFamily;
use folio_types::{Color, Margins, PageSize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Horizontal placement of a line or box within the available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One row of a table of contents. `id` names the anchor the row links to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    pub page_size: PageSize,
    pub margins: Margins,
    pub include_toc: bool,
    pub theme: Theme,
    /// Explicit TOC rows; derived from titles when absent.
    pub toc_entries: Option<Vec<TocEntry>>,
    /// Breadcrumb trail per document id, used by consolidated builds.
    pub breadcrumbs: HashMap<String, Vec<String>>,
    /// Category label per document id, used by consolidated builds.
    pub categories: HashMap<String, String>,
    /// Written into the PDF Info dictionary.
    pub producer: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::default(),
            include_toc: false,
            theme: Theme::default(),
            toc_entries: None,
            breadcrumbs: HashMap::new(),
            categories: HashMap::new(),
            producer: concat!("folio ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Background and border colours of one message-box variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MessagePalette {
    pub background: Color,
    pub border: Color,
}

impl MessagePalette {
    const fn new(background: Color, border: Color) -> Self {
        Self { background, border }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub font_family: FontFamily,
    pub body_size: f32,
    pub line_height: f32,
    /// Title sizes for levels 1, 2 and 3; deeper levels use the last one.
    pub heading_sizes: [f32; 3],
    pub small_size: f32,
    pub code_size: f32,
    pub text_color: Color,
    pub heading_color: Color,
    pub link_color: Color,
    pub muted_color: Color,
    pub rule_color: Color,
    pub code_background: Color,
    pub table_header_background: Color,
    pub table_stripe_background: Color,
    pub table_border: Color,
    pub placeholder_background: Color,
    pub info: MessagePalette,
    pub success: MessagePalette,
    pub warning: MessagePalette,
    pub error: MessagePalette,
    /// Gap after paragraphs, as a multiple of the body size.
    pub paragraph_spacing: f32,
    pub underline_links: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: FontFamily::Sans,
            body_size: 11.0,
            line_height: 1.4,
            heading_sizes: [24.0, 18.0, 14.0],
            small_size: 9.0,
            code_size: 9.5,
            text_color: Color::rgb(0x1f, 0x23, 0x28),
            heading_color: Color::rgb(0x0b, 0x1f, 0x3a),
            link_color: Color::rgb(0x1a, 0x5f, 0xb4),
            muted_color: Color::rgb(0x6a, 0x73, 0x7d),
            rule_color: Color::rgb(0xd0, 0xd7, 0xde),
            code_background: Color::rgb(0xf4, 0xf6, 0xf8),
            table_header_background: Color::rgb(0xea, 0xee, 0xf2),
            table_stripe_background: Color::rgb(0xf9, 0xfa, 0xfb),
            table_border: Color::rgb(0xc4, 0xcc, 0xd4),
            placeholder_background: Color::rgb(0xee, 0xee, 0xee),
            info: MessagePalette::new(Color::rgb(0xe8, 0xf1, 0xfb), Color::rgb(0x1a, 0x5f, 0xb4)),
            success: MessagePalette::new(Color::rgb(0xe9, 0xf7, 0xec), Color::rgb(0x26, 0xa2, 0x69)),
            warning: MessagePalette::new(Color::rgb(0xff, 0xf6, 0xe0), Color::rgb(0xe5, 0xa5, 0x0a)),
            error: MessagePalette::new(Color::rgb(0xfd, 0xec, 0xec), Color::rgb(0xc0, 0x1c, 0x28)),
            paragraph_spacing: 0.6,
            underline_links: true,
        }
    }
}

impl Theme {
    pub fn heading_size(&self, level: u8) -> f32 {
        let index = (level.max(1) as usize - 1).min(self.heading_sizes.len() - 1);
        self.heading_sizes[index]
    }

    pub fn body_line_px(&self) -> f32 {
        self.body_size * self.line_height
    }
}
