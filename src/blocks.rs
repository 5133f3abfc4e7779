//! The content-block model, deserialized from `type`-tagged JSON.
//!
//! Unknown `type` values do not fail the document: they deserialize to
//! [`Block::Unsupported`] and are drawn as a visible placeholder. A block with
//! a known type but a malformed body is still a parse error.

use crate::options::Align;
use folio_types::Color;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Regular,
    Italic,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleBlock {
    pub text: String,
    #[serde(default = "default_level")]
    pub level: u8,
    /// Anchor id; derived from the text when absent.
    #[serde(default)]
    pub id: Option<String>,
}

fn default_level() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    /// Turns the whole paragraph into a link. `#id` targets an anchor.
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default)]
    pub align: Option<Align>,
}

/// A list entry: either a bare string or an object with nested children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Nested {
        text: String,
        #[serde(default)]
        children: Vec<ListItem>,
    },
}

impl ListItem {
    pub fn text(&self) -> &str {
        match self {
            ListItem::Text(text) | ListItem::Nested { text, .. } => text,
        }
    }

    pub fn children(&self) -> &[ListItem] {
        match self {
            ListItem::Text(_) => &[],
            ListItem::Nested { children, .. } => children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlock {
    pub items: Vec<ListItem>,
    #[serde(default)]
    pub ordered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Relative column weights; equal columns when absent.
    #[serde(default)]
    pub column_widths: Option<Vec<f32>>,
}

impl TableBlock {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBoxBlock {
    #[serde(default, alias = "variant")]
    pub kind: MessageKind,
    #[serde(default)]
    pub title: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    Thick,
    Gradient,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerBlock {
    pub style: RuleStyle,
    pub color: Option<Color>,
    pub end_color: Option<Color>,
    pub thickness: Option<f32>,
    /// Fraction of the content width, `0.0..=1.0`.
    pub width: Option<f32>,
    pub align: Option<Align>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    ScaleDown,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub align: Option<Align>,
    /// Declared scale factor for `fit: none`.
    #[serde(default)]
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub src: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCompareBlock {
    pub before: ImageRef,
    pub after: ImageRef,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCarouselBlock {
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathBlock {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBlock {
    /// Opaque renderer configuration.
    pub config: Value,
    #[serde(default = "default_chart_width")]
    pub width: f32,
    #[serde(default = "default_chart_height")]
    pub height: f32,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub device_pixel_ratio: Option<f32>,
    #[serde(default)]
    pub caption: Option<String>,
}

fn default_chart_width() -> f32 {
    480.0
}

fn default_chart_height() -> f32 {
    270.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaBlock {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Title(TitleBlock),
    Text(TextBlock),
    List(ListBlock),
    Table(TableBlock),
    MessageBox(MessageBoxBlock),
    Divider(DividerBlock),
    Image(ImageBlock),
    ImageCompare(ImageCompareBlock),
    ImageCarousel(ImageCarouselBlock),
    Math(MathBlock),
    Code(CodeBlock),
    Chart(ChartBlock),
    Audio(MediaBlock),
    Youtube(MediaBlock),
    /// A block whose `type` this engine does not draw.
    #[serde(skip)]
    Unsupported { kind: String },
}

impl Block {
    pub fn kind(&self) -> &str {
        match self {
            Block::Title(_) => "title",
            Block::Text(_) => "text",
            Block::List(_) => "list",
            Block::Table(_) => "table",
            Block::MessageBox(_) => "message-box",
            Block::Divider(_) => "divider",
            Block::Image(_) => "image",
            Block::ImageCompare(_) => "image-compare",
            Block::ImageCarousel(_) => "image-carousel",
            Block::Math(_) => "math",
            Block::Code(_) => "code",
            Block::Chart(_) => "chart",
            Block::Audio(_) => "audio",
            Block::Youtube(_) => "youtube",
            Block::Unsupported { kind } => kind,
        }
    }

    /// Every image source this block needs resolved before drawing.
    pub fn image_sources(&self) -> Vec<&str> {
        match self {
            Block::Image(image) => vec![image.src.as_str()],
            Block::ImageCompare(compare) => vec![compare.before.src.as_str(), compare.after.src.as_str()],
            Block::ImageCarousel(carousel) => carousel.images.iter().map(|i| i.src.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(TextBlock {
            text: text.into(),
            href: None,
            style: TextStyle::Regular,
            align: None,
        })
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Block::Text(TextBlock {
            text: text.into(),
            href: Some(href.into()),
            style: TextStyle::Regular,
            align: None,
        })
    }

    pub fn title(text: impl Into<String>, level: u8) -> Self {
        Block::Title(TitleBlock {
            text: text.into(),
            level,
            id: None,
        })
    }
}

/// The derived, strictly-typed view of a known block.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum KnownBlock {
    Title(TitleBlock),
    Text(TextBlock),
    List(ListBlock),
    Table(TableBlock),
    MessageBox(MessageBoxBlock),
    Divider(DividerBlock),
    Image(ImageBlock),
    ImageCompare(ImageCompareBlock),
    ImageCarousel(ImageCarouselBlock),
    Math(MathBlock),
    Code(CodeBlock),
    Chart(ChartBlock),
    Audio(MediaBlock),
    Youtube(MediaBlock),
}

const KNOWN_KINDS: &[&str] = &[
    "title",
    "text",
    "list",
    "table",
    "message-box",
    "divider",
    "image",
    "image-compare",
    "image-carousel",
    "math",
    "code",
    "chart",
    "audio",
    "youtube",
];

impl From<KnownBlock> for Block {
    fn from(block: KnownBlock) -> Self {
        match block {
            KnownBlock::Title(b) => Block::Title(b),
            KnownBlock::Text(b) => Block::Text(b),
            KnownBlock::List(b) => Block::List(b),
            KnownBlock::Table(b) => Block::Table(b),
            KnownBlock::MessageBox(b) => Block::MessageBox(b),
            KnownBlock::Divider(b) => Block::Divider(b),
            KnownBlock::Image(b) => Block::Image(b),
            KnownBlock::ImageCompare(b) => Block::ImageCompare(b),
            KnownBlock::ImageCarousel(b) => Block::ImageCarousel(b),
            KnownBlock::Math(b) => Block::Math(b),
            KnownBlock::Code(b) => Block::Code(b),
            KnownBlock::Chart(b) => Block::Chart(b),
            KnownBlock::Audio(b) => Block::Audio(b),
            KnownBlock::Youtube(b) => Block::Youtube(b),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?;
        if !KNOWN_KINDS.contains(&kind) {
            return Ok(Block::Unsupported { kind: kind.to_string() });
        }
        KnownBlock::deserialize(value)
            .map(Block::from)
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_blocks_parse() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            { "type": "title", "text": "Getting started" },
            { "type": "text", "text": "See docs", "href": "https://example.com" },
            { "type": "list", "items": ["a", { "text": "b", "children": ["b.1"] }], "ordered": true },
            { "type": "message-box", "variant": "warning", "text": "Careful" },
            { "type": "divider", "style": "gradient", "endColor": "#f00" },
            { "type": "image", "src": "a.png", "fit": "scale-down" }
        ]))
        .unwrap();

        assert!(matches!(&blocks[0], Block::Title(t) if t.level == 1 && t.id.is_none()));
        assert!(matches!(&blocks[1], Block::Text(t) if t.href.as_deref() == Some("https://example.com")));
        match &blocks[2] {
            Block::List(list) => {
                assert!(list.ordered);
                assert_eq!(list.items[1].text(), "b");
                assert_eq!(list.items[1].children()[0].text(), "b.1");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&blocks[3], Block::MessageBox(m) if m.kind == MessageKind::Warning));
        assert!(matches!(&blocks[4], Block::Divider(d) if d.style == RuleStyle::Gradient && d.end_color == Some(Color::rgb(255, 0, 0))));
        assert!(matches!(&blocks[5], Block::Image(i) if i.fit == ImageFit::ScaleDown));
    }

    #[test]
    fn unknown_type_becomes_unsupported() {
        let block: Block = serde_json::from_value(json!({ "type": "quiz", "questions": [] })).unwrap();
        assert_eq!(block, Block::Unsupported { kind: "quiz".into() });
        assert_eq!(block.kind(), "quiz");
    }

    #[test]
    fn malformed_known_block_is_an_error() {
        assert!(serde_json::from_value::<Block>(json!({ "type": "image" })).is_err());
        assert!(serde_json::from_value::<Block>(json!({ "text": "no type" })).is_err());
    }

    #[test]
    fn image_sources_cover_compare_and_carousel() {
        let block: Block = serde_json::from_value(json!({
            "type": "image-compare",
            "before": { "src": "old.png" },
            "after": { "src": "new.png", "label": "New" }
        }))
        .unwrap();
        assert_eq!(block.image_sources(), vec!["old.png", "new.png"]);
        assert_eq!(TableBlock { headers: vec![], rows: vec![vec!["a".into(); 3]], column_widths: None }.column_count(), 3);
    }
}
