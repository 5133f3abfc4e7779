use folio::{Block, Document, GenerateOptions, Theme};
use serde_json::{json, Value};
use std::io::Cursor;

/// `count` copies of "lorem" separated by single spaces.
pub fn lorem_words(count: usize) -> String {
    vec!["lorem"; count].join(" ")
}

/// Options that lay body text out at 12pt with a 1.4 line height.
pub fn twelve_point_options() -> GenerateOptions {
    GenerateOptions {
        theme: Theme {
            body_size: 12.0,
            line_height: 1.4,
            ..Theme::default()
        },
        ..GenerateOptions::default()
    }
}

/// Document with the given blocks, parsed from their JSON form.
pub fn document(id: &str, blocks: Value) -> Document {
    serde_json::from_value(json!({ "id": id, "title": id, "blocks": blocks }))
        .expect("fixture blocks should deserialize")
}

pub fn text_document(id: &str, paragraphs: &[&str]) -> Document {
    Document::new(id, id).with_blocks(paragraphs.iter().map(|p| Block::text(*p)).collect())
}

/// A solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("PNG encoding should succeed");
    out.into_inner()
}

/// A small bar chart in the Chart.js shape the raster renderer accepts.
pub fn bar_chart(width: f32, height: f32) -> Value {
    json!({
        "type": "chart",
        "width": width,
        "height": height,
        "caption": "Quarterly totals",
        "config": {
            "type": "bar",
            "data": {
                "labels": ["Q1", "Q2", "Q3", "Q4"],
                "datasets": [{ "data": [3, 7, 4, 9] }]
            }
        }
    })
}
