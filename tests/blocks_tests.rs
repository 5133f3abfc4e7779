mod common;

use common::fixtures::*;
use common::pdf_assertions::info_title;
use common::{generate, generate_from_json, generate_with, TestResult};
use folio::{Block, Document, DocumentBuilder, FilesystemProvider, GenerateOptions, InMemoryDataProvider, Theme};
use folio_layout::{FontFamily, FontRole};
use folio_render_core::{RecordedOp, RecordingBackend};
use folio::PreparedDocument;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_every_block_kind_renders() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let pdf = generate_from_json(json!({
        "id": "kitchen-sink",
        "title": "Kitchen sink",
        "blocks": [
            { "type": "title", "text": "Overview" },
            { "type": "text", "text": "A plain paragraph.", "align": "center" },
            { "type": "text", "text": "Emphasis", "style": "italic" },
            { "type": "list", "ordered": true, "items": ["alpha", { "text": "beta", "children": ["gamma"] }] },
            { "type": "table", "headers": ["Key", "Value"], "rows": [["a", "1"], ["b", "2"]] },
            { "type": "message-box", "variant": "warning", "title": "Careful", "text": "Mind the gap." },
            { "type": "divider", "style": "dashed" },
            { "type": "divider", "style": "gradient", "color": "#ff0000", "endColor": "#0000ff" },
            { "type": "math", "expression": "E = mc^2" },
            { "type": "code", "language": "rust", "code": "fn main() {\n\tprintln!(\"hi\");\n}" },
            { "type": "youtube", "src": "https://youtu.be/x" },
            { "type": "audio", "src": "clip.mp3" },
            { "type": "sparkles" }
        ]
    }))?;

    for text in ["Overview", "A plain paragraph.", "Emphasis", "alpha", "gamma", "Key", "Careful", "Mind the gap.", "E = mc^2", "rust"] {
        assert_pdf_contains_text!(pdf, text);
    }
    assert_pdf_contains_text!(pdf, "Unsupported content: sparkles");
    assert_pdf_has_font!(pdf, "Courier");
    assert_pdf_has_font!(pdf, "Helvetica-Bold");
    assert_pdf_has_font!(pdf, "Helvetica-Oblique");

    assert_eq!(pdf.report.skipped_blocks, vec!["youtube".to_string(), "audio".to_string()]);
    assert_eq!(pdf.report.placeholders, vec!["sparkles".to_string()]);
    assert_eq!(info_title(&pdf.doc).as_deref(), Some("Kitchen sink"));
    Ok(())
}

#[test]
fn test_code_keeps_indentation_in_monospace() -> TestResult {
    let document: Document = serde_json::from_value(json!({
        "id": "code",
        "blocks": [{ "type": "code", "code": "if x {\n    y();\n}" }]
    }))?;
    let (backend, log) = RecordingBackend::new();
    DocumentBuilder::default().draw_with_backend(&PreparedDocument::without_resources(document), Box::new(backend))?;

    let rec = log.snapshot();
    let lines: Vec<(String, FontRole)> = rec
        .ops
        .iter()
        .filter_map(|op| match op {
            RecordedOp::Text { text, font, .. } => Some((text.clone(), *font)),
            _ => None,
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            ("if x {".to_string(), FontRole::Monospace),
            ("    y();".to_string(), FontRole::Monospace),
            ("}".to_string(), FontRole::Monospace),
        ]
    );
    // One shaded background per line.
    let fills = rec.ops.iter().filter(|op| matches!(op, RecordedOp::Fill { .. })).count();
    assert_eq!(fills, 3);
    Ok(())
}

#[test]
fn test_serif_theme_switches_base_fonts() -> TestResult {
    let options = GenerateOptions {
        theme: Theme {
            font_family: FontFamily::Serif,
            ..Theme::default()
        },
        ..GenerateOptions::default()
    };
    let pdf = generate_with(&DocumentBuilder::new(options), &text_document("serif", &["Set in Times."]))?;
    assert_pdf_has_font!(pdf, "Times-Roman");
    Ok(())
}

#[test]
fn test_documents_load_through_data_providers() -> TestResult {
    let mut data = InMemoryDataProvider::new();
    data.insert(
        "docs/intro.json",
        json!({ "id": "intro", "title": "Intro", "blocks": [{ "type": "text", "text": "Loaded from data." }] }),
    );
    let document = Document::load(&data, "docs/intro.json")?;
    assert_eq!(document.blocks, vec![Block::text("Loaded from data.")]);

    let pdf = generate(&document)?;
    assert_pdf_contains_text!(pdf, "Loaded from data.");
    Ok(())
}

#[test]
fn test_filesystem_provider_serves_documents_and_assets() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("assets"))?;
    std::fs::write(dir.path().join("assets/dot.png"), png_bytes(8, 8))?;
    std::fs::write(
        dir.path().join("page.json"),
        serde_json::to_vec(&json!({
            "id": "page",
            "title": "From disk",
            "assetBase": "assets",
            "blocks": [
                { "type": "image", "src": "dot.png" },
                { "type": "image", "src": "../escape.png" }
            ]
        }))?,
    )?;

    let provider = Arc::new(FilesystemProvider::new(dir.path()));
    let document = Document::load(provider.as_ref(), "page.json")?;
    let builder = DocumentBuilder::default().with_resources(provider);
    let pdf = generate_with(&builder, &document)?;

    assert_eq!(pdf.report.missing_images, vec!["../escape.png".to_string()]);
    Ok(())
}
