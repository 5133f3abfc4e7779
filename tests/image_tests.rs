mod common;

use common::fixtures::*;
use common::pdf_assertions::count_images;
use common::{generate_err, generate_with, TestResult};
use folio::{BuildError, DocumentBuilder, InMemoryResourceProvider};
use folio_chart::ChartError;
use folio_render_core::{RecordedOp, RecordingBackend};
use serde_json::json;
use std::sync::Arc;

fn builder_with(images: &[(&str, u32, u32)]) -> DocumentBuilder {
    let mut provider = InMemoryResourceProvider::new();
    for (path, w, h) in images {
        provider = provider.with(*path, png_bytes(*w, *h)).unwrap();
    }
    DocumentBuilder::default().with_resources(Arc::new(provider))
}

fn image_rects(ops: &[RecordedOp]) -> Vec<(String, f32, f32, f32, f32)> {
    ops.iter()
        .filter_map(|op| match op {
            RecordedOp::Image { key, rect, .. } => Some((key.clone(), rect.llx, rect.lly, rect.width(), rect.height())),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_contain_fits_landscape_photo_into_square_box() -> TestResult {
    let builder = builder_with(&[("photo.png", 800, 600)]);
    let document = document(
        "contain",
        json!([{ "type": "image", "src": "photo.png", "width": 300, "height": 300, "fit": "contain" }]),
    );
    let prepared = builder.prepare(&document).await?;
    let (backend, log) = RecordingBackend::new();
    let output = builder.draw_with_backend(&prepared, Box::new(backend))?;

    let rects = image_rects(&log.snapshot().ops);
    assert_eq!(rects.len(), 1);
    let (_, _, lly, width, height) = &rects[0];
    assert!((width - 300.0).abs() < 1e-3);
    assert!((height - 225.0).abs() < 1e-3);

    // Centred vertically in the 300pt box that starts at the top margin.
    let box_top = 841.89 - 20.0 * 72.0 / 25.4;
    let image_top = lly + height;
    assert!((box_top - image_top - 37.5).abs() < 0.01, "offset {}", box_top - image_top);
    assert!(output.report.is_clean());
    Ok(())
}

#[tokio::test]
async fn test_missing_image_becomes_placeholder_with_alt_text() -> TestResult {
    let builder = builder_with(&[]);
    let document = document(
        "missing",
        json!([{ "type": "image", "src": "nope.png", "alt": "Architecture diagram" }]),
    );
    let prepared = builder.prepare(&document).await?;
    assert!(prepared.is_missing("nope.png"));

    let (backend, log) = RecordingBackend::new();
    let output = builder.draw_with_backend(&prepared, Box::new(backend))?;
    let rec = log.snapshot();
    assert_eq!(image_rects(&rec.ops).len(), 1);
    assert!(rec.texts().any(|t| t == "Architecture diagram"));
    assert_eq!(output.report.missing_images, vec!["nope.png".to_string()]);
    Ok(())
}

#[test]
fn test_images_are_embedded_once_per_source() -> TestResult {
    let builder = builder_with(&[("a.png", 64, 48), ("b.png", 32, 32)]);
    let document = document(
        "embedded",
        json!([
            { "type": "image", "src": "a.png", "caption": "First" },
            { "type": "image", "src": "a.png" },
            { "type": "image-compare", "before": { "src": "a.png" }, "after": { "src": "b.png", "label": "Tuned" } },
            { "type": "image-carousel", "images": [{ "src": "b.png", "label": "Slide one" }] }
        ]),
    );
    let pdf = generate_with(&builder, &document)?;
    assert_eq!(count_images(&pdf.doc), 2);
    assert_pdf_contains_text!(pdf, "First");
    assert_pdf_contains_text!(pdf, "Before");
    assert_pdf_contains_text!(pdf, "Tuned");
    assert_pdf_contains_text!(pdf, "Slide one");
    assert!(pdf.report.missing_images.is_empty());
    Ok(())
}

#[test]
fn test_relative_sources_resolve_against_asset_base() -> TestResult {
    let builder = builder_with(&[("docs/assets/logo.png", 20, 20)]);
    let mut document = document("based", json!([{ "type": "image", "src": "logo.png" }]));
    document.asset_base = Some("docs/assets".into());
    let pdf = generate_with(&builder, &document)?;
    assert!(pdf.report.missing_images.is_empty());
    assert_eq!(count_images(&pdf.doc), 1);
    Ok(())
}

#[tokio::test]
async fn test_chart_is_embedded_at_its_logical_size() -> TestResult {
    let builder = DocumentBuilder::default();
    let document = document("chart", json!([bar_chart(400.0, 200.0)]));
    let prepared = builder.prepare(&document).await?;
    let (backend, log) = RecordingBackend::new();
    builder.draw_with_backend(&prepared, Box::new(backend))?;

    let rec = log.snapshot();
    let rects = image_rects(&rec.ops);
    assert_eq!(rects.len(), 1);
    let (key, _, _, width, height) = &rects[0];
    assert_eq!(key, "chart-chart-0");
    assert!((width - 400.0).abs() < 1e-3);
    assert!((height - 200.0).abs() < 1e-3);
    assert!(rec.texts().any(|t| t == "Quarterly totals"));
    Ok(())
}

#[test]
fn test_chart_failure_fails_the_build() {
    let document = document(
        "broken",
        json!([
            { "type": "text", "text": "before" },
            { "type": "chart", "config": { "type": "radar", "data": { "datasets": [] } } }
        ]),
    );
    let err = generate_err(&DocumentBuilder::default(), &document);
    match err {
        BuildError::Chart { document, block, source } => {
            assert_eq!(document, "broken");
            assert_eq!(block, 1);
            assert!(matches!(source, ChartError::UnsupportedType(kind) if kind == "radar"));
        }
        other => panic!("expected a chart error, got {:?}", other),
    }
}
