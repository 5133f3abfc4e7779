use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        other => other.as_dict().ok(),
    }
}

/// Base font names referenced by the shared resource dictionary.
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut fonts = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else { continue };
        let Some(resources) = page.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) else {
            continue;
        };
        let Some(font_dict) = resources.get(b"Font").ok().and_then(|f| resolve_dict(doc, f)) else {
            continue;
        };
        for (_, font) in font_dict.iter() {
            if let Some(name) = resolve_dict(doc, font)
                .and_then(|d| d.get(b"BaseFont").ok())
                .and_then(|b| b.as_name().ok())
            {
                let name = String::from_utf8_lossy(name).to_string();
                if !fonts.contains(&name) {
                    fonts.push(name);
                }
            }
        }
    }
    fonts
}

#[derive(Debug)]
pub struct LinkAnnotation {
    /// 1-based page number the annotation is attached to.
    pub page: u32,
    pub rect: [f32; 4],
    pub is_internal: bool,
    /// URI for external links, destination page number for internal ones.
    pub uri: Option<String>,
    pub dest_page: Option<u32>,
}

/// Extract link annotations from every page, in page order.
pub fn extract_link_annotations(doc: &LopdfDocument) -> Vec<LinkAnnotation> {
    let pages = doc.get_pages();
    let mut annotations = Vec::new();

    for (page_num, page_id) in pages.iter() {
        let Ok(page) = doc.get_dictionary(*page_id) else { continue };
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else { continue };

        for annot in annots {
            let Some(dict) = resolve_dict(doc, annot) else { continue };
            if dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Link".as_slice()) {
                continue;
            }
            let rect = dict
                .get(b"Rect")
                .and_then(Object::as_array)
                .map(|arr| {
                    let mut out = [0.0; 4];
                    for (slot, value) in out.iter_mut().zip(arr) {
                        *slot = value.as_float().unwrap_or(0.0);
                    }
                    out
                })
                .unwrap_or_default();

            let action = dict.get(b"A").ok().and_then(|a| resolve_dict(doc, a));
            let kind = action.and_then(|a| a.get(b"S").and_then(Object::as_name).ok());
            let is_internal = kind == Some(b"GoTo".as_slice());
            let uri = action
                .and_then(|a| a.get(b"URI").ok())
                .and_then(|u| u.as_str().ok())
                .map(|u| String::from_utf8_lossy(u).to_string());
            let dest_page = action
                .and_then(|a| a.get(b"D").and_then(Object::as_array).ok())
                .and_then(|d| d.first())
                .and_then(|target| target.as_reference().ok())
                .and_then(|target| pages.iter().find(|(_, id)| **id == target).map(|(n, _)| *n));

            annotations.push(LinkAnnotation {
                page: *page_num,
                rect,
                is_internal,
                uri,
                dest_page,
            });
        }
    }
    annotations
}

pub fn count_internal_links(doc: &LopdfDocument) -> usize {
    extract_link_annotations(doc).iter().filter(|a| a.is_internal).count()
}

pub fn count_external_links(doc: &LopdfDocument) -> usize {
    extract_link_annotations(doc).iter().filter(|a| !a.is_internal).count()
}

/// Get page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let page_id = *doc.get_pages().get(&page_num)?;
    let media_box = doc.get_dictionary(page_id).ok()?.get(b"MediaBox").ok()?.as_array().ok()?;
    if media_box.len() < 4 {
        return None;
    }
    let width = media_box[2].as_float().ok()? - media_box[0].as_float().ok()?;
    let height = media_box[3].as_float().ok()? - media_box[1].as_float().ok()?;
    Some((width, height))
}

pub fn has_outlines(doc: &LopdfDocument) -> bool {
    doc.catalog().map(|c| c.has(b"Outlines")).unwrap_or(false)
}

/// Number of image XObjects in the file.
pub fn count_images(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice())
                && stream.dict.get(b"ColorSpace").and_then(Object::as_name).ok() == Some(b"DeviceRGB".as_slice())
        })
        .count()
}

/// Title from the document Info dictionary.
pub fn info_title(doc: &LopdfDocument) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok().and_then(|i| resolve_dict(doc, i))?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(title).to_string())
}

// ============================================================================
// Fluent Assertion Macros
// ============================================================================

#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should contain font matching '{}', fonts found: {:?}",
            $pattern,
            fonts
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_page_size {
    ($pdf:expr, $page:expr, $width:expr, $height:expr) => {
        let dims = $crate::common::pdf_assertions::get_page_dimensions(&$pdf.doc, $page);
        assert!(dims.is_some(), "Could not get dimensions for page {}", $page);
        let (w, h) = dims.unwrap();
        assert!((w - $width).abs() < 1.0, "Page {} width expected ~{}, got {}", $page, $width, w);
        assert!((h - $height).abs() < 1.0, "Page {} height expected ~{}, got {}", $page, $height, h);
    };
}
