//! A backend that records every primitive instead of producing a file.
//!
//! Layout tests drive it through a `LayoutContext` and inspect the log
//! afterwards through the shared [`RecordingLog`] handle.

use crate::annotation::{validate_link, AnnotationError, AnnotationId, LinkTarget};
use crate::error::RenderError;
use crate::image::ImageObject;
use crate::traits::DocumentBackend;
use crate::types::{BackendOutput, DocumentInfo, GlyphRun, OutlineEntry, StrokeStyle};
use folio_layout::{FontRole, FontSet};
use folio_types::{AnchorId, Color, PageHandle, PageRect, Point, Size};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedOp {
    Text {
        page: PageHandle,
        text: String,
        font: FontRole,
        size: f32,
        x: f32,
        baseline: f32,
    },
    Fill {
        page: PageHandle,
        rect: PageRect,
        color: Color,
    },
    StrokeRect {
        page: PageHandle,
        rect: PageRect,
        stroke: StrokeStyle,
    },
    Line {
        page: PageHandle,
        from: Point,
        to: Point,
        stroke: StrokeStyle,
    },
    Image {
        page: PageHandle,
        key: String,
        rect: PageRect,
        clip: Option<PageRect>,
    },
}

impl RecordedOp {
    pub fn page(&self) -> PageHandle {
        match self {
            RecordedOp::Text { page, .. }
            | RecordedOp::Fill { page, .. }
            | RecordedOp::StrokeRect { page, .. }
            | RecordedOp::Line { page, .. }
            | RecordedOp::Image { page, .. } => *page,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Recording {
    pub pages: Vec<Size>,
    pub ops: Vec<RecordedOp>,
    pub links: Vec<(PageHandle, PageRect, LinkTarget)>,
    pub anchors: Vec<(AnchorId, PageHandle, f32)>,
    pub outline: Vec<OutlineEntry>,
    pub info: DocumentInfo,
    pub finished: bool,
}

impl Recording {
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            RecordedOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn ops_on(&self, page: PageHandle) -> impl Iterator<Item = &RecordedOp> + '_ {
        self.ops.iter().filter(move |op| op.page() == page)
    }
}

/// Shared view of a [`RecordingBackend`]'s log that outlives the backend.
#[derive(Debug, Clone, Default)]
pub struct RecordingLog(Arc<Mutex<Recording>>);

impl RecordingLog {
    pub fn snapshot(&self) -> Recording {
        self.0.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Recording) -> R) -> Option<R> {
        self.0.lock().ok().map(|mut r| f(&mut r))
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    log: RecordingLog,
    reject_links: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> (Self, RecordingLog) {
        let backend = Self::default();
        let log = backend.log.clone();
        (backend, log)
    }

    /// Makes every `add_link` fail with `AnnotationError::Backend(reason)`.
    pub fn rejecting_links(mut self, reason: impl Into<String>) -> Self {
        self.reject_links = Some(reason.into());
        self
    }

    fn push(&self, op: RecordedOp) {
        self.log.with(|r| r.ops.push(op));
    }
}

impl DocumentBackend for RecordingBackend {
    fn begin(&mut self, _fonts: &FontSet, info: &DocumentInfo) {
        self.log.with(|r| r.info = info.clone());
    }

    fn add_page(&mut self, size: Size) -> PageHandle {
        self.log
            .with(|r| {
                r.pages.push(size);
                PageHandle(r.pages.len() - 1)
            })
            .unwrap_or(PageHandle(0))
    }

    fn page_count(&self) -> usize {
        self.log.with(|r| r.pages.len()).unwrap_or(0)
    }

    fn page_size(&self, page: PageHandle) -> Option<Size> {
        self.log.with(|r| r.pages.get(page.index()).copied()).flatten()
    }

    fn draw_glyph_run(&mut self, page: PageHandle, run: &GlyphRun<'_>) {
        self.push(RecordedOp::Text {
            page,
            text: run.text.to_string(),
            font: run.font,
            size: run.size,
            x: run.x,
            baseline: run.baseline,
        });
    }

    fn fill_rect(&mut self, page: PageHandle, rect: PageRect, color: &Color) {
        self.push(RecordedOp::Fill {
            page,
            rect,
            color: *color,
        });
    }

    fn stroke_rect(&mut self, page: PageHandle, rect: PageRect, stroke: &StrokeStyle) {
        self.push(RecordedOp::StrokeRect {
            page,
            rect,
            stroke: *stroke,
        });
    }

    fn stroke_line(&mut self, page: PageHandle, from: Point, to: Point, stroke: &StrokeStyle) {
        self.push(RecordedOp::Line {
            page,
            from,
            to,
            stroke: *stroke,
        });
    }

    fn draw_image(
        &mut self,
        page: PageHandle,
        image: &Arc<ImageObject>,
        rect: PageRect,
        clip: Option<PageRect>,
    ) {
        self.push(RecordedOp::Image {
            page,
            key: image.key().to_string(),
            rect,
            clip,
        });
    }

    fn add_link(
        &mut self,
        page: PageHandle,
        rect: PageRect,
        target: &LinkTarget,
    ) -> Result<AnnotationId, AnnotationError> {
        if let Some(reason) = &self.reject_links {
            return Err(AnnotationError::Backend(reason.clone()));
        }
        let size = self.page_size(page).ok_or(AnnotationError::UnknownPage(page))?;
        validate_link(size, &rect, target)?;
        self.log
            .with(|r| {
                r.links.push((page, rect, target.clone()));
                AnnotationId(r.links.len() - 1)
            })
            .ok_or_else(|| AnnotationError::Backend("recording lock poisoned".to_string()))
    }

    fn define_anchor(&mut self, anchor: &AnchorId, page: PageHandle, y: f32) {
        self.log.with(|r| r.anchors.push((anchor.clone(), page, y)));
    }

    fn add_outline_entry(&mut self, entry: OutlineEntry) {
        self.log.with(|r| r.outline.push(entry));
    }

    fn finish(self: Box<Self>) -> Result<BackendOutput, RenderError> {
        let output = self
            .log
            .with(|r| {
                r.finished = true;
                let defined: BTreeSet<&AnchorId> = r.anchors.iter().map(|(id, _, _)| id).collect();
                let dangling_links = r
                    .links
                    .iter()
                    .filter_map(|(_, _, target)| match target {
                        LinkTarget::Anchor(id) if !defined.contains(id) => Some(id.clone()),
                        _ => None,
                    })
                    .collect();
                BackendOutput {
                    bytes: Vec::new(),
                    page_count: r.pages.len(),
                    dangling_links,
                }
            })
            .ok_or_else(|| RenderError::Other("recording lock poisoned".to_string()))?;
        if output.page_count == 0 {
            return Err(RenderError::EmptyDocument);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_primitives_and_links() {
        let (backend, log) = RecordingBackend::new();
        let mut backend: Box<dyn DocumentBackend> = Box::new(backend);
        backend.begin(&FontSet::sans(), &DocumentInfo::default());
        let page = backend.add_page(Size::new(200.0, 200.0));
        backend.fill_rect(page, PageRect { llx: 0.0, lly: 0.0, urx: 10.0, ury: 10.0 }, &Color::gray(0));
        let rect = PageRect { llx: 10.0, lly: 10.0, urx: 50.0, ury: 20.0 };
        backend.add_link(page, rect, &LinkTarget::from_href("#missing")).unwrap();

        let output = backend.finish().unwrap();
        assert_eq!(output.page_count, 1);
        assert_eq!(output.dangling_links, vec![AnchorId::from("missing")]);

        let rec = log.snapshot();
        assert!(rec.finished);
        assert_eq!(rec.ops.len(), 1);
        assert_eq!(rec.links.len(), 1);
    }

    #[test]
    fn unknown_page_link_is_rejected() {
        let (mut backend, _log) = RecordingBackend::new();
        let rect = PageRect { llx: 10.0, lly: 10.0, urx: 50.0, ury: 20.0 };
        let err = backend
            .add_link(PageHandle(3), rect, &LinkTarget::from_href("https://a.test"))
            .unwrap_err();
        assert_eq!(err, AnnotationError::UnknownPage(PageHandle(3)));
    }

    #[test]
    fn empty_document_fails_to_finish() {
        let (backend, _log) = RecordingBackend::new();
        assert!(matches!(Box::new(backend).finish(), Err(RenderError::EmptyDocument)));
    }
}
