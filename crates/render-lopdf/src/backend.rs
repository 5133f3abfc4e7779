use crate::annotations::AnnotationSink;
use crate::content::PageContent;
use crate::outline::build_outlines;
use crate::writer::PdfWriter;
use folio_layout::FontSet;
use folio_render_core::{
    validate_link, AnnotationError, AnnotationId, BackendOutput, DocumentBackend, DocumentInfo,
    GlyphRun, ImageObject, LinkTarget, OutlineEntry, RenderError, StrokeStyle,
};
use folio_types::{AnchorId, Color, PageHandle, PageRect, Point, Size};
use log::{debug, warn};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::sync::Arc;

struct PageState {
    id: ObjectId,
    size: Size,
    content: PageContent,
}

/// A `DocumentBackend` that assembles a PDF with `lopdf`.
pub struct LopdfBackend {
    writer: PdfWriter,
    fonts: Dictionary,
    info: DocumentInfo,
    pages: Vec<PageState>,
    images: HashMap<String, (String, ObjectId)>,
    sink: AnnotationSink,
    outline: Vec<OutlineEntry>,
}

impl Default for LopdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfBackend {
    pub fn new() -> Self {
        Self {
            writer: PdfWriter::new("1.7"),
            fonts: Dictionary::new(),
            info: DocumentInfo::default(),
            pages: Vec::new(),
            images: HashMap::new(),
            sink: AnnotationSink::default(),
            outline: Vec::new(),
        }
    }

    fn page_mut(&mut self, page: PageHandle) -> Option<&mut PageState> {
        let found = self.pages.get_mut(page.index());
        if found.is_none() {
            warn!("Drawing on unknown {} ignored", page);
        }
        found
    }

    /// Registers an image XObject once per image key and returns its resource name.
    fn image_name(&mut self, image: &ImageObject) -> String {
        if let Some((name, _)) = self.images.get(image.key()) {
            return name.clone();
        }

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width_px() as i64,
            "Height" => image.height_px() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(alpha) = image.alpha() {
            let mask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width_px() as i64,
                    "Height" => image.height_px() as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha.to_vec(),
            );
            let mask_id = self.writer.add_object(mask);
            dict.set("SMask", mask_id);
        }
        let id = self.writer.add_object(Stream::new(dict, image.rgb().to_vec()));
        let name = format!("Im{}", self.images.len() + 1);
        debug!(
            "Embedded image '{}' ({}x{}) as /{}",
            image.key(),
            image.width_px(),
            image.height_px(),
            name
        );
        self.images.insert(image.key().to_string(), (name.clone(), id));
        name
    }

    fn resources(&self) -> Dictionary {
        let mut xobjects = Dictionary::new();
        for (name, id) in self.images.values() {
            xobjects.set(name.as_bytes(), Object::Reference(*id));
        }
        let mut resources = dictionary! { "Font" => self.fonts.clone() };
        if !xobjects.is_empty() {
            resources.set("XObject", xobjects);
        }
        resources
    }
}

impl DocumentBackend for LopdfBackend {
    fn begin(&mut self, fonts: &FontSet, info: &DocumentInfo) {
        let mut font_dict = Dictionary::new();
        for (role, face) in fonts.faces() {
            let single = dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.postscript_name,
                "Encoding" => "WinAnsiEncoding",
            };
            font_dict.set(role.resource_name().as_bytes(), Object::Dictionary(single));
        }
        self.fonts = font_dict;
        self.info = info.clone();
    }

    fn add_page(&mut self, size: Size) -> PageHandle {
        let id = self.writer.new_object_id();
        self.pages.push(PageState {
            id,
            size,
            content: PageContent::default(),
        });
        PageHandle(self.pages.len() - 1)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page: PageHandle) -> Option<Size> {
        self.pages.get(page.index()).map(|p| p.size)
    }

    fn draw_glyph_run(&mut self, page: PageHandle, run: &GlyphRun<'_>) {
        if let Some(state) = self.page_mut(page) {
            state.content.text(run);
        }
    }

    fn fill_rect(&mut self, page: PageHandle, rect: PageRect, color: &Color) {
        if let Some(state) = self.page_mut(page) {
            state.content.fill_rect(&rect, color);
        }
    }

    fn stroke_rect(&mut self, page: PageHandle, rect: PageRect, stroke: &StrokeStyle) {
        if let Some(state) = self.page_mut(page) {
            state.content.stroke_rect(&rect, stroke);
        }
    }

    fn stroke_line(&mut self, page: PageHandle, from: Point, to: Point, stroke: &StrokeStyle) {
        if let Some(state) = self.page_mut(page) {
            state.content.line(from, to, stroke);
        }
    }

    fn draw_image(
        &mut self,
        page: PageHandle,
        image: &Arc<ImageObject>,
        rect: PageRect,
        clip: Option<PageRect>,
    ) {
        if self.page_mut(page).is_none() {
            return;
        }
        let name = self.image_name(image);
        if let Some(state) = self.pages.get_mut(page.index()) {
            state.content.image(&name, &rect, clip.as_ref());
        }
    }

    fn add_link(
        &mut self,
        page: PageHandle,
        rect: PageRect,
        target: &LinkTarget,
    ) -> Result<AnnotationId, AnnotationError> {
        let size = self.page_size(page).ok_or(AnnotationError::UnknownPage(page))?;
        validate_link(size, &rect, target)?;
        Ok(self.sink.register(page, rect, target.clone()))
    }

    fn define_anchor(&mut self, anchor: &AnchorId, page: PageHandle, y: f32) {
        self.sink.define_anchor(anchor, page, y);
    }

    fn add_outline_entry(&mut self, entry: OutlineEntry) {
        self.outline.push(entry);
    }

    fn finish(self: Box<Self>) -> Result<BackendOutput, RenderError> {
        let mut backend = *self;
        if backend.pages.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        let page_ids: Vec<ObjectId> = backend.pages.iter().map(|p| p.id).collect();
        let annotations = backend.sink.resolve(&mut backend.writer, &page_ids);
        let outline_root = build_outlines(&mut backend.writer, &backend.outline, &backend.sink, &page_ids);
        let resources = backend.resources();

        let pages = std::mem::take(&mut backend.pages);
        for (index, page) in pages.into_iter().enumerate() {
            let content_id = backend.writer.add_object(Stream::new(dictionary! {}, page.content.encode()?));
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => backend.writer.pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), page.size.width.into(), page.size.height.into()],
                "Contents" => content_id,
                "Resources" => backend.writer.resources_id,
            };
            if let Some(annots) = annotations.by_page.get(&index) {
                page_dict.set(
                    "Annots",
                    Object::Array(annots.iter().map(|id| Object::Reference(*id)).collect()),
                );
            }
            backend.writer.set_object(page.id, page_dict);
        }

        let page_count = page_ids.len();
        let bytes = backend.writer.finish(resources, &page_ids, outline_root, &backend.info)?;
        debug!("Serialized {} pages ({} bytes)", page_count, bytes.len());
        Ok(BackendOutput {
            bytes,
            page_count,
            dangling_links: annotations.dangling,
        })
    }
}
