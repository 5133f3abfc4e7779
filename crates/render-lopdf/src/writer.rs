use chrono::Local;
use folio_layout::to_win_ansi;
use folio_render_core::{DocumentInfo, RenderError};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};

/// Owns the object graph and the ids of the document-level dictionaries.
///
/// The catalog, page tree and shared resources are reserved up front and only
/// written in [`finish`](PdfWriter::finish), once every page is known.
pub(crate) struct PdfWriter {
    doc: Document,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
}

impl PdfWriter {
    pub fn new(version: &str) -> Self {
        let mut doc = Document::with_version(version);
        let resources_id = doc.new_object_id();
        let pages_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();
        Self {
            doc,
            catalog_id,
            pages_id,
            resources_id,
        }
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.doc.new_object_id()
    }

    pub fn add_object<T: Into<Object>>(&mut self, object: T) -> ObjectId {
        self.doc.add_object(object)
    }

    pub fn set_object<T: Into<Object>>(&mut self, id: ObjectId, object: T) {
        self.doc.objects.insert(id, object.into());
    }

    pub fn finish(
        mut self,
        resources: Dictionary,
        page_ids: &[ObjectId],
        outline_root: Option<ObjectId>,
        info: &DocumentInfo,
    ) -> Result<Vec<u8>, RenderError> {
        self.set_object(self.resources_id, resources);
        self.set_object(
            self.pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
                "Count" => page_ids.len() as i64,
            },
        );

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if let Some(outline_id) = outline_root {
            catalog.set("Outlines", outline_id);
            catalog.set("PageMode", "UseOutlines");
        }
        self.set_object(self.catalog_id, catalog);

        let info_id = self.add_object(info_dictionary(info));
        self.doc.trailer.set("Root", self.catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| RenderError::Pdf(format!("failed to serialize document: {}", e)))?;
        Ok(bytes)
    }
}

pub(crate) fn text_string(s: &str) -> Object {
    Object::String(to_win_ansi(s), StringFormat::Literal)
}

fn info_dictionary(info: &DocumentInfo) -> Dictionary {
    let created = Local::now().format("D:%Y%m%d%H%M%S").to_string();
    let mut dict = dictionary! {
        "Producer" => text_string(&info.producer),
        "CreationDate" => Object::string_literal(created),
    };
    if let Some(title) = &info.title {
        dict.set("Title", text_string(title));
    }
    if let Some(subject) = &info.subject {
        dict.set("Subject", text_string(subject));
    }
    dict
}
