//! The annotation sink: the only place link dictionaries and destinations are
//! built. The rest of the backend hands it validated rectangles and targets.

use crate::writer::PdfWriter;
use folio_render_core::{AnnotationId, LinkTarget};
use folio_types::{AnchorId, PageHandle, PageRect};
use log::warn;
use lopdf::{dictionary, Object, ObjectId};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy)]
struct Destination {
    page: PageHandle,
    y: f32,
}

#[derive(Debug)]
struct PendingLink {
    page: PageHandle,
    rect: PageRect,
    target: LinkTarget,
}

#[derive(Debug, Default)]
pub(crate) struct AnnotationSink {
    links: Vec<PendingLink>,
    anchors: BTreeMap<AnchorId, Destination>,
}

/// Annotations per page index, plus internal targets that never resolved.
pub(crate) struct ResolvedAnnotations {
    pub by_page: HashMap<usize, Vec<ObjectId>>,
    pub dangling: Vec<AnchorId>,
}

impl AnnotationSink {
    pub fn register(&mut self, page: PageHandle, rect: PageRect, target: LinkTarget) -> AnnotationId {
        self.links.push(PendingLink { page, rect, target });
        AnnotationId(self.links.len() - 1)
    }

    /// The first definition of an anchor wins.
    pub fn define_anchor(&mut self, anchor: &AnchorId, page: PageHandle, y: f32) {
        if self.anchors.contains_key(anchor) {
            warn!("Anchor '{}' defined more than once; keeping the first", anchor);
            return;
        }
        self.anchors.insert(anchor.clone(), Destination { page, y });
    }

    /// Explicit destination array for an anchor: `[page /FitH y]`.
    pub fn destination(&self, anchor: &AnchorId, page_ids: &[ObjectId]) -> Option<Vec<Object>> {
        let dest = self.anchors.get(anchor)?;
        let page_id = page_ids.get(dest.page.index())?;
        Some(vec![Object::Reference(*page_id), "FitH".into(), dest.y.into()])
    }

    pub fn resolve(&self, writer: &mut PdfWriter, page_ids: &[ObjectId]) -> ResolvedAnnotations {
        let mut by_page: HashMap<usize, Vec<ObjectId>> = HashMap::new();
        let mut dangling = Vec::new();

        for link in &self.links {
            let action = match &link.target {
                LinkTarget::Uri(uri) => dictionary! {
                    "Type" => "Action",
                    "S" => "URI",
                    "URI" => Object::string_literal(uri.as_str()),
                },
                LinkTarget::Anchor(id) => match self.destination(id, page_ids) {
                    Some(dest) => dictionary! { "Type" => "Action", "S" => "GoTo", "D" => dest },
                    None => {
                        warn!("Internal link to undefined anchor '#{}' left unresolved", id);
                        if !dangling.contains(id) {
                            dangling.push(id.clone());
                        }
                        continue;
                    }
                },
            };

            let rect: Vec<Object> = link.rect.as_array().iter().map(|&v| v.into()).collect();
            let annot = dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => rect,
                "Border" => vec![0.into(), 0.into(), 0.into()],
                "A" => action,
            };
            let annot_id = writer.add_object(annot);
            by_page.entry(link.page.index()).or_default().push(annot_id);
        }

        ResolvedAnnotations { by_page, dangling }
    }
}
