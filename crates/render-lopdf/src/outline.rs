//! Document outline (bookmarks) built from heading entries.

use crate::annotations::AnnotationSink;
use crate::writer::{text_string, PdfWriter};
use folio_render_core::OutlineEntry;
use lopdf::{dictionary, Object, ObjectId};
use std::collections::HashMap;

struct OutlineNode {
    id: ObjectId,
    title: String,
    dest: Vec<Object>,
    children: Vec<OutlineNode>,
}

/// Writes the outline tree and returns the id of its root dictionary, or
/// `None` when no entry resolves to a destination.
pub(crate) fn build_outlines(
    writer: &mut PdfWriter,
    entries: &[OutlineEntry],
    sink: &AnnotationSink,
    page_ids: &[ObjectId],
) -> Option<ObjectId> {
    struct FlatItem {
        id: ObjectId,
        title: String,
        dest: Vec<Object>,
        parent: Option<usize>,
    }

    let mut flat: Vec<FlatItem> = Vec::new();
    // (level, index into `flat`)
    let mut stack: Vec<(u8, usize)> = Vec::new();

    for entry in entries {
        let Some(dest) = sink.destination(&entry.anchor, page_ids) else {
            continue;
        };
        while stack.last().is_some_and(|(level, _)| *level >= entry.level) {
            stack.pop();
        }
        let parent = stack.last().map(|(_, idx)| *idx);
        flat.push(FlatItem {
            id: writer.new_object_id(),
            title: entry.title.clone(),
            dest,
            parent,
        });
        stack.push((entry.level, flat.len() - 1));
    }

    let mut children_of: HashMap<usize, Vec<OutlineNode>> = HashMap::new();
    let mut roots = Vec::new();
    for (idx, item) in flat.into_iter().enumerate().rev() {
        let mut children = children_of.remove(&idx).unwrap_or_default();
        children.reverse();
        let node = OutlineNode {
            id: item.id,
            title: item.title,
            dest: item.dest,
            children,
        };
        match item.parent {
            Some(parent) => children_of.entry(parent).or_default().push(node),
            None => roots.push(node),
        }
    }
    roots.reverse();

    let (first, last) = (roots.first()?.id, roots.last()?.id);
    let root_id = writer.new_object_id();
    write_level(writer, &roots, root_id);
    writer.set_object(
        root_id,
        dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => roots.len() as i64,
        },
    );
    Some(root_id)
}

fn write_level(writer: &mut PdfWriter, items: &[OutlineNode], parent: ObjectId) {
    for (i, item) in items.iter().enumerate() {
        let mut dict = dictionary! {
            "Title" => text_string(&item.title),
            "Parent" => parent,
            "Dest" => item.dest.clone(),
        };
        if i > 0 {
            dict.set("Prev", items[i - 1].id);
        }
        if let Some(next) = items.get(i + 1) {
            dict.set("Next", next.id);
        }
        if let (Some(first), Some(last)) = (item.children.first(), item.children.last()) {
            dict.set("First", first.id);
            dict.set("Last", last.id);
            // Negative count: children start collapsed.
            dict.set("Count", -(item.children.len() as i64));
            write_level(writer, &item.children, item.id);
        }
        writer.set_object(item.id, dict);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{AnchorId, PageHandle};

    fn entry(title: &str, level: u8) -> OutlineEntry {
        OutlineEntry {
            title: title.to_string(),
            anchor: AnchorId::from(title),
            level,
        }
    }

    #[test]
    fn nests_by_level_and_skips_unresolved() {
        let mut writer = PdfWriter::new("1.7");
        let page_ids = vec![writer.new_object_id()];
        let mut sink = AnnotationSink::default();
        for (i, name) in ["a", "a1", "b"].iter().enumerate() {
            sink.define_anchor(&AnchorId::from(*name), PageHandle(0), 800.0 - i as f32 * 10.0);
        }
        let entries = vec![entry("a", 1), entry("a1", 2), entry("ghost", 2), entry("b", 1)];

        assert!(build_outlines(&mut writer, &entries, &sink, &page_ids).is_some());
    }

    #[test]
    fn no_resolvable_entries_means_no_outline() {
        let mut writer = PdfWriter::new("1.7");
        let sink = AnnotationSink::default();
        assert!(build_outlines(&mut writer, &[entry("x", 1)], &sink, &[]).is_none());
    }
}
