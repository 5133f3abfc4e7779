//! Heading anchors and the table of contents.
//!
//! Anchor ids are planned for every document of a build before anything is
//! drawn, so TOC links drawn on the first page can point at headings that
//! are laid out later.

use crate::blocks::Block;
use crate::context::LayoutContext;
use crate::document::Document;
use crate::draw::{draw_link_text, draw_text, LinkTextOptions, TextOptions};
use crate::options::{GenerateOptions, Theme, TocEntry};
use folio_layout::{FontRole, LayoutError};
use folio_types::AnchorId;
use std::collections::{HashMap, HashSet};

/// Which heading an anchor belongs to: a title block, or the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum HeadingKey {
    Document(usize),
    Block(usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlannedHeading {
    pub key: HeadingKey,
    pub anchor: AnchorId,
    pub title: String,
    /// Outline depth, 1 being the top level.
    pub level: u8,
}

#[derive(Debug, Default)]
pub(crate) struct AnchorPlan {
    pub headings: Vec<PlannedHeading>,
    by_key: HashMap<HeadingKey, usize>,
}

impl AnchorPlan {
    pub fn heading(&self, key: HeadingKey) -> Option<&PlannedHeading> {
        self.by_key.get(&key).map(|&i| &self.headings[i])
    }

    /// Plans unique anchor ids for every title block. With `document_titles`
    /// each document title becomes a top-level heading and block titles nest
    /// one level below it.
    pub fn build(documents: &[&Document], document_titles: bool) -> Self {
        let mut plan = AnchorPlan::default();
        let mut used = HashSet::new();
        let nesting = u8::from(document_titles);

        for (doc_index, document) in documents.iter().enumerate() {
            if document_titles {
                let base = if document.id.is_empty() { &document.title } else { &document.id };
                plan.push(
                    HeadingKey::Document(doc_index),
                    unique_id(base, &mut used),
                    document.title.clone(),
                    1,
                );
            }
            for (block_index, block) in document.blocks.iter().enumerate() {
                if let Block::Title(title) = block {
                    let base = title.id.as_deref().unwrap_or(&title.text);
                    plan.push(
                        HeadingKey::Block(doc_index, block_index),
                        unique_id(base, &mut used),
                        title.text.clone(),
                        title.level.max(1).saturating_add(nesting),
                    );
                }
            }
        }
        plan
    }

    fn push(&mut self, key: HeadingKey, anchor: AnchorId, title: String, level: u8) {
        self.by_key.insert(key, self.headings.len());
        self.headings.push(PlannedHeading {
            key,
            anchor,
            title,
            level,
        });
    }
}

fn unique_id(base: &str, used: &mut HashSet<String>) -> AnchorId {
    let mut slug = slug::slugify(base);
    if slug.is_empty() {
        slug = "section".to_string();
    }
    let mut candidate = slug.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}", slug, n);
        n += 1;
    }
    AnchorId::new(candidate)
}

/// TOC rows: explicit options first, then the documents' own lists, then
/// everything planned down to the third outline level.
pub(crate) fn toc_entries(options: &GenerateOptions, documents: &[&Document], plan: &AnchorPlan) -> Vec<TocEntry> {
    if let Some(entries) = &options.toc_entries {
        return entries.clone();
    }
    let own: Vec<TocEntry> = documents
        .iter()
        .filter_map(|d| d.toc.as_ref())
        .flatten()
        .cloned()
        .collect();
    if !own.is_empty() {
        return own;
    }
    plan.headings
        .iter()
        .filter(|h| h.level <= 3)
        .map(|h| TocEntry {
            id: h.anchor.to_string(),
            title: h.title.clone(),
            level: h.level - 1,
        })
        .collect()
}

const TOC_INDENT: f32 = 14.0;

/// Draws the contents page(s) followed by a page break.
pub(crate) fn draw_toc(ctx: &mut LayoutContext, theme: &Theme, entries: &[TocEntry]) -> Result<(), LayoutError> {
    let heading = TextOptions::new()
        .font(FontRole::Bold)
        .size(theme.heading_size(1))
        .color(theme.heading_color)
        .line_height(1.25)
        .spacing(0.0, theme.heading_size(1) * 0.5);
    draw_text(ctx, "Contents", &heading)?;

    let left = ctx.area().left;
    for entry in entries {
        let opts = LinkTextOptions {
            label: Some(entry.title.clone()),
            text: TextOptions::new()
                .x(left + TOC_INDENT * entry.level as f32)
                .font(if entry.level == 0 { FontRole::Bold } else { FontRole::Regular })
                .color(theme.link_color)
                .spacing(0.0, 2.0),
            underline: false,
        };
        draw_link_text(ctx, &format!("#{}", entry.id), &opts)?;
    }
    ctx.add_page();
    Ok(())
}
