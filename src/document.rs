use crate::blocks::Block;
use crate::error::BuildError;
use crate::options::TocEntry;
use folio_traits::DataProvider;
use folio_types::{Margins, PageSize};
use serde::{Deserialize, Serialize};

/// One item to lay out: its metadata and the ordered blocks that make up its
/// body. Page geometry left unset falls back to the build options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub page_size: Option<PageSize>,
    pub margins: Option<Margins>,
    pub blocks: Vec<Block>,
    pub toc: Option<Vec<TocEntry>>,
    pub breadcrumb: Option<Vec<String>>,
    pub category: Option<String>,
    /// Base path that relative image sources are resolved against.
    pub asset_base: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Reads a document from JSON through a [`DataProvider`].
    pub fn load(provider: &dyn DataProvider, path: &str) -> Result<Self, BuildError> {
        let value = provider.read_json(path)?;
        let document: Document = serde_json::from_value(value)?;
        log::debug!(
            "Loaded document '{}' from {} ({} blocks)",
            document.id,
            path,
            document.blocks.len()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_traits::InMemoryDataProvider;
    use serde_json::json;

    #[test]
    fn load_through_data_provider() {
        let mut provider = InMemoryDataProvider::new();
        provider.insert(
            "docs/intro.json",
            json!({
                "id": "intro",
                "title": "Introduction",
                "pageSize": "Letter",
                "blocks": [{ "type": "title", "text": "Hello" }, { "type": "spoiler" }],
                "breadcrumb": ["Docs", "Intro"]
            }),
        );

        let doc = Document::load(&provider, "docs/intro.json").unwrap();
        assert_eq!(doc.id, "intro");
        assert_eq!(doc.page_size, Some(PageSize::Letter));
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1].kind(), "spoiler");
        assert!(matches!(
            Document::load(&provider, "missing.json"),
            Err(BuildError::Data(_))
        ));
    }
}
