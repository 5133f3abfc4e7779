use folio_chart::ChartError;
use folio_layout::LayoutError;
use folio_render_core::RenderError;
use folio_traits::{DataError, ResourceError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("PDF rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Chart in block {block} of '{document}' failed: {source}")]
    Chart {
        document: String,
        block: usize,
        #[source]
        source: ChartError,
    },

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for BuildError {
    fn from(err: tokio::task::JoinError) -> Self {
        BuildError::Task(err.to_string())
    }
}
