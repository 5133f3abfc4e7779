//! A paginated document canvas: structured content blocks in, PDF out.
//!
//! A [`Document`] is an ordered list of [`Block`]s. The [`DocumentBuilder`]
//! resolves images and charts asynchronously, then lays the blocks out in a
//! single synchronous pass over one [`LayoutContext`], breaking pages as the
//! cursor runs out of room and attaching link annotations to the page each
//! line of linked text landed on.

pub mod blocks;
pub mod builder;
pub mod context;
pub mod document;
pub mod draw;
pub mod error;
pub mod options;
pub mod report;

pub use blocks::{Block, ImageFit, ListItem, MessageKind, RuleStyle, TextStyle};
pub use builder::{BuildOutput, DocumentBuilder, PreparedDocument};
pub use context::{CanvasState, LayoutContext};
pub use document::Document;
pub use error::BuildError;
pub use options::{Align, GenerateOptions, MessagePalette, Theme, TocEntry};
pub use report::{BuildReport, LinkFailure};

pub use folio_chart::{ChartRenderer, RasterChartRenderer};
pub use folio_layout::{FontFamily, FontRole, FontSet, LayoutError};
pub use folio_render_core::{AnnotationError, DocumentBackend, LinkTarget, RenderError};
pub use folio_traits::{
    DataProvider, InMemoryDataProvider, InMemoryResourceProvider, ResourceProvider,
};
pub use folio_types::{mm, AnchorId, Color, Margins, PageSize, Rect, Size};

#[cfg(feature = "native")]
pub use folio_resource::FilesystemProvider;
