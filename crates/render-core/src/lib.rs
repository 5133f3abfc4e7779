//! Core rendering abstractions.
//!
//! This crate defines the narrow boundary between layout and the page
//! description format:
//! - `DocumentBackend`, the low-level drawing primitives a backend provides
//! - `ImageObject`, decoded raster data with its declared scale factor
//! - link targets, annotation validation and the error types of rendering
//! - `RecordingBackend`, an in-memory backend used by tests

mod annotation;
mod error;
mod image;
mod recording;
mod traits;
mod types;

pub use annotation::{validate_link, AnnotationError, AnnotationId, LinkTarget};
pub use error::RenderError;
pub use image::{validate_scale, ImageObject};
pub use recording::{Recording, RecordedOp, RecordingBackend, RecordingLog};
pub use traits::DocumentBackend;
pub use types::{BackendOutput, DashPattern, DocumentInfo, GlyphRun, LineCap, OutlineEntry, StrokeStyle};
