//! PDF backend built on the `lopdf` object model.
//!
//! [`LopdfBackend`] implements `DocumentBackend`: every page gets its own
//! content stream, fonts and images live in one shared resource dictionary,
//! and link annotations, anchors and outlines are resolved when the document
//! is finished.

mod annotations;
mod backend;
mod content;
mod outline;
mod writer;

pub use backend::LopdfBackend;
