//! Filesystem-backed implementations of the `folio-traits` capabilities.
//!
//! [`FilesystemProvider`] serves both image assets ([`ResourceProvider`]) and
//! JSON content ([`DataProvider`]) from a single root directory, refusing any
//! path that would resolve outside of it.

mod filesystem;

pub use filesystem::FilesystemProvider;

pub use folio_traits::{
    DataProvider, InMemoryDataProvider, InMemoryResourceProvider, ResourceProvider,
};
