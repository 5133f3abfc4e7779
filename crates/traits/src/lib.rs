//! Capabilities the engine and its callers consume without caring where the
//! bytes come from.
//!
//! - [`ResourceProvider`] loads binary assets (images) referenced by blocks.
//! - [`DataProvider`] reads structured JSON content for callers that assemble
//!   documents before handing them to the builder.

pub mod data;
pub mod resource;

pub use data::{DataError, DataProvider, InMemoryDataProvider};
pub use resource::{
    join_asset_path, InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData,
};
