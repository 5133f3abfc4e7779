//! ResourceProvider trait for abstracting asset loading.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Reference-counted asset bytes.
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads binary assets (image files) referenced by content blocks.
///
/// Implementations must be shareable across the concurrent preparation of
/// several documents, hence `Send + Sync`.
pub trait ResourceProvider: Send + Sync + Debug {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    fn exists(&self, path: &str) -> bool;

    /// Base path relative sources are resolved against, if the provider has one.
    fn base_path(&self) -> Option<&str> {
        None
    }

    /// A human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Joins a document's static-asset base path with a block's image source.
///
/// Absolute URLs (`scheme://`) and sources that already start with the base
/// are returned unchanged; a leading `/` on the source is treated as relative
/// to the base.
pub fn join_asset_path(base: Option<&str>, src: &str) -> String {
    let Some(base) = base.filter(|b| !b.is_empty()) else {
        return src.to_string();
    };
    if src.contains("://") || src.starts_with(base) {
        return src.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        src.trim_start_matches('/')
    )
}

/// An in-memory asset store, pre-populated by the caller.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset under `path`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path = path.into();
        let mut resources = self.resources.write().map_err(|_| ResourceError::LoadFailed {
            path: path.clone(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources.insert(path, Arc::new(data));
        Ok(())
    }

    /// Builder-style variant of [`add`](Self::add) for tests and fixtures.
    pub fn with(self, path: impl Into<String>, data: Vec<u8>) -> Result<Self, ResourceError> {
        self.add(path, data)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self.resources.read().map_err(|_| ResourceError::LoadFailed {
            path: path.to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_load() {
        let provider = InMemoryResourceProvider::new();
        provider.add("img/logo.png", b"png".to_vec()).unwrap();

        assert_eq!(&*provider.load("img/logo.png").unwrap(), b"png");
        assert!(provider.exists("img/logo.png"));
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn missing_asset_is_not_found() {
        let provider = InMemoryResourceProvider::new();
        assert!(matches!(provider.load("nope.png"), Err(ResourceError::NotFound(_))));
        assert!(provider.is_empty());
    }

    #[test]
    fn joins_base_path() {
        assert_eq!(join_asset_path(None, "a.png"), "a.png");
        assert_eq!(join_asset_path(Some("static/"), "/img/a.png"), "static/img/a.png");
        assert_eq!(join_asset_path(Some("static"), "static/a.png"), "static/a.png");
        assert_eq!(
            join_asset_path(Some("static"), "https://cdn.test/a.png"),
            "https://cdn.test/a.png"
        );
    }

    #[test]
    fn error_display() {
        let err = ResourceError::LoadFailed {
            path: "file.bin".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("file.bin"));
        let io: ResourceError = std::io::Error::other("boom").into();
        assert!(matches!(io, ResourceError::Io(_)));
    }
}
