use folio_traits::{DataError, DataProvider, ResourceError, ResourceProvider, SharedResourceData};
use log::debug;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads assets and JSON data relative to a root directory.
///
/// Absolute paths and paths climbing above the root (`..`) are rejected and
/// reported as missing.
#[derive(Debug)]
pub struct FilesystemProvider {
    root: PathBuf,
    canonical_root: Option<PathBuf>,
}

impl FilesystemProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let canonical_root = root.canonicalize().ok();
        Self { root, canonical_root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return None;
        }
        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }

        let joined = self.root.join(relative);
        match (joined.canonicalize(), &self.canonical_root) {
            // Symlinks may still point outside the root.
            (Ok(canonical), Some(root)) if !canonical.starts_with(root) => None,
            (Ok(canonical), _) => Some(canonical),
            (Err(_), _) => Some(joined),
        }
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, std::io::Error> {
        let full = self.resolve(path).ok_or_else(|| {
            debug!("Rejected path outside provider root: {}", path);
            std::io::Error::new(std::io::ErrorKind::NotFound, "path escapes provider root")
        })?;
        std::fs::read(full)
    }
}

impl ResourceProvider for FilesystemProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        self.read_bytes(path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn base_path(&self) -> Option<&str> {
        self.root.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemProvider"
    }
}

impl DataProvider for FilesystemProvider {
    fn read_json(&self, path: &str) -> Result<Value, DataError> {
        let bytes = self.read_bytes(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataError::NotFound(path.to_string())
            } else {
                DataError::Io {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|source| DataError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn file_exists(&self, path: &str) -> bool {
        ResourceProvider::exists(self, path)
    }
}
