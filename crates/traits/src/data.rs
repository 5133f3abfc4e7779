//! DataProvider: the read-only JSON capability callers use to fetch content
//! before a document is assembled.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading '{path}': {message}")]
    Io { path: String, message: String },
}

pub trait DataProvider: Send + Sync + Debug {
    fn read_json(&self, path: &str) -> Result<Value, DataError>;

    fn file_exists(&self, path: &str) -> bool;
}

/// A map-backed provider, mostly useful in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDataProvider {
    files: HashMap<String, Value>,
}

impl InMemoryDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, value: Value) {
        self.files.insert(path.into(), value);
    }
}

impl DataProvider for InMemoryDataProvider {
    fn read_json(&self, path: &str) -> Result<Value, DataError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| DataError::NotFound(path.to_string()))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
