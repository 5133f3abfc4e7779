//! Newtype wrappers for anchor identifiers and link targets.
//!
//! Anchors and URIs are both plain strings on the wire; keeping them as
//! distinct types stops an internal `#id` reference from being written into a
//! URI action or the other way round.

use std::fmt;
use std::sync::Arc;

/// An identifier for a document anchor (headings, TOC targets).
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AnchorId(Arc<str>);

impl AnchorId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AnchorId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An external link target written into a URI action.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LinkUri(Arc<str>);

impl LinkUri {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LinkUri {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for LinkUri {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for LinkUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based index of a page allocated by a backend.
///
/// Handles are only meaningful to the backend that issued them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PageHandle(pub usize);

impl PageHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}", self.0 + 1)
    }
}
