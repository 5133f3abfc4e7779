//! Link targets and the checks every backend applies before it creates a
//! link annotation.

use folio_types::{AnchorId, LinkUri, PageHandle, PageRect, Size};
use std::fmt;
use thiserror::Error;

/// Where a clickable region leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    Uri(LinkUri),
    /// An internal destination, resolved when the document is finished.
    Anchor(AnchorId),
}

impl LinkTarget {
    /// `#id` hrefs become internal anchors, anything else is a URI.
    pub fn from_href(href: &str) -> Self {
        match href.strip_prefix('#') {
            Some(id) => LinkTarget::Anchor(AnchorId::from(id)),
            None => LinkTarget::Uri(LinkUri::from(href)),
        }
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::Uri(uri) => write!(f, "{}", uri),
            LinkTarget::Anchor(id) => write!(f, "#{}", id),
        }
    }
}

/// Opaque handle of a registered annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(pub usize);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    #[error("Link rectangle has non-finite coordinates: {0:?}")]
    NonFiniteRect([f32; 4]),
    #[error("Link rectangle has no area: {0:?}")]
    EmptyRect([f32; 4]),
    #[error("Link rectangle {rect:?} lies outside the {width:.2} x {height:.2} page")]
    OutsidePage { rect: [f32; 4], width: f32, height: f32 },
    #[error("Invalid link URI '{0}'")]
    InvalidUri(String),
    #[error("Internal link has an empty anchor id")]
    EmptyAnchor,
    #[error("Annotation refers to an unknown page ({0})")]
    UnknownPage(PageHandle),
    #[error("Backend rejected the annotation: {0}")]
    Backend(String),
}

/// Rejects malformed geometry and targets before they reach the object model.
///
/// Rectangles may touch the page edge; anything extending beyond it is
/// rejected.
pub fn validate_link(page: Size, rect: &PageRect, target: &LinkTarget) -> Result<(), AnnotationError> {
    const SLACK: f32 = 0.5;
    let coords = rect.as_array();
    if !rect.is_finite() {
        return Err(AnnotationError::NonFiniteRect(coords));
    }
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(AnnotationError::EmptyRect(coords));
    }
    if rect.llx < -SLACK
        || rect.lly < -SLACK
        || rect.urx > page.width + SLACK
        || rect.ury > page.height + SLACK
    {
        return Err(AnnotationError::OutsidePage {
            rect: coords,
            width: page.width,
            height: page.height,
        });
    }

    match target {
        LinkTarget::Uri(uri) => {
            let s = uri.as_str();
            if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(AnnotationError::InvalidUri(s.to_string()));
            }
        }
        LinkTarget::Anchor(id) => {
            if id.as_str().is_empty() {
                return Err(AnnotationError::EmptyAnchor);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Size {
        Size::new(595.28, 841.89)
    }

    fn rect(llx: f32, lly: f32, urx: f32, ury: f32) -> PageRect {
        PageRect { llx, lly, urx, ury }
    }

    #[test]
    fn href_parsing() {
        assert_eq!(LinkTarget::from_href("#intro"), LinkTarget::Anchor(AnchorId::from("intro")));
        assert_eq!(
            LinkTarget::from_href("https://example.com"),
            LinkTarget::Uri(LinkUri::from("https://example.com"))
        );
        assert_eq!(LinkTarget::from_href("#intro").to_string(), "#intro");
    }

    #[test]
    fn accepts_well_formed_links() {
        let target = LinkTarget::from_href("https://example.com/a?b=c");
        assert!(validate_link(page(), &rect(56.0, 700.0, 300.0, 715.0), &target).is_ok());
    }

    #[test]
    fn rejects_bad_geometry() {
        let target = LinkTarget::from_href("https://example.com");
        assert!(matches!(
            validate_link(page(), &rect(0.0, f32::NAN, 10.0, 10.0), &target),
            Err(AnnotationError::NonFiniteRect(_))
        ));
        assert!(matches!(
            validate_link(page(), &rect(10.0, 10.0, 10.0, 20.0), &target),
            Err(AnnotationError::EmptyRect(_))
        ));
        assert!(matches!(
            validate_link(page(), &rect(10.0, 830.0, 50.0, 900.0), &target),
            Err(AnnotationError::OutsidePage { .. })
        ));
    }

    #[test]
    fn rejects_bad_targets() {
        let r = rect(10.0, 10.0, 50.0, 20.0);
        assert!(matches!(
            validate_link(page(), &r, &LinkTarget::from_href("not a url")),
            Err(AnnotationError::InvalidUri(_))
        ));
        assert!(matches!(
            validate_link(page(), &r, &LinkTarget::from_href("")),
            Err(AnnotationError::InvalidUri(_))
        ));
        assert_eq!(
            validate_link(page(), &r, &LinkTarget::from_href("#")),
            Err(AnnotationError::EmptyAnchor)
        );
    }
}
