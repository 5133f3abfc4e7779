//! Font roles and the base-14 faces that back them.
//!
//! A document resolves its [`FontSet`] once; every drawer refers to faces by
//! [`FontRole`] and the backend maps roles to its own font resources.

use crate::metrics::{self, FaceMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four faces a document draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    #[default]
    Regular,
    Italic,
    Bold,
    Monospace,
}

impl FontRole {
    pub const ALL: [FontRole; 4] = [
        FontRole::Regular,
        FontRole::Italic,
        FontRole::Bold,
        FontRole::Monospace,
    ];

    /// Name of the font in a page's resource dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontRole::Regular => "F1",
            FontRole::Italic => "F2",
            FontRole::Bold => "F3",
            FontRole::Monospace => "F4",
        }
    }
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontRole::Regular => "regular",
            FontRole::Italic => "italic",
            FontRole::Bold => "bold",
            FontRole::Monospace => "monospace",
        };
        f.write_str(name)
    }
}

/// Body text family selected by the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
}

/// A base-14 face: the PostScript name written into the PDF and the metrics
/// used to measure it.
#[derive(Debug, Clone, Copy)]
pub struct FontFace {
    pub postscript_name: &'static str,
    pub metrics: &'static FaceMetrics,
}

impl FontFace {
    const fn new(postscript_name: &'static str, metrics: &'static FaceMetrics) -> Self {
        Self {
            postscript_name,
            metrics,
        }
    }

    /// Distance from the baseline to the top of the tallest glyphs at `size`.
    pub fn ascent(&self, size: f32) -> f32 {
        self.metrics.ascent as f32 * size / 1000.0
    }

    /// Distance below the baseline (positive) at `size`.
    pub fn descent(&self, size: f32) -> f32 {
        -(self.metrics.descent as f32) * size / 1000.0
    }
}

impl PartialEq for FontFace {
    fn eq(&self, other: &Self) -> bool {
        self.postscript_name == other.postscript_name
    }
}

impl Eq for FontFace {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSet {
    pub regular: FontFace,
    pub italic: FontFace,
    pub bold: FontFace,
    pub monospace: FontFace,
}

impl FontSet {
    pub fn sans() -> Self {
        Self {
            regular: FontFace::new("Helvetica", &metrics::HELVETICA),
            italic: FontFace::new("Helvetica-Oblique", &metrics::HELVETICA),
            bold: FontFace::new("Helvetica-Bold", &metrics::HELVETICA_BOLD),
            monospace: FontFace::new("Courier", &metrics::COURIER),
        }
    }

    pub fn serif() -> Self {
        Self {
            regular: FontFace::new("Times-Roman", &metrics::TIMES_ROMAN),
            italic: FontFace::new("Times-Italic", &metrics::TIMES_ITALIC),
            bold: FontFace::new("Times-Bold", &metrics::TIMES_BOLD),
            monospace: FontFace::new("Courier", &metrics::COURIER),
        }
    }

    pub fn for_family(family: FontFamily) -> Self {
        match family {
            FontFamily::Sans => Self::sans(),
            FontFamily::Serif => Self::serif(),
        }
    }

    pub fn face(&self, role: FontRole) -> &FontFace {
        match role {
            FontRole::Regular => &self.regular,
            FontRole::Italic => &self.italic,
            FontRole::Bold => &self.bold,
            FontRole::Monospace => &self.monospace,
        }
    }

    /// Every role paired with its face, in resource-name order.
    pub fn faces(&self) -> impl Iterator<Item = (FontRole, &FontFace)> + '_ {
        FontRole::ALL.into_iter().map(move |role| (role, self.face(role)))
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::sans()
    }
}
