use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Element has a height of {0:.2} which exceeds the total page content height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error("Invalid layout width: {0}")]
    InvalidWidth(f32),
    #[error("Invalid layout height: {0}")]
    InvalidHeight(f32),
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f32),
    #[error("Invalid line-height multiplier: {0}")]
    InvalidLineHeight(f32),
    #[error("Margins leave no content area ({width:.2} x {height:.2})")]
    EmptyContentArea { width: f32, height: f32 },
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod cursor;
pub mod encoding;
pub mod fonts;
pub mod metrics;
pub mod text;

pub use self::cursor::{BreakAnalysis, ContentArea, PageCursor, BREAK_EPSILON};
pub use self::encoding::{to_win_ansi, win_ansi_byte};
pub use self::fonts::{FontFace, FontFamily, FontRole, FontSet};
pub use self::text::{measure, measure_and_wrap, wrap_preformatted, TextMetricsRequest, WrappedLine, WrappedText};

// Re-export geometry types so downstream crates agree on a single definition.
pub use folio_types::{Rect, Size};
