//! Measurement and greedy line breaking over base-14 metrics.

pub mod shaper;
pub mod wrapper;

pub use shaper::{measure, space_width};
pub use wrapper::{measure_and_wrap, wrap_preformatted, TextMetricsRequest, WrappedLine, WrappedText, DEFAULT_LINE_HEIGHT};
