//! Chart rasterization bridge.
//!
//! Charts are rendered to PNG at `width * dpr` by `height * dpr` pixels before
//! the synchronous layout pass runs; layout then embeds the result like any
//! other image at the logical `width x height` box.

mod bridge;
mod config;
mod raster;

pub use bridge::{
    render_chart_image, ChartRenderOptions, ChartRenderer, RasterImage, DEFAULT_BACKGROUND,
    DEFAULT_DEVICE_PIXEL_RATIO,
};
pub use config::{ChartKind, ChartSpec, Dataset};
pub use raster::RasterChartRenderer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid chart size {width} x {height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("Invalid chart background '{0}': {1}")]
    InvalidBackground(String, String),
    #[error("Invalid chart configuration: {0}")]
    InvalidConfig(String),
    #[error("Unsupported chart type '{0}'")]
    UnsupportedType(String),
    #[error("Failed to rasterize chart: {0}")]
    Raster(String),
    #[error("Chart rendering task failed: {0}")]
    Join(String),
}
