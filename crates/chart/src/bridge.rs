use crate::config::parse_css_color;
use crate::ChartError;
use folio_types::{Color, Size};
use log::debug;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

pub const DEFAULT_DEVICE_PIXEL_RATIO: f32 = 2.0;
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// Turns an opaque chart configuration into PNG bytes of exactly
/// `width_px x height_px` pixels.
///
/// Implementations are synchronous and CPU bound; [`render_chart_image`] runs
/// them on the blocking pool.
pub trait ChartRenderer: Send + Sync + Debug {
    fn render_png(
        &self,
        config: &Value,
        width_px: u32,
        height_px: u32,
        background: Color,
    ) -> Result<Vec<u8>, ChartError>;
}

#[derive(Debug, Clone, Default)]
pub struct ChartRenderOptions {
    /// Logical width in points.
    pub width: f32,
    /// Logical height in points.
    pub height: f32,
    pub background: Option<String>,
    pub device_pixel_ratio: Option<f32>,
}

/// A rendered chart: encoded PNG plus the geometry needed to embed it.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub device_pixel_ratio: f32,
}

impl RasterImage {
    /// The box the image is placed in: pixels divided by the pixel ratio.
    pub fn logical_size(&self) -> Size {
        Size::new(
            self.width_px as f32 / self.device_pixel_ratio,
            self.height_px as f32 / self.device_pixel_ratio,
        )
    }

    /// Scale factor that maps pixels back to the logical box.
    pub fn embed_scale(&self) -> f32 {
        1.0 / self.device_pixel_ratio
    }
}

fn effective_dpr(dpr: Option<f32>) -> f32 {
    match dpr {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => DEFAULT_DEVICE_PIXEL_RATIO,
    }
}

/// Rasterizes `config` at `width * dpr x height * dpr` pixels.
///
/// # Errors
///
/// Non-positive sizes, unparseable backgrounds, renderer failures and a
/// panicked render task are all reported as [`ChartError`].
pub async fn render_chart_image(
    renderer: Arc<dyn ChartRenderer>,
    config: Value,
    options: ChartRenderOptions,
) -> Result<RasterImage, ChartError> {
    let ChartRenderOptions {
        width,
        height,
        background,
        device_pixel_ratio,
    } = options;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ChartError::InvalidSize { width, height });
    }

    let dpr = effective_dpr(device_pixel_ratio);
    let background = background.as_deref().unwrap_or(DEFAULT_BACKGROUND);
    let background_color = parse_css_color(background).ok_or_else(|| {
        ChartError::InvalidBackground(
            background.to_string(),
            "expected #hex, rgb(), rgba() or a named colour".to_string(),
        )
    })?;
    let width_px = (width * dpr).round().max(1.0) as u32;
    let height_px = (height * dpr).round().max(1.0) as u32;

    debug!(
        "Rasterizing chart at {}x{}px (dpr {}) with {:?}",
        width_px, height_px, dpr, renderer
    );
    let png = tokio::task::spawn_blocking(move || {
        renderer.render_png(&config, width_px, height_px, background_color)
    })
    .await
    .map_err(|e| ChartError::Join(e.to_string()))??;

    Ok(RasterImage {
        png,
        width_px,
        height_px,
        device_pixel_ratio: dpr,
    })
}
