use folio_types::Size;
use std::fmt;

/// Normalises a declared scale factor: missing, non-positive and NaN scales
/// become `1`.
pub fn validate_scale(scale: Option<f32>) -> f32 {
    match scale {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => 1.0,
    }
}

/// A decoded raster image ready for embedding.
///
/// Pixels are 8-bit RGB; an optional alpha plane of `width * height` bytes is
/// written as a soft mask.
#[derive(Clone)]
pub struct ImageObject {
    key: String,
    width_px: u32,
    height_px: u32,
    scale: f32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl ImageObject {
    /// Builds an image from packed RGBA pixels. The alpha plane is dropped
    /// when every pixel is opaque.
    pub fn from_rgba(key: impl Into<String>, width_px: u32, height_px: u32, rgba: &[u8]) -> Self {
        let pixels = rgba.len() / 4;
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for px in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }
        let alpha = alpha.iter().any(|&a| a != u8::MAX).then_some(alpha);
        Self {
            key: key.into(),
            width_px,
            height_px,
            scale: 1.0,
            rgb,
            alpha,
        }
    }

    pub fn from_rgb(key: impl Into<String>, width_px: u32, height_px: u32, rgb: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            width_px,
            height_px,
            scale: 1.0,
            rgb,
            alpha: None,
        }
    }

    /// A flat grey image used in place of assets that failed to load.
    pub fn placeholder(key: impl Into<String>, width_px: u32, height_px: u32) -> Self {
        let len = width_px as usize * height_px as usize * 3;
        Self::from_rgb(key, width_px, height_px, vec![0xDD; len])
    }

    pub fn with_scale(mut self, scale: Option<f32>) -> Self {
        self.scale = validate_scale(scale);
        self
    }

    /// Identity used to share one XObject between several placements.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn declared_scale(&self) -> f32 {
        self.scale
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    pub fn intrinsic_size(&self) -> Size {
        Size::new(self.width_px as f32, self.height_px as f32)
    }

    /// Placed size for a scale factor: pixels times the validated factor.
    pub fn scale(&self, factor: f32) -> Size {
        let factor = validate_scale(Some(factor));
        Size::new(self.width_px as f32 * factor, self.height_px as f32 * factor)
    }

    /// Size at the image's own declared scale, used by the `none` fit.
    pub fn natural_size(&self) -> Size {
        self.scale(self.scale)
    }
}

impl fmt::Debug for ImageObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageObject")
            .field("key", &self.key)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("scale", &self.scale)
            .field("has_alpha", &self.alpha.is_some())
            .finish()
    }
}
