//! Asynchronous pre-resolution: every image and chart a document needs is
//! loaded, decoded or rasterized before the synchronous draw pass starts.

use crate::blocks::{Block, ChartBlock};
use crate::document::Document;
use crate::error::BuildError;
use folio_chart::{render_chart_image, ChartError, ChartRenderOptions, ChartRenderer, RasterImage};
use folio_render_core::ImageObject;
use folio_traits::{join_asset_path, ResourceError, ResourceProvider};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Pixel size of the grey stand-in for an image that could not be loaded.
pub const PLACEHOLDER_PX: (u32, u32) = (320, 180);

/// A document together with everything the draw pass must not wait for.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub document: Document,
    images: HashMap<String, Arc<ImageObject>>,
    charts: HashMap<usize, Arc<ImageObject>>,
    missing: HashSet<String>,
}

impl PreparedDocument {
    /// Wraps a document that needs no external resources.
    pub fn without_resources(document: Document) -> Self {
        Self {
            document,
            images: HashMap::new(),
            charts: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    pub fn image(&self, src: &str) -> Option<&Arc<ImageObject>> {
        self.images.get(src)
    }

    /// The rasterized chart of the block at `index`.
    pub fn chart(&self, index: usize) -> Option<&Arc<ImageObject>> {
        self.charts.get(&index)
    }

    /// Whether `src` was replaced by a placeholder.
    pub fn is_missing(&self, src: &str) -> bool {
        self.missing.contains(src)
    }

    pub fn missing_images(&self) -> impl Iterator<Item = &str> + '_ {
        self.missing.iter().map(String::as_str)
    }
}

enum Resolved {
    Image {
        src: String,
        image: Arc<ImageObject>,
        missing: bool,
    },
    Chart {
        index: usize,
        image: Arc<ImageObject>,
    },
}

pub(crate) async fn prepare_document(
    document: &Document,
    resources: Option<Arc<dyn ResourceProvider>>,
    charts: Arc<dyn ChartRenderer>,
) -> Result<PreparedDocument, BuildError> {
    let mut tasks: JoinSet<Result<Resolved, BuildError>> = JoinSet::new();
    let mut requested = HashSet::new();

    for (index, block) in document.blocks.iter().enumerate() {
        for src in block.image_sources() {
            if !requested.insert(src.to_string()) {
                continue;
            }
            let provider = resources.clone();
            let src = src.to_string();
            let path = join_asset_path(document.asset_base.as_deref(), &src);
            tasks.spawn_blocking(move || Ok(load_image(provider.as_deref(), src, &path)));
        }

        if let Block::Chart(chart) = block {
            let renderer = charts.clone();
            let key = format!("chart-{}-{}", document.id, index);
            let document_id = document.id.clone();
            let chart = chart.clone();
            tasks.spawn(async move {
                let image = rasterize_chart(renderer, &chart, key).await.map_err(|source| {
                    BuildError::Chart {
                        document: document_id,
                        block: index,
                        source,
                    }
                })?;
                Ok(Resolved::Chart { index, image })
            });
        }
    }

    let mut prepared = PreparedDocument::without_resources(document.clone());
    while let Some(joined) = tasks.join_next().await {
        match joined?? {
            Resolved::Image { src, image, missing } => {
                if missing {
                    prepared.missing.insert(src.clone());
                }
                prepared.images.insert(src, image);
            }
            Resolved::Chart { index, image } => {
                prepared.charts.insert(index, image);
            }
        }
    }
    debug!(
        "Prepared '{}': {} images ({} missing), {} charts",
        document.id,
        prepared.images.len(),
        prepared.missing.len(),
        prepared.charts.len()
    );
    Ok(prepared)
}

fn load_image(provider: Option<&dyn ResourceProvider>, src: String, path: &str) -> Resolved {
    let loaded = provider
        .ok_or_else(|| ResourceError::NotFound(format!("{} (no resource provider configured)", path)))
        .and_then(|p| p.load(path))
        .and_then(|bytes| decode_image(path, &bytes));
    match loaded {
        Ok(image) => Resolved::Image {
            src,
            image: Arc::new(image),
            missing: false,
        },
        Err(e) => {
            warn!("Image '{}' replaced by a placeholder: {}", src, e);
            let (w, h) = PLACEHOLDER_PX;
            Resolved::Image {
                src,
                image: Arc::new(ImageObject::placeholder(format!("placeholder:{}", path), w, h)),
                missing: true,
            }
        }
    }
}

fn decode_image(key: &str, bytes: &[u8]) -> Result<ImageObject, ResourceError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ResourceError::InvalidFormat(format!("{}: {}", key, e)))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(ImageObject::from_rgba(key, width, height, decoded.as_raw()))
}

async fn rasterize_chart(
    renderer: Arc<dyn ChartRenderer>,
    chart: &ChartBlock,
    key: String,
) -> Result<Arc<ImageObject>, ChartError> {
    let options = ChartRenderOptions {
        width: chart.width,
        height: chart.height,
        background: chart.background.clone(),
        device_pixel_ratio: chart.device_pixel_ratio,
    };
    let raster = render_chart_image(renderer, chart.config.clone(), options).await?;
    let image = embed_raster(&raster, key)?;
    Ok(Arc::new(image))
}

/// Decodes a rasterized chart and declares its `1 / dpr` embed scale.
fn embed_raster(raster: &RasterImage, key: String) -> Result<ImageObject, ChartError> {
    let decoded = image::load_from_memory_with_format(&raster.png, image::ImageFormat::Png)
        .map_err(|e| ChartError::Raster(format!("renderer returned an undecodable PNG: {}", e)))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(ImageObject::from_rgba(key, width, height, decoded.as_raw()).with_scale(Some(raster.embed_scale())))
}
