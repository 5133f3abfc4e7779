//! The document builder: async resource preparation followed by one
//! synchronous draw pass per output PDF.

mod dispatch;
mod list;
mod message;
mod prepare;
mod table;
mod toc;

pub use self::prepare::{PreparedDocument, PLACEHOLDER_PX};

use self::dispatch::BlockDrawer;
use self::toc::{draw_toc, toc_entries, AnchorPlan, HeadingKey};
use crate::context::{CanvasState, LayoutContext};
use crate::document::Document;
use crate::draw::{draw_rule, draw_text, CursorContext, RuleOptions, TextOptions};
use crate::error::BuildError;
use crate::options::GenerateOptions;
use crate::report::BuildReport;
use folio_chart::{ChartRenderer, RasterChartRenderer};
use folio_layout::{FontRole, FontSet};
use folio_render_core::{DocumentBackend, DocumentInfo};
use folio_render_lopdf::LopdfBackend;
use folio_traits::ResourceProvider;
use itertools::Itertools;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// A finished PDF and the degradations it was built with.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub report: BuildReport,
}

/// Builds PDFs from [`Document`]s. Cheap to clone; all collaborators are
/// shared.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    options: Arc<GenerateOptions>,
    resources: Option<Arc<dyn ResourceProvider>>,
    charts: Arc<dyn ChartRenderer>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(GenerateOptions::default())
    }
}

impl DocumentBuilder {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options: Arc::new(options),
            resources: None,
            charts: Arc::new(RasterChartRenderer::new()),
        }
    }

    /// Sets the provider image sources are loaded from. Without one every
    /// image is drawn as a placeholder.
    pub fn with_resources(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.resources = Some(provider);
        self
    }

    pub fn with_chart_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.charts = renderer;
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Loads images and rasterizes charts ahead of drawing.
    pub async fn prepare(&self, document: &Document) -> Result<PreparedDocument, BuildError> {
        prepare::prepare_document(document, self.resources.clone(), self.charts.clone()).await
    }

    /// Draws a prepared document into a PDF.
    pub fn draw(&self, prepared: &PreparedDocument) -> Result<BuildOutput, BuildError> {
        self.draw_with_backend(prepared, Box::new(LopdfBackend::new()))
    }

    /// Draws a prepared document on an arbitrary backend.
    pub fn draw_with_backend(
        &self,
        prepared: &PreparedDocument,
        backend: Box<dyn DocumentBackend>,
    ) -> Result<BuildOutput, BuildError> {
        let started = Instant::now();
        let document = &prepared.document;
        let mut ctx = self.context_for(document, backend)?;

        let documents = [document];
        let anchors = AnchorPlan::build(&documents, false);
        if self.options.include_toc {
            let entries = toc_entries(&self.options, &documents, &anchors);
            if !entries.is_empty() {
                draw_toc(&mut ctx, &self.options.theme, &entries)?;
            }
        }

        let mut drawer = BlockDrawer {
            ctx: &mut ctx,
            theme: &self.options.theme,
            prepared,
            anchors: &anchors,
            doc_index: 0,
        };
        for (index, block) in document.blocks.iter().enumerate() {
            drawer.draw_block(index, block)?;
        }

        let output = finish(ctx)?;
        info!(
            "Built '{}': {} blocks on {} pages ({} bytes) in {:.2?}",
            document.id,
            document.blocks.len(),
            output.page_count,
            output.bytes.len(),
            started.elapsed()
        );
        Ok(output)
    }

    /// Prepares and draws one document.
    pub async fn generate(&self, document: &Document) -> Result<BuildOutput, BuildError> {
        let prepared = self.prepare(document).await?;
        self.draw(&prepared)
    }

    /// Builds every document into a single PDF: one shared table of
    /// contents, each document starting on a fresh page under its
    /// breadcrumb and title.
    pub async fn generate_consolidated(&self, documents: &[Document]) -> Result<BuildOutput, BuildError> {
        let prepared = self.prepare_all(documents).await?;
        self.draw_consolidated(&prepared, Box::new(LopdfBackend::new()))
    }

    /// Draws already prepared documents into one PDF on `backend`.
    pub fn draw_consolidated(
        &self,
        prepared: &[PreparedDocument],
        backend: Box<dyn DocumentBackend>,
    ) -> Result<BuildOutput, BuildError> {
        let started = Instant::now();
        let first = prepared
            .first()
            .ok_or_else(|| BuildError::Config("a consolidated build needs at least one document".to_string()))?;
        let documents: Vec<&Document> = prepared.iter().map(|p| &p.document).collect();
        let anchors = AnchorPlan::build(&documents, true);
        let theme = &self.options.theme;

        let mut info_doc = Document::new(first.document.id.clone(), first.document.title.clone());
        info_doc.page_size = Some(self.options.page_size);
        let mut ctx = self.context_for(&info_doc, backend)?;

        if self.options.include_toc {
            let entries = toc_entries(&self.options, &documents, &anchors);
            if !entries.is_empty() {
                draw_toc(&mut ctx, theme, &entries)?;
            }
        }

        for (doc_index, item) in prepared.iter().enumerate() {
            if doc_index > 0 {
                ctx.add_page();
            }
            let document = &item.document;
            debug!("Consolidated item {} ('{}') starts on {}", doc_index, document.id, ctx.page());
            self.draw_item_header(&mut ctx, document)?;

            let mut drawer = BlockDrawer {
                ctx: &mut ctx,
                theme,
                prepared: item,
                anchors: &anchors,
                doc_index,
            };
            drawer.heading(&document.title, 1, HeadingKey::Document(doc_index))?;
            for (index, block) in document.blocks.iter().enumerate() {
                drawer.draw_block(index, block)?;
            }
        }

        let output = finish(ctx)?;
        info!(
            "Built consolidated PDF of {} documents: {} pages ({} bytes) in {:.2?}",
            prepared.len(),
            output.page_count,
            output.bytes.len(),
            started.elapsed()
        );
        Ok(output)
    }

    /// Builds one independent PDF per document, in input order.
    pub async fn generate_many(&self, documents: &[Document]) -> Result<Vec<BuildOutput>, BuildError> {
        let prepared = self.prepare_all(documents).await?;
        let builder = self.clone();
        tokio::task::spawn_blocking(move || builder.draw_all(&prepared)).await?
    }

    #[cfg(feature = "rayon-executor")]
    fn draw_all(&self, prepared: &[PreparedDocument]) -> Result<Vec<BuildOutput>, BuildError> {
        use rayon::prelude::*;
        prepared.par_iter().map(|p| self.draw(p)).collect()
    }

    #[cfg(not(feature = "rayon-executor"))]
    fn draw_all(&self, prepared: &[PreparedDocument]) -> Result<Vec<BuildOutput>, BuildError> {
        prepared.iter().map(|p| self.draw(p)).collect()
    }

    /// Prepares documents concurrently, keeping input order.
    async fn prepare_all(&self, documents: &[Document]) -> Result<Vec<PreparedDocument>, BuildError> {
        let mut tasks = JoinSet::new();
        for (index, document) in documents.iter().cloned().enumerate() {
            let builder = self.clone();
            tasks.spawn(async move { (index, builder.prepare(&document).await) });
        }

        let mut slots: Vec<Option<PreparedDocument>> = vec![None; documents.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, prepared) = joined?;
            slots[index] = Some(prepared?);
        }
        Ok(slots.into_iter().flatten().collect())
    }

    fn context_for(&self, document: &Document, backend: Box<dyn DocumentBackend>) -> Result<LayoutContext, BuildError> {
        let theme = &self.options.theme;
        let page_size = document.page_size.unwrap_or(self.options.page_size);
        let margins = document.margins.unwrap_or(self.options.margins);
        let info = DocumentInfo {
            title: Some(document.title.clone()).filter(|t| !t.is_empty()),
            subject: document.category.clone(),
            producer: self.options.producer.clone(),
        };
        let ctx = LayoutContext::new(
            backend,
            FontSet::for_family(theme.font_family),
            page_size.size(),
            &margins,
            CanvasState::from_theme(theme),
            &info,
        )?;
        Ok(ctx)
    }

    /// Category label and breadcrumb trail above a consolidated item.
    fn draw_item_header(&self, ctx: &mut LayoutContext, document: &Document) -> Result<(), BuildError> {
        let theme = &self.options.theme;
        let category = self
            .options
            .categories
            .get(&document.id)
            .or(document.category.as_ref());
        let trail = self
            .options
            .breadcrumbs
            .get(&document.id)
            .or(document.breadcrumb.as_ref())
            .filter(|crumbs| !crumbs.is_empty());
        if category.is_none() && trail.is_none() {
            return Ok(());
        }

        let small = TextOptions::new().size(theme.small_size).color(theme.muted_color);
        if let Some(category) = category {
            draw_text(ctx, &category.to_uppercase(), &small.clone().font(FontRole::Bold))?;
        }
        if let Some(trail) = trail {
            draw_text(ctx, &trail.iter().join(" / "), &small)?;
        }
        let rule = RuleOptions {
            color: theme.rule_color,
            thickness: 0.5,
            spacing_before: 4.0,
            spacing_after: 8.0,
            ..Default::default()
        };
        draw_rule(ctx, &rule)?;
        Ok(())
    }
}

fn finish(ctx: LayoutContext) -> Result<BuildOutput, BuildError> {
    let (output, report) = ctx.finish()?;
    Ok(BuildOutput {
        bytes: output.bytes,
        page_count: output.page_count,
        report,
    })
}
