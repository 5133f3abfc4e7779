//! Block dispatch: one draw call per block kind.

use super::list::draw_list;
use super::message::draw_message_box;
use super::prepare::{PreparedDocument, PLACEHOLDER_PX};
use super::table::draw_table;
use super::toc::{AnchorPlan, HeadingKey};
use crate::blocks::{
    Block, ChartBlock, CodeBlock, DividerBlock, ImageBlock, ImageCarouselBlock, ImageCompareBlock,
    ImageFit, TextBlock, TextStyle,
};
use crate::context::LayoutContext;
use crate::draw::{
    draw_box, draw_image, draw_link_text, draw_rule, draw_text, draw_wrapped_with, fit_image,
    place_lines, BoxSpec, BoxStyle, CursorContext, ImageOptions, LinkTextOptions, RuleOptions,
    TextContext, TextOptions,
};
use crate::options::{Align, Theme};
use folio_layout::{measure_and_wrap, wrap_preformatted, FontRole, LayoutError, TextMetricsRequest};
use folio_render_core::{ImageObject, OutlineEntry};
use folio_types::Size;
use log::{debug, warn};
use std::sync::Arc;

const CAPTION_GAP: f32 = 4.0;
const CODE_PADDING: f32 = 6.0;
const COMPARE_GAP: f32 = 12.0;
const PLACEHOLDER_HEIGHT: f32 = 28.0;

pub(crate) struct BlockDrawer<'a> {
    pub ctx: &'a mut LayoutContext,
    pub theme: &'a Theme,
    pub prepared: &'a PreparedDocument,
    pub anchors: &'a AnchorPlan,
    pub doc_index: usize,
}

impl BlockDrawer<'_> {
    fn spacing(&self) -> f32 {
        self.theme.body_size * self.theme.paragraph_spacing
    }

    pub fn draw_block(&mut self, index: usize, block: &Block) -> Result<(), LayoutError> {
        debug!(
            "Drawing block {} ({}) of '{}' on {}",
            index,
            block.kind(),
            self.prepared.document.id,
            self.ctx.page()
        );
        match block {
            Block::Title(title) => {
                let key = HeadingKey::Block(self.doc_index, index);
                self.heading(&title.text, title.level.max(1), key)
            }
            Block::Text(text) => self.paragraph(text),
            Block::List(list) => draw_list(self.ctx, self.theme, list),
            Block::Table(table) => draw_table(self.ctx, self.theme, table),
            Block::MessageBox(message) => draw_message_box(self.ctx, self.theme, message),
            Block::Divider(divider) => self.divider(divider),
            Block::Image(image) => self.image(image),
            Block::ImageCompare(compare) => self.image_compare(compare),
            Block::ImageCarousel(carousel) => self.image_carousel(carousel),
            Block::Math(math) => {
                let opts = TextOptions::new()
                    .font(FontRole::Italic)
                    .align(Align::Center)
                    .spacing(self.spacing() / 2.0, self.spacing());
                draw_text(self.ctx, &math.expression, &opts).map(drop)
            }
            Block::Code(code) => self.code(code),
            Block::Chart(chart) => self.chart(index, chart),
            Block::Audio(_) | Block::Youtube(_) => {
                debug!("Skipping {} block: not representable on paper", block.kind());
                self.ctx.report_mut().skipped_blocks.push(block.kind().to_string());
                Ok(())
            }
            Block::Unsupported { kind } => self.unsupported(kind),
        }
    }

    /// Draws a title with its anchor and outline entry. The title is kept on
    /// the same page as at least one line of what follows.
    pub fn heading(&mut self, text: &str, level: u8, key: HeadingKey) -> Result<(), LayoutError> {
        let size = self.theme.heading_size(level);
        let line_height = 1.25;
        let before = if self.ctx.is_at_page_top() { 0.0 } else { size * 0.6 };
        let after = size * 0.35;

        let face = *self.ctx.fonts().face(FontRole::Bold);
        let req = TextMetricsRequest::new(&face, size, self.ctx.content_width()).line_height(line_height);
        let wrapped = measure_and_wrap(text, &req)?;
        let needed = before + wrapped.total_height + after + self.theme.body_line_px();
        let broke = self.ctx.ensure_space(needed.min(self.ctx.content_height()))?;
        if !broke {
            self.ctx.move_y(before);
        }

        if let Some(heading) = self.anchors.heading(key) {
            self.ctx.define_anchor(&heading.anchor);
            self.ctx.add_outline_entry(OutlineEntry {
                title: heading.title.clone(),
                anchor: heading.anchor.clone(),
                level: heading.level,
            });
        }

        let opts = TextOptions::new()
            .font(FontRole::Bold)
            .size(size)
            .color(self.theme.heading_color)
            .line_height(line_height)
            .spacing(0.0, after);
        draw_wrapped_with(self.ctx, wrapped, &opts, |_, _| {}).map(drop)
    }

    fn paragraph(&mut self, block: &TextBlock) -> Result<(), LayoutError> {
        let font = match block.style {
            TextStyle::Regular => FontRole::Regular,
            TextStyle::Italic => FontRole::Italic,
            TextStyle::Bold => FontRole::Bold,
        };
        let mut opts = TextOptions::new().font(font).spacing(0.0, self.spacing());
        if let Some(align) = block.align {
            opts = opts.align(align);
        }

        match &block.href {
            Some(href) => {
                let link = LinkTextOptions {
                    label: Some(block.text.clone()),
                    text: opts.color(self.theme.link_color),
                    underline: self.theme.underline_links,
                };
                draw_link_text(self.ctx, href, &link).map(drop)
            }
            None => draw_text(self.ctx, &block.text, &opts).map(drop),
        }
    }

    fn divider(&mut self, block: &DividerBlock) -> Result<(), LayoutError> {
        let width = block
            .width
            .map(|fraction| self.ctx.content_width() * fraction.clamp(0.0, 1.0));
        let opts = RuleOptions {
            thickness: block.thickness.unwrap_or(1.0),
            color: block.color.unwrap_or(self.theme.rule_color),
            end_color: block.end_color,
            spacing_before: self.spacing(),
            spacing_after: self.spacing(),
            width,
            align: block.align.unwrap_or(Align::Center),
            style: block.style,
        };
        draw_rule(self.ctx, &opts).map(drop)
    }

    fn resolved_image(&self, src: &str) -> Arc<ImageObject> {
        self.prepared.image(src).cloned().unwrap_or_else(|| {
            let (w, h) = PLACEHOLDER_PX;
            Arc::new(ImageObject::placeholder(format!("placeholder:{}", src), w, h))
        })
    }

    fn is_missing(&self, src: &str) -> bool {
        self.prepared.is_missing(src) || self.prepared.image(src).is_none()
    }

    fn note_missing(&mut self, src: &str) {
        if self.is_missing(src) {
            self.ctx.report_mut().missing_images.push(src.to_string());
        }
    }

    fn caption_options(&self) -> TextOptions {
        TextOptions::new()
            .font(FontRole::Italic)
            .size(self.theme.small_size)
            .color(self.theme.muted_color)
            .align(Align::Center)
    }

    /// Height of a one-line caption, used to keep captions with their image.
    fn caption_line(&self) -> f32 {
        self.theme.small_size * self.theme.line_height + CAPTION_GAP
    }

    fn image(&mut self, block: &ImageBlock) -> Result<(), LayoutError> {
        let image = self.resolved_image(&block.src);
        self.note_missing(&block.src);
        let missing = self.is_missing(&block.src);

        let opts = ImageOptions {
            width: block.width,
            height: block.height,
            fit: block.fit,
            align: block.align.unwrap_or(Align::Center),
            scale: block.scale,
            ..Default::default()
        };
        let caption = block
            .caption
            .clone()
            .or_else(|| missing.then(|| block.alt.clone().unwrap_or_else(|| block.src.clone())));
        self.place_with_caption(&image, &opts, caption.as_deref())?;
        self.ctx.move_y(self.spacing());
        Ok(())
    }

    fn place_with_caption(&mut self, image: &Arc<ImageObject>, opts: &ImageOptions, caption: Option<&str>) -> Result<(), LayoutError> {
        let available = Size::new(self.ctx.content_width(), self.ctx.content_height());
        let fitted = fit_image(image, opts, available)?;
        if caption.is_some() {
            let together = fitted.box_size.height + self.caption_line();
            self.ctx.ensure_space(together.min(self.ctx.content_height()))?;
        }
        draw_image(self.ctx, image, opts)?;
        if let Some(caption) = caption {
            let opts = self.caption_options().spacing(CAPTION_GAP, 0.0);
            draw_text(self.ctx, caption, &opts)?;
        }
        Ok(())
    }

    fn image_compare(&mut self, block: &ImageCompareBlock) -> Result<(), LayoutError> {
        let sides = [&block.before, &block.after];
        let images: Vec<Arc<ImageObject>> = sides.iter().map(|side| self.resolved_image(&side.src)).collect();
        for side in sides {
            self.note_missing(&side.src);
        }

        let half = (self.ctx.content_width() - COMPARE_GAP) / 2.0;
        let max_height = self.ctx.content_height() / 2.0;
        let fitted = images
            .iter()
            .map(|img| {
                let opts = ImageOptions {
                    width: Some(half),
                    max_height: Some(max_height),
                    ..Default::default()
                };
                fit_image(img, &opts, Size::new(half, max_height))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let row_height = fitted.iter().map(|f| f.box_size.height).fold(0.0, f32::max);
        let label_height = self.caption_line();
        self.ctx.ensure_space(row_height + label_height)?;

        let top = self.ctx.cursor_y();
        let left = self.ctx.content_left();
        for (i, (image, side)) in images.iter().zip(sides).enumerate() {
            let x = left + i as f32 * (half + COMPARE_GAP);
            let opts = ImageOptions {
                x: Some(x),
                y: Some(top),
                width: Some(half),
                height: Some(row_height),
                fit: ImageFit::Contain,
                ..Default::default()
            };
            draw_image(self.ctx, image, &opts)?;

            let label = side
                .label
                .clone()
                .unwrap_or_else(|| if i == 0 { "Before" } else { "After" }.to_string());
            let label_opts = self.caption_options().x(x).max_width(half);
            let face = *self.ctx.fonts().face(FontRole::Italic);
            let req = TextMetricsRequest::new(&face, self.theme.small_size, half).line_height(self.theme.line_height);
            let mut wrapped = measure_and_wrap(&label, &req)?;
            wrapped.lines.truncate(1);
            place_lines(self.ctx, &wrapped, top + row_height + CAPTION_GAP, &label_opts);
        }
        self.ctx.move_y(row_height + label_height);

        if let Some(caption) = &block.caption {
            let opts = self.caption_options();
            draw_text(self.ctx, caption, &opts)?;
        }
        self.ctx.move_y(self.spacing());
        Ok(())
    }

    fn image_carousel(&mut self, block: &ImageCarouselBlock) -> Result<(), LayoutError> {
        let max_height = self.ctx.content_height() / 2.0;
        for item in &block.images {
            let image = self.resolved_image(&item.src);
            self.note_missing(&item.src);
            let opts = ImageOptions {
                max_height: Some(max_height),
                align: Align::Center,
                ..Default::default()
            };
            self.place_with_caption(&image, &opts, item.label.as_deref())?;
            self.ctx.move_y(CAPTION_GAP * 2.0);
        }
        if let Some(caption) = &block.caption {
            let opts = self.caption_options();
            draw_text(self.ctx, caption, &opts)?;
        }
        self.ctx.move_y(self.spacing());
        Ok(())
    }

    fn code(&mut self, block: &CodeBlock) -> Result<(), LayoutError> {
        let size = self.theme.code_size;
        let x = self.ctx.content_left() + CODE_PADDING;
        let width = self.ctx.content_width() - 2.0 * CODE_PADDING;

        if let Some(language) = &block.language {
            let label = TextOptions::new()
                .size(self.theme.small_size)
                .color(self.theme.muted_color)
                .spacing(0.0, 2.0);
            draw_text(self.ctx, language, &label)?;
        }

        let face = *self.ctx.fonts().face(FontRole::Monospace);
        let req = TextMetricsRequest::new(&face, size, width).line_height(1.35);
        let wrapped = wrap_preformatted(&block.code, &req)?;
        let opts = TextOptions::new()
            .font(FontRole::Monospace)
            .size(size)
            .line_height(1.35)
            .x(x)
            .max_width(width)
            .background(self.theme.code_background, CODE_PADDING)
            .spacing(0.0, self.spacing());
        draw_wrapped_with(self.ctx, wrapped, &opts, |_, _| {}).map(drop)
    }

    fn chart(&mut self, index: usize, block: &ChartBlock) -> Result<(), LayoutError> {
        let image = match self.prepared.chart(index) {
            Some(image) => image.clone(),
            None => {
                warn!("Chart block {} was not prepared; drawing a placeholder", index);
                self.ctx.report_mut().placeholders.push("chart".to_string());
                let (w, h) = PLACEHOLDER_PX;
                Arc::new(ImageObject::placeholder(format!("placeholder:chart-{}", index), w, h))
            }
        };
        let opts = ImageOptions {
            width: Some(block.width),
            height: Some(block.height),
            fit: ImageFit::Contain,
            align: Align::Center,
            ..Default::default()
        };
        self.place_with_caption(&image, &opts, block.caption.as_deref())?;
        self.ctx.move_y(self.spacing());
        Ok(())
    }

    fn unsupported(&mut self, kind: &str) -> Result<(), LayoutError> {
        warn!("Unsupported block type '{}' drawn as a placeholder", kind);
        self.ctx.report_mut().placeholders.push(kind.to_string());

        let style = BoxStyle {
            fill: Some(self.theme.placeholder_background),
            stroke: Some(self.theme.muted_color),
            stroke_width: 0.5,
            padding: 8.0,
        };
        let placed = draw_box(self.ctx, &BoxSpec { height: PLACEHOLDER_HEIGHT, ..Default::default() }, &style)?;
        let opts = self
            .caption_options()
            .x(placed.content.x)
            .max_width(placed.content.width);
        let face = *self.ctx.fonts().face(FontRole::Italic);
        let message = format!("Unsupported content: {}", kind);
        let req = TextMetricsRequest::new(&face, self.theme.small_size, placed.content.width.max(1.0));
        let mut wrapped = measure_and_wrap(&message, &req)?;
        wrapped.lines.truncate(1);
        place_lines(self.ctx, &wrapped, placed.content.y, &opts);
        self.ctx.move_y(PLACEHOLDER_HEIGHT + self.spacing());
        Ok(())
    }
}
