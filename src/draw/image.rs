//! Image placement: box sizing, fit modes and flow.

use super::ImageContext;
use crate::blocks::ImageFit;
use crate::options::Align;
use folio_layout::LayoutError;
use folio_render_core::{validate_scale, ImageObject};
use folio_types::{PageHandle, Rect, Size};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageOptions {
    /// Absolute left edge; aligned within the content box when unset.
    pub x: Option<f32>,
    /// Absolute top edge. When unset the image flows: it reserves its box
    /// height and advances the cursor.
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fit: ImageFit,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub align: Align,
    /// Overrides the image's declared scale for `fit: none`.
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub page: PageHandle,
    /// The layout box the image occupies.
    pub box_rect: Rect,
    /// Where the image is drawn; may overflow the box for `cover` and `none`.
    pub image_rect: Rect,
    pub clipped: bool,
}

/// The box size and the drawn size of an image, before positioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedImage {
    pub box_size: Size,
    pub drawn: Size,
}

impl FittedImage {
    pub fn overflows(&self) -> bool {
        self.drawn.width > self.box_size.width + 0.01 || self.drawn.height > self.box_size.height + 0.01
    }
}

/// Computes the layout box and the drawn size for `image` inside `available`.
///
/// Explicit dimensions win; a single one derives the other from the aspect
/// ratio; neither uses the natural size. The box then shrinks proportionally
/// to respect `max_width`, `max_height` and `available`.
pub fn fit_image(image: &ImageObject, opts: &ImageOptions, available: Size) -> Result<FittedImage, LayoutError> {
    let factor = opts.scale.map_or(image.declared_scale(), |s| validate_scale(Some(s)));
    let natural = image.scale(factor);
    if !(natural.width > 0.0 && natural.height > 0.0) {
        return Err(LayoutError::Generic(format!(
            "Image '{}' has no pixels ({}x{})",
            image.key(),
            image.width_px(),
            image.height_px()
        )));
    }
    let aspect = natural.aspect_ratio();

    let mut box_size = match (opts.width, opts.height) {
        (Some(w), Some(h)) => Size::new(w, h),
        (Some(w), None) => Size::new(w, w / aspect),
        (None, Some(h)) => Size::new(h * aspect, h),
        (None, None) => natural,
    };
    if !(box_size.width > 0.0 && box_size.height > 0.0 && box_size.width.is_finite() && box_size.height.is_finite()) {
        return Err(LayoutError::InvalidWidth(box_size.width));
    }

    let limit_w = opts.max_width.map_or(available.width, |m| m.min(available.width));
    let limit_h = opts.max_height.map_or(available.height, |m| m.min(available.height));
    if box_size.width > limit_w {
        let k = limit_w / box_size.width;
        box_size = Size::new(limit_w, box_size.height * k);
    }
    if box_size.height > limit_h {
        let k = limit_h / box_size.height;
        box_size = Size::new(box_size.width * k, limit_h);
    }

    let contain = (box_size.width / natural.width).min(box_size.height / natural.height);
    let drawn = match opts.fit {
        ImageFit::Contain => Size::new(natural.width * contain, natural.height * contain),
        ImageFit::Cover => {
            let cover = (box_size.width / natural.width).max(box_size.height / natural.height);
            Size::new(natural.width * cover, natural.height * cover)
        }
        ImageFit::ScaleDown => {
            let s = contain.min(1.0);
            Size::new(natural.width * s, natural.height * s)
        }
        ImageFit::None => natural,
    };

    Ok(FittedImage { box_size, drawn })
}

/// Places `image` and, in flow mode, advances the cursor past its box.
pub fn draw_image<C>(ctx: &mut C, image: &Arc<ImageObject>, opts: &ImageOptions) -> Result<ImagePlacement, LayoutError>
where
    C: ImageContext + ?Sized,
{
    let available = Size::new(ctx.content_width(), ctx.content_height());
    let fitted = fit_image(image, opts, available)?;
    let FittedImage { box_size, drawn } = fitted;

    let x = opts.x.unwrap_or_else(|| {
        let slack = (available.width - box_size.width).max(0.0);
        ctx.content_left()
            + match opts.align {
                Align::Left => 0.0,
                Align::Center => slack / 2.0,
                Align::Right => slack,
            }
    });
    let y = match opts.y {
        Some(y) => y,
        None => {
            ctx.ensure_space(box_size.height)?;
            ctx.cursor_y()
        }
    };

    let box_rect = Rect::new(x, y, box_size.width, box_size.height);
    let image_rect = Rect::new(
        x + (box_size.width - drawn.width) / 2.0,
        y + (box_size.height - drawn.height) / 2.0,
        drawn.width,
        drawn.height,
    );
    let clipped = fitted.overflows();
    ctx.draw_image(image, image_rect, clipped.then_some(box_rect));

    if opts.y.is_none() {
        ctx.move_y(box_size.height);
    }
    Ok(ImagePlacement {
        page: ctx.page(),
        box_rect,
        image_rect,
        clipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CanvasState, LayoutContext};
    use crate::draw::CursorContext;
    use folio_layout::FontSet;
    use folio_render_core::{DocumentInfo, RecordedOp, RecordingBackend};
    use folio_types::{mm, Margins, PageSize};

    fn photo() -> Arc<ImageObject> {
        Arc::new(ImageObject::placeholder("photo", 800, 600))
    }

    fn roomy() -> Size {
        Size::new(1000.0, 1000.0)
    }

    #[test]
    fn contain_fits_and_centres_vertically() {
        let opts = ImageOptions {
            width: Some(300.0),
            height: Some(300.0),
            ..Default::default()
        };
        let fitted = fit_image(&photo(), &opts, roomy()).unwrap();
        assert_eq!(fitted.box_size, Size::new(300.0, 300.0));
        assert!((fitted.drawn.width - 300.0).abs() < 1e-4);
        assert!((fitted.drawn.height - 225.0).abs() < 1e-4);
        assert!(!fitted.overflows());
    }

    #[test]
    fn single_dimension_keeps_aspect_ratio() {
        let opts = ImageOptions { width: Some(400.0), ..Default::default() };
        let fitted = fit_image(&photo(), &opts, roomy()).unwrap();
        assert_eq!(fitted.box_size.width, 400.0);
        assert!((fitted.box_size.height - 300.0).abs() < 1e-3);
    }

    #[test]
    fn cover_overflows_and_scale_down_never_enlarges() {
        let square = ImageOptions {
            width: Some(300.0),
            height: Some(300.0),
            fit: ImageFit::Cover,
            ..Default::default()
        };
        let cover = fit_image(&photo(), &square, roomy()).unwrap();
        assert!((cover.drawn.height - 300.0).abs() < 1e-4);
        assert!((cover.drawn.width - 400.0).abs() < 1e-4);
        assert!(cover.overflows());

        let large_box = ImageOptions {
            width: Some(900.0),
            height: Some(900.0),
            fit: ImageFit::ScaleDown,
            ..Default::default()
        };
        let down = fit_image(&photo(), &large_box, roomy()).unwrap();
        assert_eq!(down.drawn, Size::new(800.0, 600.0));
    }

    #[test]
    fn none_uses_validated_scale() {
        for (scale, expected) in [(Some(0.5), 400.0), (Some(0.0), 800.0), (Some(f32::NAN), 800.0), (None, 800.0)] {
            let opts = ImageOptions {
                width: Some(100.0),
                height: Some(100.0),
                fit: ImageFit::None,
                scale,
                ..Default::default()
            };
            let fitted = fit_image(&photo(), &opts, Size::new(2000.0, 2000.0)).unwrap();
            assert!((fitted.drawn.width - expected).abs() < 1e-4, "scale {:?}", scale);
        }
    }

    #[test]
    fn box_shrinks_to_available_width() {
        let fitted = fit_image(&photo(), &ImageOptions::default(), Size::new(400.0, 1000.0)).unwrap();
        assert_eq!(fitted.box_size, Size::new(400.0, 300.0));
    }

    #[test]
    fn flow_mode_breaks_draws_centred_and_advances() {
        let (backend, log) = RecordingBackend::new();
        let mut ctx = LayoutContext::new(
            Box::new(backend),
            FontSet::sans(),
            PageSize::A4.size(),
            &Margins::all(mm(20.0)),
            CanvasState::default(),
            &DocumentInfo::default(),
        )
        .unwrap();
        ctx.move_y(ctx.content_height() - 100.0);

        let opts = ImageOptions {
            width: Some(300.0),
            height: Some(300.0),
            align: Align::Center,
            ..Default::default()
        };
        let placed = draw_image(&mut ctx, &photo(), &opts).unwrap();
        assert_eq!(placed.page, PageHandle(1));
        assert!((placed.image_rect.y - placed.box_rect.y - 37.5).abs() < 1e-4);
        assert!((placed.box_rect.x - (ctx.content_left() + (ctx.content_width() - 300.0) / 2.0)).abs() < 1e-3);
        assert!((ctx.cursor_y() - (mm(20.0) + 300.0)).abs() < 1e-3);

        let rec = log.snapshot();
        assert!(matches!(&rec.ops[0], RecordedOp::Image { clip: None, page, .. } if *page == PageHandle(1)));
    }
}
