//! Cairo-backed rendering surface

use cairo::Context;
use gtk4::prelude::GdkCairoContextExt;
use std::path::Path;

use crate::image_cache::ImageCache;
use crate::pango_text::{measure_line, show_line};
use wallmark_core::{CompositorError, RenderSurface, Result};
use wallmark_types::{
    Color, DpiScale, FontSpec, LogicalSize, PhysicalSize, Rect, TextAlignment,
};

fn draw_error(e: cairo::Error) -> CompositorError {
    CompositorError::Draw(e.to_string())
}

/// Draws onto any Cairo context whose user space is device pixels
pub struct CairoSurface {
    cr: Context,
    dpi: DpiScale,
    images: ImageCache,
}

impl CairoSurface {
    pub fn new(cr: Context, dpi: DpiScale) -> Self {
        Self {
            cr,
            dpi,
            images: ImageCache::new(),
        }
    }

    /// Surface for measuring only, backed by a 1x1 image
    pub fn offscreen(dpi: DpiScale) -> Result<Self> {
        let target =
            cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).map_err(draw_error)?;
        let cr = Context::new(&target).map_err(draw_error)?;
        Ok(Self::new(cr, dpi))
    }

    pub fn context(&self) -> &Context {
        &self.cr
    }

    pub fn into_context(self) -> Context {
        self.cr
    }
}

impl RenderSurface for CairoSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> LogicalSize {
        measure_line(&self.cr, text, font)
    }

    fn image_size(&mut self, path: &Path) -> Result<PhysicalSize> {
        let pixbuf = self.images.get(path)?;
        Ok(PhysicalSize::new(pixbuf.width(), pixbuf.height()))
    }

    fn draw_image(&mut self, path: &Path, rect: Rect) -> Result<()> {
        let width = rect.width.round() as i32;
        let height = rect.height.round() as i32;
        if width <= 0 || height <= 0 {
            return Err(CompositorError::InvalidGeometry { width, height });
        }

        let pixbuf = self.images.get_scaled(path, width, height)?;

        self.cr.save().map_err(draw_error)?;
        self.cr.set_source_pixbuf(&pixbuf, rect.x, rect.y);
        self.cr.rectangle(rect.x, rect.y, width as f64, height as f64);
        self.cr.fill().map_err(draw_error)?;
        self.cr.restore().map_err(draw_error)?;
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        rect: Rect,
        alignment: TextAlignment,
        color: Color,
        font: &FontSpec,
    ) -> Result<()> {
        show_line(&self.cr, text, font, rect, alignment, color, self.dpi.y).map_err(draw_error)
    }
}
