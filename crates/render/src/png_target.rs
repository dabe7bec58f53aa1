//! Offscreen PNG target
//!
//! Renders the watermark into a transparent screen-sized image, optionally
//! over a copy of the wallpaper, and writes it out on release. The wallpaper
//! file itself is only ever read.

use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::prelude::GdkCairoContextExt;
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::cairo_surface::CairoSurface;
use wallmark_core::{CompositorError, Result, SurfaceProvider};
use wallmark_types::ScreenGeometry;

pub struct PngOverlayProvider {
    output: PathBuf,
    geometry: ScreenGeometry,
    backdrop: Option<PathBuf>,
    target: Option<cairo::ImageSurface>,
}

impl PngOverlayProvider {
    pub fn new(output: impl Into<PathBuf>, geometry: ScreenGeometry) -> Self {
        Self {
            output: output.into(),
            geometry,
            backdrop: None,
            target: None,
        }
    }

    /// Paint `wallpaper` (zoomed to fill) under the watermark
    pub fn with_backdrop(mut self, wallpaper: impl Into<PathBuf>) -> Self {
        self.backdrop = Some(wallpaper.into());
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Scale to fill (maintain aspect ratio, may crop)
fn paint_backdrop(cr: &cairo::Context, path: &Path, width: f64, height: f64) -> Result<()> {
    let pixbuf = Pixbuf::from_file(path).map_err(|e| CompositorError::image_load(path, e))?;
    let img_width = pixbuf.width() as f64;
    let img_height = pixbuf.height() as f64;
    if img_width <= 0.0 || img_height <= 0.0 {
        return Err(CompositorError::InvalidGeometry {
            width: pixbuf.width(),
            height: pixbuf.height(),
        });
    }

    let draw = || -> std::result::Result<(), cairo::Error> {
        cr.save()?;
        let scale = (width / img_width).max(height / img_height);
        cr.scale(scale, scale);
        cr.translate(
            (width / scale - img_width) / 2.0,
            (height / scale - img_height) / 2.0,
        );
        cr.set_source_pixbuf(&pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    };
    draw().map_err(|e| CompositorError::Draw(e.to_string()))
}

impl SurfaceProvider for PngOverlayProvider {
    type Surface = CairoSurface;

    fn acquire(&mut self) -> Result<Option<CairoSurface>> {
        let size = self.geometry.surface_size();
        if size.width <= 0 || size.height <= 0 {
            warn!("Screen has no area ({}x{})", size.width, size.height);
            return Ok(None);
        }

        let target = cairo::ImageSurface::create(cairo::Format::ARgb32, size.width, size.height)
            .map_err(|e| CompositorError::Draw(e.to_string()))?;
        let cr = cairo::Context::new(&target).map_err(|e| CompositorError::Draw(e.to_string()))?;

        if let Some(backdrop) = &self.backdrop {
            // A missing backdrop leaves a transparent overlay
            if let Err(e) = paint_backdrop(&cr, backdrop, size.width as f64, size.height as f64) {
                warn!("Backdrop skipped: {}", e);
            }
        }

        self.target = Some(target);
        Ok(Some(CairoSurface::new(cr, self.geometry.dpi)))
    }

    fn release(&mut self, surface: CairoSurface) -> Result<()> {
        // The context must go before the surface can be flushed and read
        drop(surface);
        let target = self
            .target
            .take()
            .ok_or_else(|| CompositorError::Release("no surface was acquired".to_string()))?;
        target.flush();

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CompositorError::Release(format!("{:?}: {}", parent, e)))?;
        }
        let mut file = File::create(&self.output)
            .map_err(|e| CompositorError::Release(format!("{:?}: {}", self.output, e)))?;
        target
            .write_to_png(&mut file)
            .map_err(|e| CompositorError::Release(e.to_string()))?;

        info!("Watermark written to {:?}", self.output);
        Ok(())
    }
}
