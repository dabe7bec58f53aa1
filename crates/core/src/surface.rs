//! Rendering surface traits
//!
//! The compositor draws against a [`RenderSurface`] handed out by a
//! [`SurfaceProvider`]. Providers own the native resource (window, device
//! context, offscreen image) and must get it back on every exit path, which
//! [`SurfaceGuard`] guarantees.

use std::path::Path;

use crate::error::{CompositorError, Result};
use wallmark_types::{Color, FontSpec, LogicalSize, PhysicalSize, Rect, TextAlignment};

/// Drawing target bound to device-pixel coordinates
pub trait RenderSurface {
    /// Measure one line of text in logical units (96 DPI baseline)
    fn measure_text(&self, text: &str, font: &FontSpec) -> LogicalSize;

    /// Natural pixel size of an image file
    fn image_size(&mut self, path: &Path) -> Result<PhysicalSize>;

    /// Draw an image scaled into `rect`
    fn draw_image(&mut self, path: &Path, rect: Rect) -> Result<()>;

    /// Draw one line of text into `rect`, aligned horizontally within it
    fn draw_text(
        &mut self,
        text: &str,
        rect: Rect,
        alignment: TextAlignment,
        color: Color,
        font: &FontSpec,
    ) -> Result<()>;
}

/// Source of scoped rendering surfaces
pub trait SurfaceProvider {
    type Surface: RenderSurface;

    /// Acquire the surface. `Ok(None)` means there is nothing to draw on,
    /// e.g. the target window could not be found.
    fn acquire(&mut self) -> Result<Option<Self::Surface>>;

    /// Give the surface back. Called exactly once per acquired surface.
    fn release(&mut self, surface: Self::Surface) -> Result<()>;
}

/// Holds an acquired surface and releases it when dropped
pub struct SurfaceGuard<'p, P: SurfaceProvider> {
    provider: &'p mut P,
    surface: Option<P::Surface>,
}

impl<'p, P: SurfaceProvider> SurfaceGuard<'p, P> {
    /// Acquire from `provider`, mapping an absent surface to
    /// [`CompositorError::NoRenderingSurface`]
    pub fn acquire(provider: &'p mut P) -> Result<Self> {
        match provider.acquire()? {
            Some(surface) => {
                log::trace!("Rendering surface acquired");
                Ok(Self {
                    provider,
                    surface: Some(surface),
                })
            }
            None => Err(CompositorError::NoRenderingSurface),
        }
    }

    pub fn surface(&mut self) -> Result<&mut P::Surface> {
        self.surface
            .as_mut()
            .ok_or(CompositorError::NoRenderingSurface)
    }

    /// Release now and report the provider's result
    pub fn finish(mut self) -> Result<()> {
        match self.surface.take() {
            Some(surface) => {
                log::trace!("Rendering surface released");
                self.provider.release(surface)
            }
            None => Ok(()),
        }
    }
}

impl<P: SurfaceProvider> Drop for SurfaceGuard<'_, P> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take() {
            log::trace!("Rendering surface released on early exit");
            if let Err(e) = self.provider.release(surface) {
                log::error!("{}", e);
            }
        }
    }
}
