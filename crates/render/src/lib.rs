//! wallmark-render: Cairo/Pango backend for the wallmark compositor.
//!
//! Provides the concrete [`wallmark_core::RenderSurface`] used outside of
//! tests, an offscreen PNG target, and the desktop queries (wallpaper path,
//! primary monitor) that feed a render pass.

pub mod bitmap;
pub mod cairo_surface;
pub mod image_cache;
pub mod pango_text;
pub mod png_target;
pub mod screen;
pub mod wallpaper;

pub use bitmap::{pixbuf_luminance, wallpaper_luminance};
pub use cairo_surface::CairoSurface;
pub use image_cache::probe_size;
pub use png_target::PngOverlayProvider;
