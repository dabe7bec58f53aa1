//! wallmark-core: Adaptive compositing engine for wallmark.
//!
//! This crate samples wallpaper luminance, picks a contrasting text color and
//! image variant, lays out the watermark against the bottom-right corner of
//! the working area, and issues draw calls against an injected
//! [`RenderSurface`]. It never touches a native handle itself.

pub mod aspect;
pub mod compositor;
pub mod constants;
mod error;
pub mod luminance;
mod recording;
mod surface;

pub use aspect::{fit, try_fit};
pub use compositor::{
    select_image_path, text_color, Compositor, ImagePlacement, LayoutReport, LayoutResult,
    RenderOutcome, RenderReport, TextPlacement,
};
pub use constants::{LUMINANCE_THRESHOLD, UNCONSTRAINED};
pub use error::{CompositorError, Result};
pub use luminance::{calculate_luminance, Bitmap, PixelLayout};
pub use recording::{DrawCommand, RecordingProvider, RecordingSurface};
pub use surface::{RenderSurface, SurfaceGuard, SurfaceProvider};

// Re-export types used in trait signatures for convenience
pub use wallmark_types::{
    Color, DpiScale, FontSpec, LayoutOptions, LogicalSize, PhysicalSize, Rect, ScreenGeometry,
    TextAlignment, WidthMode,
};
