//! Primary monitor geometry via GDK

use gtk4::prelude::*;
use log::{debug, warn};

use wallmark_types::{DpiScale, ScreenGeometry};

/// Geometry of the first monitor in physical pixels, or `None` without a
/// display connection.
///
/// GTK4 has no work-area query, so this is the full monitor including any
/// panels or docks; raise `--vpad`/`--hpad` to clear them. The scale is
/// GDK's integer scale factor, so fractional scaling (e.g. 1.25) reads as
/// the next integer; pass `--dpi-scale` to override it.
pub fn detect_primary() -> Option<ScreenGeometry> {
    if let Err(e) = gtk4::init() {
        warn!("Failed to initialize GTK: {}", e);
        return None;
    }

    let display = gtk4::gdk::Display::default()?;
    let monitor = display
        .monitors()
        .item(0)?
        .downcast::<gtk4::gdk::Monitor>()
        .ok()?;

    // GDK reports application pixels; scale them up to device pixels
    let rect = monitor.geometry();
    let scale = monitor.scale_factor().max(1) as f64;
    let geometry = ScreenGeometry::new(
        rect.width() as f64 * scale,
        rect.height() as f64 * scale,
        DpiScale::uniform(scale),
    )
    .with_origin(rect.x() as f64 * scale, rect.y() as f64 * scale);

    debug!(
        "Primary monitor {:?}: {}x{} at ({}, {}), scale {}",
        monitor.connector(),
        geometry.work_width,
        geometry.work_height,
        geometry.origin_x,
        geometry.origin_y,
        scale
    );
    Some(geometry)
}
