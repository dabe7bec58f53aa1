//! Aspect-ratio preserving fit

use crate::error::{CompositorError, Result};
use wallmark_types::PhysicalSize;

/// Largest size that fits inside `max_width` x `max_height` while keeping the
/// source aspect ratio. Pass [`crate::UNCONSTRAINED`] for an open axis.
///
/// Source dimensions must be positive; use [`try_fit`] when they come from
/// untrusted input.
pub fn fit(src_width: i32, src_height: i32, max_width: f64, max_height: f64) -> PhysicalSize {
    debug_assert!(src_width > 0 && src_height > 0);

    let ratio_x = max_width / src_width as f64;
    let ratio_y = max_height / src_height as f64;
    let ratio = ratio_x.min(ratio_y);

    PhysicalSize::new(
        (src_width as f64 * ratio).floor() as i32,
        (src_height as f64 * ratio).floor() as i32,
    )
}

/// [`fit`] with the positive-dimension precondition checked
pub fn try_fit(
    src_width: i32,
    src_height: i32,
    max_width: f64,
    max_height: f64,
) -> Result<PhysicalSize> {
    if src_width <= 0 || src_height <= 0 {
        return Err(CompositorError::InvalidGeometry {
            width: src_width,
            height: src_height,
        });
    }
    Ok(fit(src_width, src_height, max_width, max_height))
}
