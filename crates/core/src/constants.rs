//! Shared constants for the compositor

/// Luminance above this is a "bright" wallpaper: dark text, dark image variant.
/// Exactly 0.5 still counts as dark.
pub const LUMINANCE_THRESHOLD: f64 = 0.5;

/// Perceived luminance channel weights (ITU-R BT.601)
pub const LUMA_RED: f64 = 0.299;
pub const LUMA_GREEN: f64 = 0.587;
pub const LUMA_BLUE: f64 = 0.114;

/// Bounding value meaning "no constraint on this axis" for [`crate::fit`]
pub const UNCONSTRAINED: f64 = f64::INFINITY;

/// Bitmaps with fewer rows than this are sampled on the calling thread
pub const PARALLEL_ROW_THRESHOLD: usize = 64;
