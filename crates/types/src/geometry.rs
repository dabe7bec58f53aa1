//! Screen and layout geometry.
//!
//! Two coordinate spaces meet in the compositor: font metrics and configured
//! paddings are *logical* units at a 96 DPI baseline, while the working area
//! and every output rectangle are *physical* device pixels. Logical values
//! are carried as [`LogicalSize`] or plain `f64` inputs to [`DpiScale`], and
//! only [`DpiScale`] turns them into physical values.

use serde::{Deserialize, Serialize};

/// DPI baseline that logical units are expressed against
pub const BASELINE_DPI: f64 = 96.0;

/// Size in logical units (96 DPI baseline)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size in physical device pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: i32,
    pub height: i32,
}

impl PhysicalSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Rectangle in physical device pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Ratio of the actual display DPI to the 96 DPI baseline, per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DpiScale {
    pub x: f64,
    pub y: f64,
}

impl DpiScale {
    pub const IDENTITY: DpiScale = DpiScale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn uniform(scale: f64) -> Self {
        Self { x: scale, y: scale }
    }

    /// Build from measured horizontal and vertical DPI
    pub fn from_dpi(dpi_x: f64, dpi_y: f64) -> Self {
        Self {
            x: dpi_x / BASELINE_DPI,
            y: dpi_y / BASELINE_DPI,
        }
    }

    pub fn x_to_physical(&self, logical: f64) -> f64 {
        logical * self.x
    }

    pub fn y_to_physical(&self, logical: f64) -> f64 {
        logical * self.y
    }

    pub fn size_to_physical(&self, size: LogicalSize) -> (f64, f64) {
        (self.x_to_physical(size.width), self.y_to_physical(size.height))
    }
}

impl Default for DpiScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Primary display description, in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    /// Origin of the primary display within the drawing surface
    pub origin_x: f64,
    pub origin_y: f64,
    /// Working area (display minus panels/taskbars)
    pub work_width: f64,
    pub work_height: f64,
    pub dpi: DpiScale,
}

impl ScreenGeometry {
    pub fn new(work_width: f64, work_height: f64, dpi: DpiScale) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            work_width,
            work_height,
            dpi,
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Right edge of the working area
    pub fn work_right(&self) -> f64 {
        self.origin_x + self.work_width
    }

    /// Bottom edge of the working area
    pub fn work_bottom(&self) -> f64 {
        self.origin_y + self.work_height
    }

    /// Pixel extent a surface needs to cover this screen
    pub fn surface_size(&self) -> PhysicalSize {
        PhysicalSize::new(
            self.work_right().ceil() as i32,
            self.work_bottom().ceil() as i32,
        )
    }
}
