//! Perceived luminance of a bitmap
//!
//! Luminance (perceived): 0.299*R + 0.587*G + 0.114*B, channels in 0..=1,
//! averaged over every pixel. Rows are addressed through the bitmap's stride
//! so row padding is never sampled.

use rayon::prelude::*;

use crate::constants::{LUMA_BLUE, LUMA_GREEN, LUMA_RED, PARALLEL_ROW_THRESHOLD};
use crate::error::{CompositorError, Result};

/// Byte order of one pixel in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
    Bgr,
    /// Also covers Cairo ARGB32/RGB24 on little-endian hosts
    Bgra,
}

impl PixelLayout {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
            PixelLayout::Rgba | PixelLayout::Bgra => 4,
        }
    }

    /// Byte offsets of the (red, green, blue) channels within a pixel
    fn channel_offsets(self) -> (usize, usize, usize) {
        match self {
            PixelLayout::Rgb | PixelLayout::Rgba => (0, 1, 2),
            PixelLayout::Bgr | PixelLayout::Bgra => (2, 1, 0),
        }
    }
}

/// Borrowed view of decoded pixel data
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    width: usize,
    height: usize,
    stride: usize,
    layout: PixelLayout,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Wrap raw pixel rows. `stride` is the distance in bytes between the
    /// starts of consecutive rows and may include alignment padding.
    pub fn new(
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
        data: &'a [u8],
    ) -> Result<Self> {
        let row_bytes = width * layout.bytes_per_pixel();
        if stride < row_bytes {
            return Err(CompositorError::InvalidBitmap(format!(
                "stride {} is shorter than a {}-pixel row ({} bytes)",
                stride, width, row_bytes
            )));
        }

        // The last row does not need to carry padding
        let required = if height == 0 || width == 0 {
            0
        } else {
            (height - 1) * stride + row_bytes
        };
        if data.len() < required {
            return Err(CompositorError::InvalidBitmap(format!(
                "{} bytes supplied, {}x{} with stride {} needs {}",
                data.len(),
                width,
                height,
                stride,
                required
            )));
        }

        Ok(Self {
            width,
            height,
            stride,
            layout,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.layout.bytes_per_pixel()]
    }

    /// Sum of normalized pixel luminance across one row
    fn row_luminance(&self, y: usize) -> f64 {
        let (r, g, b) = self.layout.channel_offsets();
        self.row(y)
            .chunks_exact(self.layout.bytes_per_pixel())
            .map(|px| {
                (LUMA_RED * px[r] as f64 + LUMA_GREEN * px[g] as f64 + LUMA_BLUE * px[b] as f64)
                    / 255.0
            })
            .sum()
    }
}

/// Mean perceived luminance of `bitmap` in 0.0..=1.0.
///
/// Large bitmaps are reduced row-by-row on the rayon pool; the per-row sums
/// are added in row order afterwards so the result is identical to the
/// sequential pass. An empty bitmap yields 0.0.
pub fn calculate_luminance(bitmap: &Bitmap<'_>) -> f64 {
    let pixel_count = bitmap.width * bitmap.height;
    if pixel_count == 0 {
        return 0.0;
    }

    let row_sums: Vec<f64> = if bitmap.height >= PARALLEL_ROW_THRESHOLD {
        (0..bitmap.height)
            .into_par_iter()
            .map(|y| bitmap.row_luminance(y))
            .collect()
    } else {
        (0..bitmap.height).map(|y| bitmap.row_luminance(y)).collect()
    };

    let total: f64 = row_sums.iter().sum();
    let luminance = total / pixel_count as f64;
    log::trace!(
        "Sampled {}x{} bitmap, luminance {:.4}",
        bitmap.width,
        bitmap.height,
        luminance
    );
    luminance
}
