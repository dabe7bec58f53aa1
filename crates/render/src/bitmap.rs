//! Wallpaper decoding for luminance sampling

use gtk4::gdk_pixbuf::{Colorspace, Pixbuf};
use log::{debug, warn};
use std::path::Path;

use wallmark_core::{calculate_luminance, Bitmap, CompositorError, PixelLayout, Result};

/// Mean perceived luminance of a decoded pixbuf
pub fn pixbuf_luminance(pixbuf: &Pixbuf) -> Result<f64> {
    if pixbuf.colorspace() != Colorspace::Rgb || pixbuf.bits_per_sample() != 8 {
        return Err(CompositorError::InvalidBitmap(format!(
            "unsupported pixbuf format ({:?}, {} bits)",
            pixbuf.colorspace(),
            pixbuf.bits_per_sample()
        )));
    }

    // gdk-pixbuf stores channels in R, G, B(, A) byte order on every host
    let layout = match (pixbuf.n_channels(), pixbuf.has_alpha()) {
        (3, false) => PixelLayout::Rgb,
        (4, true) => PixelLayout::Rgba,
        (channels, alpha) => {
            return Err(CompositorError::InvalidBitmap(format!(
                "unsupported channel layout ({} channels, alpha: {})",
                channels, alpha
            )))
        }
    };

    let bytes = pixbuf.read_pixel_bytes();
    let bitmap = Bitmap::new(
        pixbuf.width().max(0) as usize,
        pixbuf.height().max(0) as usize,
        pixbuf.rowstride().max(0) as usize,
        layout,
        &bytes,
    )?;
    Ok(calculate_luminance(&bitmap))
}

/// Luminance of the wallpaper at `path`, or 0.0 (dark) when there is no
/// wallpaper or it cannot be decoded
pub fn wallpaper_luminance(path: Option<&Path>) -> f64 {
    let Some(path) = path else {
        debug!("No wallpaper, assuming dark background");
        return 0.0;
    };

    let luminance = Pixbuf::from_file(path)
        .map_err(|e| CompositorError::image_load(path, e))
        .and_then(|pixbuf| pixbuf_luminance(&pixbuf));

    match luminance {
        Ok(value) => {
            debug!("Wallpaper {:?} luminance {:.4}", path, value);
            value
        }
        Err(e) => {
            warn!("{}; assuming dark background", e);
            0.0
        }
    }
}
