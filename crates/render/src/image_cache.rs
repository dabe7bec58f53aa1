//! Image cache for watermark images
//!
//! A render pass asks for an image's size during layout and draws it right
//! after, so every image is decoded once and its scaled copy is kept for the
//! size it is drawn at.

use gtk4::gdk_pixbuf::{InterpType, Pixbuf};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wallmark_core::{CompositorError, PhysicalSize, Result};

/// Read an image's pixel size from its header without decoding it
pub fn probe_size(path: &Path) -> Result<PhysicalSize> {
    let (_, width, height) = Pixbuf::file_info(path)
        .ok_or_else(|| CompositorError::image_load(path, "unrecognized image format"))?;
    Ok(PhysicalSize::new(width, height))
}

struct CachedImage {
    pixbuf: Pixbuf,
    /// Last scaled copy and the size it was scaled to
    scaled: Option<((i32, i32), Pixbuf)>,
}

/// Decoded images keyed by file path
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<PathBuf, CachedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or load the full-size pixbuf
    pub fn get(&mut self, path: &Path) -> Result<Pixbuf> {
        if let Some(entry) = self.images.get(path) {
            return Ok(entry.pixbuf.clone());
        }

        let pixbuf =
            Pixbuf::from_file(path).map_err(|e| CompositorError::image_load(path, e))?;
        log::debug!(
            "Loaded image {:?} ({}x{})",
            path,
            pixbuf.width(),
            pixbuf.height()
        );

        self.images.insert(
            path.to_path_buf(),
            CachedImage {
                pixbuf: pixbuf.clone(),
                scaled: None,
            },
        );
        Ok(pixbuf)
    }

    /// Get the pixbuf scaled to exactly `width` x `height`
    pub fn get_scaled(&mut self, path: &Path, width: i32, height: i32) -> Result<Pixbuf> {
        let pixbuf = self.get(path)?;
        if pixbuf.width() == width && pixbuf.height() == height {
            return Ok(pixbuf);
        }

        let entry = self
            .images
            .get_mut(path)
            .ok_or_else(|| CompositorError::image_load(path, "evicted while scaling"))?;
        if let Some((size, scaled)) = &entry.scaled {
            if *size == (width, height) {
                return Ok(scaled.clone());
            }
        }

        let scaled = pixbuf
            .scale_simple(width, height, InterpType::Bilinear)
            .ok_or_else(|| {
                CompositorError::image_load(path, format!("cannot scale to {}x{}", width, height))
            })?;
        entry.scaled = Some(((width, height), scaled.clone()));
        Ok(scaled)
    }

    /// Invalidate a specific path (call when file might have changed)
    pub fn invalidate(&mut self, path: &Path) {
        self.images.remove(path);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
