//! Headless surface that records draw commands
//!
//! Used for `--dry-run` and for exercising the layout without a display.
//! Text is measured with a fixed-advance model unless a line has an explicit
//! size registered.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CompositorError, Result};
use crate::surface::{RenderSurface, SurfaceProvider};
use wallmark_types::{Color, FontSpec, LogicalSize, PhysicalSize, Rect, TextAlignment};

/// Points to logical pixels at the 96 DPI baseline
const POINTS_TO_PIXELS: f64 = 96.0 / 72.0;

/// Average glyph advance as a fraction of the em size
const ADVANCE_PER_EM: f64 = 0.6;

/// Line height as a fraction of the em size
const LINE_HEIGHT_PER_EM: f64 = 1.5;

/// A drawing primitive issued against a surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Image {
        path: PathBuf,
        rect: Rect,
    },
    Text {
        text: String,
        rect: Rect,
        alignment: TextAlignment,
        color: Color,
        font: FontSpec,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    text_sizes: HashMap<String, LogicalSize>,
    images: HashMap<PathBuf, PhysicalSize>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            text_sizes: HashMap::new(),
            images: HashMap::new(),
            commands: Vec::new(),
        }
    }

    /// Report `size` whenever `text` is measured
    pub fn with_text_size(mut self, text: impl Into<String>, size: LogicalSize) -> Self {
        self.text_sizes.insert(text.into(), size);
        self
    }

    /// Make an image "loadable" with the given natural size
    pub fn with_image(mut self, path: impl Into<PathBuf>, size: PhysicalSize) -> Self {
        self.images.insert(path.into(), size);
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl RenderSurface for RecordingSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> LogicalSize {
        if let Some(size) = self.text_sizes.get(text) {
            return *size;
        }
        let em = font.size * POINTS_TO_PIXELS;
        LogicalSize::new(
            text.chars().count() as f64 * em * ADVANCE_PER_EM,
            em * LINE_HEIGHT_PER_EM,
        )
    }

    fn image_size(&mut self, path: &Path) -> Result<PhysicalSize> {
        self.images
            .get(path)
            .copied()
            .ok_or_else(|| CompositorError::image_load(path, "no such image"))
    }

    fn draw_image(&mut self, path: &Path, rect: Rect) -> Result<()> {
        self.commands.push(DrawCommand::Image {
            path: path.to_path_buf(),
            rect,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        rect: Rect,
        alignment: TextAlignment,
        color: Color,
        font: &FontSpec,
    ) -> Result<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            rect,
            alignment,
            color,
            font: font.clone(),
        });
        Ok(())
    }
}

/// Hands out a single [`RecordingSurface`] and keeps it after release
#[derive(Debug, Default)]
pub struct RecordingProvider {
    pending: Option<RecordingSurface>,
    released: Option<RecordingSurface>,
    release_count: usize,
}

impl RecordingProvider {
    pub fn new(surface: RecordingSurface) -> Self {
        Self {
            pending: Some(surface),
            released: None,
            release_count: 0,
        }
    }

    /// A provider with nothing to hand out
    pub fn empty() -> Self {
        Self::default()
    }

    /// Surface returned by the last release, with its recorded commands
    pub fn released(&self) -> Option<&RecordingSurface> {
        self.released.as_ref()
    }

    pub fn take_released(&mut self) -> Option<RecordingSurface> {
        self.released.take()
    }

    pub fn release_count(&self) -> usize {
        self.release_count
    }
}

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn acquire(&mut self) -> Result<Option<RecordingSurface>> {
        Ok(self.pending.take())
    }

    fn release(&mut self, surface: RecordingSurface) -> Result<()> {
        self.release_count += 1;
        self.released = Some(surface);
        Ok(())
    }
}
