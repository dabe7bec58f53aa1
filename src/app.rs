//! A single watermark pass over the primary screen

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;

use wallmark_core::{
    Compositor, FontSpec, LayoutOptions, LayoutResult, LogicalSize, PhysicalSize,
    RecordingProvider, RecordingSurface, RenderReport, ScreenGeometry, SurfaceProvider,
};

/// Draws resolved options onto surfaces sized to one screen
pub struct Tagger<'o> {
    options: &'o LayoutOptions,
    geometry: ScreenGeometry,
}

impl<'o> Tagger<'o> {
    pub fn new(options: &'o LayoutOptions, geometry: ScreenGeometry) -> Self {
        Self { options, geometry }
    }

    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    /// Lay out and draw through `provider`.
    ///
    /// A missing or broken image is not an error: the watermark is drawn as
    /// text only and the failure is logged.
    pub fn render<P: SurfaceProvider>(&self, luminance: f64, provider: &mut P) -> Result<RenderReport> {
        let report = Compositor::new(self.options)
            .render(luminance, &self.geometry, provider)
            .context("Failed to draw watermark")?;
        log_report(&report);
        Ok(report)
    }

    /// Lay out on a headless surface without touching the screen.
    ///
    /// `image_size` supplies the natural size of each configured image;
    /// images it cannot size are treated as unloadable. `text_size` measures
    /// each line in logical units.
    pub fn dry_run<I, T>(&self, luminance: f64, image_size: I, text_size: T) -> Result<RenderReport>
    where
        I: Fn(&Path) -> Option<PhysicalSize>,
        T: Fn(&str, &FontSpec) -> LogicalSize,
    {
        let mut surface = RecordingSurface::new();
        let configured = [
            self.options.image_path(),
            self.options.light_image_path(),
            self.options.dark_image_path(),
        ];
        for path in configured.into_iter().flatten() {
            match image_size(path) {
                Some(size) => surface = surface.with_image(path, size),
                None => debug!("No size for {:?}", path),
            }
        }
        for line in &self.options.lines {
            let size = text_size(line, &self.options.font);
            surface = surface.with_text_size(line.as_str(), size);
        }

        self.render(luminance, &mut RecordingProvider::new(surface))
    }
}

/// Pretty JSON for `--dry-run` output
pub fn layout_json(layout: &LayoutResult) -> Result<String> {
    serde_json::to_string_pretty(layout).context("Failed to serialize layout")
}

fn log_report(report: &RenderReport) {
    let layout = &report.layout;
    if let Some(e) = &report.image_error {
        warn!("Image skipped: {}", e);
    }
    if let Some(image) = &layout.image {
        info!(
            "Image {:?} at ({:.0}, {:.0}) {:.0}x{:.0}",
            image.path, image.rect.x, image.rect.y, image.rect.width, image.rect.height
        );
    }
    info!(
        "Text block at ({:.0}, {:.0}) {:.0}x{:.0}, {} line(s), color {:?}, {} draw call(s)",
        layout.text_block.x,
        layout.text_block.y,
        layout.text_block.width,
        layout.text_block.height,
        layout.lines.len(),
        layout.text_color,
        report.draw_calls
    );
}
