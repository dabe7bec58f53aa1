//! Adaptive compositor
//!
//! Picks the text color and image variant from the wallpaper luminance, then
//! stacks the image and the text lines against the bottom-right corner of the
//! working area:
//!
//! ```text
//!                        +-----------+
//!                        |   image   |
//!                        +-----------+
//!                          line spacing
//!                        | line 1    |
//!                          line spacing
//!                        | line 2    |
//!                                       horizontal padding
//!                          vertical padding
//! -------------------------------------- working area bottom
//! ```
//!
//! Layout is a pure function of luminance, geometry, options and the
//! surface's measurements, so it can be computed and inspected without
//! drawing anything.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::aspect::try_fit;
use crate::constants::{LUMINANCE_THRESHOLD, UNCONSTRAINED};
use crate::error::{CompositorError, Result};
use crate::surface::{RenderSurface, SurfaceGuard, SurfaceProvider};
use wallmark_types::{
    Color, LayoutOptions, LogicalSize, Rect, ScreenGeometry, TextAlignment, WidthMode,
};

/// Image variant for the given wallpaper luminance.
///
/// Adaptive mode picks the dark variant on bright wallpapers (> 0.5) and the
/// light one otherwise; without both variants the plain image is used.
pub fn select_image_path(luminance: f64, options: &LayoutOptions) -> Option<&Path> {
    if options.is_adaptive() {
        if luminance > LUMINANCE_THRESHOLD {
            options.dark_image_path()
        } else {
            options.light_image_path()
        }
    } else {
        options.image_path()
    }
}

/// Dark text on bright wallpapers, light text on dark ones
pub fn text_color(luminance: f64) -> Color {
    if luminance > LUMINANCE_THRESHOLD {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub path: PathBuf,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPlacement {
    pub text: String,
    pub rect: Rect,
    pub alignment: TextAlignment,
}

/// Final placement for one render pass, in physical pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Image chosen by the selection rules, whether or not it could be placed
    pub image_path: Option<PathBuf>,
    pub text_color: Color,
    pub image: Option<ImagePlacement>,
    /// Bounding box of all text lines
    pub text_block: Rect,
    pub lines: Vec<TextPlacement>,
}

/// Layout plus the image failure it recovered from, if any
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub layout: LayoutResult,
    pub image_error: Option<CompositorError>,
}

/// Outcome of a successful render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub layout: LayoutResult,
    pub image_error: Option<CompositorError>,
    pub draw_calls: usize,
}

pub type RenderOutcome = Result<RenderReport>;

/// Lays out and draws the watermark described by a set of options
#[derive(Debug, Clone, Copy)]
pub struct Compositor<'o> {
    options: &'o LayoutOptions,
}

impl<'o> Compositor<'o> {
    pub fn new(options: &'o LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &'o LayoutOptions {
        self.options
    }

    /// Compute placements without drawing.
    ///
    /// An image that cannot be loaded or scaled is reported and the layout
    /// falls back to text only.
    pub fn compute_layout<S>(
        &self,
        luminance: f64,
        geometry: &ScreenGeometry,
        surface: &mut S,
    ) -> LayoutReport
    where
        S: RenderSurface + ?Sized,
    {
        let options = self.options;
        let dpi = geometry.dpi;

        let image_path = select_image_path(luminance, options);
        let color = text_color(luminance);
        debug!(
            "Luminance {:.3}: text color {:?}, image {:?}",
            luminance, color, image_path
        );

        let metrics: Vec<LogicalSize> = options
            .lines
            .iter()
            .map(|line| surface.measure_text(line, &options.font))
            .collect();

        let block_width_logical = match options.width {
            WidthMode::Fixed(width) => width,
            WidthMode::Auto => metrics.iter().map(|m| m.width).fold(0.0, f64::max),
        };

        // Everything below is physical pixels
        let block_width = dpi.x_to_physical(block_width_logical);
        let line_heights: Vec<f64> = metrics.iter().map(|m| dpi.y_to_physical(m.height)).collect();
        let spacing = dpi.y_to_physical(options.line_spacing);
        let block_height = stacked_height(&line_heights, spacing);

        let right = geometry.work_right() - dpi.x_to_physical(options.padding_horizontal);
        let bottom = geometry.work_bottom() - dpi.y_to_physical(options.padding_vertical);

        let mut text_x = right - block_width;
        let text_y = bottom - block_height;

        let mut image = None;
        let mut image_error = None;
        if let Some(path) = image_path {
            // No lines means no gap between the image and the (empty) block
            let gap = if line_heights.is_empty() { 0.0 } else { spacing };
            let fit_width = if block_width > 0.0 { Some(block_width) } else { None };

            match place_image(surface, path, fit_width, right, text_y - gap) {
                Ok(rect) => {
                    text_x = rect.x;
                    image = Some(ImagePlacement {
                        path: path.to_path_buf(),
                        rect,
                    });
                }
                Err(e) => {
                    warn!("{}; drawing text only", e);
                    image_error = Some(e);
                }
            }
        }

        let mut lines = Vec::with_capacity(options.lines.len());
        let mut cursor_y = text_y;
        for (i, (text, height)) in options.lines.iter().zip(&line_heights).enumerate() {
            lines.push(TextPlacement {
                text: text.clone(),
                rect: Rect::new(text_x, cursor_y, block_width, *height),
                alignment: options.alignment,
            });

            cursor_y += height;
            if i + 1 < line_heights.len() {
                cursor_y += spacing;
            }
        }

        LayoutReport {
            layout: LayoutResult {
                image_path: image_path.map(Path::to_path_buf),
                text_color: color,
                image,
                text_block: Rect::new(text_x, text_y, block_width, block_height),
                lines,
            },
            image_error,
        }
    }

    /// Issue the draw calls for a computed layout. Returns the number of
    /// primitives drawn and any image failure met while drawing.
    pub fn draw<S>(
        &self,
        layout: &LayoutResult,
        surface: &mut S,
    ) -> Result<(usize, Option<CompositorError>)>
    where
        S: RenderSurface + ?Sized,
    {
        let mut draw_calls = 0;
        let mut image_error = None;

        if let Some(image) = &layout.image {
            match surface.draw_image(&image.path, image.rect) {
                Ok(()) => draw_calls += 1,
                Err(
                    e @ (CompositorError::ImageLoad { .. }
                    | CompositorError::InvalidGeometry { .. }),
                ) => {
                    warn!("{}; drawing text only", e);
                    image_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        for line in &layout.lines {
            surface.draw_text(
                &line.text,
                line.rect,
                line.alignment,
                layout.text_color,
                &self.options.font,
            )?;
            draw_calls += 1;
        }

        Ok((draw_calls, image_error))
    }

    /// One full pass: acquire a surface, lay out, draw, release.
    ///
    /// The surface is released on every path, including errors.
    pub fn render<P>(
        &self,
        luminance: f64,
        geometry: &ScreenGeometry,
        provider: &mut P,
    ) -> RenderOutcome
    where
        P: SurfaceProvider,
    {
        let mut guard = SurfaceGuard::acquire(provider)?;
        let surface = guard.surface()?;

        let LayoutReport {
            layout,
            image_error,
        } = self.compute_layout(luminance, geometry, surface);
        let (draw_calls, draw_error) = self.draw(&layout, surface)?;
        guard.finish()?;

        info!(
            "Watermark drawn: {} line(s), image {}",
            layout.lines.len(),
            if layout.image.is_some() { "placed" } else { "none" }
        );

        Ok(RenderReport {
            layout,
            image_error: image_error.or(draw_error),
            draw_calls,
        })
    }
}

/// Sum of line heights with `spacing` strictly between consecutive lines
pub fn stacked_height(heights: &[f64], spacing: f64) -> f64 {
    let gaps = heights.len().saturating_sub(1) as f64;
    heights.iter().sum::<f64>() + spacing * gaps
}

/// Scale the image to `fit_width` (natural size when `None`) and put its
/// bottom-right corner at (`right`, `bottom`)
fn place_image<S>(
    surface: &mut S,
    path: &Path,
    fit_width: Option<f64>,
    right: f64,
    bottom: f64,
) -> Result<Rect>
where
    S: RenderSurface + ?Sized,
{
    let natural = surface.image_size(path)?;
    let max_width = fit_width.unwrap_or(natural.width as f64);
    let size = try_fit(natural.width, natural.height, max_width, UNCONSTRAINED)?;
    // A very flat image can floor to nothing in a narrow column
    if size.width <= 0 || size.height <= 0 {
        return Err(CompositorError::InvalidGeometry {
            width: size.width,
            height: size.height,
        });
    }

    let width = size.width as f64;
    let height = size.height as f64;
    Ok(Rect::new(right - width, bottom - height, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingProvider, RecordingSurface};
    use wallmark_types::options::path_or_none;
    use wallmark_types::{DpiScale, FontSpec, PhysicalSize};

    fn screen() -> ScreenGeometry {
        ScreenGeometry::new(1920.0, 1080.0, DpiScale::IDENTITY)
    }

    fn adaptive_options() -> LayoutOptions {
        LayoutOptions {
            image_path: path_or_none("/img/plain.png"),
            light_image_path: path_or_none("/img/light.png"),
            dark_image_path: path_or_none("/img/dark.png"),
            ..Default::default()
        }
    }

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_adaptive_selection_boundary() {
        let options = adaptive_options();
        assert_eq!(select_image_path(0.6, &options), Some(Path::new("/img/dark.png")));
        assert_eq!(select_image_path(0.4, &options), Some(Path::new("/img/light.png")));
        assert_eq!(select_image_path(0.5, &options), Some(Path::new("/img/light.png")));
        assert_eq!(
            select_image_path(0.500_000_1, &options),
            Some(Path::new("/img/dark.png"))
        );
    }

    #[test]
    fn test_single_variant_falls_back_to_plain() {
        let mut options = adaptive_options();
        options.dark_image_path = None;
        assert_eq!(select_image_path(0.2, &options), Some(Path::new("/img/plain.png")));
        assert_eq!(select_image_path(0.9, &options), Some(Path::new("/img/plain.png")));

        options.image_path = None;
        assert_eq!(select_image_path(0.2, &options), None);
    }

    #[test]
    fn test_text_color_threshold() {
        assert_eq!(text_color(0.51), Color::BLACK);
        assert_eq!(text_color(0.5), Color::WHITE);
        assert_eq!(text_color(0.0), Color::WHITE);
        assert_eq!(text_color(1.0), Color::BLACK);
    }

    #[test]
    fn test_line_stacking_height() {
        // 10 + 5 + 12 + 5 + 14
        assert_eq!(stacked_height(&[10.0, 12.0, 14.0], 5.0), 46.0);
        assert_eq!(stacked_height(&[10.0], 5.0), 10.0);
        assert_eq!(stacked_height(&[], 5.0), 0.0);

        let options = LayoutOptions {
            line_spacing: 5.0,
            padding_horizontal: 10.0,
            padding_vertical: 20.0,
            lines: lines(&["a", "b", "c"]),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new()
            .with_text_size("a", LogicalSize::new(50.0, 10.0))
            .with_text_size("b", LogicalSize::new(80.0, 12.0))
            .with_text_size("c", LogicalSize::new(60.0, 14.0));

        let report = Compositor::new(&options).compute_layout(0.0, &screen(), &mut surface);
        let layout = report.layout;

        assert_eq!(layout.text_block, Rect::new(1830.0, 1014.0, 80.0, 46.0));
        let ys: Vec<f64> = layout.lines.iter().map(|l| l.rect.y).collect();
        assert_eq!(ys, vec![1014.0, 1029.0, 1046.0]);
        // Last line ends exactly on the padded bottom edge
        assert_eq!(layout.lines[2].rect.bottom(), 1060.0);
        assert!(layout.lines.iter().all(|l| l.rect.width == 80.0 && l.rect.x == 1830.0));
        assert!(report.image_error.is_none());
    }

    #[test]
    fn test_fixed_width_is_verbatim() {
        let options = LayoutOptions {
            width: WidthMode::Fixed(200.0),
            lines: lines(&["short", "a very long line"]),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new()
            .with_text_size("short", LogicalSize::new(40.0, 10.0))
            .with_text_size("a very long line", LogicalSize::new(350.0, 10.0));

        let layout = Compositor::new(&options)
            .compute_layout(0.0, &screen(), &mut surface)
            .layout;
        assert_eq!(layout.text_block.width, 200.0);
        assert_eq!(layout.text_block.x, 1920.0 - 10.0 - 200.0);
        assert!(layout.lines.iter().all(|l| l.rect.width == 200.0));
    }

    #[test]
    fn test_image_stacks_above_text() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/logo.png"),
            width: WidthMode::Fixed(200.0),
            line_spacing: 8.0,
            lines: lines(&["one", "two"]),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new()
            .with_image("/img/logo.png", PhysicalSize::new(400, 100))
            .with_text_size("one", LogicalSize::new(90.0, 10.0))
            .with_text_size("two", LogicalSize::new(90.0, 10.0));

        let report = Compositor::new(&options).compute_layout(0.8, &screen(), &mut surface);
        let layout = report.layout;

        // Text block: 10 + 8 + 10 = 28 tall, bottom at 1070
        assert_eq!(layout.text_block.y, 1042.0);
        let image = layout.image.expect("image placed");
        assert_eq!(image.rect, Rect::new(1710.0, 984.0, 200.0, 50.0));
        assert_eq!(image.rect.bottom() + 8.0, layout.text_block.y);
        assert_eq!(layout.text_block.x, image.rect.x);
        assert_eq!(layout.text_color, Color::BLACK);
    }

    #[test]
    fn test_missing_image_falls_back_to_text_only() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/missing.png"),
            lines: lines(&["hello"]),
            ..Default::default()
        };
        let mut surface =
            RecordingSurface::new().with_text_size("hello", LogicalSize::new(100.0, 20.0));

        let report = Compositor::new(&options).compute_layout(0.3, &screen(), &mut surface);
        assert!(matches!(
            report.image_error,
            Some(CompositorError::ImageLoad { .. })
        ));
        assert!(report.layout.image.is_none());
        assert_eq!(report.layout.image_path, Some(PathBuf::from("/img/missing.png")));
        assert_eq!(report.layout.text_block, Rect::new(1810.0, 1050.0, 100.0, 20.0));
    }

    #[test]
    fn test_zero_sized_image_is_invalid_geometry() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/empty.png"),
            lines: lines(&["x"]),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new()
            .with_image("/img/empty.png", PhysicalSize::new(0, 10))
            .with_text_size("x", LogicalSize::new(10.0, 10.0));

        let report = Compositor::new(&options).compute_layout(0.3, &screen(), &mut surface);
        assert_eq!(
            report.image_error,
            Some(CompositorError::InvalidGeometry { width: 0, height: 10 })
        );
        assert!(report.layout.image.is_none());
    }

    #[test]
    fn test_image_flattened_to_nothing_falls_back_to_text() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/banner.png"),
            width: WidthMode::Fixed(50.0),
            lines: lines(&["x"]),
            ..Default::default()
        };
        let mut surface = RecordingSurface::new()
            .with_image("/img/banner.png", PhysicalSize::new(1000, 10))
            .with_text_size("x", LogicalSize::new(10.0, 10.0));

        let report = Compositor::new(&options).compute_layout(0.3, &screen(), &mut surface);
        assert_eq!(
            report.image_error,
            Some(CompositorError::InvalidGeometry { width: 50, height: 0 })
        );
        assert!(report.layout.image.is_none());
        assert_eq!(report.layout.text_block, Rect::new(1860.0, 1060.0, 50.0, 10.0));

        let mut provider = RecordingProvider::new(surface);
        let outcome = Compositor::new(&options)
            .render(0.3, &screen(), &mut provider)
            .unwrap();
        assert_eq!(outcome.draw_calls, 1);
    }

    #[test]
    fn test_empty_lines_draws_image_only() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/logo.png"),
            ..Default::default()
        };
        let mut surface =
            RecordingSurface::new().with_image("/img/logo.png", PhysicalSize::new(64, 32));

        let layout = Compositor::new(&options)
            .compute_layout(0.0, &screen(), &mut surface)
            .layout;
        assert!(layout.lines.is_empty());
        assert_eq!(layout.text_block.height, 0.0);
        // Auto width with no lines keeps the natural size
        assert_eq!(layout.image.unwrap().rect, Rect::new(1846.0, 1038.0, 64.0, 32.0));
    }

    #[test]
    fn test_dpi_scales_logical_inputs() {
        let options = LayoutOptions {
            padding_horizontal: 10.0,
            padding_vertical: 10.0,
            line_spacing: 4.0,
            lines: lines(&["a", "b"]),
            ..Default::default()
        };
        let geometry = ScreenGeometry::new(3840.0, 2160.0, DpiScale::uniform(2.0));
        let mut surface = RecordingSurface::new()
            .with_text_size("a", LogicalSize::new(50.0, 10.0))
            .with_text_size("b", LogicalSize::new(30.0, 10.0));

        let layout = Compositor::new(&options)
            .compute_layout(0.0, &geometry, &mut surface)
            .layout;
        // 2 * (10 + 4 + 10) tall, 2 * 50 wide, 2 * 10 padding
        assert_eq!(layout.text_block, Rect::new(3720.0, 2092.0, 100.0, 48.0));
        assert_eq!(layout.lines[1].rect, Rect::new(3720.0, 2120.0, 100.0, 20.0));
    }

    #[test]
    fn test_origin_offsets_anchor() {
        let options = LayoutOptions {
            lines: lines(&["a"]),
            ..Default::default()
        };
        let geometry = screen().with_origin(1280.0, 200.0);
        let mut surface = RecordingSurface::new().with_text_size("a", LogicalSize::new(50.0, 10.0));

        let layout = Compositor::new(&options)
            .compute_layout(0.0, &geometry, &mut surface)
            .layout;
        assert_eq!(layout.text_block.right(), 1280.0 + 1920.0 - 10.0);
        assert_eq!(layout.text_block.bottom(), 200.0 + 1080.0 - 10.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let mut options = adaptive_options();
        options.lines = lines(&["USERNAME: alice", "MACHINE NAME: box", "OS: Linux"]);
        options.alignment = TextAlignment::Center;
        let mut surface = RecordingSurface::new()
            .with_image("/img/dark.png", PhysicalSize::new(300, 120))
            .with_image("/img/light.png", PhysicalSize::new(300, 120));

        let compositor = Compositor::new(&options);
        let first = compositor.compute_layout(0.7, &screen(), &mut surface);
        let second = compositor.compute_layout(0.7, &screen(), &mut surface);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.layout).unwrap(),
            serde_json::to_string(&second.layout).unwrap()
        );
    }

    #[test]
    fn test_render_draws_and_releases() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/logo.png"),
            alignment: TextAlignment::End,
            font: FontSpec::new("Sans", 10.0),
            lines: lines(&["one", "two"]),
            ..Default::default()
        };
        let surface = RecordingSurface::new().with_image("/img/logo.png", PhysicalSize::new(10, 10));
        let mut provider = RecordingProvider::new(surface);

        let report = Compositor::new(&options)
            .render(0.1, &screen(), &mut provider)
            .unwrap();
        assert_eq!(report.draw_calls, 3);
        assert_eq!(provider.release_count(), 1);

        let commands = provider.released().unwrap().commands();
        assert!(matches!(&commands[0], DrawCommand::Image { path, .. } if path == Path::new("/img/logo.png")));
        match &commands[2] {
            DrawCommand::Text {
                text,
                alignment,
                color,
                font,
                ..
            } => {
                assert_eq!(text, "two");
                assert_eq!(*alignment, TextAlignment::End);
                assert_eq!(*color, Color::WHITE);
                assert_eq!(font.family, "Sans");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_render_without_surface() {
        let options = LayoutOptions::default();
        let mut provider = RecordingProvider::empty();
        assert_eq!(
            Compositor::new(&options).render(0.0, &screen(), &mut provider),
            Err(CompositorError::NoRenderingSurface)
        );
        assert_eq!(provider.release_count(), 0);
    }

    /// Surface whose text drawing always fails
    struct BrokenSurface;

    impl RenderSurface for BrokenSurface {
        fn measure_text(&self, _text: &str, _font: &FontSpec) -> LogicalSize {
            LogicalSize::new(10.0, 10.0)
        }

        fn image_size(&mut self, path: &Path) -> Result<PhysicalSize> {
            Err(CompositorError::image_load(path, "unreadable"))
        }

        fn draw_image(&mut self, _path: &Path, _rect: Rect) -> Result<()> {
            Ok(())
        }

        fn draw_text(
            &mut self,
            _text: &str,
            _rect: Rect,
            _alignment: TextAlignment,
            _color: Color,
            _font: &FontSpec,
        ) -> Result<()> {
            Err(CompositorError::Draw("device lost".to_string()))
        }
    }

    /// Surface that sizes images but loses them before they are drawn
    #[derive(Default)]
    struct VanishingImageSurface {
        image_error: Option<CompositorError>,
        texts: Vec<String>,
    }

    impl RenderSurface for VanishingImageSurface {
        fn measure_text(&self, _text: &str, _font: &FontSpec) -> LogicalSize {
            LogicalSize::new(40.0, 10.0)
        }

        fn image_size(&mut self, _path: &Path) -> Result<PhysicalSize> {
            Ok(PhysicalSize::new(80, 20))
        }

        fn draw_image(&mut self, path: &Path, _rect: Rect) -> Result<()> {
            Err(self
                .image_error
                .clone()
                .unwrap_or_else(|| CompositorError::image_load(path, "deleted")))
        }

        fn draw_text(
            &mut self,
            text: &str,
            _rect: Rect,
            _alignment: TextAlignment,
            _color: Color,
            _font: &FontSpec,
        ) -> Result<()> {
            self.texts.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_image_lost_at_draw_time_still_draws_text() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/logo.png"),
            lines: lines(&["one", "two"]),
            ..Default::default()
        };
        let compositor = Compositor::new(&options);
        let mut surface = VanishingImageSurface::default();

        let report = compositor.compute_layout(0.3, &screen(), &mut surface);
        assert!(report.layout.image.is_some());

        let (draw_calls, image_error) = compositor.draw(&report.layout, &mut surface).unwrap();
        assert_eq!(draw_calls, 2);
        assert!(matches!(image_error, Some(CompositorError::ImageLoad { .. })));
        assert_eq!(surface.texts, vec!["one", "two"]);
    }

    #[test]
    fn test_unscalable_image_at_draw_time_still_draws_text() {
        let options = LayoutOptions {
            image_path: path_or_none("/img/logo.png"),
            lines: lines(&["one"]),
            ..Default::default()
        };
        let compositor = Compositor::new(&options);
        let mut surface = VanishingImageSurface {
            image_error: Some(CompositorError::InvalidGeometry { width: 40, height: 0 }),
            ..Default::default()
        };

        let layout = compositor.compute_layout(0.3, &screen(), &mut surface).layout;
        let (draw_calls, image_error) = compositor.draw(&layout, &mut surface).unwrap();
        assert_eq!(draw_calls, 1);
        assert_eq!(
            image_error,
            Some(CompositorError::InvalidGeometry { width: 40, height: 0 })
        );
    }

    #[derive(Default)]
    struct CountingProvider {
        released: usize,
    }

    impl SurfaceProvider for CountingProvider {
        type Surface = BrokenSurface;

        fn acquire(&mut self) -> Result<Option<BrokenSurface>> {
            Ok(Some(BrokenSurface))
        }

        fn release(&mut self, _surface: BrokenSurface) -> Result<()> {
            self.released += 1;
            Ok(())
        }
    }

    #[test]
    fn test_render_releases_on_draw_failure() {
        let options = LayoutOptions {
            lines: lines(&["x"]),
            ..Default::default()
        };
        let mut provider = CountingProvider::default();
        let outcome = Compositor::new(&options).render(0.0, &screen(), &mut provider);
        assert_eq!(outcome, Err(CompositorError::Draw("device lost".to_string())));
        assert_eq!(provider.released, 1);
    }
}
