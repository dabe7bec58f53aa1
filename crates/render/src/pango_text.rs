//! Pango-based text measurement and drawing
//!
//! Cairo's toy font API keeps growing internal font caches; Pango manages
//! font resources properly and integrates with fontconfig, so all watermark
//! text goes through here.
//!
//! Measurement happens at the 96 DPI baseline (logical units). Drawing sets
//! the Pango resolution to `96 * dpi_scale` so the same point size lands in
//! physical pixels.

use cairo::Context;
use pango::{FontDescription, Layout, Weight as PangoWeight};
use pangocairo::functions::{context_set_resolution, create_layout, show_layout};
use std::cell::RefCell;
use std::collections::HashMap;

use wallmark_types::geometry::BASELINE_DPI;
use wallmark_types::{Color, FontSpec, LogicalSize, Rect, TextAlignment};

/// Cache for FontDescription objects to avoid repeated allocations
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct FontKey {
    family: String,
    bold: bool,
    size_pango: i32, // Size in Pango units (points * PANGO_SCALE)
}

impl FontKey {
    fn new(font: &FontSpec) -> Self {
        Self {
            family: font.family.clone(),
            bold: font.bold,
            size_pango: (font.size * pango::SCALE as f64) as i32,
        }
    }
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 16,
        }
    }

    fn get_or_create(&mut self, font: &FontSpec) -> FontDescription {
        let key = FontKey::new(font);
        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        // One render pass uses one font; a full cache just starts over
        if self.cache.len() >= self.max_entries {
            self.cache.clear();
        }

        let mut desc = FontDescription::new();
        desc.set_family(&key.family);
        desc.set_weight(if key.bold {
            PangoWeight::Bold
        } else {
            PangoWeight::Normal
        });
        desc.set_size(key.size_pango);

        self.cache.insert(key, desc.clone());
        desc
    }
}

thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> = RefCell::new(FontDescriptionCache::new());
}

/// Get a cached FontDescription for `font`
pub fn font_description(font: &FontSpec) -> FontDescription {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().get_or_create(font))
}

/// Create a layout for `text` rendered at `dpi`
fn text_layout(cr: &Context, text: &str, font: &FontSpec, dpi: f64) -> Layout {
    let layout = create_layout(cr);
    context_set_resolution(&layout.context(), dpi);
    layout.context_changed();
    layout.set_font_description(Some(&font_description(font)));
    layout.set_text(text);
    layout
}

/// Logical extent of a layout in pixels
fn logical_extent(layout: &Layout) -> (f64, f64) {
    let (_ink_rect, logical_rect) = layout.extents();
    let scale = pango::SCALE as f64;
    (
        logical_rect.width() as f64 / scale,
        logical_rect.height() as f64 / scale,
    )
}

/// Measure one line at the 96 DPI baseline.
///
/// Uses the logical rectangle (advance width, ascent + descent) rather than
/// ink extents so every line of the same font has the same height.
pub fn measure_line(cr: &Context, text: &str, font: &FontSpec) -> LogicalSize {
    let layout = text_layout(cr, text, font, BASELINE_DPI);
    let (width, height) = logical_extent(&layout);
    LogicalSize::new(width, height)
}

/// Horizontal offset of a line of `text_width` inside a box of `box_width`
pub fn aligned_offset(alignment: TextAlignment, box_width: f64, text_width: f64) -> f64 {
    match alignment {
        TextAlignment::Start => 0.0,
        TextAlignment::Center => (box_width - text_width) / 2.0,
        TextAlignment::End => box_width - text_width,
    }
}

/// Draw one line inside `rect` (physical pixels), clipped to it.
///
/// `dpi_scale` is the vertical DPI ratio of the target.
pub fn show_line(
    cr: &Context,
    text: &str,
    font: &FontSpec,
    rect: Rect,
    alignment: TextAlignment,
    color: Color,
    dpi_scale: f64,
) -> Result<(), cairo::Error> {
    let layout = text_layout(cr, text, font, BASELINE_DPI * dpi_scale);
    let (text_width, _) = logical_extent(&layout);

    cr.save()?;
    cr.rectangle(rect.x, rect.y, rect.width, rect.height);
    cr.clip();

    color.apply_to_cairo(cr);
    // Pango draws from the top-left of the logical rect
    cr.move_to(rect.x + aligned_offset(alignment, rect.width, text_width), rect.y);
    show_layout(cr, &layout);

    cr.restore()?;
    Ok(())
}
