//! Layout options consumed by the compositor.
//!
//! `LayoutOptions` is the fully-resolved form: tokens already substituted,
//! remote images already fetched to local paths. It is built once at
//! startup and only ever borrowed afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Horizontal alignment of each text line within the text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlignment {
    /// Parse user-facing names ("left", "center", "right" and friends)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" | "near" => Some(TextAlignment::Start),
            "center" | "centre" | "middle" => Some(TextAlignment::Center),
            "right" | "end" | "far" => Some(TextAlignment::End),
            _ => None,
        }
    }
}

/// Text block width policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum WidthMode {
    /// Sized to the longest measured line
    #[default]
    Auto,
    /// Fixed width in logical units, used verbatim
    Fixed(f64),
}

impl WidthMode {
    /// Map the classic integer sentinel: anything <= 0 means auto
    pub fn from_sentinel(width: i32) -> Self {
        if width > 0 {
            WidthMode::Fixed(width as f64)
        } else {
            WidthMode::Auto
        }
    }
}

/// Font used for every watermark line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: true,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Arial", 8.0)
    }
}

/// Resolved compositor configuration.
///
/// Paddings, line spacing and fixed width are logical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub padding_horizontal: f64,
    pub padding_vertical: f64,
    pub line_spacing: f64,
    pub font: FontSpec,
    pub image_path: Option<PathBuf>,
    pub light_image_path: Option<PathBuf>,
    pub dark_image_path: Option<PathBuf>,
    pub lines: Vec<String>,
    pub width: WidthMode,
    pub alignment: TextAlignment,
}

impl LayoutOptions {
    /// Adaptive image mode needs both variants; a lone variant is ignored.
    pub fn is_adaptive(&self) -> bool {
        is_set(&self.light_image_path) && is_set(&self.dark_image_path)
    }

    pub fn image_path(&self) -> Option<&Path> {
        non_empty(&self.image_path)
    }

    pub fn light_image_path(&self) -> Option<&Path> {
        non_empty(&self.light_image_path)
    }

    pub fn dark_image_path(&self) -> Option<&Path> {
        non_empty(&self.dark_image_path)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            padding_horizontal: 10.0,
            padding_vertical: 10.0,
            line_spacing: 8.0,
            font: FontSpec::default(),
            image_path: None,
            light_image_path: None,
            dark_image_path: None,
            lines: Vec::new(),
            width: WidthMode::Auto,
            alignment: TextAlignment::Start,
        }
    }
}

/// Convert a user-supplied path string, treating "" as unset
pub fn path_or_none(value: &str) -> Option<PathBuf> {
    if value.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn is_set(path: &Option<PathBuf>) -> bool {
    non_empty(path).is_some()
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}
