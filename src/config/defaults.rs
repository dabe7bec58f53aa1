//! Built-in watermark defaults
//!
//! Used both for `WatermarkConfig::default()` and for fields missing from a
//! config file.

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// `width` value meaning "as wide as the widest line"
pub const AUTO_WIDTH: i32 = -1;

pub const DEFAULT_LINES: [&str; 3] = [
    "USERNAME: @userName",
    "MACHINE NAME: @machineName",
    "OS: @osName",
];

pub(crate) fn default_version() -> u32 {
    CONFIG_VERSION
}

pub(crate) fn default_padding() -> f64 {
    10.0
}

pub(crate) fn default_line_spacing() -> f64 {
    8.0
}

pub(crate) fn default_font() -> String {
    "Arial".to_string()
}

pub(crate) fn default_font_size() -> f64 {
    8.0
}

pub(crate) fn default_bold() -> bool {
    true
}

pub(crate) fn default_width() -> i32 {
    AUTO_WIDTH
}

pub(crate) fn default_alignment() -> String {
    "left".to_string()
}

pub(crate) fn default_lines() -> Vec<String> {
    DEFAULT_LINES.iter().map(|line| line.to_string()).collect()
}
