//! wallmark-types: Shared data types for the wallmark watermark compositor.
//!
//! This crate contains pure data types (colors, geometry, layout options)
//! that are shared across all wallmark crates. They carry no GTK or Cairo
//! dependency unless the `cairo` feature is enabled, which makes them usable
//! from headless layout code and tests.

pub mod color;
pub mod geometry;
pub mod options;

// Re-export commonly used types at the crate root for convenience
pub use color::Color;
pub use geometry::{DpiScale, LogicalSize, PhysicalSize, Rect, ScreenGeometry};
pub use options::{FontSpec, LayoutOptions, TextAlignment, WidthMode};
