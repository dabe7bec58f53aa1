//! wallmark: stamps machine details over the desktop wallpaper
//!
//! This library holds everything around the compositor itself:
//! - Configuration file and command-line overrides
//! - `@token` substitution in watermark lines
//! - Image location resolution and download cache
//! - The render pass driving `wallmark_core::Compositor`

pub mod app;
pub mod config;
pub mod fetch;
pub mod tokens;

// Re-export commonly used types
pub use app::Tagger;
pub use config::{CliOverrides, WatermarkConfig};
pub use fetch::ImageFetcher;
pub use tokens::{Token, TokenResolver};
