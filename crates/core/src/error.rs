//! Compositor error kinds

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by a render pass.
///
/// `ImageLoad` and `InvalidGeometry` raised while placing the image are
/// recovered inside the compositor (text-only fallback) and surfaced through
/// the report; the rest abort the pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositorError {
    #[error("failed to load image {path:?}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    #[error("invalid source geometry {width}x{height}: dimensions must be positive")]
    InvalidGeometry { width: i32, height: i32 },

    #[error("no rendering surface available")]
    NoRenderingSurface,

    #[error("invalid bitmap: {0}")]
    InvalidBitmap(String),

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("failed to release rendering surface: {0}")]
    Release(String),
}

impl CompositorError {
    pub fn image_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CompositorError::ImageLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompositorError>;
