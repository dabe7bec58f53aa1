//! Configuration management

pub mod defaults;
mod settings;

pub use settings::{CliOverrides, WatermarkConfig};
