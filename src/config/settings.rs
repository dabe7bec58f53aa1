//! Watermark configuration file and command-line overrides

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults::*;
use crate::fetch::ImageFetcher;
use crate::tokens::TokenResolver;
use wallmark_types::options::path_or_none;
use wallmark_types::{FontSpec, LayoutOptions, TextAlignment, WidthMode};

/// User-facing watermark configuration
///
/// Image fields hold local paths or URLs; lines may contain `@tokens`.
/// Everything is turned into a [`LayoutOptions`] by [`WatermarkConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_padding")]
    pub padding_horizontal: f64,
    #[serde(default = "default_padding")]
    pub padding_vertical: f64,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_bold")]
    pub bold: bool,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub light_image: String,
    #[serde(default)]
    pub dark_image: String,
    /// Text block width in logical units; `-1` sizes it to the widest line
    #[serde(default = "default_width")]
    pub width: i32,
    /// "left", "center" or "right"
    #[serde(default = "default_alignment")]
    pub alignment: String,
    #[serde(default = "default_lines")]
    pub lines: Vec<String>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            padding_horizontal: default_padding(),
            padding_vertical: default_padding(),
            line_spacing: default_line_spacing(),
            font: default_font(),
            font_size: default_font_size(),
            bold: default_bold(),
            image: String::new(),
            light_image: String::new(),
            dark_image: String::new(),
            width: default_width(),
            alignment: default_alignment(),
            lines: default_lines(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub font: Option<String>,
    pub font_size: Option<f64>,
    pub image: Option<String>,
    pub light_image: Option<String>,
    pub dark_image: Option<String>,
    pub alignment: Option<String>,
    pub line_spacing: Option<f64>,
    pub padding_horizontal: Option<f64>,
    pub padding_vertical: Option<f64>,
    pub width: Option<i32>,
    /// Replaces the configured lines when non-empty
    pub lines: Vec<String>,
}

impl WatermarkConfig {
    /// Load configuration from disk, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            debug!("No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "wallmark", "wallmark")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write config {:?}", path))?;
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *field = value;
            }
        }

        set(&mut self.font, overrides.font);
        set(&mut self.font_size, overrides.font_size);
        set(&mut self.image, overrides.image);
        set(&mut self.light_image, overrides.light_image);
        set(&mut self.dark_image, overrides.dark_image);
        set(&mut self.alignment, overrides.alignment);
        set(&mut self.line_spacing, overrides.line_spacing);
        set(&mut self.padding_horizontal, overrides.padding_horizontal);
        set(&mut self.padding_vertical, overrides.padding_vertical);
        set(&mut self.width, overrides.width);
        if !overrides.lines.is_empty() {
            self.lines = overrides.lines;
        }
    }

    /// Check that numeric fields describe a drawable watermark
    pub fn validate(&self) -> Result<()> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            bail!("Font size must be positive, got {}", self.font_size);
        }
        for (name, value) in [
            ("horizontal padding", self.padding_horizontal),
            ("vertical padding", self.padding_vertical),
            ("line spacing", self.line_spacing),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{} must be zero or more, got {}", name, value);
            }
        }
        Ok(())
    }

    /// Expand tokens, fetch images and produce compositor options
    pub fn resolve(&self, tokens: &TokenResolver, fetcher: &ImageFetcher) -> Result<LayoutOptions> {
        self.validate()?;

        let fetch = |location: &str| -> Result<Option<PathBuf>> {
            match path_or_none(location) {
                Some(_) => fetcher.resolve(location).map(Some),
                None => Ok(None),
            }
        };

        let has_light = path_or_none(&self.light_image).is_some();
        let has_dark = path_or_none(&self.dark_image).is_some();
        let (light_image_path, dark_image_path) = if has_light && has_dark {
            (fetch(&self.light_image)?, fetch(&self.dark_image)?)
        } else {
            if has_light || has_dark {
                warn!("Only one of the light/dark images is set; both are needed, ignoring it");
            }
            (None, None)
        };

        let alignment = TextAlignment::parse(&self.alignment).unwrap_or_else(|| {
            warn!("Unknown alignment {:?}, using left", self.alignment);
            TextAlignment::Start
        });

        Ok(LayoutOptions {
            padding_horizontal: self.padding_horizontal,
            padding_vertical: self.padding_vertical,
            line_spacing: self.line_spacing,
            font: FontSpec {
                family: self.font.clone(),
                size: self.font_size,
                bold: self.bold,
            },
            image_path: fetch(&self.image)?,
            light_image_path,
            dark_image_path,
            lines: tokens.expand_all(&self.lines),
            width: WidthMode::from_sentinel(self.width),
            alignment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    fn tokens() -> TokenResolver {
        TokenResolver::from_values([
            (Token::UserName, "alice"),
            (Token::MachineName, "WS-042"),
            (Token::OsName, "Fedora Linux 40"),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = WatermarkConfig::default();
        assert_eq!(config.padding_horizontal, 10.0);
        assert_eq!(config.padding_vertical, 10.0);
        assert_eq!(config.line_spacing, 8.0);
        assert_eq!(config.font, "Arial");
        assert_eq!(config.font_size, 8.0);
        assert!(config.bold);
        assert_eq!(config.width, AUTO_WIDTH);
        assert_eq!(config.alignment, "left");
        assert_eq!(config.lines.len(), 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: WatermarkConfig =
            serde_json::from_str(r#"{ "font_size": 12, "lines": ["hello"] }"#).unwrap();
        assert_eq!(config.font_size, 12.0);
        assert_eq!(config.lines, vec!["hello"]);
        assert_eq!(config.font, "Arial");
        assert_eq!(config.width, -1);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");

        let mut config = WatermarkConfig::default();
        config.image = "https://example.org/logo.png".to_string();
        config.width = 240;
        config.save_to_path(&path).unwrap();

        assert_eq!(WatermarkConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = WatermarkConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let mut config = WatermarkConfig::default();
        config.apply_overrides(CliOverrides {
            font_size: Some(14.0),
            alignment: Some("right".to_string()),
            ..Default::default()
        });
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.alignment, "right");
        assert_eq!(config.font, "Arial");
        assert_eq!(config.lines.len(), 3);

        config.apply_overrides(CliOverrides {
            lines: vec!["only".to_string()],
            ..Default::default()
        });
        assert_eq!(config.lines, vec!["only"]);
    }

    #[test]
    fn test_resolve_expands_tokens_and_maps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ImageFetcher::new(dir.path());
        let mut config = WatermarkConfig::default();
        config.width = 200;
        config.alignment = "Center".to_string();

        let options = config.resolve(&tokens(), &fetcher).unwrap();
        assert_eq!(
            options.lines,
            vec!["USERNAME: alice", "MACHINE NAME: WS-042", "OS: Fedora Linux 40"]
        );
        assert_eq!(options.width, WidthMode::Fixed(200.0));
        assert_eq!(options.alignment, TextAlignment::Center);
        assert_eq!(options.font, FontSpec::new("Arial", 8.0));
        assert_eq!(options.image_path, None);
    }

    #[test]
    fn test_resolve_unknown_alignment_and_auto_width() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WatermarkConfig::default();
        config.alignment = "diagonal".to_string();
        config.width = 0;

        let options = config.resolve(&tokens(), &ImageFetcher::new(dir.path())).unwrap();
        assert_eq!(options.alignment, TextAlignment::Start);
        assert_eq!(options.width, WidthMode::Auto);
    }

    #[test]
    fn test_resolve_image_variants() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ImageFetcher::new(dir.path().join("cache"));
        let light = dir.path().join("light.png");
        let dark = dir.path().join("dark.png");

        let mut config = WatermarkConfig::default();
        config.image = "/srv/logo.png".to_string();
        config.light_image = light.to_string_lossy().into_owned();
        let options = config.resolve(&tokens(), &fetcher).unwrap();
        // A lone variant is dropped
        assert!(!options.is_adaptive());
        assert_eq!(options.light_image_path, None);
        assert_eq!(options.image_path, Some(PathBuf::from("/srv/logo.png")));

        config.dark_image = dark.to_string_lossy().into_owned();
        let options = config.resolve(&tokens(), &fetcher).unwrap();
        assert!(options.is_adaptive());
        assert_eq!(options.light_image_path, Some(light));
        assert_eq!(options.dark_image_path, Some(dark));
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut config = WatermarkConfig::default();
        config.font_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = WatermarkConfig::default();
        config.line_spacing = -1.0;
        assert!(config.validate().is_err());

        let mut config = WatermarkConfig::default();
        config.padding_vertical = 0.0;
        assert!(config.validate().is_ok());
    }
}
