use anyhow::{anyhow, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

use wallmark::app::{layout_json, Tagger};
use wallmark::{CliOverrides, ImageFetcher, TokenResolver, WatermarkConfig};
use wallmark_core::RenderSurface;
use wallmark_render::{
    probe_size, screen, wallpaper, wallpaper_luminance, CairoSurface, PngOverlayProvider,
};
use wallmark_types::{DpiScale, ScreenGeometry};

/// wallmark - stamp user, machine and OS details over the desktop wallpaper
#[derive(Parser, Debug, Clone)]
#[command(name = "wallmark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Font family for the watermark text
    #[arg(short = 'f', long = "font", value_name = "FAMILY")]
    font: Option<String>,

    /// Font size in points
    #[arg(long = "font-size", visible_alias = "fs", value_name = "POINTS")]
    font_size: Option<f64>,

    /// Image drawn above the text (path or URL)
    #[arg(short = 'i', long = "image", value_name = "PATH")]
    image: Option<String>,

    /// Image used on light wallpapers; needs --dark-image too
    #[arg(long = "light-image", visible_alias = "li", value_name = "PATH")]
    light_image: Option<String>,

    /// Image used on dark wallpapers; needs --light-image too
    #[arg(long = "dark-image", visible_alias = "di", value_name = "PATH")]
    dark_image: Option<String>,

    /// Text alignment: left, center or right
    #[arg(short = 'a', long = "align", value_name = "ALIGNMENT")]
    align: Option<String>,

    /// Space between lines
    #[arg(long = "line-spacing", visible_alias = "ls", value_name = "PIXELS")]
    line_spacing: Option<f64>,

    /// Distance from the right edge of the working area
    #[arg(long = "hpad", visible_alias = "hp", value_name = "PIXELS")]
    hpad: Option<f64>,

    /// Distance from the bottom edge of the working area
    #[arg(long = "vpad", visible_alias = "vp", value_name = "PIXELS")]
    vpad: Option<f64>,

    /// Text block width (-1 = widest line)
    #[arg(short = 'w', long = "width", value_name = "PIXELS", allow_negative_numbers = true)]
    width: Option<i32>,

    /// Watermark line; repeat to add more (replaces the configured lines)
    #[arg(long = "line", value_name = "TEXT", num_args = 1..)]
    lines: Vec<String>,

    /// Config file to use instead of the default location
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wallpaper to sample (defaults to the desktop's current wallpaper)
    #[arg(long = "wallpaper", value_name = "FILE")]
    wallpaper: Option<PathBuf>,

    /// Where to write the rendered overlay PNG
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Paint the wallpaper under the watermark in the output
    #[arg(long = "backdrop")]
    backdrop: bool,

    /// Screen size in physical pixels instead of querying the display
    #[arg(long = "screen", value_name = "WxH", value_parser = parse_screen_size)]
    screen: Option<(u32, u32)>,

    /// Display scale (DPI / 96), overriding the detected one
    #[arg(long = "dpi-scale", value_name = "SCALE", value_parser = parse_scale)]
    dpi_scale: Option<f64>,

    /// Print the computed layout as JSON instead of drawing
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Write the effective configuration back to the config file
    #[arg(long = "save-config")]
    save_config: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            font: self.font.clone(),
            font_size: self.font_size,
            image: self.image.clone(),
            light_image: self.light_image.clone(),
            dark_image: self.dark_image.clone(),
            alignment: self.align.clone(),
            line_spacing: self.line_spacing,
            padding_horizontal: self.hpad,
            padding_vertical: self.vpad,
            width: self.width,
            lines: self.lines.clone(),
        }
    }
}

/// Parse a size string "WIDTHxHEIGHT" into (u32, u32)
fn parse_screen_size(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Expected format: WIDTHxHEIGHT (e.g., 1920x1080), got: {}", s))?;
    let width = width.trim().parse::<u32>()
        .map_err(|e| format!("Invalid width: {}", e))?;
    let height = height.trim().parse::<u32>()
        .map_err(|e| format!("Invalid height: {}", e))?;
    Ok((width, height))
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let scale = s.trim().parse::<f64>().map_err(|e| format!("Invalid scale: {}", e))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("Scale must be positive, got: {}", s))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting wallmark v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => WatermarkConfig::load_from_path(path)?,
        None => WatermarkConfig::load()?,
    };
    config.apply_overrides(cli.overrides());

    if cli.save_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => WatermarkConfig::config_path()?,
        };
        config.save_to_path(&path)?;
        info!("Configuration saved to {:?}", path);
    }

    let tokens = TokenResolver::system();
    let fetcher = ImageFetcher::from_project_dirs()?;
    let options = config.resolve(&tokens, &fetcher)?;

    let geometry = screen_geometry(cli)?;
    let wallpaper_path = cli.wallpaper.clone().or_else(wallpaper::current_wallpaper);
    if wallpaper_path.is_none() {
        warn!("Could not determine the current wallpaper");
    }
    let luminance = wallpaper_luminance(wallpaper_path.as_deref());

    let tagger = Tagger::new(&options, geometry);

    if cli.dry_run {
        let measurer = CairoSurface::offscreen(geometry.dpi)?;
        let report = tagger.dry_run(
            luminance,
            |path| probe_size(path).ok(),
            |text, font| measurer.measure_text(text, font),
        )?;
        println!("{}", layout_json(&report.layout)?);
        return Ok(());
    }

    let output = match &cli.output {
        Some(path) => path.clone(),
        None => default_output()?,
    };
    let mut provider = PngOverlayProvider::new(output, geometry);
    if cli.backdrop {
        match &wallpaper_path {
            Some(path) => provider = provider.with_backdrop(path),
            None => warn!("No wallpaper to use as backdrop"),
        }
    }

    tagger.render(luminance, &mut provider)?;
    Ok(())
}

/// Use `--screen`/`--dpi-scale` when given, otherwise ask the display
fn screen_geometry(cli: &Cli) -> Result<ScreenGeometry> {
    if let Some((width, height)) = cli.screen {
        let dpi = DpiScale::uniform(cli.dpi_scale.unwrap_or(1.0));
        return Ok(ScreenGeometry::new(width as f64, height as f64, dpi));
    }

    let mut geometry = screen::detect_primary()
        .ok_or_else(|| anyhow!("No display found; pass --screen WIDTHxHEIGHT"))?;
    if let Some(scale) = cli.dpi_scale {
        geometry.dpi = DpiScale::uniform(scale);
    }
    Ok(geometry)
}

fn default_output() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("org", "wallmark", "wallmark")
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("watermark.png"))
}
