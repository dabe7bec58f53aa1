//! Image path resolution and URL download cache

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use reqwest::header::ETAG;
use reqwest::Url;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const UNTAGGED: &str = "untagged";

/// Turns configured image locations into local files
///
/// URLs are downloaded into a cache directory keyed by the response ETag,
/// so an unchanged image is not written twice.
#[derive(Debug)]
pub struct ImageFetcher {
    cache_dir: PathBuf,
    timeout: Duration,
    /// Cache files handed out during this run; never pruned
    kept: RefCell<HashSet<PathBuf>>,
}

impl ImageFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            kept: RefCell::new(HashSet::new()),
        }
    }

    /// Fetcher caching under the per-user cache directory
    pub fn from_project_dirs() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("org", "wallmark", "wallmark")
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?;
        Ok(Self::new(dirs.cache_dir().join("images")))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Resolve a configured image location to a local path.
    ///
    /// A local path that does not exist is passed through with a warning;
    /// the compositor falls back to text when it cannot load it. A failed
    /// download is an error.
    pub fn resolve(&self, location: &str) -> Result<PathBuf> {
        let location = location.trim();

        if let Some(url) = parse_url(location) {
            if url.scheme() == "file" {
                return url
                    .to_file_path()
                    .map_err(|_| anyhow!("Invalid file URL: {}", location));
            }
            return self.download(url);
        }

        let path = PathBuf::from(location);
        if !path.is_file() {
            warn!("Image {:?} does not exist", path);
        }
        Ok(path)
    }

    fn download(&self, url: Url) -> Result<PathBuf> {
        info!("Downloading image {}", url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let response = client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to download {}", url))?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        self.store(etag.as_deref(), || {
            response
                .bytes()
                .map(|bytes| bytes.to_vec())
                .with_context(|| format!("Failed to read body of {}", url))
        })
    }

    /// Place a downloaded body in the cache, reading it only when no file
    /// with the same tag exists yet
    fn store<F>(&self, etag: Option<&str>, body: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create {:?}", self.cache_dir))?;

        let name = etag.map(cache_name).unwrap_or_else(|| UNTAGGED.to_string());
        let path = self.cache_dir.join(format!("{}.png", name));
        self.kept.borrow_mut().insert(path.clone());

        if path.is_file() {
            debug!("Using cached image {:?}", path);
            return Ok(path);
        }

        self.prune();

        let bytes = body()?;
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {:?}", path))?;
        debug!("Cached {} bytes at {:?}", bytes.len(), path);
        Ok(path)
    }

    /// Delete cached images that this run has not handed out
    fn prune(&self) {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {:?}: {}", self.cache_dir, e);
                return;
            }
        };

        let kept = self.kept.borrow();
        for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
            let is_png = path.extension().map_or(false, |ext| ext == "png");
            if !is_png || kept.contains(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed stale cached image {:?}", path),
                Err(e) => warn!("Failed to remove {:?}: {}", path, e),
            }
        }
    }
}

/// Absolute URLs only; Windows drive letters and relative paths are files
fn parse_url(location: &str) -> Option<Url> {
    let url = Url::parse(location).ok()?;
    match url.scheme() {
        "http" | "https" | "file" => Some(url),
        _ => None,
    }
}

/// ETag value usable as a file stem
fn cache_name(etag: &str) -> String {
    let tag = etag.trim().trim_start_matches("W/").replace('"', "");
    let name: String = tag
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        UNTAGGED.to_string()
    } else {
        name
    }
}
