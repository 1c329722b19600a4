//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the site root. User
//! values are merged over stock defaults, so a config file only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! documents = "documents"   # Content root, relative to the site root
//! output = "build"          # Output root, relative to the site root
//! url = "/"                 # Application base URL for document URLs
//! rendered_extensions = ["md", "markdown", "liquid", "hbs"]
//! summary_marker = "==="    # Line separating the summary from the body
//!
//! [author]                  # Optional site author
//! name = "Jane Doe"
//! email = "jane@example.com"
//!
//! [loading]
//! date_from_file_name = true    # 2023-5-14-post.md → dated 2023-05-14
//! order_from_file_name = true   # 03.intro.md → order 3
//! sanitize_path = true          # "My Notes/" → "my-notes/"
//! clean_urls = true             # about.html → about/index.html
//! insert_date_into_path = true  # blog/post → blog/2023/5/14/post
//!
//! [processing]
//! max_processes = 4         # Max parallel loaders (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content root, relative to the site root.
    pub documents: String,
    /// Output root, relative to the site root.
    pub output: String,
    /// Application base URL every document URL starts with.
    pub url: String,
    /// Extensions recognized as rendering stages.
    pub rendered_extensions: Vec<String>,
    /// Marker line handed to the front-matter parser.
    pub summary_marker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Filename and routing conventions.
    pub loading: LoadOptions,
    /// Parallel loading settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            documents: "documents".to_string(),
            output: "build".to_string(),
            url: "/".to_string(),
            rendered_extensions: ["md", "markdown", "liquid", "hbs"]
                .into_iter()
                .map(String::from)
                .collect(),
            summary_marker: "===".to_string(),
            author: None,
            loading: LoadOptions::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Validation("url must not be empty".into()));
        }
        if self.summary_marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "summary_marker must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .rendered_extensions
            .iter()
            .find(|e| e.is_empty() || e.contains('.'))
        {
            return Err(ConfigError::Validation(format!(
                "rendered_extensions entries must be non-empty and dot-free, got {bad:?}"
            )));
        }
        Ok(())
    }

    /// Absolute content root for a site rooted at `site_root`.
    pub fn documents_path(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.documents)
    }

    /// Absolute output root for a site rooted at `site_root`.
    pub fn output_path(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.output)
    }
}

/// Site author, attached to every loaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Filename and routing conventions applied while loading documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Decode a `YYYY-M-D` prefix into the document date.
    pub date_from_file_name: bool,
    /// Decode an `N.` / `N-` prefix into the document order.
    pub order_from_file_name: bool,
    /// Sanitize folder paths into URL-safe segments.
    pub sanitize_path: bool,
    /// Rewrite `name.html` to `name/index.html`.
    pub clean_urls: bool,
    /// Insert `year/month/day` folders for dated documents.
    pub insert_date_into_path: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_from_file_name: true,
            order_from_file_name: true,
            sanitize_path: true,
            clean_urls: true,
            insert_date_into_path: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel document loaders.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists.
pub fn load_raw_config(site_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = site_root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the site config, merging user values over stock defaults.
pub fn load_config(site_root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(site_root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Quire Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Content root, relative to this file.
documents = "documents"

# Output root, relative to this file.
output = "build"

# Application base URL. Every document URL starts with it.
url = "/"

# Extensions treated as rendering stages. They are stripped from the file
# name (innermost last) and recorded on the document:
#   about.html.md -> about.html, rendered with ["md"]
rendered_extensions = ["md", "markdown", "liquid", "hbs"]

# A line equal to this marker splits the summary from the rest of the body.
summary_marker = "==="

# ---------------------------------------------------------------------------
# Author (attached to every document)
# ---------------------------------------------------------------------------
# [author]
# name = "Jane Doe"
# email = "jane@example.com"
# url = "https://example.com"

# ---------------------------------------------------------------------------
# Filename conventions
# ---------------------------------------------------------------------------
[loading]
# 2023-5-14-my-post.md is dated 2023-05-14. A time may follow the date:
# 2023-5-14T09.30-my-post.md. Front-matter `date:` wins over the file name.
date_from_file_name = true

# 03.intro.md / 03-intro.md get order 3.
order_from_file_name = true

# Folder names are lowercased and made URL-safe.
sanitize_path = true

# about.html is written to about/index.html and linked as about/.
clean_urls = true

# Dated documents are placed under year/month/day folders.
insert_date_into_path = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel document loaders.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
