//! Batch loading of a content directory.
//!
//! Walks the content root, runs the front-matter parser on every file, and
//! builds one [`Document`] per file. Files are independent of each other, so
//! the work fans out over the rayon pool and fans back in with a single
//! collect.
//!
//! ## Failure policy
//!
//! A site build is all-or-nothing: the first file that fails to parse or
//! decode aborts the batch, and the error names that file. A content root
//! that does not exist is not an error; it simply holds no documents.

use crate::config::{Author, LoadOptions, SiteConfig};
use crate::document::{BuildContext, Document, DocumentError, build_document};
use crate::frontmatter::FrontMatterParser;
use crate::naming::KnownExtensions;
use chrono::{Local, NaiveDateTime};
use rayon::prelude::*;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

/// Batch-wide settings, resolved once from the site config.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub documents_path: PathBuf,
    pub base_url: String,
    /// Absolute output root; every document's output path is resolved under it.
    pub output_root: PathBuf,
    pub known_extensions: KnownExtensions,
    pub options: LoadOptions,
    pub summary_marker: String,
    pub author: Option<Author>,
    /// Processing time; every document in the batch is compared against it.
    pub now: NaiveDateTime,
}

impl LoadSettings {
    pub fn from_config(site_root: &Path, config: &SiteConfig) -> Self {
        let site_root = std::path::absolute(site_root).unwrap_or_else(|_| site_root.to_path_buf());
        Self {
            documents_path: config.documents_path(&site_root),
            base_url: config.url.clone(),
            output_root: config.output_path(&site_root),
            known_extensions: KnownExtensions::new(&config.rendered_extensions),
            options: config.loading,
            summary_marker: config.summary_marker.clone(),
            author: config.author.clone(),
            now: Local::now().naive_local(),
        }
    }

    fn context(&self) -> BuildContext<'_> {
        BuildContext {
            known_extensions: &self.known_extensions,
            options: self.options,
            base_url: &self.base_url,
            output_root: &self.output_root,
            now: self.now,
            author: self.author.as_ref(),
        }
    }
}

/// Every file below `root`, recursively, in file-name order.
///
/// A missing root yields no files.
pub fn discover_documents(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !root.is_dir() {
        log::info!("Content root {} does not exist, no documents", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    log::info!("Discovered {} files in {}", files.len(), root.display());
    Ok(files)
}

/// Load every document under the configured content root.
///
/// The returned order carries no meaning; sort with
/// [`sort_documents`](crate::document::sort_documents) when it matters.
pub fn load_documents(
    settings: &LoadSettings,
    parser: &impl FrontMatterParser,
) -> Result<Vec<Document>, LoadError> {
    let files = discover_documents(&settings.documents_path)?;

    files
        .par_iter()
        .map(|path| {
            load_document(path, settings, parser).map_err(|source| {
                log::error!("Failed to load {}: {source}", path.display());
                LoadError::Document {
                    path: path.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// Parse and build a single document.
pub fn load_document(
    path: &Path,
    settings: &LoadSettings,
    parser: &impl FrontMatterParser,
) -> Result<Document, DocumentError> {
    let parsed = parser.parse(path, &settings.summary_marker)?;
    let relative = relative_path(&settings.documents_path, path);
    let document = build_document(path.to_path_buf(), &relative, parsed, &settings.context())?;

    log::debug!(
        "{relative} → {} ({})",
        document.output_path.display(),
        document.url
    );
    Ok(document)
}

/// Path of `path` below `root`, joined with forward slashes.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
