//! Shared test utilities for the quire test suite.
//!
//! Builds small content trees in temp directories and looks documents up by
//! id with helpful panic messages.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! let docs = load_site(tmp.path());
//!
//! let post = find_document(&docs, "blog/2023/5/14/hello-world");
//! assert_eq!(post.parent_id, "blog");
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tempfile::TempDir;

use crate::config::LoadOptions;
use crate::document::Document;
use crate::frontmatter::YamlFrontMatter;
use crate::load::{LoadSettings, load_documents};
use crate::naming::KnownExtensions;

// =========================================================================
// Fixture setup
// =========================================================================

/// The clock every test batch runs at: 2024-06-01 12:00:00.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Default settings over `documents`, with a fixed clock.
pub fn test_settings(documents: &Path) -> LoadSettings {
    LoadSettings {
        documents_path: documents.to_path_buf(),
        base_url: "/".to_string(),
        output_root: documents.parent().unwrap_or(documents).join("build"),
        known_extensions: KnownExtensions::new(["md", "liquid"]),
        options: LoadOptions::default(),
        summary_marker: "===".to_string(),
        author: None,
        now: fixed_now(),
    }
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A small site covering dates, order prefixes, clean URLs and drafts.
///
/// ```text
/// About Us.html.md                      → about-us/index.html
/// feed.xml.liquid                       → feed.xml
/// blog/2023-5-14-Hello World.html.md    → blog/2023/5/14/hello-world/index.html
/// blog/2099-1-1-someday.html.md         → future, draft
/// guide/01.intro.md                     → guide/intro, order 1
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "About Us.html.md", "---\ntitle: About\n---\nWho we are.\n");
    write_file(root, "feed.xml.liquid", "<feed/>\n");
    write_file(
        root,
        "blog/2023-5-14-Hello World.html.md",
        "---\ntitle: Hello World\n---\nFirst post.\n===\nThe rest.\n",
    );
    write_file(root, "blog/2099-1-1-someday.html.md", "Not yet.\n");
    write_file(root, "guide/01.intro.md", "---\nlayout: guide\n---\nStart here.\n");
    tmp
}

/// Load every document under `root` with [`test_settings`].
pub fn load_site(root: &Path) -> Vec<Document> {
    load_documents(&test_settings(root), &YamlFrontMatter).unwrap()
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// All document ids, sorted.
pub fn document_ids(documents: &[Document]) -> Vec<&str> {
    let mut ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

/// Find a document by id. Panics if not found.
pub fn find_document<'a>(documents: &'a [Document], id: &str) -> &'a Document {
    documents.iter().find(|d| d.id == id).unwrap_or_else(|| {
        let ids = document_ids(documents);
        panic!("document '{id}' not found. Available: {ids:?}")
    })
}
