//! Document records and the record builder.
//!
//! A [`Document`] is everything downstream stages need to know about one
//! content file: identity, routing, dates, ordering, and the metadata left
//! over for templates. [`build_document`] assembles it from three inputs:
//!
//! - the source path (and its path below the content root),
//! - the front-matter parser's output,
//! - the loader's [`BuildContext`] (known extensions, options, base URL, clock).
//!
//! ## Metadata precedence
//!
//! Computed values are defaults. A front-matter key always wins:
//!
//! | Key | Default |
//! |-----|---------|
//! | `output` | computed output path |
//! | `id` | sanitized output-relative path without extension |
//! | `parent` | sanitized source folder |
//! | `order` | filename order prefix, else 0 |
//! | `paginate` | 0 (no pagination) |
//! | `title` | decoded file name without extension |
//!
//! `output`, `id`, `parent`, `order` and `paginate` are consumed and do not
//! appear in [`Document::metadata`]; `title` stays there for templates.

use crate::config::{Author, LoadOptions};
use crate::frontmatter::{ParseError, ParsedSource};
use crate::naming::{self, DecodeError, KnownExtensions};
use crate::route::{self, split_folder};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Free-form metadata passed through to rendering.
pub type Metadata = BTreeMap<String, Value>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("metadata `{key}` has an unusable value: {value}")]
    InvalidMetadata { key: &'static str, value: Value },
}

/// One loaded content file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Absolute path of the source file.
    pub source_path: PathBuf,
    /// Source path below the content root, forward slashes.
    pub relative_source_path: String,
    pub id: String,
    /// Empty for documents at the root.
    pub parent_id: String,
    /// Output path relative to the output root.
    pub output_path: PathBuf,
    /// `output_path` under the configured output root.
    pub absolute_output_path: PathBuf,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    pub order: i32,
    pub draft: bool,
    /// Render extensions stripped from the file name, outermost first.
    pub extensions_for_rendering: Vec<String>,
    /// Page size; 0 means no pagination.
    pub paginate: u32,
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip)]
    pub source_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl Document {
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    /// Sort key for listing: `(order, date, id)`, undated first.
    pub fn sort_key(&self) -> (i32, Option<NaiveDateTime>, &str) {
        (self.order, self.date, &self.id)
    }
}

/// Sort documents by `(order, date, id)`.
pub fn sort_documents(documents: &mut [Document]) {
    documents.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Documents that would be written to the same output path, grouped by path.
pub fn find_output_collisions(documents: &[Document]) -> Vec<(PathBuf, Vec<&Document>)> {
    let mut by_output: BTreeMap<&Path, Vec<&Document>> = BTreeMap::new();
    for doc in documents {
        by_output.entry(doc.output_path.as_path()).or_default().push(doc);
    }
    by_output
        .into_iter()
        .filter(|(_, docs)| docs.len() > 1)
        .map(|(path, docs)| (path.to_path_buf(), docs))
        .collect()
}

/// Everything the builder needs that is shared by a whole batch.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub known_extensions: &'a KnownExtensions,
    pub options: LoadOptions,
    pub base_url: &'a str,
    pub output_root: &'a Path,
    /// Documents dated after this instant are drafts.
    pub now: NaiveDateTime,
    pub author: Option<&'a Author>,
}

/// Recognized front-matter keys, read into typed fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataOverrides {
    pub output: Option<String>,
    pub id: Option<String>,
    pub parent: Option<String>,
    pub order: Option<i32>,
    pub paginate: Option<u32>,
}

impl MetadataOverrides {
    /// Split a metadata map into the recognized overrides and the leftover map.
    ///
    /// Recognized keys match case-insensitively; `title` is kept under its
    /// lowercase name.
    pub fn split(metadata: Metadata) -> Result<(Self, Metadata), DocumentError> {
        let mut overrides = Self::default();
        let mut rest = Metadata::new();
        for (key, value) in metadata {
            match key.to_ascii_lowercase().as_str() {
                "output" => overrides.output = Some(string_value("output", value)?),
                "id" => overrides.id = Some(string_value("id", value)?),
                "parent" => overrides.parent = Some(string_value("parent", value)?),
                "order" => overrides.order = Some(integer_value("order", value)?),
                "paginate" => overrides.paginate = Some(integer_value("paginate", value)?),
                "title" => {
                    rest.insert("title".to_string(), value);
                }
                _ => {
                    rest.insert(key, value);
                }
            }
        }
        Ok((overrides, rest))
    }
}

fn string_value(key: &'static str, value: Value) -> Result<String, DocumentError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        value => Err(DocumentError::InvalidMetadata { key, value }),
    }
}

fn integer_value<T: TryFrom<i64>>(key: &'static str, value: Value) -> Result<T, DocumentError> {
    let parsed = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| T::try_from(n).ok())
        .ok_or(DocumentError::InvalidMetadata { key, value })
}

/// Build the document for one source file.
///
/// `relative_path` is the source path below the content root with forward
/// slashes, e.g. `blog/2023-5-14-hello.html.md`.
pub fn build_document(
    source_path: PathBuf,
    relative_path: &str,
    parsed: ParsedSource,
    ctx: &BuildContext<'_>,
) -> Result<Document, DocumentError> {
    let (overrides, mut metadata) = MetadataOverrides::split(parsed.metadata)?;

    let (folder, file_name) = split_folder(relative_path);
    let decoded = naming::decode_file_name(file_name, ctx.known_extensions, ctx.options, parsed.date)?;

    let route = match &overrides.output {
        Some(output) => route::route_from_override(output, ctx.options, ctx.base_url),
        None => route::compose_route(folder, &decoded.name, decoded.date, ctx.options, ctx.base_url),
    };

    metadata
        .entry("title".to_string())
        .or_insert_with(|| Value::String(naming::file_stem(&decoded.name).to_string()));

    let draft = parsed.draft || decoded.date.is_some_and(|date| date > ctx.now);
    let absolute_output_path = ctx.output_root.join(&route.output_path);

    Ok(Document {
        source_path,
        relative_source_path: relative_path.to_string(),
        id: overrides.id.unwrap_or(route.id),
        parent_id: overrides.parent.unwrap_or(route.parent_id),
        output_path: route.output_path,
        absolute_output_path,
        url: route.url,
        date: decoded.date,
        order: overrides.order.unwrap_or(decoded.order),
        draft,
        extensions_for_rendering: decoded.extensions,
        paginate: overrides.paginate.unwrap_or(0),
        metadata,
        summary: parsed.summary,
        source_content: parsed.content,
        author: ctx.author.cloned(),
    })
}
