//! Front-matter parsing.
//!
//! The loader only needs four things from a content file: its metadata map,
//! its body, an optional explicit date and a draft flag. [`FrontMatterParser`]
//! is that contract; [`YamlFrontMatter`] is the bundled implementation for
//! files shaped like:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2023-05-14 09:30
//! draft: true
//! tags: [intro]
//! ---
//! Short summary.
//! ===
//! The rest of the post.
//! ```
//!
//! `date` and `draft` are taken out of the metadata map; every other key is
//! passed through untouched.

use crate::document::Metadata;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("front matter YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("front matter is not closed with `---`")]
    Unterminated,
    #[error("invalid front matter date: {0}")]
    InvalidDate(String),
    #[error("front matter `draft` must be a boolean, got {0}")]
    InvalidDraft(serde_json::Value),
}

/// What a parser hands back for one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSource {
    pub metadata: Metadata,
    /// Raw body after the front matter.
    pub content: String,
    /// Body text before the summary marker line, if the marker is present.
    pub summary: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub draft: bool,
}

/// Parses a content file into metadata and body.
///
/// Implementations are called from many loader threads at once.
pub trait FrontMatterParser: Sync {
    fn parse(&self, path: &Path, summary_marker: &str) -> Result<ParsedSource, ParseError>;
}

/// YAML front matter between `---` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontMatter;

impl FrontMatterParser for YamlFrontMatter {
    /// Files that are not valid UTF-8 (images, fonts) are read lossily and
    /// load as body-only documents.
    fn parse(&self, path: &Path, summary_marker: &str) -> Result<ParsedSource, ParseError> {
        let text = match String::from_utf8(std::fs::read(path)?) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("{} is not UTF-8, reading lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        parse_source(&text, summary_marker)
    }
}

/// Parse file text already in memory.
pub fn parse_source(text: &str, summary_marker: &str) -> Result<ParsedSource, ParseError> {
    let (front_matter, body) = split_front_matter(text)?;

    let mut metadata: Metadata = match front_matter {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml_ng::from_str(yaml)?,
        _ => Metadata::new(),
    };

    let date = match take_key(&mut metadata, "date") {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(parse_date(&s)?),
        Some(other) => return Err(ParseError::InvalidDate(other.to_string())),
    };

    let draft = match take_key(&mut metadata, "draft") {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => b,
        Some(other) => return Err(ParseError::InvalidDraft(other)),
    };

    Ok(ParsedSource {
        metadata,
        content: body.to_string(),
        summary: extract_summary(body, summary_marker),
        date,
        draft,
    })
}

/// Remove `key` from the map, matching its name case-insensitively.
fn take_key(metadata: &mut Metadata, key: &str) -> Option<serde_json::Value> {
    let found = metadata.keys().find(|k| k.eq_ignore_ascii_case(key))?.clone();
    metadata.remove(&found)
}

/// Split leading `---` front matter from the body.
fn split_front_matter(text: &str) -> Result<(Option<&str>, &str), ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return Ok((None, text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(ParseError::Unterminated)
}

fn extract_summary(body: &str, marker: &str) -> Option<String> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim() == marker {
            let summary = body[..offset].trim();
            return (!summary.is_empty()).then(|| summary.to_string());
        }
        offset += line.len();
    }
    None
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a front-matter date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` (space or `T`), and
/// RFC 3339 timestamps, which are converted to local time.
pub fn parse_date(text: &str) -> Result<NaiveDateTime, ParseError> {
    let text = text.trim();
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ParseError::InvalidDate(text.to_string()))
}
