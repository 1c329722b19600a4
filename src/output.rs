//! CLI output formatting.
//!
//! Output is information-first: each document leads with its position and
//! title, followed by where it goes. Source paths, URLs, dates and render
//! extensions are indented context lines.
//!
//! ```text
//! Documents
//! 001 intro → guide/intro
//!     Source: guide/01.intro.md
//!     Url: /guide/intro
//!     Order: 1
//!     Render: md
//! 002 Hello World → blog/2023/5/14/hello-world/index.html
//!     Source: blog/2023-5-14-Hello World.html.md
//!     Url: /blog/2023/5/14/hello-world/
//!     Date: 2023-05-14 00:00
//!     Render: md
//!
//! Loaded 2 documents
//! ```
//!
//! Each `format_*` function returns lines and does no I/O; the `print_*`
//! wrappers write them to stdout.

use crate::document::Document;
use std::path::PathBuf;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Header line plus context lines for one document.
fn document_lines(index: usize, doc: &Document) -> Vec<String> {
    let title = doc.title().unwrap_or(&doc.id);
    let mut lines = vec![format!(
        "{} {} → {}",
        format_index(index),
        title,
        doc.output_path.display()
    )];

    let ctx = indent(1);
    lines.push(format!("{ctx}Source: {}", doc.relative_source_path));
    lines.push(format!("{ctx}Url: {}", doc.url));
    if let Some(date) = doc.date {
        lines.push(format!("{ctx}Date: {}", date.format("%Y-%m-%d %H:%M")));
    }
    if doc.order != 0 {
        lines.push(format!("{ctx}Order: {}", doc.order));
    }
    if !doc.extensions_for_rendering.is_empty() {
        lines.push(format!("{ctx}Render: {}", doc.extensions_for_rendering.join(", ")));
    }
    if doc.paginate > 0 {
        lines.push(format!("{ctx}Paginate: {}", doc.paginate));
    }
    if doc.draft {
        lines.push(format!("{ctx}Draft"));
    }
    lines
}

/// Format the loaded documents in the order given.
pub fn format_load_output(documents: &[Document]) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    for (i, doc) in documents.iter().enumerate() {
        lines.extend(document_lines(i + 1, doc));
    }

    let drafts = documents.iter().filter(|d| d.draft).count();
    lines.push(String::new());
    if drafts > 0 {
        lines.push(format!(
            "Loaded {} ({})",
            plural(documents.len(), "document"),
            plural(drafts, "draft")
        ));
    } else {
        lines.push(format!("Loaded {}", plural(documents.len(), "document")));
    }
    lines
}

pub fn print_load_output(documents: &[Document]) {
    for line in format_load_output(documents) {
        println!("{}", line);
    }
}

/// Format output-path collisions found by `check`.
///
/// ```text
/// Output collisions
/// about/index.html
///     about.html.md
///     about/index.html
/// ```
pub fn format_collisions(collisions: &[(PathBuf, Vec<&Document>)]) -> Vec<String> {
    let mut lines = vec!["Output collisions".to_string()];
    for (path, docs) in collisions {
        lines.push(path.display().to_string());
        for doc in docs {
            lines.push(format!("{}{}", indent(1), doc.relative_source_path));
        }
    }
    lines
}

pub fn print_collisions(collisions: &[(PathBuf, Vec<&Document>)]) {
    for line in format_collisions(collisions) {
        println!("{}", line);
    }
}
