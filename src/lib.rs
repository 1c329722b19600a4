//! # Quire
//!
//! The content-ingestion stage of a static site generator. Quire walks a
//! content directory and turns every file into a [`document::Document`]: a
//! record that knows its stable id, its parent, where it will be written,
//! the URL it will be served at, its date and order, and the metadata left
//! for templates.
//!
//! # The Filename Is the Data
//!
//! Most of what a document needs is encoded in its file name:
//!
//! ```text
//! blog/2023-5-14-My Post.html.md
//! │    │         │       │    └─ render extension (stripped, recorded)
//! │    │         │       └────── output extension
//! │    │         └────────────── name
//! │    └──────────────────────── date prefix
//! └───────────────────────────── parent folder
//!
//! → id        blog/2023/5/14/my-post
//! → output    blog/2023/5/14/my-post/index.html
//! → url       /blog/2023/5/14/my-post/
//! ```
//!
//! Pages without a date can carry an order prefix instead (`03.intro.md` or
//! `03-intro.md`). Front matter overrides any computed value.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Decodes file names: render extensions, date and order prefixes |
//! | [`sanitize`] | Turns names and folders into URL-safe identifiers |
//! | [`route`] | Composes id, parent id, output path and URL |
//! | [`frontmatter`] | The parser contract and the bundled YAML front-matter parser |
//! | [`document`] | The document record, metadata overrides, ordering, collision checks |
//! | [`load`] | Walks the content root and builds every document in parallel |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Routing Rules
//!
//! Routing is a fixed sequence of steps, each behind a flag in the
//! `[loading]` config table:
//!
//! 1. The parent id is the path-sanitized source folder.
//! 2. A decoded date is inserted as `year/month/day` folders (`insert_date_into_path`).
//! 3. The name and folder are sanitized (`sanitize_path`).
//! 4. The id is the folder joined with the name minus its extension.
//! 5. An `.html` file other than `index.html` becomes `name/index.html`
//!    and its URL ends in `/` (`clean_urls`).
//!
//! Id and parent id are fixed before step 5, so turning clean URLs on or
//! off never changes how documents refer to each other.
//!
//! # Drafts
//!
//! A document is a draft when its front matter says so or when its date is
//! after the moment the batch started. Every document in a batch is
//! compared against the same instant.

pub mod config;
pub mod document;
pub mod frontmatter;
pub mod load;
pub mod naming;
pub mod output;
pub mod route;
pub mod sanitize;

#[cfg(test)]
pub(crate) mod test_helpers;
