//! Output path and URL composition.
//!
//! Given the (decoded) folder and file name of a document, works out where
//! its rendered output goes and how it is addressed:
//!
//! ```text
//! source            blog/2023-5-14-hello.html.md
//! decoded           folder "blog", name "hello.html", dated 2023-05-14
//! date folders      blog/2023/5/14
//! clean URL         blog/2023/5/14/hello/  +  index.html
//! id                blog/2023/5/14/hello
//! parent id         blog
//! url               /blog/2023/5/14/hello/
//! ```
//!
//! Folders are handled as forward-slash strings; only the final output path
//! is turned into a platform [`PathBuf`].

use crate::config::LoadOptions;
use crate::naming::{file_extension, file_stem};
use crate::sanitize::{sanitize_entry_id, sanitize_path};
use chrono::{Datelike, NaiveDateTime};
use std::path::PathBuf;

const INDEX_FILE: &str = "index.html";

/// Where a document is written and how it is addressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: String,
    pub parent_id: String,
    pub output_path: PathBuf,
    pub url: String,
}

/// Compose the route for a document at `folder/name`.
///
/// `folder` is the source folder relative to the content root (forward
/// slashes, possibly empty); `name` is the decoded file name.
pub fn compose_route(
    folder: &str,
    name: &str,
    date: Option<NaiveDateTime>,
    options: LoadOptions,
    base_url: &str,
) -> Route {
    let parent_id = trim_separators(&sanitize_path(folder)).to_string();

    let mut folder = folder.to_string();
    if options.insert_date_into_path
        && let Some(date) = date
    {
        let date_folder = format!("{}/{}/{}", date.year(), date.month(), date.day());
        folder = join(&folder, &date_folder);
    }

    let mut name = sanitize_entry_id(name);
    if options.sanitize_path {
        folder = sanitize_path(&folder);
    }

    let id = trim_separators(&join(&folder, file_stem(&name))).to_string();

    if options.clean_urls
        && !name.eq_ignore_ascii_case(INDEX_FILE)
        && file_extension(&name).is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
    {
        folder = format!("{}/", join(&folder, file_stem(&name)));
        name.clear();
    }

    let output_name = if name.is_empty() { INDEX_FILE } else { name.as_str() };
    Route {
        id,
        parent_id,
        output_path: to_path(&join(&folder, output_name)),
        url: format!("{}{}", ensure_trailing_slash(base_url), join(&folder, &name)),
    }
}

/// Route for a document whose front matter set `output` explicitly.
///
/// The override is used verbatim for the output path and URL; id and parent
/// are derived from its folder and file name. An override naming a folder
/// (empty, or ending in a separator) writes that folder's `index.html` and
/// is addressed as `folder/`. `.` and `..` segments are dropped, so an
/// override never leaves the output root.
pub fn route_from_override(output: &str, options: LoadOptions, base_url: &str) -> Route {
    let output = output.trim().replace('\\', "/");
    let is_folder = output.is_empty() || output.ends_with('/');
    let segments: Vec<&str> = output
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect();

    let (folder, name) = match segments.split_last() {
        Some((name, folder)) if !is_folder => (folder.join("/"), *name),
        _ => (segments.join("/"), INDEX_FILE),
    };

    let id_folder = if options.sanitize_path {
        sanitize_path(&folder)
    } else {
        folder.clone()
    };
    let id = join(&id_folder, &sanitize_entry_id(file_stem(name)));

    let url_path = match (is_folder, folder.is_empty()) {
        (true, true) => String::new(),
        (true, false) => format!("{folder}/"),
        (false, _) => join(&folder, name),
    };

    Route {
        id: trim_separators(&id).to_string(),
        parent_id: trim_separators(&sanitize_path(&folder)).to_string(),
        output_path: to_path(&join(&folder, name)),
        url: format!("{}{}", ensure_trailing_slash(base_url), url_path),
    }
}

/// Split a forward-slash relative path into `(folder, file name)`.
pub fn split_folder(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else if name.is_empty() || folder.ends_with('/') {
        format!("{folder}{name}")
    } else {
        format!("{folder}/{name}")
    }
}

fn trim_separators(path: &str) -> &str {
    path.trim_matches(|c| c == '/' || c == '\\')
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

fn to_path(relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        Some(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    fn options() -> LoadOptions {
        LoadOptions::default()
    }

    #[test]
    fn clean_url_rewrites_html() {
        let route = compose_route("section", "about.html", None, options(), "/");
        assert_eq!(route.output_path, Path::new("section/about/index.html"));
        assert_eq!(route.url, "/section/about/");
        assert_eq!(route.id, "section/about");
        assert_eq!(route.parent_id, "section");
    }

    #[test]
    fn index_html_is_not_rewritten() {
        let route = compose_route("section", "index.html", None, options(), "/");
        assert_eq!(route.output_path, Path::new("section/index.html"));
        assert_eq!(route.url, "/section/index.html");
        assert_eq!(route.id, "section/index");
    }

    #[test]
    fn index_check_is_case_insensitive() {
        let route = compose_route("", "INDEX.HTML", None, options(), "/");
        assert_eq!(route.output_path, Path::new("index.html"));
    }

    #[test]
    fn non_html_is_not_rewritten() {
        let route = compose_route("", "feed.xml", None, options(), "/");
        assert_eq!(route.output_path, Path::new("feed.xml"));
        assert_eq!(route.url, "/feed.xml");
        assert_eq!(route.id, "feed");
        assert_eq!(route.parent_id, "");
    }

    #[test]
    fn clean_urls_disabled_keeps_file_name() {
        let options = LoadOptions {
            clean_urls: false,
            ..options()
        };
        let route = compose_route("section", "about.html", None, options, "/");
        assert_eq!(route.output_path, Path::new("section/about.html"));
        assert_eq!(route.url, "/section/about.html");
        assert_eq!(route.id, "section/about");
    }

    #[test]
    fn date_folders_inserted_unpadded() {
        let route = compose_route("blog", "hello.html", date(2023, 5, 4), options(), "/");
        assert_eq!(route.output_path, Path::new("blog/2023/5/4/hello/index.html"));
        assert_eq!(route.url, "/blog/2023/5/4/hello/");
        assert_eq!(route.id, "blog/2023/5/4/hello");
        // parent is taken before the date folders
        assert_eq!(route.parent_id, "blog");
    }

    #[test]
    fn date_folders_can_be_disabled() {
        let options = LoadOptions {
            insert_date_into_path: false,
            ..options()
        };
        let route = compose_route("blog", "hello.html", date(2023, 5, 4), options, "/");
        assert_eq!(route.output_path, Path::new("blog/hello/index.html"));
    }

    #[test]
    fn folder_and_name_are_sanitized() {
        let route = compose_route("Travel Notes/Japan!", "My Trip.html", None, options(), "/");
        assert_eq!(route.output_path, Path::new("travel-notes/japan/my-trip/index.html"));
        assert_eq!(route.url, "/travel-notes/japan/my-trip/");
        assert_eq!(route.id, "travel-notes/japan/my-trip");
        assert_eq!(route.parent_id, "travel-notes/japan");
    }

    #[test]
    fn unsanitized_folder_when_disabled() {
        let options = LoadOptions {
            sanitize_path: false,
            ..options()
        };
        let route = compose_route("Notes", "a.html", None, options, "/");
        assert_eq!(route.output_path, Path::new("Notes/a/index.html"));
        // parent id is always sanitized
        assert_eq!(route.parent_id, "notes");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let route = compose_route("docs", "guide.html", None, options(), "https://example.com/site");
        assert_eq!(route.url, "https://example.com/site/docs/guide/");
    }

    #[test]
    fn empty_name_falls_back_to_index() {
        let route = compose_route("notes", "", None, options(), "/");
        assert_eq!(route.output_path, Path::new("notes/index.html"));
        assert_eq!(route.url, "/notes");
        assert_eq!(route.id, "notes");
    }

    #[test]
    fn override_is_used_verbatim() {
        let route = route_from_override("/feeds/Atom.xml", options(), "/");
        assert_eq!(route.output_path, Path::new("feeds/Atom.xml"));
        assert_eq!(route.url, "/feeds/Atom.xml");
        assert_eq!(route.id, "feeds/atom");
        assert_eq!(route.parent_id, "feeds");
    }

    #[test]
    fn override_naming_a_folder_writes_its_index() {
        let route = route_from_override("section/", options(), "/");
        assert_eq!(route.output_path, Path::new("section/index.html"));
        assert_eq!(route.url, "/section/");
        assert_eq!(route.id, "section/index");
        assert_eq!(route.parent_id, "section");
    }

    #[test]
    fn empty_override_writes_root_index() {
        for output in ["", "/", "  "] {
            let route = route_from_override(output, options(), "/site");
            assert_eq!(route.output_path, Path::new("index.html"), "{output:?}");
            assert_eq!(route.url, "/site/", "{output:?}");
            assert_eq!(route.id, "index", "{output:?}");
            assert_eq!(route.parent_id, "", "{output:?}");
        }
    }

    #[test]
    fn override_cannot_leave_output_root() {
        let route = route_from_override("../../../etc/escape.html", options(), "/");
        assert_eq!(route.output_path, Path::new("etc/escape.html"));
        assert_eq!(route.url, "/etc/escape.html");
        assert_eq!(route.id, "etc/escape");

        let route = route_from_override("a/./b/../c.html", options(), "/");
        assert_eq!(route.output_path, Path::new("a/b/c.html"));
        assert_eq!(route.url, "/a/b/c.html");

        let route = route_from_override("..", options(), "/");
        assert_eq!(route.output_path, Path::new("index.html"));
        assert!(route.output_path.is_relative());
    }

    #[test]
    fn override_normalizes_backslashes() {
        let route = route_from_override(r"api\v1\index.html", options(), "/");
        assert_eq!(route.output_path, Path::new("api/v1/index.html"));
        assert_eq!(route.url, "/api/v1/index.html");
        assert_eq!(route.id, "api/v1/index");
    }

    #[test]
    fn split_folder_cases() {
        assert_eq!(split_folder("a/b/c.md"), ("a/b", "c.md"));
        assert_eq!(split_folder("c.md"), ("", "c.md"));
    }
}
