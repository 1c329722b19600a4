//! URL-safe identifiers and path segments.
//!
//! Two independent transforms, both lowercase their output and never fail:
//!
//! - [`sanitize_entry_id`] turns a file name into an identifier token
//!   (`"My First Post.html"` → `"my-first-post.html"`).
//! - [`sanitize_path`] turns a folder path into URL-safe segments while
//!   keeping the separators (`"Travel Notes/Japan"` → `"travel-notes/japan"`).
//!
//! Both are idempotent: sanitizing an already sanitized string returns it
//! unchanged.

use regex::Regex;
use std::sync::LazyLock;

static ENTRY_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s\-.]+").unwrap());

static DOT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static PATH_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-\\/]+").unwrap());

/// Sanitize a file name into an entry identifier.
///
/// - Removes everything except word characters, whitespace, dashes and dots
/// - Removes runs of two or more dots (no `..` traversal survives)
/// - Collapses whitespace runs into a single space
/// - Trims leading/trailing spaces and dots
/// - Replaces spaces with dashes and lowercases
pub fn sanitize_entry_id(id: &str) -> String {
    if id.trim().is_empty() {
        return String::new();
    }

    let id = ENTRY_DISALLOWED.replace_all(id, "");
    let id = DOT_RUNS.replace_all(&id, "");
    let id = WHITESPACE_RUNS.replace_all(&id, " ");
    id.trim_matches(|c| c == ' ' || c == '.')
        .replace(' ', "-")
        .to_lowercase()
}

/// Sanitize a relative folder path.
///
/// Every run of characters other than word characters, dashes and path
/// separators becomes a single dash; leading/trailing dashes are trimmed.
pub fn sanitize_path(path: &str) -> String {
    if path.trim().is_empty() {
        return String::new();
    }

    PATH_DISALLOWED
        .replace_all(path, "-")
        .trim_matches('-')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_lowercases_and_dashes_spaces() {
        assert_eq!(sanitize_entry_id("My First Post"), "my-first-post");
    }

    #[test]
    fn entry_id_keeps_extension_dot() {
        assert_eq!(sanitize_entry_id("About Me.html"), "about-me.html");
    }

    #[test]
    fn entry_id_strips_punctuation() {
        assert_eq!(sanitize_entry_id("What's new? (2023)!"), "whats-new-2023");
    }

    #[test]
    fn entry_id_removes_dot_runs() {
        assert_eq!(sanitize_entry_id("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_entry_id("a...b"), "ab");
    }

    #[test]
    fn entry_id_dot_run_created_by_removal() {
        // "(" goes first, which glues the dots together; they must still go.
        assert_eq!(sanitize_entry_id("a.(.b"), "ab");
    }

    #[test]
    fn entry_id_collapses_whitespace() {
        assert_eq!(sanitize_entry_id("hello    big\tworld"), "hello-big-world");
    }

    #[test]
    fn entry_id_trims_spaces_and_dots() {
        assert_eq!(sanitize_entry_id("  .hidden name.  "), "hidden-name");
    }

    #[test]
    fn entry_id_keeps_underscores_and_unicode_letters() {
        assert_eq!(sanitize_entry_id("Über_Café"), "über_café");
    }

    #[test]
    fn entry_id_empty_and_whitespace() {
        assert_eq!(sanitize_entry_id(""), "");
        assert_eq!(sanitize_entry_id("   \t "), "");
        assert_eq!(sanitize_entry_id("?!"), "");
    }

    #[test]
    fn path_replaces_runs_with_single_dash() {
        assert_eq!(sanitize_path("Travel Notes/Japan & Korea"), "travel-notes/japan-korea");
    }

    #[test]
    fn path_keeps_separators() {
        assert_eq!(sanitize_path("blog/2023/5/14"), "blog/2023/5/14");
        assert_eq!(sanitize_path(r"blog\drafts"), r"blog\drafts");
    }

    #[test]
    fn path_trims_dashes() {
        assert_eq!(sanitize_path("(notes)"), "notes");
        assert_eq!(sanitize_path("v1.2"), "v1-2");
    }

    #[test]
    fn path_empty_and_whitespace() {
        assert_eq!(sanitize_path(""), "");
        assert_eq!(sanitize_path("    "), "");
    }

    #[test]
    fn entry_id_dots_split_by_whitespace_after_removal() {
        // "(" goes, leaving ". ." which is not a dot run, then the whitespace collapses
        let once = sanitize_entry_id("a .(. b");
        assert_eq!(once, "a-b");
        assert_eq!(sanitize_entry_id(&once), once);

        let once = sanitize_entry_id("x . . y");
        assert_eq!(once, "x-.-.-y");
        assert_eq!(sanitize_entry_id(&once), once);
    }

    #[test]
    fn path_with_punctuation_only_segment() {
        let once = sanitize_path("a/!!!/b");
        assert_eq!(once, "a/-/b");
        assert_eq!(sanitize_path(&once), once);

        assert_eq!(sanitize_path("!!!"), "");
        assert_eq!(sanitize_path("/!!!/"), "/-/");
    }

    #[test]
    fn both_transforms_are_idempotent() {
        let samples = [
            "My First Post.html",
            "  ..weird//path  name.. ",
            "a.(.b",
            "Travel Notes/Japan & Korea",
            "../../etc/passwd",
            "İstanbul Gezisi",
            "tab\tand  spaces",
            "-dash-edges-",
            "a .(. b",
            "..(..)..",
            ". (. x",
            "a/!!!/b",
            "!!!/???",
            "/leading/and/trailing/",
            "",
            "   ",
        ];
        for s in samples {
            let once = sanitize_entry_id(s);
            assert_eq!(sanitize_entry_id(&once), once, "entry id not idempotent for {s:?}");
            let once = sanitize_path(s);
            assert_eq!(sanitize_path(&once), once, "path not idempotent for {s:?}");
        }
    }
}
