//! Centralized permalink parsing and output-path mapping.
//!
//! Every document declares a `permalink` in its front matter: an absolute,
//! site-rooted path that identifies its output page. This module is the one
//! place that decides what counts as a valid permalink and where a permalink
//! lands in the output tree.
//!
//! ## Mapping
//!
//! - `/` → `index.html` (the document becomes the site root)
//! - `/about.html` → `about.html` (explicit file permalinks kept as-is)
//! - `/tips/1` → `tips/1/index.html` (directory-style, the default)
//!
//! Directory-style permalinks are linked with a trailing slash (`/tips/1/`)
//! so plain file servers resolve them without redirects.

use std::path::PathBuf;

/// Normalize a raw permalink value from front matter.
///
/// Returns `None` if the value is not a usable site-rooted path:
/// - empty or not starting with `/`
/// - contains whitespace
/// - contains empty, `.` or `..` segments
///
/// A trailing slash is stripped (`/tips/1/` and `/tips/1` are the same
/// permalink); the root `/` is kept as-is.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('/') || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    if trimmed == "/" {
        return Some("/".to_string());
    }
    let stripped = trimmed.strip_suffix('/').unwrap_or(trimmed);
    for segment in stripped[1..].split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return None;
        }
    }
    Some(stripped.to_string())
}

/// Map a normalized permalink to its output path, relative to the output
/// directory.
pub fn output_path(permalink: &str) -> PathBuf {
    if permalink == "/" {
        return PathBuf::from("index.html");
    }
    let rel = &permalink[1..];
    if rel.ends_with(".html") {
        PathBuf::from(rel)
    } else {
        PathBuf::from(rel).join("index.html")
    }
}

/// The href to use when linking to a normalized permalink.
///
/// Directory-style permalinks get a trailing slash; file permalinks and the
/// root are used verbatim.
pub fn href(permalink: &str) -> String {
    if permalink == "/" || permalink.ends_with(".html") {
        permalink.to_string()
    } else {
        format!("{permalink}/")
    }
}
