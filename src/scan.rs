//! Source traversal and manifest generation.
//!
//! Stage 1 of the tipsmith build pipeline. Walks the content directory,
//! parses every content file through [`crate::document`], loads the site
//! config, and produces a [`Manifest`] that the assembler consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                      # Content root
//! ├── config.toml               # Site configuration (optional)
//! ├── tips/
//! │   ├── 1.md                  # One document per file
//! │   ├── 2.md
//! │   └── drafts/
//! │       └── 99.md             # published: false until ready
//! └── about.md
//! ```
//!
//! Directory layout carries no meaning beyond organization: ordering,
//! navigation membership, and output paths all come from front matter.
//!
//! ## Determinism
//!
//! Files are visited in sorted path order, so "encounter order" (the
//! tie-breaker for unordered documents) is stable across runs and machines.

use crate::config::{self, SiteConfig};
use crate::document::{self, Document, DocumentError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Manifest output from the scan stage.
///
/// Serializes to JSON (`tipsmith scan`) so a corpus author can inspect
/// exactly what the loader saw before anything is rendered.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// All documents in encounter (sorted path) order, drafts included.
    pub documents: Vec<Document>,
    pub config: SiteConfig,
}

const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown", "html"];

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let mut documents = Vec::new();
    // depth 0 is the root itself; its name (e.g. a dot-prefixed tempdir)
    // must not trigger the hidden filter.
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_content(entry.path()) {
            continue;
        }
        let source = entry.path().strip_prefix(root).unwrap_or(entry.path());
        documents.push(document::load(entry.path(), source)?);
    }

    Ok(Manifest { documents, config })
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_content(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    CONTENT_EXTENSIONS.contains(&ext.as_str())
}
