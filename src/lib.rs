//! # tipsmith
//!
//! A minimal static site generator for tip-of-the-week article collections.
//! Each article is a text file with a `---` delimited front-matter header
//! (title, permalink, order, layout) followed by a markdown body; tipsmith
//! turns the corpus into a tree of static HTML pages linked by a navigation
//! index.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  Manifest     (files → parsed documents)
//! 2. Render    document  →  HTML string  (layout template + markdown body)
//! 3. Assemble  manifest  →  dist/        (nav index, permalink routing, output tree)
//! ```
//!
//! The stages are independent: the scan manifest is inspectable JSON
//! (`tipsmith scan`), rendering is a pure function from document to HTML,
//! and assembly renders every page in memory before the first write — a
//! failing run leaves zero output files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the content directory, produces the manifest |
//! | [`document`] | Front-matter parsing: one file → one typed `Document` |
//! | [`render`] | Stage 2 — named layout templates, markdown → HTML |
//! | [`site`] | Stage 3 — publish filtering, ordering, permalink routing, output |
//! | [`config`] | `config.toml` loading and validation |
//! | [`permalink`] | Permalink normalization and output-path mapping |
//! | [`types`] | Shared types (`NavItem`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Front Matter Over Filename Conventions
//!
//! All document identity lives in the header: `permalink` is the stable
//! output path, `order` the navigation position, `published` the draft
//! flag. Directory layout carries no meaning, so a corpus can be
//! reorganized freely without breaking a single URL.
//!
//! ## Maud Over Template Engines
//!
//! Built-in layouts are [Maud](https://maud.lambda.xyz/) compile-time HTML
//! macros: malformed HTML is a build error, interpolation is auto-escaped,
//! and there is no template directory to ship or get out of sync. Sites
//! that need custom markup can still drop `{{ placeholder }}` substitution
//! templates in a `--templates` directory; they override the built-ins by
//! name.
//!
//! ## Batch, Single-Pass, Fail-Fast
//!
//! A run is a deterministic batch transformation over a fixed input set:
//! load everything, render everything, write everything. Every error is
//! fatal and carries the offending source path and field, so the fix is
//! always an edit to a named file. There is no cache to invalidate and no
//! partial-success state to reason about.

pub mod config;
pub mod document;
pub mod output;
pub mod permalink;
pub mod render;
pub mod scan;
pub mod site;
pub mod types;
