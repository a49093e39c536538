//! CLI output formatting.
//!
//! Output is information-centric, not file-centric: the primary display for
//! every document is its title and position, with source paths and
//! permalinks as indented context lines. Each stage has a `format_*`
//! function (returns `Vec<String>`, pure, testable) and a `print_*` wrapper
//! that writes to stdout.
//!
//! ## Scan
//!
//! ```text
//! Documents
//! 001 Tip of the Week #1: string views
//!     Source: tips/1.md
//!     Permalink: /tips/1 (order 1)
//!
//! Drafts
//! 001 Tip of the Week #9: unfinished
//!     Source: tips/drafts/9.md
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Tip of the Week #1: string views → tips/1/index.html
//! 002 About → about.html
//! Index → index.html
//! Generated 3 pages
//! ```

use crate::scan::Manifest;
use crate::site::RenderedPage;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format an entity header: positional index + title.
fn entity_header(index: usize, title: &str) -> String {
    format!("{} {}", format_index(index), title)
}

pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    let published: Vec<_> = manifest.documents.iter().filter(|d| d.meta.published).collect();
    let drafts: Vec<_> = manifest.documents.iter().filter(|d| !d.meta.published).collect();

    lines.push("Documents".to_string());
    for (idx, doc) in published.iter().enumerate() {
        lines.push(entity_header(idx + 1, &doc.meta.title));
        lines.push(format!("    Source: {}", doc.source.display()));
        match doc.meta.order {
            Some(order) => {
                lines.push(format!("    Permalink: {} (order {})", doc.meta.permalink, order))
            }
            None => lines.push(format!("    Permalink: {}", doc.meta.permalink)),
        }
    }
    if published.is_empty() {
        lines.push("    (none)".to_string());
    }

    if !drafts.is_empty() {
        lines.push(String::new());
        lines.push("Drafts".to_string());
        for (idx, doc) in drafts.iter().enumerate() {
            lines.push(entity_header(idx + 1, &doc.meta.title));
            lines.push(format!("    Source: {}", doc.source.display()));
        }
    }

    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{line}");
    }
}

pub fn format_build_output(pages: &[RenderedPage]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut position = 0;
    for page in pages {
        match &page.source {
            Some(_) => {
                position += 1;
                lines.push(format!(
                    "{} → {}",
                    entity_header(position, &page.title),
                    page.output_path.display()
                ));
            }
            None => lines.push(format!("Index → {}", page.output_path.display())),
        }
    }
    let noun = if pages.len() == 1 { "page" } else { "pages" };
    lines.push(format!("Generated {} {}", pages.len(), noun));
    lines
}

pub fn print_build_output(pages: &[RenderedPage]) {
    for line in format_build_output(pages) {
        println!("{line}");
    }
}
