//! Site assembly: manifest → rendered output tree.
//!
//! Stage 3 of the tipsmith build pipeline. Takes the scan [`Manifest`] and:
//!
//! 1. **plan** — selects documents (published, or all with `--drafts`),
//!    sorts them by `order` (unordered documents last, stable by encounter
//!    order), builds the navigation index, resolves every permalink to an
//!    output path, and rejects collisions.
//! 2. **build** — renders every page to an in-memory list.
//! 3. **write** — creates the output tree.
//!
//! Rendering completes before the first write, so any failure — a duplicate
//! permalink, an unknown layout, an unreadable file — aborts the run with
//! zero output files. The manifest is taken as an immutable snapshot; no
//! state is shared across pages.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html            # Generated nav listing (unless a document
//! │                         # claims permalink "/")
//! ├── about.html            # permalink: /about.html
//! └── tips/
//!     ├── 1/index.html      # permalink: /tips/1
//!     └── 2/index.html      # permalink: /tips/2
//! ```

use crate::document::Document;
use crate::permalink;
use crate::render::{RenderError, TemplateSet};
use crate::scan::Manifest;
use crate::types::NavItem;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("duplicate permalink {permalink} declared by {first} and {second}")]
    DuplicatePermalink {
        permalink: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Assembly options from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Also render documents with `published: false`. Drafts never appear
    /// in the navigation index either way.
    pub include_drafts: bool,
}

/// The resolved shape of one run: which documents, in which order, at which
/// output paths.
#[derive(Debug)]
pub struct SitePlan<'a> {
    /// Selected documents in final (order, encounter) order.
    pub documents: Vec<&'a Document>,
    /// Navigation index over published documents.
    pub nav: Vec<NavItem>,
    /// Whether to emit the generated root index page.
    pub needs_index: bool,
}

/// One fully rendered page, ready to write.
#[derive(Debug)]
pub struct RenderedPage {
    pub title: String,
    pub permalink: String,
    /// Source document, `None` for the generated index page.
    pub source: Option<PathBuf>,
    /// Output path relative to the output directory.
    pub output_path: PathBuf,
    pub html: String,
}

/// Select, sort, and route documents; build the navigation index.
///
/// Fails with [`SiteError::DuplicatePermalink`] when two selected documents
/// resolve to the same output path (this also catches distinct permalinks
/// like `/a` and `/a/index.html` that collide on disk).
pub fn plan<'a>(manifest: &'a Manifest, options: &BuildOptions) -> Result<SitePlan<'a>, SiteError> {
    let mut documents: Vec<&Document> = manifest
        .documents
        .iter()
        .filter(|d| d.meta.published || options.include_drafts)
        .collect();

    // Stable sort: unordered documents keep their encounter order, after
    // every ordered document.
    documents.sort_by_key(|d| d.meta.order.map(u64::from).unwrap_or(u64::MAX));

    let mut claimed: BTreeMap<PathBuf, &Document> = BTreeMap::new();
    for doc in &documents {
        let output = permalink::output_path(&doc.meta.permalink);
        if let Some(first) = claimed.get(&output) {
            return Err(SiteError::DuplicatePermalink {
                permalink: doc.meta.permalink.clone(),
                first: first.source.clone(),
                second: doc.source.clone(),
            });
        }
        claimed.insert(output, doc);
    }

    let nav = documents
        .iter()
        .filter(|d| d.meta.published)
        .map(|d| NavItem {
            title: d.meta.title.clone(),
            permalink: d.meta.permalink.clone(),
        })
        .collect();

    let needs_index = !claimed.contains_key(Path::new("index.html"));

    Ok(SitePlan {
        documents,
        nav,
        needs_index,
    })
}

/// Render every page of the run into memory. Pure except for template
/// lookup; nothing touches the output directory.
pub fn build(
    manifest: &Manifest,
    templates: &TemplateSet,
    options: &BuildOptions,
) -> Result<Vec<RenderedPage>, SiteError> {
    let plan = plan(manifest, options)?;

    let mut pages = Vec::with_capacity(plan.documents.len() + 1);
    for doc in &plan.documents {
        let html = templates.render_document(doc, &plan.nav, &manifest.config)?;
        pages.push(RenderedPage {
            title: doc.meta.title.clone(),
            permalink: doc.meta.permalink.clone(),
            source: Some(doc.source.clone()),
            output_path: permalink::output_path(&doc.meta.permalink),
            html,
        });
    }

    if plan.needs_index {
        pages.push(RenderedPage {
            title: manifest.config.site.title.clone(),
            permalink: "/".to_string(),
            source: None,
            output_path: PathBuf::from("index.html"),
            html: templates.render_index(&plan.nav, &manifest.config),
        });
    }

    Ok(pages)
}

/// Write rendered pages under the output directory.
pub fn write(pages: &[RenderedPage], output_dir: &Path) -> Result<(), SiteError> {
    for page in pages {
        let path = output_dir.join(&page.output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &page.html)?;
    }
    Ok(())
}

/// Full assembly: render everything, then write everything.
pub fn generate(
    manifest: &Manifest,
    templates: &TemplateSet,
    output_dir: &Path,
    options: &BuildOptions,
) -> Result<Vec<RenderedPage>, SiteError> {
    let pages = build(manifest, templates, options)?;
    write(&pages, output_dir)?;
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::document;
    use std::path::Path;

    fn doc(source: &str, raw: &str) -> Document {
        document::parse(Path::new(source), raw).unwrap()
    }

    fn manifest(documents: Vec<Document>) -> Manifest {
        Manifest {
            documents,
            config: SiteConfig::default(),
        }
    }

    fn tip(source: &str, title: &str, permalink: &str, order: Option<u32>) -> Document {
        let order_line = order.map(|n| format!("order: {n}\n")).unwrap_or_default();
        doc(
            source,
            &format!("---\ntitle: {title}\npermalink: {permalink}\n{order_line}---\nbody\n"),
        )
    }

    #[test]
    fn nav_sorted_by_order() {
        let m = manifest(vec![
            tip("b.md", "Second", "/2", Some(2)),
            tip("a.md", "First", "/1", Some(1)),
        ]);
        let plan = plan(&m, &BuildOptions::default()).unwrap();
        let titles: Vec<&str> = plan.nav.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn unordered_documents_sort_last_in_encounter_order() {
        let m = manifest(vec![
            tip("a.md", "No Order A", "/a", None),
            tip("b.md", "Ordered", "/b", Some(5)),
            tip("c.md", "No Order C", "/c", None),
        ]);
        let plan = plan(&m, &BuildOptions::default()).unwrap();
        let titles: Vec<&str> = plan.nav.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Ordered", "No Order A", "No Order C"]);
    }

    #[test]
    fn unpublished_documents_excluded() {
        let m = manifest(vec![
            tip("a.md", "Live", "/live", Some(1)),
            doc(
                "b.md",
                "---\ntitle: Draft\npermalink: /draft\npublished: false\n---\n",
            ),
        ]);
        let plan = plan(&m, &BuildOptions::default()).unwrap();
        assert_eq!(plan.documents.len(), 1);
        assert_eq!(plan.nav.len(), 1);
        assert_eq!(plan.nav[0].title, "Live");
    }

    #[test]
    fn drafts_rendered_but_not_in_nav_with_flag() {
        let m = manifest(vec![
            tip("a.md", "Live", "/live", Some(1)),
            doc(
                "b.md",
                "---\ntitle: Draft\npermalink: /draft\npublished: false\n---\n",
            ),
        ]);
        let options = BuildOptions {
            include_drafts: true,
        };
        let plan = plan(&m, &options).unwrap();
        assert_eq!(plan.documents.len(), 2);
        assert_eq!(plan.nav.len(), 1);
    }

    #[test]
    fn draft_errors_surface_when_drafts_included() {
        let m = manifest(vec![
            tip("a.md", "Live", "/live", None),
            doc(
                "b.md",
                "---\ntitle: Draft\npermalink: /draft\npublished: false\nlayout: missing\n---\n",
            ),
        ]);
        let templates = TemplateSet::builtin();
        // The broken draft is invisible to a default build...
        assert!(build(&m, &templates, &BuildOptions::default()).is_ok());
        // ...but fails as soon as drafts are part of the run.
        let options = BuildOptions {
            include_drafts: true,
        };
        let err = build(&m, &templates, &options).unwrap_err();
        assert!(matches!(err, SiteError::Render(_)));
    }

    #[test]
    fn duplicate_permalink_is_error() {
        let m = manifest(vec![
            tip("a.md", "A", "/tips/1", None),
            tip("b.md", "B", "/tips/1", None),
        ]);
        let err = plan(&m, &BuildOptions::default()).unwrap_err();
        match err {
            SiteError::DuplicatePermalink {
                permalink,
                first,
                second,
            } => {
                assert_eq!(permalink, "/tips/1");
                assert_eq!(first, PathBuf::from("a.md"));
                assert_eq!(second, PathBuf::from("b.md"));
            }
            other => panic!("expected DuplicatePermalink, got {other:?}"),
        }
    }

    #[test]
    fn colliding_output_paths_are_duplicates() {
        // Distinct permalinks, same file on disk.
        let m = manifest(vec![
            tip("a.md", "A", "/a", None),
            tip("b.md", "B", "/a/index.html", None),
        ]);
        assert!(matches!(
            plan(&m, &BuildOptions::default()),
            Err(SiteError::DuplicatePermalink { .. })
        ));
    }

    #[test]
    fn unpublished_duplicate_does_not_collide() {
        let m = manifest(vec![
            tip("a.md", "A", "/tips/1", None),
            doc(
                "b.md",
                "---\ntitle: B\npermalink: /tips/1\npublished: false\n---\n",
            ),
        ]);
        assert!(plan(&m, &BuildOptions::default()).is_ok());
    }

    #[test]
    fn build_produces_index_when_root_unclaimed() {
        let m = manifest(vec![tip("a.md", "Tip 1", "/tips/1", Some(1))]);
        let pages = build(&m, &TemplateSet::builtin(), &BuildOptions::default()).unwrap();
        assert_eq!(pages.len(), 2);
        let index = pages.iter().find(|p| p.source.is_none()).unwrap();
        assert_eq!(index.output_path, PathBuf::from("index.html"));
        assert!(index.html.contains("Tip 1"));
    }

    #[test]
    fn root_document_suppresses_generated_index() {
        let m = manifest(vec![tip("home.md", "Home", "/", None)]);
        let pages = build(&m, &TemplateSet::builtin(), &BuildOptions::default()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].output_path, PathBuf::from("index.html"));
        assert_eq!(pages[0].source, Some(PathBuf::from("home.md")));
    }

    #[test]
    fn pages_route_to_permalink_paths() {
        let m = manifest(vec![
            tip("a.md", "Tip 1", "/tips/1", Some(1)),
            tip("b.md", "About", "/about.html", None),
        ]);
        let pages = build(&m, &TemplateSet::builtin(), &BuildOptions::default()).unwrap();
        let paths: Vec<&Path> = pages.iter().map(|p| p.output_path.as_path()).collect();
        assert!(paths.contains(&Path::new("tips/1/index.html")));
        assert!(paths.contains(&Path::new("about.html")));
    }

    #[test]
    fn build_is_deterministic() {
        let m = manifest(vec![
            tip("a.md", "Tip 1", "/tips/1", Some(1)),
            tip("b.md", "Tip 2", "/tips/2", Some(2)),
        ]);
        let templates = TemplateSet::builtin();
        let first = build(&m, &templates, &BuildOptions::default()).unwrap();
        let second = build(&m, &templates, &BuildOptions::default()).unwrap();
        let html = |pages: &[RenderedPage]| -> Vec<String> {
            pages.iter().map(|p| p.html.clone()).collect()
        };
        assert_eq!(html(&first), html(&second));
    }
}
