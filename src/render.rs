//! Template rendering: one [`Document`] plus the navigation index → HTML.
//!
//! Stage 2 of the tipsmith build pipeline. A [`TemplateSet`] maps layout
//! names to templates; each document's `layout` key selects one.
//!
//! ## Built-in Layouts
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/), compile-time
//! checked and XSS-safe by default:
//!
//! - `tip` — full site chrome: header with site title, navigation index,
//!   article body. The default for tip articles.
//! - `default` — bare article, no chrome. For standalone pages.
//! - `index` — navigation listing, used for the generated root page.
//!
//! ## On-Disk Overrides
//!
//! `--templates DIR` loads `NAME.html` files as substitution templates that
//! override (or extend) the built-ins of the same name. Recognized
//! placeholders:
//!
//! ```text
//! {{ title }}             document title (escaped)
//! {{ permalink }}         normalized permalink (escaped)
//! {{ site.title }}        site title from config.toml (escaped)
//! {{ site.description }}  site tagline from config.toml (escaped)
//! {{ content }}           rendered body HTML (raw)
//! {{ nav }}               rendered navigation list HTML (raw)
//! ```
//!
//! ## Body Formatting
//!
//! Markdown bodies are converted by pulldown-cmark (CommonMark plus tables,
//! strikethrough, and footnotes); `type: html` bodies pass through
//! untouched. Rendering is pure: no I/O after the template set is loaded.

use crate::config::SiteConfig;
use crate::document::{BodyFormat, Document};
use crate::permalink;
use crate::types::NavItem;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error reading template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown template `{layout}` for {document} (available: {available})")]
    UnknownTemplate {
        document: PathBuf,
        layout: String,
        available: String,
    },
}

const CSS: &str = include_str!("../static/style.css");

/// Everything a template may reference for one page.
pub struct PageContext<'a> {
    pub title: &'a str,
    pub permalink: &'a str,
    /// Body already rendered to HTML.
    pub content_html: &'a str,
    pub nav: &'a [NavItem],
    pub site: &'a SiteConfig,
}

enum Template {
    /// Compile-time maud layout.
    Builtin(fn(&PageContext) -> Markup),
    /// Substitution template loaded from a `--templates` directory.
    File(String),
}

/// Named templates, shared read-only across all documents.
pub struct TemplateSet {
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    /// The built-in layouts: `tip`, `default`, and `index`.
    pub fn builtin() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert("tip".to_string(), Template::Builtin(layout_tip));
        templates.insert("default".to_string(), Template::Builtin(layout_default));
        templates.insert("index".to_string(), Template::Builtin(layout_index));
        Self { templates }
    }

    /// Load `NAME.html` substitution templates from a directory, overriding
    /// built-ins of the same name. Returns the number of templates loaded.
    pub fn load_overrides(&mut self, dir: &Path) -> Result<usize, RenderError> {
        let read_err = |path: &Path, source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut loaded = 0;
        let entries = fs::read_dir(dir).map_err(|e| read_err(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| read_err(dir, e))?.path();
            let is_template = path.is_file()
                && path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case("html"))
                    .unwrap_or(false);
            if !is_template {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let content = fs::read_to_string(&path).map_err(|e| read_err(&path, e))?;
            self.templates.insert(name, Template::File(content));
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render one document to its final HTML page.
    pub fn render_document(
        &self,
        doc: &Document,
        nav: &[NavItem],
        config: &SiteConfig,
    ) -> Result<String, RenderError> {
        let layout = doc
            .meta
            .layout
            .as_deref()
            .unwrap_or(&config.default_layout);
        let content_html = match doc.meta.format {
            BodyFormat::Markdown => markdown_to_html(&doc.body),
            BodyFormat::Html => doc.body.clone(),
        };
        let ctx = PageContext {
            title: &doc.meta.title,
            permalink: &doc.meta.permalink,
            content_html: &content_html,
            nav,
            site: config,
        };
        self.apply(layout, &ctx)
            .ok_or_else(|| RenderError::UnknownTemplate {
                document: doc.source.clone(),
                layout: layout.to_string(),
                available: self.templates.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }

    /// Render the generated root index page listing the navigation.
    pub fn render_index(&self, nav: &[NavItem], config: &SiteConfig) -> String {
        let content_html = nav_list(nav, "/").into_string();
        let ctx = PageContext {
            title: &config.site.title,
            permalink: "/",
            content_html: &content_html,
            nav,
            site: config,
        };
        // `index` is always registered as a built-in, so lookup cannot miss.
        self.apply("index", &ctx)
            .unwrap_or_else(|| layout_index(&ctx).into_string())
    }

    fn apply(&self, layout: &str, ctx: &PageContext) -> Option<String> {
        match self.templates.get(layout)? {
            Template::Builtin(f) => Some(f(ctx).into_string()),
            Template::File(template) => Some(substitute(template, ctx)),
        }
    }
}

/// Convert the markdown body to HTML.
///
/// CommonMark plus tables, strikethrough, and footnotes. Code fences keep
/// their language tag as `class="language-x"` on the `<code>` element.
pub fn markdown_to_html(markdown: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// HTML-escape a text field for placeholder substitution.
fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Fill `{{ field }}` placeholders in an on-disk template.
///
/// Both `{{ title }}` and `{{title}}` spellings are accepted. Text fields
/// are escaped; `content` and `nav` are pre-rendered HTML.
fn substitute(template: &str, ctx: &PageContext) -> String {
    let fields: [(&str, String); 6] = [
        ("title", escape(ctx.title)),
        ("permalink", escape(ctx.permalink)),
        ("site.title", escape(&ctx.site.site.title)),
        ("site.description", escape(&ctx.site.site.description)),
        ("content", ctx.content_html.to_string()),
        ("nav", nav_list(ctx.nav, ctx.permalink).into_string()),
    ];
    let mut out = template.to_string();
    for (key, value) in fields {
        out = out.replace(&format!("{{{{ {key} }}}}"), &value);
        out = out.replace(&format!("{{{{{key}}}}}"), &value);
    }
    out
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with the site title and navigation.
fn site_header(ctx: &PageContext) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (ctx.site.site.title) }
            nav.site-nav {
                (nav_list(ctx.nav, ctx.permalink))
            }
        }
    }
}

/// Renders the navigation index as a list, marking the current page.
pub fn nav_list(items: &[NavItem], current_permalink: &str) -> Markup {
    html! {
        ul.nav-index {
            @for item in items {
                @let is_current = item.permalink == current_permalink;
                li class=[is_current.then_some("current")] {
                    a href=(permalink::href(&item.permalink)) { (item.title) }
                }
            }
        }
    }
}

// ============================================================================
// Built-in Layouts
// ============================================================================

/// `tip`: site chrome plus article. The stock default layout.
fn layout_tip(ctx: &PageContext) -> Markup {
    let content = html! {
        (site_header(ctx))
        main.tip-page {
            article.tip-content {
                h1 { (ctx.title) }
                (PreEscaped(ctx.content_html))
            }
        }
    };
    base_document(ctx.title, content)
}

/// `default`: bare article, no chrome.
fn layout_default(ctx: &PageContext) -> Markup {
    let content = html! {
        main.plain-page {
            article {
                (PreEscaped(ctx.content_html))
            }
        }
    };
    base_document(ctx.title, content)
}

/// `index`: the generated root listing page.
fn layout_index(ctx: &PageContext) -> Markup {
    let content = html! {
        main.index-page {
            header.index-header {
                h1 { (ctx.site.site.title) }
                @if !ctx.site.site.description.is_empty() {
                    p.site-description { (ctx.site.site.description) }
                }
            }
            nav.site-nav {
                (PreEscaped(ctx.content_html))
            }
        }
    };
    base_document(&ctx.site.site.title, content)
}

// ============================================================================
// Tests
// ============================================================================
