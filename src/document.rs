//! Front-matter parsing: one content file → one [`Document`].
//!
//! Every content unit is a text file with a delimited metadata header
//! followed by the body:
//!
//! ```text
//! ---
//! title: Tip of the Week #1: string views
//! permalink: /tips/1
//! order: 1
//! layout: tip
//! published: true
//! ---
//! Body text in markdown.
//! ```
//!
//! ## Recognized Keys
//!
//! | Key | Required | Default | Meaning |
//! |-----|----------|---------|---------|
//! | `title` | yes | — | Page and navigation title |
//! | `permalink` | yes | — | Site-rooted output path (see [`crate::permalink`]) |
//! | `layout` | no | config `default_layout` | Template name |
//! | `published` | no | `true` | Draft flag; drafts are skipped unless `--drafts` |
//! | `order` | no | none | Navigation sort key; unordered documents sort last |
//! | `type` | no | `markdown` | Body format: `markdown` or `html` (passthrough) |
//!
//! Unrecognized keys are not an error — they are preserved in the
//! [`Metadata::extra`] overflow map so a corpus can carry auxiliary data
//! without the loader growing a field per key. All typed keys are validated
//! here, at load time; nothing downstream re-parses metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::permalink;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed metadata in {path}: {issue}")]
    MalformedMetadata { path: PathBuf, issue: MetadataIssue },
}

/// What exactly is wrong with a metadata header.
///
/// Kept structured (rather than a bare string) so errors always name the
/// offending key, letting an author fix the source file directly.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataIssue {
    /// The file does not start with a `---` delimiter line.
    MissingDelimiter,
    /// The opening `---` has no matching closing `---`.
    UnterminatedBlock,
    /// A header line is not of the form `key: value`.
    BadLine(String),
    /// A required key is absent (or empty).
    MissingKey(&'static str),
    /// A recognized key has an unparseable value.
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for MetadataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDelimiter => write!(f, "missing opening `---` delimiter"),
            Self::UnterminatedBlock => write!(f, "metadata block is never closed with `---`"),
            Self::BadLine(line) => write!(f, "not a `key: value` line: {line:?}"),
            Self::MissingKey(key) => write!(f, "missing required key `{key}`"),
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "key `{key}` has invalid value {value:?} (expected {expected})"),
        }
    }
}

/// How the body text is turned into HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// Markdown, converted with pulldown-cmark.
    #[default]
    Markdown,
    /// Already HTML; passed through untouched.
    Html,
}

/// Typed metadata record parsed from the front-matter header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    /// Normalized permalink (leading `/`, no trailing slash).
    pub permalink: String,
    /// Layout name; `None` falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    pub published: bool,
    /// Navigation sort key. Documents without one sort after all ordered
    /// documents, stable by encounter order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, rename = "type")]
    pub format: BodyFormat,
    /// Unrecognized header keys, preserved verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// One content unit: metadata plus raw body. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source path relative to the content root, for error reporting and
    /// CLI output.
    pub source: PathBuf,
    pub meta: Metadata,
    /// Raw body text, exactly as it appeared after the closing delimiter.
    pub body: String,
}

/// Parse raw file content into a [`Document`].
///
/// `source` is only used for error reporting; no I/O happens here.
pub fn parse(source: &Path, raw: &str) -> Result<Document, DocumentError> {
    let malformed = |issue| DocumentError::MalformedMetadata {
        path: source.to_path_buf(),
        issue,
    };

    let (header, body) = split_front_matter(raw).map_err(&malformed)?;
    let meta = parse_header(header).map_err(&malformed)?;

    Ok(Document {
        source: source.to_path_buf(),
        meta,
        body: body.to_string(),
    })
}

/// Read and parse a content file.
pub fn load(path: &Path, source: &Path) -> Result<Document, DocumentError> {
    let raw = std::fs::read_to_string(path).map_err(|source_err| DocumentError::Io {
        path: path.to_path_buf(),
        source: source_err,
    })?;
    parse(source, &raw)
}

/// Split the leading `---` block from the body.
///
/// The opening delimiter must be the first line of the file (a UTF-8 BOM is
/// tolerated); the closing delimiter is the next line consisting of `---`.
/// The body is everything after the closing delimiter, unmodified.
fn split_front_matter(raw: &str) -> Result<(&str, &str), MetadataIssue> {
    let rest = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let after_open = rest
        .strip_prefix("---\r\n")
        .or_else(|| rest.strip_prefix("---\n"))
        .ok_or(MetadataIssue::MissingDelimiter)?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((header, body));
        }
        offset += line.len();
    }
    Err(MetadataIssue::UnterminatedBlock)
}

fn parse_header(header: &str) -> Result<Metadata, MetadataIssue> {
    let mut title = None;
    let mut permalink = None;
    let mut layout = None;
    let mut published = true;
    let mut order = None;
    let mut format = BodyFormat::default();
    let mut extra = BTreeMap::new();

    for line in header.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(MetadataIssue::BadLine(line.to_string()));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "title" => title = Some(value.to_string()),
            "permalink" => {
                permalink =
                    Some(
                        permalink::normalize(value).ok_or_else(|| MetadataIssue::InvalidValue {
                            key: "permalink",
                            value: value.to_string(),
                            expected: "a site-rooted path like /tips/1",
                        })?,
                    )
            }
            "layout" => layout = Some(value.to_string()),
            "published" => {
                published = match value {
                    "true" => true,
                    "false" => false,
                    _ => {
                        return Err(MetadataIssue::InvalidValue {
                            key: "published",
                            value: value.to_string(),
                            expected: "true or false",
                        });
                    }
                }
            }
            "order" => {
                order = Some(value.parse::<u32>().map_err(|_| {
                    MetadataIssue::InvalidValue {
                        key: "order",
                        value: value.to_string(),
                        expected: "a non-negative integer",
                    }
                })?)
            }
            "type" => {
                format = match value {
                    "markdown" => BodyFormat::Markdown,
                    "html" => BodyFormat::Html,
                    _ => {
                        return Err(MetadataIssue::InvalidValue {
                            key: "type",
                            value: value.to_string(),
                            expected: "markdown or html",
                        });
                    }
                }
            }
            _ => {
                extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    let title = title
        .filter(|t| !t.is_empty())
        .ok_or(MetadataIssue::MissingKey("title"))?;
    let permalink = permalink.ok_or(MetadataIssue::MissingKey("permalink"))?;

    Ok(Metadata {
        title,
        permalink,
        layout,
        published,
        order,
        format,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(raw: &str) -> Result<Document, DocumentError> {
        parse(Path::new("tips/1.md"), raw)
    }

    fn issue(result: Result<Document, DocumentError>) -> MetadataIssue {
        match result {
            Err(DocumentError::MalformedMetadata { issue, .. }) => issue,
            other => panic!("expected MalformedMetadata, got {other:?}"),
        }
    }

    #[test]
    fn parses_minimal_document() {
        let doc = parse_str("---\ntitle: Tip 1\npermalink: /tips/1\n---\nHello\n").unwrap();
        assert_eq!(doc.meta.title, "Tip 1");
        assert_eq!(doc.meta.permalink, "/tips/1");
        assert_eq!(doc.body, "Hello\n");
    }

    #[test]
    fn defaults_applied() {
        let doc = parse_str("---\ntitle: T\npermalink: /t\n---\n").unwrap();
        assert!(doc.meta.published);
        assert_eq!(doc.meta.layout, None);
        assert_eq!(doc.meta.order, None);
        assert_eq!(doc.meta.format, BodyFormat::Markdown);
        assert!(doc.meta.extra.is_empty());
    }

    #[test]
    fn all_keys_parsed() {
        let doc = parse_str(
            "---\n\
             title: Tip 1\n\
             permalink: /tips/1\n\
             layout: tip\n\
             published: false\n\
             order: 12\n\
             type: html\n\
             ---\n\
             <p>hi</p>\n",
        )
        .unwrap();
        assert_eq!(doc.meta.layout.as_deref(), Some("tip"));
        assert!(!doc.meta.published);
        assert_eq!(doc.meta.order, Some(12));
        assert_eq!(doc.meta.format, BodyFormat::Html);
    }

    #[test]
    fn title_may_contain_colons() {
        let doc =
            parse_str("---\ntitle: Tip #1: string views\npermalink: /tips/1\n---\n").unwrap();
        assert_eq!(doc.meta.title, "Tip #1: string views");
    }

    #[test]
    fn unrecognized_keys_go_to_extra() {
        let doc = parse_str("---\ntitle: T\npermalink: /t\nauthor: someone\n---\n").unwrap();
        assert_eq!(doc.meta.extra.get("author").map(String::as_str), Some("someone"));
    }

    #[test]
    fn blank_header_lines_skipped() {
        let doc = parse_str("---\ntitle: T\n\npermalink: /t\n---\n").unwrap();
        assert_eq!(doc.meta.permalink, "/t");
    }

    #[test]
    fn body_preserved_verbatim() {
        let doc = parse_str("---\ntitle: T\npermalink: /t\n---\n# Heading\n\n---\nrule above\n")
            .unwrap();
        // A later `---` belongs to the body, not the header.
        assert_eq!(doc.body, "# Heading\n\n---\nrule above\n");
    }

    #[test]
    fn crlf_and_bom_tolerated() {
        let doc =
            parse_str("\u{feff}---\r\ntitle: T\r\npermalink: /t\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(doc.meta.title, "T");
        assert_eq!(doc.body, "body\r\n");
    }

    #[test]
    fn missing_delimiter_is_error() {
        assert_eq!(
            issue(parse_str("title: T\npermalink: /t\n")),
            MetadataIssue::MissingDelimiter
        );
    }

    #[test]
    fn unterminated_block_is_error() {
        assert_eq!(
            issue(parse_str("---\ntitle: T\npermalink: /t\n")),
            MetadataIssue::UnterminatedBlock
        );
    }

    #[test]
    fn missing_title_is_error() {
        assert_eq!(
            issue(parse_str("---\npermalink: /t\n---\n")),
            MetadataIssue::MissingKey("title")
        );
    }

    #[test]
    fn empty_title_is_error() {
        assert_eq!(
            issue(parse_str("---\ntitle:\npermalink: /t\n---\n")),
            MetadataIssue::MissingKey("title")
        );
    }

    #[test]
    fn missing_permalink_is_error() {
        assert_eq!(
            issue(parse_str("---\ntitle: T\n---\n")),
            MetadataIssue::MissingKey("permalink")
        );
    }

    #[test]
    fn relative_permalink_is_error() {
        let issue = issue(parse_str("---\ntitle: T\npermalink: tips/1\n---\n"));
        assert!(matches!(
            issue,
            MetadataIssue::InvalidValue { key: "permalink", .. }
        ));
    }

    #[test]
    fn bad_published_is_error() {
        let issue = issue(parse_str("---\ntitle: T\npermalink: /t\npublished: yes\n---\n"));
        assert!(matches!(
            issue,
            MetadataIssue::InvalidValue { key: "published", .. }
        ));
    }

    #[test]
    fn bad_order_is_error() {
        let issue = issue(parse_str("---\ntitle: T\npermalink: /t\norder: first\n---\n"));
        assert!(matches!(issue, MetadataIssue::InvalidValue { key: "order", .. }));
    }

    #[test]
    fn bad_type_is_error() {
        let issue = issue(parse_str("---\ntitle: T\npermalink: /t\ntype: asciidoc\n---\n"));
        assert!(matches!(issue, MetadataIssue::InvalidValue { key: "type", .. }));
    }

    #[test]
    fn non_key_value_line_is_error() {
        let issue = issue(parse_str("---\ntitle: T\njust some text\n---\n"));
        assert!(matches!(issue, MetadataIssue::BadLine(_)));
    }

    #[test]
    fn error_display_names_path_and_key() {
        let err = parse_str("---\ntitle: T\n---\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tips/1.md"));
        assert!(msg.contains("permalink"));
    }
}
