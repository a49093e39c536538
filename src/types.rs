//! Shared types used across pipeline stages.
//!
//! These types are serialized to JSON as part of the scan manifest and must
//! be identical wherever they appear.

use serde::{Deserialize, Serialize};

/// One entry in the site navigation index.
///
/// The index is rebuilt from scratch on every run from the published
/// documents, sorted by their `order` key (documents without one sort last,
/// keeping their encounter order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    /// Display title, from the document's `title` metadata.
    pub title: String,
    /// Normalized permalink the entry links to (e.g. `/tips/1`).
    pub permalink: String,
}
