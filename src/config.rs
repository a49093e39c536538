//! Site configuration module.
//!
//! Handles loading and validating the `config.toml` at the content root.
//! Configuration is sparse: stock defaults are overridden by whatever keys
//! the user sets, and unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_layout = "tip"      # Layout for documents without a `layout` key
//!
//! [site]
//! title = "Tips of the Week"  # Site title shown in headers and <title>
//! description = ""            # Tagline shown on the generated index page
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Layout applied to documents whose front matter has no `layout` key.
    pub default_layout: String,
    /// Site identity shown in page chrome.
    pub site: SiteInfo,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_layout: "tip".to_string(),
            site: SiteInfo::default(),
        }
    }
}

/// Site identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site title shown in headers and the HTML `<title>`.
    pub title: String,
    /// Tagline shown on the generated index page. Empty = omitted.
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Tips of the Week".to_string(),
            description: String::new(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_layout.is_empty() {
            return Err(ConfigError::Validation(
                "default_layout must not be empty".into(),
            ));
        }
        if self.site.title.is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        Ok(())
    }
}

/// Load `config.toml` from the content root, falling back to defaults when
/// the file does not exist.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A stock `config.toml` with every option documented, printed by the
/// `gen-config` subcommand.
pub fn stock_config_toml() -> &'static str {
    r#"# tipsmith site configuration
# All options are optional - the values below are the defaults.

# Layout applied to documents whose front matter has no `layout` key.
# Built-in layouts: "tip" (site chrome + navigation), "default" (bare article).
default_layout = "tip"

[site]
# Site title shown in headers and the HTML <title>.
title = "Tips of the Week"
# Tagline shown on the generated index page. Empty = omitted.
description = ""
"#
}
