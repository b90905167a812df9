//! Configuration types for catalog loading and validation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as the CLI's TOML configuration file.
//!
//! # Overview
//!
//! - [`CatalogConfig`] - Top-level configuration combining validation and source settings.
//! - [`ValidationConfig`] - Controls how validation failures are reported.
//! - [`SourcesConfig`] - Controls which files are read when loading directories.
//!
//! # Example
//!
//! ```
//! # use almanac::config::{CatalogConfig, ValidationMode};
//! let config = CatalogConfig::default();
//! assert_eq!(config.validation().mode(), ValidationMode::FailFast);
//! assert!(config.sources().recursive());
//! ```

use std::path::Path;

use serde::Deserialize;

/// Top-level catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,

    /// Source discovery configuration section.
    #[serde(default)]
    sources: SourcesConfig,
}

impl CatalogConfig {
    /// Creates a new [`CatalogConfig`] with the specified sections.
    pub fn new(validation: ValidationConfig, sources: SourcesConfig) -> Self {
        Self {
            validation,
            sources,
        }
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the source discovery configuration.
    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }
}

/// How the validator reports violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Stop at the first invalid entity and report one violation.
    #[default]
    FailFast,
    /// Check every entity and report all violations.
    Collect,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    mode: ValidationMode,
}

impl ValidationConfig {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    /// Returns the [`ValidationMode`].
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }
}

/// Which files are catalog sources when a directory is loaded.
///
/// Files named explicitly are always read, whatever their extension.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// File extensions, without the leading dot.
    #[serde(default = "default_extensions")]
    extensions: Vec<String>,

    /// Whether subdirectories are searched.
    #[serde(default = "default_recursive")]
    recursive: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

fn default_recursive() -> bool {
    true
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            recursive: default_recursive(),
        }
    }
}

impl SourcesConfig {
    pub fn new(extensions: Vec<String>, recursive: bool) -> Self {
        Self {
            extensions,
            recursive,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// Returns `true` if `path` has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
