//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).
//!
//! A configuration file holds the catalog sections understood by
//! [`CatalogConfig`] plus the default catalog paths used when none are given
//! on the command line:
//!
//! ```toml
//! paths = ["catalog"]
//!
//! [validation]
//! mode = "collect"
//!
//! [sources]
//! extensions = ["yaml"]
//! recursive = false
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use almanac::config::CatalogConfig;

/// Local configuration path, relative to the working directory.
const LOCAL_CONFIG: &str = "almanac/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML configuration `{}`: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("cannot read configuration file `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Contents of a CLI configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Catalog files or directories loaded when none are given. Relative
    /// paths are resolved against the directory of the configuration file.
    #[serde(default)]
    paths: Vec<PathBuf>,

    #[serde(flatten)]
    catalog: CatalogConfig,
}

impl CliConfig {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in &mut self.paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (almanac/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<CliConfig, ConfigError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("io", "almanac", "almanac") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(CliConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<CliConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config: CliConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use almanac::config::ValidationMode;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
paths = ["catalog", "more/catalog.yaml"]

[validation]
mode = "collect"

[sources]
recursive = false
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(
            config.paths(),
            [dir.path().join("catalog"), dir.path().join("more/catalog.yaml")]
        );
        assert_eq!(config.catalog().validation().mode(), ValidationMode::Collect);
        assert!(!config.catalog().sources().recursive());
        assert_eq!(config.catalog().sources().extensions(), ["yml", "yaml"]);
    }

    #[test]
    fn test_paths_resolve_against_config_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("elsewhere");
        fs::create_dir(&nested).unwrap();
        let absolute = dir.path().join("shared");
        let path = nested.join("config.toml");
        fs::write(
            &path,
            format!("paths = [\"catalog\", {:?}]\n", absolute.to_str().unwrap()),
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.paths(), [nested.join("catalog"), absolute]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.paths().is_empty());
        assert_eq!(config.catalog().validation().mode(), ValidationMode::FailFast);
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(p) if p == path));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[validation]\nmode = \"sometimes\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
