//! Almanac - A software catalog of domains, systems, components, APIs,
//! resources and groups.
//!
//! Entities are declared in YAML documents, stored in a [`Repository`],
//! checked for referential integrity and linked into a relationship graph
//! that can be walked in both directions.

pub mod config;

mod error;
mod relations;
mod repository;
mod validate;

pub use almanac_core::{entity, kind, metadata, reference};

pub use error::{AlmanacError, CatalogError, ValidationError};
pub use repository::{Repository, State};
pub use validate::VALIDATION_ORDER;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use config::CatalogConfig;
use entity::Entity;

/// Builder for loading and validating Almanac catalogs.
///
/// # Examples
///
/// ```rust
/// use almanac::{CatalogBuilder, config::CatalogConfig, reference::Ref, kind::Kind};
///
/// let source = r#"
/// apiVersion: almanac.io/v1alpha1
/// kind: Group
/// metadata:
///   name: platform
/// spec:
///   type: team
/// "#;
///
/// let builder = CatalogBuilder::new(CatalogConfig::default());
/// let entities = builder.parse(source, None).expect("Failed to parse");
/// let repository = builder.build(entities).expect("Failed to validate");
///
/// let platform = Ref::new(Some(Kind::Group), "", "platform").unwrap();
/// assert!(repository.group(&platform).is_some());
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    config: CatalogConfig,
}

impl CatalogBuilder {
    /// Create a new catalog builder with the given configuration.
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Parse one catalog source into entities.
    ///
    /// # Arguments
    ///
    /// * `source` - YAML catalog text, possibly holding several documents
    /// * `path` - File the source was read from, recorded on each entity
    ///
    /// # Errors
    ///
    /// Returns [`AlmanacError::Parse`] holding every diagnostic of the source.
    pub fn parse(&self, source: &str, path: Option<&Path>) -> Result<Vec<Entity>, AlmanacError> {
        debug!(path:? = path; "Parsing catalog source");

        let entities = almanac_parser::parse_catalog(source, path).map_err(|err| {
            AlmanacError::new_parse_error(err, source, path.map(Path::to_path_buf))
        })?;

        trace!(entities = entities.len(); "Catalog source parsed");
        Ok(entities)
    }

    /// Store `entities` in a new repository and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`AlmanacError::Catalog`] for a duplicate entity or a failed
    /// validation.
    pub fn build(
        &self,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Result<Repository, AlmanacError> {
        let mut repository = Repository::with_mode(self.config.validation().mode());
        for entity in entities {
            repository.add_entity(entity)?;
        }
        repository.validate()?;
        Ok(repository)
    }

    /// Load catalog files and directories into a validated repository.
    ///
    /// Directories are searched for files whose extension is listed in the
    /// sources configuration, descending into subdirectories when recursion
    /// is enabled. Files named explicitly are always read. Files are loaded
    /// in path order so duplicate reports are stable.
    ///
    /// # Errors
    ///
    /// Returns [`AlmanacError::Io`] if a path cannot be read, otherwise the
    /// errors of [`parse`](Self::parse) and [`build`](Self::build). Parsing
    /// stops at the first broken file.
    pub fn load<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Repository, AlmanacError> {
        let mut files = Vec::new();
        for path in paths {
            self.collect_files(path.as_ref(), true, &mut files)?;
        }

        info!(files = files.len(); "Loading catalog");

        let mut entities = Vec::new();
        for file in &files {
            let source = fs::read_to_string(file).map_err(|source| AlmanacError::Io {
                path: file.clone(),
                source,
            })?;
            entities.extend(self.parse(&source, Some(file))?);
        }

        let repository = self.build(entities)?;
        info!(entities = repository.len(); "Catalog loaded");
        Ok(repository)
    }

    fn collect_files(
        &self,
        path: &Path,
        explicit: bool,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), AlmanacError> {
        let io_error = |source| AlmanacError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(io_error)?;
        if !metadata.is_dir() {
            if explicit || self.config.sources().matches(path) {
                files.push(path.to_path_buf());
            }
            return Ok(());
        }

        let mut entries = fs::read_dir(path)
            .map_err(io_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?;
        entries.sort();

        for entry in entries {
            if entry.is_dir() {
                if self.config.sources().recursive() {
                    self.collect_files(&entry, false, files)?;
                }
            } else {
                self.collect_files(&entry, false, files)?;
            }
        }
        Ok(())
    }
}
