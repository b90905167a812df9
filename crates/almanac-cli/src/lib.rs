//! CLI logic for the Almanac catalog tool.
//!
//! This module contains the core CLI logic: configuration discovery, catalog
//! loading and the `check`, `show` and `find` commands.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod render;

pub use args::{Args, Command};
pub use error::CliError;

use std::path::PathBuf;

use log::{debug, info};

use almanac::{
    CatalogBuilder, Repository,
    entity::{CatalogEntity, Entity},
    kind::Kind,
    reference::Ref,
};
use almanac_parser::ParseError;

/// Run the Almanac CLI application
///
/// This function runs the selected command and prints its output to
/// standard output.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Parsing errors
/// - Duplicate entities and validation errors
/// - References that are malformed, unknown or ambiguous
pub fn run(args: &Args) -> Result<(), CliError> {
    let output = execute(args)?;
    print!("{output}");
    Ok(())
}

/// Run the selected command and return its output.
///
/// # Errors
///
/// See [`run`].
pub fn execute(args: &Args) -> Result<String, CliError> {
    let config = config::load_config(args.config.as_ref())?;
    let paths = catalog_paths(args.command.paths(), config.paths());
    info!(paths:? = paths; "Loading catalog");

    let builder = CatalogBuilder::new(config.catalog().clone());

    match &args.command {
        Command::Check { .. } => {
            let repository = builder.load(&paths)?;
            info!(entities = repository.len(); "Catalog is valid");
            Ok(render::counts(&repository))
        }
        Command::Show { reference, .. } => {
            let target = almanac_parser::parse_ref(reference).map_err(|diag| {
                CliError::Reference {
                    err: ParseError::from(diag),
                    text: reference.clone(),
                }
            })?;
            let repository = builder.load(&paths)?;
            let entity = resolve(&repository, &target, reference)?;
            Ok(render::describe(entity))
        }
        Command::Find { kind, query, .. } => {
            let kind: Kind = kind.parse()?;
            let repository = builder.load(&paths)?;
            let found = repository.find(kind, query);
            debug!(kind:% = kind, query = query.as_str(), found = found.len(); "Find finished");
            Ok(render::list(&found))
        }
    }
}

/// Paths from the command line, else from the configuration, else the
/// working directory.
fn catalog_paths(args: &[PathBuf], configured: &[PathBuf]) -> Vec<PathBuf> {
    if !args.is_empty() {
        args.to_vec()
    } else if !configured.is_empty() {
        configured.to_vec()
    } else {
        vec![PathBuf::from(".")]
    }
}

/// Look up `target`, trying every kind when the reference carries none.
fn resolve<'a>(
    repository: &'a Repository,
    target: &Ref,
    text: &str,
) -> Result<&'a Entity, CliError> {
    if target.kind().is_some() {
        return repository
            .entity(target)
            .ok_or_else(|| CliError::NotFound(target.clone()));
    }

    let mut found: Vec<&Entity> = Kind::ALL
        .into_iter()
        .filter_map(|kind| repository.entity(&target.with_kind(kind)))
        .collect();

    match found.len() {
        0 => Err(CliError::NotFound(target.clone())),
        1 => Ok(found.remove(0)),
        _ => Err(CliError::Ambiguous {
            text: text.to_string(),
            candidates: found.iter().map(|e| e.reference()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_paths_precedence() {
        let cli = [PathBuf::from("a")];
        let configured = [PathBuf::from("b")];

        assert_eq!(catalog_paths(&cli, &configured), cli);
        assert_eq!(catalog_paths(&[], &configured), configured);
        assert_eq!(catalog_paths(&[], &[]), [PathBuf::from(".")]);
    }
}
