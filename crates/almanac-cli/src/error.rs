//! Error type for the Almanac CLI.

use thiserror::Error;

use almanac::{AlmanacError, kind::UnknownKind, reference::Ref};
use almanac_parser::ParseError;

use crate::config::ConfigError;

/// Errors raised while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Almanac(#[from] AlmanacError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A reference given on the command line did not parse.
    ///
    /// `text` is the argument the diagnostics point into.
    #[error("{err}")]
    Reference { err: ParseError, text: String },

    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),

    #[error("`{0}` is not in the catalog")]
    NotFound(Ref),

    #[error("`{text}` matches {} entities", .candidates.len())]
    Ambiguous { text: String, candidates: Vec<Ref> },
}
