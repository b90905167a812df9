//! Error types for Almanac operations.
//!
//! This module provides the main error type [`AlmanacError`] and the
//! repository errors it wraps: [`CatalogError`] for store and state machine
//! failures and [`ValidationError`] for individual integrity violations.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use almanac_core::{
    entity::SourceInfo,
    kind::Kind,
    reference::{NameError, Ref},
};
use almanac_parser::ParseError;

/// The main error type for Almanac operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text its diagnostics point into, so
/// callers can render them with source snippets.
#[derive(Debug, Error)]
pub enum AlmanacError {
    #[error("cannot read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{err}")]
    Parse {
        err: ParseError,
        src: String,
        path: Option<PathBuf>,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AlmanacError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
            path,
        }
    }
}

/// Errors raised by a [`Repository`](crate::Repository).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{reference} is defined more than once")]
    DuplicateEntity {
        reference: Ref,
        /// Where the entity already in the repository was declared.
        first: Option<SourceInfo>,
        /// Where the rejected definition was declared.
        duplicate: Option<SourceInfo>,
    },

    #[error("catalog has been validated and no longer accepts entities")]
    Sealed,

    #[error("catalog failed validation and cannot be validated again")]
    AlreadyFailed,

    #[error("{}", ValidationSummary(.errors))]
    Validation { errors: Vec<ValidationError> },
}

struct ValidationSummary<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.0.first() {
            write!(f, "{}", first)?;
            if self.0.len() > 1 {
                write!(f, " (+{} more)", self.0.len() - 1)?;
            }
        }
        Ok(())
    }
}

/// A single referential-integrity violation.
///
/// `entity` is the reference of the offending entity and `field` the path of
/// the offending field, e.g. `spec.owner`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity}: missing required field `{field}`")]
    MissingField { entity: Ref, field: &'static str },

    #[error("{entity}: `{field}` refers to undefined {expected} `{target}`")]
    UndefinedReference {
        entity: Ref,
        field: &'static str,
        target: Ref,
        expected: Kind,
    },

    #[error("{entity}: `{field}` entry `{target}` must be an explicit component or resource reference")]
    InvalidDependencyKind {
        entity: Ref,
        field: &'static str,
        target: Ref,
    },

    #[error("{entity}: invalid `{field}`: {error}")]
    InvalidName {
        entity: Ref,
        field: &'static str,
        error: NameError,
    },
}

impl ValidationError {
    /// Reference of the entity the violation was found in.
    pub fn entity(&self) -> &Ref {
        match self {
            ValidationError::MissingField { entity, .. }
            | ValidationError::UndefinedReference { entity, .. }
            | ValidationError::InvalidDependencyKind { entity, .. }
            | ValidationError::InvalidName { entity, .. } => entity,
        }
    }

    /// Path of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::UndefinedReference { field, .. }
            | ValidationError::InvalidDependencyKind { field, .. }
            | ValidationError::InvalidName { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str) -> Ref {
        Ref::new(Some(Kind::Component), "", name).unwrap()
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::UndefinedReference {
            entity: component("web"),
            field: "spec.owner",
            target: Ref::new(Some(Kind::Group), "", "nobody").unwrap(),
            expected: Kind::Group,
        };
        assert_eq!(
            err.to_string(),
            "component:web: `spec.owner` refers to undefined group `group:nobody`"
        );
        assert_eq!(err.entity(), &component("web"));
        assert_eq!(err.field(), "spec.owner");
    }

    #[test]
    fn test_validation_summary_display() {
        let missing = |name| ValidationError::MissingField {
            entity: component(name),
            field: "spec.type",
        };

        let single = CatalogError::Validation {
            errors: vec![missing("a")],
        };
        assert_eq!(
            single.to_string(),
            "component:a: missing required field `spec.type`"
        );

        let many = CatalogError::Validation {
            errors: vec![missing("a"), missing("b"), missing("c")],
        };
        assert_eq!(
            many.to_string(),
            "component:a: missing required field `spec.type` (+2 more)"
        );
    }
}
