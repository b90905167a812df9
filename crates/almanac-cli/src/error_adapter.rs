//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`ParseError`](almanac_parser::ParseError) may hold several diagnostics
//! and a failed validation in collect mode may hold several violations. Each
//! of them is rendered independently.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use almanac::{AlmanacError, CatalogError};
use almanac_parser::error::Diagnostic;

use crate::error::CliError;

/// Adapter for a single parser diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for errors without source locations.
///
/// This adapter handles I/O, configuration, repository and validation
/// errors. Each carries a stable diagnostic code and an optional help line.
pub struct ErrorAdapter<'a> {
    error: &'a (dyn Error + 'static),
    code: &'static str,
    help: Option<String>,
}

impl<'a> ErrorAdapter<'a> {
    pub fn new(error: &'a (dyn Error + 'static), code: &'static str) -> Self {
        Self {
            error,
            code,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorAdapter")
            .field("error", &self.error)
            .field("code", &self.code)
            .finish()
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.error, f)
    }
}

impl Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an almanac [`Span`](almanac_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: almanac_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`CliError`] into a list of reportable errors.
///
/// Parse errors yield one [`Reportable`] per diagnostic and validation
/// failures one per violation. Other errors yield a single [`Reportable`].
pub fn to_reportables(err: &CliError) -> Vec<Reportable<'_>> {
    match err {
        CliError::Almanac(AlmanacError::Parse { err, src, .. }) => diagnostics(err, src),
        CliError::Reference { err, text } => diagnostics(err, text),
        CliError::Almanac(AlmanacError::Catalog(catalog)) => catalog_reportables(catalog),
        CliError::Almanac(AlmanacError::Io { .. }) => {
            vec![Reportable::Error(ErrorAdapter::new(err, "almanac::io"))]
        }
        CliError::Config(_) => vec![Reportable::Error(
            ErrorAdapter::new(err, "almanac::config")
                .with_help("see `almanac --help` for configuration file locations"),
        )],
        CliError::UnknownKind(_) => vec![Reportable::Error(
            ErrorAdapter::new(err, "almanac::kind")
                .with_help("kinds are domain, system, component, api, resource and group"),
        )],
        CliError::NotFound(_) => vec![Reportable::Error(ErrorAdapter::new(
            err,
            "almanac::not_found",
        ))],
        CliError::Ambiguous { candidates, .. } => {
            let names: Vec<String> = candidates.iter().map(ToString::to_string).collect();
            vec![Reportable::Error(
                ErrorAdapter::new(err, "almanac::ambiguous")
                    .with_help(format!("add a kind: {}", names.join(", "))),
            )]
        }
    }
}

fn diagnostics<'a>(err: &'a almanac_parser::ParseError, src: &'a str) -> Vec<Reportable<'a>> {
    err.diagnostics()
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
        .collect()
}

fn catalog_reportables(err: &CatalogError) -> Vec<Reportable<'_>> {
    match err {
        CatalogError::Validation { errors } => errors
            .iter()
            .map(|violation| {
                Reportable::Error(ErrorAdapter::new(violation, "almanac::validation"))
            })
            .collect(),
        CatalogError::DuplicateEntity {
            first, duplicate, ..
        } => {
            let adapter = ErrorAdapter::new(err, "almanac::duplicate");
            let help = match (first, duplicate) {
                (Some(first), Some(duplicate)) => Some(format!(
                    "first defined at {first}, defined again at {duplicate}"
                )),
                (Some(first), None) => Some(format!("first defined at {first}")),
                (None, Some(duplicate)) => Some(format!("defined again at {duplicate}")),
                (None, None) => None,
            };
            let adapter = match help {
                Some(help) => adapter.with_help(help),
                None => adapter,
            };
            vec![Reportable::Error(adapter)]
        }
        CatalogError::Sealed | CatalogError::AlreadyFailed => {
            vec![Reportable::Error(ErrorAdapter::new(err, "almanac::state"))]
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use almanac::{
        ValidationError,
        entity::SourceInfo,
        kind::{Kind, UnknownKind},
        reference::Ref,
    };
    use almanac_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    fn r(kind: Kind, name: &str) -> Ref {
        Ref::new(Some(kind), "", name).unwrap()
    }

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("test error")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(0..5), "here")
            .with_help("try this");
        let parse_err = ParseError::from(diag);
        let err = CliError::from(AlmanacError::new_parse_error(parse_err, "hello", None));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "test error");
                assert_eq!(d.code().unwrap().to_string(), "E101");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E105)
                .with_label(Span::new(10..15), "second")
                .with_help("help for second"),
            Diagnostic::error("third error").with_label(Span::new(20..25), "third"),
        ];
        let parse_err = ParseError::new(diags);
        let err = CliError::from(AlmanacError::new_parse_error(
            parse_err,
            "source code here...",
            None,
        ));

        let reportables = to_reportables(&err);

        // Each diagnostic is separate
        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].to_string(), "third error");
    }

    #[test]
    fn test_reference_argument_diagnostics() {
        let diag = Diagnostic::error("unknown kind `sytem`")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(0..5), "unknown kind");
        let err = CliError::Reference {
            err: ParseError::from(diag),
            text: "sytem:shop".to_string(),
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert!(matches!(reportables[0], Reportable::Diagnostic(_)));
        assert!(reportables[0].source_code().is_some());
    }

    #[test]
    fn test_each_violation_is_reported() {
        let missing = |name| ValidationError::MissingField {
            entity: r(Kind::Component, name),
            field: "spec.type",
        };
        let err = CliError::from(AlmanacError::from(CatalogError::Validation {
            errors: vec![missing("a"), missing("b")],
        }));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(
            reportables[1].to_string(),
            "component:b: missing required field `spec.type`"
        );
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "almanac::validation"
        );
    }

    #[test]
    fn test_duplicate_points_at_first_definition() {
        let err = CliError::from(AlmanacError::from(CatalogError::DuplicateEntity {
            reference: r(Kind::Group, "platform"),
            first: Some(SourceInfo {
                path: Some(PathBuf::from("groups.yaml")),
                line: 3,
            }),
            duplicate: Some(SourceInfo {
                path: Some(PathBuf::from("teams.yaml")),
                line: 10,
            }),
        }));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        let help = reportables[0].help().unwrap().to_string();
        assert_eq!(
            help,
            "first defined at groups.yaml:3, defined again at teams.yaml:10"
        );
    }

    #[test]
    fn test_non_diagnostic_error() {
        let err = CliError::from(UnknownKind("service".to_string()));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "unknown kind `service`");
                assert_eq!(e.code().unwrap().to_string(), "almanac::kind");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(10..15), "secondary label");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("secondary label"));
        assert!(!labels[1].primary());
    }
}
