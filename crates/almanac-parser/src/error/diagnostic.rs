//! The core diagnostic type for the Almanac error system.
//!
//! A [`Diagnostic`] represents a single error with an optional error code,
//! labeled source spans, and help text.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E106]: version must come before the label
///   --> catalog.yaml:9:9
///    |
///  9 |       - api:orders "REST" @v2
///    |                           ^^^ version after label
///    |
///    = help: write the reference as `api:orders @v2 "REST"`
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use almanac_parser::error::{Diagnostic, ErrorCode};
    /// # use almanac_parser::Span;
    ///
    /// let diag = Diagnostic::error("empty version")
    ///     .with_code(ErrorCode::E103)
    ///     .with_label(Span::new(10..11), "expected a version after `@`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Move every label forward by `offset` bytes.
    ///
    /// References are parsed on their own and then placed back into the
    /// document they were read from.
    pub(crate) fn shifted(self, offset: usize) -> Self {
        Self {
            labels: self.labels.iter().map(|l| l.shifted(offset)).collect(),
            ..self
        }
    }

    /// Returns this diagnostic with every label moved onto `span`.
    ///
    /// Used when a reference cannot be found verbatim in its document.
    pub(crate) fn relocated(self, span: Span) -> Self {
        Self {
            labels: self.labels.iter().map(|l| l.relocated(span)).collect(),
            ..self
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
