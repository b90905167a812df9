//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A labeled span in source code.
///
/// - **Primary labels** mark the main location of an error.
/// - **Secondary labels** provide additional context, such as "first version
///   given here".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Returns this label with its span moved forward by `offset` bytes.
    pub(crate) fn shifted(&self, offset: usize) -> Self {
        Self {
            span: self.span.shift(offset),
            message: self.message.clone(),
            is_primary: self.is_primary,
        }
    }

    /// Returns this label moved onto `span`.
    pub(crate) fn relocated(&self, span: Span) -> Self {
        Self {
            span,
            message: self.message.clone(),
            is_primary: self.is_primary,
        }
    }
}
