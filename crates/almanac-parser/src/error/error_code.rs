//! Error codes for the Almanac diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Reference grammar errors
//! - `E2xx` - Catalog document errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Reference Errors (E1xx)
    // =========================================================================
    /// Missing reference.
    ///
    /// The input is empty, or starts with a version or label instead of a
    /// reference.
    E100,

    /// Unknown kind.
    ///
    /// The `kind:` prefix does not name one of the six entity kinds.
    E101,

    /// Malformed name.
    ///
    /// A namespace or name does not match `^[A-Za-z]([A-Za-z0-9-]*[A-Za-z0-9])?$`
    /// or is longer than 63 characters.
    E102,

    /// Empty version.
    ///
    /// An `@` was not followed by a version token.
    E103,

    /// Unterminated label.
    ///
    /// A label was opened with `"` but never closed.
    E104,

    /// Trailing input.
    ///
    /// Characters remain after the reference, version and label were read.
    E105,

    /// Version after label.
    ///
    /// The version must come before the label.
    E106,

    /// Duplicate version.
    ///
    /// More than one `@version` token was given.
    E107,

    /// Label inside a record reference.
    ///
    /// The `ref` field of a record-style reference carries its own label.
    E108,

    /// Conflicting versions.
    ///
    /// A record-style reference gives different versions inline and in `attrs`.
    E109,

    // =========================================================================
    // Document Errors (E2xx)
    // =========================================================================
    /// Invalid catalog document.
    ///
    /// A document is not valid YAML, names an unknown kind, misses a
    /// mandatory key, or contains an unknown key.
    E200,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Reference errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
            ErrorCode::E109 => "E109",
            // Document errors
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Reference errors
            ErrorCode::E100 => "missing reference",
            ErrorCode::E101 => "unknown kind",
            ErrorCode::E102 => "malformed name",
            ErrorCode::E103 => "empty version",
            ErrorCode::E104 => "unterminated label",
            ErrorCode::E105 => "trailing input",
            ErrorCode::E106 => "version after label",
            ErrorCode::E107 => "duplicate version",
            ErrorCode::E108 => "label inside record reference",
            ErrorCode::E109 => "conflicting versions",
            // Document errors
            ErrorCode::E200 => "invalid catalog document",
        }
    }

    /// Returns `true` for errors raised by the reference grammar.
    pub fn is_reference_error(&self) -> bool {
        !matches!(self, ErrorCode::E200)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
