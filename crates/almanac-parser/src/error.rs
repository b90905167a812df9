//! Error and diagnostic system for the Almanac parser.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Labeled spans for rich error context
//! - A collector for accumulating diagnostics across catalog documents
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error with an optional error code, labeled source locations, and
//! help text. The reference grammar fails with a single [`Diagnostic`];
//! catalog parsing checks every document and wraps all diagnostics in a
//! [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use almanac_parser::error::{Diagnostic, ErrorCode};
//! # use almanac_parser::Span;
//!
//! let diag = Diagnostic::error("unknown kind `service`")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(0..7), "not a catalog kind")
//!     .with_help("expected one of: domain, system, component, resource, api, group");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
