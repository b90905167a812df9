//! Parser for the compact reference syntax.
//!
//! ```text
//! labelref := ref (ws? version)? (ws? label)?
//! ref      := (kind ':')? (namespace '/')? name
//! version  := '@' token
//! label    := '"' text '"'
//! ```
//!
//! The public entry points are [`parse_ref`], [`parse_label_ref`] and
//! [`parse_record_label_ref`]. Every failure is reported as a single
//! [`Diagnostic`] with a span into the input.

use indexmap::IndexMap;
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::opt,
    error::{ContextError, ErrMode},
    stream::Stream,
    token::{any, take_while},
};

use almanac_core::{
    kind::Kind,
    reference::{LabelRef, Ref, VERSION_ATTR, validate_name},
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::Span,
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Error code of the failure
    Code(ErrorCode),
    /// Message of the primary label
    Label(&'static str),
    /// Remaining input length (`eof_offset()`) where the failing element starts
    StartOffset(usize),
    /// Remaining input length where the failing element ends
    EndOffset(usize),
    /// Remaining input lengths bounding an earlier element the failure conflicts with
    Previous(usize, usize),
}

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Helper to create a Cut error covering `start..end` (as remaining lengths)
fn cut_error(
    code: ErrorCode,
    label: &'static str,
    start_remaining: usize,
    end_remaining: usize,
) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Code(code));
    e.push(Context::Label(label));
    e.push(Context::StartOffset(start_remaining));
    e.push(Context::EndOffset(end_remaining));
    ErrMode::Cut(e)
}

fn is_segment_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ':' | '/' | '@' | '"')
}

fn is_version_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '@' | '"')
}

/// Parse optional whitespace
fn ws(input: &mut Input<'_>) -> IResult<()> {
    multispace0.void().parse_next(input)
}

/// Parse a possibly empty run of kind, namespace or name characters
fn segment<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(0.., is_segment_char).parse_next(input)
}

/// Consume `sep` if it is the next character
fn separator(input: &mut Input<'_>, sep: char) -> IResult<bool> {
    opt(sep).map(|c: Option<char>| c.is_some()).parse_next(input)
}

fn next_char(input: &mut Input<'_>) -> IResult<Option<char>> {
    opt(any).parse_next(input)
}

fn check_name(
    text: &str,
    label: &'static str,
    start_remaining: usize,
    end_remaining: usize,
) -> IResult<()> {
    validate_name(text)
        .map_err(|_| cut_error(ErrorCode::E102, label, start_remaining, end_remaining))
}

/// Parse `(kind ':')? (namespace '/')? name`
fn reference(input: &mut Input<'_>) -> IResult<Ref> {
    let start = input.eof_offset();
    if input.is_empty() || input.starts_with(['@', '"']) {
        let end = if input.is_empty() { start } else { start - 1 };
        return Err(cut_error(
            ErrorCode::E100,
            "expected a reference",
            start,
            end,
        ));
    }

    let first = segment(input)?;
    let first_end = input.eof_offset();

    let kind = if separator(input, ':')? {
        let kind = first.parse::<Kind>().map_err(|_| {
            cut_error(ErrorCode::E101, "not a catalog kind", start, first_end)
        })?;
        Some(kind)
    } else {
        None
    };

    let (mut text, mut text_start, mut text_end) = if kind.is_some() {
        let s = input.eof_offset();
        let text = segment(input)?;
        (text, s, input.eof_offset())
    } else {
        (first, start, first_end)
    };

    let namespace = if separator(input, '/')? {
        check_name(text, "invalid namespace", text_start, text_end)?;
        let namespace = text;
        text_start = input.eof_offset();
        text = segment(input)?;
        text_end = input.eof_offset();
        namespace
    } else {
        ""
    };
    check_name(text, "invalid name", text_start, text_end)?;

    Ok(Ref::from_parts(kind, namespace, text))
}

/// Parse `'@' token`
fn version<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    let start = input.eof_offset();
    next_char(input)?;
    let token = take_while(0.., is_version_char).parse_next(input)?;
    if token.is_empty() {
        return Err(cut_error(
            ErrorCode::E103,
            "expected a version after `@`",
            start,
            input.eof_offset(),
        ));
    }
    Ok(token)
}

/// Parse `'"' text '"'`, resolving `\"` and `\\` escapes
fn label(input: &mut Input<'_>) -> IResult<String> {
    let start = input.eof_offset();
    next_char(input)?;

    let mut text = String::new();
    loop {
        match next_char(input)? {
            Some('"') => return Ok(text),
            Some('\\') => {
                let checkpoint = input.checkpoint();
                match next_char(input)? {
                    Some(c @ ('"' | '\\')) => text.push(c),
                    _ => {
                        input.reset(&checkpoint);
                        text.push('\\');
                    }
                }
            }
            Some(c) => text.push(c),
            None => {
                return Err(cut_error(
                    ErrorCode::E104,
                    "label is never closed",
                    start,
                    input.eof_offset(),
                ));
            }
        }
    }
}

/// Fail on whatever input is left
fn trailing<O>(input: &mut Input<'_>) -> IResult<O> {
    Err(cut_error(
        ErrorCode::E105,
        "unexpected input",
        input.eof_offset(),
        0,
    ))
}

/// Parse a bare reference followed by nothing
fn ref_only(input: &mut Input<'_>) -> IResult<Ref> {
    let reference = reference(input)?;
    ws(input)?;
    if input.is_empty() {
        Ok(reference)
    } else {
        trailing(input)
    }
}

/// Parse `ref (version)? (label)?`
fn label_ref(input: &mut Input<'_>) -> IResult<LabelRef> {
    let mut edge = LabelRef::new(reference(input)?);
    let mut first_version: Option<(usize, usize)> = None;
    let mut has_label = false;

    loop {
        ws(input)?;
        let start = input.eof_offset();

        if input.starts_with('@') {
            let token = version(input)?;
            let end = input.eof_offset();
            if has_label {
                return Err(cut_error(
                    ErrorCode::E106,
                    "version after label",
                    start,
                    end,
                ));
            }
            if let Some((first_start, first_end)) = first_version {
                let mut err = cut_error(ErrorCode::E107, "second version", start, end);
                if let ErrMode::Cut(e) = &mut err {
                    e.push(Context::Previous(first_start, first_end));
                }
                return Err(err);
            }
            first_version = Some((start, end));
            edge = edge.with_attr(VERSION_ATTR, token);
        } else if input.starts_with('"') && !has_label {
            edge = edge.with_label(label(input)?);
            has_label = true;
        } else if input.is_empty() {
            return Ok(edge);
        } else {
            return trailing(input);
        }
    }
}

/// Convert a winnow error into a diagnostic
///
/// Offsets are recovered from the remaining-length contexts recorded when
/// the error was raised.
fn convert_error(error: ErrMode<ContextError<Context>>, source: &str) -> Diagnostic {
    let total = source.len();
    let e = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => {
            // Not reachable with complete `&str` input.
            return Diagnostic::error("incomplete reference")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(total..total), "incomplete");
        }
    };

    let mut code = ErrorCode::E100;
    let mut label = "invalid reference";
    let mut start = 0;
    let mut end = total;
    let mut previous = None;
    for ctx in e.context() {
        match ctx {
            Context::Code(c) => code = *c,
            Context::Label(l) => label = *l,
            Context::StartOffset(n) => start = total - n,
            Context::EndOffset(n) => end = total - n,
            Context::Previous(s, n) => previous = Some(Span::new(total - s..total - n)),
        }
    }

    let span = Span::new(start..end);
    let text = source.get(span.start()..span.end()).unwrap_or_default();

    let message = match code {
        ErrorCode::E101 => format!("unknown kind `{text}`"),
        ErrorCode::E102 => match validate_name(text) {
            Err(err) => err.to_string(),
            Ok(()) => format!("malformed name `{text}`"),
        },
        ErrorCode::E105 => format!("unexpected `{text}` after reference"),
        ErrorCode::E106 => "version must come before the label".to_string(),
        ErrorCode::E107 => "reference has more than one version".to_string(),
        other => other.description().to_string(),
    };

    let mut diag = Diagnostic::error(message)
        .with_code(code)
        .with_label(span, label);
    if let Some(previous) = previous {
        diag = diag.with_secondary_label(previous, "first version");
    }
    match help_for(code) {
        Some(help) => diag.with_help(help),
        None => diag,
    }
}

fn help_for(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::E100 => Some("a reference looks like `kind:namespace/name`"),
        ErrorCode::E101 => {
            Some("expected one of: domain, system, component, resource, api, group")
        }
        ErrorCode::E102 => Some(
            "names match `[A-Za-z]([A-Za-z0-9-]*[A-Za-z0-9])?` and are at most 63 characters long",
        ),
        ErrorCode::E103 => Some("write the version right after `@`, e.g. `@v2`"),
        ErrorCode::E104 => Some("close the label with `\"`"),
        ErrorCode::E106 => Some("write the version before the label"),
        ErrorCode::E107 => Some("keep a single `@version`"),
        _ => None,
    }
}

/// Run `parser` over the trimmed input, reporting spans against the original input.
fn run<O>(input: &str, mut parser: impl FnMut(&mut Input<'_>) -> IResult<O>) -> Result<O> {
    let trimmed = input.trim();
    let leading = input.len() - input.trim_start().len();

    let mut stream = trimmed;
    parser(&mut stream).map_err(|e| convert_error(e, trimmed).shifted(leading))
}

/// Parse a reference of the form `kind:namespace/name`.
///
/// Kind and namespace are optional; an omitted namespace is the default one.
///
/// # Errors
///
/// Returns a [`Diagnostic`] with a code in `E100..=E105`. Anything after the
/// name, including a version or label, is `E105`.
///
/// # Examples
///
/// ```
/// use almanac_core::kind::Kind;
/// use almanac_parser::parse_ref;
///
/// let r = parse_ref("component:payments/ledger").unwrap();
/// assert_eq!(r.kind(), Some(Kind::Component));
/// assert_eq!(r.namespace(), "payments");
/// assert_eq!(r.name(), "ledger");
/// ```
pub fn parse_ref(input: &str) -> Result<Ref> {
    run(input, ref_only)
}

/// Parse a reference with an optional `@version` and `"label"`.
///
/// The version is stored as the `version` attribute of the result.
///
/// # Errors
///
/// Returns a [`Diagnostic`] with a code in `E100..=E107`.
///
/// # Examples
///
/// ```
/// use almanac_parser::parse_label_ref;
///
/// let edge = parse_label_ref(r#"api:orders@v2 "order feed""#).unwrap();
/// assert_eq!(edge.version(), Some("v2"));
/// assert_eq!(edge.label(), Some("order feed"));
/// ```
pub fn parse_label_ref(input: &str) -> Result<LabelRef> {
    run(input, label_ref)
}

/// Build a label reference from its record form `{ref, label, attrs}`.
///
/// `reference` may carry an inline `@version` but no label. Spans in the
/// returned diagnostic point into `reference`.
///
/// # Errors
///
/// Returns the diagnostic of [`parse_label_ref`] for a malformed `reference`,
/// `E108` if `reference` carries a label, and `E109` if the inline version
/// and `attrs.version` disagree.
pub fn parse_record_label_ref(
    reference: &str,
    label: Option<String>,
    attrs: IndexMap<String, String>,
) -> Result<LabelRef> {
    let inline = parse_label_ref(reference)?;
    let leading = reference.len() - reference.trim_start().len();
    let span = Span::new(leading..leading + reference.trim().len());

    if inline.label().is_some() {
        return Err(Diagnostic::error("record reference carries its own label")
            .with_code(ErrorCode::E108)
            .with_label(span, "label inside `ref`")
            .with_help("move the label to the `label` field"));
    }

    let conflict = match (inline.version(), attrs.get(VERSION_ATTR)) {
        (Some(inline_version), Some(attr_version)) if inline_version != attr_version => {
            Some((inline_version, attr_version))
        }
        _ => None,
    };
    if let Some((inline_version, attr_version)) = conflict {
        return Err(Diagnostic::error(format!(
            "conflicting versions `{inline_version}` and `{attr_version}`"
        ))
        .with_code(ErrorCode::E109)
        .with_label(span, format!("inline version `{inline_version}`"))
        .with_help("give the version once, either inline or in `attrs`"));
    }

    let mut edge = LabelRef::new(inline.reference().clone());
    if let Some(version) = inline.version() {
        edge = edge.with_attr(VERSION_ATTR, version);
    }
    for (key, value) in attrs {
        edge = edge.with_attr(key, value);
    }
    if let Some(label) = label {
        edge = edge.with_label(label);
    }
    Ok(edge)
}
