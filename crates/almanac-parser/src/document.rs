//! Catalog document decoding.
//!
//! A catalog source is a stream of YAML documents separated by `---` lines.
//! [`split_documents`] cuts the source into [`Chunk`]s that remember where
//! they came from, and [`decode`] turns one chunk into a [`RawEntity`]
//! mirroring the document layout. Reference fields are kept as text here and
//! parsed during elaboration.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// One YAML document of a catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk<'src> {
    /// Document text, without the `---` separator line.
    pub text: &'src str,
    /// Byte offset of `text` in the source.
    pub offset: usize,
    /// 1-based line of the first non-blank, non-comment line.
    pub line: usize,
    /// Span of that line in the source.
    pub first_line: Span,
}

impl Chunk<'_> {
    /// Find `needle` as a whole scalar in the document, searching from `from`
    /// (relative to the document) first and from the start second.
    ///
    /// Returns the span in the source. Values whose source spelling differs
    /// from the decoded text, such as escaped double-quoted scalars, are not
    /// found.
    pub fn locate(&self, needle: &str, from: usize) -> Option<Span> {
        let found = self
            .find_scalar(needle, from)
            .or_else(|| self.find_scalar(needle, 0))?;
        Some(Span::new(found..found + needle.len()).shift(self.offset))
    }

    /// Document-relative offset of the first mapping key named `key`.
    pub fn key_offset(&self, key: &str) -> Option<usize> {
        let mut offset = 0;
        for line in self.text.split_inclusive('\n') {
            let rest = line.trim_start();
            let rest = rest.strip_prefix("- ").map_or(rest, str::trim_start);
            if rest
                .strip_prefix(key)
                .and_then(|after| after.strip_prefix(':'))
                .is_some_and(|after| after.chars().next().is_none_or(char::is_whitespace))
            {
                return Some(offset + line.len() - rest.len());
            }
            offset += line.len();
        }
        None
    }

    /// Span in the source from the key `key` to the end of its line.
    pub fn key_line(&self, key: &str) -> Option<Span> {
        let start = self.key_offset(key)?;
        let line = self.text[start..].lines().next().unwrap_or_default();
        Some(Span::new(start..start + line.trim_end().len()).shift(self.offset))
    }

    fn find_scalar(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.text
            .get(from..)?
            .match_indices(needle)
            .map(|(i, _)| i + from)
            .find(|&i| self.is_scalar_at(i, needle.len()))
    }

    /// Whether `start..start + len` is bounded like a complete scalar.
    fn is_scalar_at(&self, start: usize, len: usize) -> bool {
        let before = self.text[..start].chars().next_back();
        let after = self.text[start + len..].chars().next();
        before.is_none_or(|c| matches!(c, ' ' | '\t' | '\n' | '[' | ',' | '"' | '\''))
            && after.is_none_or(|c| {
                matches!(c, ' ' | '\t' | '\r' | '\n' | ']' | '}' | ',' | '"' | '\'')
            })
    }
}

fn is_separator(line: &str) -> bool {
    line.strip_prefix("---").is_some_and(|rest| {
        let rest = rest.trim();
        rest.is_empty() || rest.starts_with('#')
    })
}

fn is_content(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#') && !line.starts_with('%') && line != "..."
}

/// Split a source into documents, dropping documents without content.
pub(crate) fn split_documents(source: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut first: Option<(usize, Span)> = None;
    let mut offset = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += line.len();

        if is_separator(line) {
            if let Some((line_no, first_line)) = first.take() {
                chunks.push(Chunk {
                    text: &source[start..line_start],
                    offset: start,
                    line: line_no,
                    first_line,
                });
            }
            start = offset;
        } else if first.is_none() && is_content(line) {
            let trimmed = line.trim_end().len();
            first = Some((index + 1, Span::new(line_start..line_start + trimmed)));
        }
    }

    if let Some((line_no, first_line)) = first {
        chunks.push(Chunk {
            text: &source[start..],
            offset: start,
            line: line_no,
            first_line,
        });
    }

    chunks
}

/// Decode one document.
///
/// # Errors
///
/// Returns an `E200` diagnostic for invalid YAML, an unknown `kind`, a
/// missing mandatory key or an unknown key.
pub(crate) fn decode(chunk: &Chunk<'_>) -> Result<RawEntity, Diagnostic> {
    serde_yaml::from_str(chunk.text).map_err(|err| {
        // Positions in the message are relative to the document; the span replaces them.
        let mut message = err.to_string();
        if let Some(i) = message.find(" at line ") {
            message.truncate(i);
        }
        let span = match err.location() {
            Some(location) => {
                let start = chunk.offset + location.index();
                Span::new(start..start + 1)
            }
            None => chunk.first_line,
        };

        Diagnostic::error("invalid catalog document")
            .with_code(ErrorCode::E200)
            .with_label(span, message)
            .with_help("documents need `apiVersion`, `kind`, `metadata` and `spec`")
    })
}

/// A decoded catalog document, dispatched on its `kind` key.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub(crate) enum RawEntity {
    Domain(RawDocument<RawDomainSpec>),
    System(RawDocument<RawSystemSpec>),
    Component(RawDocument<RawComponentSpec>),
    #[serde(rename = "API")]
    Api(RawDocument<RawApiSpec>),
    Resource(RawDocument<RawResourceSpec>),
    Group(RawDocument<RawGroupSpec>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawDocument<S> {
    pub api_version: String,
    pub metadata: RawMetadata,
    pub spec: S,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawMetadata {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub labels: IndexMap<String, String>,
    #[serde(default)]
    pub annotations: IndexMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawLink {
    pub url: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub link_type: Option<String>,
}

/// A `LabelRef` field value: either `"kind:ns/name@v \"label\""` or a record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawLabelRef {
    Text(String),
    Record(RawRecordRef),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawRecordRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub label: Option<String>,
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawDomainSpec {
    #[serde(rename = "type")]
    pub domain_type: Option<String>,
    pub owner: Option<String>,
    pub subdomain_of: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawSystemSpec {
    #[serde(rename = "type")]
    pub system_type: Option<String>,
    pub owner: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawComponentSpec {
    #[serde(rename = "type")]
    pub component_type: Option<String>,
    pub lifecycle: Option<String>,
    pub owner: Option<String>,
    pub system: Option<String>,
    pub subcomponent_of: Option<String>,
    #[serde(default)]
    pub provides_apis: Vec<RawLabelRef>,
    #[serde(default)]
    pub consumes_apis: Vec<RawLabelRef>,
    #[serde(default)]
    pub depends_on: Vec<RawLabelRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawApiSpec {
    #[serde(rename = "type")]
    pub api_type: Option<String>,
    pub lifecycle: Option<String>,
    pub owner: Option<String>,
    pub system: Option<String>,
    pub definition: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawResourceSpec {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub owner: Option<String>,
    pub system: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<RawLabelRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawGroupSpec {
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub profile: Option<RawProfile>,
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}
