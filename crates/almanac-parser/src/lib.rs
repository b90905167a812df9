//! # Almanac Parser
//!
//! Parser for Almanac catalog sources. This crate provides the reference
//! grammar and the pipeline from YAML catalog documents to typed entities.
//!
//! ## Usage
//!
//! ```
//! # use almanac_parser::{parse_catalog, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//! apiVersion: almanac.io/v1alpha1
//! kind: Group
//! metadata:
//!   name: platform
//! spec:
//!   type: team
//! ---
//! apiVersion: almanac.io/v1alpha1
//! kind: Domain
//! metadata:
//!   name: commerce
//! spec:
//!   owner: group:platform
//! "#;
//!
//!     let entities = parse_catalog(source, None)?;
//!     assert_eq!(entities.len(), 2);
//!     Ok(())
//! }
//! ```

mod document;
mod elaborate;
pub mod error;
mod reference;
#[cfg(test)]
mod reference_tests;
mod span;

pub use error::ParseError;
pub use reference::{parse_label_ref, parse_record_label_ref, parse_ref};
pub use span::Span;

use std::path::Path;

use log::debug;

use almanac_core::entity::Entity;

use elaborate::Builder;
use error::DiagnosticCollector;

/// Parse a catalog source into entities.
///
/// The source is a stream of YAML documents separated by `---` lines. Each
/// document is processed in order:
///
/// 1. **Decode** - Check the document layout and dispatch on `kind`
/// 2. **Elaborate** - Parse reference fields and build the entity
///
/// Documents that are empty or contain only comments are skipped. Every
/// document is checked, so one call reports all broken documents.
///
/// # Arguments
///
/// * `source` - The catalog source text
/// * `path` - File the source was read from, recorded as entity provenance
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic found. Spans point into
/// `source`.
pub fn parse_catalog(source: &str, path: Option<&Path>) -> Result<Vec<Entity>, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut entities = Vec::new();

    let chunks = document::split_documents(source);
    for chunk in &chunks {
        let raw = match document::decode(chunk) {
            Ok(raw) => raw,
            Err(diag) => {
                collector.emit(diag);
                continue;
            }
        };

        match Builder::new(path, *chunk).build(raw) {
            Ok(entity) => entities.push(entity),
            Err(diagnostics) => diagnostics.into_iter().for_each(|d| collector.emit(d)),
        }
    }

    collector.finish()?;

    debug!(
        path:? = path,
        documents = chunks.len(),
        entities = entities.len();
        "Parsed catalog source"
    );
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use almanac_core::{entity::CatalogEntity, kind::Kind};

    use super::*;
    use crate::error::ErrorCode;

    const CATALOG: &str = r#"apiVersion: almanac.io/v1alpha1
kind: Group
metadata:
  name: platform
spec:
  type: team
---
apiVersion: almanac.io/v1alpha1
kind: Component
metadata:
  name: web
  namespace: shop
spec:
  type: service
  lifecycle: production
  owner: group:platform
  system: system:shop/storefront
  consumesApis:
    - api:shop/orders@v2 "order feed"
  dependsOn:
    - ref: resource:shop/db
      label: primary store
"#;

    #[test]
    fn test_parse_catalog() {
        let path = PathBuf::from("catalog.yaml");
        let entities = parse_catalog(CATALOG, Some(&path)).expect("catalog should parse");

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].kind(), Kind::Group);

        let component = entities[1].as_component().expect("second entity is a component");
        assert_eq!(component.reference().to_string(), "component:shop/web");
        assert_eq!(component.spec.owner.as_ref().unwrap().to_string(), "group:platform");
        assert_eq!(component.spec.consumes_apis[0].version(), Some("v2"));
        assert_eq!(component.spec.consumes_apis[0].label(), Some("order feed"));
        assert_eq!(component.spec.depends_on[0].label(), Some("primary store"));

        let source = component.source.as_ref().unwrap();
        assert_eq!(source.path.as_deref(), Some(path.as_path()));
        assert_eq!(source.line, 8);
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_catalog("", None).unwrap().is_empty());
        assert!(parse_catalog("---\n# nothing here\n", None).unwrap().is_empty());
    }

    #[test]
    fn test_reference_errors_point_into_source() {
        let source = CATALOG.replace("system:shop/storefront", "sytem:shop/storefront");
        let err = parse_catalog(&source, None).unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E101));

        let span = diag.labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], "sytem");
    }

    #[test]
    fn test_all_documents_are_reported() {
        let source = r#"apiVersion: v1
kind: Service
metadata:
  name: x
spec: {}
---
apiVersion: v1
kind: Group
metadata:
  name: team
spec:
  parent: "group:a b"
  children: ["@oops"]
"#;
        let err = parse_catalog(source, None).unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E105, ErrorCode::E100]);
    }

    #[test]
    fn test_escaped_reference_marks_its_line() {
        let source = r#"apiVersion: v1
kind: Group
metadata:
  name: team-a
spec:
  type: team
  parent: "group:a \"oops"
"#;
        let err = parse_catalog(source, None).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E105));

        let span = diag.labels()[0].span();
        assert_eq!(&source[span.start()..span.end()], r#"parent: "group:a \"oops""#);
    }

    #[test]
    fn test_reference_errors_skip_partial_matches() {
        let source = r#"apiVersion: v1
kind: Group
metadata:
  name: team-a
spec:
  type: team
  children: ["group:team-a", "group:team-a b"]
"#;
        let err = parse_catalog(source, None).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E105));

        let span = diag.labels()[0].span();
        let value = source.find("group:team-a b").unwrap();
        assert!(span.start() > value && span.end() <= value + "group:team-a b".len());
    }

    #[test]
    fn test_record_version_conflict() {
        let source = r#"apiVersion: v1
kind: Resource
metadata:
  name: cache
spec:
  type: redis
  dependsOn:
    - ref: resource:db@v1
      attrs:
        version: v2
"#;
        let err = parse_catalog(source, None).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E109));
    }
}
