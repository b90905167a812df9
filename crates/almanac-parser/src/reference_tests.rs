//! Unit tests for the reference grammar
//!
//! These tests cover the accepted reference forms and check that every
//! malformed input fails with the expected error code and span.

use indexmap::IndexMap;

use almanac_core::{
    kind::Kind,
    reference::{DEFAULT_NAMESPACE, Ref},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    reference::{parse_label_ref, parse_record_label_ref, parse_ref},
    span::Span,
};

/// Helper to parse a label reference and assert failure with `code`
fn assert_label_ref_fails(source: &str, code: ErrorCode) -> Diagnostic {
    match parse_label_ref(source) {
        Ok(edge) => panic!("Expected `{source}` to fail with {code}, but got `{edge}`"),
        Err(diag) => {
            assert_eq!(
                diag.code(),
                Some(code),
                "Unexpected error for `{source}`: {diag}"
            );
            diag
        }
    }
}

/// Helper to parse a reference and assert failure with `code`
fn assert_ref_fails(source: &str, code: ErrorCode) -> Diagnostic {
    match parse_ref(source) {
        Ok(r) => panic!("Expected `{source}` to fail with {code}, but got `{r}`"),
        Err(diag) => {
            assert_eq!(
                diag.code(),
                Some(code),
                "Unexpected error for `{source}`: {diag}"
            );
            diag
        }
    }
}

fn primary_span(diag: &Diagnostic) -> Span {
    diag.labels()
        .iter()
        .find(|l| l.is_primary())
        .map(|l| l.span())
        .expect("diagnostic should have a primary label")
}

mod ref_parsing_tests {
    use super::*;

    #[test]
    fn test_bare_name() {
        let r = parse_ref("foo").expect("bare name should parse");
        assert_eq!(r.kind(), None);
        assert_eq!(r.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(r.name(), "foo");
    }

    #[test]
    fn test_namespace_and_name() {
        let r = parse_ref("payments/ledger").expect("namespaced ref should parse");
        assert_eq!(r.kind(), None);
        assert_eq!(r.namespace(), "payments");
        assert_eq!(r.name(), "ledger");
    }

    #[test]
    fn test_full_reference() {
        let r = parse_ref("resource:infra/orders-db").expect("full ref should parse");
        assert_eq!(
            r,
            Ref::new(Some(Kind::Resource), "infra", "orders-db").unwrap()
        );
    }

    #[test]
    fn test_every_kind_is_accepted() {
        for kind in Kind::ALL {
            let r = parse_ref(&format!("{kind}:x")).expect("kind prefix should parse");
            assert_eq!(r.kind(), Some(kind));
        }
    }

    #[test]
    fn test_explicit_default_namespace_is_normalized() {
        let explicit = parse_ref("component:default/x").unwrap();
        let implicit = parse_ref("component:x").unwrap();
        assert_eq!(explicit, implicit);
        assert_eq!(explicit.to_string(), "component:x");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let r = parse_ref("  \tgroup:platform\n").unwrap();
        assert_eq!(r.to_string(), "group:platform");
    }

    #[test]
    fn test_version_is_trailing_input_for_plain_refs() {
        let diag = assert_ref_fails("api:orders @v2", ErrorCode::E105);
        assert_eq!(primary_span(&diag), Span::new(11..14));
    }

    #[test]
    fn test_label_is_trailing_input_for_plain_refs() {
        assert_ref_fails("api:orders \"feed\"", ErrorCode::E105);
    }
}

mod label_ref_parsing_tests {
    use super::*;

    #[test]
    fn test_quoted_bare_name() {
        let edge = parse_label_ref("foo").expect("bare name should parse");
        assert_eq!(edge.reference().name(), "foo");
        assert_eq!(edge.label(), None);
        assert_eq!(edge.version(), None);
    }

    #[test]
    fn test_version_and_label() {
        let edge = parse_label_ref("api:foo/bar@v2 \"yankee\"").expect("should parse");
        assert_eq!(edge.reference().kind(), Some(Kind::Api));
        assert_eq!(edge.reference().namespace(), "foo");
        assert_eq!(edge.reference().name(), "bar");
        assert_eq!(edge.version(), Some("v2"));
        assert_eq!(edge.label(), Some("yankee"));
    }

    #[test]
    fn test_version_separated_by_whitespace() {
        let edge = parse_label_ref("component:web   @1.4.0").unwrap();
        assert_eq!(edge.version(), Some("1.4.0"));
    }

    #[test]
    fn test_label_without_version() {
        let edge = parse_label_ref("resource:db \"primary store\"").unwrap();
        assert_eq!(edge.version(), None);
        assert_eq!(edge.label(), Some("primary store"));
    }

    #[test]
    fn test_label_escapes() {
        let edge = parse_label_ref(r#"x "say \"hi\" \\ bye""#).unwrap();
        assert_eq!(edge.label(), Some(r#"say "hi" \ bye"#));
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        let edge = parse_label_ref(r#"x "a\nb""#).unwrap();
        assert_eq!(edge.label(), Some(r"a\nb"));
    }

    #[test]
    fn test_empty_label() {
        let edge = parse_label_ref(r#"x """#).unwrap();
        assert_eq!(edge.label(), Some(""));
    }

    #[test]
    fn test_display_is_canonical() {
        let edge = parse_label_ref("api:default/orders   @v1    \"feed\"").unwrap();
        assert_eq!(edge.to_string(), "api:orders @v1 \"feed\"");
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let diag = assert_label_ref_fails("", ErrorCode::E100);
        assert_eq!(primary_span(&diag), Span::new(0..0));

        assert_label_ref_fails("   ", ErrorCode::E100);
    }

    #[test]
    fn test_version_without_reference() {
        let diag = assert_label_ref_fails("@v1", ErrorCode::E100);
        assert_eq!(primary_span(&diag), Span::new(0..1));
    }

    #[test]
    fn test_label_without_reference() {
        assert_label_ref_fails("\"yankee\"", ErrorCode::E100);
    }

    #[test]
    fn test_unknown_kind() {
        let diag = assert_label_ref_fails("service:foo", ErrorCode::E101);
        assert_eq!(primary_span(&diag), Span::new(0..7));
        assert_eq!(diag.message(), "unknown kind `service`");
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert_ref_fails("Component:foo", ErrorCode::E101);
    }

    #[test]
    fn test_malformed_name() {
        let diag = assert_ref_fails("component:foo_bar", ErrorCode::E102);
        assert_eq!(primary_span(&diag), Span::new(10..17));

        assert_ref_fails("1abc", ErrorCode::E102);
        assert_ref_fails("abc-", ErrorCode::E102);
        assert_ref_fails("component:", ErrorCode::E102);
    }

    #[test]
    fn test_malformed_namespace() {
        let diag = assert_ref_fails("api:-ns/orders", ErrorCode::E102);
        assert_eq!(primary_span(&diag), Span::new(4..7));
        assert_eq!(diag.labels()[0].message(), "invalid namespace");
    }

    #[test]
    fn test_name_too_long() {
        let long = "a".repeat(64);
        assert_ref_fails(&long, ErrorCode::E102);
        assert!(parse_ref(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_empty_version() {
        assert_label_ref_fails("foo @", ErrorCode::E103);
        assert_label_ref_fails("foo @ \"label\"", ErrorCode::E103);
    }

    #[test]
    fn test_unterminated_label() {
        let diag = assert_label_ref_fails("foo/bar \"yankee", ErrorCode::E104);
        assert_eq!(primary_span(&diag), Span::new(8..15));
    }

    #[test]
    fn test_trailing_input() {
        assert_label_ref_fails("foo bar", ErrorCode::E105);
        assert_label_ref_fails("foo/bar/baz", ErrorCode::E105);
        assert_label_ref_fails("foo \"a\" \"b\"", ErrorCode::E105);
    }

    #[test]
    fn test_version_after_label() {
        let diag = assert_label_ref_fails("foo/bar \"yankee\" @v1", ErrorCode::E106);
        assert_eq!(primary_span(&diag), Span::new(17..20));
    }

    #[test]
    fn test_multiple_versions() {
        let diag = assert_label_ref_fails("foo @v1 @v2", ErrorCode::E107);
        assert_eq!(primary_span(&diag), Span::new(8..11));

        let secondary = diag
            .labels()
            .iter()
            .find(|l| !l.is_primary())
            .expect("first version should be labeled");
        assert_eq!(secondary.span(), Span::new(4..7));
    }

    #[test]
    fn test_spans_account_for_leading_whitespace() {
        let diag = assert_label_ref_fails("   service:foo", ErrorCode::E101);
        assert_eq!(primary_span(&diag), Span::new(3..10));
    }
}

mod record_form_tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_matches_string_form() {
        let record = parse_record_label_ref(
            "api:orders",
            Some("feed".into()),
            attrs(&[("version", "v2")]),
        )
        .unwrap();
        let text = parse_label_ref("api:orders @v2 \"feed\"").unwrap();
        assert_eq!(record, text);
    }

    #[test]
    fn test_inline_version_is_kept() {
        let edge = parse_record_label_ref("api:orders@v3", None, IndexMap::new()).unwrap();
        assert_eq!(edge.version(), Some("v3"));
    }

    #[test]
    fn test_equal_versions_are_accepted() {
        let edge =
            parse_record_label_ref("api:orders@v3", None, attrs(&[("version", "v3")])).unwrap();
        assert_eq!(edge.version(), Some("v3"));
        assert_eq!(edge.attrs().len(), 1);
    }

    #[test]
    fn test_conflicting_versions_are_rejected() {
        let err = parse_record_label_ref("api:orders@v3", None, attrs(&[("version", "v4")]))
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E109));
    }

    #[test]
    fn test_label_inside_ref_is_rejected() {
        let err = parse_record_label_ref("api:orders \"feed\"", None, IndexMap::new())
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E108));
    }

    #[test]
    fn test_malformed_ref_reports_grammar_error() {
        let err = parse_record_label_ref("service:orders", None, IndexMap::new()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
    }
}
