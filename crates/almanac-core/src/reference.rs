//! Structured entity references.
//!
//! A [`Ref`] identifies an entity by `kind:namespace/name`, a [`LabelRef`]
//! additionally carries a display label and attributes for relationship edges.
//! Both are plain values: entities point at each other through references and
//! the repository resolves them, never through owned pointers.
//!
//! The textual syntax is parsed by `almanac-parser`; the [`fmt::Display`]
//! implementations here produce its canonical form.
//!
//! # Examples
//!
//! ```
//! use almanac_core::{kind::Kind, reference::Ref};
//!
//! let r = Ref::new(Some(Kind::Component), "default", "checkout").unwrap();
//! assert_eq!(r.to_string(), "component:checkout");
//!
//! let r = Ref::new(None, "payments", "ledger").unwrap();
//! assert_eq!(r.to_string(), "payments/ledger");
//! ```

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::kind::Kind;

/// Namespace assumed when a reference or entity omits one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Maximum length of a name or namespace.
pub const MAX_NAME_LEN: usize = 63;

/// Attribute key carrying the version of a relationship edge.
pub const VERSION_ATTR: &str = "version";

/// Errors from name and namespace validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("`{0}` is longer than {MAX_NAME_LEN} characters")]
    TooLong(String),

    #[error("`{0}` must start with an ASCII letter")]
    InvalidStart(String),

    #[error("`{0}` must end with an ASCII letter or digit")]
    InvalidEnd(String),

    #[error("`{name}` contains invalid character `{ch}`")]
    InvalidChar { name: String, ch: char },
}

/// Validate a name or namespace.
///
/// Valid names match `^[A-Za-z]([A-Za-z0-9-]*[A-Za-z0-9])?$` and are
/// 1 to [`MAX_NAME_LEN`] characters long.
///
/// # Examples
///
/// ```
/// use almanac_core::reference::validate_name;
///
/// assert!(validate_name("payment-gateway").is_ok());
/// assert!(validate_name("v2").is_ok());
/// assert!(validate_name("2fast").is_err());
/// assert!(validate_name("trailing-").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let Some(first) = name.chars().next() else {
        return Err(NameError::Empty);
    };
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong(name.to_string()));
    }
    if !first.is_ascii_alphabetic() {
        return Err(NameError::InvalidStart(name.to_string()));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(NameError::InvalidChar {
            name: name.to_string(),
            ch,
        });
    }
    if name.ends_with('-') {
        return Err(NameError::InvalidEnd(name.to_string()));
    }
    Ok(())
}

/// The `(namespace, name)` pair identifying an entity within its kind.
///
/// Ordering is by namespace, then name. The display form elides the default
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: String,
    name: String,
}

impl QualifiedName {
    /// Create a qualified name; an empty namespace becomes [`DEFAULT_NAMESPACE`].
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: normalize_namespace(namespace.into()),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != DEFAULT_NAMESPACE {
            write!(f, "{}/", self.namespace)?;
        }
        f.write_str(&self.name)
    }
}

/// A structured reference to a catalog entity.
///
/// The kind is optional: a kind-agnostic reference such as `owner: team-a` is
/// resolved by the field it appears in. The namespace is always present and
/// defaults to [`DEFAULT_NAMESPACE`], so two references to the same entity
/// compare equal whether or not the default namespace was spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref {
    kind: Option<Kind>,
    namespace: String,
    name: String,
}

impl Ref {
    /// Create a validated reference.
    ///
    /// An empty namespace is replaced by [`DEFAULT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] if the namespace or name is malformed.
    pub fn new(
        kind: Option<Kind>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, NameError> {
        let namespace = normalize_namespace(namespace.into());
        let name = name.into();
        validate_name(&namespace)?;
        validate_name(&name)?;
        Ok(Self {
            kind,
            namespace,
            name,
        })
    }

    /// Create a reference without validating the namespace or name.
    ///
    /// Used to derive the reference of an entity from its metadata before
    /// the metadata itself has been validated.
    pub fn from_parts(
        kind: Option<Kind>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            namespace: normalize_namespace(namespace.into()),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of this reference with the given kind.
    pub fn with_kind(&self, kind: Kind) -> Self {
        Self {
            kind: Some(kind),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns the `(namespace, name)` part of this reference.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns `true` if the namespace is [`DEFAULT_NAMESPACE`].
    pub fn is_default_namespace(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kind) = self.kind {
            write!(f, "{kind}:")?;
        }
        if !self.is_default_namespace() {
            write!(f, "{}/", self.namespace)?;
        }
        f.write_str(&self.name)
    }
}

/// A reference annotated with an optional label and attributes.
///
/// Used on relationship edges (`dependsOn`, `providesApis`, `consumesApis`)
/// and on the inverse edges derived from them.
///
/// # Examples
///
/// ```
/// use almanac_core::{kind::Kind, reference::{LabelRef, Ref}};
///
/// let target = Ref::new(Some(Kind::Api), "default", "orders").unwrap();
/// let edge = LabelRef::new(target)
///     .with_attr("version", "v2")
///     .with_label("order feed");
/// assert_eq!(edge.version(), Some("v2"));
/// assert_eq!(edge.to_string(), r#"api:orders @v2 "order feed""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRef {
    reference: Ref,
    label: Option<String>,
    attrs: IndexMap<String, String>,
}

impl LabelRef {
    /// Create a label reference without label or attributes.
    pub fn new(reference: Ref) -> Self {
        Self {
            reference,
            label: None,
            attrs: IndexMap::new(),
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set an attribute, replacing any previous value for the key.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn reference(&self) -> &Ref {
        &self.reference
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn attrs(&self) -> &IndexMap<String, String> {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Returns the `version` attribute, if set.
    pub fn version(&self) -> Option<&str> {
        self.attr(VERSION_ATTR)
    }

    /// Returns a copy of this edge annotation pointing at another entity.
    ///
    /// The inverse of a forward edge keeps the forward edge's label and
    /// attributes but refers back to the source entity.
    pub fn retarget(&self, reference: Ref) -> Self {
        Self {
            reference,
            label: self.label.clone(),
            attrs: self.attrs.clone(),
        }
    }
}

impl From<Ref> for LabelRef {
    fn from(reference: Ref) -> Self {
        Self::new(reference)
    }
}

/// Canonical text form `kind:namespace/name @version "label"`.
///
/// The text grammar has no syntax for attributes other than `version`, so
/// those are left out; read them through [`LabelRef::attrs`].
impl fmt::Display for LabelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference)?;
        if let Some(version) = self.version() {
            write!(f, " @{version}")?;
        }
        if let Some(label) = &self.label {
            f.write_str(" \"")?;
            for ch in label.chars() {
                if ch == '"' || ch == '\\' {
                    f.write_str("\\")?;
                }
                write!(f, "{ch}")?;
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}

fn normalize_namespace(namespace: String) -> String {
    if namespace.is_empty() {
        DEFAULT_NAMESPACE.to_string()
    } else {
        namespace
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn valid_name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?"
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every string produced by the name pattern passes validation.
    fn check_pattern_names_are_valid(name: &str) -> Result<(), TestCaseError> {
        prop_assert!(validate_name(name).is_ok(), "rejected `{name}`");
        Ok(())
    }

    /// Names containing a character outside the alphabet are rejected.
    fn check_foreign_char_rejected(prefix: &str, ch: char) -> Result<(), TestCaseError> {
        let name = format!("{prefix}{ch}z");
        prop_assert!(validate_name(&name).is_err(), "accepted `{name}`");
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn pattern_names_are_valid(name in valid_name_strategy()) {
            check_pattern_names_are_valid(&name)?;
        }

        #[test]
        fn foreign_char_rejected(
            prefix in "[A-Za-z]{1,10}",
            ch in prop::char::any().prop_filter("outside name alphabet", |c| !c.is_ascii_alphanumeric() && *c != '-'),
        ) {
            check_foreign_char_rejected(&prefix, ch)?;
        }
    }
}
