//! Descriptive metadata shared by every catalog entity.

use indexmap::IndexMap;

use crate::{
    kind::Kind,
    reference::{DEFAULT_NAMESPACE, NameError, QualifiedName, Ref, validate_name},
};

/// Metadata of a catalog entity.
///
/// The name and namespace are stored as given by the loader and checked by
/// the repository's validator; an empty namespace means
/// [`DEFAULT_NAMESPACE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub namespace: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: IndexMap<String, String>,
    pub annotations: IndexMap<String, String>,
    pub tags: Vec<String>,
    pub links: Vec<Link>,
}

impl Metadata {
    /// Create metadata for an entity in the default namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns the namespace with the default applied.
    pub fn namespace_or_default(&self) -> &str {
        if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }

    /// Returns the qualified name of the entity.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.namespace.clone(), self.name.clone())
    }

    /// Returns the reference of an entity of the given kind with this metadata.
    pub fn reference(&self, kind: Kind) -> Ref {
        Ref::from_parts(Some(kind), self.namespace.clone(), self.name.clone())
    }

    /// Check that the name and namespace are well formed.
    ///
    /// Returns the offending field (`metadata.name` or `metadata.namespace`)
    /// with the validation error.
    pub fn check_names(&self) -> Result<(), (&'static str, NameError)> {
        validate_name(&self.name).map_err(|err| ("metadata.name", err))?;
        validate_name(self.namespace_or_default()).map_err(|err| ("metadata.namespace", err))
    }

    /// Returns the display title, falling back to the name.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// An external link attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub link_type: Option<String>,
}
