//! Group entities: teams and organizational units that own things.

use crate::{
    entity::{API_VERSION, CatalogEntity, SourceInfo},
    kind::Kind,
    metadata::Metadata,
    reference::Ref,
};

/// Contact profile of a [`Group`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

/// Kind-specific fields of a [`Group`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSpec {
    /// Group type, e.g. `team` or `department`. Required.
    pub group_type: Option<String>,
    /// Contact profile; always present after validation.
    pub profile: Option<Profile>,
    pub parent: Option<Ref>,
    pub children: Vec<Ref>,
    /// Free-form member identifiers.
    pub members: Vec<String>,
}

/// A group entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: GroupSpec,
    pub source: Option<SourceInfo>,
}

impl Group {
    pub fn new(metadata: Metadata, spec: GroupSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            metadata,
            spec,
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the contact profile, or an empty one if none was given.
    pub fn profile(&self) -> Profile {
        self.spec.profile.clone().unwrap_or_default()
    }

    /// Fill in optional nested structures so readers need not handle absence.
    pub fn normalize(&mut self) {
        self.spec.profile.get_or_insert_with(Profile::default);
    }
}

impl CatalogEntity for Group {
    fn kind(&self) -> Kind {
        Kind::Group
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}
