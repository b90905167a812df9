//! Resource entities: infrastructure a system needs at runtime.

use crate::{
    entity::{API_VERSION, CatalogEntity, SourceInfo, SystemPart},
    kind::Kind,
    metadata::Metadata,
    reference::{LabelRef, Ref},
};

/// Kind-specific fields of a [`Resource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Resource type, e.g. `database` or `s3-bucket`. Required.
    pub resource_type: Option<String>,
    /// Owning group. Required.
    pub owner: Option<Ref>,
    /// System the resource belongs to. Required.
    pub system: Option<Ref>,
    pub depends_on: Vec<LabelRef>,
}

/// A resource entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: ResourceSpec,
    pub source: Option<SourceInfo>,
    dependents: Vec<LabelRef>,
}

impl Resource {
    pub fn new(metadata: Metadata, spec: ResourceSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            metadata,
            spec,
            source: None,
            dependents: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    /// Entities whose `dependsOn` points at this resource.
    pub fn dependents(&self) -> &[LabelRef] {
        &self.dependents
    }

    pub fn push_dependent(&mut self, dependent: LabelRef) {
        self.dependents.push(dependent);
    }

    pub fn clear_relations(&mut self) {
        self.dependents.clear();
    }
}

impl CatalogEntity for Resource {
    fn kind(&self) -> Kind {
        Kind::Resource
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}

impl SystemPart for Resource {
    fn system(&self) -> Option<&Ref> {
        self.spec.system.as_ref()
    }
}
