//! Domain entities: business areas grouping systems.

use crate::{
    entity::{API_VERSION, CatalogEntity, SourceInfo},
    kind::Kind,
    metadata::Metadata,
    reference::Ref,
};

/// Kind-specific fields of a [`Domain`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSpec {
    pub domain_type: Option<String>,
    /// Owning group. Required.
    pub owner: Option<Ref>,
    pub subdomain_of: Option<Ref>,
}

/// A domain entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: DomainSpec,
    pub source: Option<SourceInfo>,
    systems: Vec<Ref>,
}

impl Domain {
    pub fn new(metadata: Metadata, spec: DomainSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            metadata,
            spec,
            source: None,
            systems: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    /// Systems whose `domain` is this domain.
    pub fn systems(&self) -> &[Ref] {
        &self.systems
    }

    pub fn push_system(&mut self, system: Ref) {
        self.systems.push(system);
    }

    pub fn clear_relations(&mut self) {
        self.systems.clear();
    }
}

impl CatalogEntity for Domain {
    fn kind(&self) -> Kind {
        Kind::Domain
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}
