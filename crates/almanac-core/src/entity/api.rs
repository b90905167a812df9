//! API entities: interfaces provided and consumed by components.

use crate::{
    entity::{API_VERSION, CatalogEntity, SourceInfo, SystemPart},
    kind::Kind,
    metadata::Metadata,
    reference::{LabelRef, Ref},
};

/// Kind-specific fields of an [`Api`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSpec {
    /// API type, e.g. `openapi` or `grpc`. Required.
    pub api_type: Option<String>,
    /// Lifecycle stage. Required.
    pub lifecycle: Option<String>,
    /// Owning group. Required.
    pub owner: Option<Ref>,
    /// System the API belongs to. Required.
    pub system: Option<Ref>,
    /// Free-form definition text, e.g. an inline OpenAPI document.
    pub definition: Option<String>,
}

/// An API entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Api {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: ApiSpec,
    pub source: Option<SourceInfo>,
    providers: Vec<LabelRef>,
    consumers: Vec<LabelRef>,
}

impl Api {
    /// Create an API with the default API version and no provenance.
    pub fn new(metadata: Metadata, spec: ApiSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            metadata,
            spec,
            source: None,
            providers: Vec::new(),
            consumers: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    /// Components that list this API under `providesApis`.
    pub fn providers(&self) -> &[LabelRef] {
        &self.providers
    }

    /// Components that list this API under `consumesApis`.
    pub fn consumers(&self) -> &[LabelRef] {
        &self.consumers
    }

    pub fn push_provider(&mut self, provider: LabelRef) {
        self.providers.push(provider);
    }

    pub fn push_consumer(&mut self, consumer: LabelRef) {
        self.consumers.push(consumer);
    }

    /// Drop every provider and consumer.
    pub fn clear_relations(&mut self) {
        self.providers.clear();
        self.consumers.clear();
    }
}

impl CatalogEntity for Api {
    fn kind(&self) -> Kind {
        Kind::Api
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}

impl SystemPart for Api {
    fn system(&self) -> Option<&Ref> {
        self.spec.system.as_ref()
    }
}
