//! Component entities: deployable pieces of software.

use crate::{
    entity::{API_VERSION, CatalogEntity, SourceInfo, SystemPart},
    kind::Kind,
    metadata::Metadata,
    reference::{LabelRef, Ref},
};

/// Kind-specific fields of a [`Component`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Component type, e.g. `service` or `website`. Required.
    pub component_type: Option<String>,
    /// Lifecycle stage, e.g. `production`. Required.
    pub lifecycle: Option<String>,
    /// Owning group. Required.
    pub owner: Option<Ref>,
    /// System the component belongs to. Required.
    pub system: Option<Ref>,
    pub subcomponent_of: Option<Ref>,
    pub provides_apis: Vec<LabelRef>,
    pub consumes_apis: Vec<LabelRef>,
    /// Components and resources this component depends on.
    pub depends_on: Vec<LabelRef>,
}

/// A component entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: ComponentSpec,
    pub source: Option<SourceInfo>,
    dependents: Vec<LabelRef>,
}

impl Component {
    /// Create a component with the default API version and no provenance.
    pub fn new(metadata: Metadata, spec: ComponentSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            metadata,
            spec,
            source: None,
            dependents: Vec::new(),
        }
    }

    /// Set the provenance of this component.
    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    /// Entities whose `dependsOn` points at this component.
    pub fn dependents(&self) -> &[LabelRef] {
        &self.dependents
    }

    /// Record an inverse `dependsOn` edge. Called by the relationship pass.
    pub fn push_dependent(&mut self, dependent: LabelRef) {
        self.dependents.push(dependent);
    }

    pub fn clear_relations(&mut self) {
        self.dependents.clear();
    }
}

impl CatalogEntity for Component {
    fn kind(&self) -> Kind {
        Kind::Component
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}

impl SystemPart for Component {
    fn system(&self) -> Option<&Ref> {
        self.spec.system.as_ref()
    }
}
