//! System entities: collections of components, APIs and resources.

use log::warn;

use crate::{
    entity::{API_VERSION, CatalogEntity, SourceInfo},
    kind::Kind,
    metadata::Metadata,
    reference::Ref,
};

/// Kind-specific fields of a [`System`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSpec {
    pub system_type: Option<String>,
    /// Owning group. Required.
    pub owner: Option<Ref>,
    /// Domain the system belongs to. Required.
    pub domain: Option<Ref>,
}

/// A system entity.
///
/// Its member lists are derived from the `system` field of components, APIs
/// and resources once the repository has been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: SystemSpec,
    pub source: Option<SourceInfo>,
    components: Vec<Ref>,
    apis: Vec<Ref>,
    resources: Vec<Ref>,
}

impl System {
    pub fn new(metadata: Metadata, spec: SystemSpec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            metadata,
            spec,
            source: None,
            components: Vec::new(),
            apis: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    pub fn components(&self) -> &[Ref] {
        &self.components
    }

    pub fn apis(&self) -> &[Ref] {
        &self.apis
    }

    pub fn resources(&self) -> &[Ref] {
        &self.resources
    }

    /// Record a member of this system under the list matching its kind.
    ///
    /// Members of kinds that cannot belong to a system are ignored.
    pub fn push_member(&mut self, member: Ref) {
        match member.kind() {
            Some(Kind::Component) => self.components.push(member),
            Some(Kind::Api) => self.apis.push(member),
            Some(Kind::Resource) => self.resources.push(member),
            _ => {
                warn!(system:% = self.reference(), member:% = member; "Ignoring non-member kind");
            }
        }
    }

    /// Drop every recorded member.
    pub fn clear_relations(&mut self) {
        self.components.clear();
        self.apis.clear();
        self.resources.clear();
    }
}

impl CatalogEntity for System {
    fn kind(&self) -> Kind {
        Kind::System
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}
