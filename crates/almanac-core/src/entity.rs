//! Catalog entity model.
//!
//! This module contains the six entity kinds of a catalog and the [`Entity`]
//! sum type over them. Entities refer to each other only through
//! [`Ref`]/[`LabelRef`](crate::reference::LabelRef) values; the repository
//! resolves those references and fills in the derived inverse relationships.
//!
//! # Pipeline Position
//!
//! ```text
//! YAML catalog documents
//!     ↓ almanac-parser (decode + parse references)
//! Entities (these types) - forward references only
//!     ↓ Repository::add_entity
//!     ↓ Repository::validate (validator, then relationship pass)
//! Entities with inverse relationships populated
//! ```
//!
//! # Capabilities
//!
//! - [`CatalogEntity`] is implemented by every kind and by [`Entity`].
//! - [`SystemPart`] is implemented by the kinds that belong to exactly one
//!   system: [`Component`], [`Api`] and [`Resource`].

mod api;
mod component;
mod domain;
mod group;
mod resource;
mod system;

pub use api::{Api, ApiSpec};
pub use component::{Component, ComponentSpec};
pub use domain::{Domain, DomainSpec};
pub use group::{Group, GroupSpec, Profile};
pub use resource::{Resource, ResourceSpec};
pub use system::{System, SystemSpec};

use std::{fmt, path::PathBuf};

use crate::{kind::Kind, metadata::Metadata, reference::Ref};

/// API version written by entities constructed in code.
pub const API_VERSION: &str = "almanac.io/v1alpha1";

/// Where an entity was declared.
///
/// Provenance only; it takes no part in identity or validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// File the entity was loaded from, if it came from a file.
    pub path: Option<PathBuf>,
    /// 1-based line of the document that declared the entity.
    pub line: usize,
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}", path.display(), self.line),
            None => write!(f, "<input>:{}", self.line),
        }
    }
}

/// Capabilities shared by every catalog entity.
pub trait CatalogEntity {
    /// The kind of this entity.
    fn kind(&self) -> Kind;

    /// The entity's metadata.
    fn metadata(&self) -> &Metadata;

    /// Where the entity was declared, if known.
    fn source(&self) -> Option<&SourceInfo>;

    /// The reference identifying this entity, derived from kind and metadata.
    fn reference(&self) -> Ref {
        self.metadata().reference(self.kind())
    }
}

/// An entity that belongs to exactly one system.
pub trait SystemPart: CatalogEntity {
    /// The system this entity belongs to; `None` only before validation.
    fn system(&self) -> Option<&Ref>;
}

/// A catalog entity of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Domain(Domain),
    System(System),
    Component(Component),
    Api(Api),
    Resource(Resource),
    Group(Group),
}

impl Entity {
    pub fn as_domain(&self) -> Option<&Domain> {
        match self {
            Entity::Domain(domain) => Some(domain),
            _ => None,
        }
    }

    pub fn as_system(&self) -> Option<&System> {
        match self {
            Entity::System(system) => Some(system),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Entity::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&Api> {
        match self {
            Entity::Api(api) => Some(api),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Entity::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Entity::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_domain_mut(&mut self) -> Option<&mut Domain> {
        match self {
            Entity::Domain(domain) => Some(domain),
            _ => None,
        }
    }

    pub fn as_system_mut(&mut self) -> Option<&mut System> {
        match self {
            Entity::System(system) => Some(system),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut Component> {
        match self {
            Entity::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_api_mut(&mut self) -> Option<&mut Api> {
        match self {
            Entity::Api(api) => Some(api),
            _ => None,
        }
    }

    pub fn as_resource_mut(&mut self) -> Option<&mut Resource> {
        match self {
            Entity::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Entity::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Returns the [`SystemPart`] view of this entity, if its kind has one.
    pub fn as_system_part(&self) -> Option<&dyn SystemPart> {
        match self {
            Entity::Component(component) => Some(component as &dyn SystemPart),
            Entity::Api(api) => Some(api as &dyn SystemPart),
            Entity::Resource(resource) => Some(resource as &dyn SystemPart),
            Entity::Domain(_) | Entity::System(_) | Entity::Group(_) => None,
        }
    }

    /// Empty the inverse relationship lists of this entity.
    pub fn clear_relations(&mut self) {
        match self {
            Entity::Domain(domain) => domain.clear_relations(),
            Entity::System(system) => system.clear_relations(),
            Entity::Component(component) => component.clear_relations(),
            Entity::Api(api) => api.clear_relations(),
            Entity::Resource(resource) => resource.clear_relations(),
            Entity::Group(_) => {}
        }
    }

    fn inner(&self) -> &dyn CatalogEntity {
        match self {
            Entity::Domain(domain) => domain as &dyn CatalogEntity,
            Entity::System(system) => system,
            Entity::Component(component) => component,
            Entity::Api(api) => api,
            Entity::Resource(resource) => resource,
            Entity::Group(group) => group,
        }
    }
}

impl CatalogEntity for Entity {
    fn kind(&self) -> Kind {
        self.inner().kind()
    }

    fn metadata(&self) -> &Metadata {
        self.inner().metadata()
    }

    fn source(&self) -> Option<&SourceInfo> {
        self.inner().source()
    }
}

impl From<Domain> for Entity {
    fn from(domain: Domain) -> Self {
        Entity::Domain(domain)
    }
}

impl From<System> for Entity {
    fn from(system: System) -> Self {
        Entity::System(system)
    }
}

impl From<Component> for Entity {
    fn from(component: Component) -> Self {
        Entity::Component(component)
    }
}

impl From<Api> for Entity {
    fn from(api: Api) -> Self {
        Entity::Api(api)
    }
}

impl From<Resource> for Entity {
    fn from(resource: Resource) -> Self {
        Entity::Resource(resource)
    }
}

impl From<Group> for Entity {
    fn from(group: Group) -> Self {
        Entity::Group(group)
    }
}
