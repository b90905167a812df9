//! The catalog repository.
//!
//! A [`Repository`] owns every entity in an arena and indexes them per kind
//! by qualified name. Entities refer to each other through [`Ref`] values
//! which are resolved through these indexes, so the entity graph holds no
//! pointers and the repository is `Send + Sync`.
//!
//! # Lifecycle
//!
//! ```text
//! Building --validate()--> Validated   (read-only, inverse fields populated)
//!          \-------------> Invalid     (terminal, inverse fields untouched)
//! ```

use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use almanac_core::{
    entity::{Api, CatalogEntity, Component, Domain, Entity, Group, Resource, System},
    kind::Kind,
    reference::{QualifiedName, Ref},
};

use crate::{
    config::ValidationMode,
    error::CatalogError,
    relations,
    validate::Validator,
};

/// Build state of a [`Repository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Entities may be added.
    Building,
    /// Validation succeeded; the repository is read-only.
    Validated,
    /// Validation failed; the repository is read-only and unresolved.
    Invalid,
}

/// Store of catalog entities with per-kind lookup.
#[derive(Debug)]
pub struct Repository {
    entities: Vec<Entity>,
    domains: IndexMap<QualifiedName, usize>,
    systems: IndexMap<QualifiedName, usize>,
    components: IndexMap<QualifiedName, usize>,
    apis: IndexMap<QualifiedName, usize>,
    resources: IndexMap<QualifiedName, usize>,
    groups: IndexMap<QualifiedName, usize>,
    state: State,
    mode: ValidationMode,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    /// Create an empty repository that validates in fail-fast mode.
    pub fn new() -> Self {
        Self::with_mode(ValidationMode::default())
    }

    /// Create an empty repository with the given validation mode.
    pub fn with_mode(mode: ValidationMode) -> Self {
        Self {
            entities: Vec::new(),
            domains: IndexMap::new(),
            systems: IndexMap::new(),
            components: IndexMap::new(),
            apis: IndexMap::new(),
            resources: IndexMap::new(),
            groups: IndexMap::new(),
            state: State::Building,
            mode,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of entities in the repository.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entities, in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Add an entity.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Sealed`] if the repository has been validated.
    /// - [`CatalogError::DuplicateEntity`] if an entity of the same kind and
    ///   qualified name exists; the repository is left unchanged.
    pub fn add_entity(&mut self, entity: Entity) -> Result<(), CatalogError> {
        if self.state != State::Building {
            return Err(CatalogError::Sealed);
        }

        let kind = entity.kind();
        let key = entity.metadata().qualified_name();
        if let Some(&existing) = self.index(kind).get(&key) {
            return Err(CatalogError::DuplicateEntity {
                reference: entity.reference(),
                first: self.entities[existing].source().cloned(),
                duplicate: entity.source().cloned(),
            });
        }

        trace!(entity:% = entity.reference(); "Adding entity");
        let position = self.entities.len();
        self.index_mut(kind).insert(key, position);
        self.entities.push(entity);
        Ok(())
    }

    /// Validate every reference and populate inverse relationships.
    ///
    /// Calling this again on a validated repository is a no-op.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] with one violation (fail-fast mode) or
    ///   all of them (collect mode); the repository becomes [`State::Invalid`].
    /// - [`CatalogError::AlreadyFailed`] if a previous validation failed.
    pub fn validate(&mut self) -> Result<(), CatalogError> {
        match self.state {
            State::Validated => {
                debug!("Catalog already validated");
                return Ok(());
            }
            State::Invalid => return Err(CatalogError::AlreadyFailed),
            State::Building => {}
        }

        info!(entities = self.len(), mode:? = self.mode; "Validating catalog");
        let errors = Validator::new(self, self.mode).run();
        if !errors.is_empty() {
            warn!(violations = errors.len(); "Catalog validation failed");
            self.state = State::Invalid;
            return Err(CatalogError::Validation { errors });
        }

        for group in self.entities.iter_mut().filter_map(Entity::as_group_mut) {
            group.normalize();
        }
        relations::populate(self);

        self.state = State::Validated;
        info!("Catalog validated");
        Ok(())
    }

    /// Look up a domain by qualified name.
    pub fn domain(&self, reference: &Ref) -> Option<&Domain> {
        self.lookup(Kind::Domain, reference)
            .and_then(Entity::as_domain)
    }

    /// Look up a system by qualified name.
    pub fn system(&self, reference: &Ref) -> Option<&System> {
        self.lookup(Kind::System, reference)
            .and_then(Entity::as_system)
    }

    /// Look up a component by qualified name.
    pub fn component(&self, reference: &Ref) -> Option<&Component> {
        self.lookup(Kind::Component, reference)
            .and_then(Entity::as_component)
    }

    /// Look up an API by qualified name.
    pub fn api(&self, reference: &Ref) -> Option<&Api> {
        self.lookup(Kind::Api, reference).and_then(Entity::as_api)
    }

    /// Look up a resource by qualified name.
    pub fn resource(&self, reference: &Ref) -> Option<&Resource> {
        self.lookup(Kind::Resource, reference)
            .and_then(Entity::as_resource)
    }

    /// Look up a group by qualified name.
    pub fn group(&self, reference: &Ref) -> Option<&Group> {
        self.lookup(Kind::Group, reference).and_then(Entity::as_group)
    }

    /// Look up an entity by the kind carried in `reference`.
    ///
    /// Returns `None` for a reference without a kind.
    pub fn entity(&self, reference: &Ref) -> Option<&Entity> {
        self.lookup(reference.kind()?, reference)
    }

    /// Find entities of `kind` whose displayed qualified name contains `query`.
    ///
    /// Results are ordered by namespace, then name.
    pub fn find(&self, kind: Kind, query: &str) -> Vec<&Entity> {
        let mut found: Vec<(&QualifiedName, &Entity)> = self
            .index(kind)
            .iter()
            .filter(|(name, _)| name.to_string().contains(query))
            .map(|(name, &position)| (name, &self.entities[position]))
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        found.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn find_domains(&self, query: &str) -> Vec<&Domain> {
        self.find(Kind::Domain, query)
            .into_iter()
            .filter_map(Entity::as_domain)
            .collect()
    }

    pub fn find_systems(&self, query: &str) -> Vec<&System> {
        self.find(Kind::System, query)
            .into_iter()
            .filter_map(Entity::as_system)
            .collect()
    }

    pub fn find_components(&self, query: &str) -> Vec<&Component> {
        self.find(Kind::Component, query)
            .into_iter()
            .filter_map(Entity::as_component)
            .collect()
    }

    pub fn find_apis(&self, query: &str) -> Vec<&Api> {
        self.find(Kind::Api, query)
            .into_iter()
            .filter_map(Entity::as_api)
            .collect()
    }

    pub fn find_resources(&self, query: &str) -> Vec<&Resource> {
        self.find(Kind::Resource, query)
            .into_iter()
            .filter_map(Entity::as_resource)
            .collect()
    }

    pub fn find_groups(&self, query: &str) -> Vec<&Group> {
        self.find(Kind::Group, query)
            .into_iter()
            .filter_map(Entity::as_group)
            .collect()
    }

    /// Number of entities of each kind, in [`Kind::ALL`] order.
    pub fn counts(&self) -> Vec<(Kind, usize)> {
        Kind::ALL
            .into_iter()
            .map(|kind| (kind, self.index(kind).len()))
            .collect()
    }

    /// Entities of `kind` in insertion order.
    pub(crate) fn entities_of(&self, kind: Kind) -> impl Iterator<Item = &Entity> {
        self.index(kind)
            .values()
            .map(|&position| &self.entities[position])
    }

    /// Arena position of the entity of `kind` named by `reference`.
    pub(crate) fn position(&self, kind: Kind, reference: &Ref) -> Option<usize> {
        self.index(kind)
            .get(&reference.qualified_name())
            .copied()
    }

    /// Empty the inverse lists of every entity.
    pub(crate) fn clear_relations(&mut self) {
        self.entities.iter_mut().for_each(Entity::clear_relations);
    }

    pub(crate) fn entity_at_mut(&mut self, position: usize) -> Option<&mut Entity> {
        self.entities.get_mut(position)
    }

    fn lookup(&self, kind: Kind, reference: &Ref) -> Option<&Entity> {
        self.position(kind, reference)
            .map(|position| &self.entities[position])
    }

    fn index(&self, kind: Kind) -> &IndexMap<QualifiedName, usize> {
        match kind {
            Kind::Domain => &self.domains,
            Kind::System => &self.systems,
            Kind::Component => &self.components,
            Kind::Api => &self.apis,
            Kind::Resource => &self.resources,
            Kind::Group => &self.groups,
        }
    }

    fn index_mut(&mut self, kind: Kind) -> &mut IndexMap<QualifiedName, usize> {
        match kind {
            Kind::Domain => &mut self.domains,
            Kind::System => &mut self.systems,
            Kind::Component => &mut self.components,
            Kind::Api => &mut self.apis,
            Kind::Resource => &mut self.resources,
            Kind::Group => &mut self.groups,
        }
    }
}
