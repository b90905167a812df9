//! Relationship population.
//!
//! After validation every forward edge is mirrored onto its target:
//!
//! | Forward edge | Inverse list |
//! |---|---|
//! | `Component.providesApis` | `Api::providers` |
//! | `Component.consumesApis` | `Api::consumers` |
//! | `system` of components, APIs and resources | `System::{components, apis, resources}` |
//! | `System.domain` | `Domain::systems` |
//! | `dependsOn` of components and resources | `Component::dependents`, `Resource::dependents` |
//!
//! Inverse lists are emptied first, so they hold exactly the mirrored forward
//! edges. Edges are collected in a first pass over the arena and applied in a
//! second, so inverse lists follow entity insertion order.

use log::debug;

use almanac_core::{
    entity::{CatalogEntity, Entity},
    kind::Kind,
    reference::{LabelRef, Ref},
};

use crate::repository::Repository;

/// An entry to append to an inverse list of the target entity.
#[derive(Debug)]
enum Inverse {
    Provider(LabelRef),
    Consumer(LabelRef),
    Dependent(LabelRef),
    Member(Ref),
    DomainSystem(Ref),
}

/// Populate every inverse list of a validated repository.
pub(crate) fn populate(repository: &mut Repository) {
    repository.clear_relations();

    let edges = collect(repository);
    let count = edges.len();

    for (position, inverse) in edges {
        let Some(target) = repository.entity_at_mut(position) else {
            continue;
        };
        match (target, inverse) {
            (Entity::Api(api), Inverse::Provider(edge)) => api.push_provider(edge),
            (Entity::Api(api), Inverse::Consumer(edge)) => api.push_consumer(edge),
            (Entity::Component(component), Inverse::Dependent(edge)) => {
                component.push_dependent(edge)
            }
            (Entity::Resource(resource), Inverse::Dependent(edge)) => {
                resource.push_dependent(edge)
            }
            (Entity::System(system), Inverse::Member(member)) => system.push_member(member),
            (Entity::Domain(domain), Inverse::DomainSystem(system)) => {
                domain.push_system(system)
            }
            (entity, inverse) => {
                debug!(
                    entity:% = entity.reference(),
                    inverse:? = inverse;
                    "Skipping mismatched inverse edge"
                );
            }
        }
    }

    debug!(edges = count; "Populated inverse relationships");
}

fn collect(repository: &Repository) -> Vec<(usize, Inverse)> {
    let mut edges = Vec::new();

    for entity in repository.entities() {
        let source = entity.reference();

        match entity {
            Entity::Component(component) => {
                for api in &component.spec.provides_apis {
                    if let Some(position) = repository.position(Kind::Api, api.reference()) {
                        edges.push((position, Inverse::Provider(api.retarget(source.clone()))));
                    }
                }
                for api in &component.spec.consumes_apis {
                    if let Some(position) = repository.position(Kind::Api, api.reference()) {
                        edges.push((position, Inverse::Consumer(api.retarget(source.clone()))));
                    }
                }
                dependents(repository, &source, &component.spec.depends_on, &mut edges);
            }
            Entity::Resource(resource) => {
                dependents(repository, &source, &resource.spec.depends_on, &mut edges);
            }
            Entity::System(system) => {
                if let Some(position) = system
                    .spec
                    .domain
                    .as_ref()
                    .and_then(|domain| repository.position(Kind::Domain, domain))
                {
                    edges.push((position, Inverse::DomainSystem(source.clone())));
                }
            }
            Entity::Domain(_) | Entity::Api(_) | Entity::Group(_) => {}
        }

        if let Some(position) = entity
            .as_system_part()
            .and_then(|part| part.system())
            .and_then(|system| repository.position(Kind::System, system))
        {
            edges.push((position, Inverse::Member(source)));
        }
    }

    edges
}

fn dependents(
    repository: &Repository,
    source: &Ref,
    depends_on: &[LabelRef],
    edges: &mut Vec<(usize, Inverse)>,
) {
    for dependency in depends_on {
        let target = dependency.reference();
        let Some(kind) = target.kind().filter(Kind::is_dependency_target) else {
            continue;
        };
        if let Some(position) = repository.position(kind, target) {
            edges.push((position, Inverse::Dependent(dependency.retarget(source.clone()))));
        }
    }
}
