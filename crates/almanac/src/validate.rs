//! Referential-integrity validation.
//!
//! Entities are checked kind by kind in [`VALIDATION_ORDER`], in insertion
//! order within a kind. For each entity:
//!
//! 1. metadata name and namespace are well formed
//! 2. required scalar fields are present
//! 3. every reference resolves to an entity of the expected kind
//!
//! A reference whose explicit kind differs from the kind its field expects
//! is reported as undefined. A `dependsOn` entry must carry an explicit
//! component or resource kind; this is checked before it is resolved.

use log::debug;

use almanac_core::{
    entity::{CatalogEntity, Entity},
    kind::Kind,
    reference::{LabelRef, Ref},
};

use crate::{config::ValidationMode, error::ValidationError, repository::Repository};

/// Kinds in the order their entities are validated.
pub const VALIDATION_ORDER: [Kind; 6] = [
    Kind::Group,
    Kind::Component,
    Kind::Api,
    Kind::Resource,
    Kind::System,
    Kind::Domain,
];

pub(crate) struct Validator<'a> {
    repository: &'a Repository,
    mode: ValidationMode,
    errors: Vec<ValidationError>,
}

impl<'a> Validator<'a> {
    pub fn new(repository: &'a Repository, mode: ValidationMode) -> Self {
        Self {
            repository,
            mode,
            errors: Vec::new(),
        }
    }

    /// Check every entity and return the violations found.
    ///
    /// In fail-fast mode at most one violation is returned.
    pub fn run(mut self) -> Vec<ValidationError> {
        let repository = self.repository;
        for kind in VALIDATION_ORDER {
            for entity in repository.entities_of(kind) {
                let before = self.errors.len();
                self.check_entity(entity);

                if self.errors.len() > before && self.mode == ValidationMode::FailFast {
                    debug!(entity:% = entity.reference(); "Stopping at first invalid entity");
                    self.errors.truncate(before + 1);
                    return self.errors;
                }
            }
        }
        self.errors
    }

    fn check_entity(&mut self, entity: &Entity) {
        let reference = entity.reference();
        if let Err((field, error)) = entity.metadata().check_names() {
            self.errors.push(ValidationError::InvalidName {
                entity: reference,
                field,
                error,
            });
            return;
        }

        match entity {
            Entity::Domain(domain) => {
                let spec = &domain.spec;
                self.require_ref(&reference, "spec.owner", spec.owner.as_ref(), Kind::Group);
                self.optional_ref(
                    &reference,
                    "spec.subdomainOf",
                    spec.subdomain_of.as_ref(),
                    Kind::Domain,
                );
            }
            Entity::System(system) => {
                let spec = &system.spec;
                self.require_ref(&reference, "spec.owner", spec.owner.as_ref(), Kind::Group);
                self.require_ref(&reference, "spec.domain", spec.domain.as_ref(), Kind::Domain);
            }
            Entity::Component(component) => {
                let spec = &component.spec;
                self.require_scalar(&reference, "spec.type", spec.component_type.as_deref());
                self.require_scalar(&reference, "spec.lifecycle", spec.lifecycle.as_deref());
                self.require_ref(&reference, "spec.owner", spec.owner.as_ref(), Kind::Group);
                self.require_ref(&reference, "spec.system", spec.system.as_ref(), Kind::System);
                self.optional_ref(
                    &reference,
                    "spec.subcomponentOf",
                    spec.subcomponent_of.as_ref(),
                    Kind::Component,
                );
                self.edges(&reference, "spec.providesApis", &spec.provides_apis, Kind::Api);
                self.edges(&reference, "spec.consumesApis", &spec.consumes_apis, Kind::Api);
                self.dependencies(&reference, &spec.depends_on);
            }
            Entity::Api(api) => {
                let spec = &api.spec;
                self.require_scalar(&reference, "spec.type", spec.api_type.as_deref());
                self.require_scalar(&reference, "spec.lifecycle", spec.lifecycle.as_deref());
                self.require_ref(&reference, "spec.owner", spec.owner.as_ref(), Kind::Group);
                self.require_ref(&reference, "spec.system", spec.system.as_ref(), Kind::System);
            }
            Entity::Resource(resource) => {
                let spec = &resource.spec;
                self.require_scalar(&reference, "spec.type", spec.resource_type.as_deref());
                self.require_ref(&reference, "spec.owner", spec.owner.as_ref(), Kind::Group);
                self.require_ref(&reference, "spec.system", spec.system.as_ref(), Kind::System);
                self.dependencies(&reference, &spec.depends_on);
            }
            Entity::Group(group) => {
                let spec = &group.spec;
                self.require_scalar(&reference, "spec.type", spec.group_type.as_deref());
                self.optional_ref(&reference, "spec.parent", spec.parent.as_ref(), Kind::Group);
                for child in &spec.children {
                    self.check_ref(&reference, "spec.children", child, Kind::Group);
                }
            }
        }
    }

    fn require_scalar(&mut self, entity: &Ref, field: &'static str, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.errors.push(ValidationError::MissingField {
                entity: entity.clone(),
                field,
            });
        }
    }

    fn require_ref(
        &mut self,
        entity: &Ref,
        field: &'static str,
        target: Option<&Ref>,
        expected: Kind,
    ) {
        match target {
            Some(target) => self.check_ref(entity, field, target, expected),
            None => self.errors.push(ValidationError::MissingField {
                entity: entity.clone(),
                field,
            }),
        }
    }

    fn optional_ref(
        &mut self,
        entity: &Ref,
        field: &'static str,
        target: Option<&Ref>,
        expected: Kind,
    ) {
        if let Some(target) = target {
            self.check_ref(entity, field, target, expected);
        }
    }

    fn edges(&mut self, entity: &Ref, field: &'static str, edges: &[LabelRef], expected: Kind) {
        for edge in edges {
            self.check_ref(entity, field, edge.reference(), expected);
        }
    }

    fn dependencies(&mut self, entity: &Ref, dependencies: &[LabelRef]) {
        const FIELD: &str = "spec.dependsOn";

        for dependency in dependencies {
            let target = dependency.reference();
            match target.kind() {
                Some(kind) if kind.is_dependency_target() => {
                    self.check_ref(entity, FIELD, target, kind);
                }
                _ => self.errors.push(ValidationError::InvalidDependencyKind {
                    entity: entity.clone(),
                    field: FIELD,
                    target: target.clone(),
                }),
            }
        }
    }

    fn check_ref(&mut self, entity: &Ref, field: &'static str, target: &Ref, expected: Kind) {
        let kind_matches = target.kind().is_none_or(|kind| kind == expected);
        if !kind_matches || self.repository.position(expected, target).is_none() {
            self.errors.push(ValidationError::UndefinedReference {
                entity: entity.clone(),
                field,
                target: target.clone(),
                expected,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use almanac_core::{
        entity::{
            Api, ApiSpec, Component, ComponentSpec, Domain, DomainSpec, Group, GroupSpec,
            Resource, ResourceSpec, System, SystemSpec,
        },
        metadata::Metadata,
    };

    use super::*;
    use crate::error::CatalogError;

    fn r(kind: Kind, name: &str) -> Ref {
        Ref::new(Some(kind), "", name).unwrap()
    }

    fn group(name: &str) -> Entity {
        Group::new(
            Metadata::new(name),
            GroupSpec {
                group_type: Some("team".into()),
                ..GroupSpec::default()
            },
        )
        .into()
    }

    fn domain(name: &str) -> Entity {
        Domain::new(
            Metadata::new(name),
            DomainSpec {
                owner: Some(r(Kind::Group, "team")),
                ..DomainSpec::default()
            },
        )
        .into()
    }

    fn system(name: &str) -> Entity {
        System::new(
            Metadata::new(name),
            SystemSpec {
                owner: Some(r(Kind::Group, "team")),
                domain: Some(r(Kind::Domain, "commerce")),
                ..SystemSpec::default()
            },
        )
        .into()
    }

    fn component_spec() -> ComponentSpec {
        ComponentSpec {
            component_type: Some("service".into()),
            lifecycle: Some("production".into()),
            owner: Some(r(Kind::Group, "team")),
            system: Some(r(Kind::System, "shop")),
            ..ComponentSpec::default()
        }
    }

    fn component(name: &str, spec: ComponentSpec) -> Entity {
        Component::new(Metadata::new(name), spec).into()
    }

    fn api(name: &str) -> Entity {
        Api::new(
            Metadata::new(name),
            ApiSpec {
                api_type: Some("openapi".into()),
                lifecycle: Some("production".into()),
                owner: Some(r(Kind::Group, "team")),
                system: Some(r(Kind::System, "shop")),
                ..ApiSpec::default()
            },
        )
        .into()
    }

    fn resource(name: &str) -> Entity {
        Resource::new(
            Metadata::new(name),
            ResourceSpec {
                resource_type: Some("database".into()),
                owner: Some(r(Kind::Group, "team")),
                system: Some(r(Kind::System, "shop")),
                ..ResourceSpec::default()
            },
        )
        .into()
    }

    /// A valid catalog skeleton: team, commerce, shop.
    fn base() -> Vec<Entity> {
        vec![group("team"), domain("commerce"), system("shop")]
    }

    fn validate_with(entities: Vec<Entity>, mode: ValidationMode) -> Vec<ValidationError> {
        let mut repo = Repository::with_mode(mode);
        for entity in entities {
            repo.add_entity(entity).unwrap();
        }
        match repo.validate() {
            Ok(()) => Vec::new(),
            Err(CatalogError::Validation { errors }) => errors,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    fn validate(entities: Vec<Entity>) -> Vec<ValidationError> {
        validate_with(entities, ValidationMode::FailFast)
    }

    #[test]
    fn test_valid_catalog() {
        let mut entities = base();
        entities.push(api("orders"));
        entities.push(resource("db"));
        entities.push(component(
            "web",
            ComponentSpec {
                consumes_apis: vec![LabelRef::new(r(Kind::Api, "orders"))],
                depends_on: vec![LabelRef::new(r(Kind::Resource, "db"))],
                ..component_spec()
            },
        ));
        assert!(validate(entities).is_empty());
    }

    #[test]
    fn test_undefined_owner() {
        let mut entities = base();
        entities.push(component(
            "web",
            ComponentSpec {
                owner: Some(r(Kind::Group, "nobody")),
                ..component_spec()
            },
        ));

        let errors = validate(entities);
        assert_eq!(
            errors,
            vec![ValidationError::UndefinedReference {
                entity: r(Kind::Component, "web"),
                field: "spec.owner",
                target: r(Kind::Group, "nobody"),
                expected: Kind::Group,
            }]
        );
    }

    #[test]
    fn test_kindless_reference_resolves_in_field_kind() {
        let mut entities = base();
        entities.push(component(
            "web",
            ComponentSpec {
                owner: Some(Ref::new(None, "", "team").unwrap()),
                ..component_spec()
            },
        ));
        assert!(validate(entities).is_empty());
    }

    #[test]
    fn test_wrong_explicit_kind_is_undefined() {
        let mut entities = base();
        entities.push(domain("team"));
        entities.push(component(
            "web",
            ComponentSpec {
                owner: Some(r(Kind::Domain, "team")),
                ..component_spec()
            },
        ));

        let errors = validate(entities);
        assert!(matches!(
            &errors[..],
            [ValidationError::UndefinedReference { field: "spec.owner", .. }]
        ));
    }

    #[test]
    fn test_missing_required_fields() {
        let mut entities = base();
        entities.push(component(
            "web",
            ComponentSpec {
                lifecycle: None,
                system: None,
                ..component_spec()
            },
        ));

        let errors = validate_with(entities, ValidationMode::Collect);
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["spec.lifecycle", "spec.system"]);
    }

    #[test]
    fn test_blank_scalar_is_missing() {
        let mut entities = base();
        entities.push(component(
            "web",
            ComponentSpec {
                component_type: Some("  ".into()),
                ..component_spec()
            },
        ));
        assert!(matches!(
            &validate(entities)[..],
            [ValidationError::MissingField { field: "spec.type", .. }]
        ));
    }

    #[test]
    fn test_dependency_on_other_kind_fails_even_if_it_exists() {
        let mut entities = base();
        entities.push(component(
            "web",
            ComponentSpec {
                depends_on: vec![LabelRef::new(r(Kind::Domain, "commerce"))],
                ..component_spec()
            },
        ));

        assert!(matches!(
            &validate(entities)[..],
            [ValidationError::InvalidDependencyKind { .. }]
        ));
    }

    #[test]
    fn test_dependency_without_kind_fails() {
        let mut entities = base();
        entities.push(resource("db"));
        entities.push(component(
            "web",
            ComponentSpec {
                depends_on: vec![LabelRef::new(Ref::new(None, "", "db").unwrap())],
                ..component_spec()
            },
        ));

        assert!(matches!(
            &validate(entities)[..],
            [ValidationError::InvalidDependencyKind { .. }]
        ));
    }

    #[test]
    fn test_invalid_metadata_name() {
        let mut entities = base();
        entities.push(component("Bad_Name", component_spec()));

        let errors = validate(entities);
        assert!(matches!(
            &errors[..],
            [ValidationError::InvalidName { field: "metadata.name", .. }]
        ));
    }

    #[test]
    fn test_fail_fast_reports_first_entity_in_kind_order() {
        // Domain is inserted first but validated after components.
        let entities = vec![
            group("team"),
            Domain::new(Metadata::new("broken"), DomainSpec::default()).into(),
            component("web", ComponentSpec::default()),
        ];

        let errors = validate(entities);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].entity(), &r(Kind::Component, "web"));
    }

    #[test]
    fn test_collect_mode_keeps_order() {
        let entities = vec![
            group("team"),
            Domain::new(Metadata::new("broken"), DomainSpec::default()).into(),
            component("web", ComponentSpec::default()),
        ];

        let errors = validate_with(entities, ValidationMode::Collect);
        let entities: Vec<String> = errors.iter().map(|e| e.entity().to_string()).collect();
        assert_eq!(entities.first().map(String::as_str), Some("component:web"));
        assert_eq!(entities.last().map(String::as_str), Some("domain:broken"));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_group_children_must_exist() {
        let entities = vec![Group::new(
            Metadata::new("team"),
            GroupSpec {
                group_type: Some("team".into()),
                children: vec![r(Kind::Group, "ghost")],
                ..GroupSpec::default()
            },
        )
        .into()];

        assert!(matches!(
            &validate(entities)[..],
            [ValidationError::UndefinedReference { field: "spec.children", .. }]
        ));
    }
}
