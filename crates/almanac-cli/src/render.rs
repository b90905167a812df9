//! Plain-text rendering of command output.

use std::fmt::{self, Write};

use almanac::{
    Repository,
    entity::{CatalogEntity, Entity},
    reference::{LabelRef, Ref, VERSION_ATTR},
};

/// Entity counts per kind followed by the total.
pub fn counts(repository: &Repository) -> String {
    let mut out = String::new();
    for (kind, count) in repository.counts() {
        let _ = writeln!(out, "{:<10} {count}", kind.as_str());
    }
    let _ = writeln!(out, "{:<10} {}", "total", repository.len());
    out
}

/// One reference per line.
pub fn list(entities: &[&Entity]) -> String {
    let mut out = String::new();
    for entity in entities {
        let _ = writeln!(out, "{}", entity.reference());
    }
    out
}

/// An entity with its descriptive fields, forward relations and the inverse
/// relations derived during validation.
pub fn describe(entity: &Entity) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_entity(&mut out, entity);
    out
}

fn write_entity(out: &mut String, entity: &Entity) -> fmt::Result {
    let metadata = entity.metadata();
    writeln!(out, "{}", entity.reference())?;
    field(out, "title", metadata.title.as_deref())?;
    field(out, "description", metadata.description.as_deref())?;
    if let Some(source) = entity.source() {
        writeln!(out, "  source: {source}")?;
    }
    if !metadata.tags.is_empty() {
        writeln!(out, "  tags: {}", metadata.tags.join(", "))?;
    }
    for link in &metadata.links {
        match &link.title {
            Some(title) => writeln!(out, "  link: {title} <{}>", link.url)?,
            None => writeln!(out, "  link: {}", link.url)?,
        }
    }

    match entity {
        Entity::Domain(domain) => {
            let spec = &domain.spec;
            field(out, "type", spec.domain_type.as_deref())?;
            reference(out, "owner", spec.owner.as_ref())?;
            reference(out, "subdomainOf", spec.subdomain_of.as_ref())?;
            refs(out, "systems", domain.systems())?;
        }
        Entity::System(system) => {
            let spec = &system.spec;
            field(out, "type", spec.system_type.as_deref())?;
            reference(out, "owner", spec.owner.as_ref())?;
            reference(out, "domain", spec.domain.as_ref())?;
            refs(out, "components", system.components())?;
            refs(out, "apis", system.apis())?;
            refs(out, "resources", system.resources())?;
        }
        Entity::Component(component) => {
            let spec = &component.spec;
            field(out, "type", spec.component_type.as_deref())?;
            field(out, "lifecycle", spec.lifecycle.as_deref())?;
            reference(out, "owner", spec.owner.as_ref())?;
            reference(out, "system", spec.system.as_ref())?;
            reference(out, "subcomponentOf", spec.subcomponent_of.as_ref())?;
            edges(out, "providesApis", &spec.provides_apis)?;
            edges(out, "consumesApis", &spec.consumes_apis)?;
            edges(out, "dependsOn", &spec.depends_on)?;
            edges(out, "dependents", component.dependents())?;
        }
        Entity::Api(api) => {
            let spec = &api.spec;
            field(out, "type", spec.api_type.as_deref())?;
            field(out, "lifecycle", spec.lifecycle.as_deref())?;
            reference(out, "owner", spec.owner.as_ref())?;
            reference(out, "system", spec.system.as_ref())?;
            edges(out, "providers", api.providers())?;
            edges(out, "consumers", api.consumers())?;
        }
        Entity::Resource(resource) => {
            let spec = &resource.spec;
            field(out, "type", spec.resource_type.as_deref())?;
            reference(out, "owner", spec.owner.as_ref())?;
            reference(out, "system", spec.system.as_ref())?;
            edges(out, "dependsOn", &spec.depends_on)?;
            edges(out, "dependents", resource.dependents())?;
        }
        Entity::Group(group) => {
            let spec = &group.spec;
            field(out, "type", spec.group_type.as_deref())?;
            let profile = group.profile();
            field(out, "displayName", profile.display_name.as_deref())?;
            field(out, "email", profile.email.as_deref())?;
            reference(out, "parent", spec.parent.as_ref())?;
            refs(out, "children", &spec.children)?;
            if !spec.members.is_empty() {
                writeln!(out, "  members: {}", spec.members.join(", "))?;
            }
        }
    }
    Ok(())
}

fn field(out: &mut String, name: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(value) => writeln!(out, "  {name}: {value}"),
        None => Ok(()),
    }
}

fn reference(out: &mut String, name: &str, value: Option<&Ref>) -> fmt::Result {
    match value {
        Some(value) => writeln!(out, "  {name}: {value}"),
        None => Ok(()),
    }
}

fn refs(out: &mut String, name: &str, values: &[Ref]) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {name}:")?;
    values.iter().try_for_each(|v| writeln!(out, "    - {v}"))
}

fn edges(out: &mut String, name: &str, values: &[LabelRef]) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {name}:")?;
    for edge in values {
        write!(out, "    - {edge}")?;
        // Display carries the version only
        let attrs: Vec<String> = edge
            .attrs()
            .iter()
            .filter(|(key, _)| key.as_str() != VERSION_ATTR)
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !attrs.is_empty() {
            write!(out, " [{}]", attrs.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
