//! Elaboration of decoded documents into catalog entities.
//!
//! This module turns a [`RawEntity`] into an [`Entity`], parsing every
//! reference field with the reference grammar. Reference errors are spanned
//! against the whole source so they can be rendered next to the offending
//! document.

use std::path::Path;

use log::trace;

use almanac_core::{
    entity::{
        Api, ApiSpec, CatalogEntity, Component, ComponentSpec, Domain, DomainSpec, Entity, Group,
        GroupSpec, Profile, Resource, ResourceSpec, SourceInfo, System, SystemSpec,
    },
    metadata::{Link, Metadata},
    reference::{LabelRef, Ref},
};

use crate::{
    document::{
        Chunk, RawApiSpec, RawComponentSpec, RawDocument, RawDomainSpec, RawEntity, RawGroupSpec,
        RawLabelRef, RawMetadata, RawResourceSpec, RawSystemSpec,
    },
    error::Diagnostic,
    reference::{parse_label_ref, parse_record_label_ref, parse_ref},
    span::Span,
};

/// Elaborates the documents of one catalog source.
pub(crate) struct Builder<'a> {
    path: Option<&'a Path>,
    chunk: Chunk<'a>,
    /// Key of the last located reference and the document-relative position
    /// after it.
    last: Option<(&'static str, usize)>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Builder<'a> {
    pub fn new(path: Option<&'a Path>, chunk: Chunk<'a>) -> Self {
        Self {
            path,
            chunk,
            last: None,
            diagnostics: Vec::new(),
        }
    }

    /// Elaborate one document.
    ///
    /// # Errors
    ///
    /// Returns every reference diagnostic found in the document.
    pub fn build(mut self, raw: RawEntity) -> Result<Entity, Vec<Diagnostic>> {
        let entity = match raw {
            RawEntity::Domain(doc) => self.domain(doc),
            RawEntity::System(doc) => self.system(doc),
            RawEntity::Component(doc) => self.component(doc),
            RawEntity::Api(doc) => self.api(doc),
            RawEntity::Resource(doc) => self.resource(doc),
            RawEntity::Group(doc) => self.group(doc),
        };

        if self.diagnostics.is_empty() {
            trace!(entity:% = entity.reference(), line = self.chunk.line; "Elaborated document");
            Ok(entity)
        } else {
            Err(self.diagnostics)
        }
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo {
            path: self.path.map(Path::to_path_buf),
            line: self.chunk.line,
        }
    }

    /// Locate the value `raw` of `key` in the document.
    ///
    /// Items of one list are searched in order, so repeated values map to
    /// successive occurrences.
    fn locate(&mut self, key: &'static str, raw: &str) -> Option<Span> {
        let from = match self.last {
            Some((last, end)) if last == key => end,
            _ => self.chunk.key_offset(key).unwrap_or(0),
        };
        let span = self.chunk.locate(raw, from)?;
        self.last = Some((key, span.end() - self.chunk.offset));
        Some(span)
    }

    /// Record a diagnostic whose spans are relative to the value `raw`.
    ///
    /// When the value is not found verbatim the labels mark the line of `key`.
    fn emit(&mut self, key: &'static str, raw: &str, diagnostic: Diagnostic) {
        let diagnostic = match self.locate(key, raw) {
            Some(span) => diagnostic.shifted(span.start()),
            None => {
                let line = self.chunk.key_line(key).unwrap_or(self.chunk.first_line);
                diagnostic.relocated(line)
            }
        };
        self.diagnostics.push(diagnostic);
    }

    fn reference(&mut self, key: &'static str, raw: Option<String>) -> Option<Ref> {
        let raw = raw?;
        match parse_ref(&raw) {
            Ok(reference) => {
                self.locate(key, &raw);
                Some(reference)
            }
            Err(diag) => {
                self.emit(key, &raw, diag);
                None
            }
        }
    }

    fn references(&mut self, key: &'static str, raw: Vec<String>) -> Vec<Ref> {
        raw.into_iter()
            .filter_map(|r| self.reference(key, Some(r)))
            .collect()
    }

    fn label_refs(&mut self, key: &'static str, raw: Vec<RawLabelRef>) -> Vec<LabelRef> {
        raw.into_iter()
            .filter_map(|raw| {
                let (text, result) = match raw {
                    RawLabelRef::Text(text) => {
                        let result = parse_label_ref(&text);
                        (text, result)
                    }
                    RawLabelRef::Record(record) => {
                        let result =
                            parse_record_label_ref(&record.reference, record.label, record.attrs);
                        (record.reference, result)
                    }
                };
                match result {
                    Ok(edge) => {
                        self.locate(key, &text);
                        Some(edge)
                    }
                    Err(diag) => {
                        self.emit(key, &text, diag);
                        None
                    }
                }
            })
            .collect()
    }

    fn domain(&mut self, doc: RawDocument<RawDomainSpec>) -> Entity {
        let spec = DomainSpec {
            domain_type: doc.spec.domain_type,
            owner: self.reference("owner", doc.spec.owner),
            subdomain_of: self.reference("subdomainOf", doc.spec.subdomain_of),
        };
        let mut domain = Domain::new(metadata(doc.metadata), spec).with_source(self.source_info());
        domain.api_version = doc.api_version;
        domain.into()
    }

    fn system(&mut self, doc: RawDocument<RawSystemSpec>) -> Entity {
        let spec = SystemSpec {
            system_type: doc.spec.system_type,
            owner: self.reference("owner", doc.spec.owner),
            domain: self.reference("domain", doc.spec.domain),
        };
        let mut system = System::new(metadata(doc.metadata), spec).with_source(self.source_info());
        system.api_version = doc.api_version;
        system.into()
    }

    fn component(&mut self, doc: RawDocument<RawComponentSpec>) -> Entity {
        let raw = doc.spec;
        let spec = ComponentSpec {
            component_type: raw.component_type,
            lifecycle: raw.lifecycle,
            owner: self.reference("owner", raw.owner),
            system: self.reference("system", raw.system),
            subcomponent_of: self.reference("subcomponentOf", raw.subcomponent_of),
            provides_apis: self.label_refs("providesApis", raw.provides_apis),
            consumes_apis: self.label_refs("consumesApis", raw.consumes_apis),
            depends_on: self.label_refs("dependsOn", raw.depends_on),
        };
        let mut component =
            Component::new(metadata(doc.metadata), spec).with_source(self.source_info());
        component.api_version = doc.api_version;
        component.into()
    }

    fn api(&mut self, doc: RawDocument<RawApiSpec>) -> Entity {
        let raw = doc.spec;
        let spec = ApiSpec {
            api_type: raw.api_type,
            lifecycle: raw.lifecycle,
            owner: self.reference("owner", raw.owner),
            system: self.reference("system", raw.system),
            definition: raw.definition,
        };
        let mut api = Api::new(metadata(doc.metadata), spec).with_source(self.source_info());
        api.api_version = doc.api_version;
        api.into()
    }

    fn resource(&mut self, doc: RawDocument<RawResourceSpec>) -> Entity {
        let raw = doc.spec;
        let spec = ResourceSpec {
            resource_type: raw.resource_type,
            owner: self.reference("owner", raw.owner),
            system: self.reference("system", raw.system),
            depends_on: self.label_refs("dependsOn", raw.depends_on),
        };
        let mut resource =
            Resource::new(metadata(doc.metadata), spec).with_source(self.source_info());
        resource.api_version = doc.api_version;
        resource.into()
    }

    fn group(&mut self, doc: RawDocument<RawGroupSpec>) -> Entity {
        let raw = doc.spec;
        let spec = GroupSpec {
            group_type: raw.group_type,
            profile: raw.profile.map(|p| Profile {
                display_name: p.display_name,
                email: p.email,
                picture: p.picture,
            }),
            parent: self.reference("parent", raw.parent),
            children: self.references("children", raw.children),
            members: raw.members,
        };
        let mut group = Group::new(metadata(doc.metadata), spec).with_source(self.source_info());
        group.api_version = doc.api_version;
        group.into()
    }
}

fn metadata(raw: RawMetadata) -> Metadata {
    Metadata {
        name: raw.name,
        namespace: raw.namespace,
        title: raw.title,
        description: raw.description,
        labels: raw.labels,
        annotations: raw.annotations,
        tags: raw.tags,
        links: raw
            .links
            .into_iter()
            .map(|l| Link {
                url: l.url,
                title: l.title,
                icon: l.icon,
                link_type: l.link_type,
            })
            .collect(),
    }
}
