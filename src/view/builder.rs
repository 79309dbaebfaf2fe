//! The rendering engine: definition + instance -> [`HalResource`].

use super::convert::convert_property_value;
use super::uri::{append_query_string, UriResolver};
use crate::config::{string_list, Options};
use crate::definition::{DefinitionRef, ResourceLinkDefinition, ResourcePropertyDefinition};
use crate::error::{HalError, Result};
use crate::hal::{HalLink, HalResource};
use crate::object::{IdentityLookup, Instance, PropertyAccessor};
use crate::routing::UriBuilder;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

/// Walks a definition tree against an object graph.
///
/// The root resource gets flat properties, embedded resources and links.
/// Collection members and embedded references get the abbreviated form: self
/// URI, `id` and the properties listed in `includeProperties`.
pub struct HalResourceBuilder<'a> {
    accessor: &'a dyn PropertyAccessor,
    identity: &'a dyn IdentityLookup,
    uris: UriResolver<'a>,
}

impl<'a> HalResourceBuilder<'a> {
    /// `variables` is the render context used for `{path}` route-value placeholders.
    pub fn new(
        accessor: &'a dyn PropertyAccessor,
        identity: &'a dyn IdentityLookup,
        uri_builder: &'a dyn UriBuilder,
        variables: &'a IndexMap<String, Instance>,
    ) -> Self {
        Self {
            accessor,
            identity,
            uris: UriResolver {
                uri_builder,
                accessor,
                variables,
            },
        }
    }

    /// Renders the full resource for `instance`.
    pub fn build(&self, definition: DefinitionRef<'_>, instance: &Instance) -> Result<HalResource> {
        debug!(resource = %definition, "Building HAL resource");
        let mut resource = HalResource::new(self.self_uri(definition, instance)?);

        if instance.as_entity().is_some() {
            if let Some(id) = self.identity.identifier_for(instance) {
                resource.set_field("id", Value::String(id));
            }
        }
        for property in definition.property_definitions() {
            if let Some(value) = self.property_value(property, instance) {
                resource.set_field(property.resource_name(), value);
            }
        }

        if let Some(element) = definition.collection_of() {
            let key = definition.link_name();
            resource.force_embedded_array(key.clone());
            let options = definition.options();
            for member in instance.elements() {
                let embedded = self.build_embedded(element, member, &options)?;
                resource.add_embedded(key.clone(), embedded);
            }
        } else {
            for (property_name, embedded_definition) in definition.embedded_resource_definitions() {
                self.embed(&mut resource, property_name, embedded_definition, instance)?;
            }
        }

        for link in definition.link_definitions() {
            if let Some(link) = self.build_link(definition, link, instance)? {
                resource.add_link(link);
            }
        }

        Ok(resource)
    }

    fn embed(
        &self,
        resource: &mut HalResource,
        property_name: &str,
        definition: DefinitionRef<'_>,
        instance: &Instance,
    ) -> Result<()> {
        let value = self.accessor.get_property_path(instance, property_name);
        let key = definition.link_name();
        let options = definition.options();

        if let Some(element) = definition.collection_of() {
            resource.force_embedded_array(key.clone());
            for member in value.iter().flat_map(Instance::elements) {
                let embedded = self.build_embedded(element, member, &options)?;
                resource.add_embedded(key.clone(), embedded);
            }
            return Ok(());
        }

        match value {
            Some(value) if !value.is_null() => {
                let embedded = self.build_embedded(definition, &value, &options)?;
                resource.add_embedded(key, embedded);
            }
            _ => debug!(property = property_name, "Embedded property absent, omitted"),
        }
        Ok(())
    }

    /// Abbreviated form: self URI, `id` first, then only the included properties.
    pub fn build_embedded(
        &self,
        definition: DefinitionRef<'_>,
        instance: &Instance,
        options: &Options,
    ) -> Result<HalResource> {
        let mut resource = HalResource::new(self.self_uri(definition, instance)?);
        let id = self
            .identity
            .identifier_for(instance)
            .map_or(Value::Null, Value::String);
        resource.set_field("id", id);

        let include = options
            .get("includeProperties")
            .map(string_list)
            .unwrap_or_default();
        for property in definition
            .property_definitions()
            .filter(|p| include.iter().any(|name| name == p.name()))
        {
            let value = match property.static_value() {
                Some(value) => Some(value.clone()),
                None => self
                    .accessor
                    .get_property_path(instance, property.name())
                    .map(|value| convert_property_value(&value, property, self.identity)),
            };
            if let Some(value) = value {
                resource.set_field(property.resource_name(), value);
            }
        }
        Ok(resource)
    }

    fn property_value(&self, property: &ResourcePropertyDefinition, instance: &Instance) -> Option<Value> {
        let value = match property.static_value() {
            Some(value) => Instance::from(value.clone()),
            None if property.name().contains('.') => {
                self.accessor.get_property_path(instance, property.name())?
            }
            None => self.accessor.get_property(instance, property.name())?,
        };
        Some(convert_property_value(&value, property, self.identity))
    }

    fn self_uri(&self, definition: DefinitionRef<'_>, instance: &Instance) -> Result<Option<String>> {
        self.uris
            .resource_uri(definition, Some(instance))
            .map_err(|source| HalError::ResourceUri {
                resource: definition.to_string(),
                source,
            })
    }

    fn build_link(
        &self,
        definition: DefinitionRef<'_>,
        link: &ResourceLinkDefinition,
        instance: &Instance,
    ) -> Result<Option<HalLink>> {
        let href = match (link.route_values(), link.resource_definition()) {
            (Some(route_values), _) => {
                Some(self.uris.build(route_values, None, link.is_absolute(), Some(instance)))
            }
            (None, Some(target)) => {
                let target = definition.registry().get(target);
                self.uris.resource_uri(target, None).transpose()
            }
            (None, None) => None,
        };
        let href = match href {
            Some(href) => href.map_err(|source| HalError::LinkResolution {
                rel: link.rel().to_owned(),
                resource: definition.to_string(),
                source,
            })?,
            None => {
                warn!(rel = link.rel(), resource = %definition, "Link target has no route, skipped");
                return Ok(None);
            }
        };
        let href = match link.append_query_string() {
            Some(append) => append_query_string(&href, append),
            None => href,
        };
        Ok(Some(HalLink {
            href,
            rel: link.rel().to_owned(),
            title: link.title().map(str::to_owned),
            name: link.name().map(str::to_owned),
            templated: link.is_templated(),
        }))
    }
}
