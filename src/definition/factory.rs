//! Builds [`ResourceDefinition`]s from configuration.

use super::{
    DefinitionId, DefinitionRef, DefinitionRegistry, ResourceDefinition, ResourceLinkDefinition,
    ResourcePropertyDefinition,
};
use crate::catalog::{ClassSchema, PropertyCatalog};
use crate::config::{is_truthy, scalar_string, string_list, ApiConfiguration, Options, Settings};
use crate::error::{HalError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// The API used when none is named.
pub const DEFAULT_API: &str = "default";

/// Resolves resource names into definition trees.
///
/// Every definition is registered in the registry *before* the factory
/// recurses into the resources it references, so cyclic configurations
/// terminate and shared sub-definitions are built once.
pub struct ResourceDefinitionFactory {
    api: ApiConfiguration,
    catalog: Arc<dyn PropertyCatalog>,
    registry: DefinitionRegistry,
}

impl ResourceDefinitionFactory {
    pub fn new(
        settings: &Settings,
        api_name: &str,
        catalog: Arc<dyn PropertyCatalog>,
    ) -> Result<Self> {
        Ok(Self {
            api: settings.api(api_name)?,
            catalog,
            registry: DefinitionRegistry::new(),
        })
    }

    pub fn api(&self) -> &ApiConfiguration {
        &self.api
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn get(&self, id: DefinitionId) -> DefinitionRef<'_> {
        self.registry.get(id)
    }

    /// Resolves the resource bound to `class_name`.
    pub fn resolve_by_class(&mut self, class_name: &str) -> Result<DefinitionId> {
        let resource_name = self.api.resource_name_for_class(class_name)?;
        self.resolve(&resource_name)
    }

    /// Resolves a resource by name, building it on first use.
    ///
    /// A failed resolution leaves the registry as it was before the call.
    pub fn resolve(&mut self, resource_name: &str) -> Result<DefinitionId> {
        let checkpoint = self.registry.len();
        match self.build(resource_name) {
            Ok(id) => Ok(id),
            Err(err) => {
                let discarded = self.registry.len() - checkpoint;
                self.registry.truncate(checkpoint);
                debug!(
                    resource = resource_name,
                    discarded, "Resolution failed, registry rolled back"
                );
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(api = %self.api.name()))]
    fn build(&mut self, resource_name: &str) -> Result<DefinitionId> {
        if let Some(id) = self.registry.lookup(resource_name) {
            trace!(resource = resource_name, "Cache hit");
            return Ok(id);
        }
        let configuration = self.api.merged_resource(resource_name)?;
        debug!(resource = resource_name, "Building resource definition");

        let id = self
            .registry
            .insert(ResourceDefinition::new(resource_name, configuration.clone()));

        if let Some(links) = configuration.get("links") {
            let links = links.as_object().ok_or_else(|| {
                HalError::configuration(format!(
                    "\"links\" of resource \"{resource_name}\" must be a map"
                ))
            })?;
            for (rel, link_configuration) in links {
                let link = self.build_link(resource_name, rel, link_configuration)?;
                self.registry.definition_mut(id).add_link_definition(link);
            }
        }

        if let Some(target) = configuration.get("aliasFor") {
            let target = self.resolve_reference(resource_name, "aliasFor", target)?;
            self.registry.definition_mut(id).set_alias_for(Some(target));
            self.reject_cycle(id, resource_name, |definition| definition.set_alias_for(None))?;
            return Ok(id);
        }

        if let Some(target) = configuration.get("collectionOf") {
            let target = self.resolve_reference(resource_name, "collectionOf", target)?;
            self.registry.definition_mut(id).set_collection_of(Some(target));
            self.reject_cycle(id, resource_name, |definition| {
                definition.set_collection_of(None)
            })?;
            return Ok(id);
        }

        let class_name = configuration.get("className").and_then(Value::as_str);
        let catalog = Arc::clone(&self.catalog);
        let schema = class_name.and_then(|class| {
            let schema = catalog.class_schema(class);
            if schema.is_none() {
                debug!(resource = resource_name, class, "No schema registered for class");
            }
            schema
        });

        if let Some(description) = configuration.get("description").and_then(scalar_string) {
            self.registry.definition_mut(id).set_description(description);
        } else if let Some(description) = schema.and_then(|s| s.description.clone()) {
            self.registry.definition_mut(id).set_description(description);
        }

        for property_name in resource_property_names(&configuration, schema) {
            let property_configuration = configuration
                .get("properties")
                .and_then(|properties| properties.get(&property_name))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            let mut property =
                build_property(&property_name, &property_configuration, schema);

            let field = schema.and_then(|s| s.field_schema(&property_name));
            match field {
                Some(field) if !field.is_simple() => {
                    let target = self.build(&property_name)?;
                    self.registry
                        .definition_mut(id)
                        .add_embedded_resource_definition(property_name, target);
                }
                Some(field) => {
                    if property.type_name().is_none() {
                        if let Some(type_name) = &field.type_name {
                            property.set_type(type_name.clone());
                        }
                    }
                    self.registry.definition_mut(id).add_property_definition(property);
                }
                None => self.registry.definition_mut(id).add_property_definition(property),
            }
        }

        Ok(id)
    }

    fn resolve_reference(
        &mut self,
        resource_name: &str,
        key: &str,
        target: &Value,
    ) -> Result<DefinitionId> {
        let target = target.as_str().ok_or_else(|| {
            HalError::configuration(format!(
                "\"{key}\" of resource \"{resource_name}\" must be a resource name"
            ))
        })?;
        self.build(target)
    }

    fn reject_cycle(
        &mut self,
        id: DefinitionId,
        resource_name: &str,
        unlink: impl FnOnce(&mut ResourceDefinition),
    ) -> Result<()> {
        if self.registry.has_reference_cycle(id) {
            unlink(self.registry.definition_mut(id));
            return Err(HalError::configuration(format!(
                "Resource \"{resource_name}\" refers back to itself through aliasFor/collectionOf"
            )));
        }
        Ok(())
    }

    fn build_link(
        &mut self,
        resource_name: &str,
        rel: &str,
        configuration: &Value,
    ) -> Result<ResourceLinkDefinition> {
        let configuration = configuration.as_object().ok_or_else(|| {
            HalError::configuration(format!(
                "Link \"{rel}\" of resource \"{resource_name}\" must be a map"
            ))
        })?;
        let mut link = ResourceLinkDefinition::new(rel);
        if let Some(title) = configuration.get("title").and_then(scalar_string) {
            link.set_title(title);
        }
        if let Some(name) = configuration.get("name").and_then(scalar_string) {
            link.set_name(name);
        }
        if let Some(target) = configuration.get("resource") {
            let target = self.resolve_reference(resource_name, "resource", target)?;
            link.set_resource_definition(target);
        }
        match configuration.get("routeValues") {
            Some(Value::Object(route_values)) => link.set_route_values(route_values.clone()),
            Some(_) => {
                return Err(HalError::configuration(format!(
                    "\"routeValues\" of link \"{rel}\" (resource \"{resource_name}\") must be a map"
                )))
            }
            None => {}
        }
        if let Some(append) = configuration.get("append").and_then(scalar_string) {
            link.set_append_query_string(append);
        }
        if let Some(absolute) = configuration.get("absolute") {
            link.set_absolute(is_truthy(absolute));
        }
        if let Some(templated) = configuration.get("templated") {
            link.set_templated(is_truthy(templated));
        }
        if link.route_values().is_none() && link.resource_definition().is_none() {
            return Err(HalError::configuration(format!(
                "Link \"{rel}\" of resource \"{resource_name}\" needs \"resource\" or \"routeValues\""
            )));
        }
        Ok(link)
    }
}

fn build_property(
    name: &str,
    configuration: &Options,
    schema: Option<&ClassSchema>,
) -> ResourcePropertyDefinition {
    let mut property = ResourcePropertyDefinition::new(name);
    if let Some(description) = configuration.get("description").and_then(scalar_string) {
        property.set_description(description);
    } else if let Some(description) = schema
        .and_then(|s| s.property(name))
        .and_then(|p| p.description.clone())
    {
        property.set_description(description);
    }
    if let Some(value) = configuration.get("staticValue") {
        property.set_static_value(value.clone());
    }
    if let Some(resource_name) = configuration.get("resourceName").and_then(scalar_string) {
        property.set_resource_name(resource_name);
    }
    if let Some(type_name) = configuration.get("type").and_then(scalar_string) {
        property.set_type(type_name);
    }
    property
}

/// Candidate names are the class's gettable members followed by the configured
/// `properties` keys; `includeProperties` intersects, `excludeProperties` subtracts.
fn resource_property_names(configuration: &Options, schema: Option<&ClassSchema>) -> Vec<String> {
    let mut names: Vec<String> = schema
        .map(ClassSchema::gettable_property_names)
        .unwrap_or_default();
    if let Some(Value::Object(properties)) = configuration.get("properties") {
        for key in properties.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    if let Some(include) = configuration.get("includeProperties") {
        let include = string_list(include);
        names.retain(|name| include.contains(name));
    }
    if let Some(exclude) = configuration.get("excludeProperties") {
        let exclude = string_list(exclude);
        names.retain(|name| !exclude.contains(name));
    }
    names
}
