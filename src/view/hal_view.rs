use super::HalResourceBuilder;
use crate::catalog::PropertyCatalog;
use crate::config::Settings;
use crate::definition::{DefinitionId, ResourceDefinitionFactory};
use crate::docs::{self, ResourceDocumentation, ResourceSummary};
use crate::error::Result;
use crate::hal::{HalResource, HalSerializer};
use crate::object::{EntityIdentity, IdentityLookup, Instance, ObjectAccess, PropertyAccessor};
use crate::routing::UriBuilder;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A rendered HAL response body plus the cache directive of its resource.
#[derive(Debug, Clone, PartialEq)]
pub struct HalDocument {
    pub resource_name: String,
    pub body: String,
    /// `max-age=<seconds>` when the resource configures `cacheLifetime`.
    pub cache_control: Option<String>,
}

/// Renders assigned variables as HAL documents.
///
/// The view owns one [`ResourceDefinitionFactory`], so definitions are cached
/// for as long as the view lives.
pub struct HalView {
    factory: ResourceDefinitionFactory,
    accessor: Box<dyn PropertyAccessor>,
    identity: Box<dyn IdentityLookup>,
    uri_builder: Box<dyn UriBuilder>,
    serializer: HalSerializer,
    variables: IndexMap<String, Instance>,
}

impl HalView {
    pub fn new(
        settings: &Settings,
        api_name: &str,
        catalog: Arc<dyn PropertyCatalog>,
        uri_builder: impl UriBuilder + 'static,
    ) -> Result<Self> {
        Ok(Self {
            factory: ResourceDefinitionFactory::new(settings, api_name, catalog)?,
            accessor: Box::new(ObjectAccess),
            identity: Box::new(EntityIdentity),
            uri_builder: Box::new(uri_builder),
            serializer: HalSerializer::new(),
            variables: IndexMap::new(),
        })
    }

    pub fn with_accessor(mut self, accessor: impl PropertyAccessor + 'static) -> Self {
        self.accessor = Box::new(accessor);
        self
    }

    pub fn with_identity_lookup(mut self, identity: impl IdentityLookup + 'static) -> Self {
        self.identity = Box::new(identity);
        self
    }

    pub fn with_serializer(mut self, serializer: HalSerializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn factory(&mut self) -> &mut ResourceDefinitionFactory {
        &mut self.factory
    }

    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Instance>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn set_variables(&mut self, variables: IndexMap<String, Instance>) {
        self.variables = variables;
    }

    /// The first variable that is neither `settings` nor `_`-prefixed.
    pub fn resource_name(&self) -> Option<&str> {
        self.variables
            .keys()
            .map(String::as_str)
            .find(|name| *name != "settings" && !name.starts_with('_'))
    }

    /// Renders the resource variable; `Ok(None)` when there is nothing to render.
    #[instrument(skip(self))]
    pub fn render(&mut self) -> Result<Option<HalDocument>> {
        let Some(resource_name) = self.resource_name().map(str::to_owned) else {
            debug!("No resource variable assigned");
            return Ok(None);
        };
        let instance = match self.variables.get(&resource_name) {
            Some(instance) if !instance.is_null() => instance.clone(),
            _ => {
                debug!(resource = %resource_name, "Resource variable is null");
                return Ok(None);
            }
        };

        let id = self.factory.resolve(&resource_name)?;
        let resource = self.build(id, &instance)?;
        let body = self.serializer.to_string(&resource)?;
        let cache_control = self
            .factory
            .get(id)
            .cache_lifetime()
            .map(|seconds| format!("max-age={seconds}"));
        info!(resource = %resource_name, bytes = body.len(), "Rendered");
        Ok(Some(HalDocument {
            resource_name,
            body,
            cache_control,
        }))
    }

    /// Renders `instance` as `resource_name` using the current variables as context.
    pub fn render_resource(&mut self, resource_name: &str, instance: &Instance) -> Result<HalResource> {
        let id = self.factory.resolve(resource_name)?;
        self.build(id, instance)
    }

    /// Renders `instance` with the resource bound to its class.
    pub fn render_entity(&mut self, instance: &Instance) -> Result<HalResource> {
        let class_name = instance
            .as_entity()
            .map(|entity| entity.class_name().to_owned())
            .unwrap_or_default();
        let id = self.factory.resolve_by_class(&class_name)?;
        self.build(id, instance)
    }

    pub fn index(&self) -> Result<Vec<ResourceSummary>> {
        docs::index(self.factory.api())
    }

    pub fn describe(&mut self, resource_name: &str) -> Result<ResourceDocumentation> {
        docs::show(&mut self.factory, resource_name)
    }

    fn build(&self, id: DefinitionId, instance: &Instance) -> Result<HalResource> {
        let builder = HalResourceBuilder::new(
            self.accessor.as_ref(),
            self.identity.as_ref(),
            self.uri_builder.as_ref(),
            &self.variables,
        );
        builder.build(self.factory.get(id), instance)
    }
}
