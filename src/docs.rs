//! # API Documentation
//!
//! Serializable summaries of the configured resources, for a documentation
//! front end to present.

use crate::config::{scalar_string, ApiConfiguration};
use crate::definition::ResourceDefinitionFactory;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// One entry of the resource index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDocumentation {
    pub name: String,
    pub resource_name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDocumentation {
    pub rel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub templated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedDocumentation {
    pub property: String,
    pub resource: String,
    pub link_name: String,
    pub is_collection: bool,
}

/// Everything known about one resolved resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDocumentation {
    pub api: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_of: Option<String>,
    pub properties: Vec<PropertyDocumentation>,
    pub links: Vec<LinkDocumentation>,
    pub embedded: Vec<EmbeddedDocumentation>,
}

/// Lists the resources of an API with their configured descriptions.
pub fn index(api: &ApiConfiguration) -> Result<Vec<ResourceSummary>> {
    Ok(api
        .resources()?
        .iter()
        .map(|(name, config)| ResourceSummary {
            name: name.clone(),
            description: config.get("description").and_then(scalar_string),
        })
        .collect())
}

/// Resolves `resource_name` and summarizes its definition.
pub fn show(
    factory: &mut ResourceDefinitionFactory,
    resource_name: &str,
) -> Result<ResourceDocumentation> {
    let id = factory.resolve(resource_name)?;
    let definition = factory.get(id);
    let registry = definition.registry();

    Ok(ResourceDocumentation {
        api: factory.api().name().to_owned(),
        name: definition.name().to_owned(),
        description: definition.description().map(str::to_owned),
        alias_for: definition.alias_for().map(|d| d.name().to_owned()),
        collection_of: definition.collection_of().map(|d| d.name().to_owned()),
        properties: definition
            .property_definitions()
            .map(|p| PropertyDocumentation {
                name: p.name().to_owned(),
                resource_name: p.resource_name().to_owned(),
                type_name: p.type_name().map(str::to_owned),
                description: p.description().map(str::to_owned),
                is_static: p.has_static_value(),
            })
            .collect(),
        links: definition
            .link_definitions()
            .into_iter()
            .map(|link| LinkDocumentation {
                rel: link.rel().to_owned(),
                title: link.title().map(str::to_owned),
                resource: link
                    .resource_definition()
                    .map(|target| registry.get(target).name().to_owned()),
                templated: link.is_templated(),
            })
            .collect(),
        embedded: definition
            .embedded_resource_definitions()
            .map(|(property, target)| EmbeddedDocumentation {
                property: property.to_owned(),
                resource: target.name().to_owned(),
                link_name: target.link_name(),
                is_collection: target.is_collection(),
            })
            .collect(),
    })
}

/// Convenience: the documentation as JSON.
pub fn to_json(documentation: &ResourceDocumentation) -> Result<Value> {
    Ok(serde_json::to_value(documentation)?)
}
