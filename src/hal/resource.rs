use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A typed link of a rendered resource.
#[derive(Debug, Clone, PartialEq)]
pub struct HalLink {
    pub href: String,
    pub rel: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub templated: bool,
}

impl HalLink {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            title: None,
            name: None,
            templated: false,
        }
    }
}

/// The resources embedded under one key.
///
/// `force_array` keeps the array form even when only one resource (or none)
/// was embedded; otherwise a single resource renders as an object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedResources {
    pub resources: Vec<HalResource>,
    pub force_array: bool,
}

impl EmbeddedResources {
    pub fn renders_as_array(&self) -> bool {
        self.force_array || self.resources.len() != 1
    }
}

/// The in-memory HAL resource produced by the builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HalResource {
    self_uri: Option<String>,
    data: Map<String, Value>,
    embedded: IndexMap<String, EmbeddedResources>,
    links: Vec<HalLink>,
}

impl HalResource {
    pub fn new(self_uri: Option<String>) -> Self {
        Self {
            self_uri,
            ..Self::default()
        }
    }

    pub fn self_uri(&self) -> Option<&str> {
        self.self_uri.as_deref()
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn embedded(&self) -> &IndexMap<String, EmbeddedResources> {
        &self.embedded
    }

    /// Embeds `resource` under `key`, appending to what is already there.
    pub fn add_embedded(&mut self, key: impl Into<String>, resource: HalResource) {
        self.embedded
            .entry(key.into())
            .or_default()
            .resources
            .push(resource);
    }

    /// Marks `key` as an array, creating it empty if needed.
    pub fn force_embedded_array(&mut self, key: impl Into<String>) {
        self.embedded.entry(key.into()).or_default().force_array = true;
    }

    pub fn embedded_resources(&self, key: &str) -> &[HalResource] {
        self.embedded
            .get(key)
            .map(|e| e.resources.as_slice())
            .unwrap_or_default()
    }

    pub fn links(&self) -> &[HalLink] {
        &self.links
    }

    pub fn add_link(&mut self, link: HalLink) {
        self.links.push(link);
    }

    pub fn link(&self, rel: &str) -> Option<&HalLink> {
        self.links.iter().find(|link| link.rel == rel)
    }
}
