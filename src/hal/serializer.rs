//! HAL JSON wire format.
//!
//! ```json
//! {
//!   "name": "Ann",
//!   "_links": { "self": { "href": "/users/42" } },
//!   "_embedded": { "acme:order": [ { "id": "7", "_links": { ... } } ] }
//! }
//! ```
//!
//! Flat data fields come first, then `_links`, then `_embedded`. A relation
//! used by more than one link serializes as an array of link objects.

use super::{EmbeddedResources, HalLink, HalResource};
use crate::error::Result;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

const LINKS: &str = "_links";
const EMBEDDED: &str = "_embedded";

struct LinkObject<'a> {
    href: &'a str,
    title: Option<&'a str>,
    name: Option<&'a str>,
    templated: bool,
}

impl Serialize for LinkObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("href", self.href)?;
        if let Some(title) = self.title {
            map.serialize_entry("title", title)?;
        }
        if let Some(name) = self.name {
            map.serialize_entry("name", name)?;
        }
        if self.templated {
            map.serialize_entry("templated", &true)?;
        }
        map.end()
    }
}

impl<'a> From<&'a HalLink> for LinkObject<'a> {
    fn from(link: &'a HalLink) -> Self {
        Self {
            href: &link.href,
            title: link.title.as_deref(),
            name: link.name.as_deref(),
            templated: link.templated,
        }
    }
}

struct LinkGroup<'a>(Vec<LinkObject<'a>>);

impl Serialize for LinkGroup<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            many => {
                let mut seq = serializer.serialize_seq(Some(many.len()))?;
                for link in many {
                    seq.serialize_element(link)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for EmbeddedResources {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.resources.as_slice() {
            [single] if !self.renders_as_array() => single.serialize(serializer),
            many => {
                let mut seq = serializer.serialize_seq(Some(many.len()))?;
                for resource in many {
                    seq.serialize_element(resource)?;
                }
                seq.end()
            }
        }
    }
}

impl HalResource {
    fn link_groups(&self) -> IndexMap<&str, LinkGroup<'_>> {
        let mut groups: IndexMap<&str, LinkGroup<'_>> = IndexMap::new();
        if let Some(href) = self.self_uri() {
            groups.insert(
                "self",
                LinkGroup(vec![LinkObject {
                    href,
                    title: None,
                    name: None,
                    templated: false,
                }]),
            );
        }
        for link in self.links() {
            groups
                .entry(link.rel.as_str())
                .or_insert_with(|| LinkGroup(Vec::new()))
                .0
                .push(LinkObject::from(link));
        }
        groups
    }
}

impl Serialize for HalResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.data() {
            if key != LINKS && key != EMBEDDED {
                map.serialize_entry(key, value)?;
            }
        }
        let links = self.link_groups();
        if !links.is_empty() {
            map.serialize_entry(LINKS, &links)?;
        }
        if !self.embedded().is_empty() {
            map.serialize_entry(EMBEDDED, self.embedded())?;
        }
        map.end()
    }
}

/// Renders [`HalResource`]s to HAL JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalSerializer {
    pretty: bool,
}

impl HalSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn to_value(&self, resource: &HalResource) -> Result<Value> {
        Ok(serde_json::to_value(resource)?)
    }

    pub fn to_string(&self, resource: &HalResource) -> Result<String> {
        let body = if self.pretty {
            serde_json::to_string_pretty(resource)?
        } else {
            serde_json::to_string(resource)?
        };
        Ok(body)
    }
}
