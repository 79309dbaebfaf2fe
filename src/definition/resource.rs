use super::{ResourceLinkDefinition, ResourcePropertyDefinition};
use crate::config::{merge_overrule, scalar_string, Options};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Handle of a definition inside a [`DefinitionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefinitionId(usize);

/// One named resource type, as stored in the registry.
///
/// Relations to other definitions (`alias_for`, `collection_of`, embedded
/// resources, link targets) are [`DefinitionId`] handles. Use
/// [`DefinitionRegistry::get`] to obtain a [`DefinitionRef`] that follows them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    name: String,
    options: Options,
    description: Option<String>,
    alias_for: Option<DefinitionId>,
    collection_of: Option<DefinitionId>,
    property_definitions: IndexMap<String, ResourcePropertyDefinition>,
    link_definitions: IndexMap<String, ResourceLinkDefinition>,
    embedded_resource_definitions: IndexMap<String, DefinitionId>,
}

impl ResourceDefinition {
    pub fn new(name: impl Into<String>, options: Options) -> Self {
        Self {
            name: name.into(),
            options,
            description: None,
            alias_for: None,
            collection_of: None,
            property_definitions: IndexMap::new(),
            link_definitions: IndexMap::new(),
            embedded_resource_definitions: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition's own options, before alias/collection merging.
    pub fn local_options(&self) -> &Options {
        &self.options
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn alias_for(&self) -> Option<DefinitionId> {
        self.alias_for
    }

    pub fn set_alias_for(&mut self, target: Option<DefinitionId>) {
        self.alias_for = target;
    }

    pub fn collection_of(&self) -> Option<DefinitionId> {
        self.collection_of
    }

    pub fn set_collection_of(&mut self, target: Option<DefinitionId>) {
        self.collection_of = target;
    }

    pub fn add_property_definition(&mut self, property: ResourcePropertyDefinition) {
        self.property_definitions
            .insert(property.name().to_owned(), property);
    }

    pub fn add_link_definition(&mut self, link: ResourceLinkDefinition) {
        self.link_definitions.insert(link.rel().to_owned(), link);
    }

    pub fn add_embedded_resource_definition(
        &mut self,
        property_name: impl Into<String>,
        target: DefinitionId,
    ) {
        self.embedded_resource_definitions
            .insert(property_name.into(), target);
    }
}

/// Owns every definition built during one resolution session.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<ResourceDefinition>,
    by_name: HashMap<String, DefinitionId>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its name and returns its handle.
    pub fn insert(&mut self, definition: ResourceDefinition) -> DefinitionId {
        let id = DefinitionId(self.definitions.len());
        self.by_name.insert(definition.name().to_owned(), id);
        self.definitions.push(definition);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<DefinitionId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Drops every definition registered at or after position `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.definitions.truncate(len);
        self.by_name.retain(|_, id| id.0 < len);
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// # Panics
    /// When `id` was not issued by this registry.
    pub fn get(&self, id: DefinitionId) -> DefinitionRef<'_> {
        assert!(id.0 < self.definitions.len(), "unknown definition {id:?}");
        DefinitionRef { registry: self, id }
    }

    pub(crate) fn definition_mut(&mut self, id: DefinitionId) -> &mut ResourceDefinition {
        &mut self.definitions[id.0]
    }

    fn raw(&self, id: DefinitionId) -> &ResourceDefinition {
        &self.definitions[id.0]
    }

    /// Follows alias/collection pointers from `id`; `true` if the walk comes back around.
    pub(crate) fn has_reference_cycle(&self, id: DefinitionId) -> bool {
        let mut seen = vec![id];
        let mut current = id;
        loop {
            let raw = self.raw(current);
            let Some(next) = raw.alias_for.or(raw.collection_of) else {
                return false;
            };
            if seen.contains(&next) {
                return true;
            }
            seen.push(next);
            current = next;
        }
    }
}

/// A borrowed view of one definition that resolves alias and collection relations.
#[derive(Clone, Copy)]
pub struct DefinitionRef<'a> {
    registry: &'a DefinitionRegistry,
    id: DefinitionId,
}

impl<'a> DefinitionRef<'a> {
    pub fn id(&self) -> DefinitionId {
        self.id
    }

    pub fn definition(&self) -> &'a ResourceDefinition {
        self.registry.raw(self.id)
    }

    pub fn name(&self) -> &'a str {
        self.definition().name()
    }

    pub fn description(&self) -> Option<&'a str> {
        self.definition().description()
    }

    pub fn alias_for(&self) -> Option<DefinitionRef<'a>> {
        self.definition().alias_for.map(|id| self.registry.get(id))
    }

    pub fn is_alias(&self) -> bool {
        self.definition().alias_for.is_some()
    }

    /// Follows the alias chain to the definition that carries the shape.
    pub fn resolve_alias(&self) -> DefinitionRef<'a> {
        let mut current = *self;
        while let Some(target) = current.alias_for() {
            current = target;
        }
        current
    }

    pub fn collection_of(&self) -> Option<DefinitionRef<'a>> {
        match self.alias_for() {
            Some(target) => target.collection_of(),
            None => self.definition().collection_of.map(|id| self.registry.get(id)),
        }
    }

    pub fn is_collection(&self) -> bool {
        self.collection_of().is_some()
    }

    /// Effective options.
    ///
    /// Alias and collection definitions start from their target's effective
    /// options and overrule them with their own. `includeProperties` is never
    /// merged: the local value, when present, wins outright.
    pub fn options(&self) -> Options {
        let local = self.definition().local_options();
        let base = match (self.alias_for(), self.definition().collection_of) {
            (Some(target), _) => target.options(),
            (None, Some(element)) => self.registry.get(element).options(),
            (None, None) => return local.clone(),
        };
        let mut merged = merge_overrule(&base, local);
        if let Some(include) = local.get("includeProperties") {
            merged.insert("includeProperties".to_owned(), include.clone());
        }
        merged
    }

    /// The key used for this resource in `_embedded`, `<linkNamespace>:<name>` when namespaced.
    pub fn link_name(&self) -> String {
        match self
            .definition()
            .local_options()
            .get("linkNamespace")
            .and_then(scalar_string)
        {
            Some(namespace) => format!("{namespace}:{}", self.name()),
            None => self.name().to_owned(),
        }
    }

    /// `cacheLifetime` in seconds, from the effective options.
    pub fn cache_lifetime(&self) -> Option<u64> {
        match self.options().get("cacheLifetime")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Flat properties of the shape-carrying definition.
    pub fn property_definitions(&self) -> impl Iterator<Item = &'a ResourcePropertyDefinition> {
        self.resolve_alias()
            .definition()
            .property_definitions
            .values()
    }

    /// Embedded resources as `(source property, definition)` pairs.
    pub fn embedded_resource_definitions(
        &self,
    ) -> impl Iterator<Item = (&'a str, DefinitionRef<'a>)> + 'a {
        let registry = self.registry;
        self.resolve_alias()
            .definition()
            .embedded_resource_definitions
            .iter()
            .map(move |(property, id)| (property.as_str(), registry.get(*id)))
    }

    /// Link definitions in declaration order.
    ///
    /// An alias contributes its own links first; links of the alias target are
    /// inherited unless the alias redefines the same relation.
    pub fn link_definitions(&self) -> Vec<&'a ResourceLinkDefinition> {
        let own = &self.definition().link_definitions;
        let mut links: Vec<&'a ResourceLinkDefinition> = own.values().collect();
        if let Some(target) = self.alias_for() {
            links.extend(
                target
                    .link_definitions()
                    .into_iter()
                    .filter(|link| !own.contains_key(link.rel())),
            );
        }
        links
    }

    pub fn registry(&self) -> &'a DefinitionRegistry {
        self.registry
    }
}

impl fmt::Debug for DefinitionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Display for DefinitionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias_for() {
            Some(target) => write!(f, "{} (alias for \"{}\")", self.name(), target),
            None => f.write_str(self.name()),
        }
    }
}
