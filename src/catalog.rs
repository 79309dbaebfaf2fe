//! # Property Catalog
//!
//! Describes the gettable members of a bound class without runtime reflection.
//! Classes are registered up front in a [`StaticCatalog`]; the definition
//! factory asks the catalog for property names, their types and descriptions.

use std::collections::HashMap;

/// Whether a member is a stored field or an accessor-derived (computed) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Field,
    Computed,
}

/// A single gettable member of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: String,
    pub kind: PropertyKind,
    pub type_name: Option<String>,
    pub description: Option<String>,
}

impl PropertySchema {
    /// `true` for primitives and dates, which render as flat values.
    pub fn is_simple(&self) -> bool {
        self.type_name.as_deref().map_or(true, is_simple_type)
    }
}

/// Everything the catalog knows about one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSchema {
    pub class_name: String,
    pub description: Option<String>,
    properties: Vec<PropertySchema>,
}

impl ClassSchema {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            description: None,
            properties: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Registers a stored field with a type.
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.properties.push(PropertySchema {
            name: name.into(),
            kind: PropertyKind::Field,
            type_name: Some(type_name.into()),
            description: None,
        });
        self
    }

    /// Registers an accessor such as `getFullName` or `isActive`.
    ///
    /// The property name is derived from the accessor name (`fullName`, `active`).
    /// Names without a `get`/`is` prefix are registered as-is.
    pub fn accessor(mut self, accessor_name: &str) -> Self {
        let name = property_name_from_accessor(accessor_name)
            .unwrap_or_else(|| accessor_name.to_owned());
        self.properties.push(PropertySchema {
            name,
            kind: PropertyKind::Computed,
            type_name: None,
            description: None,
        });
        self
    }

    /// Attaches a description to the most recently registered member.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        if let Some(last) = self.properties.last_mut() {
            last.description = Some(description.into());
        }
        self
    }

    /// Field and accessor names in registration order, without duplicates.
    pub fn gettable_property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.properties.len());
        for property in &self.properties {
            if !names.contains(&property.name) {
                names.push(property.name.clone());
            }
        }
        names
    }

    /// Only stored fields carry type metadata.
    pub fn field_schema(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|p| p.kind == PropertyKind::Field && p.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Capability to describe bound classes.
pub trait PropertyCatalog: Send + Sync {
    fn class_schema(&self, class_name: &str) -> Option<&ClassSchema>;
}

/// Catalog backed by explicit registrations.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    classes: HashMap<String, ClassSchema>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, schema: ClassSchema) -> Self {
        self.classes.insert(schema.class_name.clone(), schema);
        self
    }
}

impl PropertyCatalog for StaticCatalog {
    fn class_schema(&self, class_name: &str) -> Option<&ClassSchema> {
        self.classes.get(class_name)
    }
}

/// Primitive and date types render as flat properties; anything else is a reference.
pub fn is_simple_type(type_name: &str) -> bool {
    matches!(
        type_name.trim_start_matches('\\'),
        "string"
            | "integer"
            | "int"
            | "float"
            | "double"
            | "boolean"
            | "bool"
            | "array"
            | "DateTime"
    )
}

fn property_name_from_accessor(accessor_name: &str) -> Option<String> {
    let rest = accessor_name
        .strip_prefix("get")
        .or_else(|| accessor_name.strip_prefix("is"))?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_names_are_decapitalized() {
        let schema = ClassSchema::new("User")
            .field("name", "string")
            .accessor("getFullName")
            .accessor("isActive");
        assert_eq!(
            schema.gettable_property_names(),
            vec!["name", "fullName", "active"]
        );
    }

    #[test]
    fn test_accessor_does_not_shadow_field_type() {
        let schema = ClassSchema::new("User")
            .field("name", "string")
            .accessor("getName");
        assert_eq!(schema.gettable_property_names(), vec!["name"]);
        assert_eq!(
            schema.field_schema("name").unwrap().type_name.as_deref(),
            Some("string")
        );
    }

    #[test]
    fn test_simple_types() {
        assert!(is_simple_type("integer"));
        assert!(is_simple_type("\\DateTime"));
        assert!(!is_simple_type("Acme\\Domain\\Address"));
    }

    #[test]
    fn test_static_catalog_lookup() {
        let catalog = StaticCatalog::new().register(ClassSchema::new("User"));
        assert!(catalog.class_schema("User").is_some());
        assert!(catalog.class_schema("Order").is_none());
    }
}
