//! # Domain Objects
//!
//! The rendering engine walks a dynamic object graph. [`Instance`] is the value
//! type handed to the engine; [`Entity`] is an object-like value with a class
//! name and ordered properties.
//!
//! Two collaborators read from the graph:
//! - [`PropertyAccessor`] - property and dotted-path reads ([`ObjectAccess`] by default).
//! - [`IdentityLookup`] - the persistence identity of an object ([`EntityIdentity`] by default).

pub mod access;
pub mod identity;

pub use access::*;
pub use identity::*;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// A value in the domain object graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Instance {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Instance>),
    Map(IndexMap<String, Instance>),
    Object(Arc<Entity>),
}

impl Instance {
    pub fn object(entity: Entity) -> Self {
        Instance::Object(Arc::new(entity))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Instance::Null)
    }

    /// Object-like values are entities; lists and maps are containers.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Instance::Object(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Instance::List(_) | Instance::Map(_))
    }

    /// Iterates the elements of a list or the values of a map.
    ///
    /// Scalars and objects yield nothing; null is an empty collection.
    pub fn elements(&self) -> Vec<&Instance> {
        match self {
            Instance::List(items) => items.iter().collect(),
            Instance::Map(map) => map.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Converts to a plain JSON value.
    ///
    /// Objects render as their textual form when they have one, otherwise as a
    /// map of their properties.
    pub fn to_json(&self) -> Value {
        match self {
            Instance::Null => Value::Null,
            Instance::Bool(b) => Value::Bool(*b),
            Instance::Number(n) => Value::Number(n.clone()),
            Instance::String(s) => Value::String(s.clone()),
            Instance::List(items) => Value::Array(items.iter().map(Instance::to_json).collect()),
            Instance::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Instance::Object(entity) => match entity.display() {
                Some(text) => Value::String(text.to_owned()),
                None => Value::Object(
                    entity
                        .properties()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_json()))
                        .collect::<Map<_, _>>(),
                ),
            },
        }
    }

    /// Textual form of a scalar or of an object that has one.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Instance::Null => Some(String::new()),
            Instance::Bool(true) => Some("1".to_owned()),
            Instance::Bool(false) => Some(String::new()),
            Instance::Number(n) => Some(n.to_string()),
            Instance::String(s) => Some(s.clone()),
            Instance::Object(entity) => entity.display().map(str::to_owned),
            Instance::List(_) | Instance::Map(_) => None,
        }
    }
}

impl From<Value> for Instance {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Instance::Null,
            Value::Bool(b) => Instance::Bool(b),
            Value::Number(n) => Instance::Number(n),
            Value::String(s) => Instance::String(s),
            Value::Array(items) => Instance::List(items.into_iter().map(Instance::from).collect()),
            Value::Object(map) => {
                Instance::Map(map.into_iter().map(|(k, v)| (k, Instance::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Instance {
    fn from(s: &str) -> Self {
        Instance::String(s.to_owned())
    }
}

impl From<String> for Instance {
    fn from(s: String) -> Self {
        Instance::String(s)
    }
}

impl From<bool> for Instance {
    fn from(b: bool) -> Self {
        Instance::Bool(b)
    }
}

impl From<i64> for Instance {
    fn from(n: i64) -> Self {
        Instance::Number(n.into())
    }
}

impl From<u64> for Instance {
    fn from(n: u64) -> Self {
        Instance::Number(n.into())
    }
}

impl From<i32> for Instance {
    fn from(n: i32) -> Self {
        Instance::Number(n.into())
    }
}

impl From<f64> for Instance {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Instance::Null, Instance::Number)
    }
}

impl From<Entity> for Instance {
    fn from(entity: Entity) -> Self {
        Instance::object(entity)
    }
}

impl<T: Into<Instance>> From<Vec<T>> for Instance {
    fn from(items: Vec<T>) -> Self {
        Instance::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Instance>> From<Option<T>> for Instance {
    fn from(value: Option<T>) -> Self {
        value.map_or(Instance::Null, Into::into)
    }
}

/// An object in the domain graph.
///
/// `identity` is what the persistence layer would report for this object;
/// `display` is its natural string form, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    class_name: String,
    identity: Option<String>,
    display: Option<String>,
    properties: IndexMap<String, Instance>,
}

impl Entity {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Instance>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn properties(&self) -> &IndexMap<String, Instance> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Instance> {
        self.properties.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_json_prefers_display() {
        let tag = Instance::from(Entity::new("Tag").with_display("rust").with("label", "x"));
        assert_eq!(tag.to_json(), json!("rust"));

        let plain = Instance::from(Entity::new("Point").with("x", 1).with("y", 2));
        assert_eq!(plain.to_json(), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_elements_of_map_and_scalar() {
        let map = Instance::from(json!({"a": 1, "b": 2}));
        assert_eq!(map.elements().len(), 2);
        assert!(Instance::from(3).elements().is_empty());
        assert!(Instance::Null.elements().is_empty());
    }
}
