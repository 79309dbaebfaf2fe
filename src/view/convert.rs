//! Type coercion of property values.

use crate::definition::ResourcePropertyDefinition;
use crate::object::{IdentityLookup, Instance};
use serde_json::Value;

/// Applies the property's type hint to a read value.
///
/// Only `string` is acted upon: objects without a textual form become their
/// identity, scalars become their text. Other types pass through unchanged.
pub fn convert_property_value(
    value: &Instance,
    property: &ResourcePropertyDefinition,
    identity: &dyn IdentityLookup,
) -> Value {
    match property.type_name() {
        Some("string") => match value {
            Instance::Object(entity) if entity.display().is_none() => {
                Value::String(identity.identifier_for(value).unwrap_or_default())
            }
            other => other
                .as_text()
                .map(Value::String)
                .unwrap_or_else(|| other.to_json()),
        },
        _ => value.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Entity, EntityIdentity};
    use serde_json::json;

    fn string_property() -> ResourcePropertyDefinition {
        let mut property = ResourcePropertyDefinition::new("owner");
        property.set_type("string");
        property
    }

    #[test]
    fn test_object_without_text_becomes_identity() {
        let owner = Instance::from(Entity::new("User").with_identity("u-1").with("name", "Ann"));
        assert_eq!(
            convert_property_value(&owner, &string_property(), &EntityIdentity),
            json!("u-1")
        );
    }

    #[test]
    fn test_object_with_text_uses_text() {
        let tag = Instance::from(Entity::new("Tag").with_identity("t-1").with_display("rust"));
        assert_eq!(
            convert_property_value(&tag, &string_property(), &EntityIdentity),
            json!("rust")
        );
    }

    #[test]
    fn test_scalars_are_stringified() {
        assert_eq!(
            convert_property_value(&Instance::from(42), &string_property(), &EntityIdentity),
            json!("42")
        );
    }

    #[test]
    fn test_untyped_passes_through() {
        let property = ResourcePropertyDefinition::new("count");
        assert_eq!(
            convert_property_value(&Instance::from(3), &property, &EntityIdentity),
            json!(3)
        );
    }
}
