use serde_json::Value;

/// How one flat property of a resource is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePropertyDefinition {
    name: String,
    resource_name: Option<String>,
    description: Option<String>,
    type_name: Option<String>,
    static_value: Option<Value>,
}

impl ResourcePropertyDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_name: None,
            description: None,
            type_name: None,
            static_value: None,
        }
    }

    /// The source property (or dotted path) read from the instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The output key, defaulting to [`name`](Self::name).
    pub fn resource_name(&self) -> &str {
        self.resource_name.as_deref().unwrap_or(&self.name)
    }

    pub fn set_resource_name(&mut self, resource_name: impl Into<String>) {
        self.resource_name = Some(resource_name.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn set_type(&mut self, type_name: impl Into<String>) {
        self.type_name = Some(type_name.into());
    }

    /// Null is never a static value.
    pub fn set_static_value(&mut self, value: Value) {
        self.static_value = (!value.is_null()).then_some(value);
    }

    pub fn static_value(&self) -> Option<&Value> {
        self.static_value.as_ref()
    }

    pub fn has_static_value(&self) -> bool {
        self.static_value.is_some()
    }
}
