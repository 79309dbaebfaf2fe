use super::{merge_overrule, Options};
use crate::error::{HalError, Result};
use serde_json::Value;

/// The root settings tree (`{ apis: { <apiName>: {...} } }`).
#[derive(Debug, Clone, Default)]
pub struct Settings {
    root: Options,
}

impl Settings {
    /// Wraps an already parsed tree. The root must be a map.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            other => Err(HalError::configuration(format!(
                "settings root must be a map, got {other}"
            ))),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Looks up the configuration of one API.
    pub fn api(&self, api_name: &str) -> Result<ApiConfiguration> {
        self.root
            .get("apis")
            .and_then(|apis| apis.get(api_name))
            .and_then(Value::as_object)
            .map(|api| ApiConfiguration {
                name: api_name.to_owned(),
                api: api.clone(),
            })
            .ok_or_else(|| {
                HalError::configuration(format!("The API \"{api_name}\" is not defined"))
            })
    }
}

/// The configuration of a single API: common configuration plus resources.
#[derive(Debug, Clone)]
pub struct ApiConfiguration {
    name: String,
    api: Options,
}

impl ApiConfiguration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn common_configuration(&self) -> Options {
        self.api
            .get("commonConfiguration")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// All resource entries, in declaration order.
    pub fn resources(&self) -> Result<&Options> {
        self.api
            .get("resources")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                HalError::configuration(format!(
                    "No resources defined for API \"{}\"",
                    self.name
                ))
            })
    }

    /// The raw (unmerged) entry of one resource.
    pub fn resource(&self, resource_name: &str) -> Result<&Options> {
        self.resources()?
            .get(resource_name)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                HalError::configuration(format!(
                    "Resource \"{resource_name}\" is not defined for API \"{}\"",
                    self.name
                ))
            })
    }

    /// The resource entry merged on top of the common configuration.
    pub fn merged_resource(&self, resource_name: &str) -> Result<Options> {
        let resource = self.resource(resource_name)?;
        Ok(merge_overrule(&self.common_configuration(), resource))
    }

    /// Finds the resource bound to `class_name` (first match in declaration order).
    pub fn resource_name_for_class(&self, class_name: &str) -> Result<String> {
        self.resources()?
            .iter()
            .find(|(_, config)| {
                config.get("className").and_then(Value::as_str) == Some(class_name)
            })
            .map(|(name, _)| name.clone())
            .ok_or_else(|| {
                HalError::configuration(format!(
                    "No resources defined for class name \"{class_name}\" for API \"{}\"",
                    self.name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
apis:
  default:
    commonConfiguration:
      linkNamespace: acme
    resources:
      user:
        className: User
        linkNamespace: people
      order:
        className: Order
"#;

    #[test]
    fn test_missing_api_is_configuration_error() {
        let settings = Settings::from_yaml_str(YAML).unwrap();
        let err = settings.api("internal").unwrap_err();
        assert!(matches!(err, HalError::Configuration(_)));
    }

    #[test]
    fn test_resource_overrides_common_configuration() {
        let api = Settings::from_yaml_str(YAML).unwrap().api("default").unwrap();
        let user = api.merged_resource("user").unwrap();
        assert_eq!(user["linkNamespace"], "people");
        let order = api.merged_resource("order").unwrap();
        assert_eq!(order["linkNamespace"], "acme");
    }

    #[test]
    fn test_class_lookup() {
        let api = Settings::from_yaml_str(YAML).unwrap().api("default").unwrap();
        assert_eq!(api.resource_name_for_class("Order").unwrap(), "order");
        assert!(api.resource_name_for_class("Invoice").is_err());
    }

    #[test]
    fn test_scalar_root_rejected() {
        assert!(Settings::from_yaml_str("42").is_err());
    }
}
