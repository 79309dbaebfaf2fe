use super::{RoutingError, UriBuilder, UriRequest};
use crate::object::{EntityIdentity, IdentityLookup, Instance};
use tracing::trace;
use urlencoding::encode;

/// One route: routing metadata plus a path template such as `users/{user}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub controller: String,
    pub action: String,
    pub package: Option<String>,
    pub subpackage: Option<String>,
    pub template: String,
}

impl Route {
    pub fn new(
        controller: impl Into<String>,
        action: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            package: None,
            subpackage: None,
            template: template.into(),
        }
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn in_subpackage(mut self, subpackage: impl Into<String>) -> Self {
        self.subpackage = Some(subpackage.into());
        self
    }

    fn matches(&self, request: &UriRequest) -> bool {
        let scoped = |route: &Option<String>, requested: &Option<String>| match route {
            Some(expected) => requested.as_deref() == Some(expected.as_str()),
            None => true,
        };
        request.controller.as_deref() == Some(self.controller.as_str())
            && request.action.as_deref().unwrap_or("index") == self.action
            && scoped(&self.package, &request.package)
            && scoped(&self.subpackage, &request.subpackage)
    }

    fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            names.push(&rest[start + 1..start + len]);
            rest = &rest[start + len + 1..];
        }
        names
    }
}

/// A first-match template router.
///
/// Template placeholders consume route arguments; leftover arguments are
/// appended as a query string. Object arguments are replaced by their identity.
pub struct RouteTable {
    routes: Vec<Route>,
    base_uri: String,
    identity: Box<dyn IdentityLookup>,
}

impl RouteTable {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            routes: Vec::new(),
            base_uri: base_uri.into().trim_end_matches('/').to_owned(),
            identity: Box::new(EntityIdentity),
        }
    }

    pub fn with_identity_lookup(mut self, identity: impl IdentityLookup + 'static) -> Self {
        self.identity = Box::new(identity);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    fn argument_text(&self, value: &Instance) -> Option<String> {
        match value {
            Instance::Object(_) => self
                .identity
                .identifier_for(value)
                .or_else(|| value.as_text()),
            other => other.as_text(),
        }
    }

    fn query_pairs(&self, prefix: &str, value: &Instance, pairs: &mut Vec<String>) {
        match value {
            Instance::Map(map) => {
                for (key, nested) in map {
                    self.query_pairs(&format!("{prefix}[{key}]"), nested, pairs);
                }
            }
            Instance::List(items) => {
                for (index, nested) in items.iter().enumerate() {
                    self.query_pairs(&format!("{prefix}[{index}]"), nested, pairs);
                }
            }
            Instance::Null => {}
            other => {
                if let Some(text) = self.argument_text(other) {
                    pairs.push(format!("{}={}", encode(prefix), encode(&text)));
                }
            }
        }
    }

    fn expand(&self, route: &Route, request: &UriRequest) -> Result<String, RoutingError> {
        let mut path = route.template.clone();
        let mut arguments = request.arguments.clone();
        for name in route.placeholders() {
            let text = arguments
                .shift_remove(name)
                .filter(|value| !value.is_null())
                .and_then(|value| self.argument_text(&value))
                .ok_or_else(|| RoutingError::MissingArgument {
                    route: route.template.clone(),
                    argument: name.to_owned(),
                })?;
            path = path.replace(&format!("{{{name}}}"), &encode(&text));
        }

        let mut pairs = Vec::new();
        for (key, value) in &arguments {
            self.query_pairs(key, value, &mut pairs);
        }

        let mut uri = if request.absolute {
            format!("{}/{}", self.base_uri, path.trim_start_matches('/'))
        } else {
            format!("/{}", path.trim_start_matches('/'))
        };
        if !pairs.is_empty() {
            uri.push('?');
            uri.push_str(&pairs.join("&"));
        }
        Ok(uri)
    }
}

impl UriBuilder for RouteTable {
    fn build_uri(&self, request: &UriRequest) -> Result<String, RoutingError> {
        let mut last_error = None;
        for route in self.routes.iter().filter(|route| route.matches(request)) {
            match self.expand(route, request) {
                Ok(uri) => {
                    trace!(template = %route.template, %uri, "Route matched");
                    return Ok(uri);
                }
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| RoutingError::NoMatchingRoute {
            controller: request.controller.clone().unwrap_or_default(),
            action: request.action.clone().unwrap_or_else(|| "index".to_owned()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Entity;

    fn request(controller: &str, action: &str) -> UriRequest {
        UriRequest {
            controller: Some(controller.to_owned()),
            action: Some(action.to_owned()),
            ..UriRequest::default()
        }
    }

    fn table() -> RouteTable {
        RouteTable::new("https://api.example.com/")
            .route(Route::new("User", "show", "users/{user}"))
            .route(Route::new("User", "index", "users"))
    }

    #[test]
    fn test_object_argument_uses_identity() {
        let mut req = request("User", "show");
        req.arguments.insert(
            "user".into(),
            Instance::from(Entity::new("User").with_identity("42")),
        );
        assert_eq!(table().build_uri(&req).unwrap(), "/users/42");
    }

    #[test]
    fn test_leftover_arguments_become_query() {
        let mut req = request("User", "index");
        req.arguments.insert("page".into(), Instance::from(2));
        req.arguments.insert("q".into(), Instance::from("a b"));
        req.absolute = true;
        assert_eq!(
            table().build_uri(&req).unwrap(),
            "https://api.example.com/users?page=2&q=a%20b"
        );
    }

    #[test]
    fn test_placeholders_and_query_keys_are_percent_encoded() {
        let mut req = request("User", "show");
        req.arguments.insert("user".into(), Instance::from("ann/é"));
        let mut filter = indexmap::IndexMap::new();
        filter.insert("role".to_owned(), Instance::from("a&b"));
        req.arguments.insert("filter".into(), Instance::Map(filter));
        assert_eq!(
            table().build_uri(&req).unwrap(),
            "/users/ann%2F%C3%A9?filter%5Brole%5D=a%26b"
        );
    }

    #[test]
    fn test_unknown_route() {
        let err = table().build_uri(&request("Order", "show")).unwrap_err();
        assert_eq!(
            err,
            RoutingError::NoMatchingRoute {
                controller: "Order".into(),
                action: "show".into()
            }
        );
    }

    #[test]
    fn test_missing_placeholder_argument() {
        let err = table().build_uri(&request("User", "show")).unwrap_err();
        assert!(matches!(err, RoutingError::MissingArgument { .. }));
    }

    #[test]
    fn test_package_scoped_route() {
        let table = RouteTable::new("")
            .route(Route::new("User", "index", "admin/users").in_package("Acme.Admin"));
        let mut req = request("User", "index");
        assert!(table.build_uri(&req).is_err());
        req.package = Some("Acme.Admin".into());
        assert_eq!(table.build_uri(&req).unwrap(), "/admin/users");
    }
}
