//! URI resolution for self hrefs and links.

use crate::config::{scalar_string, Options};
use crate::definition::DefinitionRef;
use crate::object::{Instance, PropertyAccessor};
use crate::routing::{RoutingError, UriBuilder, UriRequest};
use indexmap::IndexMap;
use serde_json::Value;

/// Routing metadata keys pulled out of route values before URI construction.
const ACTION: &str = "@action";
const CONTROLLER: &str = "@controller";
const PACKAGE: &str = "@package";
const SUBPACKAGE: &str = "@subpackage";

/// Builds URIs from configured route values.
///
/// `{path}` tokens are looked up among the render variables first and then
/// on the instance currently being rendered.
pub(crate) struct UriResolver<'a> {
    pub uri_builder: &'a dyn UriBuilder,
    pub accessor: &'a dyn PropertyAccessor,
    pub variables: &'a IndexMap<String, Instance>,
}

impl UriResolver<'_> {
    /// Self URI of `definition`, `None` when its options carry no `routeValues`.
    ///
    /// A bound non-collection instance is injected under the name of the
    /// (ultimately aliased) definition.
    pub fn resource_uri(
        &self,
        definition: DefinitionRef<'_>,
        instance: Option<&Instance>,
    ) -> Result<Option<String>, RoutingError> {
        let options = definition.options();
        let Some(Value::Object(route_values)) = options.get("routeValues") else {
            return Ok(None);
        };
        let bound = instance
            .filter(|instance| !definition.is_collection() && !instance.is_sequence())
            .map(|instance| {
                (
                    definition.resolve_alias().name().to_owned(),
                    instance.clone(),
                )
            });
        self.build(route_values, bound, false, instance).map(Some)
    }

    /// Builds one URI; `bound` is an extra argument added after the configured ones.
    pub fn build(
        &self,
        route_values: &Options,
        bound: Option<(String, Instance)>,
        absolute: bool,
        current: Option<&Instance>,
    ) -> Result<String, RoutingError> {
        let mut request = UriRequest {
            absolute,
            ..UriRequest::default()
        };
        let mut arguments = IndexMap::new();
        for (key, value) in route_values {
            match key.as_str() {
                ACTION => request.action = scalar_string(value),
                CONTROLLER => request.controller = scalar_string(value),
                PACKAGE => request.package = scalar_string(value),
                SUBPACKAGE => request.subpackage = scalar_string(value),
                _ => {
                    arguments.insert(key.clone(), self.replace_placeholder(value, current));
                }
            }
        }
        if let Some((name, instance)) = bound {
            arguments.insert(name, instance);
        }
        request.arguments = arguments;
        self.uri_builder.build_uri(&request)
    }

    fn replace_placeholder(&self, value: &Value, current: Option<&Instance>) -> Instance {
        let Some(path) = value
            .as_str()
            .and_then(|s| s.strip_prefix('{'))
            .and_then(|s| s.strip_suffix('}'))
        else {
            return Instance::from(value.clone());
        };
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        self.variables
            .get(head)
            .and_then(|root| match rest {
                Some(rest) => self.accessor.get_property_path(root, rest),
                None => Some(root.clone()),
            })
            .or_else(|| current.and_then(|c| self.accessor.get_property_path(c, path)))
            .unwrap_or_default()
    }
}

/// Appends a query string, joining with `&` when `href` already has a query.
///
/// URI template expressions (`{?page}`) are appended verbatim; a `?` inside
/// such an expression does not start a query.
pub fn append_query_string(href: &str, append: &str) -> String {
    if append.starts_with('{') {
        return format!("{href}{append}");
    }
    let append = append.trim_start_matches(['?', '&']);
    if append.is_empty() {
        return href.to_owned();
    }
    let separator = if has_query(href) { '&' } else { '?' };
    format!("{href}{separator}{append}")
}

fn has_query(href: &str) -> bool {
    let mut depth = 0usize;
    for c in href.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '?' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}
