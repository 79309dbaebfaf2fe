use super::DefinitionId;
use crate::config::Options;

/// A typed link of a resource, keyed by its relation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLinkDefinition {
    rel: String,
    title: Option<String>,
    name: Option<String>,
    resource_definition: Option<DefinitionId>,
    route_values: Option<Options>,
    append_query_string: Option<String>,
    absolute: bool,
    templated: bool,
}

impl ResourceLinkDefinition {
    pub fn new(rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            title: None,
            name: None,
            resource_definition: None,
            route_values: None,
            append_query_string: None,
            absolute: false,
            templated: false,
        }
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// The linked resource, used for the href when no route values are set.
    pub fn resource_definition(&self) -> Option<DefinitionId> {
        self.resource_definition
    }

    pub fn set_resource_definition(&mut self, id: DefinitionId) {
        self.resource_definition = Some(id);
    }

    pub fn route_values(&self) -> Option<&Options> {
        self.route_values.as_ref()
    }

    pub fn set_route_values(&mut self, route_values: Options) {
        self.route_values = Some(route_values);
    }

    /// Empty strings count as "nothing to append".
    pub fn append_query_string(&self) -> Option<&str> {
        self.append_query_string.as_deref().filter(|s| !s.is_empty())
    }

    pub fn set_append_query_string(&mut self, append: impl Into<String>) {
        self.append_query_string = Some(append.into());
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        self.absolute = absolute;
    }

    pub fn is_templated(&self) -> bool {
        self.templated
    }

    pub fn set_templated(&mut self, templated: bool) {
        self.templated = templated;
    }
}
