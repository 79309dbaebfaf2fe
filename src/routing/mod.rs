//! # Routing
//!
//! The engine never builds URIs itself. It hands a [`UriRequest`] (routing
//! metadata plus route arguments) to a [`UriBuilder`] and gets a string back.
//!
//! [`RouteTable`] is a small template router implementing the contract, enough
//! to serve an API whose routes are known up front.

mod table;

pub use table::*;

use crate::object::Instance;
use indexmap::IndexMap;
use thiserror::Error;

/// Failures reported by a [`UriBuilder`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingError {
    #[error("No route matches controller \"{controller}\", action \"{action}\"")]
    NoMatchingRoute { controller: String, action: String },

    #[error("Route \"{route}\" requires argument \"{argument}\"")]
    MissingArgument { route: String, argument: String },
}

/// Everything a URI builder needs to produce one URI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UriRequest {
    pub action: Option<String>,
    pub controller: Option<String>,
    pub package: Option<String>,
    pub subpackage: Option<String>,
    pub arguments: IndexMap<String, Instance>,
    pub absolute: bool,
}

/// Turns routing metadata and arguments into a concrete URI.
pub trait UriBuilder: Send + Sync {
    fn build_uri(&self, request: &UriRequest) -> Result<String, RoutingError>;
}
