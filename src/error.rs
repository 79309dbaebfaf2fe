//! # Errors
//!
//! Every fallible operation in the crate returns [`HalError`]. Routing failures
//! reported by the [`UriBuilder`](crate::routing::UriBuilder) collaborator are
//! wrapped so the caller knows which link or resource could not be resolved.

use crate::routing::RoutingError;
use thiserror::Error;

/// Errors that can occur while resolving definitions or rendering resources.
#[derive(Debug, Error)]
pub enum HalError {
    /// Missing API/resource entry, unmapped class name or a malformed option.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A link's route values did not match any known route.
    #[error("Could not create URI for link definition \"{rel}\" (resource \"{resource}\")")]
    LinkResolution {
        rel: String,
        resource: String,
        #[source]
        source: RoutingError,
    },

    /// The self URI of a resource could not be built.
    #[error("Could not create URI for resource \"{resource}\"")]
    ResourceUri {
        resource: String,
        #[source]
        source: RoutingError,
    },

    /// The settings document could not be parsed.
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_yaml::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The render service is no longer running.
    #[error("HAL service closed")]
    ServiceClosed,

    /// The render service dropped the response channel.
    #[error("HAL service dropped response channel")]
    ServiceDropped,
}

impl HalError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        HalError::Configuration(msg.into())
    }
}

pub type Result<T, E = HalError> = std::result::Result<T, E>;
