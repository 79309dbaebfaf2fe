//! # Resource Definitions
//!
//! The declarative model of the API: which resources exist, which properties
//! they expose, how they link to each other and what they embed.
//!
//! - [`ResourceDefinitionFactory`] builds definitions from configuration and caches them by name.
//! - [`DefinitionRegistry`] owns the built nodes; nodes refer to each other by [`DefinitionId`].
//! - [`DefinitionRef`] is the read API used by the renderer (alias/collection aware).

pub mod factory;
pub mod link;
pub mod property;
pub mod resource;

pub use factory::*;
pub use link::*;
pub use property::*;
pub use resource::*;
