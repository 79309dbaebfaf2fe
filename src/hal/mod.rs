//! # HAL Resources
//!
//! [`HalResource`] is the transient output of one render call. It is built by
//! the [`HalResourceBuilder`](crate::view::HalResourceBuilder) and consumed by
//! the [`HalSerializer`].

pub mod resource;
pub mod serializer;

pub use resource::*;
pub use serializer::*;
