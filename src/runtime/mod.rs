//! Runtime hosting of the renderer.
//!
//! - [`HalService`] / [`HalClient`] - a view owned by one task, driven over a channel
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod service;
pub mod tracing;

pub use service::*;
pub use self::tracing::*;
