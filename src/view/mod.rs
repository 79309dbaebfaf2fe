//! # Rendering
//!
//! - [`HalResourceBuilder`] - turns a definition and an instance into a [`HalResource`](crate::hal::HalResource).
//! - [`HalView`] - picks the resource from assigned variables, renders and serializes it.
//! - [`convert_property_value`] - `type: string` coercion.
//! - [`append_query_string`] - `append` handling for link hrefs.

pub mod builder;
pub mod convert;
pub mod hal_view;
mod uri;

pub use builder::*;
pub use convert::*;
pub use hal_view::*;
pub use uri::append_query_string;
