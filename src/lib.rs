#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # HAL View
//!
//! > **Declarative HAL rendering for domain objects.**
//!
//! This crate renders domain objects as HAL (Hypertext Application Language)
//! JSON: flat data plus typed `_links` and `_embedded` sections. Which fields,
//! links and embedded resources appear is decided by configuration, not by
//! per-resource code.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### A small interpreter over a resource schema
//!
//! A resource can alias another resource, be a collection of another resource,
//! embed further resources and link anywhere. The crate resolves that schema
//! into a definition graph once, then walks it against each object it renders.
//!
//! - **Definitions are built once**: the factory registers each definition
//!   before recursing, so cyclic schemas terminate.
//! - **Nodes are handles**: definitions refer to each other by
//!   [`DefinitionId`](definition::DefinitionId); the registry owns them all.
//! - **Collaborators are traits**: property access, identity lookup, URI
//!   building and class introspection are pluggable.
//!
//! ## 🚀 Core Concepts
//!
//! ### Effective options
//! Alias and collection definitions inherit their target's options and
//! overrule them locally. `includeProperties` is the exception: the local list
//! wins outright, it is never merged.
//!
//! ### Full vs. abbreviated resources
//! The rendered root carries every property, embedded resource and link.
//! Embedded resources and collection members carry only their self link, `id`
//! and the properties named in `includeProperties`.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Every operation returns [`HalError`](error::HalError). Routing failures keep
//! the offending link relation and resource name.
//!
//! ### 2. Concurrency Model
//! Rendering is synchronous. A [`HalView`](view::HalView) owns its definition
//! cache; to serve concurrent requests, hand the view to a
//! [`HalService`](runtime::HalService), which processes requests one at a time
//! in its own Tokio task.
//!
//! ### 3. Observability
//! `tracing` everywhere with structured fields. See [`runtime::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Schema ([`config`], [`catalog`], [`definition`])
//! - **Role**: Turns settings into a cached definition graph.
//! - **Key items**: [`Settings`](config::Settings), [`ResourceDefinitionFactory`](definition::ResourceDefinitionFactory).
//!
//! ### 2. The Engine ([`view`])
//! - **Role**: Walks definitions against objects and resolves URIs.
//! - **Key items**: [`HalResourceBuilder`](view::HalResourceBuilder), [`HalView`](view::HalView).
//!
//! ### 3. The Output ([`hal`])
//! - **Role**: The HAL value objects and their JSON form.
//! - **Key items**: [`HalResource`](hal::HalResource), [`HalSerializer`](hal::HalSerializer).
//!
//! ### 4. The Collaborators ([`object`], [`routing`])
//! - **Role**: Reading the object graph and building URIs.
//! - **Key items**: [`PropertyAccessor`](object::PropertyAccessor), [`IdentityLookup`](object::IdentityLookup), [`UriBuilder`](routing::UriBuilder).
//!
//! ### 5. Hosting ([`runtime`], [`docs`])
//! - **Role**: A single-owner render service and API documentation summaries.
//!
//! ## Quick Start
//!
//! ```rust
//! use hal_view::catalog::StaticCatalog;
//! use hal_view::config::Settings;
//! use hal_view::object::Entity;
//! use hal_view::routing::{Route, RouteTable};
//! use hal_view::view::HalView;
//! use std::sync::Arc;
//!
//! let settings = Settings::from_yaml_str(r#"
//! apis:
//!   default:
//!     resources:
//!       user:
//!         properties:
//!           name: {}
//!         routeValues:
//!           '@controller': User
//!           '@action': show
//! "#).unwrap();
//! let routes = RouteTable::new("https://api.example.com")
//!     .route(Route::new("User", "show", "users/{user}"));
//!
//! let mut view = HalView::new(&settings, "default", Arc::new(StaticCatalog::new()), routes).unwrap();
//! view.assign("user", Entity::new("User").with_identity("42").with("name", "Ann"));
//!
//! let document = view.render().unwrap().unwrap();
//! assert_eq!(
//!     document.body,
//!     r#"{"id":"42","name":"Ann","_links":{"self":{"href":"/users/42"}}}"#
//! );
//! ```

pub mod catalog;
pub mod config;
pub mod definition;
pub mod docs;
pub mod error;
pub mod hal;
pub mod object;
pub mod routing;
pub mod runtime;
pub mod view;

pub use error::{HalError, Result};
