//! # Observability & Tracing
//!
//! The crate logs through `tracing` with structured fields:
//!
//! - **Definition resolution**: `Building resource definition resource="user"` at debug,
//!   cache hits at trace.
//! - **Rendering**: one debug line per built resource, an info line per rendered document.
//! - **Degraded decisions**: links skipped because their target has no route, classes
//!   without a registered schema.
//!
//! Errors are returned, not logged, by the core. The runtime service logs failed
//! renders before handing them back to the caller.
//!
//! ```bash
//! # Rendered documents only
//! RUST_LOG=info cargo test
//!
//! # Definition building and per-resource rendering
//! RUST_LOG=hal_view=debug cargo test
//! ```

/// Installs a compact fmt subscriber filtered by `RUST_LOG`.
///
/// # Panics
/// If a global subscriber is already installed. Use [`try_setup_tracing`] in tests.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but a no-op when a subscriber is already installed.
pub fn try_setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init();
}
