//! Identity lookup for objects.

use super::Instance;

/// Resolves the persistence identity of an instance.
pub trait IdentityLookup: Send + Sync {
    fn identifier_for(&self, instance: &Instance) -> Option<String>;
}

/// Default lookup: the identity carried by the [`Entity`](super::Entity).
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityIdentity;

impl IdentityLookup for EntityIdentity {
    fn identifier_for(&self, instance: &Instance) -> Option<String> {
        instance.as_entity()?.identity().map(str::to_owned)
    }
}
