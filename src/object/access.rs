//! Property reads on the domain graph.

use super::Instance;

/// Reads properties off instances.
///
/// A missing property is `None`; the engine treats it as "not present" and
/// never as an error.
pub trait PropertyAccessor: Send + Sync {
    fn get_property(&self, subject: &Instance, name: &str) -> Option<Instance>;

    /// Follows a dotted path (`address.city`), one [`get_property`](Self::get_property) per segment.
    fn get_property_path(&self, subject: &Instance, path: &str) -> Option<Instance> {
        let mut current = subject.clone();
        for segment in path.split('.') {
            current = self.get_property(&current, segment)?;
        }
        Some(current)
    }
}

/// Default accessor: entity properties, map keys and list indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectAccess;

impl PropertyAccessor for ObjectAccess {
    fn get_property(&self, subject: &Instance, name: &str) -> Option<Instance> {
        match subject {
            Instance::Object(entity) => entity.property(name).cloned(),
            Instance::Map(map) => map.get(name).cloned(),
            Instance::List(items) => name
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .cloned(),
            _ => None,
        }
    }
}
