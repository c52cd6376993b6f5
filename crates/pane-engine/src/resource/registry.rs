use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use super::ResourceId;

/// Identity of a wrapper object, independent of the resource it refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandleKey(u64);

impl fmt::Display for HandleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// Accessor implemented by wrappers that can be bound to a native resource.
pub trait Handle {
    fn handle_key(&self) -> HandleKey;
}

impl Handle for HandleKey {
    fn handle_key(&self) -> HandleKey {
        *self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("{0} is not bound to a resource")]
    NotBound(HandleKey),
}

/// Maps wrapper identities to the native resource they currently refer to.
///
/// The registry is an explicitly constructed value, usually shared as
/// `Rc<HandleRegistry>` between the GPU context and the surfaces it creates.
/// Entries are keyed by [`HandleKey`], never by anything the wrapper exposes publicly,
/// so an id can be swapped while callers keep holding the same wrapper.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    next_key: Cell<u64>,
    bindings: RefCell<HashMap<HandleKey, ResourceId>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a key that has never been handed out by this registry.
    pub fn allocate(&self) -> HandleKey {
        let key = HandleKey(self.next_key.get());
        self.next_key.set(key.0 + 1);
        key
    }

    /// Associates `id` with `wrapper`, replacing any previous association.
    pub fn bind(&self, wrapper: &impl Handle, id: ResourceId) {
        self.bind_key(wrapper.handle_key(), id);
    }

    pub fn bind_key(&self, key: HandleKey, id: ResourceId) {
        if let Some(previous) = self.bindings.borrow_mut().insert(key, id) {
            if previous != id {
                log::trace!("rebound {key}: {previous} -> {id}");
            }
        }
    }

    /// Returns the identifier currently bound to `wrapper`.
    pub fn resolve(&self, wrapper: &impl Handle) -> Result<ResourceId, RegistryError> {
        let key = wrapper.handle_key();
        self.bindings
            .borrow()
            .get(&key)
            .copied()
            .ok_or(RegistryError::NotBound(key))
    }

    /// Drops the association for `key`, returning the id it was bound to.
    pub fn unbind(&self, key: HandleKey) -> Option<ResourceId> {
        self.bindings.borrow_mut().remove(&key)
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Wrapper(HandleKey);

    impl Handle for Wrapper {
        fn handle_key(&self) -> HandleKey {
            self.0
        }
    }

    #[test]
    fn rebinding_replaces_previous_id() {
        let registry = HandleRegistry::new();
        let w = Wrapper(registry.allocate());

        registry.bind(&w, ResourceId::new(1));
        registry.bind(&w, ResourceId::new(2));

        assert_eq!(registry.resolve(&w), Ok(ResourceId::new(2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn bind_is_idempotent() {
        let registry = HandleRegistry::new();
        let w = Wrapper(registry.allocate());

        registry.bind(&w, ResourceId::new(5));
        registry.bind(&w, ResourceId::new(5));

        assert_eq!(registry.resolve(&w), Ok(ResourceId::new(5)));
    }

    #[test]
    fn unbound_wrapper_fails() {
        let registry = HandleRegistry::new();
        let w = Wrapper(registry.allocate());

        assert_eq!(registry.resolve(&w), Err(RegistryError::NotBound(w.0)));
    }

    #[test]
    fn unbind_makes_wrapper_unresolvable() {
        let registry = HandleRegistry::new();
        let w = Wrapper(registry.allocate());
        registry.bind(&w, ResourceId::new(3));

        assert_eq!(registry.unbind(w.0), Some(ResourceId::new(3)));
        assert!(registry.resolve(&w).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn keys_are_distinct_per_registry() {
        let registry = HandleRegistry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        assert_ne!(a, b);

        registry.bind_key(a, ResourceId::new(10));
        assert!(registry.resolve(&b).is_err());
    }
}
