use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a native resource.
///
/// Ids are allocated monotonically per table and never reused, so a stale id can never
/// alias a newer resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rid#{}", self.0)
    }
}

/// Table of native resources keyed by [`ResourceId`].
///
/// Used by native backends to hold objects whose id has been handed out to the
/// platform-agnostic layer (e.g. acquired swapchain images).
#[derive(Debug)]
pub struct ResourceTable<T> {
    next: u64,
    entries: BTreeMap<ResourceId, T>,
}

impl<T> ResourceTable<T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Inserts a resource and returns its freshly allocated id.
    pub fn insert(&mut self, resource: T) -> ResourceId {
        let id = ResourceId(self.next);
        self.next += 1;
        self.entries.insert(id, resource);
        id
    }

    pub fn get(&self, id: ResourceId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Removes and returns the resource, if it is still present.
    pub fn take(&mut self, id: ResourceId) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every live resource. Allocation continues from the current counter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for ResourceTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
