//! View registry: the keyed escape hatch to live surface handles.
//!
//! Declarative hosts occasionally need direct access to the backend surface
//! (snapshotting, custom camera flights). A snapshot carrying a
//! [`RegistryKey`] asks the reconciler to publish the surface's handle here
//! on every pass; anyone holding a clone of the registry can look it up and
//! downcast.
//!
//! Handles are strong references. Disposal of a reconciler clears the
//! registry so dead surfaces are not kept alive through it.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use ahash::AHashMap;
use karta_model::{RegistryKey, SurfaceHandle};

/// Shared key-to-handle table. Cheap to clone; clones see the same table.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    inner: std::sync::Arc<Mutex<AHashMap<RegistryKey, SurfaceHandle>>>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry most hosts share.
    pub fn global() -> &'static ViewRegistry {
        static GLOBAL: OnceLock<ViewRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ViewRegistry::new)
    }

    pub fn publish(&self, key: RegistryKey, handle: SurfaceHandle) {
        self.table().insert(key, handle);
    }

    /// The handle published under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &RegistryKey) -> Option<SurfaceHandle> {
        self.table().get(key).cloned()
    }

    pub fn remove(&self, key: &RegistryKey) -> Option<SurfaceHandle> {
        self.table().remove(key)
    }

    /// Drop every published handle.
    pub fn clear(&self) {
        self.table().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    fn table(&self) -> MutexGuard<'_, AHashMap<RegistryKey, SurfaceHandle>> {
        // Handles are plain Arcs; a panic mid-insert cannot leave the table
        // logically inconsistent, so poisoning is recoverable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn publish_then_get_and_downcast() {
        let registry = ViewRegistry::new();
        let key = RegistryKey::new("main-map");
        registry.publish(key.clone(), Arc::new(42u32));

        let handle = registry.get(&key).unwrap();
        assert_eq!(handle.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn get_missing_is_none() {
        let registry = ViewRegistry::new();
        assert!(registry.get(&RegistryKey::new("nope")).is_none());
    }

    #[test]
    fn clones_share_the_table() {
        let registry = ViewRegistry::new();
        let observer = registry.clone();
        registry.publish(RegistryKey::new("shared"), Arc::new(()));
        assert_eq!(observer.len(), 1);
        observer.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn republish_overwrites() {
        let registry = ViewRegistry::new();
        let key = RegistryKey::new("k");
        registry.publish(key.clone(), Arc::new(1u8));
        registry.publish(key.clone(), Arc::new(2u8));
        assert_eq!(registry.len(), 1);
        let handle = registry.get(&key).unwrap();
        assert_eq!(handle.downcast_ref::<u8>(), Some(&2));
    }
}
