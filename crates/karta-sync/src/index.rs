//! Dual-direction content index.
//!
//! Descriptors live in a slot arena; two hash maps key into it by logical
//! identity (forward: snapshot diffing) and by native id (reverse: feedback
//! events handing back a surface object).
//!
//! # Invariants
//!
//! - Forward and reverse maps always reference live slots of the same entry.
//! - One logical id owns at most one slot; one native id owns at most one
//!   slot. The reconciler pre-checks both before inserting.
//! - Slot values are never reused while a lookup for the old entry could be
//!   in flight within one reconcile pass (slots free only on remove, and a
//!   pass removes before it inserts).

use core::fmt;
use core::hash::Hash;

use ahash::AHashMap;
use karta_model::{AnnotationContent, NativeId, OverlayContent};

/// Arena handle for one indexed descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot(u32);

/// Descriptor types that carry a native id the index can key on.
pub trait NativeKeyed {
    fn native_id(&self) -> NativeId;
}

impl NativeKeyed for AnnotationContent {
    fn native_id(&self) -> NativeId {
        self.native
    }
}

impl NativeKeyed for OverlayContent {
    fn native_id(&self) -> NativeId {
        self.native
    }
}

struct Entry<Id, C> {
    id: Id,
    content: C,
}

/// Index over materialized content, queryable by logical id or native id.
pub struct ContentIndex<Id, C> {
    slots: Vec<Option<Entry<Id, C>>>,
    free: Vec<u32>,
    by_id: AHashMap<Id, Slot>,
    by_native: AHashMap<NativeId, Slot>,
}

impl<Id, C> Default for ContentIndex<Id, C> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_id: AHashMap::new(),
            by_native: AHashMap::new(),
        }
    }
}

impl<Id, C> ContentIndex<Id, C>
where
    Id: Clone + Eq + Hash + fmt::Debug,
    C: NativeKeyed,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[must_use]
    pub fn contains_id(&self, id: &Id) -> bool {
        self.by_id.contains_key(id)
    }

    #[must_use]
    pub fn contains_native(&self, native: NativeId) -> bool {
        self.by_native.contains_key(&native)
    }

    /// Index a descriptor under its logical and native ids.
    ///
    /// The caller must have rejected duplicates beforehand; a collision here
    /// would desynchronize the two maps, so the insert is refused.
    pub fn insert(&mut self, id: Id, content: C) -> Option<Slot> {
        let native = content.native_id();
        if self.by_id.contains_key(&id) || self.by_native.contains_key(&native) {
            return None;
        }
        let slot = match self.free.pop() {
            Some(raw) => {
                self.slots[raw as usize] = Some(Entry { id: id.clone(), content });
                Slot(raw)
            }
            None => {
                let raw = u32::try_from(self.slots.len()).ok()?;
                self.slots.push(Some(Entry { id: id.clone(), content }));
                Slot(raw)
            }
        };
        self.by_id.insert(id, slot);
        self.by_native.insert(native, slot);
        Some(slot)
    }

    #[must_use]
    pub fn get(&self, id: &Id) -> Option<&C> {
        let slot = self.by_id.get(id)?;
        self.entry(*slot).map(|e| &e.content)
    }

    /// Reverse lookup: the logical id owning a native object.
    #[must_use]
    pub fn id_for_native(&self, native: NativeId) -> Option<&Id> {
        let slot = self.by_native.get(&native)?;
        self.entry(*slot).map(|e| &e.id)
    }

    /// Remove the descriptor for `id`, returning it so the caller can issue
    /// the corresponding surface removal.
    pub fn remove(&mut self, id: &Id) -> Option<C> {
        let slot = self.by_id.remove(id)?;
        let entry = self.slots.get_mut(slot.0 as usize)?.take()?;
        self.by_native.remove(&entry.content.native_id());
        self.free.push(slot.0);
        Some(entry.content)
    }

    /// All live `(id, descriptor)` pairs, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &C)> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|e| (&e.id, &e.content)))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.by_id.clear();
        self.by_native.clear();
    }

    fn entry(&self, slot: Slot) -> Option<&Entry<Id, C>> {
        self.slots.get(slot.0 as usize)?.as_ref()
    }
}
