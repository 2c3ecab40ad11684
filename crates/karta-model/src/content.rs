//! Item identity and materialized content descriptors.
//!
//! The reconciler matches logical items across snapshots by their
//! [`MapItem::id`] and talks to the surface in terms of opaque [`NativeId`]
//! handles. A [`ContentFactory`] bridges the two: given an item, it produces
//! the native object (plus metadata the reconciler needs: the annotation's
//! coordinate, the adapter type to register, an optional overlay level).

use core::any::TypeId;
use core::fmt;
use core::hash::Hash;

use karta_geo::Coordinate;

/// Opaque identity of a native object owned by the surface.
///
/// Generated by the content factory; never interpreted, only compared. This
/// stands in for object-reference identity so descriptors can be looked up
/// in reverse when the surface hands a native object back in a feedback
/// event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(pub u64);

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native#{}", self.0)
    }
}

/// Identifies a content *type* (not instance) whose rendering adapter must
/// be registered with the surface before any instance is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationKey(TypeId);

impl RegistrationKey {
    /// The registration key for content type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// Where an overlay sits relative to the surface's own cartography.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayLevel {
    AboveRoads,
    AboveLabels,
}

/// A materialized point annotation: the native object plus the metadata the
/// reconciler needs to index and position it.
#[derive(Clone, Copy, Debug)]
pub struct AnnotationContent {
    pub native: NativeId,
    pub coordinate: Coordinate,
    pub registration: RegistrationKey,
}

/// A materialized overlay shape.
#[derive(Clone, Copy, Debug)]
pub struct OverlayContent {
    pub native: NativeId,
    pub level: Option<OverlayLevel>,
    pub registration: RegistrationKey,
}

/// A logical item with a caller-defined stable identity.
///
/// Identity distinguishes items across snapshots independently of content
/// equality — an item whose id is unchanged is the *same* item even when
/// its payload changed. Identities within one snapshot collection must be
/// unique; duplicates are a contract violation the reconciler reports.
pub trait MapItem {
    type Id: Clone + Eq + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// Materializes items into native content.
///
/// Invoked lazily by the reconciler: at most once per identity while that
/// identity remains present in consecutive snapshots. Each call must
/// produce a fresh native object — the reconciler rejects a native id that
/// already belongs to another descriptor.
pub trait ContentFactory<A: MapItem, O: MapItem> {
    fn annotation_content(&mut self, item: &A) -> AnnotationContent;
    fn overlay_content(&mut self, item: &O) -> OverlayContent;
}
