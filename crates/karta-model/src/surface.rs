//! The imperative surface seam: adapter trait and feedback events.

use std::any::Any;
use std::sync::Arc;

use karta_geo::{CoordinateRegion, MapRect};

use crate::camera::{CameraBoundary, CameraZoomRange};
use crate::content::{NativeId, OverlayLevel, RegistrationKey};
use crate::feature::MapFeature;
use crate::options::{DisplayOptions, FeatureOptions, InteractionModes, MapKind, TrackingMode};
use crate::poi::PoiFilter;

/// Key under which a live surface handle is published in the view registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryKey(String);

impl RegistryKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Type-erased, shareable handle to a live surface, for the registry escape
/// hatch. Callers downcast to the concrete backend type they registered.
pub type SurfaceHandle = Arc<dyn Any + Send + Sync>;

/// The imperative map surface the reconciler drives.
///
/// Implementations are long-lived and stateful (a platform map view, or the
/// recording mock in `karta-harness`). The reconciler never retains one
/// beyond the duration of a single call — lifetime stays with the host.
///
/// Mutators must be cheap to call but are not assumed idempotent; the
/// reconciler's job is to call each one only when state actually changes.
pub trait MapSurface {
    // Item management.
    fn add_annotation(&mut self, native: NativeId);
    fn remove_annotation(&mut self, native: NativeId);
    fn insert_overlay(&mut self, native: NativeId, index: usize, level: Option<OverlayLevel>);
    fn remove_overlay(&mut self, native: NativeId);

    /// Register the rendering adapter for a content type. Called at most
    /// once per key per reconciler.
    fn register_adapter(&mut self, key: RegistrationKey);

    // Camera.
    fn set_region(&mut self, region: CoordinateRegion, animated: bool);
    fn region(&self) -> CoordinateRegion;
    fn set_visible_rect(&mut self, rect: MapRect, animated: bool);
    fn visible_rect(&self) -> MapRect;
    fn set_camera_boundary(&mut self, boundary: Option<CameraBoundary>, animated: bool);
    fn camera_boundary(&self) -> Option<CameraBoundary>;
    fn set_camera_zoom_range(&mut self, range: Option<CameraZoomRange>, animated: bool);
    fn camera_zoom_range(&self) -> Option<CameraZoomRange>;

    // Selection.
    fn set_selection(&mut self, native: Option<NativeId>);
    fn selection(&self) -> Option<NativeId>;

    /// Native ids of annotations within the current viewport, in no
    /// particular order. May include surface-owned markers (user location);
    /// the reconciler drops anything it cannot resolve.
    fn annotations_in_viewport(&self) -> Vec<NativeId>;

    // Scalar properties.
    fn set_display_options(&mut self, options: DisplayOptions);
    fn set_interaction_modes(&mut self, modes: InteractionModes);
    fn set_poi_filter(&mut self, filter: Option<PoiFilter>);
    fn set_selectable_features(&mut self, features: FeatureOptions);
    fn set_map_kind(&mut self, kind: MapKind);
    fn set_tracking(&mut self, mode: TrackingMode, animated: bool);
    fn tracking(&self) -> TrackingMode;
    fn set_bottom_margin(&mut self, points: f64);

    /// The surface-owned user-location marker, if one is displayed.
    fn user_location(&self) -> Option<NativeId> {
        None
    }

    /// Enable or disable interaction on a single annotation view.
    fn set_annotation_enabled(&mut self, _native: NativeId, _enabled: bool) {}

    /// A shareable handle for the view-registry escape hatch. Backends that
    /// have nothing meaningful to publish return `None`.
    fn escape_hatch(&self) -> Option<SurfaceHandle> {
        None
    }
}

/// A notification originating from the surface, reflecting a user- or
/// system-driven change.
///
/// All feedback flows through [`handle_event`] on the reconciler as one
/// tagged enum rather than a many-method callback trait, so ordering is
/// explicit and the dispatch point is single.
///
/// [`handle_event`]: ../karta_sync/struct.Reconciler.html#method.handle_event
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// The viewport is about to change (user gesture or animation start).
    RegionWillChange,
    /// The viewport finished changing.
    RegionDidChange,
    /// The user selected an annotation.
    DidSelect(NativeId),
    /// The user deselected an annotation.
    DidDeselect(NativeId),
    /// The surface finished adding annotation views.
    DidAddAnnotations(Vec<NativeId>),
    /// The surface's user-tracking mode changed.
    TrackingModeChanged(TrackingMode),
    /// The user selected a surface-owned feature (landmark, territory, ...).
    FeatureSelected(MapFeature),
}
