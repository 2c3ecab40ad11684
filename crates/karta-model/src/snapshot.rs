//! The immutable desired-state description.

use ahash::AHashSet;

use crate::camera::{CameraBoundary, CameraSpec, CameraZoomRange};
use crate::content::MapItem;
use crate::options::{DisplayOptions, FeatureOptions, InteractionModes, MapKind, TrackingMode};
use crate::poi::PoiFilter;
use crate::surface::RegistryKey;

/// Everything the caller wants the surface to look like, at one instant.
///
/// Snapshots are value types: build one per desired-state change and hand it
/// to the reconciler, which retains only the most recently applied one. The
/// builder methods mirror the optional knobs of the declarative API — start
/// from [`Snapshot::with_region`] or [`Snapshot::with_rect`] and chain what
/// you need; everything else keeps its default.
#[derive(Clone, Debug)]
pub struct Snapshot<A: MapItem, O: MapItem> {
    /// Desired viewport (region- or rect-based, mutually exclusive).
    pub camera: CameraSpec,
    /// Point annotations, ordered; identities must be unique.
    pub annotations: Vec<A>,
    /// Overlay shapes, ordered; identities must be unique.
    pub overlays: Vec<O>,
    /// Desired selection. Only sets of size 0 or 1 are forwarded to the
    /// surface (it supports a single simultaneous selection).
    pub selected: AHashSet<A::Id>,
    pub display: DisplayOptions,
    pub interactions: InteractionModes,
    pub poi_filter: Option<PoiFilter>,
    pub selectable_features: FeatureOptions,
    pub map_kind: MapKind,
    /// `Some` opts into user-tracking synchronization (both directions);
    /// `None` leaves the surface's tracking alone.
    pub tracking: Option<TrackingMode>,
    pub camera_boundary: Option<CameraBoundary>,
    pub camera_zoom_range: Option<CameraZoomRange>,
    /// Height in surface points of the bottom strip hidden under overlaid
    /// UI; applied as a layout margin.
    pub obscured_bottom: f64,
    /// When set, an empty visible-item set triggers the zoom-to-nearest
    /// heuristic.
    pub zoom_to_show_items: bool,
    /// Manual trigger: force a margin re-apply and visible-set recompute on
    /// this pass.
    pub visible_update_needed: bool,
    /// When present, the live surface handle is published into the view
    /// registry under this key on every pass.
    pub registry_key: Option<RegistryKey>,
    /// Whether camera writes issued for this snapshot animate.
    pub animated: bool,
}

impl<A: MapItem, O: MapItem> Snapshot<A, O> {
    /// A snapshot with the given camera spec and defaults everywhere else.
    #[must_use]
    pub fn new(camera: CameraSpec) -> Self {
        Self {
            camera,
            annotations: Vec::new(),
            overlays: Vec::new(),
            selected: AHashSet::new(),
            display: DisplayOptions::default(),
            interactions: InteractionModes::default(),
            poi_filter: None,
            selectable_features: FeatureOptions::default(),
            map_kind: MapKind::default(),
            tracking: None,
            camera_boundary: None,
            camera_zoom_range: None,
            obscured_bottom: 0.0,
            zoom_to_show_items: false,
            visible_update_needed: false,
            registry_key: None,
            animated: false,
        }
    }

    /// A region-based snapshot.
    #[must_use]
    pub fn with_region(region: karta_geo::CoordinateRegion) -> Self {
        Self::new(CameraSpec::Region(region))
    }

    /// A rect-based snapshot.
    #[must_use]
    pub fn with_rect(rect: karta_geo::MapRect) -> Self {
        Self::new(CameraSpec::Rect(rect))
    }

    #[must_use]
    pub fn annotations(mut self, items: Vec<A>) -> Self {
        self.annotations = items;
        self
    }

    #[must_use]
    pub fn overlays(mut self, items: Vec<O>) -> Self {
        self.overlays = items;
        self
    }

    #[must_use]
    pub fn selected(mut self, ids: impl IntoIterator<Item = A::Id>) -> Self {
        self.selected = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn interactions(mut self, modes: InteractionModes) -> Self {
        self.interactions = modes;
        self
    }

    #[must_use]
    pub fn poi_filter(mut self, filter: PoiFilter) -> Self {
        self.poi_filter = Some(filter);
        self
    }

    #[must_use]
    pub fn selectable_features(mut self, features: FeatureOptions) -> Self {
        self.selectable_features = features;
        self
    }

    #[must_use]
    pub fn map_kind(mut self, kind: MapKind) -> Self {
        self.map_kind = kind;
        self
    }

    #[must_use]
    pub fn tracking(mut self, mode: TrackingMode) -> Self {
        self.tracking = Some(mode);
        self
    }

    #[must_use]
    pub fn camera_boundary(mut self, boundary: CameraBoundary) -> Self {
        self.camera_boundary = Some(boundary);
        self
    }

    #[must_use]
    pub fn camera_zoom_range(mut self, range: CameraZoomRange) -> Self {
        self.camera_zoom_range = Some(range);
        self
    }

    #[must_use]
    pub fn obscured_bottom(mut self, points: f64) -> Self {
        self.obscured_bottom = points;
        self
    }

    #[must_use]
    pub fn zoom_to_show_items(mut self, enabled: bool) -> Self {
        self.zoom_to_show_items = enabled;
        self
    }

    #[must_use]
    pub fn visible_update_needed(mut self, needed: bool) -> Self {
        self.visible_update_needed = needed;
        self
    }

    #[must_use]
    pub fn registry_key(mut self, key: RegistryKey) -> Self {
        self.registry_key = Some(key);
        self
    }

    #[must_use]
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}
