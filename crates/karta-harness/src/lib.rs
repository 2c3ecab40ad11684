#![forbid(unsafe_code)]

//! Test harness for the Karta reconciliation core.
//!
//! [`MockSurface`] implements [`MapSurface`] entirely in memory and records
//! every mutating call in order, so tests can assert on exact native call
//! sequences ("`remove_annotation(a)` then `add_annotation(d)`") as well as
//! on end-state. [`Pin`] and [`Shape`] are the sample annotation/overlay
//! item types used across the suites, and [`SequentialFactory`] materializes
//! them with generated native ids.

use ahash::AHashMap;
use karta_geo::{Coordinate, CoordinateRegion, MapRect};
use karta_model::{
    AnnotationContent, CameraBoundary, CameraZoomRange, ContentFactory, DisplayOptions,
    FeatureOptions, InteractionModes, MapItem, MapKind, MapSurface, NativeId, OverlayContent,
    OverlayLevel, PoiFilter, RegistrationKey, SurfaceHandle, TrackingMode,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Sample items
// ---------------------------------------------------------------------------

/// Marker type for the default pin rendering adapter.
pub struct PinMarker;

/// Marker type for the default shape rendering adapter.
pub struct ShapeMarker;

/// A point annotation item for tests.
#[derive(Clone, Debug)]
pub struct Pin {
    pub id: &'static str,
    pub coordinate: Coordinate,
    pub registration: RegistrationKey,
}

impl Pin {
    #[must_use]
    pub fn new(id: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            coordinate: Coordinate::new(latitude, longitude),
            registration: RegistrationKey::of::<PinMarker>(),
        }
    }

    /// Same pin, rendered by a different adapter type.
    #[must_use]
    pub fn with_registration(mut self, registration: RegistrationKey) -> Self {
        self.registration = registration;
        self
    }
}

impl MapItem for Pin {
    type Id = &'static str;

    fn id(&self) -> &'static str {
        self.id
    }
}

/// An overlay item for tests.
#[derive(Clone, Debug)]
pub struct Shape {
    pub id: &'static str,
    pub level: Option<OverlayLevel>,
}

impl Shape {
    #[must_use]
    pub fn new(id: &'static str) -> Self {
        Self { id, level: None }
    }

    #[must_use]
    pub fn level(mut self, level: OverlayLevel) -> Self {
        self.level = Some(level);
        self
    }
}

impl MapItem for Shape {
    type Id = &'static str;

    fn id(&self) -> &'static str {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Content factory handing out sequential native ids.
///
/// `reuse_native` forces every materialization to return the same native id,
/// for exercising the duplicate-native-object contract violation.
#[derive(Debug, Default)]
pub struct SequentialFactory {
    next: u64,
    pub reuse_native: Option<NativeId>,
    /// Item ids materialized so far, in call order. Lets tests assert the
    /// at-most-once-per-identity factory contract.
    pub materialized: Vec<String>,
}

impl SequentialFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_native(&mut self) -> NativeId {
        if let Some(fixed) = self.reuse_native {
            return fixed;
        }
        self.next += 1;
        NativeId(self.next)
    }
}

impl ContentFactory<Pin, Shape> for SequentialFactory {
    fn annotation_content(&mut self, item: &Pin) -> AnnotationContent {
        self.materialized.push(item.id.to_owned());
        AnnotationContent {
            native: self.next_native(),
            coordinate: item.coordinate,
            registration: item.registration,
        }
    }

    fn overlay_content(&mut self, item: &Shape) -> OverlayContent {
        self.materialized.push(item.id.to_owned());
        OverlayContent {
            native: self.next_native(),
            level: item.level,
            registration: RegistrationKey::of::<ShapeMarker>(),
        }
    }
}

// ---------------------------------------------------------------------------
// Recording surface
// ---------------------------------------------------------------------------

/// One recorded mutating call on the [`MockSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    AddAnnotation(NativeId),
    RemoveAnnotation(NativeId),
    InsertOverlay {
        native: NativeId,
        index: usize,
        level: Option<OverlayLevel>,
    },
    RemoveOverlay(NativeId),
    RegisterAdapter(RegistrationKey),
    SetRegion {
        region: CoordinateRegion,
        animated: bool,
    },
    SetVisibleRect {
        rect: MapRect,
        animated: bool,
    },
    SetCameraBoundary(Option<CameraBoundary>),
    SetCameraZoomRange(Option<CameraZoomRange>),
    SetSelection(Option<NativeId>),
    SetDisplayOptions(DisplayOptions),
    SetInteractionModes(InteractionModes),
    SetPoiFilter(Option<PoiFilter>),
    SetSelectableFeatures(FeatureOptions),
    SetMapKind(MapKind),
    SetTracking {
        mode: TrackingMode,
        animated: bool,
    },
    SetBottomMargin(f64),
    SetAnnotationEnabled {
        native: NativeId,
        enabled: bool,
    },
}

/// In-memory [`MapSurface`] that records every mutating call.
///
/// Viewport queries are answered from annotation coordinates registered via
/// [`MockSurface::place`]; an annotation with no known coordinate counts as
/// visible. The user-location marker, when set, is reported by
/// `annotations_in_viewport` like a real surface would report it.
pub struct MockSurface {
    pub calls: Vec<SurfaceCall>,
    region: CoordinateRegion,
    rect: MapRect,
    boundary: Option<CameraBoundary>,
    zoom_range: Option<CameraZoomRange>,
    selection: Option<NativeId>,
    tracking: TrackingMode,
    annotations: Vec<NativeId>,
    overlays: Vec<NativeId>,
    coords: AHashMap<NativeId, Coordinate>,
    user_location: Option<NativeId>,
    handle: SurfaceHandle,
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            region: CoordinateRegion::default(),
            rect: MapRect::default(),
            boundary: None,
            zoom_range: None,
            selection: None,
            tracking: TrackingMode::None,
            annotations: Vec::new(),
            overlays: Vec::new(),
            coords: AHashMap::new(),
            user_location: None,
            handle: Arc::new(()),
        }
    }

    /// Pre-set the live viewport without recording a call (simulates state
    /// the surface reached on its own).
    pub fn with_live_region(mut self, region: CoordinateRegion) -> Self {
        self.region = region;
        self
    }

    /// Associate a coordinate with a native id for viewport queries.
    pub fn place(&mut self, native: NativeId, coordinate: Coordinate) {
        self.coords.insert(native, coordinate);
    }

    /// Install a surface-owned user-location marker.
    pub fn set_user_location(&mut self, native: NativeId, coordinate: Coordinate) {
        self.user_location = Some(native);
        self.coords.insert(native, coordinate);
    }

    #[must_use]
    pub fn log(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    #[must_use]
    pub fn count_matching(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Native ids of annotations currently on the surface, in order.
    #[must_use]
    pub fn annotation_order(&self) -> &[NativeId] {
        &self.annotations
    }

    /// Native ids of overlays currently on the surface, in order.
    #[must_use]
    pub fn overlay_order(&self) -> &[NativeId] {
        &self.overlays
    }
}

impl MapSurface for MockSurface {
    fn add_annotation(&mut self, native: NativeId) {
        self.calls.push(SurfaceCall::AddAnnotation(native));
        self.annotations.push(native);
    }

    fn remove_annotation(&mut self, native: NativeId) {
        self.calls.push(SurfaceCall::RemoveAnnotation(native));
        self.annotations.retain(|n| *n != native);
        if self.selection == Some(native) {
            self.selection = None;
        }
    }

    fn insert_overlay(&mut self, native: NativeId, index: usize, level: Option<OverlayLevel>) {
        self.calls.push(SurfaceCall::InsertOverlay {
            native,
            index,
            level,
        });
        let index = index.min(self.overlays.len());
        self.overlays.insert(index, native);
    }

    fn remove_overlay(&mut self, native: NativeId) {
        self.calls.push(SurfaceCall::RemoveOverlay(native));
        self.overlays.retain(|n| *n != native);
    }

    fn register_adapter(&mut self, key: RegistrationKey) {
        self.calls.push(SurfaceCall::RegisterAdapter(key));
    }

    fn set_region(&mut self, region: CoordinateRegion, animated: bool) {
        self.calls.push(SurfaceCall::SetRegion { region, animated });
        self.region = region;
    }

    fn region(&self) -> CoordinateRegion {
        self.region
    }

    fn set_visible_rect(&mut self, rect: MapRect, animated: bool) {
        self.calls.push(SurfaceCall::SetVisibleRect { rect, animated });
        self.rect = rect;
    }

    fn visible_rect(&self) -> MapRect {
        self.rect
    }

    fn set_camera_boundary(&mut self, boundary: Option<CameraBoundary>, _animated: bool) {
        self.calls.push(SurfaceCall::SetCameraBoundary(boundary));
        self.boundary = boundary;
    }

    fn camera_boundary(&self) -> Option<CameraBoundary> {
        self.boundary
    }

    fn set_camera_zoom_range(&mut self, range: Option<CameraZoomRange>, _animated: bool) {
        self.calls.push(SurfaceCall::SetCameraZoomRange(range));
        self.zoom_range = range;
    }

    fn camera_zoom_range(&self) -> Option<CameraZoomRange> {
        self.zoom_range
    }

    fn set_selection(&mut self, native: Option<NativeId>) {
        self.calls.push(SurfaceCall::SetSelection(native));
        self.selection = native;
    }

    fn selection(&self) -> Option<NativeId> {
        self.selection
    }

    fn annotations_in_viewport(&self) -> Vec<NativeId> {
        let mut visible: Vec<NativeId> = self
            .annotations
            .iter()
            .copied()
            .filter(|native| {
                self.coords
                    .get(native)
                    .is_none_or(|coord| self.region.contains(coord))
            })
            .collect();
        if let Some(user) = self.user_location
            && self.coords.get(&user).is_some_and(|c| self.region.contains(c))
        {
            visible.push(user);
        }
        visible
    }

    fn set_display_options(&mut self, options: DisplayOptions) {
        self.calls.push(SurfaceCall::SetDisplayOptions(options));
    }

    fn set_interaction_modes(&mut self, modes: InteractionModes) {
        self.calls.push(SurfaceCall::SetInteractionModes(modes));
    }

    fn set_poi_filter(&mut self, filter: Option<PoiFilter>) {
        self.calls.push(SurfaceCall::SetPoiFilter(filter));
    }

    fn set_selectable_features(&mut self, features: FeatureOptions) {
        self.calls.push(SurfaceCall::SetSelectableFeatures(features));
    }

    fn set_map_kind(&mut self, kind: MapKind) {
        self.calls.push(SurfaceCall::SetMapKind(kind));
    }

    fn set_tracking(&mut self, mode: TrackingMode, animated: bool) {
        self.calls.push(SurfaceCall::SetTracking { mode, animated });
        self.tracking = mode;
    }

    fn tracking(&self) -> TrackingMode {
        self.tracking
    }

    fn set_bottom_margin(&mut self, points: f64) {
        self.calls.push(SurfaceCall::SetBottomMargin(points));
    }

    fn user_location(&self) -> Option<NativeId> {
        self.user_location
    }

    fn set_annotation_enabled(&mut self, native: NativeId, enabled: bool) {
        self.calls
            .push(SurfaceCall::SetAnnotationEnabled { native, enabled });
    }

    fn escape_hatch(&self) -> Option<SurfaceHandle> {
        Some(Arc::clone(&self.handle))
    }
}
