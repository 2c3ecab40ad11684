//! The reconciler: applies desired-state snapshots to a live surface.
//!
//! One reconciler owns the synchronization state for one surface: the last
//! applied snapshot, the content index, the adapter registration cache, the
//! feedback guards, and the deferred-op queue. The host drives it with three
//! calls:
//!
//! 1. [`Reconciler::update`] with each new [`Snapshot`] — issues the minimal
//!    synchronous surface mutations and queues the deferred ones.
//! 2. [`Reconciler::handle_event`] with each [`SurfaceEvent`] — folds
//!    surface feedback into the [`OutputState`].
//! 3. [`Reconciler::drain_deferred`] once per host cycle, after layout has
//!    settled — executes queued camera/margin/visibility work against
//!    *current* state.
//!
//! # Invariants
//!
//! - Every surface write is equality-gated: identical consecutive snapshots
//!   produce zero surface calls.
//! - Camera writes never race a user gesture: between `RegionWillChange` and
//!   `RegionDidChange` they are suppressed, both at scheduling and again at
//!   drain.
//! - Feedback writes into [`OutputState`] are themselves equality-gated, so
//!   an echo of a just-issued write cannot start a ping-pong loop.
//! - The content factory runs at most once per identity while that
//!   identity's position in the diffed order is stable; an item the diff
//!   moves is torn down and re-materialized.
//!
//! # Failure modes
//!
//! Caller contract violations (duplicate identities, duplicate native
//! objects) skip the offending item, log a warning, and land in the
//! [`ReconcileReport`]; the rest of the snapshot still applies. Builds with
//! the `strict-violations` feature panic instead.

use ahash::AHashSet;
use karta_geo::{ApproxEq, CoordinateRegion};
use karta_model::{
    AnnotationContent, CameraSpec, ContentFactory, MapItem, MapSurface, OutputState,
    OverlayContent, RegistrationKey, RegistryKey, Snapshot, SurfaceEvent,
};
use tracing::{debug, warn};

use crate::deferred::{DeferredOp, DeferredQueue};
use crate::diff::{diff_by_key, DiffOp};
use crate::index::ContentIndex;
use crate::registry::ViewRegistry;
use crate::report::{ReconcileReport, SyncViolation};

/// One planned edit, detached from the diff's borrows so it can be applied
/// while the index and factory are mutated.
enum Planned<Id> {
    Remove(Id),
    Insert(usize),
}

/// Snapshot-to-surface synchronizer for one map surface.
pub struct Reconciler<A: MapItem, O: MapItem, F: ContentFactory<A, O>> {
    factory: F,
    previous: Option<Snapshot<A, O>>,
    annotations: ContentIndex<A::Id, AnnotationContent>,
    overlays: ContentIndex<O::Id, OverlayContent>,
    registered: AHashSet<RegistrationKey>,
    deferred: DeferredQueue,
    registry: ViewRegistry,
    registry_key: Option<RegistryKey>,
    /// Set between `RegionWillChange` and `RegionDidChange`; camera writes
    /// are suppressed while it holds.
    region_is_changing: bool,
    /// The surface fires one settle event for its initial layout; it carries
    /// no user intent and is swallowed.
    initial_region_change: bool,
    disposed: bool,
}

impl<A: MapItem, O: MapItem, F: ContentFactory<A, O>> Reconciler<A, O, F> {
    /// A reconciler publishing into the process-wide [`ViewRegistry`].
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::with_registry(factory, ViewRegistry::global().clone())
    }

    /// A reconciler publishing into a caller-supplied registry. Tests use
    /// this to avoid cross-talk through the global one.
    #[must_use]
    pub fn with_registry(factory: F, registry: ViewRegistry) -> Self {
        Self {
            factory,
            previous: None,
            annotations: ContentIndex::new(),
            overlays: ContentIndex::new(),
            registered: AHashSet::new(),
            deferred: DeferredQueue::default(),
            registry,
            registry_key: None,
            region_is_changing: false,
            initial_region_change: true,
            disposed: false,
        }
    }

    /// Whether deferred operations are waiting for [`Self::drain_deferred`].
    #[must_use]
    pub fn has_pending_ops(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Number of annotations currently materialized on the surface.
    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    // -----------------------------------------------------------------------
    // Snapshot application
    // -----------------------------------------------------------------------

    /// Apply `snapshot`, issuing the minimal synchronous surface mutations
    /// and queueing deferred ones. Property order matches the surface's own
    /// settling order: content first, then selection, then camera.
    pub fn update(
        &mut self,
        mut snapshot: Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        output: &mut OutputState<A::Id>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        self.sync_annotations(&snapshot, surface, &mut report);
        self.sync_selection(&snapshot, surface, &mut report);
        self.sync_camera_limits(&snapshot, surface, &mut report);
        self.sync_scalars(&snapshot, surface, &mut report);
        self.sync_overlays(&snapshot, surface, &mut report);
        self.sync_poi_filter(&snapshot, surface, &mut report);
        self.schedule_camera(&snapshot, surface);
        self.schedule_margins(&snapshot);
        self.sync_map_kind(&snapshot, surface, &mut report);
        self.sync_tracking(&snapshot, surface, &mut report);
        self.schedule_zoom_to_show(&snapshot, output);
        self.service_manual_trigger(&snapshot, output);
        self.publish_registry(&snapshot, surface);

        if !report.is_clean() {
            // Items skipped over a violation never reached the surface; keep
            // `previous` aligned with what was actually applied so the next
            // diff starts from surface reality.
            let annotations = &self.annotations;
            let mut seen = AHashSet::new();
            snapshot
                .annotations
                .retain(|item| annotations.contains_id(&item.id()) && seen.insert(item.id()));
            let overlays = &self.overlays;
            let mut seen = AHashSet::new();
            snapshot
                .overlays
                .retain(|item| overlays.contains_id(&item.id()) && seen.insert(item.id()));
        }
        self.previous = Some(snapshot);
        report
    }

    fn sync_annotations(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        let plan: Vec<Planned<A::Id>> = {
            let prev: &[A] = match &self.previous {
                Some(p) => &p.annotations,
                None => &[],
            };
            diff_by_key(prev, &snapshot.annotations, MapItem::id)
                .into_iter()
                .map(|op| match op {
                    DiffOp::Remove { item, .. } => Planned::Remove(item.id()),
                    DiffOp::Insert { index, .. } => Planned::Insert(index),
                })
                .collect()
        };

        for step in plan {
            match step {
                Planned::Remove(id) => {
                    let Some(content) = self.annotations.remove(&id) else {
                        report.violation(SyncViolation::InternalInconsistency {
                            context: "removed annotation missing from index",
                        });
                        continue;
                    };
                    surface.remove_annotation(content.native);
                    report.op();
                }
                Planned::Insert(position) => {
                    let item = &snapshot.annotations[position];
                    let id = item.id();
                    if self.annotations.contains_id(&id) {
                        report.violation(SyncViolation::DuplicateIdentity {
                            id: format!("{id:?}"),
                        });
                        continue;
                    }
                    let content = self.factory.annotation_content(item);
                    if self.annotations.contains_native(content.native) {
                        report.violation(SyncViolation::DuplicateNativeObject {
                            native: content.native,
                        });
                        continue;
                    }
                    self.ensure_registered(content.registration, surface, report);
                    if self.annotations.insert(id, content).is_none() {
                        report.violation(SyncViolation::InternalInconsistency {
                            context: "annotation index refused insert",
                        });
                        continue;
                    }
                    surface.add_annotation(content.native);
                    report.op();
                }
            }
        }
    }

    fn sync_overlays(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        let plan: Vec<Planned<O::Id>> = {
            let prev: &[O] = match &self.previous {
                Some(p) => &p.overlays,
                None => &[],
            };
            diff_by_key(prev, &snapshot.overlays, MapItem::id)
                .into_iter()
                .map(|op| match op {
                    DiffOp::Remove { item, .. } => Planned::Remove(item.id()),
                    DiffOp::Insert { index, .. } => Planned::Insert(index),
                })
                .collect()
        };

        for step in plan {
            match step {
                Planned::Remove(id) => {
                    let Some(content) = self.overlays.remove(&id) else {
                        report.violation(SyncViolation::InternalInconsistency {
                            context: "removed overlay missing from index",
                        });
                        continue;
                    };
                    surface.remove_overlay(content.native);
                    report.op();
                }
                Planned::Insert(position) => {
                    let item = &snapshot.overlays[position];
                    let id = item.id();
                    if self.overlays.contains_id(&id) {
                        report.violation(SyncViolation::DuplicateIdentity {
                            id: format!("{id:?}"),
                        });
                        continue;
                    }
                    let content = self.factory.overlay_content(item);
                    if self.overlays.contains_native(content.native) {
                        report.violation(SyncViolation::DuplicateNativeObject {
                            native: content.native,
                        });
                        continue;
                    }
                    self.ensure_registered(content.registration, surface, report);
                    if self.overlays.insert(id, content).is_none() {
                        report.violation(SyncViolation::InternalInconsistency {
                            context: "overlay index refused insert",
                        });
                        continue;
                    }
                    surface.insert_overlay(content.native, position, content.level);
                    report.op();
                }
            }
        }
    }

    fn ensure_registered(
        &mut self,
        key: RegistrationKey,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        if self.registered.insert(key) {
            surface.register_adapter(key);
            report.op();
        }
    }

    fn sync_selection(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        match &self.previous {
            Some(prev) if prev.selected == snapshot.selected => return,
            // Nothing was ever selected and nothing should be: no write.
            None if snapshot.selected.is_empty() => return,
            _ => {}
        }
        match snapshot.selected.len() {
            0 => {
                surface.set_selection(None);
                report.op();
            }
            1 => {
                let Some(id) = snapshot.selected.iter().next() else {
                    return;
                };
                match self.annotations.get(id) {
                    Some(content) => {
                        surface.set_selection(Some(content.native));
                        report.op();
                    }
                    None => {
                        debug!(?id, "selected identity not materialized; selection deferred to a later snapshot");
                    }
                }
            }
            n => {
                warn!(count = n, "surface supports a single selection; ignoring multi-selection");
            }
        }
    }

    fn sync_camera_limits(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        let prev_boundary = self.previous.as_ref().and_then(|p| p.camera_boundary);
        if !snapshot.camera_boundary.approx_eq(&prev_boundary)
            && !snapshot.camera_boundary.approx_eq(&surface.camera_boundary())
        {
            surface.set_camera_boundary(snapshot.camera_boundary, snapshot.animated);
            report.op();
        }

        let prev_zoom = self.previous.as_ref().and_then(|p| p.camera_zoom_range);
        if !snapshot.camera_zoom_range.approx_eq(&prev_zoom)
            && !snapshot.camera_zoom_range.approx_eq(&surface.camera_zoom_range())
        {
            surface.set_camera_zoom_range(snapshot.camera_zoom_range, snapshot.animated);
            report.op();
        }
    }

    fn sync_scalars(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        let prev = self.previous.as_ref();

        if prev.map(|p| p.selectable_features) != Some(snapshot.selectable_features) {
            surface.set_selectable_features(snapshot.selectable_features);
            report.op();
        }
        if prev.map(|p| p.display) != Some(snapshot.display) {
            surface.set_display_options(snapshot.display);
            report.op();
        }
        if prev.map(|p| p.interactions) != Some(snapshot.interactions) {
            surface.set_interaction_modes(snapshot.interactions);
            report.op();
        }
    }

    fn sync_poi_filter(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        // Optional field: with no previous snapshot, an absent filter has
        // nothing to clear.
        let prev = self.previous.as_ref();
        if prev.and_then(|p| p.poi_filter.as_ref()) != snapshot.poi_filter.as_ref() {
            surface.set_poi_filter(snapshot.poi_filter.clone());
            report.op();
        }
    }

    /// Map kind goes last among the scalar writes: switching it resets some
    /// backends' layout, so it follows the margin scheduling.
    fn sync_map_kind(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        if self.previous.as_ref().map(|p| p.map_kind) != Some(snapshot.map_kind) {
            surface.set_map_kind(snapshot.map_kind);
            report.op();
        }
    }

    fn sync_tracking(
        &mut self,
        snapshot: &Snapshot<A, O>,
        surface: &mut dyn MapSurface,
        report: &mut ReconcileReport,
    ) {
        // `tracking: None` means the caller opted out of tracking sync.
        if let Some(mode) = snapshot.tracking
            && surface.tracking() != mode
        {
            surface.set_tracking(mode, snapshot.animated);
            report.op();
        }
    }

    fn schedule_camera(&mut self, snapshot: &Snapshot<A, O>, surface: &mut dyn MapSurface) {
        if self.region_is_changing {
            debug!("viewport change in flight; camera write suppressed");
            return;
        }
        // Skip when the desired camera matches either what was last asked
        // for or what the surface already shows.
        if self
            .previous
            .as_ref()
            .is_some_and(|p| p.camera.approx_eq(&snapshot.camera))
        {
            return;
        }
        let live_matches = match &snapshot.camera {
            CameraSpec::Region(region) => surface.region().approx_eq(region),
            CameraSpec::Rect(rect) => surface.visible_rect().approx_eq(rect),
        };
        if live_matches {
            return;
        }
        self.deferred.schedule(DeferredOp::SetCamera {
            animated: snapshot.animated,
        });
    }

    fn schedule_margins(&mut self, snapshot: &Snapshot<A, O>) {
        let prev_bottom = self.previous.as_ref().map(|p| p.obscured_bottom);
        if prev_bottom != Some(snapshot.obscured_bottom) {
            self.deferred.schedule(DeferredOp::ApplyMargins);
            self.deferred.schedule(DeferredOp::RecomputeVisible);
        }
    }

    /// Queue the zoom-to-nearest heuristic when a camera change left every
    /// item off-screen and the snapshot opted in.
    fn schedule_zoom_to_show(&mut self, snapshot: &Snapshot<A, O>, output: &OutputState<A::Id>) {
        if !snapshot.zoom_to_show_items {
            return;
        }
        let CameraSpec::Region(new_region) = snapshot.camera else {
            // The heuristic reasons in geographic space; rect-based cameras
            // opt out implicitly.
            return;
        };
        let camera_changed = match self.previous.as_ref().map(|p| p.camera) {
            Some(CameraSpec::Region(prev_region)) => !prev_region.approx_eq(&new_region),
            _ => true,
        };
        if camera_changed && output.visible_items.is_empty() && !self.annotations.is_empty() {
            self.deferred.schedule(DeferredOp::ZoomToNearest);
        }
    }

    fn service_manual_trigger(&mut self, snapshot: &Snapshot<A, O>, output: &mut OutputState<A::Id>) {
        if snapshot.visible_update_needed {
            self.deferred.schedule(DeferredOp::ApplyMargins);
            self.deferred.schedule(DeferredOp::RecomputeVisible);
            output.visible_update_needed = false;
        }
    }

    fn publish_registry(&mut self, snapshot: &Snapshot<A, O>, surface: &mut dyn MapSurface) {
        let Some(key) = &snapshot.registry_key else {
            return;
        };
        let Some(handle) = surface.escape_hatch() else {
            debug!(key = key.as_str(), "surface has no handle to publish");
            return;
        };
        self.registry.publish(key.clone(), handle);
        self.registry_key = Some(key.clone());
    }

    // -----------------------------------------------------------------------
    // Feedback
    // -----------------------------------------------------------------------

    /// Fold one surface event into the output state. Every output write is
    /// equality-gated; an echo of state the reconciler just wrote changes
    /// nothing.
    pub fn handle_event(
        &mut self,
        event: SurfaceEvent,
        surface: &mut dyn MapSurface,
        output: &mut OutputState<A::Id>,
    ) {
        match event {
            SurfaceEvent::RegionWillChange => {
                self.region_is_changing = true;
            }
            SurfaceEvent::RegionDidChange => {
                self.region_is_changing = false;
                if self.initial_region_change {
                    self.initial_region_change = false;
                    debug!("initial viewport settle swallowed");
                    return;
                }
                self.region_feedback(surface, output);
            }
            SurfaceEvent::DidSelect(native) => {
                let Some(id) = self.annotations.id_for_native(native) else {
                    debug!(%native, "selection feedback for unindexed object ignored");
                    return;
                };
                let id = id.clone();
                let already = output.selected_items.len() == 1 && output.selected_items.contains(&id);
                if !already {
                    output.selected_items.clear();
                    output.selected_items.insert(id);
                }
            }
            SurfaceEvent::DidDeselect(_) => {
                // Only an empty surface selection clears the output; during
                // a selection *switch* the deselect of the old item arrives
                // while the new one is already selected.
                if surface.selection().is_none() {
                    if output.selected_feature.is_some() {
                        output.selected_feature = None;
                    }
                    if !output.selected_items.is_empty() {
                        output.selected_items.clear();
                    }
                }
            }
            SurfaceEvent::DidAddAnnotations(_) => {
                // The surface-owned user-location marker must not swallow
                // taps meant for items underneath it.
                if let Some(user) = surface.user_location() {
                    surface.set_annotation_enabled(user, false);
                }
            }
            SurfaceEvent::TrackingModeChanged(mode) => {
                let opted_in = self.previous.as_ref().is_some_and(|p| p.tracking.is_some());
                if opted_in && output.tracking != mode {
                    output.tracking = mode;
                }
            }
            SurfaceEvent::FeatureSelected(feature) => {
                if output.selected_feature.as_ref() != Some(&feature) {
                    output.selected_feature = Some(feature);
                }
            }
        }
    }

    fn region_feedback(&mut self, surface: &mut dyn MapSurface, output: &mut OutputState<A::Id>) {
        self.deferred.schedule(DeferredOp::ApplyMargins);
        let live_region = surface.region();
        if !output.region.approx_eq(&live_region) {
            output.region = live_region;
        }
        let live_rect = surface.visible_rect();
        if !output.rect.approx_eq(&live_rect) {
            output.rect = live_rect;
        }
        self.deferred.schedule(DeferredOp::RecomputeVisible);
    }

    // -----------------------------------------------------------------------
    // Deferred execution
    // -----------------------------------------------------------------------

    /// Execute everything queued, in first-scheduled order. Each op reads
    /// current state: a camera op queued three snapshots ago writes the
    /// *latest* snapshot's camera, once.
    pub fn drain_deferred(
        &mut self,
        surface: &mut dyn MapSurface,
        output: &mut OutputState<A::Id>,
    ) {
        for op in self.deferred.take() {
            match op {
                DeferredOp::SetCamera { animated } => {
                    if self.region_is_changing {
                        debug!("viewport change in flight; deferred camera write dropped");
                        continue;
                    }
                    let Some(prev) = &self.previous else {
                        continue;
                    };
                    match prev.camera {
                        CameraSpec::Region(region) => {
                            if !surface.region().approx_eq(&region) {
                                surface.set_region(region, animated);
                            }
                        }
                        CameraSpec::Rect(rect) => {
                            if !surface.visible_rect().approx_eq(&rect) {
                                surface.set_visible_rect(rect, animated);
                            }
                        }
                    }
                }
                DeferredOp::ApplyMargins => {
                    let bottom = self.previous.as_ref().map_or(0.0, |p| p.obscured_bottom);
                    surface.set_bottom_margin(bottom);
                }
                DeferredOp::RecomputeVisible => {
                    self.recompute_visible(surface, output);
                }
                DeferredOp::ZoomToNearest => {
                    self.zoom_to_nearest(surface);
                }
            }
        }
    }

    fn recompute_visible(&self, surface: &mut dyn MapSurface, output: &mut OutputState<A::Id>) {
        // Surface-owned markers (user location) resolve to no identity and
        // drop out here.
        let visible: AHashSet<A::Id> = surface
            .annotations_in_viewport()
            .into_iter()
            .filter_map(|native| self.annotations.id_for_native(native).cloned())
            .collect();
        if output.visible_items != visible {
            output.visible_items = visible;
        }
    }

    /// Widen the viewport just enough to reveal the nearest item. Re-checks
    /// emptiness against the live viewport; the situation may have resolved
    /// since scheduling.
    fn zoom_to_nearest(&self, surface: &mut dyn MapSurface) {
        if self.annotations.is_empty() {
            return;
        }
        let viewport = surface.region();
        if self
            .annotations
            .iter()
            .any(|(_, content)| viewport.contains(&content.coordinate))
        {
            return;
        }
        let center = viewport.center;
        let nearest = self.annotations.iter().min_by(|(_, a), (_, b)| {
            center
                .distance_to(&a.coordinate)
                .total_cmp(&center.distance_to(&b.coordinate))
        });
        if let Some((_, content)) = nearest {
            let region = CoordinateRegion::spanning(center, &content.coordinate);
            surface.set_region(region, true);
        }
    }

    // -----------------------------------------------------------------------
    // Disposal
    // -----------------------------------------------------------------------

    /// Tear down registry state. Idempotent; also runs on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.registry_key.take().is_some() {
            self.registry.clear();
        }
    }
}

impl<A: MapItem, O: MapItem, F: ContentFactory<A, O>> Drop for Reconciler<A, O, F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
