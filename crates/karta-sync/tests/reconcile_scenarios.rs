//! End-to-end reconciliation scenarios driven through the recording mock
//! surface: exact call sequences, equality gating, feedback suppression.

use karta_geo::{ApproxEq, Coordinate, CoordinateRegion, CoordinateSpan, MapPoint, MapRect, MapSize};
use karta_harness::{MockSurface, Pin, SequentialFactory, Shape, SurfaceCall};
use karta_model::{
    CameraBoundary, CameraZoomRange, FeatureKind, MapFeature, MapSurface, NativeId, OutputState,
    OverlayLevel, PoiCategory, PoiFilter, RegistrationKey, Snapshot, SurfaceEvent,
};
use karta_sync::{Reconciler, SyncViolation, ViewRegistry};

type TestReconciler = Reconciler<Pin, Shape, SequentialFactory>;

fn reconciler() -> TestReconciler {
    Reconciler::with_registry(SequentialFactory::new(), ViewRegistry::new())
}

fn reconciler_with(factory: SequentialFactory) -> TestReconciler {
    Reconciler::with_registry(factory, ViewRegistry::new())
}

fn region(lat: f64, lon: f64, span: f64) -> CoordinateRegion {
    CoordinateRegion::new(Coordinate::new(lat, lon), CoordinateSpan::new(span, span))
}

fn snapshot(camera: CoordinateRegion) -> Snapshot<Pin, Shape> {
    Snapshot::with_region(camera)
}

// ---------------------------------------------------------------------------
// Identity diffing end to end
// ---------------------------------------------------------------------------

#[test]
fn membership_shift_issues_exactly_one_remove_and_one_add() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);

    let first = snapshot(camera).annotations(vec![
        Pin::new("a", 0.1, 0.1),
        Pin::new("b", 0.2, 0.2),
        Pin::new("c", 0.3, 0.3),
    ]);
    r.update(first, &mut surface, &mut output);
    // Sequential natives: a=1, b=2, c=3, added in snapshot order after the
    // one-time adapter registration.
    assert_eq!(
        &surface.log()[..4],
        &[
            SurfaceCall::RegisterAdapter(RegistrationKey::of::<karta_harness::PinMarker>()),
            SurfaceCall::AddAnnotation(NativeId(1)),
            SurfaceCall::AddAnnotation(NativeId(2)),
            SurfaceCall::AddAnnotation(NativeId(3)),
        ]
    );

    surface.clear_log();
    let second = snapshot(camera).annotations(vec![
        Pin::new("b", 0.2, 0.2),
        Pin::new("c", 0.3, 0.3),
        Pin::new("d", 0.4, 0.4),
    ]);
    let report = r.update(second, &mut surface, &mut output);

    assert!(report.is_clean());
    assert_eq!(
        surface.log(),
        &[
            SurfaceCall::RemoveAnnotation(NativeId(1)),
            SurfaceCall::AddAnnotation(NativeId(4)),
        ]
    );
    assert_eq!(surface.annotation_order(), &[
        NativeId(2),
        NativeId(3),
        NativeId(4)
    ]);
}

#[test]
fn identical_snapshot_is_a_complete_no_op() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let build = || {
        snapshot(region(41.886, -87.679, 0.5))
            .annotations(vec![Pin::new("a", 41.9, -87.7), Pin::new("b", 41.8, -87.6)])
            .zoom_to_show_items(false)
            .obscured_bottom(48.0)
    };
    r.update(build(), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);

    surface.clear_log();
    let report = r.update(build(), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);

    assert_eq!(report.surface_ops, 0);
    assert!(surface.log().is_empty());
}

#[test]
fn item_mutation_without_identity_change_is_invisible() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);

    r.update(
        snapshot(camera).annotations(vec![Pin::new("a", 0.1, 0.1)]),
        &mut surface,
        &mut output,
    );
    surface.clear_log();
    // Same identity, moved coordinate: identity diffing does not care.
    r.update(
        snapshot(camera).annotations(vec![Pin::new("a", 0.9, 0.9)]),
        &mut surface,
        &mut output,
    );
    assert_eq!(
        surface.count_matching(|c| matches!(
            c,
            SurfaceCall::AddAnnotation(_) | SurfaceCall::RemoveAnnotation(_)
        )),
        0
    );
}

#[test]
fn overlays_reorder_via_remove_and_indexed_insert() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);

    let first = snapshot(camera).overlays(vec![
        Shape::new("s1").level(OverlayLevel::AboveRoads),
        Shape::new("s2"),
    ]);
    r.update(first, &mut surface, &mut output);
    assert_eq!(surface.overlay_order(), &[NativeId(1), NativeId(2)]);

    surface.clear_log();
    let second = snapshot(camera).overlays(vec![
        Shape::new("s2"),
        Shape::new("s1").level(OverlayLevel::AboveRoads),
    ]);
    r.update(second, &mut surface, &mut output);

    // s1 is the moved one: removed, re-materialized, inserted at its new
    // position.
    assert_eq!(
        surface.log(),
        &[
            SurfaceCall::RemoveOverlay(NativeId(1)),
            SurfaceCall::InsertOverlay {
                native: NativeId(3),
                index: 1,
                level: Some(OverlayLevel::AboveRoads),
            },
        ]
    );
    assert_eq!(surface.overlay_order(), &[NativeId(2), NativeId(3)]);
}

// ---------------------------------------------------------------------------
// Contract violations
// ---------------------------------------------------------------------------

#[cfg(not(feature = "strict-violations"))]
#[test]
fn duplicate_identity_skips_second_item_and_applies_the_rest() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let snap = snapshot(region(0.0, 0.0, 1.0)).annotations(vec![
        Pin::new("x1", 0.1, 0.1),
        Pin::new("x1", 0.5, 0.5),
        Pin::new("x2", 0.2, 0.2),
    ]);
    let report = r.update(snap, &mut surface, &mut output);

    assert_eq!(report.violations.len(), 1);
    assert!(matches!(
        &report.violations[0],
        SyncViolation::DuplicateIdentity { id } if id.contains("x1")
    ));
    // First x1 and x2 made it to the surface; the duplicate did not.
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::AddAnnotation(_))),
        2
    );
    assert_eq!(r.annotation_count(), 2);
}

#[cfg(not(feature = "strict-violations"))]
#[test]
fn duplicate_native_object_skips_offending_item() {
    let mut factory = SequentialFactory::new();
    factory.reuse_native = Some(NativeId(7));
    let mut r = reconciler_with(factory);
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let snap = snapshot(region(0.0, 0.0, 1.0))
        .annotations(vec![Pin::new("a", 0.1, 0.1), Pin::new("b", 0.2, 0.2)]);
    let report = r.update(snap, &mut surface, &mut output);

    assert_eq!(
        report.violations.as_slice(),
        &[SyncViolation::DuplicateNativeObject { native: NativeId(7) }]
    );
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::AddAnnotation(_))),
        1
    );
}

#[cfg(not(feature = "strict-violations"))]
#[test]
fn recovery_after_duplicate_identity_diffs_from_applied_state() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);

    let dirty = snapshot(camera).annotations(vec![
        Pin::new("x1", 0.1, 0.1),
        Pin::new("x1", 0.5, 0.5),
    ]);
    r.update(dirty, &mut surface, &mut output);
    surface.clear_log();

    // A clean follow-up containing the surviving item changes nothing.
    let clean = snapshot(camera).annotations(vec![Pin::new("x1", 0.1, 0.1)]);
    let report = r.update(clean, &mut surface, &mut output);
    assert!(report.is_clean());
    assert_eq!(
        surface.count_matching(|c| matches!(
            c,
            SurfaceCall::AddAnnotation(_) | SurfaceCall::RemoveAnnotation(_)
        )),
        0
    );
    assert_eq!(surface.annotation_order(), &[NativeId(1)]);
}

// ---------------------------------------------------------------------------
// Adapter registration
// ---------------------------------------------------------------------------

#[test]
fn each_adapter_type_registers_exactly_once() {
    struct AltMarker;

    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);
    let alt = RegistrationKey::of::<AltMarker>();

    let first = snapshot(camera).annotations(vec![
        Pin::new("a", 0.1, 0.1),
        Pin::new("b", 0.2, 0.2).with_registration(alt),
    ]);
    r.update(first, &mut surface, &mut output);
    let second = snapshot(camera).annotations(vec![
        Pin::new("a", 0.1, 0.1),
        Pin::new("b", 0.2, 0.2).with_registration(alt),
        Pin::new("c", 0.3, 0.3).with_registration(alt),
    ]);
    r.update(second, &mut surface, &mut output);

    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::RegisterAdapter(_))),
        2
    );
    assert_eq!(
        surface.count_matching(|c| *c == SurfaceCall::RegisterAdapter(alt)),
        1
    );
}

// ---------------------------------------------------------------------------
// Camera equality gating
// ---------------------------------------------------------------------------

#[test]
fn sub_epsilon_camera_echo_issues_no_write() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    r.update(snapshot(region(41.886, -87.679, 0.5)), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::SetRegion { .. })),
        1
    );

    // A snapshot reflecting the surface's own sub-epsilon echo.
    r.update(
        snapshot(region(41.886 + 1e-9, -87.679, 0.5)),
        &mut surface,
        &mut output,
    );
    r.drain_deferred(&mut surface, &mut output);
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::SetRegion { .. })),
        1
    );

    // A genuine pan is past epsilon and goes through.
    r.update(
        snapshot(region(41.886 + 0.01, -87.679, 0.5)),
        &mut surface,
        &mut output,
    );
    r.drain_deferred(&mut surface, &mut output);
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::SetRegion { .. })),
        2
    );
}

#[test]
fn rect_camera_writes_through_set_visible_rect() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let rect = MapRect::new(MapPoint::new(100.0, 200.0), MapSize::new(50.0, 50.0));
    r.update(Snapshot::with_rect(rect), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);
    assert_eq!(
        surface.count_matching(|c| *c == SurfaceCall::SetVisibleRect { rect, animated: false }),
        1
    );
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::SetRegion { .. })),
        0
    );

    // An identical rect snapshot is a complete no-op.
    surface.clear_log();
    r.update(Snapshot::with_rect(rect), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);
    assert!(surface.log().is_empty());

    // A moved rect goes through.
    let moved = MapRect::new(MapPoint::new(150.0, 200.0), MapSize::new(50.0, 50.0));
    r.update(Snapshot::with_rect(moved), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);
    assert_eq!(
        surface.log(),
        &[SurfaceCall::SetVisibleRect {
            rect: moved,
            animated: false,
        }]
    );
}

// ---------------------------------------------------------------------------
// Camera limits and POI filter
// ---------------------------------------------------------------------------

#[test]
fn camera_limits_written_once_per_change() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);
    let boundary = CameraBoundary::new(region(0.0, 0.0, 4.0));
    let zoom = CameraZoomRange::new(100.0, 50_000.0);
    let limits = |c: &SurfaceCall| {
        matches!(
            c,
            SurfaceCall::SetCameraBoundary(_) | SurfaceCall::SetCameraZoomRange(_)
        )
    };

    // Absent limits on the first pass: nothing to clear, no write.
    r.update(snapshot(camera), &mut surface, &mut output);
    assert_eq!(surface.count_matching(limits), 0);

    // Limits appear: one write each.
    let with_limits = || {
        snapshot(camera)
            .camera_boundary(boundary)
            .camera_zoom_range(zoom)
    };
    r.update(with_limits(), &mut surface, &mut output);
    assert_eq!(
        surface.count_matching(|c| *c == SurfaceCall::SetCameraBoundary(Some(boundary))),
        1
    );
    assert_eq!(
        surface.count_matching(|c| *c == SurfaceCall::SetCameraZoomRange(Some(zoom))),
        1
    );

    // Unchanged limits on the next pass: no further writes.
    r.update(with_limits(), &mut surface, &mut output);
    assert_eq!(surface.count_matching(limits), 2);
}

#[test]
fn camera_limits_skipped_when_surface_already_holds_them() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let boundary = CameraBoundary::new(region(0.0, 0.0, 4.0));
    let zoom = CameraZoomRange::new(100.0, 50_000.0);

    // The surface reached these limits on its own (say, a previous owner).
    surface.set_camera_boundary(Some(boundary), false);
    surface.set_camera_zoom_range(Some(zoom), false);
    surface.clear_log();

    let snap = snapshot(region(0.0, 0.0, 1.0))
        .camera_boundary(boundary)
        .camera_zoom_range(zoom);
    r.update(snap, &mut surface, &mut output);
    assert_eq!(
        surface.count_matching(|c| matches!(
            c,
            SurfaceCall::SetCameraBoundary(_) | SurfaceCall::SetCameraZoomRange(_)
        )),
        0
    );
}

#[test]
fn poi_filter_writes_only_on_change_and_clears_explicitly() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);
    let filter = PoiFilter::Including(vec![PoiCategory::new("cafe")]);

    // No filter on the first pass: nothing to clear, no write.
    r.update(snapshot(camera), &mut surface, &mut output);
    // Filter appears, stays, then disappears.
    r.update(snapshot(camera).poi_filter(filter.clone()), &mut surface, &mut output);
    r.update(snapshot(camera).poi_filter(filter.clone()), &mut surface, &mut output);
    r.update(snapshot(camera), &mut surface, &mut output);

    let writes: Vec<_> = surface
        .log()
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::SetPoiFilter(f) => Some(f.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(writes, vec![Some(filter), None]);
}

// ---------------------------------------------------------------------------
// Zoom-to-nearest heuristic
// ---------------------------------------------------------------------------

#[test]
fn zoom_to_nearest_widens_viewport_with_one_animated_write() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let snap = snapshot(region(0.0, 0.0, 1.0))
        .annotations(vec![Pin::new("far", 10.0, 10.0), Pin::new("near", 3.0, 3.0)])
        .zoom_to_show_items(true);
    r.update(snap, &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);

    let zoom_writes: Vec<_> = surface
        .log()
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::SetRegion {
                region,
                animated: true,
            } => Some(*region),
            _ => None,
        })
        .collect();
    assert_eq!(zoom_writes.len(), 1);
    let written = zoom_writes[0];
    // Centered on the old viewport, sized for the *nearest* pin (3, 3) with
    // margin: more than twice the delta, so the pin sits strictly inside.
    assert!(written.center.approx_eq(&Coordinate::new(0.0, 0.0)));
    assert!(written.span.latitude_delta > 6.0);
    assert!(written.contains(&Coordinate::new(3.0, 3.0)));
    assert!(!written.contains(&Coordinate::new(10.0, 10.0)));
}

#[test]
fn zoom_heuristic_skipped_when_an_item_is_already_visible() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let snap = snapshot(region(0.0, 0.0, 1.0))
        .annotations(vec![Pin::new("in", 0.1, 0.1), Pin::new("out", 10.0, 10.0)])
        .zoom_to_show_items(true);
    r.update(snap, &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);

    assert_eq!(
        surface.count_matching(
            |c| matches!(c, SurfaceCall::SetRegion { animated: true, .. })
        ),
        0
    );
}

#[test]
fn zoom_heuristic_requires_opt_in() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let snap = snapshot(region(0.0, 0.0, 1.0)).annotations(vec![Pin::new("far", 10.0, 10.0)]);
    r.update(snap, &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);

    assert_eq!(
        surface.count_matching(
            |c| matches!(c, SurfaceCall::SetRegion { animated: true, .. })
        ),
        0
    );
}

// ---------------------------------------------------------------------------
// Selection round trip
// ---------------------------------------------------------------------------

#[test]
fn selection_round_trip_does_not_ping_pong() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);
    let pins = || vec![Pin::new("a", 0.1, 0.1), Pin::new("b", 0.2, 0.2)];

    r.update(snapshot(camera).annotations(pins()), &mut surface, &mut output);

    // Forward: snapshot selects "b".
    r.update(
        snapshot(camera).annotations(pins()).selected(["b"]),
        &mut surface,
        &mut output,
    );
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::SetSelection(Some(_)))),
        1
    );
    assert_eq!(surface.selection(), Some(NativeId(2)));

    // Feedback: the surface confirms the selection.
    r.handle_event(SurfaceEvent::DidSelect(NativeId(2)), &mut surface, &mut output);
    assert_eq!(output.selected_items.len(), 1);
    assert!(output.selected_items.contains("b"));

    // The host re-renders with the now-agreed selection: no further writes.
    r.update(
        snapshot(camera).annotations(pins()).selected(["b"]),
        &mut surface,
        &mut output,
    );
    assert_eq!(
        surface.count_matching(|c| matches!(c, SurfaceCall::SetSelection(_))),
        1
    );
}

#[test]
fn deselect_clears_output_only_when_surface_selection_is_empty() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(0.0, 0.0, 1.0);
    let pins = || vec![Pin::new("a", 0.1, 0.1), Pin::new("b", 0.2, 0.2)];

    r.update(
        snapshot(camera).annotations(pins()).selected(["a"]),
        &mut surface,
        &mut output,
    );
    r.handle_event(SurfaceEvent::DidSelect(NativeId(1)), &mut surface, &mut output);

    // Selection switch: deselect of "a" arrives while "b" is selected.
    surface.set_selection(Some(NativeId(2)));
    r.handle_event(SurfaceEvent::DidDeselect(NativeId(1)), &mut surface, &mut output);
    assert!(output.selected_items.contains("a"));

    // True deselect: surface selection is empty.
    surface.set_selection(None);
    r.handle_event(SurfaceEvent::DidDeselect(NativeId(2)), &mut surface, &mut output);
    assert!(output.selected_items.is_empty());
}

#[test]
fn selection_feedback_for_unknown_native_is_ignored() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    r.update(
        snapshot(region(0.0, 0.0, 1.0)).annotations(vec![Pin::new("a", 0.1, 0.1)]),
        &mut surface,
        &mut output,
    );
    r.handle_event(SurfaceEvent::DidSelect(NativeId(999)), &mut surface, &mut output);
    assert!(output.selected_items.is_empty());
}

#[test]
fn feature_selection_reaches_output_and_clears_on_deselect() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    r.update(snapshot(region(0.0, 0.0, 1.0)), &mut surface, &mut output);

    let mut feature = MapFeature::new(FeatureKind::PointOfInterest);
    feature.title = Some("Museum".to_owned());
    r.handle_event(
        SurfaceEvent::FeatureSelected(feature.clone()),
        &mut surface,
        &mut output,
    );
    assert_eq!(output.selected_feature.as_ref(), Some(&feature));

    // A repeat of the same feature leaves the output untouched.
    r.handle_event(
        SurfaceEvent::FeatureSelected(feature.clone()),
        &mut surface,
        &mut output,
    );
    assert_eq!(output.selected_feature.as_ref(), Some(&feature));

    // A true deselect (surface selection empty) clears it.
    r.handle_event(SurfaceEvent::DidDeselect(NativeId(1)), &mut surface, &mut output);
    assert!(output.selected_feature.is_none());
}

// ---------------------------------------------------------------------------
// Region feedback
// ---------------------------------------------------------------------------

#[test]
fn initial_region_settle_is_swallowed_subsequent_ones_publish() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    let camera = region(41.886, -87.679, 0.5);

    r.update(snapshot(camera), &mut surface, &mut output);
    r.drain_deferred(&mut surface, &mut output);

    // The settle of the surface's own initial layout carries no user
    // intent.
    r.handle_event(SurfaceEvent::RegionWillChange, &mut surface, &mut output);
    r.handle_event(SurfaceEvent::RegionDidChange, &mut surface, &mut output);
    assert!(output.region.approx_eq(&CoordinateRegion::default()));
    assert!(!r.has_pending_ops());

    // A real gesture afterwards publishes the live viewport and queues the
    // visibility recompute.
    r.handle_event(SurfaceEvent::RegionWillChange, &mut surface, &mut output);
    r.handle_event(SurfaceEvent::RegionDidChange, &mut surface, &mut output);
    assert!(output.region.approx_eq(&camera));
    assert!(r.has_pending_ops());
    r.drain_deferred(&mut surface, &mut output);
}

#[test]
fn visible_items_follow_the_live_viewport() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();

    let snap = snapshot(region(0.0, 0.0, 1.0))
        .annotations(vec![Pin::new("in", 0.1, 0.1), Pin::new("out", 5.0, 5.0)]);
    r.update(snap, &mut surface, &mut output);
    surface.place(NativeId(1), Coordinate::new(0.1, 0.1));
    surface.place(NativeId(2), Coordinate::new(5.0, 5.0));
    r.drain_deferred(&mut surface, &mut output);

    assert_eq!(output.visible_items.len(), 1);
    assert!(output.visible_items.contains("in"));
}

#[test]
fn user_location_marker_never_appears_in_visible_items() {
    let mut r = reconciler();
    let mut surface = MockSurface::new();
    let mut output = OutputState::new();
    surface.set_user_location(NativeId(500), Coordinate::new(0.0, 0.0));

    let snap = snapshot(region(0.0, 0.0, 1.0)).annotations(vec![Pin::new("a", 0.1, 0.1)]);
    r.update(snap, &mut surface, &mut output);
    surface.place(NativeId(1), Coordinate::new(0.1, 0.1));
    r.drain_deferred(&mut surface, &mut output);

    assert_eq!(output.visible_items.len(), 1);
    assert!(output.visible_items.contains("a"));
}
