//! Observable output state published by the reconciler.

use core::fmt;
use core::hash::Hash;

use ahash::AHashSet;
use karta_geo::{CoordinateRegion, MapRect};

use crate::feature::MapFeature;
use crate::options::TrackingMode;

/// What the surface currently looks like, as observed through feedback
/// events.
///
/// The reconciler is the only writer; every write is equality-gated so
/// downstream observers never see a no-op change. Region and rect are both
/// kept current so either camera representation can be consumed.
#[derive(Clone, Debug)]
pub struct OutputState<Id: Clone + Eq + Hash + fmt::Debug> {
    /// Live viewport as a geographic region.
    pub region: CoordinateRegion,
    /// Live viewport as a projected rect.
    pub rect: MapRect,
    /// Identities of annotations currently inside the viewport.
    pub visible_items: AHashSet<Id>,
    /// Identities currently selected on the surface (empty or singleton).
    pub selected_items: AHashSet<Id>,
    /// Built-in surface feature the user selected, if any.
    pub selected_feature: Option<MapFeature>,
    /// Live user-tracking mode.
    pub tracking: TrackingMode,
    /// Mirror of the manual visible-update trigger; the reconciler clears
    /// it once the trigger has been serviced.
    pub visible_update_needed: bool,
}

impl<Id: Clone + Eq + Hash + fmt::Debug> Default for OutputState<Id> {
    fn default() -> Self {
        Self {
            region: CoordinateRegion::default(),
            rect: MapRect::default(),
            visible_items: AHashSet::new(),
            selected_items: AHashSet::new(),
            selected_feature: None,
            tracking: TrackingMode::None,
            visible_update_needed: false,
        }
    }
}

impl<Id: Clone + Eq + Hash + fmt::Debug> OutputState<Id> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
