//! Built-in surface features selected by the user.
//!
//! When feature selection is enabled (see
//! [`FeatureOptions`](crate::FeatureOptions)), tapping a surface-owned
//! landmark produces a [`MapFeature`] descriptor which the reconciler passes
//! through to the output state. It is output-only: snapshots never carry
//! one.

use karta_geo::Coordinate;

use crate::poi::PoiCategory;

/// What kind of built-in feature was selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    PointOfInterest,
    Territory,
    PhysicalFeature,
}

/// Visual style of the feature's marker as reported by the surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconStyle {
    /// RGBA background color of the marker.
    pub background: [u8; 4],
    /// Symbol name, when the backend exposes one.
    pub symbol: Option<String>,
}

/// A surface-owned feature the user selected.
#[derive(Clone, Debug, PartialEq)]
pub struct MapFeature {
    pub kind: FeatureKind,
    pub coordinate: Option<Coordinate>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Option<PoiCategory>,
    pub icon: Option<IconStyle>,
}

impl MapFeature {
    /// A feature with just a kind; the rest filled in by the backend as
    /// available.
    #[must_use]
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            coordinate: None,
            title: None,
            subtitle: None,
            category: None,
            icon: None,
        }
    }
}
