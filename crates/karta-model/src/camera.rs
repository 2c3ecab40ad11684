//! Camera specifications: desired viewport, pan boundary, zoom limits.

use karta_geo::{ApproxEq, CoordinateRegion, MapRect};

/// The desired viewport, in one of the two representations surfaces accept.
///
/// A snapshot carries exactly one of these — the enum replaces a pair of
/// fields plus a discriminator flag, so region and rect can never both be
/// authoritative at once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraSpec {
    /// Geographic center + span.
    Region(CoordinateRegion),
    /// Projected rectangle in the surface's own space.
    Rect(MapRect),
}

impl ApproxEq for CameraSpec {
    fn approx_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Region(a), Self::Region(b)) => a.approx_eq(b),
            (Self::Rect(a), Self::Rect(b)) => a.approx_eq(b),
            _ => false,
        }
    }
}

/// A region the camera center may not leave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBoundary {
    pub region: CoordinateRegion,
}

impl CameraBoundary {
    #[must_use]
    pub const fn new(region: CoordinateRegion) -> Self {
        Self { region }
    }
}

impl ApproxEq for CameraBoundary {
    fn approx_eq(&self, other: &Self) -> bool {
        self.region.approx_eq(&other.region)
    }
}

/// Camera-to-center distance limits, in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraZoomRange {
    pub min_distance: f64,
    pub max_distance: f64,
}

impl CameraZoomRange {
    #[must_use]
    pub const fn new(min_distance: f64, max_distance: f64) -> Self {
        Self {
            min_distance,
            max_distance,
        }
    }
}

impl ApproxEq for CameraZoomRange {
    fn approx_eq(&self, other: &Self) -> bool {
        self.min_distance.approx_eq(&other.min_distance)
            && self.max_distance.approx_eq(&other.max_distance)
    }
}
