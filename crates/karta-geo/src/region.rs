//! Center + span viewport regions.

use crate::coord::{Coordinate, CoordinateSpan};
use crate::ApproxEq;

/// Margin multiplier for [`CoordinateRegion::spanning`]. A span of exactly
/// twice the delta would put the target on the region boundary; 2.2 keeps it
/// strictly inside with ~10% margin per side.
const SPANNING_MARGIN: f64 = 2.2;

/// A geographic viewport described by its center and angular extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateRegion {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

impl CoordinateRegion {
    #[must_use]
    pub const fn new(center: Coordinate, span: CoordinateSpan) -> Self {
        Self { center, span }
    }

    /// Whether `coordinate` lies within the region's half-span box.
    ///
    /// Longitude is treated linearly; regions straddling the antimeridian
    /// are not special-cased (the native surfaces this feeds do not hand
    /// such regions back either).
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let dlat = (coordinate.latitude - self.center.latitude).abs();
        let dlon = (coordinate.longitude - self.center.longitude).abs();
        dlat <= self.span.latitude_delta / 2.0 && dlon <= self.span.longitude_delta / 2.0
    }

    /// Build a region centered on `center` wide enough to contain `target`
    /// with margin.
    ///
    /// The span is `2.2 ×` the absolute latitude/longitude delta to
    /// `target`, so the target ends up strictly inside the new viewport.
    /// This is the constructor behind the zoom-to-nearest heuristic.
    #[must_use]
    pub fn spanning(center: Coordinate, target: &Coordinate) -> Self {
        let latitude_delta = (center.latitude - target.latitude).abs() * SPANNING_MARGIN;
        let longitude_delta = (center.longitude - target.longitude).abs() * SPANNING_MARGIN;
        Self {
            center,
            span: CoordinateSpan::new(latitude_delta, longitude_delta),
        }
    }
}

impl ApproxEq for CoordinateRegion {
    fn approx_eq(&self, other: &Self) -> bool {
        self.center.approx_eq(&other.center) && self.span.approx_eq(&other.span)
    }
}
