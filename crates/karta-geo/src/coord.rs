//! Geographic coordinates and spans.

use crate::ApproxEq;

/// Mean Earth radius in meters, used for great-circle distances.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the globe in decimal degrees.
///
/// Latitude is positive north, longitude positive east. No normalization is
/// performed; callers are expected to hand in well-formed values the same
/// way they would to a native map view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance to `other`, in meters.
    ///
    /// Only used to rank candidate annotations in the zoom-to-nearest
    /// heuristic, so meter-level precision is more than enough.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl ApproxEq for Coordinate {
    fn approx_eq(&self, other: &Self) -> bool {
        self.latitude.approx_eq(&other.latitude) && self.longitude.approx_eq(&other.longitude)
    }
}

/// The extent of a region in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl CoordinateSpan {
    #[must_use]
    pub const fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }
}

impl ApproxEq for CoordinateSpan {
    fn approx_eq(&self, other: &Self) -> bool {
        self.latitude_delta.approx_eq(&other.latitude_delta)
            && self.longitude_delta.approx_eq(&other.longitude_delta)
    }
}
