#![forbid(unsafe_code)]

//! Geographic primitives for Karta.
//!
//! Everything the reconciliation core needs to talk about viewports:
//! [`Coordinate`], [`CoordinateSpan`], [`CoordinateRegion`], and the opaque
//! projected [`MapRect`]. Deliberately small — no projection or geocoding
//! math lives here beyond the great-circle distance used by the
//! zoom-to-nearest heuristic. The surface backend owns its projection;
//! [`MapRect`] is carried through untouched.
//!
//! # Approximate equality
//!
//! Camera state read back from a live surface rarely round-trips bit-exact
//! (animation interpolation, float order-of-operations). All comparisons the
//! reconciler gates writes on go through [`ApproxEq`] with [`EPSILON`] so a
//! sub-epsilon echo never triggers another native call.

pub mod coord;
pub mod rect;
pub mod region;

pub use coord::{Coordinate, CoordinateSpan};
pub use rect::{MapPoint, MapRect, MapSize};
pub use region::CoordinateRegion;

/// Tolerance for approximate equality of geographic values, in degrees (or
/// projected units for [`MapRect`]).
///
/// Chosen so that feedback echoes of a just-issued write (deltas around
/// `1e-9`) compare equal, while any user-visible pan or zoom (deltas of
/// `1e-2` and up) does not.
pub const EPSILON: f64 = 1e-6;

/// Component-wise approximate equality under [`EPSILON`].
pub trait ApproxEq {
    /// Whether `self` and `other` differ by less than [`EPSILON`] in every
    /// component.
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }
}

impl<T: ApproxEq> ApproxEq for Option<T> {
    fn approx_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.approx_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}
