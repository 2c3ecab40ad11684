//! Projected map rects.
//!
//! A [`MapRect`] is a rectangle in the surface backend's own projected
//! coordinate space. Karta never projects or unprojects — the rect is read
//! from the surface, compared approximately, and handed back verbatim. The
//! alternative camera representation (region-based) lives in
//! [`region`](crate::region).

use crate::ApproxEq;

/// A point in the surface's projected space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An extent in the surface's projected space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl MapSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in the surface's projected space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapRect {
    pub origin: MapPoint,
    pub size: MapSize,
}

impl MapRect {
    #[must_use]
    pub const fn new(origin: MapPoint, size: MapSize) -> Self {
        Self { origin, size }
    }
}

impl ApproxEq for MapPoint {
    fn approx_eq(&self, other: &Self) -> bool {
        self.x.approx_eq(&other.x) && self.y.approx_eq(&other.y)
    }
}

impl ApproxEq for MapSize {
    fn approx_eq(&self, other: &Self) -> bool {
        self.width.approx_eq(&other.width) && self.height.approx_eq(&other.height)
    }
}

impl ApproxEq for MapRect {
    fn approx_eq(&self, other: &Self) -> bool {
        self.origin.approx_eq(&other.origin) && self.size.approx_eq(&other.size)
    }
}
