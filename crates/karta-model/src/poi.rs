//! Point-of-interest filtering.

/// A named point-of-interest category (cafes, museums, transit stops, ...).
///
/// Categories are opaque strings defined by the surface backend; Karta only
/// carries them through.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoiCategory(String);

impl PoiCategory {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Which built-in points of interest the surface should render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoiFilter {
    IncludeAll,
    ExcludeAll,
    Including(Vec<PoiCategory>),
    Excluding(Vec<PoiCategory>),
}
