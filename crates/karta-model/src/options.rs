//! Option sets and mode enums mirrored onto the surface.

use bitflags::bitflags;

bitflags! {
    /// Which informational layers and chrome the surface should show.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DisplayOptions: u32 {
        const BUILDINGS     = 1 << 0;
        const COMPASS       = 1 << 1;
        const SCALE         = 1 << 2;
        const TRAFFIC       = 1 << 3;
        const USER_LOCATION = 1 << 4;
        const ZOOM_CONTROLS = 1 << 5;
        const PITCH_CONTROL = 1 << 6;
    }
}

impl DisplayOptions {
    /// The surface's out-of-the-box visibility set.
    pub const DEFAULT: Self = Self::BUILDINGS;
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

bitflags! {
    /// Which user gestures the surface should accept.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InteractionModes: u32 {
        const PAN    = 1 << 0;
        const ZOOM   = 1 << 1;
        const ROTATE = 1 << 2;
        const PITCH  = 1 << 3;
    }
}

impl Default for InteractionModes {
    fn default() -> Self {
        Self::all()
    }
}

bitflags! {
    /// Which built-in surface features are tappable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct FeatureOptions: u32 {
        const POINTS_OF_INTEREST = 1 << 0;
        const TERRITORIES        = 1 << 1;
        const PHYSICAL_FEATURES  = 1 << 2;
    }
}

/// Base cartography style of the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapKind {
    #[default]
    Standard,
    Satellite,
    Hybrid,
}

/// How the camera follows the user's location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingMode {
    #[default]
    None,
    Follow,
    FollowWithHeading,
}
