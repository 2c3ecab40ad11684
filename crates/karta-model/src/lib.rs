#![forbid(unsafe_code)]

//! The declarative data model for Karta.
//!
//! A caller describes desired map state as an immutable [`Snapshot`] — items
//! to render, camera position, selection, display options — and hands it to
//! the reconciler in `karta-sync`, which brings a long-lived imperative
//! [`MapSurface`] into line with it. User-driven changes on the surface
//! (pans, zooms, taps) flow back as [`SurfaceEvent`]s and are published into
//! an [`OutputState`].
//!
//! This crate is pure data plus the two seams the reconciler consumes:
//!
//! - [`MapSurface`]: the imperative surface adapter (add/remove items, set
//!   camera, query viewport). Implemented by platform backends and by the
//!   `karta-harness` mock.
//! - [`ContentFactory`]: materializes a logical item into its native
//!   representation, invoked lazily and at most once per identity while the
//!   identity remains present.
//!
//! Nothing here performs synchronization; see `karta-sync` for the engine.

pub mod camera;
pub mod content;
pub mod feature;
pub mod options;
pub mod output;
pub mod poi;
pub mod snapshot;
pub mod surface;

pub use camera::{CameraBoundary, CameraSpec, CameraZoomRange};
pub use content::{
    AnnotationContent, ContentFactory, MapItem, NativeId, OverlayContent, OverlayLevel,
    RegistrationKey,
};
pub use feature::{FeatureKind, IconStyle, MapFeature};
pub use options::{DisplayOptions, FeatureOptions, InteractionModes, MapKind, TrackingMode};
pub use output::OutputState;
pub use poi::{PoiCategory, PoiFilter};
pub use snapshot::Snapshot;
pub use surface::{MapSurface, RegistryKey, SurfaceEvent, SurfaceHandle};
