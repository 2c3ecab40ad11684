#![forbid(unsafe_code)]

//! Reconciliation core for Karta: turns declarative map snapshots into
//! minimal imperative surface mutations.
//!
//! The host owns a [`Reconciler`] per surface and feeds it three things:
//! desired-state [`Snapshot`](karta_model::Snapshot)s, surface
//! [`SurfaceEvent`](karta_model::SurfaceEvent)s, and one
//! [`drain_deferred`](Reconciler::drain_deferred) call per cycle. Everything
//! else — identity diffing, content materialization, equality gating,
//! feedback-loop suppression — happens inside.
//!
//! Module map:
//!
//! - [`diff`] — identity-keyed LCS edit scripts
//! - [`index`] — dual-direction descriptor index (logical id ⇄ native id)
//! - [`deferred`] — the end-of-cycle operation queue
//! - [`reconciler`] — the coordinator tying it all together
//! - [`registry`] — keyed escape hatch to live surface handles
//! - [`report`] — per-pass violation reports

pub mod deferred;
pub mod diff;
pub mod index;
pub mod reconciler;
pub mod registry;
pub mod report;

pub use deferred::{DeferredOp, DeferredQueue};
pub use diff::{diff_by_key, DiffOp};
pub use index::{ContentIndex, NativeKeyed, Slot};
pub use reconciler::Reconciler;
pub use registry::ViewRegistry;
pub use report::{ReconcileReport, SyncViolation};
