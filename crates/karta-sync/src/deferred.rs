//! Deferred surface operations.
//!
//! Some surface writes must not happen in the middle of a reconcile pass —
//! camera writes in particular can re-enter the host synchronously with a
//! region-changed event. Those writes are queued here during the pass and
//! drained by the host once the pass (and any host-side layout) settles.
//!
//! The queue deduplicates by operation kind: scheduling an op that is
//! already pending replaces it, so the drain sees the latest parameters and
//! each kind executes at most once per cycle. Order of first scheduling is
//! preserved.

use core::mem::discriminant;

use smallvec::SmallVec;

/// An operation deferred until the end of the current host cycle.
///
/// Parameters are deliberately thin: each op reads the *current* reconciler
/// and surface state when it executes, not the state at scheduling time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredOp {
    /// Write the latest snapshot's camera to the surface.
    SetCamera { animated: bool },
    /// Re-apply the bottom layout margin.
    ApplyMargins,
    /// Recompute the visible-item set from the live viewport.
    RecomputeVisible,
    /// Zoom out just far enough to reveal the nearest off-screen item.
    ZoomToNearest,
}

/// Pending deferred operations, at most one per kind.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    ops: SmallVec<[DeferredOp; 4]>,
}

impl DeferredQueue {
    /// Queue `op`, replacing a pending op of the same kind in place.
    pub fn schedule(&mut self, op: DeferredOp) {
        if let Some(existing) = self
            .ops
            .iter_mut()
            .find(|pending| discriminant(&**pending) == discriminant(&op))
        {
            *existing = op;
        } else {
            self.ops.push(op);
        }
    }

    /// Take everything pending, leaving the queue empty.
    pub fn take(&mut self) -> SmallVec<[DeferredOp; 4]> {
        core::mem::take(&mut self.ops)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}
