//! Per-pass reconcile outcome: violation reports and the op count.

use core::fmt;

use karta_model::NativeId;
use smallvec::SmallVec;

/// A caller contract violation detected while applying a snapshot.
///
/// Violations never abort the pass: the offending item is skipped, the rest
/// of the snapshot applies, and the violation lands here and in the log.
/// With the `strict-violations` feature the same condition panics instead,
/// for builds that prefer to fail loudly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncViolation {
    /// Two items in one snapshot collection share an identity.
    DuplicateIdentity { id: String },
    /// The content factory produced a native object already owned by
    /// another descriptor.
    DuplicateNativeObject { native: NativeId },
    /// The content index and the applied snapshot disagree; indicates a bug
    /// in the reconciler itself or factory misbehavior.
    InternalInconsistency { context: &'static str },
}

impl fmt::Display for SyncViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentity { id } => write!(f, "duplicate item identity {id}"),
            Self::DuplicateNativeObject { native } => {
                write!(f, "native object {native} already indexed")
            }
            Self::InternalInconsistency { context } => {
                write!(f, "index inconsistency: {context}")
            }
        }
    }
}

/// What one reconcile pass did.
#[derive(Clone, Debug, Default)]
pub struct ReconcileReport {
    /// Contract violations encountered this pass, in detection order.
    pub violations: SmallVec<[SyncViolation; 2]>,
    /// Number of mutating surface calls issued synchronously this pass.
    /// Zero for a snapshot identical to the previous one.
    pub surface_ops: usize,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub(crate) fn violation(&mut self, violation: SyncViolation) {
        tracing::warn!(%violation, "snapshot contract violation");
        if cfg!(feature = "strict-violations") {
            panic!("snapshot contract violation: {violation}");
        }
        self.violations.push(violation);
    }

    pub(crate) fn op(&mut self) {
        self.surface_ops += 1;
    }
}
