//! Module `search` implements `find_first_ge_child` and the root-to-
//! leaf descent shared by lookup, insert and delete (§4.3, §4.4).

use std::cmp::Ordering;
use std::sync::Arc;

use crate::content::{KeySlot, Node};
use crate::types::Comparator;

fn slot_cmp<K>(slot: &KeySlot<K>, target: &K, cmp: &dyn Comparator<K>) -> Ordering {
    match slot {
        KeySlot::NegInf => Ordering::Less,
        KeySlot::PosInf => Ordering::Greater,
        KeySlot::Bounded(k) => cmp.compare(k, target),
    }
}

/// Node-local binary search: first index `i` with `keys[i] >= target`,
/// honouring sentinel slots. Returns `keys.len()` if every real key is
/// `< target` (§4.3).
pub(crate) fn find_first_ge<K>(
    keys: &[KeySlot<K>],
    target: &K,
    cmp: &dyn Comparator<K>,
) -> usize {
    let mut lo = 0usize;
    let mut hi = keys.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if slot_cmp(&keys[mid], target, cmp) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Result of a root-to-leaf descent for a write: the leaf reached, and
/// the stack of ancestors whose taken child was NOT their rightmost
/// (§4.4) — these drive split-ascent without needing parent pointers.
pub(crate) struct Descent<K, V> {
    pub(crate) leaf: Arc<Node<K, V>>,
    pub(crate) ancestors: Vec<Arc<Node<K, V>>>,
}

/// Root-to-leaf descent. Follows children only; sibling links are
/// followed at the leaf layer by the caller (move-right / refinement).
pub(crate) fn descend<K, V>(
    root: &Arc<Node<K, V>>,
    target: &K,
    cmp: &dyn Comparator<K>,
) -> Descent<K, V> {
    let mut ancestors = Vec::new();
    let mut current = Arc::clone(root);
    loop {
        let snap = current.snapshot();
        if snap.is_leaf {
            return Descent {
                leaf: current,
                ancestors,
            };
        }
        let idx = find_first_ge(&snap.keys, target, cmp);
        let child_idx = idx.saturating_sub(1);
        let is_rightmost = child_idx + 1 == snap.children.len();
        if !is_rightmost {
            ancestors.push(Arc::clone(&current));
        }
        let next = Arc::clone(&snap.children[child_idx]);
        drop(snap);
        current = next;
    }
}

/// Follow `next` sibling links until `target` is within range of the
/// current node, or the chain ends (Lehman-Yao "move-right").
pub(crate) fn move_right<K, V>(
    start: &Arc<Node<K, V>>,
    target: &K,
    cmp: &dyn Comparator<K>,
) -> Arc<Node<K, V>> {
    let mut node = Arc::clone(start);
    loop {
        let snap = node.snapshot();
        let idx = find_first_ge(&snap.keys, target, cmp);
        if idx < snap.keys.len() {
            return node;
        }
        match &snap.next {
            Some(next) => {
                let next = Arc::clone(next);
                drop(snap);
                node = next;
            }
            None => return node,
        }
    }
}

#[cfg(test)]
mod search_test;
