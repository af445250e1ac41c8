//! Module `scanner` implements range scan and forward/backward
//! iteration (§4.8, §4.9): ordered traversal over leaf siblings with
//! inclusivity bounds, weakly consistent under concurrent mutation.
//!
//! Per the open design note in §9, this collapses the source's
//! brittle two-pass same-leaf handling into the recommended single
//! routine: locate the lower position (honouring inclusivity), then
//! walk `next` links emitting values until the upper bound is
//! exceeded (honouring its own inclusivity). The one case this general
//! walk cannot express is §4.8's `lower == upper` rule, which is an OR
//! over the two bounds' inclusivity rather than the AND a plain
//! interval admits — `RangeIter::new` resolves that case as its own
//! point lookup (`locate_exact`) before falling back to the walk.

use std::ops::Bound;
use std::sync::Arc;

use crate::content::{KeySlot, Node};
use crate::search::{descend, find_first_ge};
use crate::tree::BTree;
use crate::types::Comparator;

fn bound_key<K>(b: &Bound<K>) -> Option<&K> {
    match b {
        Bound::Included(k) | Bound::Excluded(k) => Some(k),
        Bound::Unbounded => None,
    }
}

/// Locate the `(leaf, pos)` carrying exactly `key`, or `(None, 0)` if
/// `key` is absent. Used for the `lower == upper` singleton case of
/// §4.8, which is resolved independently of either side's own
/// inclusivity (see `RangeIter::new`).
fn locate_exact<K, V, C>(tree: &BTree<K, V, C>, key: &K) -> (Option<Arc<Node<K, V>>>, usize)
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    let mut node = descend(&tree.root_arc(), key, tree.comparator()).leaf;
    loop {
        let snap = node.snapshot();
        let idx = find_first_ge(&snap.keys, key, tree.comparator());
        if idx >= snap.keys.len() {
            match snap.next.clone() {
                Some(next) => {
                    drop(snap);
                    node = next;
                    continue;
                }
                None => return (None, 0),
            }
        }
        let exact = matches!(&snap.keys[idx], KeySlot::Bounded(kk) if tree.comparator().eq(kk, key));
        if !exact || idx == 0 || idx == snap.keys.len() - 1 {
            return (None, 0);
        }
        return (Some(Arc::clone(&node)), idx);
    }
}

/// Locate the `(leaf, pos)` at which forward emission should begin
/// for a given lower bound. `pos` indexes an interior (value-bearing)
/// slot of the returned leaf, or the pair is `(None, _)` if no such
/// position exists (e.g. an empty tree, or a lower bound past every
/// key).
fn locate_start<K, V, C>(tree: &BTree<K, V, C>, lower: &Bound<K>) -> (Option<Arc<Node<K, V>>>, usize)
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    let mut node = match lower {
        Bound::Unbounded => {
            let mut n = tree.root_arc();
            loop {
                let snap = n.snapshot();
                if snap.is_leaf {
                    break;
                }
                let child = Arc::clone(&snap.children[0]);
                drop(snap);
                n = child;
            }
            n
        }
        Bound::Included(k) | Bound::Excluded(k) => descend(&tree.root_arc(), k, tree.comparator()).leaf,
    };

    let mut first_pass = true;
    loop {
        let snap = node.snapshot();
        let idx = match lower {
            Bound::Unbounded => 0,
            Bound::Included(k) | Bound::Excluded(k) if first_pass => {
                find_first_ge(&snap.keys, k, tree.comparator())
            }
            _ => 0, // re-entry after a next-link hop: new leaf starts past the bound already
        };
        first_pass = false;

        if idx >= snap.keys.len() {
            match snap.next.clone() {
                Some(next) => {
                    drop(snap);
                    node = next;
                    continue;
                }
                None => return (None, 0),
            }
        }

        let exact = match lower {
            Bound::Included(k) | Bound::Excluded(k) => {
                matches!(&snap.keys[idx], KeySlot::Bounded(kk) if tree.comparator().eq(kk, k))
            }
            Bound::Unbounded => false,
        };
        let excluded = matches!(lower, Bound::Excluded(_));
        let mut start = if exact && excluded { idx + 1 } else { idx };
        if start == 0 {
            start = 1; // the leading slot is a boundary copy, never a value.
        }

        if start >= snap.keys.len() - 1 {
            match snap.next.clone() {
                Some(next) => {
                    drop(snap);
                    node = next;
                    continue;
                }
                None => return (None, 0),
            }
        }
        return (Some(Arc::clone(&node)), start);
    }
}

/// A weakly consistent forward iterator over `(key, value)` pairs.
/// Never throws, never blocks; it observes whatever node contents are
/// visible through its snapshots as it walks the sibling chain.
pub struct RangeIter<'a, K, V, C> {
    tree: &'a BTree<K, V, C>,
    current: Option<Arc<Node<K, V>>>,
    pos: usize,
    upper: Bound<K>,
}

impl<'a, K, V, C> RangeIter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    pub(crate) fn new(tree: &'a BTree<K, V, C>, lower: Bound<K>, upper: Bound<K>) -> Self {
        // §4.8: "lower == upper -> returns the single value iff either
        // inclusivity holds" is an OR over the two bounds, not the AND
        // a plain interval walk would give (which would require both
        // sides to admit the point). Resolve it as its own lookup
        // before falling back to the general walk.
        if let (Some(lk), Some(uk)) = (bound_key(&lower), bound_key(&upper)) {
            if tree.comparator().eq(lk, uk) {
                let lower_inclusive = matches!(lower, Bound::Included(_));
                let upper_inclusive = matches!(upper, Bound::Included(_));
                return if lower_inclusive || upper_inclusive {
                    let point = lk.clone();
                    let (current, pos) = locate_exact(tree, &point);
                    RangeIter {
                        tree,
                        current,
                        pos,
                        upper: Bound::Included(point),
                    }
                } else {
                    RangeIter {
                        tree,
                        current: None,
                        pos: 0,
                        upper,
                    }
                };
            }
        }

        let (current, pos) = locate_start(tree, &lower);
        RangeIter {
            tree,
            current,
            pos,
            upper,
        }
    }
}

impl<'a, K, V, C> Iterator for RangeIter<'a, K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        loop {
            let node = self.current.clone()?;
            let snap = node.snapshot();

            if self.pos >= snap.keys.len() - 1 {
                match snap.next.clone() {
                    Some(next) => {
                        drop(snap);
                        self.current = Some(next);
                        self.pos = 1;
                        continue;
                    }
                    None => {
                        self.current = None;
                        return None;
                    }
                }
            }

            let key = match &snap.keys[self.pos] {
                KeySlot::Bounded(k) => k.clone(),
                _ => unreachable!("interior slot is never a sentinel"),
            };

            let past_upper = match &self.upper {
                Bound::Unbounded => false,
                Bound::Included(u) => self.tree.comparator().gt(&key, u),
                Bound::Excluded(u) => !self.tree.comparator().lt(&key, u),
            };
            if past_upper {
                self.current = None;
                return None;
            }

            let val = snap.vals[self.pos - 1].clone();
            self.pos += 1;
            return Some((key, val));
        }
    }
}

impl<K, V, C> BTree<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    /// Lazy ascending iteration over `[lower, upper]` (per each
    /// bound's own inclusivity). Unlike `range_scan`, an unbounded
    /// `lower`/`upper` pair here performs a genuine full scan — the
    /// "both absent" empty guard is specific to `range_scan` (§4.8).
    pub fn range(&self, lower: Bound<K>, upper: Bound<K>) -> RangeIter<'_, K, V, C> {
        RangeIter::new(self, lower, upper)
    }

    /// Full ascending iteration over every live entry.
    pub fn iter(&self) -> RangeIter<'_, K, V, C> {
        self.range(Bound::Unbounded, Bound::Unbounded)
    }

    /// Descending iteration, composed atop the ascending walk (§4.9,
    /// §9): collect then reverse. Slower than ascending by
    /// construction — not symmetrically optimized, by design.
    pub fn iter_rev(&self) -> std::vec::IntoIter<(K, V)> {
        let mut items: Vec<_> = self.iter().collect();
        items.reverse();
        items.into_iter()
    }

    /// Ordered range scan (§4.8). Both bounds absent is an explicit
    /// guard returning an empty result, distinct from `iter()`'s full
    /// scan; `lower > upper`, single-point, and either-unbounded cases
    /// all fall out of the same unified walk.
    pub fn range_scan(&self, lower: Bound<K>, upper: Bound<K>) -> Vec<V> {
        if matches!(lower, Bound::Unbounded) && matches!(upper, Bound::Unbounded) {
            return Vec::new();
        }
        self.range(lower, upper).map(|(_, v)| v).collect()
    }
}

#[cfg(test)]
mod scanner_test;
