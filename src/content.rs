//! Module `content` implements `NodeContent`, `Node`, and the
//! `AtomicArc<T>` swap cell that separates a node's stable identity
//! from its replaceable content (§4.1).
//!
//! The source keeps both a recid-addressed byte cache and an in-memory
//! content wrapper (§9); this crate commits to the arena-of-nodes
//! option: `NodeRef` is a stable `Arc<Node<K, V>>`, and `Node::install`
//! swaps the cell under the node's mutex the same way the teacher's
//! `mvcc.rs` swaps its `MvccRoot` snapshot cell. The teacher rolls its
//! own `AtomicPtr<Arc<T>>` for that swap, which is only sound because
//! `Mvcc` serializes writers behind an outer lock; this tree has many
//! independent per-node writers, so the swap cell here is `ArcSwap`
//! (also used for this exact job elsewhere in the retrieved pack, e.g.
//! `surrealdb`/`aptos-core`), which is hazard-free under concurrent
//! readers and writers.

use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;

/// A key slot inside a node. Every node carries `keys.len() >= 2`
/// slots; the first slot may be `NegInf` (the left-most node at its
/// level) and the last slot may be `PosInf` (the right-most node at
/// its level, i.e. "no high key"). All interior slots, and any edge
/// slot that is not actually at the boundary of the whole level, hold
/// a real key (`Bounded`).
#[derive(Clone, Debug)]
pub enum KeySlot<K> {
    NegInf,
    Bounded(K),
    PosInf,
}

impl<K> KeySlot<K> {
    pub(crate) fn is_sentinel(&self) -> bool {
        matches!(self, KeySlot::NegInf | KeySlot::PosInf)
    }

    pub(crate) fn bounded(&self) -> Option<&K> {
        match self {
            KeySlot::Bounded(k) => Some(k),
            _ => None,
        }
    }
}

/// Immutable snapshot of one tree node (§3, NodeContent).
///
/// `children` holds only the real subtree pointers, aligned with
/// `keys[0..keys.len()-1]`; the specification's trick of overloading
/// the last child slot as the sibling link is instead modelled with an
/// explicit `next` field shared by leaves and inner nodes alike. This
/// is the representation choice flagged as open in §9 ("a conforming
/// implementation picks one addressing scheme and is consistent") —
/// recorded in DESIGN.md.
pub struct NodeContent<K, V> {
    pub is_leaf: bool,
    pub keys: Vec<KeySlot<K>>,
    pub vals: Vec<V>,
    pub children: Vec<Arc<Node<K, V>>>,
    pub next: Option<Arc<Node<K, V>>>,
}

impl<K: Clone, V: Clone> Clone for NodeContent<K, V> {
    fn clone(&self) -> Self {
        NodeContent {
            is_leaf: self.is_leaf,
            keys: self.keys.clone(),
            vals: self.vals.clone(),
            children: self.children.clone(),
            next: self.next.clone(),
        }
    }
}

impl<K, V> NodeContent<K, V> {
    pub(crate) fn empty_leaf() -> NodeContent<K, V> {
        NodeContent {
            is_leaf: true,
            keys: vec![KeySlot::NegInf, KeySlot::PosInf],
            vals: vec![],
            children: vec![],
            next: None,
        }
    }

    /// High key of this node, or `None` if it is the right-most node
    /// at its level (invariant 6: the sentinel high key means +inf).
    pub(crate) fn high_key(&self) -> Option<&K> {
        self.keys.last().and_then(KeySlot::bounded)
    }

    /// Number of live entries occupying this node, per the room test
    /// of §4.6: `len(keys) - (leaf ? 2 : 1)`.
    pub(crate) fn capacity_used(&self) -> usize {
        self.keys.len() - if self.is_leaf { 2 } else { 1 }
    }
}

/// Swap cell holding one `Arc<T>`, giving lock-free loads and a single
/// atomic store on writes. Used both for a node's content and for the
/// tree's `RootRef`. A thin wrapper over `ArcSwap` rather than a bare
/// `AtomicPtr`, so loads never race a concurrent store into a
/// use-after-free.
pub struct AtomicArc<T> {
    inner: ArcSwap<T>,
}

impl<T> AtomicArc<T> {
    pub fn new(value: Arc<T>) -> AtomicArc<T> {
        AtomicArc {
            inner: ArcSwap::new(value),
        }
    }

    /// Lock-free read of the current value. Readers never block.
    pub fn load(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Install a new value, dropping the cell's reference to the old one.
    pub fn store(&self, value: Arc<T>) {
        self.inner.store(value);
    }
}

/// Stable node identity: a content cell plus the mutex writers take
/// before mutating it (§4.1, §5). Readers call `snapshot()` and never
/// touch `lock`.
pub struct Node<K, V> {
    content: AtomicArc<NodeContent<K, V>>,
    lock: Mutex<()>,
}

impl<K, V> Node<K, V> {
    pub fn new(content: NodeContent<K, V>) -> Arc<Node<K, V>> {
        Arc::new(Node {
            content: AtomicArc::new(Arc::new(content)),
            lock: Mutex::new(()),
        })
    }

    /// Lock-free read of the current content.
    pub fn snapshot(&self) -> Arc<NodeContent<K, V>> {
        self.content.load()
    }

    /// Acquire this node's mutex. The guard must be held across a
    /// read-modify-install sequence; `install` does not take the lock
    /// itself (callers are required to already hold it, matching the
    /// specified `deep_copy_locked` / `install` / `release` triad).
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        // a bounded spin with parking fallback, same intent as the
        // specification's try_lock-with-backoff; std::sync::Mutex
        // already parks instead of busy-spinning indefinitely.
        self.lock.lock().expect("node mutex poisoned")
    }

    /// Replace the content. Caller must hold the lock returned by
    /// `lock()`.
    pub fn install(&self, content: NodeContent<K, V>) {
        self.content.store(Arc::new(content));
    }
}

#[cfg(test)]
mod content_test;
