//! Module `tree` is the Mutator and Deleter of §4.6/§4.7, plus lookup
//! (§4.5): insert/update/split ascent with lock-coupling and root
//! promotion, and the logical (non-merging) delete. These share the
//! descent/move-right machinery from `search`, the way the teacher
//! keeps `get`/`set`/`delete` on one `Llrb`/`Mvcc` type rather than
//! splitting them across unrelated structs.

use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::Config;
use crate::content::{AtomicArc, KeySlot, Node, NodeContent};
use crate::error::Result;
use crate::left_edge::LeftEdgeRegistry;
use crate::search::{descend, find_first_ge, move_right};
use crate::types::Comparator;

/// The enqueued payload during split-ascent: either the value being
/// inserted at a leaf, or the child produced by a just-completed
/// lower split, carried up to its parent (§4.6).
enum Payload<K, V> {
    Leaf(V),
    Inner(Arc<Node<K, V>>),
}

/// A concurrent, ordered key-value index built as a B-link tree
/// (§1). Readers never block; writers lock at most two nodes at a
/// time (the current node, and the root cell during promotion).
pub struct BTree<K, V, C> {
    root: AtomicArc<Node<K, V>>,
    comparator: C,
    options: Config,
    left_edges: LeftEdgeRegistry<K, V>,
    count: Option<AtomicI64>,
}

impl<K, V, C> BTree<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    /// Create a new, empty tree: a single leaf root with both
    /// sentinels set (it is simultaneously the left-most and
    /// right-most node at its level).
    pub fn new(options: Config, comparator: C) -> Result<BTree<K, V, C>> {
        options.validate()?;
        let root = Node::new(NodeContent::empty_leaf());
        let left_edges = LeftEdgeRegistry::rebuild(&root);
        Ok(BTree {
            root: AtomicArc::new(root),
            comparator,
            options,
            left_edges,
            count: if options.track_size {
                Some(AtomicI64::new(0))
            } else {
                None
            },
        })
    }

    /// Current entry count, if the tree was configured to track it in
    /// O(1) (the `OptionalCounter` of §3). `None` when untracked.
    pub fn len(&self) -> Option<u64> {
        self.count
            .as_ref()
            .map(|c| c.load(AtomicOrdering::Relaxed) as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.len().map(|n| n == 0).unwrap_or(false)
    }

    pub(crate) fn root_arc(&self) -> Arc<Node<K, V>> {
        self.root.load()
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.comparator
    }

    fn notify_inserted(&self) {
        if let Some(count) = &self.count {
            count.fetch_add(1, AtomicOrdering::Relaxed);
        }
    }

    fn notify_removed(&self) {
        if let Some(count) = &self.count {
            count.fetch_sub(1, AtomicOrdering::Relaxed);
        }
    }

    /// Point lookup (§4.5). Lock-free: descent and sibling refinement
    /// only ever take `snapshot()`s.
    pub fn get(&self, key: &K) -> Option<V> {
        let root = self.root_arc();
        let mut node = descend(&root, key, &self.comparator).leaf;
        loop {
            let snap = node.snapshot();
            let pos = find_first_ge(&snap.keys, key, &self.comparator);
            if pos == snap.keys.len() {
                match snap.next.clone() {
                    Some(next) => {
                        drop(snap);
                        node = next;
                        continue;
                    }
                    None => return None,
                }
            }
            if pos == snap.keys.len() - 1 || pos == 0 {
                // trailing high-key separator, or (defensively) the
                // leading boundary slot — neither ever carries a value.
                return None;
            }
            return match &snap.keys[pos] {
                KeySlot::Bounded(k) if self.comparator.eq(k, key) => {
                    Some(snap.vals[pos - 1].clone())
                }
                _ => None,
            };
        }
    }

    /// Insert or update (§4.6). `only_if_absent` implements
    /// `put_if_absent`: an existing key is left untouched and its
    /// current value is returned.
    pub fn put(&self, key: K, value: V, only_if_absent: bool) -> Result<Option<V>> {
        let root = self.root_arc();
        let descent = descend(&root, &key, &self.comparator);
        let mut ancestors = descent.ancestors;
        let mut current = descent.leaf;
        let mut level = 0usize;
        let mut payload = Payload::Leaf(value);
        let mut target_key = key;

        loop {
            let guard = current.lock();
            let snap = current.snapshot();
            let pos = find_first_ge(&snap.keys, &target_key, &self.comparator);

            let existing = if snap.is_leaf && pos > 0 && pos < snap.keys.len() - 1 {
                match &snap.keys[pos] {
                    KeySlot::Bounded(k) if self.comparator.eq(k, &target_key) => Some(pos),
                    _ => None,
                }
            } else {
                None
            };

            if let Some(pos) = existing {
                let old = snap.vals[pos - 1].clone();
                if only_if_absent {
                    drop(guard);
                    return Ok(Some(old));
                }
                let value = match payload {
                    Payload::Leaf(v) => v,
                    Payload::Inner(_) => unreachable!("leaf refine always carries a value"),
                };
                let mut content = (*snap).clone();
                content.vals[pos - 1] = value;
                current.install(content);
                drop(guard);
                debug!("bltree: overwrote existing key at level {}", level);
                #[cfg(feature = "debug")]
                println!("bltree: overwrite at level {} pos {}", level, pos);
                return Ok(Some(old));
            }

            if let Some(hk) = snap.high_key() {
                if self.comparator.lt(hk, &target_key) {
                    drop(snap);
                    drop(guard);
                    trace!("bltree: move-right at level {}", level);
                    #[cfg(feature = "debug")]
                    println!("bltree: move-right at level {}", level);
                    current = move_right(&current, &target_key, &self.comparator);
                    continue;
                }
            }

            if snap.capacity_used() < self.options.max_node_size {
                let mut content = (*snap).clone();
                content
                    .keys
                    .insert(pos, KeySlot::Bounded(target_key.clone()));
                match payload {
                    Payload::Leaf(v) => {
                        content.vals.insert(pos - 1, v);
                        current.install(content);
                        drop(guard);
                        self.notify_inserted();
                        return Ok(None);
                    }
                    Payload::Inner(child) => {
                        content.children.insert(pos, child);
                        current.install(content);
                        drop(guard);
                        return Ok(None);
                    }
                }
            }

            trace!("bltree: splitting node at level {}", level);
            #[cfg(feature = "debug")]
            println!(
                "bltree: splitting node at level {} ({} key slots)",
                level,
                snap.keys.len()
            );
            let is_root = Arc::ptr_eq(&current, &self.root_arc());
            let was_leaf_insert = matches!(payload, Payload::Leaf(_));
            let (a_prime, b_node) = self.build_split(&snap, pos, &target_key, payload);
            let a_high_key = a_prime
                .high_key()
                .cloned()
                .expect("freshly split left half always has a real high key");
            current.install(a_prime);
            drop(guard);
            if was_leaf_insert {
                self.notify_inserted();
            }

            if is_root {
                self.promote_root(current, b_node, a_high_key);
                return Ok(None);
            }

            warn!("bltree: propagating split to level {}", level + 1);
            current = match ancestors.pop() {
                Some(parent) => parent,
                None => self
                    .left_edges
                    .get(level + 1)
                    .expect("left edge registry missing a populated level"),
            };
            payload = Payload::Inner(b_node);
            target_key = a_high_key;
            level += 1;
        }
    }

    /// `put(key, value)`, unconditionally overwriting an existing
    /// value.
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>> {
        self.put(key, value, false)
    }

    /// `put_if_absent`: a no-op when the key already exists, returning
    /// the current value without mutating anything.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<Option<V>> {
        self.put(key, value, true)
    }

    /// Bulk insert. Explicitly non-atomic (§1 Non-goals): concurrent
    /// readers may observe any prefix of this sequence applied.
    pub fn put_all<I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in entries {
            self.put(k, v, false)?;
        }
        Ok(())
    }

    /// Reset the tree to a single empty leaf root. Explicitly
    /// non-atomic (§1 Non-goals).
    pub fn clear(&self) {
        let root = Node::new(NodeContent::empty_leaf());
        self.left_edges.reset_to(Arc::clone(&root));
        self.root.store(root);
        if let Some(count) = &self.count {
            count.store(0, AtomicOrdering::Relaxed);
        }
    }

    /// Build A' (installed in place of `current`) and B, the new
    /// right sibling, with the insertion already folded in (§4.6 step
    /// 4). Both nodes' `next` field is used for the sibling link,
    /// including for inner nodes — see `content::NodeContent` for why
    /// this crate does not overload the last `children` slot the way
    /// the source's Java arrays do.
    fn build_split(
        &self,
        snap: &NodeContent<K, V>,
        pos: usize,
        target_key: &K,
        payload: Payload<K, V>,
    ) -> (NodeContent<K, V>, Arc<Node<K, V>>) {
        let mut keys = snap.keys.clone();
        keys.insert(pos, KeySlot::Bounded(target_key.clone()));
        let split = keys.len() / 2;

        match payload {
            Payload::Leaf(value) => {
                let mut vals = snap.vals.clone();
                vals.insert(pos - 1, value);

                let b_content = NodeContent {
                    is_leaf: true,
                    keys: keys[split..].to_vec(),
                    vals: vals[split..].to_vec(),
                    children: Vec::new(),
                    next: snap.next.clone(),
                };
                let b_node = Node::new(b_content);

                let mut a_keys = keys[0..split + 2].to_vec();
                a_keys[split + 1] = keys[split].clone();
                let a_content = NodeContent {
                    is_leaf: true,
                    keys: a_keys,
                    vals: vals[0..split].to_vec(),
                    children: Vec::new(),
                    next: Some(Arc::clone(&b_node)),
                };
                (a_content, b_node)
            }
            Payload::Inner(child) => {
                let mut children = snap.children.clone();
                children.insert(pos, child);

                let b_content = NodeContent {
                    is_leaf: false,
                    keys: keys[split..].to_vec(),
                    vals: Vec::new(),
                    children: children[split..].to_vec(),
                    next: snap.next.clone(),
                };
                let b_node = Node::new(b_content);

                let a_content = NodeContent {
                    is_leaf: false,
                    keys: keys[0..split + 1].to_vec(),
                    vals: Vec::new(),
                    children: children[0..split].to_vec(),
                    next: Some(Arc::clone(&b_node)),
                };
                (a_content, b_node)
            }
        }
    }

    /// Build a new inner root over the just-split former root (§4.6
    /// step 6) and atomically swap it into the `RootRef` cell.
    fn promote_root(&self, old_root: Arc<Node<K, V>>, b_node: Arc<Node<K, V>>, a_high_key: K) {
        let new_root_content = NodeContent {
            is_leaf: false,
            keys: vec![
                KeySlot::NegInf,
                KeySlot::Bounded(a_high_key),
                KeySlot::PosInf,
            ],
            vals: Vec::new(),
            children: vec![old_root, b_node],
            next: None,
        };
        let new_root = Node::new(new_root_content);
        self.root.store(Arc::clone(&new_root));
        self.left_edges.push(new_root);
        debug!("bltree: promoted new root, height {}", self.left_edges.height());
        #[cfg(feature = "debug")]
        println!("bltree: promoted new root, height {}", self.left_edges.height());
    }
}

impl<K, V, C> BTree<K, V, C>
where
    K: Clone,
    V: Clone + PartialEq,
    C: Comparator<K>,
{
    /// Logical delete (§4.7): marks the entry removed at the leaf,
    /// never merges or shrinks the tree. `expected_value`, when
    /// supplied, implements a compare-and-remove.
    pub fn remove(&self, key: &K, expected_value: Option<&V>) -> Result<Option<V>> {
        let root = self.root_arc();
        let mut node = descend(&root, key, &self.comparator).leaf;

        loop {
            let guard = node.lock();
            let snap = node.snapshot();
            let pos = find_first_ge(&snap.keys, key, &self.comparator);

            if pos >= snap.keys.len() {
                drop(guard);
                match snap.next.clone() {
                    Some(next) => {
                        node = next;
                        continue;
                    }
                    None => return Ok(None),
                }
            }

            if let Some(hk) = snap.high_key() {
                if self.comparator.lt(hk, key) {
                    drop(guard);
                    node = move_right(&node, key, &self.comparator);
                    continue;
                }
            }

            if pos == 0 || pos == snap.keys.len() - 1 {
                drop(guard);
                return Ok(None);
            }

            let matched = matches!(&snap.keys[pos], KeySlot::Bounded(k) if self.comparator.eq(k, key));
            if !matched {
                drop(guard);
                return Ok(None);
            }

            let old = snap.vals[pos - 1].clone();
            if let Some(expected) = expected_value {
                if expected != &old {
                    drop(guard);
                    return Ok(None);
                }
            }

            let mut content = (*snap).clone();
            content.keys.remove(pos);
            content.vals.remove(pos - 1);
            node.install(content);
            drop(guard);
            self.notify_removed();
            return Ok(Some(old));
        }
    }
}

#[cfg(test)]
mod tree_test;
