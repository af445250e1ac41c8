//! Module `left_edge` implements `LeftEdgeRegistry` (§4.10): the
//! cached left-most node at each tree level, used by split-ascent to
//! find the current parent level when a writer's ancestor stack has
//! already been exhausted by earlier concurrent splits.

use std::sync::{Arc, RwLock};

use crate::content::Node;

/// Append-only list `level -> left-most node at that level`; index 0
/// is the leaf level. A plain `RwLock<Vec<_>>` is concurrent-append
/// safe, which is all §4.10 asks for.
pub(crate) struct LeftEdgeRegistry<K, V> {
    levels: RwLock<Vec<Arc<Node<K, V>>>>,
}

impl<K, V> LeftEdgeRegistry<K, V> {
    /// Build the registry by descending `children[0]` from `root`,
    /// collecting one node per level and reversing so index 0 is the
    /// leaf level (§4.10).
    pub(crate) fn rebuild(root: &Arc<Node<K, V>>) -> LeftEdgeRegistry<K, V> {
        let mut levels = Vec::new();
        let mut current = Arc::clone(root);
        loop {
            let snap = current.snapshot();
            let is_leaf = snap.is_leaf;
            let first_child = snap.children.first().map(Arc::clone);
            levels.push(Arc::clone(&current));
            drop(snap);
            if is_leaf {
                break;
            }
            current = first_child.expect("inner node with no children");
        }
        levels.reverse();
        LeftEdgeRegistry {
            levels: RwLock::new(levels),
        }
    }

    /// Left-most node at `level` (0 = leaves), if the tree is already
    /// that tall.
    pub(crate) fn get(&self, level: usize) -> Option<Arc<Node<K, V>>> {
        self.levels.read().expect("registry lock poisoned").get(level).map(Arc::clone)
    }

    /// Record a newly promoted root as the (new) top level's left-most
    /// (and only) node. Appended only during root promotion (§4.10).
    pub(crate) fn push(&self, node: Arc<Node<K, V>>) {
        self.levels.write().expect("registry lock poisoned").push(node);
    }

    pub(crate) fn height(&self) -> usize {
        self.levels.read().expect("registry lock poisoned").len()
    }

    /// Replace the whole registry with a single fresh root. Used by
    /// `clear()`, which is explicitly non-atomic (§1 Non-goals).
    pub(crate) fn reset_to(&self, root: Arc<Node<K, V>>) {
        let mut levels = self.levels.write().expect("registry lock poisoned");
        levels.clear();
        levels.push(root);
    }
}

#[cfg(test)]
mod left_edge_test;
