use std::sync::Arc;

use super::*;

#[test]
fn test_atomic_arc_load_store() {
    let cell = AtomicArc::new(Arc::new(7i32));
    assert_eq!(*cell.load(), 7);
    cell.store(Arc::new(9));
    assert_eq!(*cell.load(), 9);
    // load does not consume the cell's reference.
    assert_eq!(*cell.load(), 9);
}

#[test]
fn test_node_snapshot_and_install() {
    let node = Node::new(NodeContent::<i32, &str>::empty_leaf());
    assert_eq!(node.snapshot().keys.len(), 2);

    let guard = node.lock();
    let mut content = (*node.snapshot()).clone();
    content.vals.push("x");
    content.keys.insert(1, KeySlot::Bounded(5));
    node.install(content);
    drop(guard);

    let snap = node.snapshot();
    assert_eq!(snap.vals.len(), 1);
    assert_eq!(snap.keys.len(), 3);
}

#[test]
fn test_high_key_sentinel() {
    let content = NodeContent::<i32, &str>::empty_leaf();
    assert!(content.high_key().is_none());

    let mut content2 = content;
    content2.keys = vec![KeySlot::NegInf, KeySlot::Bounded(10), KeySlot::PosInf];
    assert!(content2.high_key().is_none());

    let mut content3 = NodeContent::<i32, &str>::empty_leaf();
    content3.keys = vec![KeySlot::Bounded(1), KeySlot::Bounded(10)];
    assert_eq!(content3.high_key(), Some(&10));
}
