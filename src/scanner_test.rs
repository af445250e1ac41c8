use std::ops::Bound;

use super::*;
use crate::config::Config;
use crate::types::NaturalOrd;

fn small_tree() -> BTree<i32, String, NaturalOrd> {
    BTree::new(Config::new(6), NaturalOrd).unwrap()
}

#[test]
fn test_full_scan_ascending() {
    let tree = small_tree();
    for k in 1..=12 {
        tree.insert(k, format!("v{}", k)).unwrap();
    }
    let items: Vec<(i32, String)> = tree.iter().collect();
    let keys: Vec<i32> = items.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, (1..=12).collect::<Vec<_>>());
}

#[test]
fn test_range_inclusive_bounds() {
    let tree = small_tree();
    for k in 1..=20 {
        tree.insert(k, format!("v{}", k)).unwrap();
    }
    let out: Vec<i32> = tree
        .range(Bound::Included(5), Bound::Included(10))
        .map(|(k, _)| k)
        .collect();
    assert_eq!(out, vec![5, 6, 7, 8, 9, 10]);
}

#[test]
fn test_range_exclusive_bounds() {
    let tree = small_tree();
    for k in 1..=20 {
        tree.insert(k, format!("v{}", k)).unwrap();
    }
    let out: Vec<i32> = tree
        .range(Bound::Excluded(5), Bound::Excluded(10))
        .map(|(k, _)| k)
        .collect();
    assert_eq!(out, vec![6, 7, 8, 9]);
}

#[test]
fn test_range_scan_both_unbounded_is_empty() {
    let tree = small_tree();
    tree.insert(1, "a".to_string()).unwrap();
    assert!(tree.range_scan(Bound::Unbounded, Bound::Unbounded).is_empty());
}

#[test]
fn test_range_scan_one_sided() {
    let tree = small_tree();
    for k in 1..=10 {
        tree.insert(k, format!("v{}", k)).unwrap();
    }
    let out = tree.range_scan(Bound::Included(8), Bound::Unbounded);
    assert_eq!(out, vec!["v8", "v9", "v10"]);
}

#[test]
fn test_iter_rev_matches_reversed_forward() {
    let tree = small_tree();
    for k in 1..=15 {
        tree.insert(k, format!("v{}", k)).unwrap();
    }
    let fwd: Vec<i32> = tree.iter().map(|(k, _)| k).collect();
    let rev: Vec<i32> = tree.iter_rev().map(|(k, _)| k).collect();
    let mut expected = fwd.clone();
    expected.reverse();
    assert_eq!(rev, expected);
}

#[test]
fn test_range_on_empty_tree() {
    let tree: BTree<i32, String, NaturalOrd> = small_tree();
    assert_eq!(tree.iter().count(), 0);
}

#[test]
fn test_equal_bounds_either_inclusive_returns_the_point() {
    let tree = small_tree();
    for k in 1..=20 {
        tree.insert(k, format!("v{}", k)).unwrap();
    }

    // both inclusive
    assert_eq!(
        tree.range_scan(Bound::Included(7), Bound::Included(7)),
        vec!["v7".to_string()]
    );
    // lower excluded, upper inclusive: the spec's OR rule still admits
    // the point because the upper side is inclusive.
    assert_eq!(
        tree.range_scan(Bound::Excluded(7), Bound::Included(7)),
        vec!["v7".to_string()]
    );
    // lower inclusive, upper excluded: symmetric case.
    assert_eq!(
        tree.range_scan(Bound::Included(7), Bound::Excluded(7)),
        vec!["v7".to_string()]
    );
    // neither side inclusive: no inclusivity admits the point.
    assert!(tree
        .range_scan(Bound::Excluded(7), Bound::Excluded(7))
        .is_empty());
    // equal bounds on an absent key stay empty regardless of inclusivity.
    assert!(tree
        .range_scan(Bound::Included(999), Bound::Included(999))
        .is_empty());
}
