use super::*;
use crate::types::NaturalOrd;

#[test]
fn test_find_first_ge_basic() {
    let cmp = NaturalOrd;
    let keys: Vec<KeySlot<i32>> = vec![
        KeySlot::NegInf,
        KeySlot::Bounded(10),
        KeySlot::Bounded(20),
        KeySlot::PosInf,
    ];
    assert_eq!(find_first_ge(&keys, &5, &cmp), 1);
    assert_eq!(find_first_ge(&keys, &10, &cmp), 1);
    assert_eq!(find_first_ge(&keys, &15, &cmp), 2);
    assert_eq!(find_first_ge(&keys, &20, &cmp), 2);
    assert_eq!(find_first_ge(&keys, &25, &cmp), 3);
}

#[test]
fn test_find_first_ge_no_right_sentinel_overflow() {
    let cmp = NaturalOrd;
    let keys: Vec<KeySlot<i32>> = vec![KeySlot::Bounded(1), KeySlot::Bounded(5)];
    // every real key < target -> returns keys.len()
    assert_eq!(find_first_ge(&keys, &100, &cmp), 2);
}
