//! Module `types` implements the key-comparator abstraction the tree
//! is generic over, in the spirit of the teacher's `type_i32.rs` /
//! `type_i64.rs` / `type_bytes.rs` default-type plumbing for its own
//! key domains.

use std::cmp::Ordering;

/// External total-order comparator for keys (§6, key-serializer
/// contract's optional comparator). The tree never compares keys with
/// `PartialOrd` directly; every comparison in `search`/`tree`/`scanner`
/// goes through a `&dyn Comparator<K>` so a caller can plug in a
/// domain-specific collation order without the key type itself having
/// to implement `Ord`.
pub trait Comparator<K>: Send + Sync {
    fn compare(&self, a: &K, b: &K) -> Ordering;

    fn eq(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    fn lt(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    fn gt(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// Blanket comparator for any naturally-ordered key, analogous to the
/// teacher's built-in type wrappers providing a default comparable
/// behaviour for its own key types.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrd;

impl<K: Ord> Comparator<K> for NaturalOrd {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod types_test;
