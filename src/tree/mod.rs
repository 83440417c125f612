//! The ordered-map/set engine: AVL node storage, insert/erase, join/split,
//! bulk set operations, and iteration (spec.md §2, component table in
//! SPEC_FULL.md §2).

mod avl;
mod iter;
mod node;
mod set;
mod setop;

pub use avl::{Entry, OccupiedEntry, TreeMap, VacantEntry};
pub use iter::{IntoIter, Iter, IterMut, Range};
pub use node::{Node, WeakLink};
pub use set::TreeSet;
pub use setop::{
    difference_of, difference_of_with_executor, intersection_of, intersection_of_with,
    intersection_of_with_executor, resolver, union_of, union_of_with, union_of_with_executor,
};

pub mod set_ops {
    //! Set-flavored bulk operations (spec.md §4.5 applied to `TreeSet`).
    pub use super::set::{difference_of, intersection_of, union_of};
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;

    #[test]
    fn insert_then_get() {
        let mut m = TreeMap::new();
        assert!(m.insert(3, "c"));
        assert!(m.insert(1, "a"));
        assert!(m.insert(2, "b"));
        assert!(!m.insert(2, "b2"));
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(&2), Some(&"b"));
        let collected: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(collected, vec![(1, "a"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn remove_two_children_preserves_order() {
        let mut m = TreeMap::new();
        for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
            m.insert(k, k * 10);
        }
        assert_eq!(m.remove(&5), Some(50));
        let collected: Vec<_> = m.iter().map(|(k, _)| *k).collect();
        assert_eq!(collected, vec![1, 2, 3, 4, 6, 7, 8, 9]);
        assert_eq!(m.len(), 8);
    }

    #[test]
    fn erase_by_handle_returns_successor_and_preserves_rest() {
        let mut m: TreeMap<i32, i32> = [1, 2, 3, 4, 5].into_iter().map(|k| (k, k * 10)).collect();
        let three = m.lower_bound(&3).unwrap();
        let successor = unsafe { m.erase(three) };
        assert_eq!(unsafe { successor.map(|p| p.as_ref().key) }, Some(4));
        assert_eq!(m.len(), 4);
        let collected: Vec<_> = m.iter().map(|(k, _)| *k).collect();
        assert_eq!(collected, vec![1, 2, 4, 5]);

        // Erasing the maximum element has no successor.
        let five = m.lower_bound(&5).unwrap();
        let successor = unsafe { m.erase(five) };
        assert!(successor.is_none());
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut m: TreeMap<i32, i32> = TreeMap::new();
        m.insert(1, 1);
        assert_eq!(m.remove(&42), None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn at_surfaces_out_of_range_as_a_result() {
        let mut m: TreeMap<i32, &str> = [(1, "a")].into_iter().collect();
        assert_eq!(m.at(&1), Ok(&"a"));
        assert_eq!(m.at(&2), Err(crate::error::OrdexError::OutOfRange));
        assert_eq!(m.at_mut(&2), Err(crate::error::OrdexError::OutOfRange));
        assert_eq!(m[&1], "a");
    }

    #[test]
    fn bounds() {
        let m: TreeMap<i32, ()> = [1, 3, 5, 7].into_iter().map(|k| (k, ())).collect();
        unsafe {
            assert_eq!(m.lower_bound(&4).map(|p| p.as_ref().key), Some(5));
            assert_eq!(m.lower_bound(&5).map(|p| p.as_ref().key), Some(5));
            assert_eq!(m.upper_bound(&5).map(|p| p.as_ref().key), Some(7));
            assert_eq!(m.upper_bound(&7).map(|p| p.as_ref().key), None);
        }
    }

    #[test]
    fn union_default_resolver_keeps_second_operand() {
        // spec.md §8 scenario C: union_of({1:a,2:b}, {2:X,3:Y}) with the
        // default (pick-second) resolver yields 2 -> X.
        let a: TreeMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
        let b: TreeMap<i32, &str> = [(2, "X"), (3, "Y")].into_iter().collect();
        let u = union_of(a, b);
        let collected: Vec<_> = u.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(collected, vec![(1, "a"), (2, "X"), (3, "Y")]);
    }

    #[test]
    fn union_with_resolver_can_pick_first_operand() {
        let a: TreeMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
        let b: TreeMap<i32, &str> = [(2, "X"), (3, "Y")].into_iter().collect();
        // existing = tree2's value, incoming = tree1's value; returning
        // false keeps tree1's ("b") on the key-2 collision.
        let u = union_of_with(a, b, |_existing, _incoming| false);
        assert_eq!(u.get(&2), Some(&"b"));
    }

    #[test]
    fn intersection_scenario() {
        let a: TreeMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
        let b: TreeMap<i32, i32> = [(2, 200), (3, 300), (4, 400)].into_iter().collect();
        let i = intersection_of(a, b);
        let collected: Vec<_> = i.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(collected, vec![(2, 200), (3, 300)]);
    }

    #[test]
    fn difference_scenario() {
        let a: TreeMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
        let b: TreeMap<i32, i32> = [(2, 0), (3, 0)].into_iter().collect();
        let d = difference_of(a, b);
        let collected: Vec<_> = d.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(collected, vec![(1, 10)]);
    }

    #[test]
    fn range_stops_at_both_bounds() {
        let m: TreeMap<i32, i32> = (0..20).map(|k| (k, k)).collect();
        let collected: Vec<_> = m.range(5..10).map(|(k, _)| *k).collect();
        assert_eq!(collected, vec![5, 6, 7, 8, 9]);
        let inclusive: Vec<_> = m.range(5..=10).map(|(k, _)| *k).collect();
        assert_eq!(inclusive, vec![5, 6, 7, 8, 9, 10]);
        let unbounded_start: Vec<_> = m.range(..3).map(|(k, _)| *k).collect();
        assert_eq!(unbounded_start, vec![0, 1, 2]);
    }

    #[test]
    fn entry_or_insert_and_occupied_mutation() {
        let mut m: TreeMap<&str, i32> = TreeMap::new();
        *m.entry("a").or_insert(0) += 1;
        *m.entry("a").or_insert(0) += 1;
        assert_eq!(m.get(&"a"), Some(&2));

        match m.entry("a") {
            Entry::Occupied(mut o) => {
                assert_eq!(*o.get(), 2);
                *o.get_mut() = 5;
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert_eq!(m.get(&"a"), Some(&5));

        let removed = match m.entry("a") {
            Entry::Occupied(o) => o.remove(),
            Entry::Vacant(_) => panic!("expected occupied"),
        };
        assert_eq!(removed, 5);
        assert!(!m.contains_key(&"a"));
    }

    #[test]
    fn into_iter_drops_all_keys() {
        let m: TreeMap<i32, String> = (0..50).map(|k| (k, k.to_string())).collect();
        let collected: Vec<_> = m.into_iter().collect();
        assert_eq!(collected.len(), 50);
        assert_eq!(collected[0], (0, "0".to_string()));
        assert_eq!(collected[49], (49, "49".to_string()));
    }

    #[test]
    fn random_insert_remove_matches_btreemap() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();
        let mut subject: TreeMap<i32, i32> = TreeMap::new();
        for _ in 0..2000 {
            let key = rng.gen_range(0..200);
            if rng.gen_bool(0.6) {
                let value = rng.gen();
                let expected = model.insert(key, value).is_none();
                assert_eq!(subject.insert(key, value), expected);
            } else {
                assert_eq!(subject.remove(&key), model.remove(&key));
            }
        }
        let expected: Vec<_> = model.into_iter().collect();
        let actual: Vec<_> = subject.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(actual, expected);
    }

    proptest! {
        #[test]
        fn union_is_commutative_on_keys(mut a in prop::collection::vec(0i32..100, 0..40), mut b in prop::collection::vec(0i32..100, 0..40)) {
            a.sort_unstable();
            a.dedup();
            b.sort_unstable();
            b.dedup();
            let ta: TreeMap<i32, i32> = a.iter().map(|&k| (k, k)).collect();
            let tb: TreeMap<i32, i32> = b.iter().map(|&k| (k, k)).collect();
            let ta2: TreeMap<i32, i32> = a.iter().map(|&k| (k, k)).collect();
            let tb2: TreeMap<i32, i32> = b.iter().map(|&k| (k, k)).collect();
            let u1 = union_of(ta, tb);
            let u2 = union_of(tb2, ta2);
            let keys1: Vec<_> = u1.iter().map(|(k, _)| *k).collect();
            let keys2: Vec<_> = u2.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(keys1, keys2);
        }

        #[test]
        fn intersection_subset_of_both(mut a in prop::collection::vec(0i32..50, 0..30), mut b in prop::collection::vec(0i32..50, 0..30)) {
            a.sort_unstable();
            a.dedup();
            b.sort_unstable();
            b.dedup();
            let ta: TreeMap<i32, i32> = a.iter().map(|&k| (k, k)).collect();
            let tb: TreeMap<i32, i32> = b.iter().map(|&k| (k, k)).collect();
            let result = intersection_of(ta, tb);
            for (k, _) in result.iter() {
                prop_assert!(a.contains(k));
                prop_assert!(b.contains(k));
            }
        }
    }
}
