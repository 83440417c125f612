//! Bulk set operations over two trees via `join`/`split` (spec.md §4.5),
//! grounded in `original_source/src/tree/avl_tree.h`'s `union_of`/
//! `intersection_of`/`difference_of` and in the "attempt parallel" executor
//! from `thread_pool_executor.h`.

use crate::executor::{Executor, InlineExecutor};
use crate::options::Options;

use super::avl::{join, join_with_middle, split, TreeMap};
use super::node::Link;

/// Conflict resolvers for the three bulk operations.
///
/// `keep_existing`/`keep_incoming` name the two sides as `split` sees them:
/// `existing` is the node already present in the tree being split into,
/// `incoming` is the divider drawn from the other tree. In every bulk
/// operation below, the tree being split into is always the *second*
/// operand, so the default resolver (`keep_existing`, mirroring the
/// original's `chooser<T>(true)`) keeps the second operand's value on a key
/// collision.
pub mod resolver {
    pub fn keep_existing<V>(_existing: &V, _incoming: &V) -> bool {
        true
    }

    pub fn keep_incoming<V>(_existing: &V, _incoming: &V) -> bool {
        false
    }
}

fn height_of<K, V>(link: &Link<K, V>) -> i64 {
    link.as_deref().map_or(0, |n| n.height as i64)
}

fn should_parallelize<K, V>(a: &Link<K, V>, b: &Link<K, V>, c: &Link<K, V>, d: &Link<K, V>, threshold: usize) -> bool {
    let work = height_of(a) + height_of(b) + height_of(c) + height_of(d);
    work >= threshold as i64
}

/// The recursive driver behind `union_of`/`intersection_of`/`difference_of`.
/// `combinator(in_t1, in_t2)` decides whether a key present with the given
/// membership should survive in the result.
fn setop<K, V, E, R>(t1: Link<K, V>, t2: Link<K, V>, resolver: &R, combinator: fn(bool, bool) -> bool, executor: &E, threshold: usize) -> Link<K, V>
where
    K: Ord + Send,
    V: Send,
    E: Executor,
    R: Fn(&V, &V) -> bool + Sync,
{
    match (t1, t2) {
        (None, None) => None,
        (Some(root1), None) => {
            if combinator(true, false) {
                Some(root1)
            } else {
                drop(root1);
                None
            }
        }
        (None, Some(root2)) => {
            if combinator(false, true) {
                Some(root2)
            } else {
                drop(root2);
                None
            }
        }
        (Some(mut root1), Some(root2)) => {
            let left1 = root1.orphan_left();
            let right1 = root1.orphan_right();
            let mut resolver_fn = |existing: &V, incoming: &V| resolver(existing, incoming);
            let split_result = split(Some(root2), root1, &mut resolver_fn);
            let hit = split_result.hit;
            let left2 = split_result.left;
            let right2 = split_result.right;
            let middle = split_result.middle;

            let (new_left, new_right) = if should_parallelize(&left1, &left2, &right1, &right2, threshold) {
                executor.join(
                    || setop(left1, left2, resolver, combinator, executor, threshold),
                    || setop(right1, right2, resolver, combinator, executor, threshold),
                )
            } else {
                (
                    setop(left1, left2, resolver, combinator, executor, threshold),
                    setop(right1, right2, resolver, combinator, executor, threshold),
                )
            };

            if combinator(true, hit) {
                Some(join_with_middle(new_left, middle, new_right))
            } else {
                drop(middle);
                join(new_left, new_right)
            }
        }
    }
}

/// Reads the result's size off the root's own `size` field (O(1)) rather
/// than walking the tree to count it: every node's `size` is kept current by
/// `Node::update_height` through every rotation, join, and split this
/// recursion performs, so a post-hoc recount would just repeat work already
/// done on the way down.
fn into_map<K: Ord, V>(root: Link<K, V>) -> TreeMap<K, V> {
    let mut map = TreeMap::new();
    map.len = super::node::Node::size_of(&root);
    map.root = root;
    map.begin = map.root.as_deref().map(super::node::leftmost);
    map
}

fn union_combinator(in1: bool, in2: bool) -> bool {
    in1 || in2
}

fn intersection_combinator(in1: bool, in2: bool) -> bool {
    in1 && in2
}

fn difference_combinator(in1: bool, in2: bool) -> bool {
    in1 && !in2
}

macro_rules! bulk_op {
    ($name:ident, $with_resolver:ident, $with_executor:ident, $combinator:expr) => {
        pub fn $name<K, V>(a: TreeMap<K, V>, b: TreeMap<K, V>) -> TreeMap<K, V>
        where
            K: Ord + Send,
            V: Send,
        {
            $with_resolver(a, b, resolver::keep_existing)
        }

        pub fn $with_resolver<K, V, R>(a: TreeMap<K, V>, b: TreeMap<K, V>, resolver: R) -> TreeMap<K, V>
        where
            K: Ord + Send,
            V: Send,
            R: Fn(&V, &V) -> bool + Sync,
        {
            let result = setop(a.root, b.root, &resolver, $combinator, &InlineExecutor, Options::default().parallel_work_threshold);
            into_map(result)
        }

        pub fn $with_executor<K, V, R, E>(a: TreeMap<K, V>, b: TreeMap<K, V>, resolver: R, executor: &E, options: Options) -> TreeMap<K, V>
        where
            K: Ord + Send,
            V: Send,
            R: Fn(&V, &V) -> bool + Sync,
            E: Executor,
        {
            let result = setop(a.root, b.root, &resolver, $combinator, executor, options.parallel_work_threshold);
            into_map(result)
        }
    };
}

bulk_op!(union_of, union_of_with, union_of_with_executor, union_combinator);
bulk_op!(intersection_of, intersection_of_with, intersection_of_with_executor, intersection_combinator);

/// `difference_of` always discards overlapping keys, so the resolver never
/// actually influences the result; `_with` is omitted, matching spec.md
/// §4.5's "uses a dummy resolver".
pub fn difference_of<K, V>(a: TreeMap<K, V>, b: TreeMap<K, V>) -> TreeMap<K, V>
where
    K: Ord + Send,
    V: Send,
{
    let result = setop(a.root, b.root, &resolver::keep_existing, difference_combinator, &InlineExecutor, Options::default().parallel_work_threshold);
    into_map(result)
}

pub fn difference_of_with_executor<K, V, E>(a: TreeMap<K, V>, b: TreeMap<K, V>, executor: &E, options: Options) -> TreeMap<K, V>
where
    K: Ord + Send,
    V: Send,
    E: Executor,
{
    let result = setop(a.root, b.root, &resolver::keep_existing, difference_combinator, executor, options.parallel_work_threshold);
    into_map(result)
}
