//! `TreeSet<K>`, a thin wrapper over `TreeMap<K, ()>` (spec.md §1).

use super::avl::TreeMap;

#[derive(Default)]
pub struct TreeSet<K> {
    inner: TreeMap<K, ()>,
}

impl<K: Ord> TreeSet<K> {
    pub fn new() -> Self {
        TreeSet { inner: TreeMap::new() }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Returns `true` if `key` was newly inserted.
    pub fn insert(&mut self, key: K) -> bool {
        self.inner.insert(key, ())
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.inner.remove(key).is_some()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn lower_bound(&self, key: &K) -> super::node::WeakLink<K, ()> {
        self.inner.lower_bound(key)
    }

    pub fn upper_bound(&self, key: &K) -> super::node::WeakLink<K, ()> {
        self.inner.upper_bound(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> + DoubleEndedIterator {
        self.inner.iter().map(|(k, _)| k)
    }

    /// Keys within `range`, mirroring `TreeMap::range` (SPEC_FULL.md §6).
    pub fn range<R: std::ops::RangeBounds<K>>(&self, range: R) -> impl Iterator<Item = &K> {
        self.inner.range(range).map(|(k, _)| k)
    }
}

impl<K: Ord> FromIterator<K> for TreeSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for k in iter {
            set.insert(k);
        }
        set
    }
}

impl<K: Ord> IntoIterator for TreeSet<K> {
    type Item = K;
    type IntoIter = std::iter::Map<super::iter::IntoIter<K, ()>, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter().map(|(k, _)| k)
    }
}

/// Union, intersection, and difference over sets, built directly on the map
/// bulk operations with `()` values (no conflict to resolve).
pub fn union_of<K: Ord + Send>(a: TreeSet<K>, b: TreeSet<K>) -> TreeSet<K> {
    TreeSet { inner: super::setop::union_of(a.inner, b.inner) }
}

pub fn intersection_of<K: Ord + Send>(a: TreeSet<K>, b: TreeSet<K>) -> TreeSet<K> {
    TreeSet { inner: super::setop::intersection_of(a.inner, b.inner) }
}

pub fn difference_of<K: Ord + Send>(a: TreeSet<K>, b: TreeSet<K>) -> TreeSet<K> {
    TreeSet { inner: super::setop::difference_of(a.inner, b.inner) }
}
