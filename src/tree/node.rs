//! Node layout and rotation primitives for the AVL engine (spec.md §4.1, §4.2).
//!
//! Ownership mirrors the data model in spec.md §3: a node owns its children
//! exclusively (`Box`), and carries a non-owning pointer to its parent
//! (`NonNull`, never dereferenced to reacquire ownership — only to ascend
//! during iteration and rebalance). This generalizes the teacher's
//! single-purpose allocator node (`jcopland-alloc_expr/src/avl_tree.rs`,
//! which stores only a `size` key and an opaque data pointer) into a
//! `key, value` node usable by both the set and map views, using the same
//! `NonNull`-based weak-parent idiom.
//!
//! Per the Design Notes (spec.md §9, "Sentinel as end"), this crate does not
//! allocate a permanent sentinel node: the end position is the `None`
//! variant of the node link itself, matching the sum-type rewrite the notes
//! suggest (`Position = Node(handle) | End`). `begin`/`end` are therefore
//! `Option<NonNull<Node<K, V>>>`, with `None` meaning "one past the last
//! element".

use std::cmp::max;
use std::ptr::NonNull;

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A non-owning handle to a node, returned by lookups (`lower_bound`,
/// `upper_bound`, `try_emplace`, the cached `begin`) and accepted by
/// `insert_with_hint`. Opaque outside this crate: `Node`'s fields are
/// crate-private, so a caller can only pass a handle back in, not dereference
/// it directly.
pub type WeakLink<K, V> = Option<NonNull<Node<K, V>>>;

pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) height: i32,
    /// Count of nodes in the subtree rooted here, including this node.
    /// Maintained alongside `height` so bulk set operations can read a
    /// surviving subtree's size in O(1) instead of walking it.
    pub(crate) size: usize,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) parent: WeakLink<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new_leaf(key: K, value: V) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            height: 1,
            size: 1,
            left: None,
            right: None,
            parent: None,
        })
    }

    pub(crate) fn as_nonnull(&self) -> NonNull<Node<K, V>> {
        NonNull::from(self)
    }

    fn height_of(link: &Link<K, V>) -> i32 {
        link.as_deref().map_or(0, |n| n.height)
    }

    pub(crate) fn size_of(link: &Link<K, V>) -> usize {
        link.as_deref().map_or(0, |n| n.size)
    }

    /// Recomputes both `height` and `size` from the current children. Every
    /// place that used to call a height-only update now calls this, since a
    /// rotation or relink always changes both metrics together.
    pub(crate) fn update_height(&mut self) {
        self.height = max(Self::height_of(&self.left), Self::height_of(&self.right)) + 1;
        self.size = 1 + Self::size_of(&self.left) + Self::size_of(&self.right);
    }

    pub(crate) fn balance_factor(&self) -> i32 {
        Self::height_of(&self.left) - Self::height_of(&self.right)
    }

    /// Link `child` as this node's left child, reparenting it. Returns the
    /// previous left child, if any (spec.md §4.1: "linking a child ...
    /// overwrites [and returns] any previous child").
    pub(crate) fn link_left(&mut self, mut child: Box<Node<K, V>>) -> Link<K, V> {
        child.parent = Some(self.as_nonnull());
        crate::common::replace(&mut self.left, Some(child))
    }

    pub(crate) fn link_right(&mut self, mut child: Box<Node<K, V>>) -> Link<K, V> {
        child.parent = Some(self.as_nonnull());
        crate::common::replace(&mut self.right, Some(child))
    }

    /// Release ownership of the left child; its parent pointer is cleared.
    pub(crate) fn orphan_left(&mut self) -> Link<K, V> {
        let mut child = self.left.take();
        if let Some(c) = child.as_mut() {
            c.parent = None;
        }
        child
    }

    pub(crate) fn orphan_right(&mut self) -> Link<K, V> {
        let mut child = self.right.take();
        if let Some(c) = child.as_mut() {
            c.parent = None;
        }
        child
    }
}

/// Leftmost descendant of `node` (inclusive).
pub(crate) fn leftmost<K, V>(node: &Node<K, V>) -> NonNull<Node<K, V>> {
    let mut current = node;
    while let Some(l) = current.left.as_deref() {
        current = l;
    }
    NonNull::from(current)
}

/// Rightmost descendant of `node` (inclusive).
pub(crate) fn rightmost<K, V>(node: &Node<K, V>) -> NonNull<Node<K, V>> {
    let mut current = node;
    while let Some(r) = current.right.as_deref() {
        current = r;
    }
    NonNull::from(current)
}

/// In-order successor of `node`, ascending via parent pointers when `node`
/// has no right subtree (spec.md §4.1). `None` means `node` was the maximum
/// element (the resulting position is end).
///
/// # Safety
/// `node` must be a live node reachable from some tree's root.
pub(crate) unsafe fn next<K, V>(node: NonNull<Node<K, V>>) -> WeakLink<K, V> {
    if let Some(r) = node.as_ref().right.as_deref() {
        return Some(leftmost(r));
    }
    let mut current = node;
    let mut parent = node.as_ref().parent;
    while let Some(p) = parent {
        let is_left_child = p.as_ref().left.as_deref().map(|n| n as *const _)
            == Some(current.as_ptr() as *const _);
        if is_left_child {
            return Some(p);
        }
        current = p;
        parent = p.as_ref().parent;
    }
    None
}

/// In-order predecessor of `node` (spec.md §4.1's mirror of `next`).
///
/// # Safety
/// `node` must be a live node reachable from some tree's root.
pub(crate) unsafe fn prev<K, V>(node: NonNull<Node<K, V>>) -> WeakLink<K, V> {
    if let Some(l) = node.as_ref().left.as_deref() {
        return Some(rightmost(l));
    }
    let mut current = node;
    let mut parent = node.as_ref().parent;
    while let Some(p) = parent {
        let is_right_child = p.as_ref().right.as_deref().map(|n| n as *const _)
            == Some(current.as_ptr() as *const _);
        if is_right_child {
            return Some(p);
        }
        current = p;
        parent = p.as_ref().parent;
    }
    None
}

/// Rotate `x` left: its right child takes its place (spec.md §4.2).
pub(crate) fn rotate_left<K, V>(mut x: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut r = x.right.take().expect("rotate_left requires a right child");
    if let Some(moved) = r.left.take() {
        x.link_right(moved);
    }
    x.update_height();
    r.parent = x.parent.take();
    r.link_left(x);
    r.update_height();
    r
}

/// Rotate `x` right: its left child takes its place (spec.md §4.2).
pub(crate) fn rotate_right<K, V>(mut x: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut l = x.left.take().expect("rotate_right requires a left child");
    if let Some(moved) = l.right.take() {
        x.link_left(moved);
    }
    x.update_height();
    l.parent = x.parent.take();
    l.link_right(x);
    l.update_height();
    l
}

/// Apply the height-restoring rotation for a node whose balance factor may
/// be +2 or -2 after a height change below it (spec.md §4.2). Returns the
/// new subtree root, with an up-to-date height.
pub(crate) fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.update_height();
    let bf = node.balance_factor();
    if bf > 1 {
        let left_heavy_right = node.left.as_ref().unwrap().balance_factor() < 0;
        if left_heavy_right {
            let left = node.left.take().unwrap();
            let rotated = rotate_left(left);
            node.link_left(rotated);
        }
        rotate_right(node)
    } else if bf < -1 {
        let right_heavy_left = node.right.as_ref().unwrap().balance_factor() > 0;
        if right_heavy_left {
            let right = node.right.take().unwrap();
            let rotated = rotate_right(right);
            node.link_right(rotated);
        }
        rotate_left(node)
    } else {
        node
    }
}
