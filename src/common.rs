//! Shared helpers used by both the tree and deque engines (spec.md §4.10).
//!
//! The teacher's own `common.rs` wraps a single `mmap` call for a
//! special-purpose large-object allocator; this crate has no such allocator,
//! so the only carryover is the shape of the module (small, focused,
//! `unsafe`-adjacent primitives that the rest of the crate builds on) rather
//! than any of its code.

/// Moves `src` into `dst` and drops whatever was previously at `dst`,
/// without requiring `T: Default` to construct a placeholder. A thin name
/// for `std::mem::replace` used at call sites where "try-move" (spec.md
/// §4.10) is the operative concept: Rust's move semantics make the
/// no-throw/throw distinction moot (a move is always available and never
/// panics), so this crate has no copy-vs-move branch to speak of — the
/// distinction spec.md §4.10 draws collapses to "always move" in Rust.
pub(crate) fn replace<T>(dst: &mut T, src: T) -> T {
    std::mem::replace(dst, src)
}
