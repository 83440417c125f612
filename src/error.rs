//! Error surface for the ordered containers (spec.md §7).

/// Errors raised by fallible operations on [`crate::tree::TreeMap`] and
/// [`crate::deque::Deque`].
///
/// Allocation failure and internal invariant violations are deliberately not
/// variants here: Rust's global allocator aborts on OOM, and an invariant
/// violation is a bug in this crate, not a recoverable condition for a
/// caller to handle.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrdexError {
    /// Raised by `TreeMap::at` / `Index` when the key is absent.
    #[error("key not found")]
    OutOfRange,

    /// Raised when a requested size exceeds what this crate is prepared to
    /// address (e.g. a chunk count that would overflow the outer index).
    #[error("requested length {requested} exceeds maximum supported length {max}")]
    LengthError { requested: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, OrdexError>;
