//! The segmented double-ended sequence (spec.md §3 "Deque entities", §4.6–§4.9).

mod chunk;
mod deque;
mod iter;

pub use deque::Deque;
pub use iter::{IntoIter, Iter, IterMut};
