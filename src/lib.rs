//! `ordex`: balanced ordered associative containers (`TreeMap`, `TreeSet`)
//! with join/split-based bulk set operations, plus a segmented double-ended
//! sequence (`Deque`). See `DESIGN.md` for how each piece is grounded.

pub mod deque;
pub mod error;
pub mod executor;
pub mod options;
pub mod tree;

mod common;

pub use deque::Deque;
pub use error::{OrdexError, Result};
pub use executor::{Executor, InlineExecutor, RayonExecutor};
pub use options::Options;
pub use tree::{
    difference_of, difference_of_with_executor, intersection_of, intersection_of_with,
    intersection_of_with_executor, resolver, set_ops, union_of, union_of_with,
    union_of_with_executor, Entry, IntoIter as TreeIntoIter, Iter as TreeIter,
    IterMut as TreeIterMut, OccupiedEntry, Range as TreeRange, TreeMap, TreeSet, VacantEntry,
};
