//! Chunk sizing and storage (spec.md §3 "Deque entities", §4.6).

use std::mem::MaybeUninit;

/// `C` from spec.md §3: the number of `T`s a chunk holds, chosen so that
/// `C * size_of::<T>() <= 512` bytes, with a floor of 4 (and a fallback to
/// that floor for zero-sized `T`, where the byte budget is meaningless).
pub(crate) const fn chunk_capacity<T>() -> usize {
    const MAX_CHUNK_BYTES: usize = 512;
    const MIN_CHUNK_SIZE: usize = 4;
    let size = std::mem::size_of::<T>();
    if size == 0 {
        return MIN_CHUNK_SIZE;
    }
    let per_budget = MAX_CHUNK_BYTES / size;
    if per_budget < MIN_CHUNK_SIZE {
        MIN_CHUNK_SIZE
    } else {
        per_budget
    }
}

/// A fixed-capacity raw buffer. A `Chunk` does not know which of its slots
/// are initialized — that bookkeeping lives in the owning `Deque`'s
/// `begin`/`end` positions — so `Chunk` carries no `Drop` impl; the `Deque`
/// must read/drop every live element before its chunks are freed.
pub(crate) struct Chunk<T> {
    data: Box<[MaybeUninit<T>]>,
}

impl<T> Chunk<T> {
    pub(crate) fn new() -> Self {
        let capacity = chunk_capacity::<T>();
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, MaybeUninit::uninit);
        Chunk { data: data.into_boxed_slice() }
    }

    /// # Safety
    /// `index` must be an uninitialized slot.
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        self.data[index].write(value);
    }

    /// # Safety
    /// `index` must be an initialized slot; the slot is left logically
    /// uninitialized afterward (the caller owns the returned value now).
    pub(crate) unsafe fn read(&mut self, index: usize) -> T {
        self.data[index].assume_init_read()
    }

    /// # Safety
    /// `index` must be an initialized slot.
    pub(crate) unsafe fn get(&self, index: usize) -> &T {
        self.data[index].assume_init_ref()
    }

    /// # Safety
    /// `index` must be an initialized slot.
    pub(crate) unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        self.data[index].assume_init_mut()
    }
}
