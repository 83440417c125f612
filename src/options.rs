//! Tunables the spec leaves "implementation-defined" (spec.md §4.5, §4.7).

/// Knobs for the bulk set-operation driver and the deque's make-room
/// strategy selection. Construct with [`Options::default`] and override
/// individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Minimum combined subtree height (summed across the four subtrees a
    /// `setop` recursion step is about to split into two subproblems) below
    /// which the step runs inline instead of being offered to an
    /// [`crate::executor::Executor`]. The engine does not track subtree
    /// sizes (only heights, needed for rebalancing anyway), so height — an
    /// already-free O(log n) proxy for size — stands in for "work" here.
    pub parallel_work_threshold: usize,

    /// `make_room` uses the *rearrange* strategy (shuffle within the
    /// existing outer array) when `active_chunks * rearrange_denominator <=
    /// outer_capacity`, and *reallocate* (a new, larger outer array)
    /// otherwise. spec.md §4.7 names the ratio N/3; `rearrange_denominator`
    /// is that `3`.
    pub rearrange_denominator: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            parallel_work_threshold: 32,
            rearrange_denominator: 3,
        }
    }
}
