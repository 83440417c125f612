//! The parallel task executor the bulk set-operation driver consumes
//! (spec.md §4.5, §5). Grounded in `original_source/src/thread_pool_executor/
//! thread_pool_executor.h`'s `execute` / `attempt_parallel` split, and in
//! `triblespace-tribles-rust`'s use of `rayon` for parallel fan-out.

/// Something that can run two independent closures, optionally in parallel.
///
/// `attempt_parallel` must guarantee forward progress: if the implementation
/// cannot place `b` on another worker (pool saturated, or no pool at all) it
/// must run `b` inline on the calling thread rather than block waiting for
/// capacity. This mirrors the C++ original's "attempt_parallel" semantics
/// (spec.md §9, "Parallel driver"): a plain thread-pool submit that blocks
/// when full would deadlock a split/join recursion that schedules itself.
pub trait Executor: Sync {
    /// Run `a` and `b`, returning both results. `b` may run on the calling
    /// thread if no worker is available.
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;
}

/// Runs both closures sequentially on the calling thread. Used by default
/// and in tests where deterministic, single-threaded execution is wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        let ra = a();
        let rb = b();
        (ra, rb)
    }
}

/// Dispatches onto rayon's global thread pool. `rayon::join` already
/// provides attempt-parallel-or-run-inline semantics: if no idle worker can
/// steal the second closure, the calling thread runs it itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct RayonExecutor;

impl Executor for RayonExecutor {
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        rayon::join(a, b)
    }
}
