//! Native stack growth for deep recursion.
//!
//! Evaluation recurses once per nested statement, expression and JS call;
//! `stacker` grows the native stack on demand so that the configured call
//! depth, not the thread's stack size, is what limits a script.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
