//! Recursion safety for the relation and lookup walks.
//!
//! Two independent limits apply. The native stack grows on demand through
//! `stacker`, and a logical depth counter turns runaway recursion on
//! malformed graphs into an [`InvariantViolation::RecursionLimit`].

use crate::InvariantViolation;

/// Remaining stack below which a new segment is allocated (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Logical recursion counter.
#[derive(Debug)]
pub(crate) struct DepthGuard {
    depth: u32,
    limit: u32,
}

impl DepthGuard {
    pub(crate) const fn new(limit: u32) -> Self {
        DepthGuard { depth: 0, limit }
    }

    pub(crate) fn enter(&mut self) -> Result<(), InvariantViolation> {
        if self.depth >= self.limit {
            tracing::debug!(limit = self.limit, "recursion limit reached");
            return Err(InvariantViolation::RecursionLimit { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) const fn depth(&self) -> u32 {
        self.depth
    }
}
