//! Stack growth for deep template recursion.
//!
//! Rendering walks the AST by recursion: a function body renders its
//! statements, a predicate call renders its `on_pass`/`on_fail` blocks, and an
//! expression renders its operands. The only bound on that depth is the
//! nesting of the input, so each descent goes through
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets** grow the stack on demand via `stacker`.
//! - **WASM targets** call straight through.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
