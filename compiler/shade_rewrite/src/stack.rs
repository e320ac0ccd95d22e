//! Stack growth for recursive signature walks.
//!
//! Generic signatures nest arbitrarily (`A<B<C<...>>>`), and rewriting,
//! the unmanaged check, and classification all recurse over them.

/// Grow the stack when less than this remains.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 64 * 1024;

/// Size of each additional stack segment.
#[cfg(not(target_arch = "wasm32"))]
const GROWTH: usize = 1024 * 1024;

/// Run `f`, growing the stack first if it is close to exhausted.
#[cfg(not(target_arch = "wasm32"))]
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack.
#[cfg(target_arch = "wasm32")]
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
