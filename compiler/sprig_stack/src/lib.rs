//! Stack growth for recursive tree walks.
//!
//! Parsing in sprig is iterative, but the finished tree is walked
//! recursively (dumps, renderers). Source nesting depth is unbounded, so
//! every recursive step goes through [`ensure_sufficient_stack`], which
//! switches to a freshly allocated stack segment when the current one runs low.
//!
//! On `wasm32` the guard is a plain call.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated segment.
const SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than 64 KiB remain.
///
/// ```text
/// fn depth(arena: &NodeArena, id: NodeId) -> usize {
///     ensure_sufficient_stack(|| {
///         1 + arena.children(id).iter().map(|&c| depth(arena, c)).max().unwrap_or(0)
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes of stack left in the current segment, if the platform can tell.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
