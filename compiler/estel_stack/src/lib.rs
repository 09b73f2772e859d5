//! Stack safety for the recursive passes.
//!
//! Both the tree walker and the evaluator recurse once per syntax node, and
//! the evaluator additionally recurses once per interpreted call. Deeply
//! nested programs would overflow the native stack long before the
//! interpreter's own call-depth limit is reached, so every recursive step
//! goes through [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: no-op passthrough.

/// If less than this remains, the stack is grown before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the remaining space is below the red zone.
///
/// ```text
/// fn eval(&mut self, node: NodeId, scope: &ScopeRef) -> EvalResult {
///     ensure_sufficient_stack(|| self.dispatch(node, scope))
/// }
/// ```
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
