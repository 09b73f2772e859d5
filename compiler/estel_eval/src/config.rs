//! Evaluation limits.

/// Default bound on nested interpreted calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Default bound on the number of elements one array may hold.
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Configuration for one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Calls nested deeper than this fail with a stack overflow error
    /// instead of exhausting memory.
    pub max_call_depth: usize,
    /// Writes that would grow an array past this many elements fail with
    /// an invalid array length error.
    pub max_array_length: usize,
}

impl EvalConfig {
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_array_length(mut self, len: usize) -> Self {
        self.max_array_length = len;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
        }
    }
}
