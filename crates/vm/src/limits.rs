//! Resource limits for a run.
//!
//! Nothing in the language bounds nesting, block size, or running time, so
//! the interpreter enforces these at runtime.

use std::time::Duration;

/// Default maximum number of nested frames.
pub const DEFAULT_MAX_DEPTH: usize = 1_024;

/// Default maximum length of an extracted block, in nibbles.
pub const DEFAULT_MAX_BLOCK_NIBBLES: usize = 4_096;

/// Default maximum tape size, in bytes (8 Mi bits).
pub const DEFAULT_MAX_TAPE_BYTES: usize = 1024 * 1024;

/// Limits applied to one interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Frames allowed below the top-level program.
    pub max_depth: usize,
    /// Ceiling on extracted block length. `None` means unbounded.
    pub max_block_nibbles: Option<usize>,
    /// Largest byte count `RESIZE` may request.
    pub max_tape_bytes: usize,
    /// Opcodes dispatched before the run is stopped.
    pub max_steps: Option<u64>,
    /// Wall-clock budget measured from the start of `execute`.
    pub timeout: Option<Duration>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_block_nibbles: Some(DEFAULT_MAX_BLOCK_NIBBLES),
            max_tape_bytes: DEFAULT_MAX_TAPE_BYTES,
            max_steps: None,
            timeout: None,
        }
    }
}

impl Limits {
    /// Builder-style override of the step budget.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_block_nibbles(mut self, limit: Option<usize>) -> Self {
        self.max_block_nibbles = limit;
        self
    }

    pub fn with_max_tape_bytes(mut self, bytes: usize) -> Self {
        self.max_tape_bytes = bytes;
        self
    }
}
