//! Runtime errors for the hextape interpreter.
//!
//! Every error is fatal to the whole run. Errors raised while reading a
//! frame carry `at`, the nibble offset inside that frame's buffer, and
//! `depth`, the frame's nesting level (0 for the top-level program).

use std::time::Duration;

use hextape_common::DecodeError;
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Program text could not be decoded into nibbles.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The stream ended in the middle of a fixed-width operand.
    #[error("truncated {width}-nibble operand at nibble {at} (depth {depth})")]
    TruncatedOperand {
        at: usize,
        depth: usize,
        width: usize,
    },

    /// A block was opened but its closing delimiter never arrived.
    #[error("unmatched block opened before nibble {at} (depth {depth})")]
    UnmatchedBlock { at: usize, depth: usize },

    /// An extracted block exceeded the configured ceiling.
    #[error("block at nibble {at} exceeds {limit} nibbles (depth {depth})")]
    BlockTooLarge {
        at: usize,
        depth: usize,
        limit: usize,
    },

    /// A structural opcode was not followed by an opening delimiter.
    #[error("expected '8' at nibble {at}, found {found} (depth {depth})")]
    MissingDelimiter {
        at: usize,
        depth: usize,
        found: String,
    },

    /// A nibble in opcode position does not name an opcode.
    #[error("unknown opcode {nibble} at nibble {at} (depth {depth})")]
    UnknownOpcode {
        at: usize,
        depth: usize,
        nibble: char,
    },

    /// A tape access fell outside the current tape.
    #[error("bit index {index} out of range (tape length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A resize asked for more bytes than the configured maximum.
    #[error("tape of {requested} bytes exceeds limit of {limit} bytes")]
    TapeTooLarge { requested: usize, limit: usize },

    /// Nested frames exceeded the configured depth.
    #[error("recursion depth exceeded limit {limit}")]
    RecursionLimitExceeded { limit: usize },

    /// The step budget ran out.
    #[error("step limit {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    /// The wall-clock budget ran out.
    #[error("execution exceeded timeout of {timeout:?}")]
    DeadlineExceeded { timeout: Duration },

    /// The cancel token was triggered from outside the interpreter.
    #[error("execution cancelled")]
    Cancelled,
}

impl RuntimeError {
    /// True for errors raised by the watchdog rather than by the program.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            RuntimeError::StepLimitExceeded { .. }
                | RuntimeError::DeadlineExceeded { .. }
                | RuntimeError::Cancelled
        )
    }
}
