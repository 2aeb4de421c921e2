//! Error types for the hextape assembler.

use thiserror::Error;

/// Errors produced during assembly of text to nibbles, or while
/// disassembling a malformed nibble stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode did not have its operand.
    #[error("line {line}: {opcode} expects {expected} argument(s)")]
    MissingArgument {
        line: usize,
        opcode: &'static str,
        expected: usize,
    },

    /// A numeric literal could not be parsed.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A numeric literal does not fit in a 4-nibble operand.
    #[error("line {line}: operand {value} exceeds 0xffff")]
    OperandOutOfRange { line: usize, value: u64 },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A block opcode was not followed by `{`.
    #[error("line {line}: {opcode} expects a '{{' block")]
    ExpectedBlock { line: usize, opcode: &'static str },

    /// A `{` was never closed.
    #[error("line {line}: block is never closed")]
    UnclosedBlock { line: usize },

    /// A nibble stream could not be disassembled.
    #[error("nibble {at}: {reason}")]
    Malformed { at: usize, reason: &'static str },
}
