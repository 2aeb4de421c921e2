//! Decode errors for hextape nibble streams.

use thiserror::Error;

/// Errors that occur while turning text or bytes into nibbles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A character outside `0-9`, `a-f`, `A-F` appeared in hex text.
    #[error("invalid nibble {ch:?} at offset {offset}")]
    InvalidNibble { ch: char, offset: usize },

    /// A numeric value does not fit in four bits.
    #[error("value {0:#04x} is not a nibble")]
    OutOfRange(u8),

    /// The nibble is a block delimiter, not an executable opcode.
    #[error("nibble {0} is not an opcode")]
    NotAnOpcode(char),
}
