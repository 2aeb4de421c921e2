//! hextape common types and nibble encoding.
//!
//! This crate provides the foundational data structures for the hextape
//! language:
//!
//! - [`Nibble`] — the 4-bit symbol programs are written in
//! - [`Opcode`] — the 14 executable opcodes (`8`/`9` are block delimiters)
//! - [`Program`] — an immutable nibble stream, decodable from hex text or packed bytes
//! - [`DecodeError`] — errors from decoding text
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod error;
pub mod nibble;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use nibble::{Nibble, CLOSE, OPEN};
pub use opcode::{Opcode, OPERAND_WIDTH};
pub use program::Program;
