//! Program representation for hextape nibble streams.
//!
//! A program is a flat sequence of nibbles. Binary files pack two nibbles
//! per byte, high nibble first, with no header. Text files spell each
//! nibble as one hex digit.

use std::fmt;

use crate::error::DecodeError;
use crate::nibble::Nibble;
use crate::opcode::Opcode;

/// A hextape program: an immutable sequence of nibbles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Program {
    nibbles: Vec<Nibble>,
}

impl Program {
    /// Create a program from a vector of nibbles.
    pub fn new(nibbles: Vec<Nibble>) -> Self {
        Self { nibbles }
    }

    /// Decode packed binary: two nibbles per byte, high first.
    ///
    /// Every byte is valid, so this cannot fail.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            let (high, low) = Nibble::split(byte);
            nibbles.push(high);
            nibbles.push(low);
        }
        Self { nibbles }
    }

    /// Decode hex text, one nibble per digit.
    ///
    /// Digits are case-insensitive. ASCII whitespace and `_` are ignored
    /// so programs can be grouped for readability, and `;` starts a comment
    /// that runs to the end of the line.
    pub fn from_hex(text: &str) -> Result<Self, DecodeError> {
        let mut nibbles = Vec::with_capacity(text.len());
        let mut in_comment = false;

        for (offset, ch) in text.char_indices() {
            if in_comment {
                in_comment = ch != '\n';
                continue;
            }
            match ch {
                ';' => in_comment = true,
                '_' => {}
                c if c.is_ascii_whitespace() => {}
                c => {
                    let nibble =
                        Nibble::from_char(c).ok_or(DecodeError::InvalidNibble { ch: c, offset })?;
                    nibbles.push(nibble);
                }
            }
        }

        Ok(Self { nibbles })
    }

    /// Pack into bytes, high nibble first.
    ///
    /// An odd trailing nibble is paired with `F` (halt), which has no effect
    /// at the end of a top-level program.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.nibbles
            .chunks(2)
            .map(|pair| {
                let low = pair.get(1).copied().unwrap_or(Opcode::Halt.nibble());
                Nibble::join(pair[0], low)
            })
            .collect()
    }

    /// Canonical uppercase hex text with no separators.
    pub fn to_hex(&self) -> String {
        self.nibbles.iter().map(|n| n.to_char()).collect()
    }

    /// The nibble stream.
    pub fn nibbles(&self) -> &[Nibble] {
        &self.nibbles
    }

    /// Number of nibbles in the program.
    pub fn len(&self) -> usize {
        self.nibbles.len()
    }

    /// Returns true if the program has no nibbles.
    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }
}

impl From<Vec<Nibble>> for Program {
    fn from(nibbles: Vec<Nibble>) -> Self {
        Self::new(nibbles)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in &self.nibbles {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}
