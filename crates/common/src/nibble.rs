//! The 4-bit symbol that every hextape program is made of.

use std::fmt;

use crate::error::DecodeError;

/// One hex digit of program text. Always holds a value in `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nibble(u8);

/// Opens a block (`{`).
pub const OPEN: Nibble = Nibble(0x8);

/// Closes a block (`}`).
pub const CLOSE: Nibble = Nibble(0x9);

impl Nibble {
    /// Build a nibble from the low four bits of `value`, discarding the rest.
    pub const fn from_low_bits(value: u8) -> Self {
        Nibble(value & 0x0F)
    }

    /// The numeric value, `0..=15`.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Canonical uppercase hex digit.
    pub fn to_char(self) -> char {
        char::from_digit(u32::from(self.0), 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    /// Parse a single hex digit. Accepts both cases.
    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(16).map(|d| Nibble(d as u8))
    }

    /// Split a byte into its high and low nibbles.
    pub const fn split(byte: u8) -> (Self, Self) {
        (Nibble(byte >> 4), Nibble(byte & 0x0F))
    }

    /// Join a high and low nibble back into a byte.
    pub const fn join(high: Self, low: Self) -> u8 {
        (high.0 << 4) | low.0
    }
}

impl TryFrom<u8> for Nibble {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 0x0F {
            Ok(Nibble(value))
        } else {
            Err(DecodeError::OutOfRange(value))
        }
    }
}

impl From<Nibble> for u8 {
    fn from(n: Nibble) -> u8 {
        n.0
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
