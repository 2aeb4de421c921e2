//! The bit tape and its single movable pointer.

use std::fmt;

use crate::error::RuntimeError;

/// Bit-addressable memory with one cursor.
///
/// Bit `i` lives in byte `i / 8` under mask `0x80 >> (i % 8)`, so the byte
/// view and the printed bit string agree.
///
/// Resizing follows a shrink-reuse policy: a resize to the current size or
/// smaller keeps the existing allocation, zeroes it, and reports the new
/// logical length. Only growth reallocates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitTape {
    bytes: Vec<u8>,
    size: usize,
    pointer: usize,
}

impl BitTape {
    /// An empty tape with no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// A zeroed tape of `byte_count * 8` bits.
    pub fn with_bytes(byte_count: usize) -> Result<Self, RuntimeError> {
        let mut tape = Self::new();
        tape.resize(byte_count)?;
        Ok(tape)
    }

    /// Set the tape to `byte_count * 8` zero bits and reset the pointer.
    ///
    /// Fails with [`RuntimeError::TapeTooLarge`] when the bit count does not
    /// fit in `usize`.
    pub fn resize(&mut self, byte_count: usize) -> Result<(), RuntimeError> {
        let new_size = byte_count
            .checked_mul(8)
            .ok_or(RuntimeError::TapeTooLarge {
                requested: byte_count,
                limit: usize::MAX / 8,
            })?;
        if new_size <= self.size {
            self.bytes.fill(0);
        } else {
            self.bytes = vec![0; byte_count];
        }
        self.size = new_size;
        self.pointer = 0;
        Ok(())
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.size
    }

    /// True when the tape has no addressable bits.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bits currently allocated. Never less than [`len`](Self::len).
    pub fn capacity_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Current pointer position.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Read the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool, RuntimeError> {
        self.check(index)?;
        Ok(self.bytes[index / 8] & mask(index) != 0)
    }

    /// Write the bit at `index`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), RuntimeError> {
        self.check(index)?;
        if value {
            self.bytes[index / 8] |= mask(index);
        } else {
            self.bytes[index / 8] &= !mask(index);
        }
        Ok(())
    }

    /// Read the bit under the pointer.
    pub fn current(&self) -> Result<bool, RuntimeError> {
        self.get(self.pointer)
    }

    /// Write the bit under the pointer.
    pub fn set_current(&mut self, value: bool) -> Result<(), RuntimeError> {
        self.set(self.pointer, value)
    }

    /// Invert the bit under the pointer.
    pub fn flip_current(&mut self) -> Result<(), RuntimeError> {
        let bit = self.current()?;
        self.set_current(!bit)
    }

    /// Set every addressable bit to `value`.
    pub fn fill(&mut self, value: bool) {
        let byte = if value { 0xFF } else { 0x00 };
        let used = self.size / 8;
        self.bytes[..used].fill(byte);
    }

    /// Move one bit left. No-op at bit 0.
    pub fn move_left(&mut self) {
        self.pointer = self.pointer.saturating_sub(1);
    }

    /// Move one bit right. No-op at the last bit.
    pub fn move_right(&mut self) {
        if self.pointer + 1 < self.size {
            self.pointer += 1;
        }
    }

    pub fn jump_start(&mut self) {
        self.pointer = 0;
    }

    pub fn jump_end(&mut self) {
        self.pointer = self.size.saturating_sub(1);
    }

    /// Iterate over the addressable bits in address order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.size).map(move |i| self.bytes[i / 8] & mask(i) != 0)
    }

    /// The addressable bits packed MSB-first.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes[..self.size / 8].to_vec()
    }

    fn check(&self, index: usize) -> Result<(), RuntimeError> {
        if index < self.size {
            Ok(())
        } else {
            Err(RuntimeError::IndexOutOfRange {
                index,
                len: self.size,
            })
        }
    }
}

#[inline(always)]
fn mask(index: usize) -> u8 {
    0x80 >> (index % 8)
}

impl fmt::Display for BitTape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
