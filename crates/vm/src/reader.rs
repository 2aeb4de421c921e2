//! Sequential nibble access over one frame's program buffer.

use hextape_common::{Nibble, OPEN};

use crate::error::RuntimeError;

/// A cursor over a nibble buffer.
///
/// Each frame keeps its own position, so a nested frame can never disturb
/// the position of the frame that started it.
#[derive(Debug, Clone)]
pub struct NibbleReader<'a> {
    nibbles: &'a [Nibble],
    pc: usize,
    depth: usize,
}

impl<'a> NibbleReader<'a> {
    /// Start reading `nibbles` from the beginning. `depth` is only used to
    /// label errors.
    pub fn new(nibbles: &'a [Nibble], depth: usize) -> Self {
        Self {
            nibbles,
            pc: 0,
            depth,
        }
    }

    /// Resume reading `nibbles` at `pc`.
    pub fn resume(nibbles: &'a [Nibble], pc: usize, depth: usize) -> Self {
        Self {
            nibbles,
            pc: pc.min(nibbles.len()),
            depth,
        }
    }

    /// Index of the next nibble to be read.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_at_end(&self) -> bool {
        self.pc >= self.nibbles.len()
    }

    /// Read the next nibble, or `None` at end of stream.
    pub fn next_nibble(&mut self) -> Option<Nibble> {
        let nibble = self.nibbles.get(self.pc).copied()?;
        self.pc += 1;
        Some(nibble)
    }

    /// Read `width` nibbles as a big-endian unsigned integer.
    pub fn read_fixed(&mut self, width: usize) -> Result<usize, RuntimeError> {
        debug_assert!(width <= std::mem::size_of::<usize>() * 2);
        let start = self.pc;
        let mut value = 0usize;
        for _ in 0..width {
            let nibble = self
                .next_nibble()
                .ok_or(RuntimeError::TruncatedOperand {
                    at: start,
                    depth: self.depth,
                    width,
                })?;
            value = (value << 4) | usize::from(nibble.value());
        }
        Ok(value)
    }

    /// Consume one nibble and require it to open a block.
    pub fn expect_open(&mut self) -> Result<(), RuntimeError> {
        let at = self.pc;
        match self.next_nibble() {
            Some(n) if n == OPEN => Ok(()),
            other => Err(RuntimeError::MissingDelimiter {
                at,
                depth: self.depth,
                found: other
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "end of stream".to_string()),
            }),
        }
    }
}
