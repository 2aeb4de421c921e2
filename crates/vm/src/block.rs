//! Block extraction: finding the balanced body of a `8 ... 9` block.
//!
//! Operands of `RESIZE` and `REPEAT` are raw nibbles that may well be `8`
//! or `9`. They are copied through as a unit and never counted towards
//! nesting depth.

use hextape_common::{Nibble, Opcode, Program, CLOSE, OPEN};
use tracing::trace;

use crate::error::RuntimeError;
use crate::reader::NibbleReader;

/// Extract the block whose opening delimiter was just consumed.
///
/// Returns the body without the outer delimiters and leaves the reader
/// positioned after the matching close. `max_nibbles` bounds the body
/// length; `None` removes the bound.
pub fn extract_block(
    reader: &mut NibbleReader<'_>,
    max_nibbles: Option<usize>,
) -> Result<Program, RuntimeError> {
    let opened_at = reader.pc().saturating_sub(1);
    let frame_depth = reader.depth();
    let unmatched = || RuntimeError::UnmatchedBlock {
        at: opened_at,
        depth: frame_depth,
    };

    let mut body: Vec<Nibble> = Vec::new();
    let mut depth = 1usize;

    loop {
        let nibble = reader.next_nibble().ok_or_else(unmatched)?;

        if nibble == CLOSE {
            depth -= 1;
            if depth == 0 {
                break;
            }
        } else if nibble == OPEN {
            depth += 1;
        }
        push(&mut body, nibble, max_nibbles, opened_at, frame_depth)?;

        let width = Opcode::try_from(nibble)
            .map(|op| op.operand_width())
            .unwrap_or(0);
        for _ in 0..width {
            let operand = reader.next_nibble().ok_or_else(unmatched)?;
            push(&mut body, operand, max_nibbles, opened_at, frame_depth)?;
        }
    }

    trace!(at = opened_at, len = body.len(), "extracted block");
    Ok(Program::new(body))
}

fn push(
    body: &mut Vec<Nibble>,
    nibble: Nibble,
    max_nibbles: Option<usize>,
    at: usize,
    depth: usize,
) -> Result<(), RuntimeError> {
    if let Some(limit) = max_nibbles {
        if body.len() >= limit {
            return Err(RuntimeError::BlockTooLarge { at, depth, limit });
        }
    }
    body.push(nibble);
    Ok(())
}
