//! Opcode definitions for the hextape instruction set.
//!
//! Every nibble except the two block delimiters (`8` and `9`) names an
//! operation. `A` and `B` are followed by a fixed-width operand; `B`, `C`
//! and `D` are followed by a delimited block.

use crate::error::DecodeError;
use crate::nibble::Nibble;

/// Width in nibbles of the operand following `RESIZE` and `REPEAT`.
pub const OPERAND_WIDTH: usize = 4;

/// Largest value an operand can carry.
pub const MAX_OPERAND: u16 = u16::MAX;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` value is the nibble that encodes the opcode.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Bit at pointer
    /// Clear the bit under the pointer.
    ClearBit = 0x0,
    /// Set the bit under the pointer.
    SetBit = 0x1,

    // Pointer movement
    /// Move the pointer one bit left, stopping at 0.
    MoveLeft = 0x2,
    /// Move the pointer one bit right, stopping at the last bit.
    MoveRight = 0x3,

    /// Invert the bit under the pointer.
    FlipBit = 0x4,
    /// Zero the whole tape.
    ClearTape = 0x5,
    /// Move the pointer to bit 0.
    JumpStart = 0x6,
    /// Move the pointer to the last bit.
    JumpEnd = 0x7,

    // Structural
    /// Reallocate the tape. Operand: byte count.
    Resize = 0xA,
    /// Run the following block `count` times, or forever when `count` is 0.
    Repeat = 0xB,
    /// Run the following block once if the bit under the pointer is set.
    If = 0xC,
    /// Store the following block as the function.
    Define = 0xD,
    /// Run the stored function, if any.
    Call = 0xE,
    /// End the current frame.
    Halt = 0xF,
}

/// All opcodes, in nibble order.
pub const ALL_OPCODES: [Opcode; 14] = [
    Opcode::ClearBit,
    Opcode::SetBit,
    Opcode::MoveLeft,
    Opcode::MoveRight,
    Opcode::FlipBit,
    Opcode::ClearTape,
    Opcode::JumpStart,
    Opcode::JumpEnd,
    Opcode::Resize,
    Opcode::Repeat,
    Opcode::If,
    Opcode::Define,
    Opcode::Call,
    Opcode::Halt,
];

impl TryFrom<Nibble> for Opcode {
    type Error = DecodeError;

    fn try_from(nibble: Nibble) -> Result<Self, Self::Error> {
        match nibble.value() {
            0x0 => Ok(Opcode::ClearBit),
            0x1 => Ok(Opcode::SetBit),
            0x2 => Ok(Opcode::MoveLeft),
            0x3 => Ok(Opcode::MoveRight),
            0x4 => Ok(Opcode::FlipBit),
            0x5 => Ok(Opcode::ClearTape),
            0x6 => Ok(Opcode::JumpStart),
            0x7 => Ok(Opcode::JumpEnd),
            0xA => Ok(Opcode::Resize),
            0xB => Ok(Opcode::Repeat),
            0xC => Ok(Opcode::If),
            0xD => Ok(Opcode::Define),
            0xE => Ok(Opcode::Call),
            0xF => Ok(Opcode::Halt),
            _ => Err(DecodeError::NotAnOpcode(nibble.to_char())),
        }
    }
}

impl From<Opcode> for Nibble {
    fn from(op: Opcode) -> Nibble {
        Nibble::from_low_bits(op as u8)
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::ClearBit => "CLR",
            Opcode::SetBit => "SET",
            Opcode::MoveLeft => "LEFT",
            Opcode::MoveRight => "RIGHT",
            Opcode::FlipBit => "FLIP",
            Opcode::ClearTape => "WIPE",
            Opcode::JumpStart => "START",
            Opcode::JumpEnd => "END",
            Opcode::Resize => "RESIZE",
            Opcode::Repeat => "REPEAT",
            Opcode::If => "IF",
            Opcode::Define => "DEF",
            Opcode::Call => "CALL",
            Opcode::Halt => "HALT",
        }
    }

    /// Number of operand nibbles that follow the opcode.
    pub fn operand_width(&self) -> usize {
        match self {
            Opcode::Resize | Opcode::Repeat => OPERAND_WIDTH,
            _ => 0,
        }
    }

    /// Whether the opcode is followed by a delimited block.
    pub fn takes_block(&self) -> bool {
        matches!(self, Opcode::Repeat | Opcode::If | Opcode::Define)
    }

    /// Encoding nibble.
    pub fn nibble(&self) -> Nibble {
        Nibble::from(*self)
    }
}
