//! hextape interpreter — executes nibble programs against a bit tape.
//!
//! The interpreter is built from four pieces:
//! - [`BitTape`], the resizable bit memory and its pointer
//! - [`NibbleReader`], a cursor over one frame's nibble buffer
//! - [`extract_block`], which finds the body of a `8 ... 9` block while
//!   skipping over operand nibbles
//! - [`Interpreter`], which dispatches opcodes and runs blocks as nested
//!   frames sharing one tape and one function slot
//!
//! # Usage
//!
//! ```
//! use hextape_common::Program;
//! use hextape_vm::run;
//!
//! // Resize to one byte, set bit 0, move right, set bit 1, halt.
//! let program = Program::from_hex("A0001 1 3 1 F").unwrap();
//! let tape = run(&program).unwrap();
//! assert_eq!(tape.to_string(), "11000000");
//! ```

pub mod block;
pub mod error;
pub mod execute;
pub mod limits;
pub mod machine;
pub mod reader;
pub mod tape;
pub mod watchdog;

pub use block::extract_block;
pub use error::RuntimeError;
pub use limits::Limits;
pub use machine::{FrameExit, Interpreter};
pub use reader::NibbleReader;
pub use tape::BitTape;
pub use watchdog::{CancelToken, Watchdog};

use hextape_common::Program;

/// Execute a program with default limits and return the final tape.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails (unmatched block, unknown
/// opcode, recursion limit, etc.).
pub fn run(program: &Program) -> Result<BitTape, RuntimeError> {
    run_with(program, Limits::default())
}

/// Execute a program under the given limits and return the final tape.
pub fn run_with(program: &Program, limits: Limits) -> Result<BitTape, RuntimeError> {
    let mut vm = Interpreter::new(limits);
    vm.execute(program)?;
    Ok(vm.take_tape())
}

/// Decode hex text and execute it with default limits.
///
/// Decode failures surface as [`RuntimeError::Decode`], so callers handle a
/// single error type.
pub fn run_hex(text: &str) -> Result<BitTape, RuntimeError> {
    let program = Program::from_hex(text)?;
    run(&program)
}
