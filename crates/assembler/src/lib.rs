//! hextape assembler — mnemonic text ↔ nibble programs.
//!
//! The assembler is a mechanical 1:1 translation: every mnemonic becomes one
//! nibble, operands become four nibbles, and `{`/`}` become the `8`/`9`
//! delimiters.
//!
//! # Usage
//!
//! ```
//! use hextape_assembler::{assemble, disassemble};
//!
//! let text = "RESIZE 0x0001\nREPEAT 0x0003 {\n    SET\n    RIGHT\n}\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.to_hex(), "A0001B00038139");
//! assert_eq!(disassemble(&program).unwrap(), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` holds for every program the
//! disassembler accepts. The disassembler outputs canonical text; the
//! assembler also accepts decimal operands, lowercase mnemonics, comments,
//! and free-form whitespace around braces.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::disassemble;
pub use error::AsmError;

use hextape_common::Program;

/// Assemble text into a nibble program.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let tokens = lexer::tokenize(text)?;
    let nibbles = parser::parse(&tokens)?;
    Ok(Program::new(nibbles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_minimal() {
        let program = assemble("RESIZE 1\nSET\nHALT\n").unwrap();
        assert_eq!(program.to_hex(), "A00011F");
    }

    #[test]
    fn disassemble_minimal() {
        let program = Program::from_hex("A0001 1 F").unwrap();
        assert_eq!(
            disassemble(&program).unwrap(),
            "RESIZE 0x0001\nSET\nHALT\n"
        );
    }

    #[test]
    fn roundtrip_assemble_then_disassemble_then_assemble() {
        let text = "resize 2\nrepeat 5 { set right }\ndef{flip}call\n";
        let first = assemble(text).unwrap();
        let canonical = disassemble(&first).unwrap();
        let second = assemble(&canonical).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let text = "\
; Set the first bit
RESIZE 1   ; one byte

SET
";
        let program = assemble(text).unwrap();
        assert_eq!(program.to_hex(), "A00011");
    }

    #[test]
    fn empty_text_is_empty_program() {
        assert!(assemble("").unwrap().is_empty());
        assert!(assemble("; nothing\n\n").unwrap().is_empty());
    }
}
