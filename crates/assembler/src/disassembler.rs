//! Disassembler: nibble program → canonical assembly text.
//!
//! Output has one statement per line, block bodies indented four spaces
//! per level, operands as 4-digit hex, and no comments.

use hextape_common::{Nibble, Opcode, Program, CLOSE, OPEN, OPERAND_WIDTH};

use crate::error::AsmError;

/// Disassemble a program into canonical assembly text.
///
/// Fails on streams the interpreter would reject structurally: stray
/// delimiters, truncated operands, block opcodes without `8`, and blocks
/// that never close.
pub fn disassemble(program: &Program) -> Result<String, AsmError> {
    let nibbles = program.nibbles();
    let mut out = String::new();
    let mut depth = 0usize;
    let mut pc = 0usize;

    while pc < nibbles.len() {
        let at = pc;
        let nibble = nibbles[pc];
        pc += 1;

        if nibble == CLOSE {
            if depth == 0 {
                return Err(AsmError::Malformed {
                    at,
                    reason: "close delimiter outside a block",
                });
            }
            depth -= 1;
            indent(&mut out, depth);
            out.push_str("}\n");
            continue;
        }

        let opcode = Opcode::try_from(nibble).map_err(|_| AsmError::Malformed {
            at,
            reason: "open delimiter in opcode position",
        })?;

        indent(&mut out, depth);
        out.push_str(opcode.mnemonic());

        if opcode.operand_width() > 0 {
            let operand = nibbles
                .get(pc..pc + OPERAND_WIDTH)
                .ok_or(AsmError::Malformed {
                    at,
                    reason: "truncated operand",
                })?;
            out.push_str(&format!(" 0x{:04x}", operand_value(operand)));
            pc += OPERAND_WIDTH;
        }

        if opcode.takes_block() {
            if nibbles.get(pc) != Some(&OPEN) {
                return Err(AsmError::Malformed {
                    at: pc,
                    reason: "block opcode without open delimiter",
                });
            }
            pc += 1;
            depth += 1;
            out.push_str(" {");
        }
        out.push('\n');
    }

    if depth > 0 {
        return Err(AsmError::Malformed {
            at: nibbles.len(),
            reason: "unclosed block",
        });
    }
    Ok(out)
}

fn operand_value(nibbles: &[Nibble]) -> u16 {
    nibbles
        .iter()
        .fold(0u16, |acc, n| (acc << 4) | u16::from(n.value()))
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}
