//! Parser for hextape assembly tokens → nibbles.
//!
//! Each statement is a mnemonic, an operand for `RESIZE` and `REPEAT`, and
//! a `{ ... }` body for `REPEAT`, `IF` and `DEF`. Bodies nest.

use std::iter::Peekable;
use std::slice::Iter;

use crate::error::AsmError;
use crate::lexer::{Token, TokenKind};
use hextape_common::opcode::{ALL_OPCODES, MAX_OPERAND};
use hextape_common::{Nibble, Opcode, CLOSE, OPEN, OPERAND_WIDTH};

type Tokens<'a> = Peekable<Iter<'a, Token>>;

fn lookup_opcode(mnemonic: &str) -> Option<Opcode> {
    ALL_OPCODES
        .iter()
        .find(|op| op.mnemonic() == mnemonic)
        .copied()
}

/// Parse a full token stream into nibbles.
pub(crate) fn parse(tokens: &[Token]) -> Result<Vec<Nibble>, AsmError> {
    let mut out = Vec::new();
    let mut iter = tokens.iter().peekable();
    parse_statements(&mut iter, &mut out, None)?;
    Ok(out)
}

/// Parse statements until end of input (top level) or a `}` (inside a
/// block opened on `open_line`).
fn parse_statements(
    tokens: &mut Tokens<'_>,
    out: &mut Vec<Nibble>,
    open_line: Option<usize>,
) -> Result<(), AsmError> {
    loop {
        let Some(token) = tokens.next() else {
            return match open_line {
                Some(line) => Err(AsmError::UnclosedBlock { line }),
                None => Ok(()),
            };
        };

        let mnemonic = match &token.kind {
            TokenKind::Ident(s) => s.as_str(),
            TokenKind::Close if open_line.is_some() => return Ok(()),
            other => {
                return Err(AsmError::UnexpectedToken {
                    line: token.line,
                    token: render(other),
                })
            }
        };

        let opcode = lookup_opcode(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
            line: token.line,
            token: mnemonic.to_string(),
        })?;
        out.push(opcode.nibble());

        if opcode.operand_width() > 0 {
            let value = parse_operand(tokens, opcode, token.line)?;
            push_operand(out, value);
        }

        if opcode.takes_block() {
            match tokens.next() {
                Some(Token {
                    kind: TokenKind::Open,
                    line,
                }) => {
                    out.push(OPEN);
                    parse_statements(tokens, out, Some(*line))?;
                    out.push(CLOSE);
                }
                _ => {
                    return Err(AsmError::ExpectedBlock {
                        line: token.line,
                        opcode: opcode.mnemonic(),
                    })
                }
            }
        }
    }
}

fn parse_operand(tokens: &mut Tokens<'_>, opcode: Opcode, line: usize) -> Result<u16, AsmError> {
    match tokens.peek() {
        Some(Token {
            kind: TokenKind::Number(n),
            ..
        }) => {
            let n = *n;
            tokens.next();
            if n > u64::from(MAX_OPERAND) {
                return Err(AsmError::OperandOutOfRange { line, value: n });
            }
            Ok(n as u16)
        }
        _ => Err(AsmError::MissingArgument {
            line,
            opcode: opcode.mnemonic(),
            expected: 1,
        }),
    }
}

fn push_operand(out: &mut Vec<Nibble>, value: u16) {
    for shift in (0..OPERAND_WIDTH).rev() {
        out.push(Nibble::from_low_bits((value >> (shift * 4)) as u8));
    }
}

fn render(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => s.clone(),
        TokenKind::Number(n) => n.to_string(),
        TokenKind::Open => "{".to_string(),
        TokenKind::Close => "}".to_string(),
    }
}
