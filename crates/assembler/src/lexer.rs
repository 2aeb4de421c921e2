//! Tokenizer for hextape assembly text.

use crate::error::AsmError;

/// What a token is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// An opcode mnemonic. Always uppercase.
    Ident(String),
    /// A numeric literal (decimal or hex).
    Number(u64),
    /// `{`
    Open,
    /// `}`
    Close,
}

/// A token and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Tokenize a whole source text.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        tokens.extend(
            tokenize_line(line, line_num)?
                .into_iter()
                .map(|kind| Token {
                    kind,
                    line: line_num,
                }),
        );
    }
    Ok(tokens)
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line. Braces need no
/// surrounding whitespace.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<TokenKind>, AsmError> {
    // Strip comment
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let spaced = line.replace('{', " { ").replace('}', " } ");

    let mut tokens = Vec::new();
    for word in spaced.split_whitespace() {
        let token = if word == "{" {
            TokenKind::Open
        } else if word == "}" {
            TokenKind::Close
        } else if word.starts_with("0x") || word.starts_with("0X") {
            let hex_str = &word[2..];
            let value = u64::from_str_radix(hex_str, 16).map_err(|_| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            TokenKind::Number(value)
        } else if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            let value: u64 = word.parse().map_err(|_| AsmError::InvalidNumber {
                line: line_num,
                token: word.to_string(),
            })?;
            TokenKind::Number(value)
        } else {
            TokenKind::Ident(word.to_uppercase())
        };
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    #[test]
    fn empty_line() {
        assert_eq!(tokenize_line("", 1).unwrap(), vec![]);
    }

    #[test]
    fn comment_only() {
        assert_eq!(tokenize_line("; this is a comment", 1).unwrap(), vec![]);
    }

    #[test]
    fn opcode_with_comment() {
        assert_eq!(
            tokenize_line("FLIP ; invert", 1).unwrap(),
            vec![ident("FLIP")]
        );
    }

    #[test]
    fn opcode_with_decimal_and_hex_args() {
        assert_eq!(
            tokenize_line("RESIZE 16", 1).unwrap(),
            vec![ident("RESIZE"), TokenKind::Number(16)]
        );
        assert_eq!(
            tokenize_line("REPEAT 0x0010 {", 1).unwrap(),
            vec![ident("REPEAT"), TokenKind::Number(16), TokenKind::Open]
        );
    }

    #[test]
    fn braces_split_without_spaces() {
        assert_eq!(
            tokenize_line("IF{SET}", 1).unwrap(),
            vec![ident("IF"), TokenKind::Open, ident("SET"), TokenKind::Close]
        );
    }

    #[test]
    fn lowercase_opcode_uppercased() {
        assert_eq!(tokenize_line("call", 1).unwrap(), vec![ident("CALL")]);
    }

    #[test]
    fn invalid_hex_number() {
        let err = tokenize_line("RESIZE 0xZZZZ", 3).unwrap_err();
        assert_eq!(
            err,
            AsmError::InvalidNumber {
                line: 3,
                token: "0xZZZZ".to_string()
            }
        );
    }

    #[test]
    fn invalid_decimal_number() {
        let err = tokenize_line("REPEAT 12abc", 5).unwrap_err();
        assert_eq!(
            err,
            AsmError::InvalidNumber {
                line: 5,
                token: "12abc".to_string()
            }
        );
    }

    #[test]
    fn tokenize_tracks_lines() {
        let tokens = tokenize("SET\n\nIF {\n}\n").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 3, 3, 4]);
    }
}
