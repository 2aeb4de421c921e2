//! Loading programs from disk in any of the supported encodings.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use hextape_assembler::AsmError;
use hextape_common::{DecodeError, Program};
use thiserror::Error;
use tracing::debug;

/// How a program file is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pick by extension: `.hex`/`.txt` are hex, `.tape`/`.asm` are
    /// assembly, anything else is packed binary.
    Auto,
    /// One hex digit per nibble; whitespace, `_` and `;` comments ignored.
    Hex,
    /// Two nibbles per byte, high nibble first.
    Binary,
    /// Mnemonic assembly text.
    Asm,
}

impl Format {
    /// Resolve `Auto` against a file name.
    pub fn resolve(self, path: &Path) -> Format {
        if self != Format::Auto {
            return self;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("hex") | Some("txt") => Format::Hex,
            Some("tape") | Some("asm") => Format::Asm,
            _ => Format::Binary,
        }
    }
}

/// Errors from reading and decoding a program file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{}' is not valid UTF-8 text", path.display())]
    NotText { path: PathBuf },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Asm(#[from] AsmError),
}

/// Read `path` and decode it as `format`.
pub fn load_program(path: &Path, format: Format) -> Result<Program, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = format.resolve(path);
    debug!(path = %path.display(), ?format, bytes = bytes.len(), "loading program");

    match format {
        Format::Binary | Format::Auto => Ok(Program::from_bytes(&bytes)),
        Format::Hex | Format::Asm => {
            let text = String::from_utf8(bytes).map_err(|_| LoadError::NotText {
                path: path.to_path_buf(),
            })?;
            if format == Format::Hex {
                Ok(Program::from_hex(&text)?)
            } else {
                Ok(hextape_assembler::assemble(&text)?)
            }
        }
    }
}
