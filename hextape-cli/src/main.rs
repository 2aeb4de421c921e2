//! hextape CLI — run, assemble, and disassemble nibble programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/decode/assembly error
//! - 2: Usage error (reported by clap)
//! - 3: Runtime error
//! - 4: Run stopped by step limit, timeout, or Ctrl-C

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use hextape_cli::input::Format;

#[derive(Parser, Debug)]
#[command(name = "hextape")]
#[command(about = "Interpreter for nibble-encoded bit-tape programs")]
struct Cli {
    /// Increase log detail (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a program and print the final tape
    Run(RunArgs),
    /// Assemble mnemonic text into a packed binary program
    Assemble {
        /// Assembly source
        input: PathBuf,
        /// Output path (defaults to the input with a .bin extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a program as mnemonic text
    Disassemble {
        /// Program file
        input: PathBuf,
        /// How the input is encoded
        #[arg(long, value_enum, default_value_t = Format::Auto)]
        format: Format,
    },
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Program file
    #[arg(required_unless_present = "code", conflicts_with = "code")]
    pub input: Option<PathBuf>,

    /// Program given inline as hex digits
    #[arg(long)]
    pub code: Option<String>,

    /// How the input file is encoded
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    pub format: Format,

    /// Stop after this many steps
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Stop after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Maximum nesting of blocks and calls
    #[arg(long, default_value_t = hextape_vm::limits::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum block length in nibbles
    #[arg(long, default_value_t = hextape_vm::limits::DEFAULT_MAX_BLOCK_NIBBLES)]
    pub max_block: usize,

    /// Remove the block length limit
    #[arg(long, conflicts_with = "max_block")]
    pub unbounded_blocks: bool,

    /// Largest tape RESIZE may request, in bytes
    #[arg(long, default_value_t = hextape_vm::limits::DEFAULT_MAX_TAPE_BYTES)]
    pub max_tape_bytes: usize,
}

fn main() {
    let cli = Cli::parse();
    hextape_cli::init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run(args) => commands::run(&args),
        Command::Assemble { input, output } => commands::assemble(&input, output.as_deref()),
        Command::Disassemble { input, format } => commands::disassemble(&input, format),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
