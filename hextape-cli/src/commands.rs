//! CLI command implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use hextape_cli::input::{self, Format};
use hextape_common::Program;
use hextape_vm::{CancelToken, Interpreter, Limits};
use tracing::{info, warn};

use crate::RunArgs;

const EXIT_INPUT: i32 = 1;
const EXIT_RUNTIME: i32 = 3;
const EXIT_CANCELLED: i32 = 4;

/// Execute a program and print the final tape.
pub fn run(args: &RunArgs) -> Result<(), i32> {
    // clap guarantees exactly one of `--code` and the input path.
    let program = match (&args.code, &args.input) {
        (Some(code), _) => Program::from_hex(code).map_err(|e| {
            eprintln!("error: {e}");
            EXIT_INPUT
        })?,
        (None, path) => load(path.as_deref().unwrap_or(Path::new("-")), args.format)?,
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!("cannot install Ctrl-C handler: {e}");
    }

    let mut vm = Interpreter::new(limits_from(args)).with_cancel(cancel);
    let started = Instant::now();
    let result = vm.execute(&program);
    let elapsed = started.elapsed();

    match result {
        Ok(()) => {
            println!("Tape: {}", vm.tape());
            report_time(elapsed, vm.steps());
            Ok(())
        }
        Err(e) if e.is_cancellation() => {
            println!("Tape: {}", vm.tape());
            report_time(elapsed, vm.steps());
            eprintln!("stopped: {e}");
            Err(EXIT_CANCELLED)
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(EXIT_RUNTIME)
        }
    }
}

/// Assemble mnemonic text to a packed binary program.
pub fn assemble(input: &Path, output: Option<&Path>) -> Result<(), i32> {
    let program = load(input, Format::Asm)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let bytes = program.to_bytes();
    fs::write(&output, &bytes).map_err(|e| {
        eprintln!("error: cannot write '{}': {e}", output.display());
        EXIT_INPUT
    })?;

    eprintln!(
        "assembled {} nibbles ({} bytes) -> {}",
        program.len(),
        bytes.len(),
        output.display()
    );
    Ok(())
}

/// Print a program as mnemonic text.
pub fn disassemble(input: &Path, format: Format) -> Result<(), i32> {
    let program = load(input, format)?;
    let text = hextape_assembler::disassemble(&program).map_err(|e| {
        eprintln!("error: {e}");
        EXIT_INPUT
    })?;
    print!("{text}");
    Ok(())
}

fn load(path: &Path, format: Format) -> Result<Program, i32> {
    input::load_program(path, format).map_err(|e| {
        eprintln!("error: {e}");
        EXIT_INPUT
    })
}

fn limits_from(args: &RunArgs) -> Limits {
    let mut limits = Limits::default()
        .with_max_depth(args.max_depth)
        .with_max_block_nibbles((!args.unbounded_blocks).then_some(args.max_block))
        .with_max_tape_bytes(args.max_tape_bytes);
    if let Some(steps) = args.max_steps {
        limits = limits.with_max_steps(steps);
    }
    if let Some(ms) = args.timeout_ms {
        limits = limits.with_timeout(Duration::from_millis(ms));
    }
    limits
}

fn report_time(elapsed: Duration, steps: u64) {
    info!(steps, "run finished");
    eprintln!("Execution time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
}

/// `prog.tape` -> `prog.bin`; paths without an extension gain one.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("bin")
}
