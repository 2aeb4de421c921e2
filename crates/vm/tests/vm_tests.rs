//! Integration tests for the hextape interpreter.
//!
//! Organized by opcode group, then by cross-cutting behavior (nesting,
//! limits, cancellation).

use std::time::Duration;

use hextape_common::Program;
use hextape_vm::limits::DEFAULT_MAX_DEPTH;
use hextape_vm::{
    run, run_hex, run_with, BitTape, CancelToken, Interpreter, Limits, RuntimeError,
};
use proptest::prelude::*;

// ============================================================
// Helper functions
// ============================================================

/// Decode hex text, panicking on malformed test input.
fn program(hex: &str) -> Program {
    Program::from_hex(hex).unwrap()
}

/// Run hex text with default limits and return the tape string.
fn tape_of(hex: &str) -> String {
    run(&program(hex)).unwrap().to_string()
}

/// Run `f` on a thread with a 2 MiB stack, the usual size for spawned
/// threads, and return its result.
fn on_small_stack<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

/// `levels` nested IF blocks around a single SET, on a tape whose first
/// bit is set so every IF is taken.
fn nested_ifs(levels: usize) -> String {
    format!("A0001 1 {}1{}", "C8".repeat(levels), "9".repeat(levels))
}

/// Run hex text on a fresh interpreter, keeping it for inspection.
fn run_keep(hex: &str, limits: Limits) -> (Result<(), RuntimeError>, Interpreter) {
    let mut vm = Interpreter::new(limits);
    let result = vm.execute(&program(hex));
    (result, vm)
}

// ============================================================
// End-to-end examples
// ============================================================

#[test]
fn resize_set_halt() {
    assert_eq!(tape_of("A0001 1 F"), "10000000");
}

#[test]
fn two_bits_set() {
    assert_eq!(tape_of("A0001 1 3 1 F"), "11000000");
}

#[test]
fn empty_program_leaves_empty_tape() {
    let tape = run(&Program::default()).unwrap();
    assert_eq!(tape, BitTape::new());
    assert_eq!(tape.to_string(), "");
}

#[test]
fn binary_program_matches_hex_program() {
    let from_bytes = Program::from_bytes(&[0xA0, 0x00, 0x11, 0x31, 0xF0]);
    assert_eq!(from_bytes, program("A0001 1 3 1 F 0"));
    assert_eq!(run(&from_bytes).unwrap().to_string(), "11000000");
}

#[test]
fn run_hex_surfaces_decode_errors() {
    assert_eq!(
        run_hex("A0001 1 G"),
        Err(RuntimeError::Decode(
            hextape_common::DecodeError::InvalidNibble { ch: 'G', offset: 8 }
        ))
    );
}

// ============================================================
// Bit and pointer opcodes
// ============================================================

#[test]
fn clear_bit() {
    assert_eq!(tape_of("A0001 1 0"), "00000000");
}

#[test]
fn flip_bit_twice() {
    assert_eq!(tape_of("A0001 4 3 4 4"), "10000000");
}

#[test]
fn clear_tape() {
    assert_eq!(tape_of("A0001 1 3 1 3 1 5"), "00000000");
}

#[test]
fn jump_end_and_start() {
    assert_eq!(tape_of("A0001 7 1 6 1"), "10000001");
}

#[test]
fn move_left_clamps_at_zero() {
    assert_eq!(tape_of("A0001 2 2 2 2 1"), "10000000");
}

#[test]
fn move_right_clamps_at_last_bit() {
    let right = "3".repeat(20);
    assert_eq!(tape_of(&format!("A0001 {right} 1")), "00000001");
}

#[test]
fn bit_opcodes_on_empty_tape_fail() {
    assert_eq!(
        run(&program("1")),
        Err(RuntimeError::IndexOutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn pointer_moves_on_empty_tape_are_harmless() {
    assert_eq!(tape_of("2 3 6 7 5"), "");
}

// ============================================================
// RESIZE
// ============================================================

#[test]
fn resize_to_larger_is_zeroed() {
    assert_eq!(tape_of("A0001 1 A0002"), "0".repeat(16));
}

#[test]
fn resize_to_smaller_resets_pointer_and_zeroes() {
    let (result, vm) = run_keep("A0004 7 1 A0001 1", Limits::default());
    assert_eq!(result, Ok(()));
    assert_eq!(vm.tape().to_string(), "10000000");
    assert_eq!(vm.tape().capacity_bits(), 32);
}

#[test]
fn resize_operand_is_big_endian_bytes() {
    let tape = run(&program("A0010")).unwrap();
    assert_eq!(tape.len(), 16 * 8);
}

#[test]
fn resize_to_zero() {
    assert_eq!(tape_of("A0001 1 A0000"), "");
}

#[test]
fn truncated_resize_operand() {
    assert_eq!(
        run(&program("A00")),
        Err(RuntimeError::TruncatedOperand {
            at: 1,
            depth: 0,
            width: 4
        })
    );
}

#[test]
fn truncated_repeat_count() {
    assert_eq!(
        run(&program("A0001 B00")),
        Err(RuntimeError::TruncatedOperand {
            at: 6,
            depth: 0,
            width: 4
        })
    );
}

#[test]
fn resize_beyond_limit() {
    let limits = Limits {
        max_tape_bytes: 2,
        ..Limits::default()
    };
    assert_eq!(
        run_with(&program("A0003"), limits),
        Err(RuntimeError::TapeTooLarge {
            requested: 3,
            limit: 2
        })
    );
}

// ============================================================
// REPEAT
// ============================================================

#[test]
fn repeat_runs_exactly_count_times() {
    // Each iteration sets the bit and moves right: three bits set.
    assert_eq!(tape_of("A0001 B0003 8 1 3 9"), "11100000");
}

#[test]
fn repeat_iterations_see_previous_mutations() {
    // Flipping bit 0 five times leaves it set.
    assert_eq!(tape_of("A0001 B0005 8 4 9"), "10000000");
    assert_eq!(tape_of("A0001 B0004 8 4 9"), "00000000");
}

#[test]
fn repeat_then_continue_after_block() {
    assert_eq!(tape_of("A0001 B0002 8 3 9 1"), "00100000");
}

#[test]
fn repeat_count_with_delimiter_nibbles() {
    // Count 0x0009: the trailing 9 is data, not a close.
    assert_eq!(tape_of("A0002 B0009 8 3 9 1"), "0000000001000000");
}

#[test]
fn repeat_without_open_delimiter() {
    assert_eq!(
        run(&program("A0001 B0002 1")),
        Err(RuntimeError::MissingDelimiter {
            at: 10,
            depth: 0,
            found: "1".to_string()
        })
    );
}

#[test]
fn halt_inside_counted_repeat_ends_only_the_iteration() {
    // Each iteration moves right, halts, and never reaches the SET.
    assert_eq!(tape_of("A0001 B0003 8 3 F 1 9 1"), "00010000");
}

#[test]
fn nested_repeats_multiply() {
    // 2 * 3 = 6 moves right.
    assert_eq!(tape_of("A0001 B0002 8 B0003 8 3 9 9 1"), "00000010");
}

#[test]
fn unbounded_repeat_is_stopped_by_step_limit() {
    let limits = Limits::default().with_max_steps(50);
    let (result, vm) = run_keep("A0001 B0000 8 3 1 9", limits);
    assert_eq!(result, Err(RuntimeError::StepLimitExceeded { limit: 50 }));
    // At least one iteration happened, and every completed iteration set
    // the bit it moved onto; the pointer clamps at the last bit.
    assert!(vm.tape().get(1).unwrap());
    assert_eq!(vm.tape().to_string(), "01111111");
    assert!(vm.steps() > 50);
}

#[test]
fn unbounded_repeat_is_stopped_by_timeout() {
    let limits = Limits::default().with_timeout(Duration::from_millis(20));
    let (result, vm) = run_keep("A0001 B0000 8 4 9", limits);
    assert!(matches!(result, Err(RuntimeError::DeadlineExceeded { .. })));
    assert!(vm.steps() > 1);
}

#[test]
fn unbounded_empty_repeat_is_still_cancellable() {
    let limits = Limits::default().with_max_steps(10);
    let (result, _) = run_keep("B0000 8 9", limits);
    assert_eq!(result, Err(RuntimeError::StepLimitExceeded { limit: 10 }));
}

#[test]
fn unbounded_repeat_is_stopped_by_cancel_token() {
    let token = CancelToken::new();
    token.cancel();
    let mut vm = Interpreter::new(Limits::default()).with_cancel(token);
    let result = vm.execute(&program("A0001 B0000 8 4 9"));
    assert_eq!(result, Err(RuntimeError::Cancelled));
    assert!(result.unwrap_err().is_cancellation());
}

#[test]
fn halt_inside_unbounded_repeat_exits_the_loop() {
    // The first iteration sets bit 0, moves right, and halts before its
    // second SET; the loop ends and the trailing SET marks bit 1.
    assert_eq!(tape_of("A0001 B0000 8 1 3 F 1 9 1"), "11000000");
}

#[test]
fn halt_nested_in_if_does_not_exit_unbounded_repeat() {
    // HALT inside the IF only ends the IF frame, so the loop keeps going
    // until the watchdog stops it.
    let limits = Limits::default().with_max_steps(200);
    let (result, vm) = run_keep("A0001 1 B0000 8 C 8 F 9 3 9", limits);
    assert_eq!(result, Err(RuntimeError::StepLimitExceeded { limit: 200 }));
    assert_eq!(vm.tape().pointer(), 7);
}

// ============================================================
// IF
// ============================================================

#[test]
fn if_runs_when_bit_set() {
    assert_eq!(tape_of("A0001 1 C 8 3 1 9"), "11000000");
}

#[test]
fn if_skips_when_bit_clear() {
    assert_eq!(tape_of("A0001 C 8 3 1 9 7 1"), "00000001");
}

#[test]
fn if_block_with_resize_operand_containing_delimiters() {
    // The RESIZE operand 0x0008 ends in an open delimiter.
    let tape = run(&program("A0001 1 C 8 A0008 1 9")).unwrap();
    assert_eq!(tape.len(), 64);
    assert!(tape.get(0).unwrap());
}

#[test]
fn halt_in_if_only_ends_the_if() {
    assert_eq!(tape_of("A0001 1 C 8 F 9 3 1"), "11000000");
}

// ============================================================
// DEF / CALL
// ============================================================

#[test]
fn call_without_function_is_noop() {
    assert_eq!(tape_of("A0001 E 1"), "10000000");
}

#[test]
fn define_does_not_execute() {
    let (result, vm) = run_keep("A0001 D 8 1 9", Limits::default());
    assert_eq!(result, Ok(()));
    assert_eq!(vm.tape().to_string(), "00000000");
    assert_eq!(vm.function(), Some(&program("1")));
}

#[test]
fn call_runs_function_once_per_call() {
    assert_eq!(tape_of("A0001 D 8 1 3 9 E E"), "11000000");
    assert_eq!(tape_of("A0001 D 8 4 9 E E E"), "10000000");
}

#[test]
fn redefinition_replaces_function() {
    assert_eq!(tape_of("A0001 D 8 1 3 9 E D 8 3 9 E E 1"), "10010000");
}

#[test]
fn function_can_redefine_itself() {
    // First call sets bit 0 and redefines the function to move right.
    assert_eq!(tape_of("A0001 D 8 1 D 8 3 9 9 E E E 1"), "10100000");
}

#[test]
fn call_inside_repeat() {
    assert_eq!(tape_of("A0001 D 8 1 3 9 B0004 8 E 9"), "11110000");
}

#[test]
fn function_is_shared_with_nested_frames() {
    assert_eq!(tape_of("A0001 1 C 8 D 8 3 1 9 9 E"), "11000000");
}

#[test]
fn self_recursive_call_hits_depth_limit() {
    let limits = Limits::default().with_max_depth(32);
    assert_eq!(
        run_with(&program("A0001 D 8 E 9 E"), limits),
        Err(RuntimeError::RecursionLimitExceeded { limit: 32 })
    );
}

#[test]
fn self_recursive_call_hits_default_depth_limit() {
    let result = on_small_stack(|| run(&program("A0001 D 8 E 9 E")).map(|t| t.to_string()));
    assert_eq!(
        result,
        Err(RuntimeError::RecursionLimitExceeded {
            limit: DEFAULT_MAX_DEPTH
        })
    );
}

#[test]
fn nested_ifs_up_to_default_depth_run() {
    let hex = nested_ifs(DEFAULT_MAX_DEPTH);
    let result = on_small_stack(move || run(&program(&hex)).map(|t| t.to_string()));
    assert_eq!(result, Ok("10000000".to_string()));
}

#[test]
fn nested_ifs_past_default_depth_fail() {
    let hex = nested_ifs(DEFAULT_MAX_DEPTH + 1);
    let result = on_small_stack(move || run(&program(&hex)).map(|t| t.to_string()));
    assert_eq!(
        result,
        Err(RuntimeError::RecursionLimitExceeded {
            limit: DEFAULT_MAX_DEPTH
        })
    );
}

#[test]
fn bounded_recursion_via_conditional() {
    // The function clears the current bit, moves right, and recurses while
    // the new bit is set: it consumes a run of ones.
    assert_eq!(
        tape_of("A0001 1 3 1 3 1 6 D 8 0 3 C 8 E 9 9 E"),
        "00000000"
    );
}

// ============================================================
// Structural errors
// ============================================================

#[test]
fn unmatched_block() {
    assert_eq!(
        run(&program("A0001 C 8 1 8 9")),
        Err(RuntimeError::UnmatchedBlock { at: 6, depth: 0 })
    );
}

#[test]
fn block_too_large() {
    let limits = Limits::default().with_max_block_nibbles(Some(3));
    assert_eq!(
        run_with(&program("A0001 D 8 3333 9"), limits),
        Err(RuntimeError::BlockTooLarge {
            at: 6,
            depth: 0,
            limit: 3
        })
    );
}

#[test]
fn block_limit_can_be_lifted() {
    let body = "3".repeat(5000);
    let limits = Limits::default().with_max_block_nibbles(None);
    let tape = run_with(&program(&format!("A0001 D 8 {body} 9 E 1")), limits).unwrap();
    assert_eq!(tape.to_string(), "00000001");
}

#[test]
fn close_delimiter_at_top_level_is_unknown() {
    assert_eq!(
        run(&program("9")),
        Err(RuntimeError::UnknownOpcode {
            at: 0,
            depth: 0,
            nibble: '9'
        })
    );
}

#[test]
fn open_delimiter_at_top_level_is_unknown() {
    assert!(matches!(
        run(&program("A0001 8 9")),
        Err(RuntimeError::UnknownOpcode { nibble: '8', .. })
    ));
}

#[test]
fn tape_survives_failure_for_inspection() {
    let (result, vm) = run_keep("A0001 1 3 1 9", Limits::default());
    assert!(result.is_err());
    assert_eq!(vm.tape().to_string(), "11000000");
}

// ============================================================
// Properties
// ============================================================

proptest! {
    /// REPEAT n runs its body exactly n times.
    #[test]
    fn repeat_count_is_exact(n in 1usize..40) {
        // Body moves right once; a 64-bit tape never clamps below 40.
        let hex = format!("A0008 B{n:04X} 8 3 9 1");
        let tape = run(&program(&hex)).unwrap();
        let set: Vec<usize> = (0..tape.len()).filter(|&i| tape.get(i).unwrap()).collect();
        prop_assert_eq!(set, vec![n]);
    }

    /// The pointer never leaves the tape, whatever moves are issued.
    #[test]
    fn pointer_stays_in_bounds(bytes in 1usize..4, moves in prop::collection::vec(prop::sample::select(vec!['2', '3', '6', '7']), 0..80)) {
        let moves: String = moves.into_iter().collect();
        let mut vm = Interpreter::default();
        vm.execute(&program(&format!("A{bytes:04X}{moves}"))).unwrap();
        prop_assert!(vm.tape().pointer() < vm.tape().len());
    }
}
