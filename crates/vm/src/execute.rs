//! Main execution loop and opcode dispatch for the hextape interpreter.
//!
//! Frames are kept on a heap-allocated stack rather than the native call
//! stack, so nesting depth is bounded only by `Limits::max_depth`.

use std::rc::Rc;

use hextape_common::{Opcode, Program, OPERAND_WIDTH};
use tracing::{debug, trace};

use crate::block::extract_block;
use crate::error::RuntimeError;
use crate::machine::{FrameExit, Interpreter};
use crate::reader::NibbleReader;
use crate::watchdog::Watchdog;

/// One activation of a program buffer.
#[derive(Debug)]
struct Frame {
    program: Rc<Program>,
    pc: usize,
    depth: usize,
    /// A `REPEAT` this frame is waiting on. While set, the frame runs
    /// iterations instead of its own opcodes.
    repeat: Option<Repeat>,
}

#[derive(Debug)]
struct Repeat {
    block: Rc<Program>,
    /// Iterations left; `None` runs until an iteration halts.
    remaining: Option<usize>,
}

/// What the frame on top of the stack asks for next.
#[derive(Debug)]
enum Step {
    Continue,
    Enter(Rc<Program>),
    Exit(FrameExit),
}

impl Frame {
    fn new(program: Rc<Program>, depth: usize) -> Self {
        Self {
            program,
            pc: 0,
            depth,
            repeat: None,
        }
    }

    fn repeats_until_halt(&self) -> bool {
        matches!(&self.repeat, Some(Repeat { remaining: None, .. }))
    }
}

impl Interpreter {
    /// Run `program` as the top-level frame.
    ///
    /// The tape and function slot carry over from earlier runs on the same
    /// interpreter; the step and time budgets start fresh.
    pub fn execute(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.watchdog = Watchdog::new(&self.limits, self.cancel.clone());
        debug!(nibbles = program.len(), "execute");

        let result = self.run_frames(Rc::new(program.clone()));
        match &result {
            Ok(exit) => debug!(?exit, steps = self.steps(), "finished"),
            Err(e) => debug!(error = %e, steps = self.steps(), "aborted"),
        }
        result.map(|_| ())
    }

    /// Drive frames until the top-level one exits. Returns how it exited.
    fn run_frames(&mut self, program: Rc<Program>) -> Result<FrameExit, RuntimeError> {
        let mut frames = vec![Frame::new(program, 0)];
        let mut exit = FrameExit::Ended;

        while let Some(frame) = frames.last_mut() {
            let depth = frame.depth;
            let step = if frame.repeat.is_some() {
                self.next_iteration(frame)?
            } else {
                self.step(frame)?
            };

            match step {
                Step::Continue => {}
                Step::Enter(program) => {
                    let depth = depth + 1;
                    if depth > self.limits.max_depth {
                        return Err(RuntimeError::RecursionLimitExceeded {
                            limit: self.limits.max_depth,
                        });
                    }
                    trace!(depth, nibbles = program.len(), "enter frame");
                    frames.push(Frame::new(program, depth));
                }
                Step::Exit(how) => {
                    frames.pop();
                    if let Some(parent) = frames.last_mut() {
                        // An unbounded repeat ends when an iteration halts.
                        if how == FrameExit::Halted && parent.repeats_until_halt() {
                            parent.repeat = None;
                        }
                    }
                    exit = how;
                }
            }
        }
        Ok(exit)
    }

    /// Dispatch one opcode of `frame`.
    fn step(&mut self, frame: &mut Frame) -> Result<Step, RuntimeError> {
        let depth = frame.depth;
        let mut reader = NibbleReader::resume(frame.program.nibbles(), frame.pc, depth);

        let at = reader.pc();
        let Some(nibble) = reader.next_nibble() else {
            trace!(depth, "frame ended");
            return Ok(Step::Exit(FrameExit::Ended));
        };
        self.watchdog.tick()?;

        let opcode = Opcode::try_from(nibble).map_err(|_| RuntimeError::UnknownOpcode {
            at,
            depth,
            nibble: nibble.to_char(),
        })?;
        trace!(at, depth, op = opcode.mnemonic(), pointer = self.tape.pointer(), "dispatch");

        let step = match opcode {
            // Bit at pointer
            Opcode::ClearBit => {
                self.tape.set_current(false)?;
                Step::Continue
            }
            Opcode::SetBit => {
                self.tape.set_current(true)?;
                Step::Continue
            }
            Opcode::FlipBit => {
                self.tape.flip_current()?;
                Step::Continue
            }
            Opcode::ClearTape => {
                self.tape.fill(false);
                Step::Continue
            }

            // Pointer movement
            Opcode::MoveLeft => {
                self.tape.move_left();
                Step::Continue
            }
            Opcode::MoveRight => {
                self.tape.move_right();
                Step::Continue
            }
            Opcode::JumpStart => {
                self.tape.jump_start();
                Step::Continue
            }
            Opcode::JumpEnd => {
                self.tape.jump_end();
                Step::Continue
            }

            // Structural
            Opcode::Resize => {
                let bytes = reader.read_fixed(OPERAND_WIDTH)?;
                self.exec_resize(bytes)?;
                Step::Continue
            }
            Opcode::Repeat => {
                let count = reader.read_fixed(OPERAND_WIDTH)?;
                let block = self.take_block(&mut reader)?;
                frame.repeat = Some(Repeat {
                    block: Rc::new(block),
                    remaining: (count != 0).then_some(count),
                });
                Step::Continue
            }
            Opcode::If => {
                let block = self.take_block(&mut reader)?;
                if self.tape.current()? {
                    Step::Enter(Rc::new(block))
                } else {
                    Step::Continue
                }
            }
            Opcode::Define => {
                let block = self.take_block(&mut reader)?;
                debug!(at, depth, function = %block, "define");
                self.function = Some(Rc::new(block));
                Step::Continue
            }
            // The frame holds its own handle, so the body may redefine the slot.
            Opcode::Call => match &self.function {
                Some(function) => Step::Enter(Rc::clone(function)),
                None => Step::Continue,
            },
            Opcode::Halt => {
                trace!(depth, "frame halted");
                Step::Exit(FrameExit::Halted)
            }
        };

        frame.pc = reader.pc();
        Ok(step)
    }

    /// Start the next iteration of `frame`'s pending repeat, or clear it
    /// once the count is used up. Every iteration is a watchdog step.
    fn next_iteration(&mut self, frame: &mut Frame) -> Result<Step, RuntimeError> {
        let Some(repeat) = frame.repeat.as_mut() else {
            return Ok(Step::Continue);
        };
        if let Some(remaining) = repeat.remaining.as_mut() {
            if *remaining == 0 {
                frame.repeat = None;
                return Ok(Step::Continue);
            }
            *remaining -= 1;
        }
        let block = Rc::clone(&repeat.block);
        self.watchdog.tick()?;
        Ok(Step::Enter(block))
    }

    fn take_block(&self, reader: &mut NibbleReader<'_>) -> Result<Program, RuntimeError> {
        reader.expect_open()?;
        extract_block(reader, self.limits.max_block_nibbles)
    }

    fn exec_resize(&mut self, bytes: usize) -> Result<(), RuntimeError> {
        if bytes > self.limits.max_tape_bytes {
            return Err(RuntimeError::TapeTooLarge {
                requested: bytes,
                limit: self.limits.max_tape_bytes,
            });
        }
        debug!(bytes, "resize tape");
        self.tape.resize(bytes)
    }
}
