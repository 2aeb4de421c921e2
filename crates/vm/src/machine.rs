//! Interpreter state: the tape, the function slot, and run limits.

use std::rc::Rc;

use hextape_common::Program;

use crate::limits::Limits;
use crate::tape::BitTape;
use crate::watchdog::{CancelToken, Watchdog};

/// How a frame finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameExit {
    /// The frame ran off the end of its buffer.
    Ended,
    /// The frame executed `HALT`.
    Halted,
}

/// The hextape interpreter.
///
/// One interpreter owns one tape and one function slot. Both are shared by
/// every frame of a run. Frames live on a heap stack inside `execute`.
#[derive(Debug)]
pub struct Interpreter {
    /// The tape every frame operates on.
    pub(crate) tape: BitTape,
    /// The block stored by the most recent `DEF`.
    pub(crate) function: Option<Rc<Program>>,
    /// Run limits.
    pub(crate) limits: Limits,
    /// External cancellation, checked at every step.
    pub(crate) cancel: Option<CancelToken>,
    /// Budget tracking for the current run.
    pub(crate) watchdog: Watchdog,
}

impl Interpreter {
    /// Create an interpreter with an empty tape.
    pub fn new(limits: Limits) -> Self {
        let watchdog = Watchdog::new(&limits, None);
        Self {
            tape: BitTape::new(),
            function: None,
            limits,
            cancel: None,
            watchdog,
        }
    }

    /// Attach a cancel token checked at every step.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The tape, as left by the last run (including a failed one).
    pub fn tape(&self) -> &BitTape {
        &self.tape
    }

    /// Take ownership of the tape, leaving an empty one behind.
    pub fn take_tape(&mut self) -> BitTape {
        std::mem::take(&mut self.tape)
    }

    /// The currently stored function, if any.
    pub fn function(&self) -> Option<&Program> {
        self.function.as_deref()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Steps taken by the current or last run: dispatched opcodes plus
    /// `REPEAT` iterations.
    pub fn steps(&self) -> u64 {
        self.watchdog.steps()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}
