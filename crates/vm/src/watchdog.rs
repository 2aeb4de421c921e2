//! Cancellation points for runs that may never end on their own.
//!
//! `REPEAT 0` loops forever unless its body halts, so every dispatched
//! opcode passes through [`Watchdog::tick`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::RuntimeError;
use crate::limits::Limits;

/// How many ticks pass between wall-clock reads.
const CLOCK_INTERVAL: u64 = 1_024;

/// A flag shared with whoever may want to stop a run (a signal handler,
/// another thread, a test).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops at its next tick.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Step, deadline, and cancel-token checks for one run.
#[derive(Debug)]
pub struct Watchdog {
    steps: u64,
    max_steps: Option<u64>,
    timeout: Option<Duration>,
    started: Instant,
    cancel: Option<CancelToken>,
}

impl Watchdog {
    pub fn new(limits: &Limits, cancel: Option<CancelToken>) -> Self {
        Self {
            steps: 0,
            max_steps: limits.max_steps,
            timeout: limits.timeout,
            started: Instant::now(),
            cancel,
        }
    }

    /// Steps counted so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Count one step and fail if any budget is spent.
    pub fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;

        if let Some(limit) = self.max_steps {
            if self.steps > limit {
                return Err(RuntimeError::StepLimitExceeded { limit });
            }
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(RuntimeError::Cancelled);
        }
        if let Some(timeout) = self.timeout {
            if self.steps % CLOCK_INTERVAL == 0 && self.started.elapsed() >= timeout {
                return Err(RuntimeError::DeadlineExceeded { timeout });
            }
        }
        Ok(())
    }
}
