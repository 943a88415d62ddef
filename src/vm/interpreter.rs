//! The step loop.
//!
//! The interpreter fetches the operation at the program counter, hands it
//! to the dialect's step hook and moves the program counter according to
//! the returned [`Flow`]. It stops when the program runs out, a halt opcode
//! executes, an error is raised, or an external owner sets the pause token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, trace};

use super::machine::{core_step, FinishHook, Flow, Machine, StepHook};
use super::ports::Ports;
use crate::compiler::{Operation, Program};
use crate::core::{BfError, BfResult};

/// Shared flag an external owner sets to pause a running interpreter.
///
/// The interpreter polls it between steps. Cloning shares the flag, so a
/// signal handler or another thread can hold one clone.
#[derive(Debug, Clone, Default)]
pub struct PauseToken(Arc<AtomicBool>);

impl PauseToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    Halted,
}

/// Why [`Interpreter::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Halted,
    Paused,
}

/// Executes a program against a machine.
pub struct Interpreter {
    machine: Machine,
    program: Box<dyn Program>,
    ports: Ports,
    step_hook: StepHook,
    finish_hook: Option<FinishHook>,
    pause: Option<PauseToken>,
    max_steps: Option<u64>,
    steps: u64,
    halted: bool,
}

impl Interpreter {
    pub fn new(machine: Machine, program: Box<dyn Program>, ports: Ports) -> Self {
        Self {
            machine,
            program,
            ports,
            step_hook: core_step,
            finish_hook: None,
            pause: None,
            max_steps: None,
            steps: 0,
            halted: false,
        }
    }

    pub fn with_step_hook(mut self, hook: StepHook) -> Self {
        self.step_hook = hook;
        self
    }

    pub fn with_finish_hook(mut self, hook: Option<FinishHook>) -> Self {
        self.finish_hook = hook;
        self
    }

    pub fn with_pause_token(mut self, token: PauseToken) -> Self {
        self.pause = Some(token);
        self
    }

    pub fn with_max_steps(mut self, limit: Option<u64>) -> Self {
        self.max_steps = limit;
        self
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn program(&self) -> &dyn Program {
        self.program.as_ref()
    }

    pub fn pause_token(&self) -> Option<&PauseToken> {
        self.pause.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Read a cell by logical index.
    pub fn cell(&mut self, index: i64) -> BfResult<u64> {
        self.machine.cell(index)
    }

    /// Write a cell by logical index.
    pub fn set_cell(&mut self, index: i64, value: u64) -> BfResult<()> {
        self.machine.set_cell(index, value)
    }

    /// The operation the next step will execute, without executing it.
    pub fn peek_next(&mut self) -> BfResult<Option<Operation>> {
        self.program.fetch(self.machine.pc, &mut self.machine.memory)
    }

    /// Execute one operation.
    pub fn step(&mut self) -> BfResult<StepOutcome> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }
        if let Some(limit) = self.max_steps {
            if self.steps >= limit {
                return Err(BfError::StepLimitExceeded { limit });
            }
        }

        let pc = self.machine.pc;
        let Some(operation) = self.program.fetch(pc, &mut self.machine.memory)? else {
            self.finish()?;
            return Ok(StepOutcome::Halted);
        };
        trace!(pc, cursor = self.machine.cursor, op = %operation, "step");

        let flow = (self.step_hook)(
            &mut self.machine,
            self.program.as_ref(),
            &mut self.ports,
            operation,
        )?;
        self.steps += 1;

        match flow {
            Flow::Next => self.machine.pc = pc + 1,
            Flow::Jump(target) => self.machine.pc = target,
            Flow::Halt => {
                self.finish()?;
                return Ok(StepOutcome::Halted);
            }
        }
        Ok(StepOutcome::Running)
    }

    /// Run until halt or pause.
    ///
    /// On error, output written so far is flushed before the error returns.
    pub fn run(&mut self) -> BfResult<RunStatus> {
        loop {
            if self.pause.as_ref().is_some_and(PauseToken::is_paused) {
                self.ports.flush()?;
                info!(pc = self.machine.pc, steps = self.steps, "paused");
                return Ok(RunStatus::Paused);
            }
            match self.step() {
                Ok(StepOutcome::Running) => {}
                Ok(StepOutcome::Halted) => return Ok(RunStatus::Halted),
                Err(e) => {
                    // The original error matters more than a failed flush
                    let _ = self.ports.flush();
                    return Err(e);
                }
            }
        }
    }

    fn finish(&mut self) -> BfResult<()> {
        self.halted = true;
        if let Some(hook) = self.finish_hook {
            hook(&mut self.machine, &mut self.ports)?;
        }
        self.ports.flush()?;
        info!(
            steps = self.steps,
            pc = self.machine.pc,
            cursor = self.machine.cursor,
            "halted"
        );
        Ok(())
    }
}
