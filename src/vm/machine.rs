//! Machine state and the classic step function.
//!
//! # Architecture
//!
//! ```text
//! Interpreter ── fetch(pc) ──► Program (Snapshot | LiveView)
//!      │
//!      └── StepHook(machine, program, ports, operation) ──► Flow
//!                 │
//!                 └── core_step for anything the dialect does not add
//! ```
//!
//! The machine owns its memory exclusively. Every cell access goes through
//! the machine's [`Addressing`] and then the cell store's bounds policy.

use std::collections::HashMap;

use tracing::trace;

use super::ports::{EofPolicy, Ports};
use crate::compiler::{match_backward, match_forward, Op, Operation, Program, LOOP};
use crate::core::{Addressing, BfError, BfResult, Memory, MemoryOperation};

/// What the interpreter does after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to `pc + 1`.
    Next,
    /// Continue at the given program counter.
    Jump(usize),
    /// Stop.
    Halt,
}

/// Behaviour of one operation.
pub type StepHook = fn(&mut Machine, &dyn Program, &mut Ports, Operation) -> BfResult<Flow>;

/// Runs once when the machine halts normally.
pub type FinishHook = fn(&mut Machine, &mut Ports) -> BfResult<()>;

/// Tape machine state.
#[derive(Debug, Clone)]
pub struct Machine {
    pub memory: Memory,
    pub addressing: Addressing,
    /// Current cell, in logical units of `addressing`.
    pub cursor: i64,
    /// Index of the next operation.
    pub pc: usize,
    pub eof: EofPolicy,
    /// Storage register (Extended Type I, Brainlove).
    pub storage: u64,
    /// Storage cell index (Extended Type II).
    pub storage_pos: i64,
    /// Jump targets keyed by cell value (JumpFuck).
    pub jump_points: HashMap<u64, usize>,
    /// Pending low-nibble input (BCDFuck).
    pub nibble_in: Option<u8>,
    /// Pending high-nibble output (BCDFuck).
    pub nibble_out: Option<u8>,
    /// Auxiliary cell stack, top last (Stacked, Dollar).
    pub stack: Vec<u64>,
    /// Iterations left in each open repeat block, innermost last (Dollar).
    pub counters: Vec<u64>,
}

impl Machine {
    pub fn new(memory: Memory, addressing: Addressing, eof: EofPolicy) -> Self {
        Self {
            memory,
            addressing,
            cursor: 0,
            pc: 0,
            eof,
            storage: 0,
            storage_pos: 0,
            jump_points: HashMap::new(),
            nibble_in: None,
            nibble_out: None,
            stack: Vec::new(),
            counters: Vec::new(),
        }
    }

    /// Start with the cursor at `origin`.
    pub fn with_cursor(mut self, origin: i64) -> Self {
        self.cursor = origin;
        self
    }

    /// Start executing at `entry`.
    pub fn with_entry(mut self, entry: usize) -> Self {
        self.pc = entry;
        self
    }

    /// Seed the cell stack; the last value ends up on top.
    pub fn with_stack(mut self, values: Vec<u64>) -> Self {
        self.stack = values;
        self
    }

    /// Top of the cell stack, 0 when it is empty.
    pub fn peek_stack(&self) -> u64 {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Pop the cell stack, 0 when it is empty.
    pub fn pop_stack(&mut self) -> u64 {
        self.stack.pop().unwrap_or(0)
    }

    /// Largest value one addressed unit holds.
    pub fn unit_max(&self) -> u64 {
        self.addressing.unit_max(self.memory.tape.width().mask())
    }

    /// Read the unit at `index`.
    pub fn cell(&mut self, index: i64) -> BfResult<u64> {
        self.addressing.read(&mut self.memory.tape, index)
    }

    /// Write the unit at `index`; the value is truncated to the unit.
    pub fn set_cell(&mut self, index: i64, value: u64) -> BfResult<()> {
        self.addressing.write(&mut self.memory.tape, index, value)
    }

    pub fn current(&mut self) -> BfResult<u64> {
        self.cell(self.cursor)
    }

    pub fn set_current(&mut self, value: u64) -> BfResult<()> {
        self.set_cell(self.cursor, value)
    }

    /// Read one byte of input into the current cell under the EOF policy.
    pub fn input_current(&mut self, ports: &mut Ports) -> BfResult<()> {
        let value = match ports.read_byte()? {
            Some(byte) => byte as u64,
            None => self.eof_value()?,
        };
        self.set_current(value)
    }

    /// What input stores in the current cell once the input is exhausted.
    pub fn eof_value(&mut self) -> BfResult<u64> {
        match self.eof {
            EofPolicy::MinusOne => Ok(u64::MAX),
            EofPolicy::Zero => Ok(0),
            EofPolicy::Unchanged => self.current(),
            EofPolicy::Abort => Err(BfError::Eof { pc: self.pc }),
        }
    }

    /// Convert a cell-derived target into a program counter.
    pub fn jump_target(&self, target: i64) -> BfResult<usize> {
        usize::try_from(target).map_err(|_| BfError::NegativeAddress {
            index: target,
            operation: MemoryOperation::Fetch,
        })
    }
}

/// Semantics of the eight classic opcodes plus halt.
///
/// Dialect hooks fall back to this for every opcode they do not redefine.
/// Unknown `Ext` opcodes and `Nop` do nothing.
pub fn core_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let n = operation.repeat;
    match operation.op {
        Op::Right => machine.cursor = machine.cursor.wrapping_add(n as i64),
        Op::Left => machine.cursor = machine.cursor.wrapping_sub(n as i64),
        Op::Inc => {
            let v = machine.current()?;
            machine.set_current(v.wrapping_add(n))?;
        }
        Op::Dec => {
            let v = machine.current()?;
            machine.set_current(v.wrapping_sub(n))?;
        }
        Op::Output => {
            for _ in 0..n {
                let v = machine.current()?;
                ports.write_byte(v as u8)?;
            }
        }
        Op::Input => {
            for _ in 0..n {
                machine.input_current(ports)?;
            }
        }
        Op::LoopStart => {
            if machine.current()? == 0 {
                let close = match_forward(program, &mut machine.memory, machine.pc, LOOP)?;
                trace!(from = machine.pc, to = close + 1, "skip loop");
                return Ok(Flow::Jump(close + 1));
            }
        }
        Op::LoopEnd => {
            if machine.current()? != 0 {
                let open = match_backward(program, &mut machine.memory, machine.pc, LOOP)?;
                return Ok(Flow::Jump(open + 1));
            }
        }
        Op::Halt => return Ok(Flow::Halt),
        Op::Nop | Op::Ext(_) => {}
    }
    Ok(Flow::Next)
}
