//! Executable programs.
//!
//! A [`Program`] hands out the [`Operation`] at a program counter. Two
//! implementations exist:
//!
//! - [`Snapshot`]: an immutable list built once by the translator
//! - [`LiveView`]: decodes operations from memory on every fetch, so a
//!   program that writes to its own code sees the change on the next fetch
//!
//! Fetching takes `&mut Memory` because a live fetch goes through the cell
//! store's bounds policy, which may grow the tape.

use std::fmt;

use super::ast::{OpTable, Operation};
use crate::core::{Addressing, BfError, BfResult, Memory};

/// Source of operations for the interpreter and the emitter.
pub trait Program: fmt::Debug {
    /// Operation at `pc`, or `None` once `pc` is past the end.
    fn fetch(&self, pc: usize, memory: &mut Memory) -> BfResult<Option<Operation>>;

    /// The full operation list, if the program is immutable.
    fn as_snapshot(&self) -> Option<&Snapshot> {
        None
    }

    /// Whether the code lives in machine memory.
    fn is_live(&self) -> bool {
        false
    }
}

/// Translated, compressed program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    ops: Vec<Operation>,
}

impl Snapshot {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Program for Snapshot {
    fn fetch(&self, pc: usize, _memory: &mut Memory) -> BfResult<Option<Operation>> {
        Ok(self.ops.get(pc).copied())
    }

    fn as_snapshot(&self) -> Option<&Snapshot> {
        Some(self)
    }
}

/// Which bank a live program decodes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeBank {
    Tape,
    Code,
}

/// Where a live program ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndRule {
    /// A zero unit ends the program. Fetches past the bank follow its policy.
    ZeroHalts,
    /// The program ends at the last unit of the bank.
    BankEnd,
}

/// Program decoded from memory on demand.
#[derive(Debug, Clone, Copy)]
pub struct LiveView {
    pub bank: CodeBank,
    pub addressing: Addressing,
    /// Maps a decoded unit's low byte to an opcode.
    pub table: OpTable,
    pub end: EndRule,
}

impl Program for LiveView {
    fn fetch(&self, pc: usize, memory: &mut Memory) -> BfResult<Option<Operation>> {
        let store = match self.bank {
            CodeBank::Tape => &mut memory.tape,
            CodeBank::Code => memory.code.as_mut().ok_or_else(|| BfError::Config {
                message: "live program reads a code bank the machine does not have".into(),
            })?,
        };

        if self.end == EndRule::BankEnd && pc >= store.len() * self.addressing.units_per_cell() {
            return Ok(None);
        }

        let unit = self.addressing.fetch(store, pc as i64)?;
        if self.end == EndRule::ZeroHalts && unit == 0 {
            return Ok(None);
        }
        Ok(Some(Operation::new(self.table.decode(unit as u8))))
    }

    fn is_live(&self) -> bool {
        true
    }
}
