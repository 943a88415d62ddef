//! Operation model shared by every dialect.
//!
//! A dialect's alphabet is an [`OpTable`]: a list of [`OpSpec`] rows mapping
//! a source token to an [`Op`], with a per-row flag for run-length
//! compression, plus the delimiter pairs the translator must balance.

use std::fmt;

/// One executable opcode.
///
/// The eight classic opcodes have their own variants; anything a dialect
/// adds on top is carried as `Ext` with its source token, and is given
/// meaning by the dialect's step and emit hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Move the cursor forward.
    Right,
    /// Move the cursor backward.
    Left,
    /// Increment the current cell.
    Inc,
    /// Decrement the current cell.
    Dec,
    /// Write the current cell's low byte to the output sink.
    Output,
    /// Read one byte into the current cell.
    Input,
    /// Skip past the matching `LoopEnd` if the current cell is zero.
    LoopStart,
    /// Jump back past the matching `LoopStart` if the current cell is non-zero.
    LoopEnd,
    /// Stop the machine.
    Halt,
    /// Decoded from live code that is not an opcode; does nothing.
    Nop,
    /// Dialect-specific opcode, identified by its token.
    Ext(u8),
}

impl Op {
    /// Printable token used in previews and error messages.
    pub fn token(self) -> char {
        match self {
            Op::Right => '>',
            Op::Left => '<',
            Op::Inc => '+',
            Op::Dec => '-',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopStart => '[',
            Op::LoopEnd => ']',
            Op::Halt => '@',
            Op::Nop => ' ',
            Op::Ext(t) => t as char,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// An opcode with its repeat count.
///
/// A repeat count of N means "run the single-step form N times".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub op: Op,
    pub repeat: u64,
}

impl Operation {
    pub fn new(op: Op) -> Self {
        Self { op, repeat: 1 }
    }

    pub fn repeated(op: Op, repeat: u64) -> Self {
        Self { op, repeat }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        if self.repeat > 1 {
            write!(f, " x{}", self.repeat)?;
        }
        Ok(())
    }
}

/// One row of a dialect's opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSpec {
    pub token: u8,
    pub op: Op,
    /// Consecutive occurrences fold into one operation with a repeat count.
    pub compressible: bool,
}

impl OpSpec {
    pub const fn single(token: u8, op: Op) -> Self {
        Self { token, op, compressible: false }
    }

    pub const fn folded(token: u8, op: Op) -> Self {
        Self { token, op, compressible: true }
    }
}

/// An opener/closer pair the translator keeps balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: Op,
    pub close: Op,
}

/// A dialect's full alphabet.
#[derive(Debug, Clone, Copy)]
pub struct OpTable {
    pub specs: &'static [OpSpec],
    pub pairs: &'static [Delimiters],
    /// Opcode that is only legal inside one of `pairs`.
    pub loop_break: Option<Op>,
}

impl OpTable {
    /// Find the row for a source token.
    pub fn lookup(&self, token: u8) -> Option<&OpSpec> {
        self.specs.iter().find(|s| s.token == token)
    }

    /// Source token for an opcode, if the table has one.
    pub fn token_of(&self, op: Op) -> Option<u8> {
        self.specs.iter().find(|s| s.op == op).map(|s| s.token)
    }

    /// Decode a token to an opcode; anything outside the table is a no-op.
    pub fn decode(&self, token: u8) -> Op {
        self.lookup(token).map(|s| s.op).unwrap_or(Op::Nop)
    }
}

/// The eight classic opcodes.
pub const CLASSIC_OPS: [OpSpec; 8] = [
    OpSpec::folded(b'>', Op::Right),
    OpSpec::folded(b'<', Op::Left),
    OpSpec::folded(b'+', Op::Inc),
    OpSpec::folded(b'-', Op::Dec),
    OpSpec::single(b'.', Op::Output),
    OpSpec::single(b',', Op::Input),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
];

/// The classic loop pair.
pub const LOOP: Delimiters = Delimiters { open: Op::LoopStart, close: Op::LoopEnd };

/// Plain Brainfuck.
pub const BRAINFUCK: OpTable = OpTable {
    specs: &CLASSIC_OPS,
    pairs: &[LOOP],
    loop_break: None,
};
