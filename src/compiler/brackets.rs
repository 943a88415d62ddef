//! Matching-delimiter scans, run at branch time.
//!
//! Nothing is precomputed. A scan walks the program one operation at a time
//! counting nesting depth until it returns to zero, fetching through
//! [`Program::fetch`] so a live program is always read from current memory.
//! A scan that runs off the program (or, for live code, into a halt) means
//! the code has been mutated into an inconsistent shape.

use super::ast::{Delimiters, Op};
use super::program::Program;
use crate::core::{BfError, BfResult, Memory, ScanDirection};

/// Index of the closer matching the opener at `pc`.
pub fn match_forward(
    program: &dyn Program,
    memory: &mut Memory,
    pc: usize,
    pair: Delimiters,
) -> BfResult<usize> {
    let unmatched = || BfError::UnmatchedAtRuntime {
        pc,
        token: pair.open.token(),
        direction: ScanDirection::Forward,
    };
    let mut depth = 1usize;
    let mut at = pc;
    loop {
        at += 1;
        let op = match program.fetch(at, memory)? {
            Some(operation) => operation.op,
            None => return Err(unmatched()),
        };
        if op == pair.open {
            depth += 1;
        } else if op == pair.close {
            depth -= 1;
            if depth == 0 {
                return Ok(at);
            }
        } else if op == Op::Halt && program.is_live() {
            return Err(unmatched());
        }
    }
}

/// Index of the opener matching the closer at `pc`.
pub fn match_backward(
    program: &dyn Program,
    memory: &mut Memory,
    pc: usize,
    pair: Delimiters,
) -> BfResult<usize> {
    let unmatched = || BfError::UnmatchedAtRuntime {
        pc,
        token: pair.close.token(),
        direction: ScanDirection::Backward,
    };
    let mut depth = 1usize;
    let mut at = pc;
    loop {
        if at == 0 {
            return Err(unmatched());
        }
        at -= 1;
        let op = match program.fetch(at, memory)? {
            Some(operation) => operation.op,
            None => return Err(unmatched()),
        };
        if op == pair.close {
            depth += 1;
        } else if op == pair.open {
            depth -= 1;
            if depth == 0 {
                return Ok(at);
            }
        }
    }
}

/// Index of the closer of the innermost loop enclosing `pc`, of any of
/// `pairs`. Loops opened after `pc` are stepped over whole.
pub fn match_enclosing(
    program: &dyn Program,
    memory: &mut Memory,
    pc: usize,
    pairs: &[Delimiters],
) -> BfResult<usize> {
    let unmatched = || BfError::UnmatchedAtRuntime {
        pc,
        token: pairs.first().map(|p| p.close.token()).unwrap_or('?'),
        direction: ScanDirection::Forward,
    };
    let mut depth = 0usize;
    let mut at = pc;
    loop {
        at += 1;
        let op = match program.fetch(at, memory)? {
            Some(operation) => operation.op,
            None => return Err(unmatched()),
        };
        if pairs.iter().any(|p| p.open == op) {
            depth += 1;
        } else if pairs.iter().any(|p| p.close == op) {
            if depth == 0 {
                return Ok(at);
            }
            depth -= 1;
        } else if op == Op::Halt && program.is_live() {
            return Err(unmatched());
        }
    }
}
