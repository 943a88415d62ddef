//! Structural validation of a token stream before anything runs.
//!
//! All delimiter pairs in the dialect's table share one stack, so pairs
//! must nest inside each other: a closer that does not match the innermost
//! open delimiter, or an opener left unclosed at the end, is rejected. A
//! loop-break opcode must sit inside at least one open pair.

use super::ast::{Op, OpTable};
use crate::core::{BfError, BfResult};

/// Validate decoded opcodes with their source offsets.
pub fn check_structure(ops: &[(Op, usize)], table: &OpTable) -> BfResult<()> {
    // (pair index, offset of the opener)
    let mut open: Vec<(usize, usize)> = Vec::new();

    for &(op, offset) in ops {
        for (i, pair) in table.pairs.iter().enumerate() {
            if op == pair.open {
                open.push((i, offset));
            } else if op == pair.close {
                match open.pop() {
                    Some((top, _)) if top == i => {}
                    _ => return Err(unbalanced(table, i, offset)),
                }
            }
        }
        if Some(op) == table.loop_break && open.is_empty() {
            return Err(BfError::BreakOutsideLoop { offset });
        }
    }

    match open.last() {
        Some(&(i, offset)) => Err(unbalanced(table, i, offset)),
        None => Ok(()),
    }
}

fn unbalanced(table: &OpTable, pair: usize, offset: usize) -> BfError {
    let delims = table.pairs[pair];
    let char_of = |op: Op| table.token_of(op).map(|t| t as char).unwrap_or_else(|| op.token());
    BfError::Unbalanced {
        open: char_of(delims.open),
        close: char_of(delims.close),
        offset,
    }
}
