//! Brainlove.
//!
//! Classic Brainfuck plus:
//!
//! ```text
//! (   enter if the cell is zero, skip past `)` otherwise
//! )   jump back past `(` while the cell is zero
//! ~   leave the innermost loop of either kind
//! $   storage = cell
//! !   cell = storage
//! ```
//!
//! `~` outside any loop is rejected when translating.

use super::{Dialect, DialectKind, FrontEnd, Layout, TapeOverride};
use crate::aot::{core_emit, CEmitter};
use crate::compiler::{
    match_backward, match_enclosing, match_forward, Delimiters, Op, OpSpec, OpTable, Operation,
    Program, LOOP,
};
use crate::core::{Addressing, BfResult};
use crate::vm::{core_step, Flow, Machine, Ports};

const PARENS: Delimiters = Delimiters {
    open: Op::Ext(b'('),
    close: Op::Ext(b')'),
};

const LOVE_OPS: [OpSpec; 13] = [
    OpSpec::folded(b'>', Op::Right),
    OpSpec::folded(b'<', Op::Left),
    OpSpec::folded(b'+', Op::Inc),
    OpSpec::folded(b'-', Op::Dec),
    OpSpec::single(b'.', Op::Output),
    OpSpec::single(b',', Op::Input),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
    OpSpec::single(b'(', Op::Ext(b'(')),
    OpSpec::single(b')', Op::Ext(b')')),
    OpSpec::single(b'~', Op::Ext(b'~')),
    OpSpec::single(b'$', Op::Ext(b'$')),
    OpSpec::single(b'!', Op::Ext(b'!')),
];

pub const LOVE: Dialect = Dialect {
    kind: DialectKind::Love,
    name: "Brainlove",
    table: OpTable {
        specs: &LOVE_OPS,
        pairs: &[LOOP, PARENS],
        loop_break: Some(Op::Ext(b'~')),
    },
    front_end: FrontEnd::Text,
    addressing: Addressing::Direct,
    layout: Layout::Snapshot { origin: 0, data_offset: 0 },
    tape: TapeOverride {
        width: None,
        dynamic_cells: None,
        min_cells: None,
        cells_are_units: false,
    },
    step: love_step,
    finish: None,
    emit: Some(love_emit),
    emit_prelude: "static cell_t storage;",
};

pub fn love_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let pc = machine.pc;
    match operation.op {
        Op::Ext(b'(') if machine.current()? != 0 => {
            let close = match_forward(program, &mut machine.memory, pc, PARENS)?;
            Ok(Flow::Jump(close + 1))
        }
        Op::Ext(b')') if machine.current()? == 0 => {
            let open = match_backward(program, &mut machine.memory, pc, PARENS)?;
            Ok(Flow::Jump(open + 1))
        }
        Op::Ext(b'~') => {
            let exit = match_enclosing(program, &mut machine.memory, pc, &[LOOP, PARENS])?;
            Ok(Flow::Jump(exit + 1))
        }
        Op::Ext(b'$') => {
            machine.storage = machine.current()?;
            Ok(Flow::Next)
        }
        Op::Ext(b'!') => {
            machine.set_current(machine.storage)?;
            Ok(Flow::Next)
        }
        _ => core_step(machine, program, ports, operation),
    }
}

pub fn love_emit(e: &mut CEmitter, operation: &Operation) -> BfResult<()> {
    match operation.op {
        Op::Ext(b'(') => e.open_block("while (!get(index)) {"),
        Op::Ext(b')') => e.close_block(),
        Op::Ext(b'~') => e.line("break;"),
        Op::Ext(b'$') => e.line("storage = get(index);"),
        Op::Ext(b'!') => e.line("put(index, storage);"),
        _ => return core_emit(e, operation),
    }
    Ok(())
}
