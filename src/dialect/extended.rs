//! Extended Brainfuck Type I.
//!
//! Adds a storage register and bitwise operations on top of the classic
//! eight:
//!
//! ```text
//! @   halt                 $   storage = cell        !   cell = storage
//! {   cell <<= 1 (folds)   }   cell >>= 1 (folds)    ~   cell = !cell
//! ^   cell ^= storage      &   cell &= storage       |   cell |= storage
//! ```
//!
//! The tape is always dynamic, starting at 10000 cells.

use super::{Dialect, DialectKind, FrontEnd, Layout, TapeOverride};
use crate::aot::{core_emit, CEmitter};
use crate::compiler::{Op, OpSpec, OpTable, Operation, Program, LOOP};
use crate::core::BfResult;
use crate::vm::{core_step, Flow, Machine, Ports};

pub(crate) const EXTENDED_OPS: [OpSpec; 17] = [
    OpSpec::folded(b'>', Op::Right),
    OpSpec::folded(b'<', Op::Left),
    OpSpec::folded(b'+', Op::Inc),
    OpSpec::folded(b'-', Op::Dec),
    OpSpec::single(b'.', Op::Output),
    OpSpec::single(b',', Op::Input),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
    OpSpec::single(b'@', Op::Halt),
    OpSpec::single(b'$', Op::Ext(b'$')),
    OpSpec::single(b'!', Op::Ext(b'!')),
    OpSpec::folded(b'{', Op::Ext(b'{')),
    OpSpec::folded(b'}', Op::Ext(b'}')),
    OpSpec::single(b'~', Op::Ext(b'~')),
    OpSpec::single(b'^', Op::Ext(b'^')),
    OpSpec::single(b'&', Op::Ext(b'&')),
    OpSpec::single(b'|', Op::Ext(b'|')),
];

pub const EXTENDED: Dialect = Dialect {
    kind: DialectKind::Extended,
    name: "Extended Brainfuck Type I",
    table: OpTable {
        specs: &EXTENDED_OPS,
        pairs: &[LOOP],
        loop_break: None,
    },
    front_end: FrontEnd::Text,
    addressing: crate::core::Addressing::Direct,
    layout: Layout::Snapshot { origin: 0, data_offset: 0 },
    tape: TapeOverride {
        width: None,
        dynamic_cells: Some(10000),
        min_cells: None,
        cells_are_units: false,
    },
    step: extended_step,
    finish: None,
    emit: Some(extended_emit),
    emit_prelude: "static cell_t storage;",
};

pub fn extended_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let Op::Ext(token) = operation.op else {
        return core_step(machine, program, ports, operation);
    };
    let n = operation.repeat;
    let cell = machine.current()?;
    let value = match token {
        b'$' => {
            machine.storage = cell;
            return Ok(Flow::Next);
        }
        b'!' => machine.storage,
        b'{' => cell.checked_shl(n as u32).filter(|_| n < 64).unwrap_or(0),
        b'}' => cell.checked_shr(n as u32).filter(|_| n < 64).unwrap_or(0),
        b'~' => !cell,
        b'^' => cell ^ machine.storage,
        b'&' => cell & machine.storage,
        b'|' => cell | machine.storage,
        _ => return Ok(Flow::Next),
    };
    machine.set_current(value)?;
    Ok(Flow::Next)
}

pub fn extended_emit(e: &mut CEmitter, operation: &Operation) -> BfResult<()> {
    let Op::Ext(token) = operation.op else {
        return core_emit(e, operation);
    };
    let n = operation.repeat;
    match token {
        b'$' => e.line("storage = get(index);"),
        b'!' => e.line("put(index, storage);"),
        b'{' | b'}' if n >= e.cell_bits() => {
            e.line("(void)get(index);");
            e.line("put(index, 0);");
        }
        b'{' => e.line(&format!("put(index, (cell_t)(get(index) << {}));", n)),
        b'}' => e.line(&format!("put(index, (cell_t)(get(index) >> {}));", n)),
        b'~' => e.line("put(index, (cell_t)~get(index));"),
        b'^' => e.line("put(index, (cell_t)(get(index) ^ storage));"),
        b'&' => e.line("put(index, (cell_t)(get(index) & storage));"),
        b'|' => e.line("put(index, (cell_t)(get(index) | storage));"),
        _ => return Err(e.unsupported()),
    }
    Ok(())
}
