//! JumpFuck: labelled jumps keyed by cell value.
//!
//! `&` records the instruction after it under the current cell's value and
//! clears the cell. `%` looks up the current value (unknown values go to
//! the start of the program), copies the next cell into the current one
//! and jumps.

use super::{Dialect, DialectKind, FrontEnd, Layout, TapeOverride};
use crate::compiler::{Op, OpSpec, OpTable, Operation, Program, LOOP};
use crate::core::{Addressing, BfResult};
use crate::vm::{core_step, Flow, Machine, Ports};

const JUMP_OPS: [OpSpec; 10] = [
    OpSpec::folded(b'>', Op::Right),
    OpSpec::folded(b'<', Op::Left),
    OpSpec::folded(b'+', Op::Inc),
    OpSpec::folded(b'-', Op::Dec),
    OpSpec::single(b'.', Op::Output),
    OpSpec::single(b',', Op::Input),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
    OpSpec::single(b'&', Op::Ext(b'&')),
    OpSpec::single(b'%', Op::Ext(b'%')),
];

pub const JUMP: Dialect = Dialect {
    kind: DialectKind::Jump,
    name: "JumpFuck",
    table: OpTable {
        specs: &JUMP_OPS,
        pairs: &[LOOP],
        loop_break: None,
    },
    front_end: FrontEnd::Text,
    addressing: Addressing::Direct,
    layout: Layout::Snapshot { origin: 0, data_offset: 0 },
    tape: TapeOverride {
        width: None,
        dynamic_cells: Some(10000),
        min_cells: None,
        cells_are_units: false,
    },
    step: jump_step,
    finish: None,
    emit: None,
    emit_prelude: "",
};

pub fn jump_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    match operation.op {
        Op::Ext(b'&') => {
            let key = machine.current()?;
            machine.jump_points.insert(key, machine.pc + 1);
            machine.set_current(0)?;
            Ok(Flow::Next)
        }
        Op::Ext(b'%') => {
            let key = machine.current()?;
            let target = machine.jump_points.get(&key).copied().unwrap_or(0);
            let next = machine.cell(machine.cursor + 1)?;
            machine.set_current(next)?;
            Ok(Flow::Jump(target))
        }
        _ => core_step(machine, program, ports, operation),
    }
}
