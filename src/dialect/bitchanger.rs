//! Bitchanger: a one-bit machine with memory-mapped I/O.
//!
//! Three opcodes over a bit-addressed tape: `<` moves left (folds), `}`
//! flips the current bit and moves right, `[`/`]` loop on the current bit.
//!
//! Bytes 0 and 1 are the I/O registers. After every operation, if bit 5 is
//! set the machine either writes byte 1 (bit 7 set) or reads a byte into
//! byte 1 and sets bit 6 when it was 0xFF (end of input reads as 0xFF).
//! Bit 5 is then cleared. The cursor starts at bit 16, the first bit past
//! the registers, and preloaded data starts at byte 2.

use super::{Dialect, DialectKind, FrontEnd, Layout, TapeOverride};
use crate::compiler::{Op, OpSpec, OpTable, Operation, Program, LOOP};
use crate::core::{Addressing, BfResult};
use crate::vm::{core_step, Flow, Machine, Ports};

const BITCHANGER_OPS: [OpSpec; 4] = [
    OpSpec::folded(b'<', Op::Left),
    OpSpec::single(b'}', Op::Ext(b'}')),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
];

const IO_REQUEST: i64 = 5;
const IO_EOF: i64 = 6;
const IO_WRITE: i64 = 7;
const IO_BYTE: i64 = 1;

pub const BITCHANGER: Dialect = Dialect {
    kind: DialectKind::Bitchanger,
    name: "Bitchanger",
    table: OpTable {
        specs: &BITCHANGER_OPS,
        pairs: &[LOOP],
        loop_break: None,
    },
    front_end: FrontEnd::Text,
    addressing: Addressing::Bit,
    layout: Layout::Snapshot { origin: 16, data_offset: 2 },
    tape: TapeOverride {
        width: Some(1),
        dynamic_cells: None,
        min_cells: Some(16),
        cells_are_units: true,
    },
    step: bitchanger_step,
    finish: None,
    emit: None,
    emit_prelude: "",
};

pub fn bitchanger_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let flow = match operation.op {
        Op::Ext(b'}') => {
            let bit = machine.current()?;
            machine.set_current(bit ^ 1)?;
            machine.cursor = machine.cursor.wrapping_add(1);
            Flow::Next
        }
        _ => core_step(machine, program, ports, operation)?,
    };
    service_io(machine, ports)?;
    Ok(flow)
}

fn service_io(machine: &mut Machine, ports: &mut Ports) -> BfResult<()> {
    if machine.cell(IO_REQUEST)? == 0 {
        return Ok(());
    }
    if machine.cell(IO_WRITE)? != 0 {
        let byte = machine.memory.tape.read(IO_BYTE)?.low_byte();
        ports.write_byte(byte)?;
    } else {
        let byte = ports.read_byte()?.unwrap_or(0xFF);
        machine.set_cell(IO_EOF, (byte == 0xFF) as u64)?;
        machine.memory.tape.write(IO_BYTE, byte as u64)?;
    }
    machine.set_cell(IO_REQUEST, 0)
}
