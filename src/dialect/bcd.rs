//! BCDFuck: a nibble machine.
//!
//! Every source byte holds two instructions, high nibble first:
//!
//! ```text
//! 0-9  add the digit to the current nibble, then move right
//! A    move left
//! B C  loop open / close
//! D    read a nibble (high half of an input byte, then the low half)
//! E    write a nibble (two writes form one output byte)
//! F    swap the tape and the code bank
//! ```
//!
//! The code lives in its own bank, addressed in nibbles like the tape.
//! After `F` the program runs from what used to be the tape.

use tracing::trace;

use super::{Dialect, DialectKind, FrontEnd, Layout, Loaded, TapeOverride};
use crate::compiler::{
    check_structure, CodeBank, EndRule, LiveView, Op, OpSpec, OpTable, Operation, Program, LOOP,
};
use crate::core::{Addressing, BfError, BfResult, BoundsPolicy, CellStore, Memory};
use crate::vm::{core_step, EofPolicy, Flow, Machine, Ports};

const NIBBLE_OPS: [OpSpec; 16] = [
    OpSpec::single(0x0, Op::Ext(b'0')),
    OpSpec::single(0x1, Op::Ext(b'1')),
    OpSpec::single(0x2, Op::Ext(b'2')),
    OpSpec::single(0x3, Op::Ext(b'3')),
    OpSpec::single(0x4, Op::Ext(b'4')),
    OpSpec::single(0x5, Op::Ext(b'5')),
    OpSpec::single(0x6, Op::Ext(b'6')),
    OpSpec::single(0x7, Op::Ext(b'7')),
    OpSpec::single(0x8, Op::Ext(b'8')),
    OpSpec::single(0x9, Op::Ext(b'9')),
    OpSpec::single(0xA, Op::Left),
    OpSpec::single(0xB, Op::LoopStart),
    OpSpec::single(0xC, Op::LoopEnd),
    OpSpec::single(0xD, Op::Input),
    OpSpec::single(0xE, Op::Output),
    OpSpec::single(0xF, Op::Ext(b'F')),
];

/// Loop pair with printable tokens, for structure errors.
const LOOP_NAMES: OpTable = OpTable {
    specs: &[
        OpSpec::single(b'B', Op::LoopStart),
        OpSpec::single(b'C', Op::LoopEnd),
    ],
    pairs: &[LOOP],
    loop_break: None,
};

pub const BCD: Dialect = Dialect {
    kind: DialectKind::Bcd,
    name: "BCDFuck",
    table: OpTable {
        specs: &NIBBLE_OPS,
        pairs: &[LOOP],
        loop_break: None,
    },
    front_end: FrontEnd::Text,
    addressing: Addressing::Nibble,
    layout: Layout::CodeBank,
    tape: TapeOverride {
        width: Some(1),
        dynamic_cells: None,
        min_cells: None,
        cells_are_units: false,
    },
    step: bcd_step,
    finish: Some(bcd_finish),
    emit: None,
    emit_prelude: "",
};

/// Put the source in a code bank beside the tape.
///
/// The bank shares the tape's width and bounds policy. An empty source
/// gets an empty dynamic bank.
pub(crate) fn load(
    dialect: &Dialect,
    text: &[u8],
    mut tape: CellStore,
    data: &[u64],
    eof: EofPolicy,
) -> BfResult<Loaded> {
    let ops: Vec<(Op, usize)> = text
        .iter()
        .enumerate()
        .flat_map(|(offset, &byte)| {
            [
                (dialect.table.decode(byte >> 4), offset),
                (dialect.table.decode(byte & 0xF), offset),
            ]
        })
        .collect();
    check_structure(&ops, &LOOP_NAMES)?;

    let policy = if text.is_empty() {
        BoundsPolicy::Dynamic
    } else {
        tape.policy()
    };
    let mut code = CellStore::new(tape.width().bytes(), text.len() as i64, policy)?;
    let values: Vec<u64> = text.iter().map(|&b| b as u64).collect();
    code.load(0, &values)?;
    tape.load(0, data)?;

    let machine = Machine::new(Memory::with_code(tape, code), dialect.addressing, eof);
    let program = LiveView {
        bank: CodeBank::Code,
        addressing: dialect.addressing,
        table: dialect.table,
        end: EndRule::BankEnd,
    };
    Ok(Loaded {
        machine,
        program: Box::new(program),
    })
}

pub fn bcd_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    match operation.op {
        Op::Ext(digit @ b'0'..=b'9') => {
            let value = machine.current()?;
            machine.set_current(value + (digit - b'0') as u64)?;
            machine.cursor += 1;
        }
        Op::Ext(b'F') => {
            machine.memory.swap_banks();
            trace!(pc = machine.pc, "swapped tape and code");
        }
        Op::Input => read_nibble(machine, ports)?,
        Op::Output => {
            let nibble = machine.current()? as u8;
            match machine.nibble_out.take() {
                Some(high) => ports.write_byte(high << 4 | nibble)?,
                None => machine.nibble_out = Some(nibble),
            }
        }
        _ => return core_step(machine, program, ports, operation),
    }
    Ok(Flow::Next)
}

fn read_nibble(machine: &mut Machine, ports: &mut Ports) -> BfResult<()> {
    if let Some(low) = machine.nibble_in.take() {
        return machine.set_current(low as u64);
    }
    match ports.read_byte()? {
        Some(byte) => {
            machine.nibble_in = Some(byte & 0xF);
            machine.set_current((byte >> 4) as u64)
        }
        None => match machine.eof {
            EofPolicy::MinusOne => machine.set_current(machine.unit_max()),
            EofPolicy::Zero => machine.set_current(0),
            EofPolicy::Unchanged => Ok(()),
            EofPolicy::Abort => Err(BfError::Eof { pc: machine.pc }),
        },
    }
}

/// Emit a pending high nibble with a zero low half.
pub fn bcd_finish(machine: &mut Machine, ports: &mut Ports) -> BfResult<()> {
    if let Some(high) = machine.nibble_out.take() {
        ports.write_byte(high << 4)?;
    }
    Ok(())
}
