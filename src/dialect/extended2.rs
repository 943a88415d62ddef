//! Extended Brainfuck Type II.
//!
//! Code, storage and data share one tape:
//!
//! ```text
//! cell 0      storage
//! cell 1..    code, up to and including `@`
//! after `@`   data literal from the source, then the cursor starts here
//! ```
//!
//! The program is a live view, so the code can be rewritten at run time.
//! Besides the Type I opcodes (unfolded), it adds `?` (continue at the
//! instruction the cursor points to), `(`/`)` (shift the tape left/right
//! from the cursor) and arithmetic against the storage cell.

use super::{Dialect, DialectKind, FrontEnd, Layout, Loaded, TapeOverride};
use crate::compiler::{
    check_structure, parse_data, CodeBank, EndRule, LiveView, Op, OpSpec, OpTable, Operation,
    Program, LOOP,
};
use crate::core::{Addressing, BfError, BfResult, CellStore, Memory};
use crate::vm::{core_step, EofPolicy, Flow, Machine, Ports};

const EXTENDED2_OPS: [OpSpec; 25] = [
    OpSpec::single(b'>', Op::Right),
    OpSpec::single(b'<', Op::Left),
    OpSpec::single(b'+', Op::Inc),
    OpSpec::single(b'-', Op::Dec),
    OpSpec::single(b'.', Op::Output),
    OpSpec::single(b',', Op::Input),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
    OpSpec::single(b'@', Op::Halt),
    OpSpec::single(b'$', Op::Ext(b'$')),
    OpSpec::single(b'!', Op::Ext(b'!')),
    OpSpec::single(b'{', Op::Ext(b'{')),
    OpSpec::single(b'}', Op::Ext(b'}')),
    OpSpec::single(b'~', Op::Ext(b'~')),
    OpSpec::single(b'^', Op::Ext(b'^')),
    OpSpec::single(b'&', Op::Ext(b'&')),
    OpSpec::single(b'|', Op::Ext(b'|')),
    OpSpec::single(b'?', Op::Ext(b'?')),
    OpSpec::single(b'(', Op::Ext(b'(')),
    OpSpec::single(b')', Op::Ext(b')')),
    OpSpec::single(b'*', Op::Ext(b'*')),
    OpSpec::single(b'/', Op::Ext(b'/')),
    OpSpec::single(b'=', Op::Ext(b'=')),
    OpSpec::single(b'_', Op::Ext(b'_')),
    OpSpec::single(b'%', Op::Ext(b'%')),
];

pub const EXTENDED2: Dialect = Dialect {
    kind: DialectKind::Extended2,
    name: "Extended Brainfuck Type II",
    table: OpTable {
        specs: &EXTENDED2_OPS,
        pairs: &[LOOP],
        loop_break: None,
    },
    front_end: FrontEnd::Text,
    addressing: Addressing::Direct,
    layout: Layout::CodeAfterStorage,
    tape: TapeOverride {
        width: None,
        dynamic_cells: Some(10000),
        min_cells: None,
        cells_are_units: false,
    },
    step: extended2_step,
    finish: None,
    emit: None,
    emit_prelude: "",
};

/// First cell of the code.
const CODE_START: i64 = 1;

/// Split the source into code and the trailing data literal, then lay both
/// out on the tape.
pub(crate) fn load(
    dialect: &Dialect,
    text: &[u8],
    mut tape: CellStore,
    data: &[u64],
    eof: EofPolicy,
) -> BfResult<Loaded> {
    let mut code: Vec<(u8, usize)> = Vec::new();
    let mut rest: &[u8] = &[];
    for (offset, &byte) in text.iter().enumerate() {
        if dialect.table.lookup(byte).is_none() {
            continue;
        }
        code.push((byte, offset));
        if byte == b'@' {
            rest = &text[offset + 1..];
            break;
        }
    }
    if code.last().map(|&(b, _)| b) != Some(b'@') {
        code.push((b'@', text.len()));
    }

    let ops: Vec<(Op, usize)> = code
        .iter()
        .map(|&(b, offset)| (dialect.table.decode(b), offset))
        .collect();
    check_structure(&ops, &dialect.table)?;

    let values: Vec<u64> = code.iter().map(|&(b, _)| b as u64).collect();
    tape.load(CODE_START, &values)?;

    let end = CODE_START + values.len() as i64;
    let mut preload = data.to_vec();
    preload.extend(parse_data(rest, tape.width())?);
    tape.load(end, &preload)?;

    // storage_pos stays at cell 0
    let machine = Machine::new(Memory::new(tape), dialect.addressing, eof)
        .with_cursor(end)
        .with_entry(CODE_START as usize);

    let program = LiveView {
        bank: CodeBank::Tape,
        addressing: dialect.addressing,
        table: dialect.table,
        end: EndRule::BankEnd,
    };
    Ok(Loaded {
        machine,
        program: Box::new(program),
    })
}

pub fn extended2_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let Op::Ext(token) = operation.op else {
        return core_step(machine, program, ports, operation);
    };

    match token {
        b'?' => return Ok(Flow::Jump(machine.jump_target(machine.cursor)?)),
        b'(' => {
            shift_left(machine)?;
            return Ok(Flow::Next);
        }
        b')' => {
            shift_right(machine)?;
            return Ok(Flow::Next);
        }
        b'$' => {
            let value = machine.current()?;
            machine.set_cell(machine.storage_pos, value)?;
            return Ok(Flow::Next);
        }
        _ => {}
    }

    let cell = machine.current()?;
    let storage = machine.cell(machine.storage_pos)?;
    let divide_by_zero = BfError::DivisionByZero { pc: machine.pc };
    let value = match token {
        b'!' => storage,
        b'{' => cell << 1,
        b'}' => cell >> 1,
        b'~' => !cell,
        b'^' => cell ^ storage,
        b'&' => cell & storage,
        b'|' => cell | storage,
        b'*' => cell.wrapping_mul(storage),
        b'/' => cell.checked_div(storage).ok_or(divide_by_zero)?,
        b'%' => cell.checked_rem(storage).ok_or(divide_by_zero)?,
        b'=' => cell.wrapping_add(storage),
        b'_' => cell.wrapping_sub(storage),
        _ => return Ok(Flow::Next),
    };
    machine.set_current(value)?;
    Ok(Flow::Next)
}

/// Drop the current cell, pulling everything after it one cell left.
fn shift_left(machine: &mut Machine) -> BfResult<()> {
    let last = machine.memory.tape.len() as i64 - 1;
    let mut i = machine.cursor;
    while i < last {
        let next = machine.cell(i + 1)?;
        machine.set_cell(i, next)?;
        i += 1;
    }
    Ok(())
}

/// Insert a zero at the cursor, pushing everything after it one cell right.
///
/// The tape only grows when its last cell is non-zero.
fn shift_right(machine: &mut Machine) -> BfResult<()> {
    let len = machine.memory.tape.len() as i64;
    let mut i = if machine.cell(len - 1)? == 0 { len - 1 } else { len };
    while i > machine.cursor {
        let prev = machine.cell(i - 1)?;
        machine.set_cell(i, prev)?;
        i -= 1;
    }
    machine.set_cell(i, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Source;
    use crate::core::TapeConfig;
    use crate::vm::{Interpreter, OutputCapture};
    use std::io;

    fn loaded(source: &[u8], data: &[u64]) -> Loaded {
        let requested = TapeConfig { width: 1, length: 100, wrap: false, dynamic: false };
        let tape = EXTENDED2.configure_tape(requested).unwrap().build().unwrap();
        EXTENDED2.load(Source::Text(source), tape, data, EofPolicy::Zero).unwrap()
    }

    fn run(source: &[u8]) -> BfResult<(Interpreter, OutputCapture)> {
        let l = loaded(source, &[]);
        let capture = OutputCapture::new();
        let ports = Ports::new(io::empty(), capture.clone());
        let mut vm = Interpreter::new(l.machine, l.program, ports)
            .with_step_hook(EXTENDED2.step);
        vm.run()?;
        Ok((vm, capture))
    }

    #[test]
    fn test_layout() {
        let mut l = loaded(b"+ x .@AB", &[9]);
        // storage, then `+.@`, then side data, then trailing data
        assert_eq!(l.machine.cell(1).unwrap(), b'+' as u64);
        assert_eq!(l.machine.cell(3).unwrap(), b'@' as u64);
        assert_eq!(l.machine.cursor, 4);
        assert_eq!(l.machine.pc, 1);
        assert_eq!(l.machine.cell(4).unwrap(), 9);
        assert_eq!(l.machine.cell(5).unwrap(), b'A' as u64);
        assert_eq!(l.machine.cell(6).unwrap(), b'B' as u64);
    }

    #[test]
    fn test_halt_appended() {
        let mut l = loaded(b"+", &[]);
        assert_eq!(l.machine.cell(2).unwrap(), b'@' as u64);
        assert_eq!(l.machine.cursor, 3);
    }

    #[test]
    fn test_data_after_halt_is_output() {
        let (_, out) = run(b".>.@hi").unwrap();
        assert_eq!(out.text(), "hi");
    }

    #[test]
    fn test_storage_arithmetic() {
        // storage = 6, then cell 6 (holding 7) *= storage
        let (mut vm, _) = run(b"$>*@\\x06\\x07").unwrap();
        assert_eq!(vm.cell(0).unwrap(), 6);
        assert_eq!(vm.cell(6).unwrap(), 42);
    }

    #[test]
    fn test_division_by_zero() {
        let result = run(b"+/@");
        assert!(matches!(result, Err(BfError::DivisionByZero { pc: 2 })));
    }

    #[test]
    fn test_tape_shifts() {
        let (mut vm, _) = run(b"(@\\x01\\x02\\x03").unwrap();
        // the cursor starts on the 1, which is dropped
        assert_eq!(vm.cell(3).unwrap(), 2);
        assert_eq!(vm.cell(4).unwrap(), 3);
        assert_eq!(vm.cell(5).unwrap(), 0);

        let (mut vm, _) = run(b")@\\x01\\x02").unwrap();
        assert_eq!(vm.cell(3).unwrap(), 0);
        assert_eq!(vm.cell(4).unwrap(), 1);
        assert_eq!(vm.cell(5).unwrap(), 2);
        assert_eq!(vm.machine().memory.tape.len(), 10000);
    }

    #[test]
    fn test_jump_to_cursor() {
        // the cursor starts on the data `.@`, which `?` then executes
        let (_, out) = run(b"?@.@").unwrap();
        assert_eq!(out.text(), ".");
    }

    #[test]
    fn test_rewritten_bracket_fails_at_runtime() {
        // `-` turns the `]` at cell 7 into `\`, so the skip from `[` runs
        // into the halt
        let result = run(b"<<->>[]@");
        assert!(matches!(
            result,
            Err(BfError::UnmatchedAtRuntime { pc: 6, token: '[', .. })
        ));
    }
}
