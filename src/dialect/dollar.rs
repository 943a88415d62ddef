//! Brainfuck$.
//!
//! Classic Brainfuck plus a cell stack, decimal I/O and counted repeats:
//!
//! ```text
//! #   push cell            $   cell = pop (0 when empty)
//! :   print cell in decimal
//! ;   read a decimal number into the cell
//! (   run the block up to `)` top-of-stack times
//! )   end of a repeat block
//! ```
//!
//! The repeat count is read once, when the block is entered. `;` skips
//! anything before the first digit and leaves the byte after the last digit
//! unread. Trailing `!` data seeds the stack as in [`stacked`](super::stacked).

use super::stacked::stack_prelude;
use super::{Dialect, DialectKind, FrontEnd, Layout, TapeOverride};
use crate::aot::{core_emit, CEmitter};
use crate::compiler::{
    match_backward, match_forward, Delimiters, Op, OpSpec, OpTable, Operation, Program, LOOP,
};
use crate::core::{Addressing, BfResult};
use crate::vm::{core_step, Flow, Machine, Ports};

const REPEAT: Delimiters = Delimiters {
    open: Op::Ext(b'('),
    close: Op::Ext(b')'),
};

const DOLLAR_OPS: [OpSpec; 14] = [
    OpSpec::folded(b'>', Op::Right),
    OpSpec::folded(b'<', Op::Left),
    OpSpec::folded(b'+', Op::Inc),
    OpSpec::folded(b'-', Op::Dec),
    OpSpec::single(b'.', Op::Output),
    OpSpec::single(b',', Op::Input),
    OpSpec::single(b'[', Op::LoopStart),
    OpSpec::single(b']', Op::LoopEnd),
    OpSpec::single(b'#', Op::Ext(b'#')),
    OpSpec::single(b'$', Op::Ext(b'$')),
    OpSpec::single(b':', Op::Ext(b':')),
    OpSpec::single(b';', Op::Ext(b';')),
    OpSpec::single(b'(', Op::Ext(b'(')),
    OpSpec::single(b')', Op::Ext(b')')),
];

pub const DOLLAR: Dialect = Dialect {
    kind: DialectKind::Dollar,
    name: "Brainfuck$",
    table: OpTable {
        specs: &DOLLAR_OPS,
        pairs: &[LOOP, REPEAT],
        loop_break: None,
    },
    front_end: FrontEnd::Text,
    addressing: Addressing::Direct,
    layout: Layout::StackTail,
    tape: TapeOverride {
        width: None,
        dynamic_cells: None,
        min_cells: None,
        cells_are_units: false,
    },
    step: dollar_step,
    finish: None,
    emit: Some(dollar_emit),
    emit_prelude: DOLLAR_PRELUDE,
};

const DOLLAR_PRELUDE: &str = concat!(
    stack_prelude!(),
    "

static cell_t read_number(cell_t old) {
    int c = getchar();
    cell_t v = 0;
    while (c != EOF && (c < '0' || c > '9')) c = getchar();
    if (c == EOF) return on_eof(old);
    while (c >= '0' && c <= '9') {
        v = (cell_t)(v * 10 + (cell_t)(c - '0'));
        c = getchar();
    }
    if (c != EOF) ungetc(c, stdin);
    return v;
}"
);

pub fn dollar_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let pc = machine.pc;
    match operation.op {
        Op::Ext(b'#') => {
            let cell = machine.current()?;
            machine.stack.push(cell);
        }
        Op::Ext(b'$') => {
            let top = machine.pop_stack();
            machine.set_current(top)?;
        }
        Op::Ext(b':') => {
            let cell = machine.current()?;
            ports.write_bytes(cell.to_string().as_bytes())?;
        }
        Op::Ext(b';') => read_number(machine, ports)?,
        Op::Ext(b'(') => {
            let count = machine.peek_stack();
            if count == 0 {
                let close = match_forward(program, &mut machine.memory, pc, REPEAT)?;
                return Ok(Flow::Jump(close + 1));
            }
            machine.counters.push(count);
        }
        Op::Ext(b')') => match machine.counters.last_mut() {
            Some(left) if *left > 1 => {
                *left -= 1;
                let open = match_backward(program, &mut machine.memory, pc, REPEAT)?;
                return Ok(Flow::Jump(open + 1));
            }
            _ => {
                machine.counters.pop();
            }
        },
        _ => return core_step(machine, program, ports, operation),
    }
    Ok(Flow::Next)
}

/// Decimal input; the byte that ends the number is left for the next read.
fn read_number(machine: &mut Machine, ports: &mut Ports) -> BfResult<()> {
    let mut next = ports.read_byte()?;
    while matches!(next, Some(b) if !b.is_ascii_digit()) {
        next = ports.read_byte()?;
    }
    if next.is_none() {
        let value = machine.eof_value()?;
        return machine.set_current(value);
    }

    let mut value = 0u64;
    while let Some(b) = next {
        if !b.is_ascii_digit() {
            ports.unread_byte(b);
            break;
        }
        value = value.wrapping_mul(10).wrapping_add((b - b'0') as u64);
        next = ports.read_byte()?;
    }
    machine.set_current(value)
}

pub fn dollar_emit(e: &mut CEmitter, operation: &Operation) -> BfResult<()> {
    match operation.op {
        Op::Ext(b'#') => e.line("push(get(index));"),
        Op::Ext(b'$') => e.line("put(index, pop());"),
        Op::Ext(b':') => e.line("printf(\"%llu\", (unsigned long long)get(index));"),
        Op::Ext(b';') => e.line("put(index, read_number(get(index)));"),
        Op::Ext(b'(') => {
            e.open_block("{");
            e.line("cell_t count = peek(), k;");
            e.open_block("for (k = 0; k < count; k++) {");
        }
        Op::Ext(b')') => {
            e.close_block();
            e.close_block();
        }
        _ => return core_emit(e, operation),
    }
    Ok(())
}
