//! Stacked Brainfuck.
//!
//! Classic Brainfuck plus an unbounded cell stack. Every operation that reads
//! the top of an empty stack sees 0.
//!
//! ```text
//! (   cell = pop          )   push cell           @   cell = top
//! $   drop top            =   cell += top         _   cell -= top
//! {   cell <<= top        }   cell >>= top        |   cell |= top
//! ^   cell ^= top         &   cell &= top
//! ```
//!
//! A `!` ends the code. Every byte after it is pushed in order, so the last
//! one ends up on top; a single trailing newline is dropped.

use super::{Dialect, DialectKind, FrontEnd, Layout, Loaded, TapeOverride};
use crate::aot::{core_emit, CEmitter};
use crate::compiler::{translate_text, Op, OpSpec, OpTable, Operation, Program, LOOP};
use crate::core::{Addressing, BfResult, CellStore, Memory};
use crate::vm::{core_step, EofPolicy, Flow, Machine, Ports};

/// C globals and helpers for the cell stack, as a literal for `concat!`.
macro_rules! stack_prelude {
    () => {
        "\
static cell_t *stack;
static long depth, room;

static void push(cell_t v) {
    if (depth == room) {
        room = room * 2 + 8;
        stack = realloc(stack, room * sizeof(cell_t));
        if (!stack) die(\"out of memory\");
    }
    stack[depth++] = v;
}

static cell_t peek(void) { return depth > 0 ? stack[depth - 1] : 0; }
static cell_t pop(void) { return depth > 0 ? stack[--depth] : 0; }

static cell_t shl(cell_t v, cell_t n) { return n >= sizeof(cell_t) * 8 ? 0 : (cell_t)(v << n); }
static cell_t shr(cell_t v, cell_t n) { return n >= sizeof(cell_t) * 8 ? 0 : (cell_t)(v >> n); }"
    };
}
pub(crate) use stack_prelude;

/// Ends the code; what follows seeds the cell stack.
pub const STACK_DATA: u8 = b'!';

const STACKED_OPS: [OpSpec; 19] = [
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
    OpSpec::single(b'@', Op::Ext(b'@')),
    OpSpec::single(b'$', Op::Ext(b'$')),
    OpSpec::single(b'=', Op::Ext(b'=')),
    OpSpec::single(b'_', Op::Ext(b'_')),
    OpSpec::single(b'{', Op::Ext(b'{')),
    OpSpec::single(b'}', Op::Ext(b'}')),
    OpSpec::single(b'|', Op::Ext(b'|')),
    OpSpec::single(b'^', Op::Ext(b'^')),
    OpSpec::single(b'&', Op::Ext(b'&')),
];

pub const STACKED: Dialect = Dialect {
    kind: DialectKind::Stacked,
    name: "Stacked Brainfuck",
    table: OpTable {
        specs: &STACKED_OPS,
        pairs: &[LOOP],
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
    step: stacked_step,
    finish: None,
    emit: Some(stacked_emit),
    emit_prelude: stack_prelude!(),
};

/// Split source text at the first `!` into code and initial stack values.
pub fn split_stack_data(text: &[u8]) -> (&[u8], Vec<u64>) {
    let Some(end) = text.iter().position(|&b| b == STACK_DATA) else {
        return (text, Vec::new());
    };
    let mut tail = &text[end + 1..];
    if let Some(rest) = tail.strip_suffix(b"\n") {
        tail = rest;
    }
    (&text[..end], tail.iter().map(|&b| b as u64).collect())
}

/// Translate the code before `!` and seed the stack with what follows.
pub(super) fn load(
    dialect: &Dialect,
    text: &[u8],
    tape: CellStore,
    data: &[u64],
    eof: EofPolicy,
) -> BfResult<Loaded> {
    let (code, stack) = split_stack_data(text);
    let program = translate_text(code, &dialect.table)?;
    let mut memory = Memory::new(tape);
    memory.tape.load(0, data)?;
    let machine = Machine::new(memory, dialect.addressing, eof).with_stack(stack);
    Ok(Loaded {
        machine,
        program: Box::new(program),
    })
}

pub fn stacked_step(
    machine: &mut Machine,
    program: &dyn Program,
    ports: &mut Ports,
    operation: Operation,
) -> BfResult<Flow> {
    let Op::Ext(token) = operation.op else {
        return core_step(machine, program, ports, operation);
    };
    if token == b')' {
        let cell = machine.current()?;
        machine.stack.push(cell);
        return Ok(Flow::Next);
    }
    if token == b'$' {
        machine.stack.pop();
        return Ok(Flow::Next);
    }

    let top = machine.peek_stack();
    let bits = machine.unit_max().count_ones() as u64;
    let value = match token {
        b'(' => machine.pop_stack(),
        b'@' => top,
        b'=' => machine.current()?.wrapping_add(top),
        b'_' => machine.current()?.wrapping_sub(top),
        b'{' if top >= bits => 0,
        b'}' if top >= bits => 0,
        b'{' => machine.current()? << top,
        b'}' => machine.current()? >> top,
        b'|' => machine.current()? | top,
        b'^' => machine.current()? ^ top,
        b'&' => machine.current()? & top,
        _ => return Ok(Flow::Next),
    };
    machine.set_current(value)?;
    Ok(Flow::Next)
}

pub fn stacked_emit(e: &mut CEmitter, operation: &Operation) -> BfResult<()> {
    let Op::Ext(token) = operation.op else {
        return core_emit(e, operation);
    };
    match token {
        b'(' => e.line("put(index, pop());"),
        b')' => e.line("push(get(index));"),
        b'@' => e.line("put(index, peek());"),
        b'$' => e.line("(void)pop();"),
        b'=' => e.line("put(index, (cell_t)(get(index) + peek()));"),
        b'_' => e.line("put(index, (cell_t)(get(index) - peek()));"),
        b'{' => e.line("put(index, shl(get(index), peek()));"),
        b'}' => e.line("put(index, shr(get(index), peek()));"),
        b'|' => e.line("put(index, (cell_t)(get(index) | peek()));"),
        b'^' => e.line("put(index, (cell_t)(get(index) ^ peek()));"),
        b'&' => e.line("put(index, (cell_t)(get(index) & peek()));"),
        _ => return Err(e.unsupported()),
    }
    Ok(())
}
