//! Self-modifying Brainfuck.
//!
//! The source bytes are copied onto the tape starting at cell 0 and the
//! program is a [`LiveView`] over that same tape, so `+` and `-` aimed at
//! the code change what runs next. The first zero cell ends the program.

use super::{Dialect, DialectKind, FrontEnd, Layout, Loaded, TapeOverride};
use crate::compiler::{
    check_structure, decode_tokens, lexer, CodeBank, EndRule, LiveView, BRAINFUCK,
};
use crate::core::{Addressing, BfResult, CellStore, Memory};
use crate::vm::{core_step, EofPolicy, Machine};

pub const SELFMOD: Dialect = Dialect {
    kind: DialectKind::Selfmod,
    name: "Self-modifying Brainfuck",
    table: BRAINFUCK,
    front_end: FrontEnd::Text,
    addressing: Addressing::Direct,
    layout: Layout::SelfModifying,
    tape: TapeOverride {
        width: None,
        dynamic_cells: None,
        min_cells: None,
        cells_are_units: false,
    },
    step: core_step,
    finish: None,
    emit: None,
    emit_prelude: "",
};

/// Place code and data on the tape.
///
/// Every source byte is stored, comments included. One trailing newline
/// is dropped. Data and the cursor both start right after the code.
pub(crate) fn load(
    dialect: &Dialect,
    text: &[u8],
    mut tape: CellStore,
    data: &[u64],
    eof: EofPolicy,
) -> BfResult<Loaded> {
    let ops = decode_tokens(&lexer::text_tokens(text), &dialect.table);
    check_structure(&ops, &dialect.table)?;

    let code = text.strip_suffix(b"\n").unwrap_or(text);
    let values: Vec<u64> = code.iter().map(|&b| b as u64).collect();
    tape.load(0, &values)?;

    let end = code.len() as i64;
    tape.load(end, data)?;

    let machine = Machine::new(Memory::new(tape), dialect.addressing, eof).with_cursor(end);
    let program = LiveView {
        bank: CodeBank::Tape,
        addressing: dialect.addressing,
        table: dialect.table,
        end: EndRule::ZeroHalts,
    };
    Ok(Loaded {
        machine,
        program: Box::new(program),
    })
}
