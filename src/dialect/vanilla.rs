//! Plain Brainfuck, from text or from the 3-bit packed encoding.

use super::{Dialect, DialectKind, FrontEnd, Layout, TapeOverride};
use crate::aot::core_emit;
use crate::compiler::BRAINFUCK;
use crate::core::Addressing;
use crate::vm::core_step;

pub const VANILLA: Dialect = Dialect {
    kind: DialectKind::Vanilla,
    name: "Brainfuck",
    table: BRAINFUCK,
    front_end: FrontEnd::Text,
    addressing: Addressing::Direct,
    layout: Layout::Snapshot { origin: 0, data_offset: 0 },
    tape: TapeOverride {
        width: None,
        dynamic_cells: None,
        min_cells: None,
        cells_are_units: false,
    },
    step: core_step,
    finish: None,
    emit: Some(core_emit),
    emit_prelude: "",
};

/// Same semantics, source packed three bits per opcode.
pub const COMPRESSED: Dialect = Dialect {
    kind: DialectKind::Compressed,
    name: "Compressed Brainfuck",
    front_end: FrontEnd::Packed,
    ..VANILLA
};
