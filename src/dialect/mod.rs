//! Dialect descriptors.
//!
//! Every member of the family is a [`Dialect`] value rather than a type: an
//! opcode table, a source front-end, an addressing mode, a load layout, the
//! tape settings it forces, and the two behaviour hooks (`step` for the
//! interpreter, `emit` for the C backend). Dialects that cannot be compiled
//! leave `emit` empty.
//!
//! # Family
//!
//! | Kind        | Program   | Addressing | Compiles |
//! |-------------|-----------|------------|----------|
//! | vanilla     | snapshot  | direct     | yes      |
//! | compressed  | snapshot  | direct     | yes      |
//! | selfmod     | live      | direct     | no       |
//! | extended    | snapshot  | direct     | yes      |
//! | extended2   | live      | direct     | no       |
//! | love        | snapshot  | direct     | yes      |
//! | jump        | snapshot  | direct     | no       |
//! | bcd         | live      | nibble     | no       |
//! | bitchanger  | snapshot  | bit        | no       |
//! | loller      | snapshot  | direct     | no       |
//! | extloller   | snapshot  | direct     | no       |
//! | stacked     | snapshot  | direct     | yes      |
//! | dollar      | snapshot  | direct     | yes      |

pub mod bcd;
pub mod bitchanger;
pub mod dollar;
pub mod extended;
pub mod extended2;
pub mod jump;
pub mod loller;
pub mod love;
pub mod selfmod;
pub mod stacked;
pub mod vanilla;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aot::{CEmitter, EmitHook, EmitOptions};
use crate::compiler::{translate, ColorMap, OpTable, Program, Source};
use crate::core::{Addressing, BfError, BfResult, CellStore, Memory, TapeConfig};
use crate::vm::{EofPolicy, FinishHook, Machine, StepHook};

/// Names of the dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Vanilla,
    Compressed,
    Selfmod,
    Extended,
    Extended2,
    Love,
    Jump,
    Bcd,
    Bitchanger,
    Loller,
    Extloller,
    Stacked,
    Dollar,
}

impl DialectKind {
    pub const ALL: [DialectKind; 13] = [
        DialectKind::Vanilla,
        DialectKind::Compressed,
        DialectKind::Selfmod,
        DialectKind::Extended,
        DialectKind::Extended2,
        DialectKind::Love,
        DialectKind::Jump,
        DialectKind::Bcd,
        DialectKind::Bitchanger,
        DialectKind::Loller,
        DialectKind::Extloller,
        DialectKind::Stacked,
        DialectKind::Dollar,
    ];

    /// The descriptor for this dialect.
    pub fn dialect(self) -> &'static Dialect {
        match self {
            DialectKind::Vanilla => &vanilla::VANILLA,
            DialectKind::Compressed => &vanilla::COMPRESSED,
            DialectKind::Selfmod => &selfmod::SELFMOD,
            DialectKind::Extended => &extended::EXTENDED,
            DialectKind::Extended2 => &extended2::EXTENDED2,
            DialectKind::Love => &love::LOVE,
            DialectKind::Jump => &jump::JUMP,
            DialectKind::Bcd => &bcd::BCD,
            DialectKind::Bitchanger => &bitchanger::BITCHANGER,
            DialectKind::Loller => &loller::LOLLER,
            DialectKind::Extloller => &loller::EXTLOLLER,
            DialectKind::Stacked => &stacked::STACKED,
            DialectKind::Dollar => &dollar::DOLLAR,
        }
    }

    fn key(self) -> &'static str {
        match self {
            DialectKind::Vanilla => "vanilla",
            DialectKind::Compressed => "compressed",
            DialectKind::Selfmod => "selfmod",
            DialectKind::Extended => "extended",
            DialectKind::Extended2 => "extended2",
            DialectKind::Love => "love",
            DialectKind::Jump => "jump",
            DialectKind::Bcd => "bcd",
            DialectKind::Bitchanger => "bitchanger",
            DialectKind::Loller => "loller",
            DialectKind::Extloller => "extloller",
            DialectKind::Stacked => "stacked",
            DialectKind::Dollar => "dollar",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DialectKind::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = DialectKind::ALL.iter().map(|k| k.key()).collect();
                format!("unknown dialect '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// How source text is turned into tokens.
#[derive(Debug, Clone, Copy)]
pub enum FrontEnd {
    Text,
    Packed,
    Raster(ColorMap),
}

/// Where code and data go when a program is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Translated once. Data is written at physical cell `data_offset`, the
    /// cursor starts at logical index `origin`.
    Snapshot { origin: i64, data_offset: i64 },
    /// Source bytes are the tape; see [`selfmod`].
    SelfModifying,
    /// Filtered code from cell 1, data after it; see [`extended2`].
    CodeAfterStorage,
    /// Source bytes are a separate nibble code bank; see [`bcd`].
    CodeBank,
    /// Snapshot at cell 0; bytes after `!` seed the cell stack; see [`stacked`].
    StackTail,
}

/// Tape settings a dialect imposes over what was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapeOverride {
    /// Cell width the dialect requires.
    pub width: Option<usize>,
    /// Forces a dynamic tape of this initial length.
    pub dynamic_cells: Option<i64>,
    /// Smallest accepted cell count.
    pub min_cells: Option<i64>,
    /// The cell count is given in addressed units, not physical cells.
    pub cells_are_units: bool,
}

/// Machine and program ready to run.
#[derive(Debug)]
pub struct Loaded {
    pub machine: Machine,
    pub program: Box<dyn Program>,
}

/// A family member.
#[derive(Clone, Copy)]
pub struct Dialect {
    pub kind: DialectKind,
    /// Display name.
    pub name: &'static str,
    pub table: OpTable,
    pub front_end: FrontEnd,
    pub addressing: Addressing,
    pub layout: Layout,
    pub tape: TapeOverride,
    pub step: StepHook,
    pub finish: Option<FinishHook>,
    pub emit: Option<EmitHook>,
    /// Extra globals for the C backend.
    pub emit_prelude: &'static str,
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("addressing", &self.addressing)
            .field("layout", &self.layout)
            .field("compiles", &self.emit.is_some())
            .finish()
    }
}

impl Dialect {
    /// Whether the C backend is available.
    pub fn can_compile(&self) -> bool {
        self.emit.is_some()
    }

    /// Apply the dialect's forced settings, warning about ignored requests.
    pub fn configure_tape(&self, requested: TapeConfig) -> BfResult<TapeConfig> {
        let mut tape = requested;

        if let Some(width) = self.tape.width {
            if requested.width != width {
                warn!(
                    dialect = self.name,
                    requested = requested.width,
                    "custom cell size ignored, {}-byte cells only",
                    width
                );
            }
            tape.width = width;
        }

        if let Some(cells) = self.tape.dynamic_cells {
            if requested.wrap {
                warn!(dialect = self.name, "pointer wrap-around ignored");
            }
            tape.wrap = false;
            tape.dynamic = true;
            tape.length = cells;
        }

        if let Some(min) = self.tape.min_cells {
            if tape.length < min {
                return Err(BfError::Config {
                    message: format!("{} tape must be at least {} cells long", self.name, min),
                });
            }
        }

        if self.tape.cells_are_units {
            tape.length /= self.addressing.units_per_cell() as i64;
        }

        if !tape.dynamic && !tape.wrap && (0..9999).contains(&tape.length) {
            warn!(cells = tape.length, "tape is shorter than the customary 9999 cells");
        }
        Ok(tape)
    }

    /// Translate or load `source` and set up a machine around `tape`.
    pub fn load(
        &self,
        source: Source<'_>,
        tape: CellStore,
        data: &[u64],
        eof: EofPolicy,
    ) -> BfResult<Loaded> {
        let loaded = match self.layout {
            Layout::Snapshot { origin, data_offset } => {
                let program = translate(&source.tokens()?, &self.table)?;
                let mut memory = Memory::new(tape);
                memory.tape.load(data_offset, data)?;
                let machine = Machine::new(memory, self.addressing, eof).with_cursor(origin);
                Loaded {
                    machine,
                    program: Box::new(program),
                }
            }
            Layout::SelfModifying => selfmod::load(self, text_of(self, source)?, tape, data, eof)?,
            Layout::CodeAfterStorage => {
                extended2::load(self, text_of(self, source)?, tape, data, eof)?
            }
            Layout::CodeBank => bcd::load(self, text_of(self, source)?, tape, data, eof)?,
            Layout::StackTail => stacked::load(self, text_of(self, source)?, tape, data, eof)?,
        };
        debug!(
            dialect = self.name,
            preload = data.len(),
            stacked = loaded.machine.stack.len(),
            cursor = loaded.machine.cursor,
            entry = loaded.machine.pc,
            "loaded program"
        );
        Ok(loaded)
    }

    /// Emit C for a loaded program whose cell stack starts as `stack`.
    pub fn emit_c(
        &self,
        program: &dyn Program,
        tape: &TapeConfig,
        data: &[u64],
        stack: &[u64],
        eof: EofPolicy,
    ) -> BfResult<String> {
        let unsupported = BfError::Unsupported {
            dialect: self.name,
            backend: "compiled",
        };
        let Some(hook) = self.emit else {
            return Err(unsupported);
        };
        let (origin, data_offset) = match self.layout {
            Layout::Snapshot { origin, data_offset } => (origin, data_offset),
            Layout::StackTail => (0, 0),
            _ => return Err(unsupported),
        };
        let options = EmitOptions {
            dialect: self.name,
            width: crate::core::CellWidth::from_bytes(tape.width)?,
            length: tape.length.max(0) as usize,
            policy: tape.policy()?,
            eof,
            origin,
            data: data.to_vec(),
            data_offset,
            prelude: self.emit_prelude,
            stack: stack.to_vec(),
        };
        CEmitter::new(options).emit(program, hook)
    }
}

/// Raw text for the layouts that place source bytes in memory.
fn text_of<'a>(dialect: &Dialect, source: Source<'a>) -> BfResult<&'a [u8]> {
    match source {
        Source::Text(text) | Source::Packed(text) => Ok(text),
        Source::Raster { .. } => Err(BfError::Config {
            message: format!("{} does not read raster sources", dialect.name),
        }),
    }
}
