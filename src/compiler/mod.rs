//! Translation from dialect source to an executable program.
//!
//! - **Lexer**: source front-ends (text, packed bits, raster) (`lexer/`)
//! - **AST**: opcodes, operations and dialect opcode tables (`ast/`)
//! - **Analysis**: delimiter balance checks (`analysis/`)
//! - **Program**: snapshot and live-view programs (`program`)
//! - **Brackets**: branch-time matching scans (`brackets`)
//! - **Data**: initial-memory literal grammar (`data`)
//!
//! # Pipeline
//!
//! ```text
//! Source → Tokens → Ops (table lookup) → Check structure → Compress → Snapshot
//! ```
//!
//! Unrecognised tokens are dropped before the structure check. Only rows
//! marked compressible fold into repeat counts; everything else keeps a
//! repeat of one.

pub mod analysis;
pub mod ast;
pub mod brackets;
pub mod data;
pub mod lexer;
pub mod program;

pub use analysis::check_structure;
pub use ast::{Delimiters, Op, OpSpec, OpTable, Operation, BRAINFUCK, CLASSIC_OPS, LOOP};
pub use brackets::{match_backward, match_enclosing, match_forward};
pub use data::{escape_data, parse_data};
pub use lexer::{pack_bits, unpack_bits, ColorMap, Raster, Source, Token};
pub use program::{CodeBank, EndRule, LiveView, Program, Snapshot};

use tracing::debug;

use crate::core::BfResult;

/// Look up each token in `table`, dropping anything not in the alphabet.
pub fn decode_tokens(tokens: &[Token], table: &OpTable) -> Vec<(Op, usize)> {
    tokens
        .iter()
        .filter_map(|t| table.lookup(t.byte).map(|spec| (spec.op, t.offset)))
        .collect()
}

/// Fold runs of compressible opcodes into repeat counts.
pub fn compress(ops: &[(Op, usize)], table: &OpTable) -> Vec<Operation> {
    let mut out: Vec<Operation> = Vec::with_capacity(ops.len());
    for &(op, _) in ops {
        let compressible = table.specs.iter().any(|s| s.op == op && s.compressible);
        if compressible {
            if let Some(last) = out.last_mut() {
                if last.op == op {
                    last.repeat += 1;
                    continue;
                }
            }
        }
        out.push(Operation::new(op));
    }
    out
}

/// Translate tokens into a validated, compressed program.
///
/// On a structural error no program is produced.
pub fn translate(tokens: &[Token], table: &OpTable) -> BfResult<Snapshot> {
    let ops = decode_tokens(tokens, table);
    check_structure(&ops, table)?;
    let program = Snapshot::new(compress(&ops, table));
    debug!(
        tokens = tokens.len(),
        operations = program.len(),
        "translated program"
    );
    Ok(program)
}

/// Translate program text.
pub fn translate_text(text: &[u8], table: &OpTable) -> BfResult<Snapshot> {
    translate(&lexer::text_tokens(text), table)
}
