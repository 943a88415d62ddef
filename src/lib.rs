//! brainfunk: a tape machine for the Brainfuck dialect family.
//!
//! One interpreter core and one C emitter serve every dialect. A dialect is
//! a [`Dialect`] descriptor naming its opcode table, source front-end,
//! addressing mode and load layout, plus the hooks that give its extra
//! opcodes meaning.
//!
//! ```no_run
//! use brainfunk::{Engine, MachineConfig};
//!
//! let engine = Engine::new(MachineConfig::default())?;
//! let out = engine.run_to_vec(engine.source(b"++++++++[>++++++++<-]>+.")?, b"")?;
//! assert_eq!(out, b"A");
//! # Ok::<(), brainfunk::BfError>(())
//! ```

// ═══════════════════════════════════════════════════════════════════════════
// Layer 0: Core (No internal dependencies)
// ═══════════════════════════════════════════════════════════════════════════
pub mod core;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 1: Compiler (depends on core)
// ═══════════════════════════════════════════════════════════════════════════
pub mod compiler;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 2: VM (depends on core, compiler)
// ═══════════════════════════════════════════════════════════════════════════
pub mod vm;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 3: AOT (depends on core, compiler)
// ═══════════════════════════════════════════════════════════════════════════
pub mod aot;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 4: Dialects (depends on compiler, vm, aot)
// ═══════════════════════════════════════════════════════════════════════════
pub mod dialect;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 5: Runtime (depends on dialect)
// ═══════════════════════════════════════════════════════════════════════════
pub mod runtime;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 6: Tooling (depends on all)
// ═══════════════════════════════════════════════════════════════════════════
pub mod tooling;

pub use core::{
    Addressing, BfError, BfResult, BoundsPolicy, Cell, CellStore, CellWidth, ErrorCategory,
    Memory, TapeConfig,
};
pub use compiler::{
    escape_data, parse_data, translate, translate_text, Op, Operation, Program, Raster, Source,
};
pub use vm::{EofPolicy, Interpreter, OutputCapture, PauseToken, Ports, RunStatus, StepOutcome};
pub use aot::CEmitter;
pub use dialect::{Dialect, DialectKind};
pub use runtime::{Engine, MachineConfig};
pub use tooling::{debug_run, DebugCommand, Inspector, Reply};
