//! C code generation.
//!
//! One forward pass over a snapshot program, one template per operation.
//! Every tape access in the generated code goes through a single guard,
//! `at()`, which reproduces the cell store's bounds policy:
//!
//! ```text
//! Fixed    i < 0 or i >= size → exit with an error
//! Wrap     i < 0  → size - (-i % size); i >= size → i % size
//! Dynamic  i < 0  → error; i >= size → realloc (size + size/2 + 1, repeated)
//! ```
//!
//! Loops become native `while` blocks, so no jump addresses are emitted.

use std::fmt::Write as _;

use tracing::debug;

use crate::compiler::{Op, Operation, Program, Snapshot};
use crate::core::{BfError, BfResult, BoundsPolicy, CellWidth, MAX_TAPE_CELLS};
use crate::vm::EofPolicy;

/// Emits the C for one operation.
pub type EmitHook = fn(&mut CEmitter, &Operation) -> BfResult<()>;

/// Everything the generated program needs to know about the machine.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Dialect name, for error messages.
    pub dialect: &'static str,
    pub width: CellWidth,
    /// Initial number of cells.
    pub length: usize,
    pub policy: BoundsPolicy,
    pub eof: EofPolicy,
    /// Starting cursor.
    pub origin: i64,
    /// Initial memory contents.
    pub data: Vec<u64>,
    /// Cell index where `data` starts.
    pub data_offset: i64,
    /// Extra globals and helpers (e.g. a storage register).
    pub prelude: &'static str,
    /// Initial cell stack, bottom first. Pushed with the prelude's `push()`.
    pub stack: Vec<u64>,
}

/// Text emitter for a C target.
#[derive(Debug)]
pub struct CEmitter {
    out: String,
    indent: usize,
    options: EmitOptions,
}

impl CEmitter {
    pub fn new(options: EmitOptions) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            options,
        }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Width of one cell in bits.
    pub fn cell_bits(&self) -> u64 {
        self.options.width.bits() as u64
    }

    pub fn line(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    /// Emit `header` (ending in `{`) and indent.
    pub fn open_block(&mut self, header: &str) {
        self.line(header);
        self.indent += 1;
    }

    pub fn close_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    /// The error every backend-specific failure reports.
    pub fn unsupported(&self) -> BfError {
        BfError::Unsupported {
            dialect: self.options.dialect,
            backend: "compiled",
        }
    }

    /// Generate a complete C program.
    pub fn emit(mut self, program: &dyn Program, hook: EmitHook) -> BfResult<String> {
        let snapshot: &Snapshot = program.as_snapshot().ok_or_else(|| self.unsupported())?;

        self.preamble();
        self.open_block("int main(void) {");
        self.line(&format!("long index = {};", self.options.origin));
        self.line("tape = calloc(size > 0 ? size : 1, sizeof(cell_t));");
        self.line("if (!tape) die(\"out of memory\");");
        self.init_data();
        self.init_stack();

        for operation in snapshot.ops() {
            hook(&mut self, operation)?;
        }

        self.indent = 0;
        self.line("done:");
        self.indent = 1;
        self.line("fflush(stdout);");
        self.line("free(tape);");
        self.line("return 0;");
        self.close_block();

        debug!(
            operations = snapshot.len(),
            bytes = self.out.len(),
            "emitted C program"
        );
        Ok(self.out)
    }

    fn preamble(&mut self) {
        let o = self.options.clone();
        for include in ["stdio.h", "stdint.h", "stdlib.h", "string.h"] {
            self.line(&format!("#include <{}>", include));
        }
        self.line("");
        self.line(&format!("typedef {} cell_t;", o.width.c_type()));
        self.line(&format!("#define MAX_CELLS {}L", MAX_TAPE_CELLS));
        self.line("");
        self.line("static cell_t *tape;");
        self.line(&format!("static long size = {};", o.length));
        self.line("");

        self.open_block("static void die(const char *msg) {");
        self.line("fflush(stdout);");
        self.line("fprintf(stderr, \"Error: %s\\n\", msg);");
        self.line("exit(1);");
        self.close_block();
        self.line("");

        self.open_block("static long at(long i) {");
        match o.policy {
            BoundsPolicy::Fixed => {
                self.line("if (i < 0) die(\"pointer was decremented too much\");");
                self.line("if (i >= size) die(\"pointer was incremented too much\");");
            }
            BoundsPolicy::Wrap => {
                self.line("if (i < 0) i = size - (-i) % size;");
                self.line("if (i >= size) i %= size;");
            }
            BoundsPolicy::Dynamic => {
                self.line("if (i < 0) die(\"pointer was decremented too much\");");
                self.open_block("if (i >= size) {");
                self.line("long old = size;");
                self.line("if (i >= MAX_CELLS) die(\"tape cannot grow any further\");");
                self.line("while (size <= i) size += size / 2 + 1;");
                self.line("if (size > MAX_CELLS) size = MAX_CELLS;");
                self.line("tape = realloc(tape, size * sizeof(cell_t));");
                self.line("if (!tape) die(\"out of memory\");");
                self.line("memset(tape + old, 0, (size - old) * sizeof(cell_t));");
                self.close_block();
            }
        }
        self.line("return i;");
        self.close_block();
        self.line("");

        // at() may move the tape, so it must run before `tape` is read
        self.line("static cell_t get(long i) { long j = at(i); return tape[j]; }");
        self.line("static void put(long i, cell_t v) { long j = at(i); tape[j] = v; }");
        self.line("");

        self.open_block("static cell_t on_eof(cell_t old) {");
        self.line("(void)old;");
        match o.eof {
            EofPolicy::MinusOne => self.line("return (cell_t)-1;"),
            EofPolicy::Zero => self.line("return 0;"),
            EofPolicy::Unchanged => self.line("return old;"),
            EofPolicy::Abort => {
                self.line("die(\"unexpected end of input\");");
                self.line("return old;");
            }
        }
        self.close_block();
        self.line("");

        self.open_block("static cell_t input_cell(cell_t old) {");
        self.line("int c = getchar();");
        self.line("if (c == EOF) return on_eof(old);");
        self.line("return (cell_t)c;");
        self.close_block();
        self.line("");

        // dialect globals and helpers may call anything above
        if !o.prelude.is_empty() {
            for decl in o.prelude.lines() {
                self.line(decl);
            }
            self.line("");
        }
    }

    fn init_data(&mut self) {
        if self.options.data.is_empty() {
            return;
        }
        let mut values = String::new();
        for (i, v) in self.options.data.iter().enumerate() {
            if i > 0 {
                values.push_str(", ");
            }
            let _ = write!(values, "0x{:x}", v & self.options.width.mask());
        }
        let offset = self.options.data_offset;
        self.open_block("{");
        self.line(&format!("static const cell_t init_data[] = {{ {} }};", values));
        self.line("size_t i;");
        self.line("for (i = 0; i < sizeof init_data / sizeof init_data[0]; i++)");
        self.line(&format!("    put({} + (long)i, init_data[i]);", offset));
        self.close_block();
    }

    fn init_stack(&mut self) {
        if self.options.stack.is_empty() {
            return;
        }
        let mask = self.options.width.mask();
        let values: Vec<String> = self
            .options
            .stack
            .iter()
            .map(|v| format!("0x{:x}", v & mask))
            .collect();
        self.open_block("{");
        self.line(&format!("static const cell_t init_stack[] = {{ {} }};", values.join(", ")));
        self.line("size_t i;");
        self.line("for (i = 0; i < sizeof init_stack / sizeof init_stack[0]; i++)");
        self.line("    push(init_stack[i]);");
        self.close_block();
    }
}

/// Templates for the classic opcodes plus halt.
pub fn core_emit(e: &mut CEmitter, operation: &Operation) -> BfResult<()> {
    let n = operation.repeat;
    match operation.op {
        Op::Right => e.line(&format!("index += {};", n)),
        Op::Left => e.line(&format!("index -= {};", n)),
        Op::Inc => e.line(&format!("put(index, (cell_t)(get(index) + (cell_t){}ULL));", n)),
        Op::Dec => e.line(&format!("put(index, (cell_t)(get(index) - (cell_t){}ULL));", n)),
        Op::Output => {
            for _ in 0..n {
                e.line("putchar((unsigned char)get(index));");
            }
        }
        Op::Input => {
            for _ in 0..n {
                e.line("put(index, input_cell(get(index)));");
            }
        }
        Op::LoopStart => e.open_block("while (get(index)) {"),
        Op::LoopEnd => e.close_block(),
        Op::Halt => e.line("goto done;"),
        Op::Nop => {}
        Op::Ext(_) => return Err(e.unsupported()),
    }
    Ok(())
}
