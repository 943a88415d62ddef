//! Ties a configuration to a dialect and drives a run or a compilation.
//!
//! # Pipeline
//!
//! ```text
//! MachineConfig ─► Dialect::configure_tape ─► TapeConfig ─► CellStore
//!                                                               │
//! source bytes ─► Source ─► Dialect::load ─► Machine + Program ─┤
//!                                                               ├─► Interpreter::run
//!                                                               └─► Dialect::emit_c
//! ```

use std::io;

use tracing::info;

use super::config::MachineConfig;
use crate::compiler::{parse_data, Raster, Source};
use crate::core::{BfError, BfResult, CellWidth, TapeConfig};
use crate::dialect::{Dialect, FrontEnd, Loaded};
use crate::vm::{Interpreter, OutputCapture, Ports, RunStatus};

/// A configured dialect, ready to load programs.
#[derive(Debug, Clone)]
pub struct Engine {
    config: MachineConfig,
    dialect: &'static Dialect,
    tape: TapeConfig,
    data: Vec<u64>,
}

impl Engine {
    /// Resolve the dialect's tape settings and parse the initial data.
    pub fn new(config: MachineConfig) -> BfResult<Self> {
        let dialect = config.dialect.dialect();
        let tape = dialect.configure_tape(config.tape())?;
        tape.policy()?;
        let width = CellWidth::from_bytes(tape.width)?;
        let data = match &config.data {
            Some(text) => parse_data(text.as_bytes(), width)?,
            None => Vec::new(),
        };
        Ok(Self {
            config,
            dialect,
            tape,
            data,
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Tape settings after the dialect's overrides.
    pub fn tape(&self) -> &TapeConfig {
        &self.tape
    }

    /// Initial memory contents.
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Wrap source bytes for the dialect's front-end.
    pub fn source<'a>(&self, bytes: &'a [u8]) -> BfResult<Source<'a>> {
        match self.dialect.front_end {
            FrontEnd::Text => Ok(Source::Text(bytes)),
            FrontEnd::Packed => Ok(Source::Packed(bytes)),
            FrontEnd::Raster(_) => Err(BfError::Config {
                message: format!("{} programs are images, not text", self.dialect.name),
            }),
        }
    }

    /// Wrap a decoded image for a raster dialect.
    pub fn raster_source<'a>(&self, image: &'a Raster) -> BfResult<Source<'a>> {
        match self.dialect.front_end {
            FrontEnd::Raster(colors) => Ok(Source::Raster { image, colors }),
            _ => Err(BfError::Config {
                message: format!("{} programs are text, not images", self.dialect.name),
            }),
        }
    }

    /// Build a fresh tape and load `source` onto it.
    pub fn load(&self, source: Source<'_>) -> BfResult<Loaded> {
        let store = self.tape.build()?;
        self.dialect.load(source, store, &self.data, self.config.eof)
    }

    /// An interpreter wired with the dialect's hooks and the step budget.
    pub fn interpreter(&self, source: Source<'_>, ports: Ports) -> BfResult<Interpreter> {
        let loaded = self.load(source)?;
        Ok(Interpreter::new(loaded.machine, loaded.program, ports)
            .with_step_hook(self.dialect.step)
            .with_finish_hook(self.dialect.finish)
            .with_max_steps(self.config.max_steps))
    }

    /// Interpret `source` to completion.
    pub fn run(&self, source: Source<'_>, ports: Ports) -> BfResult<RunStatus> {
        let mut vm = self.interpreter(source, ports)?;
        info!(
            dialect = self.dialect.name,
            width = self.tape.width,
            cells = self.tape.length,
            policy = %self.tape.policy()?,
            eof = %self.config.eof,
            "running"
        );
        vm.run()
    }

    /// Run with in-memory input and return everything written.
    pub fn run_to_vec(&self, source: Source<'_>, input: &[u8]) -> BfResult<Vec<u8>> {
        let capture = OutputCapture::new();
        let ports = Ports::new(io::Cursor::new(input.to_vec()), capture.clone());
        self.run(source, ports)?;
        Ok(capture.bytes())
    }

    /// Translate `source` and emit C for it.
    pub fn compile(&self, source: Source<'_>) -> BfResult<String> {
        if !self.dialect.can_compile() {
            return Err(BfError::Unsupported {
                dialect: self.dialect.name,
                backend: "compiled",
            });
        }
        let loaded = self.load(source)?;
        self.dialect.emit_c(
            loaded.program.as_ref(),
            &self.tape,
            &self.data,
            &loaded.machine.stack,
            self.config.eof,
        )
    }
}
