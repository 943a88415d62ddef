//! Shared test utilities for brainfunk integration tests.
//!
//! ## AAA Pattern
//!
//! All tests follow the Arrange-Act-Assert pattern:
//! - Arrange: Set up the configuration and the source
//! - Act: Run, load or compile
//! - Assert: Verify output, tape contents or the error

#![allow(dead_code)]

use std::io;

use brainfunk::*;

// =============================================================================
// Configuration Builders
// =============================================================================

/// Defaults for `dialect`, with zero on end of input.
pub fn config(dialect: DialectKind) -> MachineConfig {
    MachineConfig {
        dialect,
        eof: EofPolicy::Zero,
        ..MachineConfig::default()
    }
}

/// Build an engine.
///
/// # Panics
/// Panics if the configuration is rejected, which is appropriate for test code.
pub fn engine(config: MachineConfig) -> Engine {
    Engine::new(config).expect("configuration rejected")
}

// =============================================================================
// Run Helpers
// =============================================================================

/// Run a text program and return its output.
pub fn run(dialect: DialectKind, source: &[u8], input: &[u8]) -> BfResult<Vec<u8>> {
    run_with(config(dialect), source, input)
}

pub fn run_with(config: MachineConfig, source: &[u8], input: &[u8]) -> BfResult<Vec<u8>> {
    let engine = engine(config);
    engine.run_to_vec(engine.source(source)?, input)
}

/// Run a program to completion and hand back the finished interpreter.
pub fn finished(
    config: MachineConfig,
    source: &[u8],
    input: &[u8],
) -> (Interpreter, OutputCapture) {
    let engine = engine(config);
    let capture = OutputCapture::new();
    let ports = Ports::new(io::Cursor::new(input.to_vec()), capture.clone());
    let mut vm = engine
        .interpreter(engine.source(source).expect("text source"), ports)
        .expect("program loads");
    vm.run().expect("program runs");
    (vm, capture)
}

/// Compile a text program to C.
pub fn compile(config: MachineConfig, source: &[u8]) -> BfResult<String> {
    let engine = engine(config);
    engine.compile(engine.source(source)?)
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Assert the first cells of the tape.
pub fn assert_cells(vm: &Interpreter, expected: &[u64]) {
    let actual = vm.machine().memory.tape.prefix(expected.len());
    assert_eq!(actual, expected, "tape prefix");
}
