//! Integration tests for the debug console.
//!
//! Component: debug_run + Inspector::session
//!
//! These tests verify:
//! - A scripted session can inspect, edit and step a paused program, then
//!   resume it to the end
//! - Running out of commands aborts the run, leaving it paused
//! - Stepping past the last operation ends the run

#![cfg(test)]

use std::io::Cursor;

use crate::common::*;

use brainfunk::*;

/// An interpreter that pauses before its first step.
fn paused(source: &[u8]) -> (Interpreter, OutputCapture) {
    let engine = engine(config(DialectKind::Vanilla));
    let capture = OutputCapture::new();
    let ports = Ports::new(std::io::empty(), capture.clone());
    let token = PauseToken::new();
    token.pause();
    let vm = engine
        .interpreter(engine.source(source).unwrap(), ports)
        .unwrap()
        .with_pause_token(token);
    (vm, capture)
}

fn console(vm: &mut Interpreter, script: &str) -> (BfResult<RunStatus>, String) {
    let mut out = Vec::new();
    let status = debug_run(vm, Cursor::new(script.as_bytes().to_vec()), &mut out);
    (status, String::from_utf8(out).unwrap())
}

#[test]
fn scripted_session_edits_then_resumes() {
    // Arrange
    let (mut vm, output) = paused(b"+++.>++.");
    let script = "g 0\nn\ng 0\ns 1 65\nbogus\nr\n";

    // Act
    let (status, text) = console(&mut vm, script);

    // Assert
    assert_eq!(status.unwrap(), RunStatus::Halted);
    assert_eq!(output.bytes(), vec![3, 67]);
    assert!(text.starts_with("-----------------\nCurrent IP      : 0\n"));
    assert!(text.contains("Next instruction: + x3\n"));
    assert!(text.contains("Cell at #0:\n        0\n"));
    assert!(text.contains("Current IP      : 1\n"));
    assert!(text.contains("Cell at #0:\n        3\n"));
    assert!(text.contains("unknown command 'bogus' (h for help)\n"));
    assert_eq!(text.matches("What to do ( h ): ").count(), 6);
}

#[test]
fn exhausted_script_aborts() {
    // Arrange
    let (mut vm, output) = paused(b"+.+.");

    // Act
    let (status, text) = console(&mut vm, "n\nn\n");

    // Assert
    assert_eq!(status.unwrap(), RunStatus::Paused);
    assert_eq!(output.bytes(), vec![1]);
    assert!(text.contains("Current IP      : 2\n"));
    assert!(!vm.is_halted());
}

#[test]
fn stepping_off_the_end_halts() {
    // Arrange
    let (mut vm, output) = paused(b"+.");

    // Act
    let (status, _) = console(&mut vm, "n\nn\nn\n");

    // Assert
    assert_eq!(status.unwrap(), RunStatus::Halted);
    assert_eq!(output.bytes(), vec![1]);
}

#[test]
fn console_errors_surface_from_the_run() {
    // Arrange
    let (mut vm, _) = paused(b"+");

    // Act
    let (status, _) = console(&mut vm, "g -1\n");

    // Assert
    assert!(matches!(status, Err(BfError::NegativeAddress { index: -1, .. })));
}
