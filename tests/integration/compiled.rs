//! Differential tests: generated C against the interpreter.
//!
//! Component: Engine::compile + the host C compiler
//!
//! These tests verify:
//! - For every dialect with a C backend, under the fixed, wrap and dynamic
//!   bounds policies, the compiled program writes exactly the bytes the
//!   interpreter writes
//! - A run the interpreter stops with an error also fails when compiled,
//!   after the same output
//! - Tape growth, nested breaks and stack seeding survive compilation
//!
//! Each test returns early when no `cc` is on the PATH.

#![cfg(test)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::tempdir;

use crate::common::*;

use brainfunk::compiler::pack_bits;
use brainfunk::*;

const HELLO: &[u8] = concat!(
    "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]",
    ">>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.",
)
.as_bytes();

/// Prints `A`, then writes a cell past the end of a 40-cell tape.
const FAR: &[u8] = concat!(
    "+++++[>+++++++++++++<-]>.",
    ">>>>>>>>>>>>>>>>>>>>>>>>>",
    ">>>>>>>>>>>>>>>>>>>>>>>>+.",
)
.as_bytes();

/// Programs every dialect reads the same way, with their input.
const CLASSIC: &[(&[u8], &[u8])] = &[
    (HELLO, b""),
    (b",[.,]", b"echo"),
    (b"-.>--.", b""),
    (b"<+++.", b""),
    (FAR, b""),
];

fn cc_available() -> bool {
    let found = Command::new("cc")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success());
    if !found {
        eprintln!("no cc on PATH, skipping compiled comparison");
    }
    found
}

/// Output and success of a run.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    stdout: Vec<u8>,
    ok: bool,
}

fn interpret(engine: &Engine, source: &[u8], input: &[u8]) -> Outcome {
    let capture = OutputCapture::new();
    let ports = Ports::new(std::io::Cursor::new(input.to_vec()), capture.clone());
    let result = engine.run(engine.source(source).expect("text source"), ports);
    Outcome {
        stdout: capture.bytes(),
        ok: result.is_ok(),
    }
}

fn run_compiled(dir: &Path, name: &str, c: &str, input: &[u8]) -> Outcome {
    let source = dir.join(format!("{name}.c"));
    let binary = dir.join(name);
    fs::write(&source, c).expect("write C source");

    let built = Command::new("cc")
        .arg("-o")
        .arg(&binary)
        .arg(&source)
        .status()
        .expect("cc runs");
    assert!(built.success(), "cc rejected {name}:\n{c}");

    let mut child = Command::new(&binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("compiled program starts");
    if let Some(mut stdin) = child.stdin.take() {
        // The program may exit before reading everything
        let _ = stdin.write_all(input);
    }
    let output = child.wait_with_output().expect("compiled program finishes");
    Outcome {
        stdout: output.stdout,
        ok: output.status.success(),
    }
}

/// The fixed, wrap and dynamic tapes, plus a wider fixed one.
fn tapes(dialect: DialectKind) -> Vec<(&'static str, MachineConfig)> {
    let base = MachineConfig {
        cell_count: 40,
        ..config(dialect)
    };
    vec![
        ("fixed", base.clone()),
        ("wrap", MachineConfig { wrap: true, ..base.clone() }),
        ("dynamic", MachineConfig { dynamic: true, cell_count: 1, ..base.clone() }),
        ("wide", MachineConfig { cell_width: 2, ..base }),
    ]
}

/// Compile and interpret every program under every tape and compare.
fn assert_backends_agree(dialect: DialectKind, corpus: &[(&[u8], &[u8])]) {
    if !cc_available() {
        return;
    }
    let dir = tempdir().expect("temp dir");
    for (tape, config) in tapes(dialect) {
        let engine = engine(config);
        for (i, &(text, input)) in corpus.iter().enumerate() {
            let source = if dialect == DialectKind::Compressed {
                pack_bits(text)
            } else {
                text.to_vec()
            };
            let name = format!("{dialect}_{tape}_{i}");
            let c = engine
                .compile(engine.source(&source).expect("text source"))
                .expect("program compiles");

            let expected = interpret(&engine, &source, input);
            let actual = run_compiled(dir.path(), &name, &c, input);

            assert_eq!(
                actual,
                expected,
                "{name}: {}",
                String::from_utf8_lossy(text)
            );
        }
    }
}

#[test]
fn vanilla_matches_interpreter() {
    assert_backends_agree(DialectKind::Vanilla, CLASSIC);
}

#[test]
fn compressed_matches_interpreter() {
    assert_backends_agree(DialectKind::Compressed, CLASSIC);
}

#[test]
fn extended_matches_interpreter() {
    let mut corpus = CLASSIC.to_vec();
    corpus.extend_from_slice(&[
        (&b"+++$>!.{{.}.~.^.&.|."[..], &b""[..]),
        (b"+.@+.", b""),
        (b"+{{{{{{{.}}}.{{{{.", b""),
    ]);
    assert_backends_agree(DialectKind::Extended, &corpus);
}

#[test]
fn love_matches_interpreter() {
    let mut corpus = CLASSIC.to_vec();
    corpus.extend_from_slice(&[
        (&b"+[~[]-]>+<."[..], &b""[..]),
        (b"(+[~(-)]).", b""),
        (b"+++[>+<~-]>.<.", b""),
        (b"+++$>!.(+).", b""),
    ]);
    assert_backends_agree(DialectKind::Love, &corpus);
}

#[test]
fn stacked_matches_interpreter() {
    let mut corpus = CLASSIC.to_vec();
    corpus.extend_from_slice(&[
        (&b"([.(]!abc\n"[..], &b""[..]),
        (b"++++++++)>+++{.)>+++++|.$$<<.>=.>_.^.&.(.@.", b""),
        (b"+)>,}.", b"\xff"),
        (b"++++++++++++++++)>+{.", b""),
    ]);
    assert_backends_agree(DialectKind::Stacked, &corpus);
}

#[test]
fn dollar_matches_interpreter() {
    let mut corpus = CLASSIC.to_vec();
    corpus.extend_from_slice(&[
        (&b";#>++++++[>++++++++<-]>--(.)"[..], &b"4\n"[..]),
        (b";:>;:>,.", b"x 42\n7z"),
        (b"-:", b""),
        (b"++#>((+)):$:$:", b""),
        (b"$.$.!ok", b""),
        (b";:", b""),
    ]);
    assert_backends_agree(DialectKind::Dollar, &corpus);
}

#[test]
fn crossed_pairs_rejected_by_both_backends() {
    // Arrange
    let engine = engine(config(DialectKind::Love));
    let source = b"+[(]-)+.";

    // Act
    let compiled = engine.compile(engine.source(source).unwrap());
    let interpreted = engine.run_to_vec(engine.source(source).unwrap(), b"");

    // Assert
    assert!(matches!(compiled, Err(BfError::Unbalanced { offset: 3, .. })));
    assert!(matches!(interpreted, Err(BfError::Unbalanced { offset: 3, .. })));
}

#[test]
fn dynamic_growth_survives_compilation() {
    if !cc_available() {
        return;
    }
    // Arrange: far past the initial single cell, forcing many reallocations
    let config = MachineConfig {
        dynamic: true,
        cell_count: 1,
        ..config(DialectKind::Vanilla)
    };
    let engine = engine(config);
    let source = [b">+".repeat(2000), b".".to_vec()].concat();
    let dir = tempdir().unwrap();

    // Act
    let c = engine.compile(engine.source(&source).unwrap()).unwrap();
    let actual = run_compiled(dir.path(), "growth", &c, b"");

    // Assert
    assert_eq!(actual.stdout, vec![1]);
    assert_eq!(actual, interpret(&engine, &source, b""));
}
