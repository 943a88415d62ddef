//! Reference scenarios for the machine.
//!
//! Component: Interpreter, Translator, Address translation
//!
//! These tests verify:
//! - Wrap-around movement on a short tape (A)
//! - Clear loops run once per unit of the starting value (B)
//! - Unbalanced source produces no program (C)
//! - Nibble addressing splits one physical byte (D)

#![cfg(test)]

use crate::common::*;

use brainfunk::*;

#[test]
fn scenario_a_wrapping_tape() {
    // Arrange
    let config = MachineConfig {
        cell_count: 5,
        wrap: true,
        ..config(DialectKind::Vanilla)
    };

    // Act
    let (vm, out) = finished(config, b"+++>++>+++<<.", b"");

    // Assert
    assert_eq!(out.bytes(), vec![0x03]);
    assert_eq!(vm.machine().cursor, 0);
    assert_cells(&vm, &[3, 2, 3, 0, 0]);
}

#[test]
fn scenario_b_clear_loop_runs_v_times() {
    for v in [1u64, 7, 255] {
        // Arrange
        let config = MachineConfig {
            data: Some(escape_data(&[v], CellWidth::W1)),
            ..config(DialectKind::Vanilla)
        };

        // Act
        let (vm, out) = finished(config, b"[-]", b"");

        // Assert: one `[`, then `-` and `]` per pass
        assert_eq!(vm.steps(), 1 + 2 * v);
        assert_cells(&vm, &[0]);
        assert_eq!(vm.machine().cursor, 0);
        assert!(out.bytes().is_empty());
    }
}

#[test]
fn scenario_c_unbalanced_source_rejected() {
    // Act
    let result = translate_text(b"[[]", &compiler::BRAINFUCK);

    // Assert
    assert!(matches!(result, Err(BfError::Unbalanced { open: '[', close: ']', .. })));
    assert_eq!(result.unwrap_err().category(), ErrorCategory::Structural);
}

#[test]
fn scenario_c_engine_produces_nothing() {
    // Arrange
    let engine = engine(config(DialectKind::Vanilla));

    // Act
    let result = engine.run_to_vec(Source::Text(b"+.[[]"), b"");

    // Assert: the `+.` before the error never ran
    assert!(matches!(result, Err(BfError::Unbalanced { .. })));
}

#[test]
fn scenario_d_nibble_split() {
    // Arrange
    let mut tape = CellStore::new(1, 4, BoundsPolicy::Fixed).unwrap();
    tape.write(0, 0x3A).unwrap();

    // Act
    let high = Addressing::Nibble.locate(0);
    let low = Addressing::Nibble.locate(1);

    // Assert
    assert_eq!((high.physical, high.shift), (0, 4));
    assert_eq!((low.physical, low.shift), (0, 0));
    assert_eq!(Addressing::Nibble.read(&mut tape, 0).unwrap(), 0x3);
    assert_eq!(Addressing::Nibble.read(&mut tape, 1).unwrap(), 0xA);
}
