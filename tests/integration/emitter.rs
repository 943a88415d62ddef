//! Integration tests for the C backend.
//!
//! Component: Engine::compile + CEmitter
//!
//! These tests verify:
//! - Cell type follows the configured width
//! - The bounds guard matches the tape policy
//! - Initial data and the EOF policy reach the generated program
//! - Dialect templates and refusals

#![cfg(test)]

use crate::common::*;

use brainfunk::*;

#[test]
fn cell_type_follows_width() {
    for (width, c_type) in [(1, "uint8_t"), (2, "uint16_t"), (4, "uint32_t"), (8, "uint64_t")] {
        // Arrange
        let config = MachineConfig {
            cell_width: width,
            ..config(DialectKind::Vanilla)
        };

        // Act
        let c = compile(config, b"+.").unwrap();

        // Assert
        assert!(c.contains(&format!("typedef {} cell_t;", c_type)), "{}", c);
    }
}

#[test]
fn guard_matches_policy() {
    // Arrange
    let fixed = config(DialectKind::Vanilla);
    let wrap = MachineConfig { wrap: true, ..fixed.clone() };
    let dynamic = MachineConfig { dynamic: true, ..fixed.clone() };

    // Act
    let fixed = compile(fixed, b"<").unwrap();
    let wrap = compile(wrap, b"<").unwrap();
    let dynamic = compile(dynamic, b"<").unwrap();

    // Assert
    assert!(fixed.contains("if (i >= size) die(\"pointer was incremented too much\");"));
    assert!(wrap.contains("if (i < 0) i = size - (-i) % size;"));
    assert!(dynamic.contains("while (size <= i) size += size / 2 + 1;"));
    assert!(!wrap.contains("realloc"));
}

#[test]
fn data_and_eof_are_emitted() {
    // Arrange
    let config = MachineConfig {
        data: Some("ok".into()),
        eof: EofPolicy::Unchanged,
        ..config(DialectKind::Vanilla)
    };

    // Act
    let c = compile(config, b",.").unwrap();

    // Assert
    assert!(c.contains("static const cell_t init_data[] = { 0x6f, 0x6b };"));
    assert!(c.contains("static cell_t on_eof(cell_t old) {\n    (void)old;\n    return old;\n}"));
    assert!(c.contains("put(index, input_cell(get(index)));"));
}

#[test]
fn folded_runs_become_one_statement() {
    let c = compile(config(DialectKind::Vanilla), b"+++++>>>").unwrap();
    assert!(c.contains("put(index, (cell_t)(get(index) + (cell_t)5ULL));"));
    assert!(c.contains("index += 3;"));
}

#[test]
fn extended_templates() {
    // Act
    let c = compile(config(DialectKind::Extended), b"+$~^@").unwrap();

    // Assert
    assert!(c.contains("static cell_t storage;"));
    assert!(c.contains("storage = get(index);"));
    assert!(c.contains("put(index, (cell_t)~get(index));"));
    assert!(c.contains("put(index, (cell_t)(get(index) ^ storage));"));
    assert!(c.contains("goto done;"));
}

#[test]
fn love_inverse_loop_template() {
    let c = compile(config(DialectKind::Love), b"(+)").unwrap();
    assert!(c.contains("while (!get(index)) {"));
}

#[test]
fn structural_errors_stop_compilation() {
    let result = compile(config(DialectKind::Vanilla), b"[");
    assert!(matches!(result, Err(BfError::Unbalanced { .. })));
}

#[test]
fn uncompilable_dialects_refuse() {
    let interpreted_only = [
        DialectKind::Selfmod,
        DialectKind::Extended2,
        DialectKind::Jump,
        DialectKind::Bcd,
        DialectKind::Bitchanger,
    ];
    for kind in interpreted_only {
        // Act
        let err = compile(config(kind), b"+").unwrap_err();

        // Assert
        assert_eq!(err.category(), ErrorCategory::Unsupported, "{}", kind);
        assert!(err.to_string().ends_with("can't be compiled"));
    }
}
