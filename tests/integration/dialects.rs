//! Integration tests for the dialect family.
//!
//! Component: Engine + Dialect descriptors
//!
//! These tests verify:
//! - Each dialect's distinguishing opcodes through the public engine
//! - Forced tape settings (width, dynamic growth) win over requests
//! - Dialects without a C backend refuse to compile

#![cfg(test)]

use crate::common::*;

use brainfunk::compiler::pack_bits;
use brainfunk::*;

const HELLO_A: &[u8] = b"++++++++[>++++++++<-]>+.";

mod classic {
    use super::*;

    #[test]
    fn vanilla_prints() {
        // Act
        let out = run(DialectKind::Vanilla, HELLO_A, b"").unwrap();

        // Assert
        assert_eq!(out, b"A");
    }

    #[test]
    fn vanilla_echoes_input() {
        let out = run(DialectKind::Vanilla, b",[.,]", b"echo").unwrap();
        assert_eq!(out, b"echo");
    }

    #[test]
    fn compressed_reads_packed_source() {
        // Arrange
        let packed = pack_bits(HELLO_A);

        // Act
        let out = run(DialectKind::Compressed, &packed, b"").unwrap();

        // Assert
        assert_eq!(out, b"A");
        assert!(packed.len() < HELLO_A.len());
    }
}

mod live_code {
    use super::*;

    #[test]
    fn selfmod_rewrites_its_own_code() {
        // Arrange: `<` steps back onto the `-`, `+` turns it into `.`
        let source = b"<+-";

        // Act
        let out = run(DialectKind::Selfmod, source, b"").unwrap();

        // Assert
        assert_eq!(out, b".");
    }

    #[test]
    fn extended2_prints_trailing_data() {
        let out = run(DialectKind::Extended2, b".>.@hi", b"").unwrap();
        assert_eq!(out, b"hi");
    }

    #[test]
    fn extended2_division_by_zero() {
        // Act
        let result = run(DialectKind::Extended2, b"+/@", b"");

        // Assert
        let err = result.unwrap_err();
        assert!(matches!(err, BfError::DivisionByZero { pc: 2 }));
        assert_eq!(err.category(), ErrorCategory::Runtime);
    }

    #[test]
    fn extended2_forces_dynamic_tape() {
        // Arrange
        let requested = MachineConfig {
            cell_count: 100,
            wrap: true,
            ..config(DialectKind::Extended2)
        };

        // Act
        let engine = engine(requested);

        // Assert
        assert_eq!(engine.tape().policy().unwrap(), BoundsPolicy::Dynamic);
        assert_eq!(engine.tape().length, 10000);
    }
}

mod extensions {
    use super::*;

    #[test]
    fn extended_storage_and_halt() {
        // Arrange: store 3, move right, load it, print, halt before the last `.`
        let source = b"+++$>!.@.";

        // Act
        let out = run(DialectKind::Extended, source, b"").unwrap();

        // Assert
        assert_eq!(out, vec![3]);
    }

    #[test]
    fn extended_shift_with_wide_cells() {
        // Arrange
        let config = MachineConfig {
            cell_width: 2,
            ..config(DialectKind::Extended)
        };

        // Act: 1 << 9 = 512, then 512 >> 8 = 2
        let (vm, _) = finished(config, b"+{{{{{{{{{}}}}}}}}", b"");

        // Assert
        assert_cells(&vm, &[2]);
    }

    #[test]
    fn love_inverse_loop_runs_on_zero() {
        let out = run(DialectKind::Love, b"(+).", b"").unwrap();
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn love_crossed_pairs_rejected() {
        let result = run(DialectKind::Love, b"+[(]-)+.", b"");
        assert!(matches!(result, Err(BfError::Unbalanced { offset: 3, .. })));
    }

    #[test]
    fn love_break_leaves_innermost_loop() {
        let out = run(DialectKind::Love, b"+[~[]-]>+<.", b"").unwrap();
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn love_break_outside_loop() {
        let result = run(DialectKind::Love, b"+~", b"");
        assert!(matches!(result, Err(BfError::BreakOutsideLoop { offset: 1 })));
    }

    #[test]
    fn jump_returns_to_marked_point() {
        // Arrange
        let config = MachineConfig {
            data: Some("\\x00\\x03".into()),
            ..config(DialectKind::Jump)
        };

        // Act
        let out = run_with(config, b"+&>.-[<[-]+%]", b"").unwrap();

        // Assert
        assert_eq!(out, vec![3, 2, 1]);
    }
}

mod stacks {
    use super::*;

    #[test]
    fn stacked_reverses_trailing_data() {
        // Arrange: pop until the stack reads 0
        let source = b"([.(]!abc\n";

        // Act
        let out = run(DialectKind::Stacked, source, b"").unwrap();

        // Assert
        assert_eq!(out, b"cba");
    }

    #[test]
    fn stacked_top_feeds_arithmetic() {
        // Arrange
        let config = MachineConfig {
            cell_width: 2,
            ..config(DialectKind::Stacked)
        };

        // Act: 3 << 8, then | 5
        let (vm, _) = finished(config, b"++++++++)>+++{)>+++++|", b"");

        // Assert
        assert_cells(&vm, &[8, 0x300, 0x305]);
        assert_eq!(vm.machine().stack, vec![8, 0x300]);
    }

    #[test]
    fn dollar_counts_with_decimal_io() {
        // Arrange: read n, then print n dots
        let source = b";#>++++++[>++++++++<-]>--(.)";

        // Act
        let out = run(DialectKind::Dollar, source, b"4\n").unwrap();

        // Assert
        assert_eq!(out, b"....");
    }

    #[test]
    fn dollar_prints_wide_cells_in_decimal() {
        let config = MachineConfig {
            cell_width: 8,
            ..config(DialectKind::Dollar)
        };
        let out = run_with(config, b"-:", b"").unwrap();
        assert_eq!(out, u64::MAX.to_string().into_bytes());
    }
}

mod sub_byte {
    use super::*;

    #[test]
    fn bcd_digits_add_and_advance() {
        // Arrange: nibbles 3 4 A 2
        let config = MachineConfig {
            cell_width: 4,
            ..config(DialectKind::Bcd)
        };

        // Act
        let (vm, _) = finished(config, &[0x34, 0xA2], b"");

        // Assert: width forced back to one byte
        assert_eq!(vm.machine().memory.tape.width(), CellWidth::W1);
        assert_cells(&vm, &[0x36]);
    }

    #[test]
    fn bitchanger_memory_mapped_output() {
        // Arrange: from bit 16 set bits 14 and 8 ('A'), 7 (write), 5 (request)
        let source = b"<<}<<<<<<<}<<}<<<}";

        // Act
        let out = run(DialectKind::Bitchanger, source, b"").unwrap();

        // Assert
        assert_eq!(out, b"A");
    }

    #[test]
    fn bitchanger_rejects_short_tape() {
        let result = Engine::new(MachineConfig {
            cell_count: 8,
            ..config(DialectKind::Bitchanger)
        });
        assert!(matches!(result, Err(BfError::Config { .. })));
    }
}

mod images {
    use super::*;

    #[test]
    fn loller_runs_raster() {
        // Arrange: + + + .
        let plus = [0, 255, 0];
        let image = Raster::new(4, 1, vec![plus, plus, plus, [0, 0, 255]]).unwrap();
        let engine = engine(config(DialectKind::Loller));

        // Act
        let out = engine.run_to_vec(engine.raster_source(&image).unwrap(), b"").unwrap();

        // Assert
        assert_eq!(out, vec![3]);
    }

    #[test]
    fn loller_rejects_text() {
        let result = run(DialectKind::Loller, b"+", b"");
        assert!(matches!(result, Err(BfError::Config { .. })));
    }
}

#[test]
fn backend_availability() {
    let compiles: Vec<DialectKind> = DialectKind::ALL
        .into_iter()
        .filter(|k| k.dialect().can_compile())
        .collect();
    assert_eq!(
        compiles,
        vec![
            DialectKind::Vanilla,
            DialectKind::Compressed,
            DialectKind::Extended,
            DialectKind::Love,
            DialectKind::Stacked,
            DialectKind::Dollar
        ]
    );
}
