//! Integration tests for tape behaviour.
//!
//! Component: CellStore, Addressing, Ports
//!
//! These tests verify:
//! - Fixed tapes fail at both ends with the failing index
//! - Wrapped and dynamic tapes through whole programs
//! - The two negative-index rules (store wrap vs bit addressing)
//! - Every EOF policy at more than one width

#![cfg(test)]

use crate::common::*;

use brainfunk::*;

mod bounds {
    use super::*;

    #[test]
    fn fixed_tape_fails_left() {
        // Act
        let err = run(DialectKind::Vanilla, b"<", b"").unwrap_err();

        // Assert
        assert!(matches!(err, BfError::NegativeAddress { index: -1, .. }));
        assert_eq!(err.category(), ErrorCategory::Addressing);
    }

    #[test]
    fn fixed_tape_fails_right() {
        // Arrange
        let config = MachineConfig {
            cell_count: 3,
            ..config(DialectKind::Vanilla)
        };

        // Act
        let err = run_with(config, b">>>+", b"").unwrap_err();

        // Assert
        assert!(matches!(err, BfError::AddressOutOfBounds { index: 3, length: 3, .. }));
    }

    #[test]
    fn output_before_error_is_kept() {
        let engine = engine(config(DialectKind::Vanilla));
        let capture = OutputCapture::new();
        let ports = Ports::new(std::io::empty(), capture.clone());

        let result = engine.run(engine.source(b"+.<.").unwrap(), ports);

        assert!(result.is_err());
        assert_eq!(capture.bytes(), vec![1]);
    }

    #[test]
    fn dynamic_tape_grows_and_zero_fills() {
        // Arrange
        let config = MachineConfig {
            cell_count: 1,
            dynamic: true,
            ..config(DialectKind::Vanilla)
        };

        // Act
        let (vm, out) = finished(config, b"+>>>>>>>>>>.+", b"");

        // Assert
        assert_eq!(out.bytes(), vec![0]);
        assert!(vm.machine().memory.tape.len() > 10);
        assert_eq!(vm.machine().memory.tape.peek(0), Some(1));
        assert_eq!(vm.machine().memory.tape.peek(10), Some(1));
    }

    #[test]
    fn wrapped_tape_walks_off_the_left() {
        // Arrange
        let config = MachineConfig {
            cell_count: 4,
            wrap: true,
            ..config(DialectKind::Vanilla)
        };

        // Act: cursor -1 is cell 3
        let (vm, _) = finished(config, b"<++", b"");

        // Assert
        assert_cells(&vm, &[0, 0, 0, 2]);
    }
}

mod negative_indices {
    use super::*;

    #[test]
    fn store_wrap_reduces_exact_multiples() {
        // Arrange
        let mut tape = CellStore::new(1, 4, BoundsPolicy::Wrap).unwrap();

        // Act
        tape.write(-4, 9).unwrap();
        tape.write(-5, 7).unwrap();

        // Assert: -4 lands on 4 then 0; -5 on 3
        assert_eq!(tape.peek(0), Some(9));
        assert_eq!(tape.peek(3), Some(7));
    }

    #[test]
    fn bit_addressing_rounds_toward_negative() {
        // Act
        let at = Addressing::Bit.locate(-1);
        let below = Addressing::Bit.locate(-9);

        // Assert
        assert_eq!((at.physical, at.shift), (-1, 7));
        assert_eq!((below.physical, below.shift), (-2, 7));
    }
}

mod end_of_input {
    use super::*;

    fn read_at_eof(eof: EofPolicy, width: usize) -> BfResult<Vec<u64>> {
        let config = MachineConfig {
            cell_width: width,
            eof,
            data: Some("\\x07".into()),
            ..config(DialectKind::Vanilla)
        };
        let engine = engine(config);
        let mut vm = engine.interpreter(
            engine.source(b",")?,
            Ports::new(std::io::empty(), std::io::sink()),
        )?;
        vm.run()?;
        Ok(vm.machine().memory.tape.prefix(1))
    }

    #[test]
    fn minus_one_is_all_ones() {
        assert_eq!(read_at_eof(EofPolicy::MinusOne, 1).unwrap(), vec![0xFF]);
        assert_eq!(read_at_eof(EofPolicy::MinusOne, 2).unwrap(), vec![0xFFFF]);
        assert_eq!(read_at_eof(EofPolicy::MinusOne, 8).unwrap(), vec![u64::MAX]);
    }

    #[test]
    fn zero_and_unchanged() {
        assert_eq!(read_at_eof(EofPolicy::Zero, 1).unwrap(), vec![0]);
        assert_eq!(read_at_eof(EofPolicy::Unchanged, 4).unwrap(), vec![7]);
    }

    #[test]
    fn abort_is_an_io_error() {
        let err = read_at_eof(EofPolicy::Abort, 1).unwrap_err();
        assert!(matches!(err, BfError::Eof { pc: 0 }));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn input_bytes_are_read_in_order() {
        let out = run(DialectKind::Vanilla, b",>,>,<<.>.>.", b"xyz").unwrap();
        assert_eq!(out, b"xyz");
    }
}
