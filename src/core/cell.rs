//! Cell type for the tape machine: one fixed-width unsigned integer.
//!
//! A tape picks its width once at construction. All arithmetic on a cell
//! wraps modulo 2^(8·W), done explicitly through the width mask rather than
//! by reinterpreting raw storage.

use std::fmt;

use super::error::{BfError, BfResult};

/// Width of a tape cell in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellWidth {
    W1,
    W2,
    W4,
    W8,
}

impl CellWidth {
    /// Validate a width given in bytes.
    pub fn from_bytes(width: usize) -> BfResult<Self> {
        match width {
            1 => Ok(CellWidth::W1),
            2 => Ok(CellWidth::W2),
            4 => Ok(CellWidth::W4),
            8 => Ok(CellWidth::W8),
            _ => Err(BfError::InvalidCellWidth { width }),
        }
    }

    /// Width in bytes.
    pub fn bytes(self) -> usize {
        match self {
            CellWidth::W1 => 1,
            CellWidth::W2 => 2,
            CellWidth::W4 => 4,
            CellWidth::W8 => 8,
        }
    }

    /// Width in bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Mask selecting the bits a cell of this width can hold.
    #[inline]
    pub fn mask(self) -> u64 {
        match self {
            CellWidth::W1 => 0xFF,
            CellWidth::W2 => 0xFFFF,
            CellWidth::W4 => 0xFFFF_FFFF,
            CellWidth::W8 => u64::MAX,
        }
    }

    /// Matching unsigned type name in the C target.
    pub fn c_type(self) -> &'static str {
        match self {
            CellWidth::W1 => "uint8_t",
            CellWidth::W2 => "uint16_t",
            CellWidth::W4 => "uint32_t",
            CellWidth::W8 => "uint64_t",
        }
    }
}

impl fmt::Display for CellWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// A single tape cell, tagged with its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Cell {
    /// A zero cell of the given width.
    pub fn zero(width: CellWidth) -> Self {
        Self::from_u64(width, 0)
    }

    /// Build a cell, truncating `value` modulo 2^(8·W).
    pub fn from_u64(width: CellWidth, value: u64) -> Self {
        match width {
            CellWidth::W1 => Cell::U8(value as u8),
            CellWidth::W2 => Cell::U16(value as u16),
            CellWidth::W4 => Cell::U32(value as u32),
            CellWidth::W8 => Cell::U64(value),
        }
    }

    /// The cell's width.
    pub fn width(self) -> CellWidth {
        match self {
            Cell::U8(_) => CellWidth::W1,
            Cell::U16(_) => CellWidth::W2,
            Cell::U32(_) => CellWidth::W4,
            Cell::U64(_) => CellWidth::W8,
        }
    }

    /// Zero-extended value.
    #[inline]
    pub fn value(self) -> u64 {
        match self {
            Cell::U8(v) => v as u64,
            Cell::U16(v) => v as u64,
            Cell::U32(v) => v as u64,
            Cell::U64(v) => v,
        }
    }

    /// Low byte, as sent to the output sink.
    #[inline]
    pub fn low_byte(self) -> u8 {
        self.value() as u8
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.value() == 0
    }

    /// Add `n`, wrapping at the cell width.
    pub fn wrapping_add(self, n: u64) -> Self {
        Self::from_u64(self.width(), self.value().wrapping_add(n))
    }

    /// Subtract `n`, wrapping at the cell width.
    pub fn wrapping_sub(self, n: u64) -> Self {
        Self::from_u64(self.width(), self.value().wrapping_sub(n))
    }

    /// Shift left by `n` single-bit steps; bits pushed out are lost.
    pub fn shl(self, n: u64) -> Self {
        let v = if n >= self.width().bits() as u64 { 0 } else { self.value() << n };
        Self::from_u64(self.width(), v)
    }

    /// Shift right by `n` single-bit steps.
    pub fn shr(self, n: u64) -> Self {
        let v = if n >= self.width().bits() as u64 { 0 } else { self.value() >> n };
        Self::from_u64(self.width(), v)
    }

    /// Replace the value, keeping the width.
    pub fn with_value(self, value: u64) -> Self {
        Self::from_u64(self.width(), value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_validation() {
        assert_eq!(CellWidth::from_bytes(4).unwrap(), CellWidth::W4);
        assert!(matches!(
            CellWidth::from_bytes(3),
            Err(BfError::InvalidCellWidth { width: 3 })
        ));
        assert!(CellWidth::from_bytes(0).is_err());
        assert!(CellWidth::from_bytes(16).is_err());
    }

    #[test]
    fn test_wrapping_per_width() {
        let c = Cell::zero(CellWidth::W1).wrapping_sub(1);
        assert_eq!(c, Cell::U8(255));
        assert_eq!(c.wrapping_add(2).value(), 1);

        let c = Cell::from_u64(CellWidth::W2, 0x1_0005);
        assert_eq!(c.value(), 5);

        let c = Cell::zero(CellWidth::W8).wrapping_sub(1);
        assert_eq!(c.value(), u64::MAX);
    }

    #[test]
    fn test_low_byte() {
        let c = Cell::from_u64(CellWidth::W4, 0x1234_5678);
        assert_eq!(c.low_byte(), 0x78);
    }

    #[test]
    fn test_shifts_saturate_to_zero() {
        let c = Cell::from_u64(CellWidth::W1, 0x81);
        assert_eq!(c.shl(1).value(), 0x02);
        assert_eq!(c.shl(8).value(), 0);
        assert_eq!(c.shr(7).value(), 1);
        assert_eq!(c.shr(100).value(), 0);
    }
}
