//! Address translation between logical cursor indices and tape cells.
//!
//! Most dialects address whole cells. Two reinterpret the same byte tape at
//! a finer grain: BCDFuck in nibbles and Bitchanger in single bits. The
//! translator only computes where a logical index lives; bounds handling is
//! left to the [`CellStore`] it delegates to.
//!
//! The two sub-byte layouts use different modulo conventions:
//!
//! ```text
//! Nibble  physical = i / 2                 shift = 4 * (1 - i % 2)      (truncating)
//! Bit     physical = (i - sign * 7) / 8    shift = ((i % 8) + 8) % 8    (euclidean)
//! ```
//!
//! so a negative odd nibble index yields shift 8, which selects nothing in
//! a byte cell, while the bit layout always lands in `0..8`.

use super::error::{BfResult, MemoryOperation};
use super::memory::CellStore;

/// Physical location of a logical index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitAddress {
    /// Index handed to the cell store.
    pub physical: i64,
    /// Bit offset of the addressed unit inside that cell.
    pub shift: u32,
}

/// How logical indices map onto tape cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    /// One logical index per cell.
    #[default]
    Direct,
    /// Two 4-bit units per byte cell, high nibble first.
    Nibble,
    /// Eight 1-bit units per byte cell, least significant bit first.
    Bit,
}

impl Addressing {
    /// Compute the physical cell and shift for `index`.
    pub fn locate(self, index: i64) -> BitAddress {
        match self {
            Addressing::Direct => BitAddress { physical: index, shift: 0 },
            Addressing::Nibble => BitAddress {
                physical: index / 2,
                shift: (4 * (1 - index % 2)) as u32,
            },
            Addressing::Bit => {
                let sign = (index >> 63) & 1;
                BitAddress {
                    physical: (index - sign * 7) / 8,
                    shift: (((index % 8) + 8) % 8) as u32,
                }
            }
        }
    }

    /// Mask for one addressed unit, before shifting. `None` means the whole cell.
    fn unit_mask(self) -> Option<u64> {
        match self {
            Addressing::Direct => None,
            Addressing::Nibble => Some(0xF),
            Addressing::Bit => Some(0x1),
        }
    }

    /// Read the unit at `index`.
    pub fn read(self, tape: &mut CellStore, index: i64) -> BfResult<u64> {
        self.load(tape, index, MemoryOperation::Read)
    }

    /// Read the unit at `index` as code.
    pub fn fetch(self, tape: &mut CellStore, index: i64) -> BfResult<u64> {
        self.load(tape, index, MemoryOperation::Fetch)
    }

    fn load(self, tape: &mut CellStore, index: i64, operation: MemoryOperation) -> BfResult<u64> {
        let at = self.locate(index);
        let cell = tape.get(at.physical, operation)?.value();
        Ok(match self.unit_mask() {
            None => cell,
            Some(mask) => shift_right(cell, at.shift) & mask,
        })
    }

    /// Addressable units per physical cell.
    pub fn units_per_cell(self) -> usize {
        match self {
            Addressing::Direct => 1,
            Addressing::Nibble => 2,
            Addressing::Bit => 8,
        }
    }

    /// Write the unit at `index`, leaving the rest of the cell untouched.
    pub fn write(self, tape: &mut CellStore, index: i64, value: u64) -> BfResult<()> {
        let at = self.locate(index);
        match self.unit_mask() {
            None => tape.write(at.physical, value),
            Some(mask) => {
                let cell = tape.read(at.physical)?.value();
                let placed = shift_left(mask, at.shift);
                let merged = (cell & !placed) | shift_left(value & mask, at.shift);
                tape.write(at.physical, merged)
            }
        }
    }

    /// Largest value one unit can hold, given the tape's cell mask.
    pub fn unit_max(self, cell_mask: u64) -> u64 {
        self.unit_mask().unwrap_or(cell_mask)
    }
}

#[inline]
fn shift_left(v: u64, shift: u32) -> u64 {
    v.checked_shl(shift).unwrap_or(0)
}

#[inline]
fn shift_right(v: u64, shift: u32) -> u64 {
    v.checked_shr(shift).unwrap_or(0)
}
