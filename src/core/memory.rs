//! Tape storage for the brainfunk machine.
//!
//! A [`CellStore`] owns the tape cells and applies its [`BoundsPolicy`] on
//! every read and write. Moving the cursor never touches the store; only a
//! dereference does, so every access re-applies the policy.
//!
//! # Policies
//!
//! ```text
//! Fixed    index < 0 or index >= len      → addressing error
//! Wrap     index < 0                      → len - (|index| mod len), then
//!          index >= len                   → index mod len
//! Dynamic  index >= len                   → grow (len + len/2 + 1, repeated)
//!          index < 0                      → addressing error
//! ```
//!
//! Wrap and Dynamic are exclusive by construction: the policy is one enum
//! value, and [`TapeConfig::policy`] rejects a request for both.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::cell::{Cell, CellWidth};
use super::error::{BfError, BfResult, MemoryOperation};

/// Hard upper bound on the number of cells a dynamic tape may grow to.
pub const MAX_TAPE_CELLS: usize = 1 << 28;

/// Policy for handling out-of-range tape indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Any index outside `[0, len)` is fatal.
    Fixed,
    /// Indices are reduced into `[0, len)` before every access.
    Wrap,
    /// The tape grows to cover any non-negative index.
    Dynamic,
}

impl fmt::Display for BoundsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsPolicy::Fixed => write!(f, "fixed"),
            BoundsPolicy::Wrap => write!(f, "wrap"),
            BoundsPolicy::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Raw tape construction request, as it arrives from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeConfig {
    /// Cell width in bytes.
    pub width: usize,
    /// Initial number of cells.
    pub length: i64,
    /// Wrap the pointer around the tape ends.
    pub wrap: bool,
    /// Grow the tape on out-of-range access.
    pub dynamic: bool,
}

impl TapeConfig {
    /// Resolve the two policy flags into one policy.
    pub fn policy(&self) -> BfResult<BoundsPolicy> {
        match (self.wrap, self.dynamic) {
            (true, true) => Err(BfError::ConflictingPolicy),
            (true, false) => Ok(BoundsPolicy::Wrap),
            (false, true) => Ok(BoundsPolicy::Dynamic),
            (false, false) => Ok(BoundsPolicy::Fixed),
        }
    }

    /// Build the store this configuration describes.
    pub fn build(&self) -> BfResult<CellStore> {
        CellStore::new(self.width, self.length, self.policy()?)
    }
}

/// Width-specific backing storage.
#[derive(Clone, PartialEq, Eq)]
enum CellBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

impl CellBuffer {
    fn zeroed(width: CellWidth, len: usize) -> Self {
        match width {
            CellWidth::W1 => CellBuffer::U8(vec![0; len]),
            CellWidth::W2 => CellBuffer::U16(vec![0; len]),
            CellWidth::W4 => CellBuffer::U32(vec![0; len]),
            CellWidth::W8 => CellBuffer::U64(vec![0; len]),
        }
    }

    fn len(&self) -> usize {
        match self {
            CellBuffer::U8(v) => v.len(),
            CellBuffer::U16(v) => v.len(),
            CellBuffer::U32(v) => v.len(),
            CellBuffer::U64(v) => v.len(),
        }
    }

    /// Zero-fills new cells; prior contents are kept.
    fn resize(&mut self, len: usize) {
        match self {
            CellBuffer::U8(v) => v.resize(len, 0),
            CellBuffer::U16(v) => v.resize(len, 0),
            CellBuffer::U32(v) => v.resize(len, 0),
            CellBuffer::U64(v) => v.resize(len, 0),
        }
    }

    fn get(&self, i: usize) -> Cell {
        match self {
            CellBuffer::U8(v) => Cell::U8(v[i]),
            CellBuffer::U16(v) => Cell::U16(v[i]),
            CellBuffer::U32(v) => Cell::U32(v[i]),
            CellBuffer::U64(v) => Cell::U64(v[i]),
        }
    }

    fn set(&mut self, i: usize, value: u64) {
        match self {
            CellBuffer::U8(v) => v[i] = value as u8,
            CellBuffer::U16(v) => v[i] = value as u16,
            CellBuffer::U32(v) => v[i] = value as u32,
            CellBuffer::U64(v) => v[i] = value,
        }
    }
}

/// Tape memory with a fixed cell width and a bounds policy.
#[derive(Clone, PartialEq, Eq)]
pub struct CellStore {
    width: CellWidth,
    policy: BoundsPolicy,
    cells: CellBuffer,
}

impl fmt::Debug for CellStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show non-zero cells
        write!(f, "CellStore({}, {}, len {}){{", self.width, self.policy, self.len())?;
        let mut first = true;
        for i in 0..self.len() {
            let v = self.cells.get(i).value();
            if v != 0 {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "[{}]={}", i, v)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

impl CellStore {
    /// Create a zero-filled tape.
    ///
    /// `length` must be positive for fixed and wrapping tapes. A dynamic
    /// tape may start empty.
    pub fn new(width: usize, length: i64, policy: BoundsPolicy) -> BfResult<Self> {
        let width = CellWidth::from_bytes(width)?;
        let length = match policy {
            BoundsPolicy::Fixed | BoundsPolicy::Wrap if length <= 0 => {
                return Err(BfError::InvalidCellCount { count: length });
            }
            BoundsPolicy::Dynamic if length <= 0 => 0,
            _ => length as usize,
        };
        if length > MAX_TAPE_CELLS {
            return Err(BfError::Config {
                message: format!("cell count {} exceeds the limit of {}", length, MAX_TAPE_CELLS),
            });
        }
        Ok(Self {
            width,
            policy,
            cells: CellBuffer::zeroed(width, length),
        })
    }

    /// Cell width.
    pub fn width(&self) -> CellWidth {
        self.width
    }

    /// Bounds policy.
    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    /// Current number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    /// Apply the bounds policy to a logical index.
    ///
    /// Returns the physical slot, growing the tape first if the policy is
    /// dynamic.
    pub fn resolve(&mut self, index: i64, operation: MemoryOperation) -> BfResult<usize> {
        let mut index = index;
        if index < 0 {
            match self.policy {
                BoundsPolicy::Wrap => {
                    let len = self.len() as u64;
                    // An exact negative multiple of len lands on len itself
                    // and is reduced by the upper-bound rule below.
                    index = (len - index.unsigned_abs() % len) as i64;
                }
                _ => return Err(BfError::NegativeAddress { index, operation }),
            }
        }

        let mut slot = index as u64;
        let len = self.len() as u64;
        if slot >= len {
            match self.policy {
                BoundsPolicy::Dynamic => self.grow_to_cover(index)?,
                BoundsPolicy::Wrap => slot %= len,
                BoundsPolicy::Fixed => {
                    return Err(BfError::AddressOutOfBounds {
                        index,
                        length: self.len(),
                        operation,
                    });
                }
            }
        }
        Ok(slot as usize)
    }

    /// Geometric growth: new length = old + old/2 + 1 until `index` fits.
    fn grow_to_cover(&mut self, index: i64) -> BfResult<()> {
        let target = index as u64;
        if target >= MAX_TAPE_CELLS as u64 {
            return Err(BfError::TapeExhausted {
                index,
                limit: MAX_TAPE_CELLS,
            });
        }
        let old = self.len();
        let mut len = old as u64;
        while len <= target {
            len += len / 2 + 1;
        }
        let len = len.min(MAX_TAPE_CELLS as u64) as usize;
        trace!(from = old, to = len, index, "growing tape");
        self.cells.resize(len);
        Ok(())
    }

    /// Read the cell at `index`, tagging errors with `operation`.
    pub fn get(&mut self, index: i64, operation: MemoryOperation) -> BfResult<Cell> {
        let slot = self.resolve(index, operation)?;
        Ok(self.cells.get(slot))
    }

    /// Read the cell at `index`.
    pub fn read(&mut self, index: i64) -> BfResult<Cell> {
        self.get(index, MemoryOperation::Read)
    }

    /// Write `value` (truncated to the cell width) at `index`.
    pub fn write(&mut self, index: i64, value: u64) -> BfResult<()> {
        let slot = self.resolve(index, MemoryOperation::Write)?;
        self.cells.set(slot, value);
        Ok(())
    }

    /// Read a cell while decoding live code.
    pub fn fetch(&mut self, index: i64) -> BfResult<Cell> {
        self.get(index, MemoryOperation::Fetch)
    }

    /// Look at a physical slot without applying the policy or growing.
    pub fn peek(&self, slot: usize) -> Option<u64> {
        (slot < self.len()).then(|| self.cells.get(slot).value())
    }

    /// Copy of the first `count` physical cells (fewer if the tape is shorter).
    pub fn prefix(&self, count: usize) -> Vec<u64> {
        (0..count.min(self.len())).map(|i| self.cells.get(i).value()).collect()
    }

    /// Write a run of cells starting at `offset`.
    pub fn load(&mut self, offset: i64, values: &[u64]) -> BfResult<()> {
        for (i, value) in values.iter().enumerate() {
            self.write(offset + i as i64, *value)?;
        }
        Ok(())
    }
}

/// The storage banks a machine owns.
///
/// Most dialects use only the tape. Dialects that keep their program in a
/// separate, swappable bank (BCDFuck) also carry a code bank.
#[derive(Debug, Clone)]
pub struct Memory {
    pub tape: CellStore,
    pub code: Option<CellStore>,
}

impl Memory {
    pub fn new(tape: CellStore) -> Self {
        Self { tape, code: None }
    }

    pub fn with_code(tape: CellStore, code: CellStore) -> Self {
        Self { tape, code: Some(code) }
    }

    /// Exchange the tape and the code bank. No-op without a code bank.
    pub fn swap_banks(&mut self) {
        if let Some(code) = self.code.as_mut() {
            std::mem::swap(&mut self.tape, code);
        }
    }
}
