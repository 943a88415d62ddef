//! Core types for the brainfunk tape machine.
//!
//! - **Cell**: fixed-width unsigned cell, arithmetic wraps at its width
//! - **Memory**: the `CellStore` tape with its bounds policy, plus an
//!   optional code bank
//! - **Address**: logical-to-physical translation for nibble and bit dialects
//! - **Error**: the error taxonomy shared by every layer
//!
//! # Layer 0 - No Internal Dependencies

pub mod address;
pub mod cell;
pub mod error;
pub mod memory;

pub use address::{Addressing, BitAddress};
pub use cell::{Cell, CellWidth};
pub use error::{BfError, BfResult, ErrorCategory, MemoryOperation, ScanDirection};
pub use memory::{BoundsPolicy, CellStore, Memory, TapeConfig, MAX_TAPE_CELLS};
